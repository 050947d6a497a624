use std::path::PathBuf;

use clap::Parser;
use disease_prediction_support::{app, config, i18n, profile::ProfileTable, session::Session};

/// 증상 네 개로 질병을 예측하는 터미널 프로그램.
#[derive(Debug, Parser)]
#[command(name = "disease_prediction_support_cli", version)]
struct Cli {
    /// 언어 코드(en/vi) 또는 auto
    #[arg(short = 'L', long, default_value = "auto")]
    lang: String,
    /// 설정 파일 경로
    #[arg(long, default_value = config::CONFIG_FILE)]
    config: PathBuf,
    /// 데이터 디렉터리(설정값보다 우선)
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// 증상 네 개를 주면 한 번만 예측하고 종료한다(빈 칸은 none)
    #[arg(long, num_args = 4, value_names = ["S1", "S2", "S3", "S4"])]
    symptoms: Option<Vec<String>>,
}

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 CLI 애플리케이션을 실행한다.
fn main() {
    if let Err(err) = try_run() {
        eprintln!("오류: {err}");
        std::process::exit(1);
    }
}

fn try_run() -> Result<(), app::AppError> {
    let cli = Cli::parse();
    let (mut cfg, origin) = config::load_from(&cli.config)?;
    config::init_logging(&cfg.log_filter);
    origin.log(&cli.config);
    if let Some(dir) = cli.data_dir {
        cfg.data_dir = dir;
    }

    let language = i18n::resolve_language(&cli.lang, Some(cfg.language.as_str()));
    let profiles = ProfileTable::from_config(&cfg)?;
    let mut session = Session::new(profiles, language);

    match cli.symptoms {
        Some(symptoms) => {
            let symptoms: [String; 4] = std::array::from_fn(|i| symptoms[i].clone());
            for line in app::predict_once(&mut session, symptoms)? {
                println!("{line}");
            }
            Ok(())
        }
        None => {
            let result = match app::run(&mut session, &mut cfg) {
                // EOF(Ctrl-D)는 정상 종료로 본다.
                Err(app::AppError::InputClosed) => Ok(()),
                other => other,
            };
            cfg.save_to(&cli.config)?;
            result
        }
    }
}
