use crate::config::{Config, ConfigError};
use crate::i18n::keys;
use crate::model::Symptoms;
use crate::session::{self, Session, SessionError};
use crate::ui_cli::{self, MenuChoice};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 파일/콘솔 입출력 오류
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// 설정 저장/로드 오류
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),
    /// 프로필 테이블 오류
    #[error("프로필 오류: {0}")]
    Profile(#[from] crate::profile::ProfileError),
    /// 세션 상태 오류(자원 없음 등)
    #[error("세션 오류: {0}")]
    Session(#[from] SessionError),
    /// 표준 입력이 닫힘
    #[error("입력이 종료되었습니다")]
    InputClosed,
}

/// CLI 애플리케이션의 메인 루프를 실행한다. 설정 저장은 호출한 쪽에서 한다.
pub fn run(session: &mut Session, config: &mut Config) -> Result<(), AppError> {
    ui_cli::print_header(session);
    loop {
        let tr = session.labels().clone();
        match ui_cli::main_menu(&tr)? {
            MenuChoice::Predict => ui_cli::handle_predict(session)?,
            MenuChoice::ChangeLanguage => ui_cli::handle_change_language(session, config)?,
            MenuChoice::Exit => {
                println!("{}", tr.t(keys::APP_EXIT));
                break;
            }
        }
    }
    Ok(())
}

/// 한 번만 예측하고 결과 줄을 돌려준다. 자원이 없으면 로드 오류 메시지를 담은 오류.
pub fn predict_once(session: &mut Session, symptoms: Symptoms) -> Result<Vec<String>, AppError> {
    if let Some(err) = session.load_error() {
        let tr = session.labels();
        eprintln!("{}: {}", tr.t(keys::ERROR_PREFIX), session::describe_load_error(err, tr));
        return Err(SessionError::Unavailable.into());
    }
    let tr = session.labels().clone();
    let result = session.submit_symptoms(symptoms)?;
    Ok(result.render_lines(&tr))
}
