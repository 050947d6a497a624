use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 기본 설정 파일 이름.
pub const CONFIG_FILE: &str = "config.toml";

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// "auto" 또는 언어 코드(en/vi). auto면 시스템 로케일을 따른다.
    pub language: String,
    /// 프로필 테이블의 상대 경로 기준이 되는 데이터 디렉터리.
    pub data_dir: PathBuf,
    /// 언어팩(en.toml/vi.toml) 재정의 디렉터리.
    pub language_pack_dir: Option<String>,
    /// 내장 profiles.toml 대신 사용할 프로필 테이블 파일.
    pub profiles_path: Option<PathBuf>,
    /// GUI에서 사용할 사용자 폰트(.ttf/.ttc).
    pub font_path: Option<String>,
    pub window_alpha: f32,
    /// RUST_LOG가 없을 때 사용하는 tracing 필터.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "auto".into(),
            data_dir: PathBuf::from("data"),
            language_pack_dir: None,
            profiles_path: None,
            font_path: None,
            window_alpha: 1.0,
            log_filter: "info".into(),
        }
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 파일 입출력 오류
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// TOML 역직렬화 오류
    #[error("설정 파싱 오류: {0}")]
    Serde(#[from] toml::de::Error),
    /// TOML 직렬화 오류
    #[error("설정 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// 설정을 어디서 얻었는지. 로깅은 설정을 읽은 뒤에야 켜지므로 호출자가 나중에 기록한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOrigin {
    Loaded,
    CreatedDefault,
}

impl ConfigOrigin {
    pub fn log(self, path: &Path) {
        match self {
            ConfigOrigin::Loaded => tracing::debug!(path = %path.display(), "configuration loaded"),
            ConfigOrigin::CreatedDefault => {
                tracing::info!(path = %path.display(), "created default configuration")
            }
        }
    }
}

/// 지정한 경로의 설정을 로드한다. 파일이 없으면 기본값을 그 경로에 저장한다.
pub fn load_from(path: &Path) -> Result<(Config, ConfigOrigin), ConfigError> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content)?;
        Ok((cfg, ConfigOrigin::Loaded))
    } else {
        let cfg = Config::default();
        save_config(&cfg, path)?;
        Ok((cfg, ConfigOrigin::CreatedDefault))
    }
}

fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(cfg)?;
    fs::write(path, content)?;
    Ok(())
}

impl Config {
    /// 설정을 지정한 경로에 저장한다.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        save_config(self, path)
    }
}

/// tracing-subscriber를 초기화한다. RUST_LOG가 설정 값보다 우선한다.
pub fn init_logging(filter: &str) {
    use tracing_subscriber::EnvFilter;
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    // 테스트 등에서 두 번 호출되어도 무시한다.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}
