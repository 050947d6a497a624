//! 언어별 프로필(데이터 경로, 열 이름, 화면 문자열)을 데이터 테이블에서 구성한다.
//! 세 번째 언어를 추가할 때는 profiles.toml 항목과 언어팩만 추가하면 된다.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::i18n::{Language, Translator};

/// 증상 입력 칸 수. 모델 입력 차원과 같다.
pub const SYMPTOM_SLOTS: usize = 4;

/// profiles.toml 한 항목의 원본 형태.
#[derive(Debug, Clone, Deserialize)]
struct ProfileEntry {
    model: PathBuf,
    training: PathBuf,
    descriptions: PathBuf,
    precautions: PathBuf,
    symptom_columns: [String; SYMPTOM_SLOTS],
    disease_column: String,
    #[serde(default = "default_description_column")]
    description_column: String,
}

fn default_description_column() -> String {
    "Description".into()
}

/// 한 언어에 필요한 경로, 열 이름, 화면 문자열 묶음. 생성 후에는 바뀌지 않는다.
#[derive(Debug, Clone)]
pub struct LanguageProfile {
    pub language: Language,
    pub model_path: PathBuf,
    pub training_path: PathBuf,
    pub description_path: PathBuf,
    pub precaution_path: PathBuf,
    pub symptom_columns: [String; SYMPTOM_SLOTS],
    pub disease_column: String,
    pub description_column: String,
    pub labels: Translator,
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("프로필 파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("프로필 파싱 오류: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("알 수 없는 언어 키: {0}")]
    UnknownLanguage(String),
}

/// 언어 식별자로 찾는 프로필 설정 테이블.
#[derive(Debug, Clone)]
pub struct ProfileTable {
    entries: BTreeMap<Language, ProfileEntry>,
    data_dir: PathBuf,
    pack_dir: Option<String>,
}

impl ProfileTable {
    /// 빌드 시 포함된 profiles.toml을 사용한다.
    pub fn built_in(data_dir: impl Into<PathBuf>) -> Result<Self, ProfileError> {
        Self::from_toml(include_str!("../profiles.toml"), data_dir)
    }

    pub fn from_toml(src: &str, data_dir: impl Into<PathBuf>) -> Result<Self, ProfileError> {
        let raw: BTreeMap<String, ProfileEntry> = toml::from_str(src)?;
        let mut entries = BTreeMap::new();
        for (key, entry) in raw {
            let lang = Language::from_selector(&key)
                .ok_or_else(|| ProfileError::UnknownLanguage(key.clone()))?;
            entries.insert(lang, entry);
        }
        Ok(Self {
            entries,
            data_dir: data_dir.into(),
            pack_dir: None,
        })
    }

    /// 언어가 하나도 없는 테이블. 모든 언어 선택이 "자원 없음"으로 끝난다.
    pub fn empty(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            entries: BTreeMap::new(),
            data_dir: data_dir.into(),
            pack_dir: None,
        }
    }

    pub fn load(path: &Path, data_dir: impl Into<PathBuf>) -> Result<Self, ProfileError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content, data_dir)
    }

    /// 설정의 profiles_path/data_dir/language_pack_dir을 반영해 테이블을 만든다.
    pub fn from_config(cfg: &Config) -> Result<Self, ProfileError> {
        let table = match &cfg.profiles_path {
            Some(path) => Self::load(path, cfg.data_dir.clone())?,
            None => Self::built_in(cfg.data_dir.clone())?,
        };
        Ok(table.with_pack_dir(cfg.language_pack_dir.clone()))
    }

    pub fn with_pack_dir(mut self, pack_dir: Option<String>) -> Self {
        self.pack_dir = pack_dir;
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// 데이터 디렉터리를 바꾼다. 이미 만들어진 프로필에는 영향이 없다.
    pub fn set_data_dir(&mut self, data_dir: impl Into<PathBuf>) {
        self.data_dir = data_dir.into();
    }

    /// 테이블에 정의된 언어 목록(선택 상자 순서).
    pub fn languages(&self) -> impl Iterator<Item = Language> + '_ {
        self.entries.keys().copied()
    }

    /// 선택된 언어의 프로필을 만든다. 테이블에 없는 언어면 None.
    pub fn profile(&self, language: Language) -> Option<LanguageProfile> {
        let entry = self.entries.get(&language)?;
        let resolve = |p: &Path| self.data_dir.join(p);
        Some(LanguageProfile {
            language,
            model_path: resolve(&entry.model),
            training_path: resolve(&entry.training),
            description_path: resolve(&entry.descriptions),
            precaution_path: resolve(&entry.precautions),
            symptom_columns: entry.symptom_columns.clone(),
            disease_column: entry.disease_column.clone(),
            description_column: entry.description_column.clone(),
            labels: Translator::new_with_pack(language, self.pack_dir.as_deref()),
        })
    }
}
