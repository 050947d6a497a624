use std::collections::HashMap;
use std::fs;
use std::path::Path;

use sys_locale::get_locale;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const ERROR_PREFIX: &str = "general.error_prefix";
    pub const APP_EXIT: &str = "general.app_exit";

    pub const APP_TITLE: &str = "app.title";
    pub const APP_DESCRIPTION: &str = "app.description";
    pub const APP_SELECT_LANGUAGE: &str = "app.select_language";

    pub const FORM_SELECT_SYMPTOMS: &str = "form.select_symptoms";
    pub const FORM_MAIN_SYMPTOM: &str = "form.main_symptom";
    pub const FORM_SECOND_SYMPTOM: &str = "form.second_symptom";
    pub const FORM_THIRD_SYMPTOM: &str = "form.third_symptom";
    pub const FORM_FOURTH_SYMPTOM: &str = "form.fourth_symptom";
    pub const FORM_PREDICT_BUTTON: &str = "form.predict_button";
    pub const FORM_PREDICT_TIP: &str = "form.predict_tip";

    pub const RESULT_PREDICTION: &str = "result.prediction";
    pub const RESULT_PREDICTED_DISEASE: &str = "result.predicted_disease";
    pub const RESULT_DESCRIPTION_LABEL: &str = "result.description_label";
    pub const RESULT_RECOMMENDATIONS: &str = "result.recommendations";
    pub const RESULT_PRECAUTION: &str = "result.precaution";

    pub const ERROR_NOT_FOUND: &str = "error.not_found";
    pub const ERROR_PARSE: &str = "error.parse";
    pub const ERROR_UNEXPECTED: &str = "error.unexpected";
    pub const ERROR_RESOURCES_UNAVAILABLE: &str = "error.resources_unavailable";
    pub const INVALID_SELECTION_RETRY: &str = "error.invalid_selection_retry";

    pub const MENU_TITLE: &str = "menu.title";
    pub const MENU_PREDICT: &str = "menu.predict";
    pub const MENU_CHANGE_LANGUAGE: &str = "menu.change_language";
    pub const MENU_EXIT: &str = "menu.exit";
    pub const MENU_SELECT: &str = "menu.select";
    pub const MENU_SYMPTOM_PROMPT: &str = "menu.symptom_prompt";

    pub const GUI_OPEN_DATA_DIR: &str = "gui.open_data_dir";
    pub const GUI_OPEN_DATA_DIR_TIP: &str = "gui.open_data_dir_tip";
    pub const GUI_DATA_DIR: &str = "gui.data_dir";
    pub const GUI_RELOAD: &str = "gui.reload";
    pub const GUI_FONT: &str = "gui.font";

    /// 증상 선택 칸 네 개의 라벨 키. 순서가 곧 증상 열 순서다.
    pub const SYMPTOM_LABELS: [&str; 4] = [
        FORM_MAIN_SYMPTOM,
        FORM_SECOND_SYMPTOM,
        FORM_THIRD_SYMPTOM,
        FORM_FOURTH_SYMPTOM,
    ];
}

/// 지원 언어. 프로필 테이블의 키로도 쓰인다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Language {
    English,
    Vietnamese,
}

impl Language {
    /// 화면의 언어 선택 상자에 표시되는 순서.
    pub const ALL: [Language; 2] = [Language::English, Language::Vietnamese];

    /// 선택 상자 값("English"/"Vietnamese") 또는 언어 코드(en, vi-VN 등)를 해석한다.
    pub fn from_selector(value: &str) -> Option<Self> {
        normalize_lang(value)
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Vietnamese => "vi",
        }
    }

    /// 선택 상자에 표시되는 이름.
    pub fn selector(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Vietnamese => "Vietnamese",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.selector())
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    strings: HashMap<String, String>,
    fallback: HashMap<String, String>,
}

impl Translator {
    /// 내장 언어팩만으로 번역기를 생성한다.
    pub fn new(lang: Language) -> Self {
        Self::new_with_pack(lang, None)
    }

    /// 언어 + 언어팩 디렉터리(locales/ 등)를 받아서 번역기를 생성한다.
    /// 언어팩 파일의 키는 같은 언어의 내장 문자열 위에 덮어쓴다.
    pub fn new_with_pack(lang: Language, pack_dir: Option<&str>) -> Self {
        let mut strings = built_in_pack(lang).unwrap_or_default();
        if let Some(overrides) = pack_dir.and_then(|dir| load_overrides(dir, lang.as_code())) {
            strings.extend(overrides);
        }
        Self {
            lang,
            strings,
            fallback: built_in_pack(Language::English).unwrap_or_default(),
        }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    /// 키를 조회해 문자열을 반환한다. 언어팩에 없으면 None.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.strings.get(key).map(String::as_str)
    }

    /// 번역을 가져온다. 없으면 영어 문자열, 그마저 없으면 키 자체를 돌려준다.
    pub fn t(&self, key: &str) -> String {
        self.lookup(key)
            .or_else(|| self.fallback.get(key).map(String::as_str))
            .unwrap_or(key)
            .to_string()
    }
}

/// CLI 플래그/설정/시스템 순으로 언어를 결정한다.
pub fn resolve_language(cli_arg: &str, config_lang: Option<&str>) -> Language {
    normalize_lang(cli_arg)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or(Language::English)
}

fn normalize_lang(code: &str) -> Option<Language> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "auto" | "" => None,
        "english" => Some(Language::English),
        "vietnamese" | "tiếng việt" => Some(Language::Vietnamese),
        other => normalize_locale_string(other),
    }
}

fn normalize_locale_string(loc: &str) -> Option<Language> {
    let lang = loc
        .split(['.', '_', '-'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match lang.as_str() {
        "en" => Some(Language::English),
        "vi" => Some(Language::Vietnamese),
        _ => None,
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<Language> {
    if let Some(lang) = get_locale().as_deref().and_then(normalize_locale_string) {
        return Some(lang);
    }
    for var in ["LANG", "LC_ALL"] {
        if let Ok(value) = std::env::var(var) {
            if let Some(lang) = normalize_locale_string(&value) {
                return Some(lang);
            }
        }
    }
    None
}

/// TOML 기반 언어팩을 로드한다. 형식: [section] key = "value" 를 "section.key"로 펼친다.
fn load_overrides(dir: &str, code: &str) -> Option<HashMap<String, String>> {
    let path = Path::new(dir).join(format!("{code}.toml"));
    let content = fs::read_to_string(&path).ok()?;
    let map = parse_toml_to_map(&content);
    if map.is_none() {
        tracing::warn!(path = %path.display(), "language pack is empty or invalid, using built-in strings");
    }
    map
}

fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let value: toml::Value = toml::from_str(src).ok()?;
    let table = value.as_table()?;
    let mut map = HashMap::new();

    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.to_string());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&key, v, out);
                }
            }
            _ => {}
        }
    }

    for (k, v) in table {
        walk(k, v, &mut map);
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

/// 내장 언어팩(파일이 없어도 동작하도록 빌드 시 포함).
fn built_in_pack(lang: Language) -> Option<HashMap<String, String>> {
    match lang {
        Language::English => parse_toml_to_map(include_str!("../locales/en.toml")),
        Language::Vietnamese => parse_toml_to_map(include_str!("../locales/vi.toml")),
    }
}
