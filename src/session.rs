//! 사용자 세션 상태 머신.
//!
//! 언어 선택 → 자원 로드 중 → (성공) 폼 준비 / (실패) 자원 없음.
//! 폼에서 제출하면 결과 표시 상태가 되고, 제출할 때마다 결과를 새로 만든다.
//! 언어를 바꾸면 이전 선택과 예측을 모두 버리고 로드부터 다시 시작한다.

use std::path::PathBuf;

use crate::i18n::{keys, Language, Translator};
use crate::loader::{self, LoadError, Resources};
use crate::lookup::{self, normalize_label, DiseaseInfo};
use crate::model::Symptoms;
use crate::profile::{ProfileTable, SYMPTOM_SLOTS};
use crate::tables::MISSING_PLACEHOLDER;

/// 화면이 보여줄 단계.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    ResourcesLoading,
    ResourcesUnavailable,
    FormReady,
    ResultDisplayed,
}

/// 한 번의 제출 결과. 세션 밖으로 저장되지 않는다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionResult {
    /// 모델이 돌려준 라벨 그대로.
    pub label: String,
    pub normalized: String,
    /// 설명 테이블과 일치하지 않으면 None(오류 아님).
    pub info: Option<DiseaseInfo>,
}

impl PredictionResult {
    /// 번호가 붙은 예방 수칙 목록.
    pub fn precaution_lines(&self, tr: &Translator) -> Vec<String> {
        match &self.info {
            Some(info) => lookup::numbered_precautions(&tr.t(keys::RESULT_PRECAUTION), &info.precautions),
            None => Vec::new(),
        }
    }

    /// 결과 영역에 표시할 줄들. 일치하는 설명이 없으면 예측 줄만 남는다.
    pub fn render_lines(&self, tr: &Translator) -> Vec<String> {
        let mut lines = vec![format!("{}: {}", tr.t(keys::RESULT_PREDICTION), self.label)];
        if let Some(info) = &self.info {
            lines.push(format!("{}: {}", tr.t(keys::RESULT_PREDICTED_DISEASE), self.normalized));
            lines.push(format!("{}: {}", tr.t(keys::RESULT_DESCRIPTION_LABEL), info.description));
            lines.push(format!("{}:", tr.t(keys::RESULT_RECOMMENDATIONS)));
            lines.extend(self.precaution_lines(tr));
        }
        lines
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("자원이 없어 예측할 수 없습니다")]
    Unavailable,
    #[error("증상 칸 번호가 범위를 벗어났습니다: {0}")]
    SlotOutOfRange(usize),
}

#[derive(Debug)]
enum State {
    Loading,
    Unavailable(LoadError),
    Ready {
        resources: Resources,
        options: [Vec<String>; SYMPTOM_SLOTS],
        last: Option<PredictionResult>,
    },
}

/// 현재 프로필, 로드된 자원, 마지막 예측을 묶은 세션 컨텍스트.
#[derive(Debug)]
pub struct Session {
    profiles: ProfileTable,
    language: Language,
    labels: Translator,
    state: State,
    selections: Symptoms,
}

fn empty_selections() -> Symptoms {
    std::array::from_fn(|_| MISSING_PLACEHOLDER.to_string())
}

impl Session {
    /// 세션을 만들고 곧바로 언어를 선택(로드)한다.
    pub fn new(profiles: ProfileTable, language: Language) -> Self {
        let mut session = Self {
            profiles,
            language,
            labels: Translator::new(language),
            state: State::Loading,
            selections: empty_selections(),
        };
        session.select_language(language);
        session
    }

    /// 언어를 선택한다. 이전 자원, 선택, 예측은 모두 버린다.
    pub fn select_language(&mut self, language: Language) {
        tracing::info!(%language, "language selected");
        self.language = language;
        self.state = State::Loading;
        self.selections = empty_selections();
        let Some(profile) = self.profiles.profile(language) else {
            self.labels = Translator::new(language);
            let err = LoadError::Unexpected {
                path: self.profiles.data_dir().to_path_buf(),
                message: format!("no profile configured for {language}"),
            };
            tracing::warn!(error = %err, "resources unavailable");
            self.state = State::Unavailable(err);
            return;
        };
        self.labels = profile.labels.clone();

        self.state = match loader::load_resources(&profile) {
            Ok(resources) => {
                let options = std::array::from_fn(|slot| resources.training.symptom_options(slot));
                State::Ready {
                    resources,
                    options,
                    last: None,
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "resources unavailable");
                State::Unavailable(err)
            }
        };
        if let State::Ready { options, .. } = &self.state {
            // 선택 상자 기본값은 각 목록의 첫 항목
            for (slot, opts) in options.iter().enumerate() {
                if let Some(first) = opts.first() {
                    self.selections[slot] = first.clone();
                }
            }
        }
    }

    /// 같은 언어로 다시 로드한다.
    pub fn reload(&mut self) {
        self.select_language(self.language);
    }

    /// 데이터 디렉터리를 바꾸고 다시 로드한다.
    pub fn set_data_dir(&mut self, data_dir: impl Into<PathBuf>) {
        self.profiles.set_data_dir(data_dir);
        self.reload();
    }

    pub fn data_dir(&self) -> &std::path::Path {
        self.profiles.data_dir()
    }

    pub fn languages(&self) -> Vec<Language> {
        self.profiles.languages().collect()
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// 현재 언어의 화면 문자열.
    pub fn labels(&self) -> &Translator {
        &self.labels
    }

    pub fn phase(&self) -> Phase {
        match &self.state {
            State::Loading => Phase::ResourcesLoading,
            State::Unavailable(_) => Phase::ResourcesUnavailable,
            State::Ready { last: None, .. } => Phase::FormReady,
            State::Ready { last: Some(_), .. } => Phase::ResultDisplayed,
        }
    }

    pub fn load_error(&self) -> Option<&LoadError> {
        match &self.state {
            State::Unavailable(err) => Some(err),
            _ => None,
        }
    }

    /// slot 번째 증상 선택지. 자원이 없으면 빈 목록.
    pub fn symptom_options(&self, slot: usize) -> &[String] {
        match &self.state {
            State::Ready { options, .. } => options.get(slot).map(Vec::as_slice).unwrap_or(&[]),
            _ => &[],
        }
    }

    pub fn selection(&self, slot: usize) -> Option<&str> {
        self.selections.get(slot).map(String::as_str)
    }

    pub fn set_selection(&mut self, slot: usize, value: impl Into<String>) -> Result<(), SessionError> {
        let cell = self
            .selections
            .get_mut(slot)
            .ok_or(SessionError::SlotOutOfRange(slot))?;
        *cell = value.into();
        Ok(())
    }

    pub fn last_prediction(&self) -> Option<&PredictionResult> {
        match &self.state {
            State::Ready { last, .. } => last.as_ref(),
            _ => None,
        }
    }

    /// 현재 선택으로 예측한다. 이전 결과는 새 결과로 교체된다.
    pub fn submit(&mut self) -> Result<&PredictionResult, SessionError> {
        let State::Ready { resources, last, .. } = &mut self.state else {
            return Err(SessionError::Unavailable);
        };
        let label = resources.classifier.predict(&self.selections);
        let info = lookup::lookup_disease(&label, &resources.descriptions, &resources.precautions);
        tracing::info!(
            symptoms = ?self.selections,
            %label,
            matched = info.is_some(),
            "prediction"
        );
        let result = PredictionResult {
            normalized: normalize_label(&label),
            label,
            info,
        };
        Ok(last.insert(result))
    }

    /// 네 증상을 한꺼번에 지정해서 예측한다.
    pub fn submit_symptoms(&mut self, symptoms: Symptoms) -> Result<&PredictionResult, SessionError> {
        if matches!(self.state, State::Ready { .. }) {
            self.selections = symptoms;
        }
        self.submit()
    }
}

/// 로드 오류를 현재 언어의 메시지로 만든다.
pub fn describe_load_error(err: &LoadError, tr: &Translator) -> String {
    match err {
        LoadError::NotFound { path } => format!("{}: {}", tr.t(keys::ERROR_NOT_FOUND), path.display()),
        LoadError::Parse { path, message } => {
            format!("{} ({}): {message}", tr.t(keys::ERROR_PARSE), path.display())
        }
        LoadError::Unexpected { path, message } => {
            format!("{} ({}): {message}", tr.t(keys::ERROR_UNEXPECTED), path.display())
        }
    }
}
