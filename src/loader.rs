//! 언어 프로필에 따라 모델과 세 테이블을 읽는다.
//! 하나라도 실패하면 전체를 버리고 오류만 돌려준다(부분 로드 없음).

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use crate::model::{BoostedClassifier, Classifier, ModelError};
use crate::profile::LanguageProfile;
use crate::tables::{DescriptionTable, PrecautionTable, TableError, TrainingTable};

/// 로드 실패 분류. 모두 화면에 표시되고 예측 폼을 비활성화한다.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("파일을 찾을 수 없습니다: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("{} 파싱 오류: {message}", path.display())]
    Parse { path: PathBuf, message: String },
    #[error("{} 로드 중 예기치 않은 오류: {message}", path.display())]
    Unexpected { path: PathBuf, message: String },
}

impl LoadError {
    pub fn path(&self) -> &Path {
        match self {
            LoadError::NotFound { path }
            | LoadError::Parse { path, .. }
            | LoadError::Unexpected { path, .. } => path,
        }
    }

    fn from_io(path: &Path, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            LoadError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            LoadError::Unexpected {
                path: path.to_path_buf(),
                message: err.to_string(),
            }
        }
    }

    fn from_table(path: &Path, err: TableError) -> Self {
        let message = err.to_string();
        if err.is_io_error() {
            LoadError::Unexpected {
                path: path.to_path_buf(),
                message,
            }
        } else {
            LoadError::Parse {
                path: path.to_path_buf(),
                message,
            }
        }
    }

    fn from_model(path: &Path, err: ModelError) -> Self {
        match err {
            ModelError::Io(e) => Self::from_io(path, e),
            ModelError::Json(e) if e.is_io() => LoadError::Unexpected {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
            other => LoadError::Parse {
                path: path.to_path_buf(),
                message: other.to_string(),
            },
        }
    }
}

/// 한 언어 세션이 쓰는 자원 전체. 항상 모두 채워진 상태로만 존재한다.
#[derive(Debug)]
pub struct Resources {
    pub classifier: Box<dyn Classifier>,
    pub training: TrainingTable,
    pub descriptions: DescriptionTable,
    pub precautions: PrecautionTable,
}

fn open(path: &Path) -> Result<BufReader<File>, LoadError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| LoadError::from_io(path, e))
}

/// 프로필의 모델/학습/설명/예방 파일을 순서대로 읽는다.
pub fn load_resources(profile: &LanguageProfile) -> Result<Resources, LoadError> {
    let span = tracing::info_span!("load_resources", language = %profile.language);
    let _guard = span.enter();

    let model_path = &profile.model_path;
    let classifier = BoostedClassifier::from_reader(open(model_path)?)
        .map_err(|e| LoadError::from_model(model_path, e))?;

    let training_path = &profile.training_path;
    let training = TrainingTable::from_reader(
        open(training_path)?,
        &profile.symptom_columns,
        &profile.disease_column,
    )
    .map_err(|e| LoadError::from_table(training_path, e))?;

    let description_path = &profile.description_path;
    let descriptions = DescriptionTable::from_reader(
        open(description_path)?,
        &profile.disease_column,
        &profile.description_column,
    )
    .map_err(|e| LoadError::from_table(description_path, e))?;

    let precaution_path = &profile.precaution_path;
    let precautions = PrecautionTable::from_reader(open(precaution_path)?, &profile.disease_column)
        .map_err(|e| LoadError::from_table(precaution_path, e))?;

    tracing::info!(
        classes = classifier.classes().len(),
        trees = classifier.tree_count(),
        training_rows = training.len(),
        descriptions = descriptions.len(),
        precautions = precautions.len(),
        "resources loaded"
    );

    Ok(Resources {
        classifier: Box::new(classifier),
        training,
        descriptions,
        precautions,
    })
}
