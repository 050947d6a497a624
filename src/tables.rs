//! 구분자 텍스트(CSV) 테이블 로더.
//! 열 개수가 헤더보다 많은 행이나 디코딩할 수 없는 행은 건너뛰고, 짧은 행은 결측값으로 채운다.

use std::io::Read;

use crate::lookup::normalize_label;
use crate::profile::SYMPTOM_SLOTS;

/// 학습 테이블의 결측값을 대신하는 문자열.
pub const MISSING_PLACEHOLDER: &str = "none";

/// 학습 테이블 구분자.
pub const TRAINING_DELIMITER: u8 = b';';
/// 설명/예방 테이블 구분자.
pub const LOOKUP_DELIMITER: u8 = b',';

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("CSV 오류: {0}")]
    Csv(#[from] csv::Error),
    #[error("필수 열이 없습니다: {0}")]
    MissingColumn(String),
    #[error("데이터 행이 없습니다")]
    Empty,
}

impl TableError {
    /// 구조 문제가 아니라 읽기 자체가 실패한 경우.
    pub fn is_io_error(&self) -> bool {
        matches!(self, TableError::Csv(e) if e.is_io_error())
    }
}

/// 헤더와 행으로 나눈 원시 테이블. 빈 칸은 None.
#[derive(Debug)]
struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    fn read<R: Read>(reader: R, delimiter: u8) -> Result<Self, TableError> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        let mut skipped = 0usize;
        for (idx, record) in rdr.records().enumerate() {
            let record = match record {
                Ok(r) => r,
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    tracing::warn!(row = idx + 1, error = %e, "skipping malformed row");
                    skipped += 1;
                    continue;
                }
            };
            if record.len() > headers.len() {
                tracing::warn!(
                    row = idx + 1,
                    fields = record.len(),
                    expected = headers.len(),
                    "skipping row with too many fields"
                );
                skipped += 1;
                continue;
            }
            let row = (0..headers.len())
                .map(|i| record.get(i).filter(|v| !v.is_empty()).map(str::to_string))
                .collect();
            rows.push(row);
        }
        if skipped > 0 {
            tracing::info!(skipped, kept = rows.len(), "malformed rows skipped");
        }
        Ok(Self { headers, rows })
    }

    fn column(&self, name: &str) -> Result<usize, TableError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    }

    fn ensure_rows(&self) -> Result<(), TableError> {
        if self.rows.is_empty() {
            Err(TableError::Empty)
        } else {
            Ok(())
        }
    }
}

/// 학습 데이터 한 행. 결측값은 "none"으로 채워져 있다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingRow {
    pub symptoms: [String; SYMPTOM_SLOTS],
    pub disease: String,
}

/// 증상 선택 목록을 만드는 데만 쓰는 학습 테이블.
#[derive(Debug, Clone, Default)]
pub struct TrainingTable {
    rows: Vec<TrainingRow>,
}

impl TrainingTable {
    /// 세미콜론 구분 텍스트를 읽는다.
    pub fn from_reader<R: Read>(
        reader: R,
        symptom_columns: &[String; SYMPTOM_SLOTS],
        disease_column: &str,
    ) -> Result<Self, TableError> {
        let raw = RawTable::read(reader, TRAINING_DELIMITER)?;
        let mut symptom_idx = [0usize; SYMPTOM_SLOTS];
        for (slot, name) in symptom_columns.iter().enumerate() {
            symptom_idx[slot] = raw.column(name)?;
        }
        let disease_idx = raw.column(disease_column)?;
        raw.ensure_rows()?;

        let fill = |v: &Option<String>| v.clone().unwrap_or_else(|| MISSING_PLACEHOLDER.to_string());
        let rows = raw
            .rows
            .iter()
            .map(|row| TrainingRow {
                symptoms: symptom_idx.map(|i| fill(&row[i])),
                disease: fill(&row[disease_idx]),
            })
            .collect();
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[TrainingRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// slot 번째 증상 열의 고유값을 처음 나온 순서대로 반환한다.
    pub fn symptom_options(&self, slot: usize) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for row in &self.rows {
            if let Some(value) = row.symptoms.get(slot) {
                if !out.contains(value) {
                    out.push(value.clone());
                }
            }
        }
        out
    }
}

/// 질병 설명 한 행. label은 정규화(trim + 소문자)된 값이다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionEntry {
    pub label: String,
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct DescriptionTable {
    entries: Vec<DescriptionEntry>,
}

impl DescriptionTable {
    /// 쉼표 구분 텍스트를 읽는다. 질병 이름이 빈 행은 어떤 예측과도 맞지 않으므로 버린다.
    pub fn from_reader<R: Read>(
        reader: R,
        disease_column: &str,
        description_column: &str,
    ) -> Result<Self, TableError> {
        let raw = RawTable::read(reader, LOOKUP_DELIMITER)?;
        let label_idx = raw.column(disease_column)?;
        let desc_idx = raw.column(description_column)?;
        let entries: Vec<DescriptionEntry> = raw
            .rows
            .iter()
            .filter_map(|row| {
                let label = row[label_idx].as_deref()?;
                Some(DescriptionEntry {
                    label: normalize_label(label),
                    description: row[desc_idx].clone().unwrap_or_default(),
                })
            })
            .collect();
        if entries.is_empty() {
            return Err(TableError::Empty);
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 정규화한 라벨이 일치하는 첫 행의 설명.
    pub fn describe(&self, label: &str) -> Option<&str> {
        let key = normalize_label(label);
        self.entries
            .iter()
            .find(|e| e.label == key)
            .map(|e| e.description.as_str())
    }
}

/// 예방 수칙 한 행. 빈 문자열도 그대로 보관하고 출력할 때 건너뛴다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecautionEntry {
    pub label: String,
    pub precautions: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PrecautionTable {
    entries: Vec<PrecautionEntry>,
}

impl PrecautionTable {
    /// 쉼표 구분 텍스트를 읽는다. 질병 열을 제외한 모든 열이 순서대로 예방 수칙이다.
    pub fn from_reader<R: Read>(reader: R, disease_column: &str) -> Result<Self, TableError> {
        let raw = RawTable::read(reader, LOOKUP_DELIMITER)?;
        let label_idx = raw.column(disease_column)?;
        let entries: Vec<PrecautionEntry> = raw
            .rows
            .iter()
            .filter_map(|row| {
                let label = row[label_idx].as_deref()?;
                let precautions = row
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != label_idx)
                    .map(|(_, v)| v.clone().unwrap_or_default())
                    .collect();
                Some(PrecautionEntry {
                    label: normalize_label(label),
                    precautions,
                })
            })
            .collect();
        if entries.is_empty() {
            return Err(TableError::Empty);
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 라벨이 일치하는 모든 행의 예방 수칙을 순서대로 펼친다. 빈 문자열은 제외한다.
    pub fn precautions(&self, label: &str) -> Vec<&str> {
        let key = normalize_label(label);
        self.entries
            .iter()
            .filter(|e| e.label == key)
            .flat_map(|e| e.precautions.iter())
            .map(String::as_str)
            .filter(|p| !p.is_empty())
            .collect()
    }
}
