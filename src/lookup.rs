//! 예측된 질병 이름으로 설명/예방 수칙을 찾는다.
//! 비교는 양쪽 모두 공백 제거 + 소문자 변환 후에만 한다(악센트/구두점은 그대로).

use crate::tables::{DescriptionTable, PrecautionTable};

/// 라벨 정규화: 앞뒤 공백 제거 후 소문자.
pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

/// 설명 테이블에서 찾은 질병 정보. 일치하는 설명이 없으면 만들어지지 않는다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiseaseInfo {
    pub description: String,
    pub precautions: Vec<String>,
}

/// 설명이 일치할 때만 예방 수칙까지 묶어서 돌려준다. 불일치는 오류가 아니라 None이다.
pub fn lookup_disease(
    label: &str,
    descriptions: &DescriptionTable,
    precautions: &PrecautionTable,
) -> Option<DiseaseInfo> {
    let description = descriptions.describe(label)?;
    Some(DiseaseInfo {
        description: description.to_string(),
        precautions: precautions
            .precautions(label)
            .into_iter()
            .map(str::to_string)
            .collect(),
    })
}

/// "{prefix} {n}: {text}" 형태의 번호 목록. 번호는 1부터 끊김 없이 이어지고 빈 항목은 번호를 받지 않는다.
pub fn numbered_precautions<S: AsRef<str>>(prefix: &str, items: &[S]) -> Vec<String> {
    let mut out = Vec::new();
    for item in items {
        let text: &str = item.as_ref();
        if text.is_empty() {
            continue;
        }
        out.push(format!("{prefix} {}: {text}", out.len() + 1));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_is_idempotent() {
        for label in ["  Malaria ", "Sốt Rét", "common cold", "\tAIDS\n"] {
            let once = normalize_label(label);
            assert_eq!(normalize_label(&once), once);
        }
    }

    #[test]
    fn normalization_keeps_diacritics() {
        assert_eq!(normalize_label(" Sốt Rét "), "sốt rét");
        assert_ne!(normalize_label("Sốt rét"), normalize_label("Sot ret"));
    }

    #[test]
    fn numbering_continues_across_rows_and_skips_empties() {
        let flattened = ["rest", "", "hydrate", "", "see doctor"];
        let lines = numbered_precautions("Precaution", &flattened);
        assert_eq!(
            lines,
            vec![
                "Precaution 1: rest",
                "Precaution 2: hydrate",
                "Precaution 3: see doctor",
            ]
        );
    }

    #[test]
    fn precaution_block_requires_description_match() {
        let desc = DescriptionTable::from_reader("Disease,Description\nFlu,viral\n".as_bytes(), "Disease", "Description")
            .expect("desc");
        let prec = PrecautionTable::from_reader("Disease,Precaution_1\nCold,rest\n".as_bytes(), "Disease")
            .expect("prec");
        assert!(lookup_disease("Cold", &desc, &prec).is_none());
        let info = lookup_disease("FLU", &desc, &prec).expect("flu");
        assert_eq!(info.description, "viral");
        assert!(info.precautions.is_empty());
    }
}
