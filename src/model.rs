//! 사전 학습된 그래디언트 부스팅 분류기(대칭/oblivious 결정트리 앙상블) 평가기.
//!
//! 모델 파일은 JSON이다.
//! - `classes`: 질병 라벨 목록
//! - `bias`: 클래스별 초기 점수 (생략 시 0)
//! - `trees`: 각 트리는 깊이만큼의 `splits`(`feature` 0..3, `value` 증상 토큰)와
//!   2^깊이 개의 `leaf_values`(클래스별 점수)를 가진다.
//!
//! i번째 분할이 참이면 리프 인덱스의 i번째 비트가 켜진다. 예측은 bias + 리프 점수 합의 argmax이며
//! 동점이면 앞선 클래스가 이긴다.

use serde::Deserialize;
use std::io::Read;

use crate::profile::SYMPTOM_SLOTS;

/// 순서가 있는 증상 4개. 빈 칸은 "none".
pub type Symptoms = [String; SYMPTOM_SLOTS];

/// 허용하는 최대 트리 깊이(리프 2^16개).
pub const MAX_TREE_DEPTH: usize = 16;

/// 증상 4개를 받아 질병 라벨 하나를 돌려주는 예측기.
pub trait Classifier: std::fmt::Debug {
    fn predict(&self, symptoms: &Symptoms) -> String;

    /// 모델이 낼 수 있는 라벨 목록.
    fn classes(&self) -> &[String];
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("모델 파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("모델 JSON 파싱 오류: {0}")]
    Json(#[from] serde_json::Error),
    #[error("잘못된 모델 구조: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Split {
    pub feature: usize,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ObliviousTree {
    pub splits: Vec<Split>,
    pub leaf_values: Vec<Vec<f64>>,
}

impl ObliviousTree {
    fn leaf_index(&self, symptoms: &Symptoms) -> usize {
        self.splits
            .iter()
            .enumerate()
            .filter(|(_, s)| symptoms[s.feature] == s.value)
            .fold(0, |idx, (bit, _)| idx | (1 << bit))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BoostedClassifier {
    classes: Vec<String>,
    #[serde(default)]
    bias: Vec<f64>,
    trees: Vec<ObliviousTree>,
}

impl BoostedClassifier {
    /// 구조를 검증한 뒤 분류기를 만든다.
    pub fn new(classes: Vec<String>, bias: Vec<f64>, trees: Vec<ObliviousTree>) -> Result<Self, ModelError> {
        let model = Self { classes, bias, trees };
        model.validate()?;
        Ok(model)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ModelError> {
        let model: Self = serde_json::from_reader(reader)?;
        model.validate()?;
        Ok(model)
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    fn validate(&self) -> Result<(), ModelError> {
        let n = self.classes.len();
        if n == 0 {
            return Err(ModelError::Invalid("classes가 비어 있습니다".into()));
        }
        if !self.bias.is_empty() && self.bias.len() != n {
            return Err(ModelError::Invalid(format!(
                "bias 길이 {}가 클래스 수 {n}과 다릅니다",
                self.bias.len()
            )));
        }
        for (t, tree) in self.trees.iter().enumerate() {
            let depth = tree.splits.len();
            if depth > MAX_TREE_DEPTH {
                return Err(ModelError::Invalid(format!("트리 {t}: 깊이 {depth} 초과")));
            }
            if let Some(s) = tree.splits.iter().find(|s| s.feature >= SYMPTOM_SLOTS) {
                return Err(ModelError::Invalid(format!(
                    "트리 {t}: feature {} 범위 밖",
                    s.feature
                )));
            }
            if tree.leaf_values.len() != 1 << depth {
                return Err(ModelError::Invalid(format!(
                    "트리 {t}: 리프 {}개, 필요 {}개",
                    tree.leaf_values.len(),
                    1usize << depth
                )));
            }
            if tree.leaf_values.iter().any(|leaf| leaf.len() != n) {
                return Err(ModelError::Invalid(format!("트리 {t}: 리프 점수 길이가 클래스 수와 다릅니다")));
            }
        }
        Ok(())
    }

    /// 클래스별 누적 점수.
    pub fn scores(&self, symptoms: &Symptoms) -> Vec<f64> {
        let mut scores = if self.bias.is_empty() {
            vec![0.0; self.classes.len()]
        } else {
            self.bias.clone()
        };
        for tree in &self.trees {
            let leaf = &tree.leaf_values[tree.leaf_index(symptoms)];
            for (acc, v) in scores.iter_mut().zip(leaf) {
                *acc += v;
            }
        }
        scores
    }
}

impl Classifier for BoostedClassifier {
    fn predict(&self, symptoms: &Symptoms) -> String {
        let scores = self.scores(symptoms);
        let mut best = 0;
        for (i, s) in scores.iter().enumerate().skip(1) {
            if *s > scores[best] {
                best = i;
            }
        }
        self.classes[best].clone()
    }

    fn classes(&self) -> &[String] {
        &self.classes
    }
}
