//! 증상 기반 질병 예측 로직을 라이브러리로 분리하여 CLI와 GUI가 같은 세션 모델을 쓰게 한다.

pub mod app;
pub mod config;
pub mod i18n;
pub mod loader;
pub mod lookup;
pub mod model;
pub mod profile;
pub mod session;
pub mod tables;
pub mod ui_cli;
