//! 핵심 계산 로직을 라이브러리로 분리하여 CLI와 GUI가 같이 쓴다.

pub mod app;
pub mod config;
pub mod duct;
pub mod i18n;
pub mod report;
pub mod ui_cli;
