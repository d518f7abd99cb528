//! CLI 명령어 구현 모듈.

pub mod common;
pub mod curve;
pub mod download;
pub mod interactive;
pub mod scrape;
pub mod summary;

// 각 서브모듈 직접 사용 권장 (ambiguous re-export 방지)
