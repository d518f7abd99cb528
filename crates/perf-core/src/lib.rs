//! # Perf Core
//!
//! 지수 성과 분석 시스템의 핵심 도메인 타입을 제공합니다.
//!
//! 이 크레이트는 시스템 전반에서 사용되는 기본 타입을 제공합니다:
//! - 입력 종목 및 출력 시리즈 열거형 (`Instrument`, `OutputSeries`)
//! - 가격 시계열 (`PricePoint`, `RawSeries`)
//! - 조회 기간 (`DateRange`)
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use types::*;
