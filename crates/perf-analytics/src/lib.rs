//! 지수 성과 분석 엔진.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 거래일 정렬 (합집합 달력 + forward-fill)
//! - 기준 통화(CHF) 환산
//! - 기간별 성과 뷰 (기준 100 정규화 곡선, CAGR, 100 CHF 투자 최종 가치)
//! - 프로세스 수명 동안 공유되는 읽기 전용 데이터셋
//!
//! # 데이터 흐름
//!
//! ```text
//! SeriesStore → Aligner → CurrencyConverter → PerformanceDataset → RangeView(range)
//! ```
//!
//! # Re-exports
//!
//! - [`alignment`]: `Aligner`, `AlignedTable`
//! - [`conversion`]: `CurrencyConverter`, `ConvertedTable`
//! - [`range_view`]: `RangeView`, `NormalizedCurve`, `CagrResult`, `FinalValue`
//! - [`dataset`]: `PerformanceDataset`

pub mod alignment;
pub mod conversion;
pub mod dataset;
pub mod error;
pub mod range_view;

pub use alignment::{AlignedTable, Aligner};
pub use conversion::{ConvertedTable, CurrencyConverter};
pub use dataset::PerformanceDataset;
pub use error::{AlignError, AnalyticsResult};
pub use range_view::{
    calculate_cagr, calculate_final_value, normalize, CagrResult, ColumnView, CurvePoint,
    FinalValue, NormalizedCurve, RangeView, DAYS_PER_YEAR, NORMALIZATION_BASE,
};
