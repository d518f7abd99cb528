//! 가격 시계열 저장 및 수집.
//!
//! 이 crate는 다음을 제공합니다:
//! - 종목별 원시 시계열 저장소 (`SeriesStore`)
//! - 가격 시계열 제공자 트레잇과 구현체 (Yahoo Finance, 로컬 CSV)
//! - SIX Swiss Exchange 지수 페이지 수집기

pub mod error;
pub mod provider;
pub mod six;
pub mod store;

pub use error::{DataError, Result};
pub use provider::{
    read_series_csv, series_csv_path, write_series_csv, CsvPriceProvider, PriceSeriesProvider,
    YahooPriceProvider,
};
pub use six::{extract_data_source_url, SixIndexCollector, SIX_BASE_URL, SMI_TR_PAGE_PATH};
pub use store::{load_store, SeriesStore};
