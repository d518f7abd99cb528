//! 가격 시계열 제공자.
//!
//! 외부 소스에서 종목별 일간 종가 시계열을 가져오는 트레잇과 구현체입니다.
//!
//! - [`YahooPriceProvider`]: Yahoo Finance 일봉 종가
//! - [`CsvPriceProvider`]: `download` 명령으로 저장한 로컬 CSV

mod csv_file;
mod yahoo;

pub use self::csv_file::{read_series_csv, series_csv_path, write_series_csv, CsvPriceProvider};
pub use self::yahoo::YahooPriceProvider;

use async_trait::async_trait;
use chrono::NaiveDate;
use perf_core::{Instrument, RawSeries};

use crate::error::Result;

/// 가격 시계열 제공자 트레잇.
///
/// 반환하는 시계열은 날짜 오름차순이어야 합니다.
#[async_trait]
pub trait PriceSeriesProvider: Send + Sync {
    /// 로그에 표시할 제공자 이름.
    fn name(&self) -> &'static str;

    /// `[start, end]` 구간의 일간 종가 시계열을 가져옵니다.
    async fn fetch_series(
        &self,
        instrument: Instrument,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RawSeries>;
}
