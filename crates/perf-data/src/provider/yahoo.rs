//! Yahoo Finance 일간 종가 제공자.

use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate, TimeZone, Utc};
use perf_core::{Instrument, PricePoint, RawSeries};
use time::OffsetDateTime;
use tracing::debug;

use super::PriceSeriesProvider;
use crate::error::{DataError, Result};

/// Yahoo Finance 제공자.
pub struct YahooPriceProvider {
    connector: yahoo_finance_api::YahooConnector,
}

impl YahooPriceProvider {
    /// 새 제공자를 생성합니다.
    pub fn new() -> Result<Self> {
        let connector = yahoo_finance_api::YahooConnector::new()
            .map_err(|e| DataError::FetchError(format!("Yahoo Finance 연결 실패: {}", e)))?;
        Ok(Self { connector })
    }
}

#[async_trait]
impl PriceSeriesProvider for YahooPriceProvider {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    async fn fetch_series(
        &self,
        instrument: Instrument,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RawSeries> {
        // Yahoo의 종료 시각은 배타적이므로 하루를 더함
        let start_dt = naive_date_to_offset_datetime(start)?;
        let end_dt = naive_date_to_offset_datetime(end + Duration::days(1))?;

        debug!(
            instrument = %instrument,
            ticker = ticker,
            start = %start,
            end = %end,
            "Yahoo Finance API 날짜 범위 호출"
        );

        let response = self
            .connector
            .get_quote_history_interval(ticker, start_dt, end_dt, "1d")
            .await
            .map_err(|e| DataError::FetchError(format!("Yahoo Finance API 오류 ({}): {}", ticker, e)))?;

        let quotes = response
            .quotes()
            .map_err(|e| DataError::ParseError(format!("Quote 파싱 오류: {}", e)))?;

        // 거래소 현지 날짜로 변환
        let gmt_offset = response
            .metadata()
            .map(|m| i64::from(m.gmtoffset))
            .unwrap_or(0);

        let mut points: Vec<PricePoint> = quotes
            .iter()
            .filter_map(|q| {
                let date = Utc
                    .timestamp_opt(q.timestamp as i64 + gmt_offset, 0)
                    .single()?
                    .date_naive();
                Some(to_point(date, q.close))
            })
            .filter(|p| p.date >= start && p.date <= end)
            .collect();

        points.sort_by_key(|p| p.date);

        Ok(RawSeries::new(points))
    }
}

/// 0 이하 또는 비유한 종가는 결측으로 취급합니다.
fn to_point(date: NaiveDate, close: f64) -> PricePoint {
    if close.is_finite() && close > 0.0 {
        PricePoint::new(date, close)
    } else {
        PricePoint::missing(date)
    }
}

/// NaiveDate를 OffsetDateTime으로 변환.
fn naive_date_to_offset_datetime(date: NaiveDate) -> Result<OffsetDateTime> {
    let month = u8::try_from(date.month())
        .ok()
        .and_then(|m| time::Month::try_from(m).ok())
        .ok_or_else(|| DataError::InvalidData(format!("잘못된 월: {}", date)))?;
    let day = u8::try_from(date.day())
        .map_err(|_| DataError::InvalidData(format!("잘못된 일: {}", date)))?;

    let date = time::Date::from_calendar_date(date.year(), month, day)
        .map_err(|e| DataError::InvalidData(format!("날짜 변환 실패 ({}): {}", date, e)))?;

    Ok(date.midnight().assume_utc())
}
