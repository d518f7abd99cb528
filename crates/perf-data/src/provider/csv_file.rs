//! 로컬 CSV 가격 제공자.
//!
//! 파일 형식은 종목당 하나의 `<data_dir>/<KEY>.csv`이며 헤더는 `date,close`입니다.
//! 종가가 비어 있는 행은 결측 관측치로 읽습니다.
//!
//! ```text
//! date,close
//! 2020-01-02,13385.93
//! 2020-01-03,
//! ```

use async_trait::async_trait;
use chrono::NaiveDate;
use perf_core::{Instrument, PricePoint, RawSeries};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::PriceSeriesProvider;
use crate::error::{DataError, Result};

/// CSV 한 행.
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    close: Option<f64>,
}

/// 종목의 CSV 파일 경로.
pub fn series_csv_path(data_dir: &Path, instrument: Instrument) -> PathBuf {
    data_dir.join(format!("{}.csv", instrument.key()))
}

/// CSV 텍스트를 시계열로 파싱합니다.
///
/// 날짜 순서는 검증하지 않습니다. 저장소에 넣을 때 검증됩니다.
pub fn read_series_csv<R: std::io::Read>(reader: R) -> Result<RawSeries> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut points = Vec::new();

    for row in csv_reader.deserialize::<CsvRow>() {
        let row = row?;
        points.push(match row.close {
            Some(close) => PricePoint::new(row.date, close),
            None => PricePoint::missing(row.date),
        });
    }

    Ok(RawSeries::new(points))
}

/// 시계열을 CSV 파일로 저장합니다.
pub fn write_series_csv(path: &Path, series: &RawSeries) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    for point in series.points() {
        writer.serialize(CsvRow {
            date: point.date,
            close: point.valid_price(),
        })?;
    }

    writer.flush()?;
    Ok(())
}

/// 로컬 CSV 제공자.
#[derive(Debug, Clone)]
pub struct CsvPriceProvider {
    data_dir: PathBuf,
}

impl CsvPriceProvider {
    /// 데이터 디렉토리로 제공자를 생성합니다.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }
}

#[async_trait]
impl PriceSeriesProvider for CsvPriceProvider {
    fn name(&self) -> &'static str {
        "csv"
    }

    async fn fetch_series(
        &self,
        instrument: Instrument,
        _ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RawSeries> {
        let path = series_csv_path(&self.data_dir, instrument);
        debug!(path = %path.display(), "CSV 시계열 읽기");

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DataError::NotFound(format!(
                    "{} ({})",
                    path.display(),
                    instrument
                )));
            }
            Err(e) => return Err(e.into()),
        };

        let series = read_series_csv(content.as_bytes())?;

        Ok(series
            .points()
            .iter()
            .copied()
            .filter(|p| p.date >= start && p.date <= end)
            .collect())
    }
}
