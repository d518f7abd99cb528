//! 종가 다운로드 명령어.
//!
//! Yahoo Finance에서 모든 종목의 일간 종가를 받아 `<KEY>.csv` 파일로 저장합니다.
//! 저장된 디렉토리는 `data.source = "csv"` 설정으로 다시 읽을 수 있습니다.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};
use perf_core::Instrument;
use perf_data::{series_csv_path, write_series_csv, PriceSeriesProvider, YahooPriceProvider};
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

/// 다운로드 설정.
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    /// (종목, 티커) 목록
    pub instruments: Vec<(Instrument, String)>,
    /// 시작 날짜
    pub start_date: NaiveDate,
    /// 종료 날짜
    pub end_date: NaiveDate,
    /// 출력 디렉토리
    pub output_dir: PathBuf,
}

/// 다운로드 결과 (종목, 저장 경로, 관측치 수).
pub type DownloadSummary = Vec<(Instrument, PathBuf, usize)>;

/// 모든 종목을 Yahoo Finance에서 다운로드합니다.
pub async fn download_all(config: &DownloadConfig) -> Result<DownloadSummary> {
    let provider = YahooPriceProvider::new()?;
    download_with(&provider, config).await
}

/// 지정한 제공자로 모든 종목을 다운로드합니다.
pub async fn download_with<P>(provider: &P, config: &DownloadConfig) -> Result<DownloadSummary>
where
    P: PriceSeriesProvider + ?Sized,
{
    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            config.output_dir.display()
        )
    })?;

    let pb = ProgressBar::new(config.instruments.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let mut summary = Vec::with_capacity(config.instruments.len());

    for (instrument, ticker) in &config.instruments {
        pb.set_message(format!("{} ({})", instrument, ticker));

        let series = provider
            .fetch_series(*instrument, ticker, config.start_date, config.end_date)
            .await
            .with_context(|| format!("Failed to fetch {} ({})", instrument, ticker))?;

        if series.is_empty() {
            warn!(instrument = %instrument, ticker = %ticker, "다운로드된 데이터가 없습니다");
        }

        let path = series_csv_path(&config.output_dir, *instrument);
        write_series_csv(&path, &series)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        info!(
            instrument = %instrument,
            count = series.len(),
            path = %path.display(),
            "종가 저장 완료"
        );

        summary.push((*instrument, path, series.len()));
        pb.inc(1);
    }

    pb.finish_with_message("완료");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use perf_core::RawSeries;
    use perf_data::{read_series_csv, CsvPriceProvider};
    use tempfile::TempDir;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[tokio::test]
    async fn test_download_with_writes_files() {
        let source = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();

        let series = RawSeries::from_pairs(vec![
            (d(2020, 1, 2), 1.08),
            (d(2020, 1, 3), 1.09),
            (d(2021, 1, 4), 1.07),
        ]);
        write_series_csv(&series_csv_path(source.path(), Instrument::EurChf), &series).unwrap();

        let config = DownloadConfig {
            instruments: vec![(Instrument::EurChf, "EURCHF=X".to_string())],
            start_date: d(2020, 1, 1),
            end_date: d(2020, 12, 31),
            output_dir: target.path().join("data"),
        };

        let provider = CsvPriceProvider::new(source.path());
        let summary = download_with(&provider, &config).await.unwrap();

        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].2, 2);

        let written = std::fs::read(&summary[0].1).unwrap();
        let read_back = read_series_csv(written.as_slice()).unwrap();
        assert_eq!(read_back.last_date(), Some(d(2020, 1, 3)));
    }

    #[tokio::test]
    async fn test_download_with_fails_on_missing_source() {
        let source = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();

        let config = DownloadConfig {
            instruments: vec![(Instrument::Gold, "GC=F".to_string())],
            start_date: d(2020, 1, 1),
            end_date: d(2020, 12, 31),
            output_dir: target.path().to_path_buf(),
        };

        let provider = CsvPriceProvider::new(source.path());
        assert!(download_with(&provider, &config).await.is_err());
    }
}
