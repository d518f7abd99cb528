//! 명령어 공통 도우미: 구간 해석과 데이터셋 구성.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use perf_analytics::PerformanceDataset;
use perf_core::{parse_date, AppConfig, DataSource, DateRange};
use perf_data::{load_store, CsvPriceProvider, PriceSeriesProvider, YahooPriceProvider};
use tracing::{info, warn};

/// `--from`/`--to` 인자를 구간으로 해석합니다.
///
/// 둘 다 없으면 전체 구간(`None`)이고, 한쪽만 있으면 반대쪽은 열린 끝입니다.
pub fn resolve_range(from: Option<&str>, to: Option<&str>) -> Result<Option<DateRange>> {
    if from.is_none() && to.is_none() {
        return Ok(None);
    }

    let start = from
        .map(parse_date)
        .transpose()
        .context("잘못된 시작 날짜")?
        .unwrap_or(NaiveDate::MIN);
    let end = to
        .map(parse_date)
        .transpose()
        .context("잘못된 종료 날짜")?
        .unwrap_or(NaiveDate::MAX);

    let range = DateRange::new(start, end);
    if range.is_inverted() {
        warn!(%range, "시작 날짜가 종료 날짜보다 늦어 선택되는 행이 없습니다");
    }

    Ok(Some(range))
}

/// 설정된 데이터 소스의 제공자를 생성합니다.
pub fn provider_for(config: &AppConfig) -> Result<Box<dyn PriceSeriesProvider>> {
    let provider: Box<dyn PriceSeriesProvider> = match config.data.source {
        DataSource::Yahoo => Box::new(YahooPriceProvider::new()?),
        DataSource::Csv => Box::new(CsvPriceProvider::new(config.data.data_dir.clone())),
    };
    Ok(provider)
}

/// 모든 종목을 가져와 데이터셋을 구성합니다.
pub async fn load_dataset(config: &AppConfig) -> Result<PerformanceDataset> {
    let provider = provider_for(config)?;
    let start = config.data.start_date;
    let end = config.data.effective_end_date();

    info!(source = provider.name(), %start, %end, "데이터셋 구성 시작");

    let store = load_store(provider.as_ref(), &config.instrument_tickers(), start, end)
        .await
        .context("가격 시계열 로드 실패")?;

    let missing = store.missing_instruments();
    if !missing.is_empty() {
        warn!(?missing, "일부 종목이 저장소에 없습니다");
    }

    PerformanceDataset::from_store(&store).context("데이터셋 구성 실패")
}
