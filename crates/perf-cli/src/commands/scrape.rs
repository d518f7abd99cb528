//! SIX 지수 차트 데이터 수집 명령어.

use anyhow::{Context, Result};
use perf_data::{SixIndexCollector, SMI_TR_PAGE_PATH};
use tracing::info;

/// 지수 페이지의 차트 데이터를 가져와 JSON으로 출력합니다.
///
/// `page_path`가 없으면 SMI 총수익 지수 페이지를 사용합니다.
pub async fn run_scrape_six(page_path: Option<&str>) -> Result<()> {
    let collector = SixIndexCollector::new()?;
    let page_path = page_path.unwrap_or(SMI_TR_PAGE_PATH);

    let data = collector
        .fetch_chart_data(page_path)
        .await
        .with_context(|| format!("Failed to collect SIX chart data: {}", page_path))?;

    info!(page = page_path, "SIX 차트 데이터 수집 완료");
    println!("{}", serde_json::to_string_pretty(&data)?);

    Ok(())
}
