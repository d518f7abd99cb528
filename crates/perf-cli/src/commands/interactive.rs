//! 대화형 구간 조회.
//!
//! 데이터셋을 한 번 구성한 뒤 표준 입력에서 한 줄씩 구간 요청을 읽어
//! 요약을 다시 계산해 출력합니다. 데이터셋은 요청 사이에 변경되지 않습니다.
//!
//! ```text
//! > 2020-01-01 2023-12-31
//! > 2020-03-23T00:00:00 2021-03-23T00:00:00
//! > all
//! > quit
//! ```

use anyhow::Result;
use perf_analytics::PerformanceDataset;
use perf_core::{AppConfig, DateRange, PerfError, PerfResult};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info};

use super::common::load_dataset;
use super::summary::format_summary;

/// 한 줄의 요청.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// 전체 구간
    All,
    /// 지정 구간
    Range(DateRange),
    /// 종료
    Quit,
}

/// 입력 줄을 요청으로 해석합니다.
pub fn parse_request(line: &str) -> PerfResult<Request> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    match parts.as_slice() {
        [] => Err(PerfError::InvalidInput("빈 요청".to_string())),
        [word] if word.eq_ignore_ascii_case("all") => Ok(Request::All),
        [word] if word.eq_ignore_ascii_case("quit") || word.eq_ignore_ascii_case("exit") => {
            Ok(Request::Quit)
        }
        [start, end] => Ok(Request::Range(DateRange::parse(start, end)?)),
        _ => Err(PerfError::InvalidInput(format!(
            "요청 형식: `START END`, `all`, `quit` (입력: {})",
            line.trim()
        ))),
    }
}

/// 요청 하나에 대한 응답 텍스트를 만듭니다.
///
/// `None`이면 세션을 종료합니다.
pub fn respond(dataset: &PerformanceDataset, line: &str) -> Option<String> {
    match parse_request(line) {
        Ok(Request::Quit) => None,
        Ok(Request::All) => Some(format_summary(&dataset.view(None))),
        Ok(Request::Range(range)) => Some(format_summary(&dataset.view(Some(range)))),
        Err(e) => Some(format!("{}\n", e)),
    }
}

/// 대화형 세션을 실행합니다.
pub async fn run_interactive(config: &AppConfig) -> Result<()> {
    let dataset = load_dataset(config).await?.into_shared();
    info!(
        rows = dataset.table().len(),
        built_at = %dataset.built_at(),
        "대화형 세션 시작"
    );

    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(format_summary(&dataset.view(None)).as_bytes())
        .await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        debug!(request = %line.trim(), "구간 요청");
        match respond(Arc::as_ref(&dataset), &line) {
            Some(response) => stdout.write_all(response.as_bytes()).await?,
            None => break,
        }
    }

    info!("대화형 세션 종료");
    Ok(())
}
