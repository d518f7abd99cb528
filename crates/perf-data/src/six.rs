//! SIX Swiss Exchange 지수 데이터 수집기.
//!
//! 지수 상세 페이지에서 `data-chart-data-source-url` 속성을 찾아
//! 해당 차트 데이터 JSON을 그대로 반환합니다. 파이프라인에는 연결되지 않는
//! 단발성 수집 도구입니다.

use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DataError, Result};

/// SIX 웹사이트 기본 URL.
pub const SIX_BASE_URL: &str = "https://www.six-group.com";

/// SMI 총수익(SMIC) 지수 상세 페이지 경로.
pub const SMI_TR_PAGE_PATH: &str =
    "/de/market-data/indices/index-explorer/index-details.CH0000222130CHF9.html";

const CHART_SOURCE_ATTR: &str = "data-chart-data-source-url";

/// SIX 지수 페이지 수집기.
pub struct SixIndexCollector {
    client: reqwest::Client,
    base_url: String,
}

impl SixIndexCollector {
    /// 기본 URL로 수집기를 생성합니다.
    pub fn new() -> Result<Self> {
        Self::with_base_url(SIX_BASE_URL)
    }

    /// 지정한 기본 URL로 수집기를 생성합니다.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (compatible; index-performance/0.1)")
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// 페이지의 차트 데이터 JSON을 가져옵니다.
    ///
    /// # 에러
    ///
    /// - 페이지에 차트 데이터 속성이 없으면 `NotFound`
    /// - HTTP 실패는 `FetchError`, JSON 파싱 실패는 `FetchError` 또는 `SerializationError`
    pub async fn fetch_chart_data(&self, page_path: &str) -> Result<serde_json::Value> {
        let page_url = format!("{}{}", self.base_url, page_path);
        info!(url = %page_url, "SIX 지수 페이지 요청");

        let html = self
            .client
            .get(&page_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let source_path = extract_data_source_url(&html)?;
        let data_url = if source_path.starts_with("http") {
            source_path
        } else {
            format!("{}{}", self.base_url, source_path)
        };
        debug!(url = %data_url, "차트 데이터 요청");

        let body = self
            .client
            .get(&data_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(serde_json::from_str(&body)?)
    }
}

/// HTML에서 차트 데이터 URL 속성 값을 추출합니다.
pub fn extract_data_source_url(html: &str) -> Result<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(&format!("[{}]", CHART_SOURCE_ATTR))
        .map_err(|e| DataError::ParseError(format!("selector: {:?}", e)))?;

    document
        .select(&selector)
        .find_map(|el| el.value().attr(CHART_SOURCE_ATTR))
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .ok_or_else(|| DataError::NotFound(format!("{} attribute", CHART_SOURCE_ATTR)))
}
