//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.
//! 설정은 TOML 파일과 `PERF__` 접두사 환경 변수에서 계층적으로 로드됩니다.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::PerfResult;
use crate::types::Instrument;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
    /// 데이터 수집 설정
    #[serde(default)]
    pub data: DataConfig,
    /// 종목 키별 티커 재정의 (예: `DAX = "^GDAXI"`)
    #[serde(default)]
    pub tickers: HashMap<String, String>,
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
    /// span 진입/종료 이벤트 기록 여부
    #[serde(default)]
    pub span_events: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            span_events: false,
        }
    }
}

/// 가격 시계열 데이터 소스.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Yahoo Finance API
    #[default]
    Yahoo,
    /// 로컬 CSV 파일 (`download` 명령으로 생성)
    Csv,
}

impl std::str::FromStr for DataSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yahoo" => Ok(Self::Yahoo),
            "csv" => Ok(Self::Csv),
            _ => Err(format!("Unknown data source: {}", s)),
        }
    }
}

/// 데이터 수집 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataConfig {
    /// 데이터 소스
    #[serde(default)]
    pub source: DataSource,
    /// CSV 디렉토리
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// 수집 시작일
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,
    /// 수집 종료일 (없으면 오늘)
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source: DataSource::default(),
            data_dir: default_data_dir(),
            start_date: default_start_date(),
            end_date: None,
        }
    }
}

impl DataConfig {
    /// 실제 수집 종료일을 반환합니다.
    pub fn effective_end_date(&self) -> NaiveDate {
        self.end_date.unwrap_or_else(|| Utc::now().date_naive())
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    ///
    /// # 에러
    ///
    /// 파일 형식이 잘못되었거나 값이 타입에 맞지 않으면 `PerfError::Config`.
    pub fn load<P: AsRef<Path>>(path: P) -> PerfResult<Self> {
        let builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .set_default("logging.span_events", false)?
            .set_default("data.source", "yahoo")?
            .set_default("data.data_dir", "data")?
            .set_default("data.start_date", "2000-01-01")?
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("PERF")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> PerfResult<Self> {
        Self::load("config/default.toml")
    }

    /// 종목의 데이터 제공자 티커를 반환합니다.
    ///
    /// `config` 크레이트가 키를 소문자로 바꾸므로 대소문자를 구분하지 않고 찾습니다.
    pub fn ticker_for(&self, instrument: Instrument) -> String {
        self.tickers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(instrument.key()))
            .map(|(_, ticker)| ticker.clone())
            .unwrap_or_else(|| instrument.default_ticker().to_string())
    }

    /// 모든 입력 종목과 티커 목록을 반환합니다.
    pub fn instrument_tickers(&self) -> Vec<(Instrument, String)> {
        Instrument::ALL
            .iter()
            .map(|&instrument| (instrument, self.ticker_for(instrument)))
            .collect()
    }
}
