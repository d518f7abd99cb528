//! tracing 기반 로깅 초기화.
//!
//! 로그는 항상 stderr로 출력됩니다. stdout은 요약 표와 곡선 CSV/JSON 출력 전용입니다.
//!
//! 형식은 `[logging] format`(pretty, json, compact)으로, 레벨은 `RUST_LOG`가 있으면
//! 그 값을, 없으면 `[logging] level`을 사용합니다.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    registry::Registry,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use crate::config::LoggingConfig;

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 여러 줄 컬러 출력 (터미널)
    #[default]
    Pretty,
    /// 한 줄 JSON (로그 수집)
    Json,
    /// 한 줄 요약
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// 기본 필터 (예: "info", "perf_analytics=debug")
    pub level: String,
    /// 출력 형식
    pub format: LogFormat,
    /// 시계열 수집 span의 진입/종료 기록
    pub span_events: bool,
}

impl LogConfig {
    /// 새 로그 설정을 생성합니다.
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            format: LogFormat::default(),
            span_events: false,
        }
    }

    /// 로그 형식을 설정합니다.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// span 진입/종료 기록을 설정합니다.
    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }

    /// 설정 파일의 `[logging]` 섹션에서 생성합니다.
    ///
    /// 알 수 없는 형식 문자열은 `Pretty`로 대체됩니다.
    pub fn from_settings(settings: &LoggingConfig) -> Self {
        Self::new(settings.level.clone())
            .with_format(settings.format.parse().unwrap_or_default())
            .with_span_events(settings.span_events)
    }
}

/// 설정에 맞는 stderr 포맷 레이어.
fn fmt_layer(config: &LogConfig) -> Box<dyn Layer<Registry> + Send + Sync> {
    let span_events = if config.span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_span_events(span_events);

    match config.format {
        LogFormat::Pretty => layer.pretty().boxed(),
        LogFormat::Json => layer.json().boxed(),
        LogFormat::Compact => layer.compact().boxed(),
    }
}

/// 전역 subscriber를 설치합니다.
///
/// # 예제
///
/// ```no_run
/// use perf_core::logging::{init_logging, LogConfig, LogFormat};
///
/// let config = LogConfig::new("debug").with_format(LogFormat::Json);
/// init_logging(config).unwrap();
/// ```
pub fn init_logging(config: LogConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.level))?;

    tracing_subscriber::registry()
        .with(fmt_layer(&config))
        .with(env_filter)
        .try_init()?;

    tracing::debug!(
        format = ?config.format,
        level = %config.level,
        span_events = config.span_events,
        "Logging initialized"
    );

    Ok(())
}

/// 종목 컨텍스트(`series`, `ticker`) 필드를 가진 span을 생성합니다.
#[macro_export]
macro_rules! series_span {
    ($name:expr, $series:expr) => {
        tracing::info_span!($name, series = %$series)
    };
    ($name:expr, $series:expr, $ticker:expr) => {
        tracing::info_span!($name, series = %$series, ticker = %$ticker)
    };
}
