//! 지수 성과 비교 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 모든 종목 종가 다운로드 (Yahoo Finance → data/*.csv)
//! perf download -f 2000-01-01 -o data
//!
//! # 전체 기간 CAGR 요약
//! perf summary
//!
//! # 구간 요약
//! perf summary -f 2020-01-01 -t 2023-12-31
//!
//! # 정규화 곡선 CSV 출력
//! perf curve -f 2020-01-01 --format csv > curve.csv
//!
//! # 대화형 구간 조회 (JSON 로그)
//! perf interactive --log-format json
//! ```

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use perf_cli::commands::common::resolve_range;
use perf_cli::commands::curve::{run_curve, OutputFormat};
use perf_cli::commands::download::{download_all, DownloadConfig};
use perf_cli::commands::interactive::run_interactive;
use perf_cli::commands::scrape::run_scrape_six;
use perf_cli::commands::summary::run_summary;
use perf_core::{init_logging, parse_date, AppConfig, LogConfig, LogFormat};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "perf")]
#[command(about = "Index performance CLI - CHF 환산 정규화 및 CAGR 비교", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일
    #[arg(short, long, global = true, default_value = "config/default.toml")]
    config: String,

    /// 로그 형식 재정의 (pretty, json, compact)
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// 시계열 수집 span 진입/종료 기록
    #[arg(long, global = true, default_value = "false")]
    log_spans: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 모든 종목의 일간 종가 다운로드 (Yahoo Finance → CSV)
    Download {
        /// 시작 날짜 (YYYY-MM-DD, 기본: 설정의 data.start_date)
        #[arg(short = 'f', long)]
        from: Option<String>,

        /// 종료 날짜 (YYYY-MM-DD, 기본: 오늘)
        #[arg(short, long)]
        to: Option<String>,

        /// 출력 디렉토리 (기본: 설정의 data.data_dir)
        #[arg(short, long)]
        output_dir: Option<String>,
    },

    /// 구간별 CAGR과 100 CHF 투자 가치 요약
    Summary {
        /// 구간 시작 날짜
        #[arg(short = 'f', long)]
        from: Option<String>,

        /// 구간 종료 날짜
        #[arg(short, long)]
        to: Option<String>,
    },

    /// 기준 100 정규화 곡선 출력
    Curve {
        /// 구간 시작 날짜
        #[arg(short = 'f', long)]
        from: Option<String>,

        /// 구간 종료 날짜
        #[arg(short, long)]
        to: Option<String>,

        /// 출력 형식 (csv, json)
        #[arg(long, default_value = "csv")]
        format: String,
    },

    /// 대화형 구간 조회 (`START END`, `all`, `quit`)
    Interactive,

    /// SIX 지수 페이지 차트 데이터 수집
    ScrapeSix {
        /// 지수 상세 페이지 경로 (기본: SMI 총수익)
        #[arg(long)]
        page: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load config: {}", cli.config))?;

    let mut log_config = LogConfig::from_settings(&config.logging);
    if let Some(format) = &cli.log_format {
        let format: LogFormat = format.parse().map_err(|e: String| anyhow!(e))?;
        log_config = log_config.with_format(format);
    }
    if cli.log_spans {
        log_config = log_config.with_span_events(true);
    }
    init_logging(log_config).map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    let result = match cli.command {
        Commands::Download {
            from,
            to,
            output_dir,
        } => {
            let start_date = from
                .as_deref()
                .map(parse_date)
                .transpose()?
                .unwrap_or(config.data.start_date);
            let end_date = to
                .as_deref()
                .map(parse_date)
                .transpose()?
                .unwrap_or_else(|| config.data.effective_end_date());

            if start_date > end_date {
                return Err(anyhow!("Start date must be before end date"));
            }

            let download_config = DownloadConfig {
                instruments: config.instrument_tickers(),
                start_date,
                end_date,
                output_dir: output_dir
                    .map(PathBuf::from)
                    .unwrap_or_else(|| config.data.data_dir.clone()),
            };

            println!("\n📥 종가 데이터를 다운로드합니다...");
            println!("기간: {} ~ {}", start_date, end_date);
            println!("출력: {}", download_config.output_dir.display());

            download_all(&download_config).await.map(|summary| {
                for (instrument, path, count) in &summary {
                    println!("  {:<10} {:>6} rows → {}", instrument, count, path.display());
                }
                info!("✅ Downloaded {} series", summary.len());
            })
        }

        Commands::Summary { from, to } => {
            let range = resolve_range(from.as_deref(), to.as_deref())?;
            run_summary(&config, range).await
        }

        Commands::Curve { from, to, format } => {
            let range = resolve_range(from.as_deref(), to.as_deref())?;
            let format: OutputFormat = format.parse()?;
            run_curve(&config, range, format).await
        }

        Commands::Interactive => run_interactive(&config).await,

        Commands::ScrapeSix { page } => run_scrape_six(page.as_deref()).await,
    };

    if let Err(e) = &result {
        error!("Command failed: {:#}", e);
    }

    result
}
