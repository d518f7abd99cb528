//! 정규화 곡선 출력 명령어.

use anyhow::{bail, Result};
use perf_analytics::RangeView;
use perf_core::{AppConfig, DateRange};
use std::str::FromStr;

use super::common::load_dataset;

/// 곡선 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => bail!("Invalid format: {}. Use: csv, json", s),
        }
    }
}

/// 곡선을 CSV로 만듭니다.
///
/// 열은 `date`와 출력 시리즈 키이며, 곡선이 정의되지 않은 시리즈는 빈 칸입니다.
pub fn format_curve_csv(view: &RangeView) -> Result<String> {
    let columns: Vec<_> = view.columns().collect();

    let mut writer = csv::Writer::from_writer(Vec::new());
    let mut header = vec!["date".to_string()];
    header.extend(columns.iter().map(|(series, _)| series.key().to_string()));
    writer.write_record(&header)?;

    let curves: Vec<_> = columns
        .iter()
        .map(|(_, column)| column.curve().and_then(|c| c.points()))
        .collect();

    let rows = curves
        .iter()
        .flatten()
        .map(|points| points.len())
        .max()
        .unwrap_or(0);

    for row in 0..rows {
        let date = curves
            .iter()
            .flatten()
            .find_map(|points| points.get(row))
            .map(|p| p.date.to_string())
            .unwrap_or_default();

        let mut record = vec![date];
        record.extend(curves.iter().map(|&points| {
            points
                .and_then(|p| p.get(row))
                .map(|p| format!("{:.4}", p.value))
                .unwrap_or_default()
        }));
        writer.write_record(&record)?;
    }

    let bytes = writer.into_inner().map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

/// 곡선을 JSON으로 만듭니다.
pub fn format_curve_json(view: &RangeView) -> Result<String> {
    Ok(serde_json::to_string_pretty(view)?)
}

/// 곡선 명령어를 실행합니다.
pub async fn run_curve(
    config: &AppConfig,
    range: Option<DateRange>,
    format: OutputFormat,
) -> Result<()> {
    let dataset = load_dataset(config).await?;
    let view = dataset.view(range);

    let output = match format {
        OutputFormat::Csv => format_curve_csv(&view)?,
        OutputFormat::Json => format_curve_json(&view)?,
    };
    print!("{}", output);

    Ok(())
}
