//! 구간 요약 명령어: 출력 시리즈별 CAGR과 100 CHF 투자 가치.

use anyhow::Result;
use perf_analytics::{CagrResult, ColumnView, FinalValue, RangeView};
use perf_core::{AppConfig, DateRange, REFERENCE_CURRENCY};
use std::fmt::Write as _;

use super::common::load_dataset;

/// CAGR을 백분율 문자열로 변환합니다.
pub fn format_cagr(cagr: CagrResult) -> String {
    match cagr.value() {
        Some(rate) => format!("{:.2}%", rate * 100.0),
        None => "N/A".to_string(),
    }
}

/// 최종 투자 가치를 문자열로 변환합니다.
pub fn format_final_value(value: FinalValue) -> String {
    match value {
        FinalValue::Value(v) => format!("{:.2} {}", v, REFERENCE_CURRENCY),
        FinalValue::Undefined => "N/A (시작 값이 0)".to_string(),
        FinalValue::Empty => "N/A (데이터 없음)".to_string(),
    }
}

/// 구간 뷰를 요약 표로 만듭니다.
pub fn format_summary(view: &RangeView) -> String {
    let mut out = String::new();

    match (view.first_date(), view.last_date()) {
        (Some(first), Some(last)) => {
            let _ = writeln!(out, "기간: {} ~ {} ({} 거래일)", first, last, view.row_count());
        }
        _ => {
            let requested = view
                .requested()
                .map(|r| r.to_string())
                .unwrap_or_else(|| "전체".to_string());
            let _ = writeln!(out, "선택 구간에 데이터가 없습니다: {}", requested);
            return out;
        }
    }

    let _ = writeln!(
        out,
        "{:<16} {:>10}   {}",
        "시리즈",
        "CAGR",
        format!("100 {} 투자 가치", REFERENCE_CURRENCY)
    );

    for (series, column) in view.columns() {
        match column {
            ColumnView::Data {
                cagr, final_value, ..
            } => {
                let _ = writeln!(
                    out,
                    "{:<16} {:>10}   {}",
                    series.label(),
                    format_cagr(*cagr),
                    format_final_value(*final_value)
                );
            }
            ColumnView::NoData => {
                let _ = writeln!(out, "{:<16} {:>10}   데이터 없음", series.label(), "N/A");
            }
        }
    }

    out
}

/// 요약 명령어를 실행합니다.
pub async fn run_summary(config: &AppConfig, range: Option<DateRange>) -> Result<()> {
    let dataset = load_dataset(config).await?;
    print!("{}", format_summary(&dataset.view(range)));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use perf_analytics::PerformanceDataset;
    use perf_core::{ConversionDef, OutputSeries, RawSeries};
    use std::collections::BTreeMap;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn dataset() -> PerformanceDataset {
        let mut series = BTreeMap::new();
        series.insert(
            "IDX",
            RawSeries::from_pairs(vec![(d(2020, 1, 1), 100.0), (d(2024, 1, 1), 146.41)]),
        );
        series.insert("RATE", RawSeries::from_pairs(vec![(d(2020, 1, 1), 1.0)]));
        series.insert(
            "ZERO",
            RawSeries::from_pairs(vec![(d(2020, 1, 1), 0.0), (d(2024, 1, 1), 5.0)]),
        );

        let defs = vec![
            ConversionDef::converted(OutputSeries::DaxChf, "IDX", "RATE"),
            ConversionDef::passthrough(OutputSeries::SmicChf, "ZERO"),
            ConversionDef::converted(OutputSeries::GoldChf, "GOLD", "RATE"),
        ];
        PerformanceDataset::build(&series, &defs).unwrap()
    }

    #[test]
    fn test_format_cagr() {
        assert_eq!(format_cagr(CagrResult::Rate(0.1234)), "12.34%");
        assert_eq!(format_cagr(CagrResult::Insufficient), "0.00%");
        assert_eq!(format_cagr(CagrResult::Undefined), "N/A");
    }

    #[test]
    fn test_format_final_value() {
        assert_eq!(format_final_value(FinalValue::Value(121.0)), "121.00 CHF");
        assert!(format_final_value(FinalValue::Undefined).starts_with("N/A"));
    }

    #[test]
    fn test_format_summary_table() {
        let text = format_summary(&dataset().view(None));

        assert!(text.contains("2020-01-01 ~ 2024-01-01"));
        assert!(text.contains("DAX CHF"));
        assert!(text.contains("10.00%"));
        assert!(text.contains("146.41 CHF"));
        // 기준 값이 0인 시리즈
        assert!(text.contains("N/A (시작 값이 0)"));
        // 데이터 공백
        assert!(text.contains("GOLD CHF"));
        assert!(text.contains("데이터 없음"));
    }

    #[test]
    fn test_format_summary_empty_range() {
        let range = DateRange::new(d(2010, 1, 1), d(2010, 12, 31));
        let text = format_summary(&dataset().view(Some(range)));

        assert!(text.starts_with("선택 구간에 데이터가 없습니다"));
        assert!(text.contains("2010-01-01 ~ 2010-12-31"));
    }
}
