//! 정렬 → 환산 → 구간 뷰 파이프라인 통합 테스트.

use chrono::NaiveDate;
use perf_analytics::{
    Aligner, CagrResult, ColumnView, CurrencyConverter, FinalValue, NormalizedCurve,
    PerformanceDataset,
};
use perf_core::{ConversionDef, DateRange, OutputSeries, RawSeries};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// 지수 하나와 환율 하나로 구성된 최소 입력.
fn idx_rate_input(idx: Vec<(NaiveDate, f64)>, rate: Vec<(NaiveDate, f64)>) -> BTreeMap<&'static str, RawSeries> {
    let mut series = BTreeMap::new();
    series.insert("IDX", RawSeries::from_pairs(idx));
    series.insert("RATE", RawSeries::from_pairs(rate));
    series
}

fn idx_ref_def() -> Vec<ConversionDef<&'static str>> {
    vec![ConversionDef::converted(OutputSeries::DaxChf, "IDX", "RATE")]
}

#[test]
fn test_end_to_end_single_pair() {
    let input = idx_rate_input(
        vec![(d(2020, 1, 1), 100.0), (d(2021, 1, 1), 110.0)],
        vec![(d(2020, 1, 1), 1.0), (d(2021, 1, 1), 1.1)],
    );

    let dataset = PerformanceDataset::build(&input, &idx_ref_def()).unwrap();
    let table = dataset.table();

    assert_eq!(table.dates(), &[d(2020, 1, 1), d(2021, 1, 1)]);
    let column = table.column(OutputSeries::DaxChf).unwrap();
    assert!(approx(column[0], 100.0));
    assert!(approx(column[1], 121.0));

    let view = dataset.view(None);
    let ColumnView::Data {
        curve,
        cagr,
        final_value,
    } = view.column(OutputSeries::DaxChf).unwrap()
    else {
        panic!("expected data column");
    };

    let points = curve.points().unwrap();
    assert_eq!(points.len(), 2);
    assert!(approx(points[0].value, 100.0));
    assert!(approx(points[1].value, 121.0));

    // 366일 / 365.25 ≈ 1.002년
    let rate = cagr.value().unwrap();
    assert!((rate - 0.21).abs() < 0.001, "cagr = {}", rate);
    assert!(approx(final_value.value().unwrap(), 121.0));
}

#[test]
fn test_zero_base_is_explicitly_undefined() {
    let input = idx_rate_input(
        vec![(d(2020, 1, 1), 0.0), (d(2021, 1, 1), 110.0)],
        vec![(d(2020, 1, 1), 1.0), (d(2021, 1, 1), 1.1)],
    );

    let dataset = PerformanceDataset::build(&input, &idx_ref_def()).unwrap();
    let view = dataset.view(None);
    let column = view.column(OutputSeries::DaxChf).unwrap();

    assert_eq!(column.curve(), Some(&NormalizedCurve::Undefined));
    assert_eq!(column.cagr(), Some(CagrResult::Undefined));
    assert_eq!(column.final_value(), Some(FinalValue::Undefined));

    let json = serde_json::to_string(&view).unwrap();
    assert!(!json.contains("NaN"));
    assert!(!json.contains("inf"));
    assert!(json.contains("undefined"));
}

#[test]
fn test_forward_fill_across_holidays() {
    // 환율은 매일, 지수는 공휴일(1/3)에 관측치 없음
    let input = idx_rate_input(
        vec![(d(2020, 1, 2), 100.0), (d(2020, 1, 6), 104.0)],
        vec![
            (d(2020, 1, 2), 1.0),
            (d(2020, 1, 3), 2.0),
            (d(2020, 1, 6), 1.0),
        ],
    );

    let aligned = Aligner::align(&input).unwrap();
    assert_eq!(aligned.value(&"IDX", 1), Some(100.0));

    let table = CurrencyConverter::convert(&aligned, &idx_ref_def());
    assert_eq!(table.len(), 3);
    assert_eq!(table.column(OutputSeries::DaxChf).unwrap(), &[100.0, 200.0, 104.0]);
}

#[test]
fn test_rows_before_every_series_starts_are_dropped() {
    let mut input = idx_rate_input(
        vec![(d(2020, 1, 1), 100.0), (d(2020, 1, 3), 102.0)],
        vec![(d(2020, 1, 2), 1.5), (d(2020, 1, 3), 1.5)],
    );
    input.insert("LOCAL", RawSeries::from_pairs(vec![(d(2020, 1, 1), 50.0)]));

    let defs = vec![
        ConversionDef::converted(OutputSeries::DaxChf, "IDX", "RATE"),
        ConversionDef::passthrough(OutputSeries::SmicChf, "LOCAL"),
    ];
    let table = CurrencyConverter::convert(&Aligner::align(&input).unwrap(), &defs);

    // 1/1은 RATE가 없어 제외
    assert_eq!(table.dates(), &[d(2020, 1, 2), d(2020, 1, 3)]);
    assert_eq!(table.column(OutputSeries::DaxChf).unwrap(), &[150.0, 153.0]);
    assert_eq!(table.column(OutputSeries::SmicChf).unwrap(), &[50.0, 50.0]);
}

#[test]
fn test_range_selection_and_insufficient_rows() {
    let input = idx_rate_input(
        vec![
            (d(2020, 1, 1), 100.0),
            (d(2020, 7, 1), 120.0),
            (d(2021, 1, 1), 150.0),
        ],
        vec![(d(2020, 1, 1), 1.0)],
    );
    let dataset = PerformanceDataset::build(&input, &idx_ref_def()).unwrap();

    // 단일 행 구간
    let single = dataset.view(Some(DateRange::new(d(2020, 7, 1), d(2020, 7, 1))));
    assert_eq!(single.row_count(), 1);
    let column = single.column(OutputSeries::DaxChf).unwrap();
    assert_eq!(column.cagr(), Some(CagrResult::Insufficient));
    assert_eq!(column.cagr().and_then(CagrResult::value), Some(0.0));
    assert_eq!(column.final_value(), Some(FinalValue::Value(100.0)));

    // 중간부터 끝까지: 기준이 재설정됨
    let tail = dataset.view(Some(DateRange::new(d(2020, 6, 15), d(2021, 12, 31))));
    assert_eq!(tail.first_date(), Some(d(2020, 7, 1)));
    let curve = tail.column(OutputSeries::DaxChf).unwrap().curve().unwrap();
    assert!(approx(curve.points().unwrap()[0].value, 100.0));
    assert!(approx(curve.last_value().unwrap(), 125.0));
}

#[test]
fn test_range_without_rows_is_empty() {
    let input = idx_rate_input(
        vec![(d(2020, 1, 1), 100.0), (d(2020, 2, 1), 101.0)],
        vec![(d(2020, 1, 1), 1.0)],
    );
    let dataset = PerformanceDataset::build(&input, &idx_ref_def()).unwrap();

    for range in [
        DateRange::new(d(2019, 1, 1), d(2019, 12, 31)),
        DateRange::new(d(2020, 2, 1), d(2020, 1, 1)),
    ] {
        let view = dataset.view(Some(range));
        assert!(view.is_empty());
        let column = view.column(OutputSeries::DaxChf).unwrap();
        assert_eq!(column.curve(), Some(&NormalizedCurve::Empty));
        assert_eq!(column.final_value(), Some(FinalValue::Empty));
    }
}

#[test]
fn test_missing_fx_series_becomes_gap() {
    let mut input = BTreeMap::new();
    input.insert(
        "IDX",
        RawSeries::from_pairs(vec![(d(2020, 1, 1), 100.0), (d(2020, 2, 1), 110.0)]),
    );
    input.insert(
        "LOCAL",
        RawSeries::from_pairs(vec![(d(2020, 1, 1), 10.0), (d(2020, 2, 1), 11.0)]),
    );

    let defs = vec![
        ConversionDef::converted(OutputSeries::DaxChf, "IDX", "RATE"),
        ConversionDef::passthrough(OutputSeries::SmicChf, "LOCAL"),
    ];
    let dataset = PerformanceDataset::build(&input, &defs).unwrap();

    assert!(dataset.table().is_gap(OutputSeries::DaxChf));
    assert_eq!(dataset.table().len(), 2);

    let view = dataset.view(None);
    assert_eq!(view.column(OutputSeries::DaxChf), Some(&ColumnView::NoData));
    assert!(view.column(OutputSeries::SmicChf).unwrap().cagr().unwrap().is_rate());
}

#[test]
fn test_unsorted_input_is_rejected() {
    let input = idx_rate_input(
        vec![(d(2020, 1, 2), 100.0), (d(2020, 1, 1), 100.0)],
        vec![(d(2020, 1, 1), 1.0)],
    );

    assert!(PerformanceDataset::build(&input, &idx_ref_def()).is_err());
}

#[test]
fn test_shared_dataset_concurrent_views() {
    let input = idx_rate_input(
        vec![
            (d(2020, 1, 1), 100.0),
            (d(2020, 6, 1), 90.0),
            (d(2021, 1, 1), 130.0),
        ],
        vec![(d(2020, 1, 1), 1.0)],
    );
    let dataset = PerformanceDataset::build(&input, &idx_ref_def())
        .unwrap()
        .into_shared();
    let expected = dataset.view(None);

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let dataset = Arc::clone(&dataset);
            thread::spawn(move || {
                let range = if i % 2 == 0 {
                    None
                } else {
                    Some(DateRange::new(d(2020, 6, 1), d(2021, 1, 1)))
                };
                dataset.view(range)
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let view = handle.join().unwrap();
        if i % 2 == 0 {
            assert_eq!(view, expected);
        } else {
            assert_eq!(view.row_count(), 2);
        }
    }

    // 요청 후에도 테이블은 그대로
    assert_eq!(dataset.table().len(), 3);
}
