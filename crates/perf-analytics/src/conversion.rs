//! 기준 통화 환산.
//!
//! 정렬된 테이블의 각 지수 컬럼에 환율 컬럼을 곱해 기준 통화(CHF) 시리즈를
//! 만들고, 출력 컬럼 중 하나라도 값이 없는 행을 제거합니다.
//!
//! 어떤 날짜에도 값이 없는 출력 컬럼(지수와 환율의 유효 구간이 겹치지 않는 경우)은
//! 데이터 공백으로 기록되고 행 교집합 계산에서 제외됩니다. 덕분에 공백 컬럼
//! 하나가 나머지 컬럼의 결과를 지우지 않습니다.

use chrono::NaiveDate;
use perf_core::{ConversionDef, DateRange, OutputSeries};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;
use tracing::{info, warn};

use crate::alignment::AlignedTable;

/// 기준 통화로 환산된 테이블.
///
/// 프로세스 수명 동안 유지되는 정규 데이터셋이며 생성 후 변경되지 않습니다.
/// 모든 컬럼은 `dates`와 길이가 같고 결측이 없습니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConvertedTable {
    dates: Vec<NaiveDate>,
    columns: BTreeMap<OutputSeries, Vec<f64>>,
    gaps: BTreeSet<OutputSeries>,
}

impl ConvertedTable {
    /// 날짜 축.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// 출력 컬럼 (공백 컬럼이나 정의되지 않은 컬럼은 `None`).
    pub fn column(&self, series: OutputSeries) -> Option<&[f64]> {
        self.columns.get(&series).map(|c| c.as_slice())
    }

    /// 특정 행의 값.
    pub fn value(&self, series: OutputSeries, row: usize) -> Option<f64> {
        self.columns.get(&series).and_then(|c| c.get(row).copied())
    }

    /// 데이터가 있는 출력 시리즈 목록.
    pub fn series(&self) -> impl Iterator<Item = OutputSeries> + '_ {
        self.columns.keys().copied()
    }

    /// 데이터 공백으로 기록된 출력 시리즈.
    pub fn gaps(&self) -> &BTreeSet<OutputSeries> {
        &self.gaps
    }

    /// 데이터 공백 여부.
    pub fn is_gap(&self, series: OutputSeries) -> bool {
        self.gaps.contains(&series)
    }

    /// 행 수.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// 비어있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// 첫 날짜.
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    /// 마지막 날짜.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// 구간에 해당하는 행 범위를 반환합니다 (양 끝 포함).
    ///
    /// `None`이면 전체 행입니다. 날짜 축이 정렬되어 있으므로 이진 탐색을 사용합니다.
    pub fn row_range(&self, range: Option<DateRange>) -> Range<usize> {
        match range {
            None => 0..self.dates.len(),
            Some(r) => {
                let start = self.dates.partition_point(|d| *d < r.start);
                let end = self.dates.partition_point(|d| *d <= r.end);
                start..end.max(start)
            }
        }
    }
}

/// 통화 환산기.
pub struct CurrencyConverter;

impl CurrencyConverter {
    /// 정렬된 테이블을 기준 통화 테이블로 환산합니다.
    ///
    /// # 매개변수
    ///
    /// * `aligned` - forward-fill된 정렬 테이블
    /// * `defs` - 출력 컬럼 환산 규칙 (보통 [`ConversionDef::standard`])
    ///
    /// 환율이 있는 규칙은 `지수 × 환율`, 없는 규칙은 지수 값을 그대로 씁니다.
    /// 반올림은 하지 않습니다.
    pub fn convert<K: Ord>(aligned: &AlignedTable<K>, defs: &[ConversionDef<K>]) -> ConvertedTable {
        let rows = aligned.len();

        let mut raw_columns: BTreeMap<OutputSeries, Vec<Option<f64>>> = BTreeMap::new();
        let mut gaps = BTreeSet::new();

        for def in defs {
            let column: Vec<Option<f64>> = (0..rows)
                .map(|row| Self::convert_value(aligned, def, row))
                .collect();

            if column.iter().all(Option::is_none) {
                warn!(
                    series = %def.output,
                    "No overlapping valid dates between index and FX series"
                );
                gaps.insert(def.output);
                raw_columns.remove(&def.output);
            } else {
                gaps.remove(&def.output);
                raw_columns.insert(def.output, column);
            }
        }

        // 모든 (공백이 아닌) 출력 컬럼에 값이 있는 행만 유지
        let keep: Vec<usize> = (0..rows)
            .filter(|&row| raw_columns.values().all(|c| c[row].is_some()))
            .filter(|_| !raw_columns.is_empty())
            .collect();

        let dates = keep.iter().map(|&row| aligned.dates()[row]).collect();
        let columns = raw_columns
            .into_iter()
            .map(|(series, column)| {
                let values = keep.iter().filter_map(|&row| column[row]).collect();
                (series, values)
            })
            .collect();

        info!(
            aligned_rows = rows,
            converted_rows = keep.len(),
            dropped_rows = rows - keep.len(),
            gaps = gaps.len(),
            "Converted aligned table to reference currency"
        );

        ConvertedTable {
            dates,
            columns,
            gaps,
        }
    }

    /// 한 행의 환산 값을 계산합니다. 곱이 유한하지 않으면 결측으로 취급합니다.
    fn convert_value<K: Ord>(
        aligned: &AlignedTable<K>,
        def: &ConversionDef<K>,
        row: usize,
    ) -> Option<f64> {
        let index = aligned.value(&def.index, row)?;
        let value = match &def.fx {
            Some(fx) => index * aligned.value(fx, row)?,
            None => index,
        };
        value.is_finite().then_some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::Aligner;
    use perf_core::RawSeries;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn aligned(entries: Vec<(&'static str, RawSeries)>) -> AlignedTable<&'static str> {
        Aligner::align(&entries.into_iter().collect()).unwrap()
    }

    #[test]
    fn test_convert_multiplies_by_fx() {
        let table = aligned(vec![
            (
                "IDX",
                RawSeries::from_pairs(vec![(d(2020, 1, 1), 100.0), (d(2021, 1, 1), 110.0)]),
            ),
            (
                "RATE",
                RawSeries::from_pairs(vec![(d(2020, 1, 1), 1.0), (d(2021, 1, 1), 1.1)]),
            ),
        ]);

        let defs = vec![ConversionDef::converted(OutputSeries::DaxChf, "IDX", "RATE")];
        let converted = CurrencyConverter::convert(&table, &defs);

        assert_eq!(converted.dates(), &[d(2020, 1, 1), d(2021, 1, 1)]);
        let col = converted.column(OutputSeries::DaxChf).unwrap();
        assert!((col[0] - 100.0).abs() < 1e-9);
        assert!((col[1] - 121.0).abs() < 1e-9);
    }

    #[test]
    fn test_rows_with_any_null_are_dropped() {
        let table = aligned(vec![
            (
                "A",
                RawSeries::from_pairs(vec![
                    (d(2020, 1, 1), 10.0),
                    (d(2020, 1, 2), 11.0),
                    (d(2020, 1, 3), 12.0),
                ]),
            ),
            (
                "B",
                RawSeries::from_pairs(vec![(d(2020, 1, 2), 20.0), (d(2020, 1, 3), 21.0)]),
            ),
            ("FX", RawSeries::from_pairs(vec![(d(2020, 1, 1), 2.0)])),
        ]);

        let defs = vec![
            ConversionDef::converted(OutputSeries::DaxChf, "A", "FX"),
            ConversionDef::passthrough(OutputSeries::SmicChf, "B"),
        ];
        let converted = CurrencyConverter::convert(&table, &defs);

        // B는 2020-01-02부터 시작하므로 첫 행 제거
        assert_eq!(converted.dates(), &[d(2020, 1, 2), d(2020, 1, 3)]);
        // FX는 forward-fill된 값 2.0 사용
        assert_eq!(converted.column(OutputSeries::DaxChf).unwrap(), &[22.0, 24.0]);
        assert_eq!(converted.column(OutputSeries::SmicChf).unwrap(), &[20.0, 21.0]);
        assert!(converted.gaps().is_empty());
    }

    #[test]
    fn test_data_gap_column_does_not_erase_others() {
        let table = aligned(vec![
            (
                "IDX",
                RawSeries::from_pairs(vec![(d(2020, 1, 1), 100.0), (d(2020, 1, 2), 101.0)]),
            ),
            // 환율 이력이 비어 있어 지수와 겹치는 유효 날짜가 없음
            ("LATE_IDX", RawSeries::from_pairs(vec![(d(2019, 1, 1), 5.0)])),
            ("LATE_FX", RawSeries::new(vec![])),
            ("CHF", RawSeries::from_pairs(vec![(d(2020, 1, 1), 50.0)])),
        ]);

        let defs = vec![
            ConversionDef::converted(OutputSeries::GoldChf, "LATE_IDX", "LATE_FX"),
            ConversionDef::passthrough(OutputSeries::SmicChf, "CHF"),
            ConversionDef::passthrough(OutputSeries::DaxChf, "IDX"),
        ];
        let converted = CurrencyConverter::convert(&table, &defs);

        assert!(converted.is_gap(OutputSeries::GoldChf));
        assert!(converted.column(OutputSeries::GoldChf).is_none());
        assert_eq!(converted.dates(), &[d(2020, 1, 1), d(2020, 1, 2)]);
        assert_eq!(converted.column(OutputSeries::SmicChf).unwrap(), &[50.0, 50.0]);
    }

    #[test]
    fn test_missing_input_column_is_gap() {
        let table = aligned(vec![(
            "IDX",
            RawSeries::from_pairs(vec![(d(2020, 1, 1), 100.0)]),
        )]);

        let defs = vec![ConversionDef::converted(OutputSeries::DaxChf, "IDX", "NOPE")];
        let converted = CurrencyConverter::convert(&table, &defs);

        assert!(converted.is_empty());
        assert!(converted.is_gap(OutputSeries::DaxChf));
        assert_eq!(converted.series().count(), 0);
    }

    #[test]
    fn test_row_range_inclusive() {
        let table = aligned(vec![(
            "IDX",
            RawSeries::from_pairs(vec![
                (d(2020, 1, 1), 1.0),
                (d(2020, 1, 2), 2.0),
                (d(2020, 1, 3), 3.0),
                (d(2020, 1, 6), 4.0),
            ]),
        )]);
        let converted = CurrencyConverter::convert(
            &table,
            &[ConversionDef::passthrough(OutputSeries::SmicChf, "IDX")],
        );

        assert_eq!(converted.row_range(None), 0..4);
        assert_eq!(
            converted.row_range(Some(DateRange::new(d(2020, 1, 2), d(2020, 1, 3)))),
            1..3
        );
        assert_eq!(
            converted.row_range(Some(DateRange::new(d(2020, 1, 4), d(2020, 1, 5)))),
            3..3
        );
        assert!(converted
            .row_range(Some(DateRange::new(d(2020, 1, 3), d(2020, 1, 1))))
            .is_empty());
    }
}
