//! 기간별 성과 뷰.
//!
//! 사용자가 선택한 날짜 구간마다 환산 테이블을 잘라 컬럼별로 다음을 계산합니다:
//! - 기준 100 정규화 곡선
//! - 연복리 수익률 (CAGR)
//! - 100 CHF 투자 시 구간 말 최종 가치
//!
//! 모든 계산은 순수 함수이며 테이블을 변경하지 않습니다. 0 기준값, 빈 구간,
//! 데이터 부족은 에러가 아니라 태그가 붙은 결과 값으로 반환되므로
//! `NaN`이나 `inf`가 출력에 섞이지 않습니다.
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! use perf_analytics::{RangeView, CagrResult};
//!
//! let view = RangeView::compute(&table, Some(DateRange::new(start, end)));
//! for (series, column) in view.columns() {
//!     if let Some(cagr) = column.cagr().and_then(CagrResult::value) {
//!         println!("{}: {:.2}%", series.label(), cagr * 100.0);
//!     }
//! }
//! ```

use chrono::NaiveDate;
use perf_core::{DateRange, OutputSeries};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::conversion::ConvertedTable;

/// 연율화에 사용하는 1년의 일수 (윤년 평균).
pub const DAYS_PER_YEAR: f64 = 365.25;

/// 정규화 기준값 및 최종 가치 계산의 투자 원금.
pub const NORMALIZATION_BASE: f64 = 100.0;

/// 정규화 곡선의 한 점.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvePoint {
    /// 날짜
    pub date: NaiveDate,
    /// 정규화 값 (구간 첫 값 = 100)
    pub value: f64,
}

/// 기준 100 정규화 곡선.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "points", rename_all = "snake_case")]
pub enum NormalizedCurve {
    /// 정규화된 점 목록
    Points(Vec<CurvePoint>),
    /// 선택된 행이 없음
    Empty,
    /// 기준값이 0이거나 유한하지 않아 정의되지 않음
    Undefined,
}

impl NormalizedCurve {
    /// 점 목록 (정의된 곡선만).
    pub fn points(&self) -> Option<&[CurvePoint]> {
        match self {
            NormalizedCurve::Points(points) => Some(points),
            _ => None,
        }
    }

    /// 마지막 정규화 값.
    pub fn last_value(&self) -> Option<f64> {
        self.points().and_then(|p| p.last()).map(|p| p.value)
    }
}

/// CAGR 계산 결과.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum CagrResult {
    /// 연복리 수익률 (0.10 = 10%)
    Rate(f64),
    /// 행이 2개 미만이거나 경과 기간이 0 이하 (값 0으로 취급)
    Insufficient,
    /// 시작 값이 0 이하이거나 결과가 유한하지 않음
    Undefined,
}

impl CagrResult {
    /// 표시용 값. `Insufficient`는 0, `Undefined`는 `None`입니다.
    pub fn value(self) -> Option<f64> {
        match self {
            CagrResult::Rate(rate) => Some(rate),
            CagrResult::Insufficient => Some(0.0),
            CagrResult::Undefined => None,
        }
    }

    /// 실제 계산된 값이 있는지 확인합니다.
    pub fn is_rate(&self) -> bool {
        matches!(self, CagrResult::Rate(_))
    }
}

/// 100 단위 투자 후 구간 말 가치.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum FinalValue {
    /// 최종 가치
    Value(f64),
    /// 선택된 행이 없음
    Empty,
    /// 시작 값이 0이거나 결과가 유한하지 않음
    Undefined,
}

impl FinalValue {
    /// 정의된 값.
    pub fn value(self) -> Option<f64> {
        match self {
            FinalValue::Value(v) => Some(v),
            _ => None,
        }
    }
}

/// 출력 컬럼 하나의 구간 결과.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ColumnView {
    /// 계산 결과
    Data {
        curve: NormalizedCurve,
        cagr: CagrResult,
        final_value: FinalValue,
    },
    /// 환산 단계에서 데이터 공백으로 기록된 컬럼
    NoData,
}

impl ColumnView {
    /// 정규화 곡선.
    pub fn curve(&self) -> Option<&NormalizedCurve> {
        match self {
            ColumnView::Data { curve, .. } => Some(curve),
            ColumnView::NoData => None,
        }
    }

    /// CAGR 결과.
    pub fn cagr(&self) -> Option<CagrResult> {
        match self {
            ColumnView::Data { cagr, .. } => Some(*cagr),
            ColumnView::NoData => None,
        }
    }

    /// 최종 가치 결과.
    pub fn final_value(&self) -> Option<FinalValue> {
        match self {
            ColumnView::Data { final_value, .. } => Some(*final_value),
            ColumnView::NoData => None,
        }
    }
}

/// 선택 구간에 대한 전체 결과.
///
/// 요청마다 새로 계산되는 일시적인 값입니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeView {
    /// 요청된 구간 (`None` = 전체)
    requested: Option<DateRange>,
    /// 선택된 첫 날짜
    first_date: Option<NaiveDate>,
    /// 선택된 마지막 날짜
    last_date: Option<NaiveDate>,
    /// 선택된 행 수
    row_count: usize,
    /// 출력 시리즈별 결과
    columns: BTreeMap<OutputSeries, ColumnView>,
}

impl RangeView {
    /// 환산 테이블과 선택 구간으로 뷰를 계산합니다.
    ///
    /// # 매개변수
    ///
    /// * `table` - 기준 통화 테이블 (변경되지 않음)
    /// * `range` - 양 끝 포함 구간, `None`이면 전체
    pub fn compute(table: &ConvertedTable, range: Option<DateRange>) -> Self {
        let rows = table.row_range(range);
        let dates = &table.dates()[rows.clone()];

        let mut columns: BTreeMap<OutputSeries, ColumnView> = table
            .series()
            .filter_map(|series| {
                let values = &table.column(series)?[rows.clone()];
                let view = ColumnView::Data {
                    curve: normalize(dates, values),
                    cagr: calculate_cagr(dates, values),
                    final_value: calculate_final_value(values),
                };
                Some((series, view))
            })
            .collect();

        for &series in table.gaps() {
            columns.insert(series, ColumnView::NoData);
        }

        debug!(
            range = ?range,
            rows = dates.len(),
            columns = columns.len(),
            "Computed range view"
        );

        Self {
            requested: range,
            first_date: dates.first().copied(),
            last_date: dates.last().copied(),
            row_count: dates.len(),
            columns,
        }
    }

    /// 요청된 구간.
    pub fn requested(&self) -> Option<DateRange> {
        self.requested
    }

    /// 선택된 첫 날짜.
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.first_date
    }

    /// 선택된 마지막 날짜.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.last_date
    }

    /// 선택된 행 수.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// 선택된 행이 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// 특정 시리즈의 결과.
    pub fn column(&self, series: OutputSeries) -> Option<&ColumnView> {
        self.columns.get(&series)
    }

    /// 모든 시리즈 결과 (열거형 순서).
    pub fn columns(&self) -> impl Iterator<Item = (OutputSeries, &ColumnView)> {
        self.columns.iter().map(|(series, view)| (*series, view))
    }
}

/// 값 목록을 첫 값 기준 100으로 정규화합니다.
///
/// `dates`와 `values`의 길이는 같아야 합니다.
pub fn normalize(dates: &[NaiveDate], values: &[f64]) -> NormalizedCurve {
    let Some(&base) = values.first() else {
        return NormalizedCurve::Empty;
    };

    if base == 0.0 || !base.is_finite() {
        return NormalizedCurve::Undefined;
    }

    let points: Vec<CurvePoint> = dates
        .iter()
        .zip(values)
        .map(|(&date, &value)| CurvePoint {
            date,
            value: NORMALIZATION_BASE * value / base,
        })
        .collect();

    if points.iter().any(|p| !p.value.is_finite()) {
        return NormalizedCurve::Undefined;
    }

    NormalizedCurve::Points(points)
}

/// 연복리 수익률(CAGR)을 계산합니다.
///
/// # 계산 공식
///
/// CAGR = (종료값 / 시작값) ^ (1 / 년수) - 1, 년수 = 경과일 / 365.25
///
/// # 반환값
///
/// - 행이 2개 미만이거나 년수가 0 이하: [`CagrResult::Insufficient`]
/// - 시작값이 0 이하, 또는 결과가 유한하지 않음: [`CagrResult::Undefined`]
pub fn calculate_cagr(dates: &[NaiveDate], values: &[f64]) -> CagrResult {
    if dates.len() < 2 || values.len() < 2 {
        return CagrResult::Insufficient;
    }

    let (Some(&start_date), Some(&end_date)) = (dates.first(), dates.last()) else {
        return CagrResult::Insufficient;
    };
    let (Some(&start_value), Some(&end_value)) = (values.first(), values.last()) else {
        return CagrResult::Insufficient;
    };

    let years = (end_date - start_date).num_days() as f64 / DAYS_PER_YEAR;
    if years <= 0.0 {
        return CagrResult::Insufficient;
    }

    if start_value <= 0.0 || !start_value.is_finite() {
        return CagrResult::Undefined;
    }

    let ratio = end_value / start_value;
    // 음수 비율의 분수 거듭제곱은 실수 범위에서 정의되지 않음
    if ratio < 0.0 {
        return CagrResult::Undefined;
    }

    let cagr = ratio.powf(1.0 / years) - 1.0;
    if cagr.is_finite() {
        CagrResult::Rate(cagr)
    } else {
        CagrResult::Undefined
    }
}

/// 구간 시작에 100 단위를 투자했을 때 구간 말 가치를 계산합니다.
pub fn calculate_final_value(values: &[f64]) -> FinalValue {
    let (Some(&start), Some(&end)) = (values.first(), values.last()) else {
        return FinalValue::Empty;
    };

    if start == 0.0 || !start.is_finite() {
        return FinalValue::Undefined;
    }

    let value = NORMALIZATION_BASE * end / start;
    if value.is_finite() {
        FinalValue::Value(value)
    } else {
        FinalValue::Undefined
    }
}
