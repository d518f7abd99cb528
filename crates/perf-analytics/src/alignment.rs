//! 거래일 정렬 유틸리티.
//!
//! 종목마다 다른 거래 달력(휴장일, 상장 시점)을 하나의 오름차순 날짜 축으로
//! 병합합니다.
//!
//! # 규칙
//!
//! - 날짜 축은 모든 입력 날짜의 합집합 (중복 제거, 오름차순)
//! - 관측치가 없는 날짜는 직전 유효 값으로 채움 (forward-fill)
//! - 첫 관측치 이전 날짜는 `None` 유지
//! - 한 시계열 안의 중복 날짜는 마지막 유효 값이 우선 (last-write-wins)
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! use perf_analytics::Aligner;
//!
//! let aligned = Aligner::align(&series)?;
//! assert_eq!(aligned.dates().len(), union_len);
//! ```

use chrono::NaiveDate;
use perf_core::{PricePoint, RawSeries};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;
use tracing::debug;

use crate::error::AlignError;

/// 합집합 날짜 축 위에 정렬된 직사각형 테이블.
///
/// 모든 컬럼의 길이는 `dates`와 같습니다.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedTable<K> {
    dates: Vec<NaiveDate>,
    columns: BTreeMap<K, Vec<Option<f64>>>,
}

impl<K: Ord> AlignedTable<K> {
    /// 날짜 축.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// 컬럼 값 (없는 키면 `None`).
    pub fn column(&self, key: &K) -> Option<&[Option<f64>]> {
        self.columns.get(key).map(|c| c.as_slice())
    }

    /// 특정 행의 값.
    pub fn value(&self, key: &K, row: usize) -> Option<f64> {
        self.columns.get(key).and_then(|c| c.get(row).copied().flatten())
    }

    /// 행 수.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// 비어있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// 거래일 정렬기.
pub struct Aligner;

impl Aligner {
    /// 여러 시계열을 하나의 날짜 축으로 정렬합니다.
    ///
    /// # 에러
    ///
    /// 날짜가 감소하는 시계열이 있으면 [`AlignError::Unsorted`]를 반환합니다.
    /// 빈 입력은 빈 테이블을 반환합니다.
    pub fn align<K>(series: &BTreeMap<K, RawSeries>) -> Result<AlignedTable<K>, AlignError>
    where
        K: Ord + Clone + Debug,
    {
        for (key, raw) in series {
            if let Some(index) = raw.first_unsorted_index() {
                return Err(AlignError::Unsorted {
                    key: format!("{:?}", key),
                    index,
                });
            }
        }

        let dates: Vec<NaiveDate> = series
            .values()
            .flat_map(|raw| raw.points().iter().map(|p| p.date))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let columns = series
            .iter()
            .map(|(key, raw)| {
                let (observations, collapsed) = Self::collapse_duplicates(raw.points());
                if collapsed > 0 {
                    debug!(series = ?key, collapsed, "Collapsed duplicate dates (last value wins)");
                }
                (key.clone(), Self::forward_fill(&dates, &observations))
            })
            .collect();

        debug!(
            series = series.len(),
            dates = dates.len(),
            "Aligned series onto union calendar"
        );

        Ok(AlignedTable { dates, columns })
    }

    /// 같은 날짜의 연속 관측치를 하나로 합칩니다.
    ///
    /// 마지막 유효 값이 남고, 유효 값이 없으면 결측입니다.
    /// 반환값은 (관측치 목록, 합쳐진 관측치 수)입니다.
    fn collapse_duplicates(points: &[PricePoint]) -> (Vec<(NaiveDate, Option<f64>)>, usize) {
        let mut out: Vec<(NaiveDate, Option<f64>)> = Vec::with_capacity(points.len());
        let mut collapsed = 0;

        for point in points {
            let price = point.valid_price();
            match out.last_mut() {
                Some((date, value)) if *date == point.date => {
                    collapsed += 1;
                    if price.is_some() {
                        *value = price;
                    }
                }
                _ => out.push((point.date, price)),
            }
        }

        (out, collapsed)
    }

    /// 날짜 축 위에서 관측치를 forward-fill 합니다.
    fn forward_fill(dates: &[NaiveDate], observations: &[(NaiveDate, Option<f64>)]) -> Vec<Option<f64>> {
        let mut filled = Vec::with_capacity(dates.len());
        let mut last: Option<f64> = None;
        let mut cursor = observations.iter().peekable();

        for &date in dates {
            if let Some(&&(obs_date, price)) = cursor.peek() {
                if obs_date == date {
                    if price.is_some() {
                        last = price;
                    }
                    cursor.next();
                }
            }
            filled.push(last);
        }

        filled
    }
}
