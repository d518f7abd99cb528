//! 원시 가격 시계열 타입.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 단일 거래일의 가격 관측치.
///
/// 가격이 `None`이면 해당 거래일에 관측치가 없음을 뜻합니다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// 거래일
    pub date: NaiveDate,
    /// 종가
    pub price: Option<f64>,
}

impl PricePoint {
    /// 가격이 있는 관측치를 생성합니다.
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self {
            date,
            price: Some(price),
        }
    }

    /// 가격이 없는 관측치를 생성합니다.
    pub fn missing(date: NaiveDate) -> Self {
        Self { date, price: None }
    }

    /// 유한한 가격만 반환합니다 (NaN/inf는 결측으로 취급).
    pub fn valid_price(&self) -> Option<f64> {
        self.price.filter(|p| p.is_finite())
    }
}

/// 한 종목의 날짜 오름차순 가격 시계열.
///
/// 생성 후 변경되지 않습니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSeries {
    points: Vec<PricePoint>,
}

impl RawSeries {
    /// 관측치 목록으로 시계열을 생성합니다.
    pub fn new(points: Vec<PricePoint>) -> Self {
        Self { points }
    }

    /// (날짜, 가격) 쌍에서 시계열을 생성합니다.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        Self {
            points: pairs
                .into_iter()
                .map(|(date, price)| PricePoint::new(date, price))
                .collect(),
        }
    }

    /// 모든 관측치를 반환합니다.
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// 관측치 수.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// 비어있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 유효 가격이 있는 관측치 수.
    pub fn valid_count(&self) -> usize {
        self.points
            .iter()
            .filter(|p| p.valid_price().is_some())
            .count()
    }

    /// 첫 거래일.
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    /// 마지막 거래일.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// 날짜가 감소하는 첫 위치를 찾습니다.
    ///
    /// 같은 날짜의 연속(중복)은 허용되며, 정렬되어 있으면 `None`을 반환합니다.
    pub fn first_unsorted_index(&self) -> Option<usize> {
        self.points
            .windows(2)
            .position(|w| w[1].date < w[0].date)
            .map(|i| i + 1)
    }
}

impl FromIterator<PricePoint> for RawSeries {
    fn from_iter<T: IntoIterator<Item = PricePoint>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
