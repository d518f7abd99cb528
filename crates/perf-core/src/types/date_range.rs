//! 조회 기간 타입.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{PerfError, PerfResult};

/// 양 끝을 포함하는 날짜 구간.
///
/// 요청마다 전달되며 저장되지 않습니다. 시작일이 종료일보다 늦은 구간은
/// 에러가 아니라 아무 행도 선택하지 않는 빈 구간입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    /// 시작일 (포함)
    pub start: NaiveDate,
    /// 종료일 (포함)
    pub end: NaiveDate,
}

impl DateRange {
    /// 새 구간을 생성합니다.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// 날짜가 구간에 포함되는지 확인합니다.
    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// 시작일이 종료일보다 늦은지 확인합니다.
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    /// 두 문자열에서 구간을 파싱합니다.
    ///
    /// 차트 라이브러리의 확대/축소 이벤트가 보내는
    /// `2020-01-01 12:34:56.789` 형식도 받아들이며 날짜 부분만 사용합니다.
    pub fn parse(start: &str, end: &str) -> PerfResult<Self> {
        Ok(Self::new(parse_date(start)?, parse_date(end)?))
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ~ {}", self.start, self.end)
    }
}

/// 날짜 문자열을 파싱합니다.
///
/// 지원 형식: `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS[.fff]`, `YYYY-MM-DDTHH:MM:SS[.fff]`
pub fn parse_date(s: &str) -> PerfResult<NaiveDate> {
    let s = s.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }

    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }

    Err(PerfError::Parse(format!(
        "Invalid date '{}'. Expected YYYY-MM-DD",
        s
    )))
}
