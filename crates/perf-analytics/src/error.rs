//! 분석 파이프라인 에러 타입.
//!
//! 파이프라인 구성을 중단시키는 입력 형식 오류만 에러로 취급합니다.
//! 컬럼 단위 수치 조건은 [`crate::range_view`]의 결과 값으로 표현됩니다.

use thiserror::Error;

/// 정렬 단계의 치명적 입력 에러.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AlignError {
    /// 시계열 날짜가 오름차순이 아님
    #[error("Series '{key}' is not sorted by date (first violation at index {index})")]
    Unsorted {
        /// 시계열 키
        key: String,
        /// 날짜가 감소한 첫 위치
        index: usize,
    },
}

/// 분석 작업을 위한 Result 타입.
pub type AnalyticsResult<T> = Result<T, AlignError>;
