//! 성과 분석 시스템의 에러 타입.
//!
//! 이 모듈은 크레이트 경계를 넘어 전파되는 공통 에러를 정의합니다.
//! 컬럼 단위의 수치 조건(0 기준값, 데이터 부족 등)은 에러가 아니라
//! 결과 값으로 표현되므로 여기에 포함되지 않습니다.

use thiserror::Error;

/// 핵심 에러.
#[derive(Debug, Error)]
pub enum PerfError {
    /// 설정 파일/환경 변수 로드 실패
    #[error("설정 에러: {0}")]
    Config(String),

    /// 잘못된 입력 (알 수 없는 종목, 요청 형식 등)
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 날짜 파싱 실패
    #[error("파싱 에러: {0}")]
    Parse(String),
}

/// 핵심 작업을 위한 Result 타입.
pub type PerfResult<T> = Result<T, PerfError>;

impl From<config::ConfigError> for PerfError {
    fn from(err: config::ConfigError) -> Self {
        PerfError::Config(err.to_string())
    }
}
