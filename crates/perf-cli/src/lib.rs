//! 지수 성과 비교 CLI.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - Yahoo Finance 종가 다운로드
//! - 구간별 CAGR 및 투자 가치 요약
//! - 정규화 곡선 출력 (CSV/JSON)
//! - 대화형 구간 조회
//! - SIX 지수 차트 데이터 수집

pub mod commands;
