//! 입력 종목과 출력 시리즈 정의.
//!
//! 시스템이 다루는 종목 집합은 설계 시점에 고정되어 있으므로 문자열 키 대신
//! 닫힌 열거형으로 표현합니다.
//!
//! - [`Instrument`]: 데이터 제공자에서 가져오는 7개 원시 시계열 (지수 5개, 환율 2개)
//! - [`OutputSeries`]: 기준 통화(CHF)로 환산된 5개 출력 시리즈
//! - [`ConversionDef`]: 출력 시리즈 하나의 환산 규칙

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PerfError;

/// 기준 통화 코드.
pub const REFERENCE_CURRENCY: &str = "CHF";

/// 종목 유형.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstrumentKind {
    /// 주가/원자재 지수
    Index,
    /// 환율 (기준 통화 / 외화)
    FxRate,
}

/// 원시 가격 시계열을 가진 입력 종목.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Instrument {
    /// 독일 DAX (EUR)
    #[serde(rename = "DAX")]
    Dax,
    /// S&P 500 Total Return (USD)
    #[serde(rename = "SP500_TR")]
    Sp500Tr,
    /// 스위스 SMI (CHF)
    #[serde(rename = "SMIC")]
    Smic,
    /// 프랑스 CAC 40 (EUR)
    #[serde(rename = "CAC40")]
    Cac40,
    /// 금 선물 (USD)
    #[serde(rename = "GOLD")]
    Gold,
    /// EUR → CHF 환율
    #[serde(rename = "EURCHF")]
    EurChf,
    /// USD → CHF 환율
    #[serde(rename = "USDCHF")]
    UsdChf,
}

impl Instrument {
    /// 모든 입력 종목.
    pub const ALL: [Instrument; 7] = [
        Instrument::Dax,
        Instrument::Sp500Tr,
        Instrument::Smic,
        Instrument::Cac40,
        Instrument::Gold,
        Instrument::EurChf,
        Instrument::UsdChf,
    ];

    /// 안정적인 식별 키 (설정 파일, CSV 파일명에 사용).
    pub fn key(&self) -> &'static str {
        match self {
            Instrument::Dax => "DAX",
            Instrument::Sp500Tr => "SP500_TR",
            Instrument::Smic => "SMIC",
            Instrument::Cac40 => "CAC40",
            Instrument::Gold => "GOLD",
            Instrument::EurChf => "EURCHF",
            Instrument::UsdChf => "USDCHF",
        }
    }

    /// Yahoo Finance 기본 티커.
    pub fn default_ticker(&self) -> &'static str {
        match self {
            Instrument::Dax => "^GDAXI",
            Instrument::Sp500Tr => "^SP500TR",
            Instrument::Smic => "^SSMI",
            Instrument::Cac40 => "^FCHI",
            Instrument::Gold => "GC=F",
            Instrument::EurChf => "EURCHF=X",
            Instrument::UsdChf => "USDCHF=X",
        }
    }

    /// 종목 유형.
    pub fn kind(&self) -> InstrumentKind {
        match self {
            Instrument::EurChf | Instrument::UsdChf => InstrumentKind::FxRate,
            _ => InstrumentKind::Index,
        }
    }

    /// 환율 종목인지 확인합니다.
    pub fn is_fx(&self) -> bool {
        self.kind() == InstrumentKind::FxRate
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Instrument {
    type Err = PerfError;

    /// 키 또는 기본 티커로 종목을 찾습니다 (대소문자 무시).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Instrument::ALL
            .iter()
            .copied()
            .find(|i| i.key().eq_ignore_ascii_case(s) || i.default_ticker().eq_ignore_ascii_case(s))
            .ok_or_else(|| PerfError::InvalidInput(format!("Unknown instrument: {}", s)))
    }
}

/// 기준 통화로 환산된 출력 시리즈.
///
/// 열거형 순서가 곧 출력 컬럼 순서입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OutputSeries {
    #[serde(rename = "DAX_CHF")]
    DaxChf,
    #[serde(rename = "SP500_TR_CHF")]
    Sp500TrChf,
    #[serde(rename = "SMIC_CHF")]
    SmicChf,
    #[serde(rename = "CAC40_CHF")]
    Cac40Chf,
    #[serde(rename = "GOLD_CHF")]
    GoldChf,
}

impl OutputSeries {
    /// 모든 출력 시리즈.
    pub const ALL: [OutputSeries; 5] = [
        OutputSeries::DaxChf,
        OutputSeries::Sp500TrChf,
        OutputSeries::SmicChf,
        OutputSeries::Cac40Chf,
        OutputSeries::GoldChf,
    ];

    /// 컬럼 키.
    pub fn key(&self) -> &'static str {
        match self {
            OutputSeries::DaxChf => "DAX_CHF",
            OutputSeries::Sp500TrChf => "SP500_TR_CHF",
            OutputSeries::SmicChf => "SMIC_CHF",
            OutputSeries::Cac40Chf => "CAC40_CHF",
            OutputSeries::GoldChf => "GOLD_CHF",
        }
    }

    /// 화면 표시용 이름.
    pub fn label(&self) -> &'static str {
        match self {
            OutputSeries::DaxChf => "DAX CHF",
            OutputSeries::Sp500TrChf => "SP500 TR CHF",
            OutputSeries::SmicChf => "SMIC CHF",
            OutputSeries::Cac40Chf => "CAC40 CHF",
            OutputSeries::GoldChf => "GOLD CHF",
        }
    }
}

impl fmt::Display for OutputSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// 출력 시리즈 하나의 환산 규칙.
///
/// `fx`가 `None`이면 지수가 이미 기준 통화로 표시되어 있으므로 그대로 통과합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionDef<K = Instrument> {
    /// 출력 시리즈
    pub output: OutputSeries,
    /// 지수 컬럼
    pub index: K,
    /// 환율 컬럼 (기준 통화 표시 지수는 `None`)
    pub fx: Option<K>,
}

impl<K> ConversionDef<K> {
    /// 환율을 곱하는 환산 규칙을 생성합니다.
    pub fn converted(output: OutputSeries, index: K, fx: K) -> Self {
        Self {
            output,
            index,
            fx: Some(fx),
        }
    }

    /// 환산 없이 통과하는 규칙을 생성합니다.
    pub fn passthrough(output: OutputSeries, index: K) -> Self {
        Self {
            output,
            index,
            fx: None,
        }
    }
}

impl ConversionDef<Instrument> {
    /// 고정 5개 출력 매핑.
    ///
    /// | 출력 | 지수 | 환율 |
    /// |---|---|---|
    /// | DAX_CHF | DAX | EURCHF |
    /// | SP500_TR_CHF | SP500_TR | USDCHF |
    /// | SMIC_CHF | SMIC | - |
    /// | CAC40_CHF | CAC40 | EURCHF |
    /// | GOLD_CHF | GOLD | USDCHF |
    pub fn standard() -> Vec<Self> {
        vec![
            Self::converted(OutputSeries::DaxChf, Instrument::Dax, Instrument::EurChf),
            Self::converted(
                OutputSeries::Sp500TrChf,
                Instrument::Sp500Tr,
                Instrument::UsdChf,
            ),
            Self::passthrough(OutputSeries::SmicChf, Instrument::Smic),
            Self::converted(OutputSeries::Cac40Chf, Instrument::Cac40, Instrument::EurChf),
            Self::converted(OutputSeries::GoldChf, Instrument::Gold, Instrument::UsdChf),
        ]
    }
}
