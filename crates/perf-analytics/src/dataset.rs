//! 프로세스 수명 동안 공유되는 성과 데이터셋.
//!
//! 시작 시 한 번 [`SeriesStore`]에서 환산 테이블을 만들고, 이후 모든 구간 요청은
//! `&self`로 읽기만 합니다. 여러 요청이 동시에 들어와도 각 요청은 변경되지 않은
//! 같은 스냅샷을 봅니다.
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! use perf_analytics::PerformanceDataset;
//!
//! let dataset = PerformanceDataset::from_store(&store)?.into_shared();
//! let full = dataset.view(None);
//! let zoomed = dataset.view(Some(DateRange::new(start, end)));
//! ```

use chrono::{DateTime, Utc};
use perf_core::{ConversionDef, DateRange, Instrument, RawSeries};
use perf_data::SeriesStore;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::info;

use crate::alignment::Aligner;
use crate::conversion::{ConvertedTable, CurrencyConverter};
use crate::error::AlignError;
use crate::range_view::RangeView;

/// 읽기 전용 성과 데이터셋.
#[derive(Debug, Clone)]
pub struct PerformanceDataset {
    table: ConvertedTable,
    built_at: DateTime<Utc>,
}

impl PerformanceDataset {
    /// 이미 환산된 테이블로 데이터셋을 만듭니다.
    pub fn from_table(table: ConvertedTable) -> Self {
        Self {
            table,
            built_at: Utc::now(),
        }
    }

    /// 원시 시계열을 정렬하고 환산해 데이터셋을 만듭니다.
    ///
    /// # 에러
    ///
    /// 입력 시계열의 날짜 순서가 잘못되면 테이블을 공개하기 전에 중단합니다.
    pub fn build<K>(
        series: &BTreeMap<K, RawSeries>,
        defs: &[ConversionDef<K>],
    ) -> Result<Self, AlignError>
    where
        K: Ord + Clone + Debug,
    {
        let aligned = Aligner::align(series)?;
        let table = CurrencyConverter::convert(&aligned, defs);
        Ok(Self::from_table(table))
    }

    /// 저장소의 시계열로 고정 5개 출력 데이터셋을 만듭니다.
    pub fn from_store(store: &SeriesStore) -> Result<Self, AlignError> {
        let dataset = Self::build::<Instrument>(store.as_map(), &ConversionDef::standard())?;

        info!(
            instruments = store.len(),
            rows = dataset.table.len(),
            first = ?dataset.table.first_date(),
            last = ?dataset.table.last_date(),
            "Performance dataset built"
        );

        Ok(dataset)
    }

    /// 공유 핸들로 변환합니다.
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 환산 테이블.
    pub fn table(&self) -> &ConvertedTable {
        &self.table
    }

    /// 생성 시각.
    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    /// 구간 뷰를 계산합니다.
    pub fn view(&self, range: Option<DateRange>) -> RangeView {
        RangeView::compute(&self.table, range)
    }
}
