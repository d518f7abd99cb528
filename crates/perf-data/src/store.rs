//! 종목별 원시 시계열 저장소.
//!
//! 외부 제공자에서 한 번 가져온 시계열을 종목 키로 보관합니다.
//! 저장된 시계열은 변경되지 않습니다.

use chrono::NaiveDate;
use futures::future::try_join_all;
use perf_core::{series_span, Instrument, RawSeries};
use std::collections::BTreeMap;
use tracing::{info, warn, Instrument as _};

use crate::error::{DataError, Result};
use crate::provider::PriceSeriesProvider;

/// 원시 시계열 저장소.
#[derive(Debug, Clone, Default)]
pub struct SeriesStore {
    series: BTreeMap<Instrument, RawSeries>,
}

impl SeriesStore {
    /// 빈 저장소를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 시계열을 저장합니다.
    ///
    /// # 에러
    ///
    /// - 날짜가 오름차순이 아니면 `InvalidData`
    /// - 이미 저장된 종목이면 `InvalidData` (저장된 시계열은 변경 불가)
    pub fn insert(&mut self, instrument: Instrument, series: RawSeries) -> Result<()> {
        if let Some(index) = series.first_unsorted_index() {
            return Err(DataError::InvalidData(format!(
                "{} series is not sorted by date (index {})",
                instrument, index
            )));
        }

        if self.series.contains_key(&instrument) {
            return Err(DataError::InvalidData(format!(
                "{} series is already stored",
                instrument
            )));
        }

        self.series.insert(instrument, series);
        Ok(())
    }

    /// 종목의 시계열.
    pub fn get(&self, instrument: Instrument) -> Option<&RawSeries> {
        self.series.get(&instrument)
    }

    /// 종목 포함 여부.
    pub fn contains(&self, instrument: Instrument) -> bool {
        self.series.contains_key(&instrument)
    }

    /// 저장된 종목 수.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// 비어있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// 종목 순서대로 시계열을 순회합니다.
    pub fn iter(&self) -> impl Iterator<Item = (Instrument, &RawSeries)> {
        self.series.iter().map(|(i, s)| (*i, s))
    }

    /// 정렬기 입력용 맵.
    pub fn as_map(&self) -> &BTreeMap<Instrument, RawSeries> {
        &self.series
    }

    /// 저장되지 않은 종목 목록.
    pub fn missing_instruments(&self) -> Vec<Instrument> {
        Instrument::ALL
            .iter()
            .copied()
            .filter(|i| !self.series.contains_key(i))
            .collect()
    }
}

/// 제공자에서 모든 종목을 가져와 저장소를 채웁니다.
///
/// 종목들은 동시에 요청되며 하나라도 실패하면 전체가 실패합니다.
/// 재시도는 하지 않습니다.
///
/// # 매개변수
///
/// * `provider` - 가격 시계열 제공자
/// * `instruments` - (종목, 티커) 목록
/// * `start` / `end` - 수집 기간 (양 끝 포함)
pub async fn load_store<P>(
    provider: &P,
    instruments: &[(Instrument, String)],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<SeriesStore>
where
    P: PriceSeriesProvider + ?Sized,
{
    info!(
        provider = provider.name(),
        instruments = instruments.len(),
        %start,
        %end,
        "Loading price series"
    );

    let fetches = instruments.iter().map(|(instrument, ticker)| {
        let span = series_span!("fetch_series", instrument, ticker);
        async move {
            let series = provider
                .fetch_series(*instrument, ticker, start, end)
                .await?;
            if series.is_empty() {
                warn!("Provider returned no observations");
            } else {
                info!(
                    count = series.len(),
                    first = ?series.first_date(),
                    last = ?series.last_date(),
                    "Series loaded"
                );
            }
            Ok::<_, DataError>((*instrument, series))
        }
        .instrument(span)
    });

    let mut store = SeriesStore::new();
    for (instrument, series) in try_join_all(fetches).await? {
        store.insert(instrument, series)?;
    }

    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    /// 고정 값을 반환하는 테스트용 제공자.
    struct FixedProvider;

    #[async_trait]
    impl PriceSeriesProvider for FixedProvider {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn fetch_series(
            &self,
            instrument: Instrument,
            _ticker: &str,
            start: NaiveDate,
            end: NaiveDate,
        ) -> Result<RawSeries> {
            if instrument == Instrument::Gold {
                return Err(DataError::FetchError("gold unavailable".to_string()));
            }
            Ok(RawSeries::from_pairs(vec![(start, 1.0), (end, 2.0)]))
        }
    }

    #[test]
    fn test_insert_rejects_unsorted() {
        let mut store = SeriesStore::new();
        let unsorted = RawSeries::from_pairs(vec![(d(2020, 1, 2), 1.0), (d(2020, 1, 1), 1.0)]);

        let err = store.insert(Instrument::Dax, unsorted).unwrap_err();
        assert!(matches!(err, DataError::InvalidData(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_insert_is_write_once() {
        let mut store = SeriesStore::new();
        let series = RawSeries::from_pairs(vec![(d(2020, 1, 1), 1.0)]);

        store.insert(Instrument::Dax, series.clone()).unwrap();
        assert!(store.insert(Instrument::Dax, series).is_err());
        assert_eq!(store.len(), 1);
        assert!(store.contains(Instrument::Dax));
        assert_eq!(store.missing_instruments().len(), Instrument::ALL.len() - 1);
    }

    #[tokio::test]
    async fn test_load_store_fetches_all() {
        let instruments = vec![
            (Instrument::Dax, "^GDAXI".to_string()),
            (Instrument::EurChf, "EURCHF=X".to_string()),
        ];

        let store = load_store(&FixedProvider, &instruments, d(2020, 1, 1), d(2020, 2, 1))
            .await
            .unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(Instrument::EurChf).unwrap().len(), 2);
        let keys: Vec<_> = store.iter().map(|(i, _)| i).collect();
        assert_eq!(keys, vec![Instrument::Dax, Instrument::EurChf]);
    }

    #[tokio::test]
    async fn test_load_store_propagates_failure() {
        let instruments = vec![
            (Instrument::Dax, "^GDAXI".to_string()),
            (Instrument::Gold, "GC=F".to_string()),
        ];

        let result = load_store(&FixedProvider, &instruments, d(2020, 1, 1), d(2020, 2, 1)).await;
        assert!(matches!(result, Err(DataError::FetchError(_))));
    }
}
