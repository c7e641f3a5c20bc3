//! 시계열 캐시 경로 테스트 (적중, 재계산, 폴백, 강제 갱신).

mod common;

use std::sync::Arc;

use alpha_core::{DailyBar, EngineConfig, IndicatorColumn};
use alpha_data::{
    DataError, InMemorySeriesStore, JsonFileStore, SeriesCache, SeriesStore, StoredSeries,
};
use chrono::{Duration, NaiveDate};
use rust_decimal_macros::dec;

use common::{business_days, catalog, flat_bars, MockProvider, SYMBOL, TOKEN};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 2).unwrap()
}

fn setup(
    provider: Arc<MockProvider>,
    store: Arc<dyn SeriesStore>,
) -> SeriesCache {
    SeriesCache::new(provider, store, Arc::new(catalog(vec![])), &EngineConfig::default())
}

/// 모든 지표가 계산된 레코드.
fn complete_record(bars: Vec<DailyBar>) -> StoredSeries {
    let mut stored = StoredSeries::from_bars(SYMBOL, bars);
    stored.indicator_columns = IndicatorColumn::REQUIRED.into_iter().collect();
    stored
}

#[test]
fn test_miss_fetches_enriches_and_persists() {
    let days = business_days(start(), 300);
    let provider = Arc::new(MockProvider::new(flat_bars(&days, dec!(100))));
    let store = Arc::new(InMemorySeriesStore::new());
    let cache = setup(provider.clone(), store.clone());

    let series = cache
        .get_series(SYMBOL, days[0], days[299], false)
        .unwrap()
        .unwrap();

    assert_eq!(series.len(), 300);
    assert_eq!(provider.calls(), 1);
    assert_eq!(provider.requests()[0], (TOKEN, days[0], days[299]));

    let last = &series.rows[299].indicators;
    assert_eq!(last.sma_major, Some(dec!(100)));
    assert_eq!(last.rsi, Some(dec!(50)));
    assert_eq!(last.distance_sma_major, Some(dec!(0)));

    let stored = store.load(SYMBOL).unwrap().unwrap();
    assert!(stored.is_complete());
    assert_eq!(stored.rows.len(), 300);
}

#[test]
fn test_hit_returns_sub_range_without_provider() {
    let days = business_days(start(), 100);
    let provider = Arc::new(MockProvider::new(flat_bars(&days, dec!(100))));
    let store = Arc::new(InMemorySeriesStore::new());
    let cache = setup(provider.clone(), store);

    cache.get_series(SYMBOL, days[0], days[99], false).unwrap();
    let series = cache
        .get_series(SYMBOL, days[10], days[20], false)
        .unwrap()
        .unwrap();

    assert_eq!(provider.calls(), 1);
    assert_eq!(series.len(), 11);
    assert_eq!(series.first_date(), Some(days[10]));
    assert_eq!(series.last_date(), Some(days[20]));
}

#[test]
fn test_range_starting_on_weekend_is_hit_after_first_fetch() {
    let days = business_days(start(), 40);
    let provider = Arc::new(MockProvider::new(flat_bars(&days, dec!(100))));
    let store = Arc::new(InMemorySeriesStore::new());
    let cache = setup(provider.clone(), store.clone());

    // 2022-12-31은 토요일, 첫 거래일은 2023-01-02
    let saturday = NaiveDate::from_ymd_opt(2022, 12, 31).unwrap();
    cache.get_series(SYMBOL, saturday, days[39], false).unwrap();
    let series = cache
        .get_series(SYMBOL, saturday, days[39], false)
        .unwrap()
        .unwrap();

    assert_eq!(provider.calls(), 1);
    assert_eq!(series.first_date(), Some(days[0]));
    assert_eq!(store.load(SYMBOL).unwrap().unwrap().fetched_from, Some(saturday));

    // 더 이른 시작일은 여전히 조회 대상
    let earlier = saturday - Duration::days(7);
    cache.get_series(SYMBOL, earlier, days[39], false).unwrap();
    assert_eq!(provider.calls(), 2);
    assert_eq!(store.load(SYMBOL).unwrap().unwrap().fetched_from, Some(earlier));
}

#[test]
fn test_incomplete_manifest_recomputes_full_history() {
    let days = business_days(start(), 80);
    let provider = Arc::new(MockProvider::new(vec![]));
    let store = Arc::new(InMemorySeriesStore::new());
    store
        .save(SYMBOL, &StoredSeries::from_bars(SYMBOL, flat_bars(&days, dec!(100))))
        .unwrap();
    let cache = setup(provider.clone(), store.clone());

    let series = cache
        .get_series(SYMBOL, days[60], days[79], false)
        .unwrap()
        .unwrap();

    assert_eq!(provider.calls(), 0);
    assert_eq!(series.len(), 20);
    // 전체 이력으로 계산했으므로 구간 첫 행에도 50일 SMA가 있음
    assert_eq!(series.rows[0].indicators.sma_medium, Some(dec!(100)));

    let stored = store.load(SYMBOL).unwrap().unwrap();
    assert!(stored.is_complete());
    assert!(stored.rows[79].indicators.rsi.is_some());
}

#[test]
fn test_stale_cache_used_when_provider_fails() {
    let days = business_days(start(), 120);
    let provider = Arc::new(MockProvider::failing());
    let store = Arc::new(InMemorySeriesStore::new());
    store
        .save(SYMBOL, &complete_record(flat_bars(&days[..100], dec!(100))))
        .unwrap();
    let cache = setup(provider.clone(), store);

    let series = cache
        .get_series(SYMBOL, days[50], days[119], false)
        .unwrap()
        .unwrap();

    assert_eq!(provider.calls(), 1);
    assert_eq!(series.first_date(), Some(days[50]));
    assert_eq!(series.last_date(), Some(days[99]));
}

#[test]
fn test_stale_incomplete_cache_is_completed() {
    let days = business_days(start(), 60);
    let provider = Arc::new(MockProvider::new(vec![]));
    let store = Arc::new(InMemorySeriesStore::new());
    store
        .save(SYMBOL, &StoredSeries::from_bars(SYMBOL, flat_bars(&days[..40], dec!(100))))
        .unwrap();
    let cache = setup(provider.clone(), store.clone());

    // Provider는 빈 결과 → 새 데이터 없음
    let series = cache
        .get_series(SYMBOL, days[0], days[59], false)
        .unwrap()
        .unwrap();

    assert_eq!(series.len(), 40);
    assert_eq!(series.rows[39].indicators.sma_short, Some(dec!(100)));
    assert!(store.load(SYMBOL).unwrap().unwrap().is_complete());
}

#[test]
fn test_no_cache_and_no_data_is_unavailable() {
    let days = business_days(start(), 10);
    let cache = setup(
        Arc::new(MockProvider::failing()),
        Arc::new(InMemorySeriesStore::new()),
    );
    assert!(cache.get_series(SYMBOL, days[0], days[9], false).unwrap().is_none());

    let cache = setup(
        Arc::new(MockProvider::new(vec![])),
        Arc::new(InMemorySeriesStore::new()),
    );
    assert!(cache.get_series(SYMBOL, days[0], days[9], false).unwrap().is_none());
}

#[test]
fn test_unknown_instrument_is_no_new_data() {
    let days = business_days(start(), 10);
    let provider = Arc::new(MockProvider::new(flat_bars(&days, dec!(100))));
    let cache = setup(provider.clone(), Arc::new(InMemorySeriesStore::new()));

    assert!(cache.get_series("NOTOKEN", days[0], days[9], false).unwrap().is_none());
    assert!(cache.get_series("UNLISTED", days[0], days[9], false).unwrap().is_none());
    assert_eq!(provider.calls(), 0);
}

#[test]
fn test_force_refresh_merges_with_new_bars_winning() {
    let days = business_days(start(), 60);
    let provider = Arc::new(MockProvider::new(flat_bars(&days, dec!(100))));
    let store = Arc::new(InMemorySeriesStore::new());
    let cache = setup(provider.clone(), store.clone());

    cache.get_series(SYMBOL, days[0], days[59], false).unwrap();

    // 뒤쪽 10일이 정정됨
    provider.set_bars(flat_bars(&days[50..], dec!(200)));
    let series = cache
        .get_series(SYMBOL, days[50], days[59], true)
        .unwrap()
        .unwrap();

    assert_eq!(provider.calls(), 2);
    assert!(series.rows.iter().all(|r| r.bar.close == dec!(200)));

    let stored = store.load(SYMBOL).unwrap().unwrap();
    assert_eq!(stored.rows.len(), 60);
    assert_eq!(stored.rows[0].bar.close, dec!(100));
    assert_eq!(stored.rows[59].bar.close, dec!(200));
}

#[test]
fn test_fetch_with_buffer_extends_start() {
    let days = business_days(start(), 300);
    let provider = Arc::new(MockProvider::new(flat_bars(&days, dec!(100))));
    let cache = setup(provider.clone(), Arc::new(InMemorySeriesStore::new()));

    let analysis_start = days[250];
    let analysis_end = days[280];
    let series = cache
        .fetch_with_buffer(SYMBOL, analysis_start, analysis_end)
        .unwrap()
        .unwrap();

    let (_, from, to) = provider.requests()[0];
    assert_eq!(from, analysis_start - Duration::days(150));
    assert_eq!(to, analysis_end);
    assert!(series.first_date().unwrap() >= from);
    assert!(series.first_date().unwrap() < analysis_start);
}

#[test]
fn test_trading_days() {
    let days = business_days(start(), 30);
    let provider = Arc::new(MockProvider::new(flat_bars(&days, dec!(100))));
    let cache = setup(provider, Arc::new(InMemorySeriesStore::new()));

    assert!(cache.trading_days(SYMBOL).is_empty());
    cache.get_series(SYMBOL, days[0], days[29], false).unwrap();
    assert_eq!(cache.trading_days(SYMBOL), days);
}

#[test]
fn test_corrupt_record_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonFileStore::new(dir.path()));
    std::fs::write(store.path_for(SYMBOL), "{ not json").unwrap();

    let days = business_days(start(), 30);
    let provider = Arc::new(MockProvider::new(flat_bars(&days, dec!(100))));
    let cache = setup(provider.clone(), store.clone());

    let series = cache
        .get_series(SYMBOL, days[0], days[29], false)
        .unwrap()
        .unwrap();
    assert_eq!(series.len(), 30);
    assert_eq!(store.load(SYMBOL).unwrap().unwrap().rows.len(), 30);
}

struct ReadOnlyStore;

impl SeriesStore for ReadOnlyStore {
    fn load(&self, _symbol: &str) -> alpha_data::Result<Option<StoredSeries>> {
        Ok(None)
    }

    fn save(&self, _symbol: &str, _series: &StoredSeries) -> alpha_data::Result<()> {
        Err(DataError::StorageError("read-only".to_string()))
    }
}

#[test]
fn test_write_failure_is_error() {
    let days = business_days(start(), 30);
    let provider = Arc::new(MockProvider::new(flat_bars(&days, dec!(100))));
    let cache = setup(provider, Arc::new(ReadOnlyStore));

    let err = cache.get_series(SYMBOL, days[0], days[29], false).unwrap_err();
    assert!(matches!(err, DataError::StorageError(_)));
}

#[test]
fn test_inverted_range_is_invalid_input() {
    let days = business_days(start(), 5);
    let cache = setup(
        Arc::new(MockProvider::new(vec![])),
        Arc::new(InMemorySeriesStore::new()),
    );

    let err = cache.get_series(SYMBOL, days[4], days[0], false).unwrap_err();
    assert!(matches!(err, DataError::InvalidInput(_)));
}

#[test]
fn test_concurrent_requests_for_same_symbol() {
    let days = business_days(start(), 120);
    let provider = Arc::new(MockProvider::new(flat_bars(&days, dec!(100))));
    let store = Arc::new(InMemorySeriesStore::new());
    let cache = Arc::new(setup(provider.clone(), store.clone()));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let cache = cache.clone();
            let (from, to) = (days[0], days[119]);
            std::thread::spawn(move || cache.get_series(SYMBOL, from, to, false).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap().unwrap().len(), 120);
    }
    // 첫 요청만 Provider를 호출하고 나머지는 캐시 적중
    assert_eq!(provider.calls(), 1);
    assert_eq!(store.load(SYMBOL).unwrap().unwrap().rows.len(), 120);
}
