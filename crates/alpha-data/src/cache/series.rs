//! 지표 보강 시계열 캐시.
//!
//! 저장소에 있는 종목 시계열을 우선 사용하고, 부족할 때만 Provider에서 가져와
//! 병합한 뒤 전체 이력에 대해 지표를 다시 계산해 저장합니다.
//!
//! # 동작 흐름
//!
//! ```text
//! 요청 (symbol, from, to, force_refresh)
//!         │
//!         ▼
//! ┌────────────────────┐
//! │ 1. 종목 Lock 획득   │ ← 같은 종목의 읽기-병합-쓰기는 하나만 처리
//! └─────────┬──────────┘
//!           │
//!     ┌─────┴──────┐
//!     │ 캐시 범위 OK? │
//!     └─────┬──────┘
//!       YES │ NO (또는 force_refresh)
//!           │   │
//!   ┌───────┘   ▼
//!   │     ┌─────────────────────┐
//!   │     │ 2. Provider 조회     │ ← 실패/빈 결과 = 새 데이터 없음
//!   │     └──────────┬──────────┘
//!   │                │
//!   │       ┌────────▼────────┐
//!   │       │ 3. 병합 (새 봉 우선) │
//!   │       └────────┬────────┘
//!   ▼                ▼
//! ┌─────────────────────────────┐
//! │ 4. 지표 불완전 시 전체 재계산 │
//! │ 5. 저장 후 구간 반환          │
//! └─────────────────────────────┘
//! ```

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, RwLock};

use chrono::{Duration, NaiveDate};
use tracing::{debug, info, instrument, warn};

use alpha_analytics::IndicatorEngine;
use alpha_core::{CacheConfig, DailyBar, EngineConfig, IndicatorColumn, IndicatorConfig, PriceSeries, SymbolCatalog};

use crate::error::{DataError, Result};
use crate::provider::DailyBarProvider;
use crate::storage::{SeriesStore, StoredSeries};

/// 종목별 읽기-병합-쓰기 직렬화를 위한 Lock 맵.
type SymbolLockMap = RwLock<HashMap<String, Arc<Mutex<()>>>>;

/// 기존 봉과 새 봉을 병합합니다.
///
/// 같은 날짜는 새 봉이 우선하며, 결과는 중복 없이 날짜 오름차순입니다.
pub fn merge_bars(existing: Vec<DailyBar>, incoming: Vec<DailyBar>) -> Vec<DailyBar> {
    let mut by_date: BTreeMap<NaiveDate, DailyBar> = BTreeMap::new();
    for bar in existing.into_iter().chain(incoming) {
        by_date.insert(bar.date, bar);
    }
    by_date.into_values().collect()
}

/// 지표 보강 시계열 캐시.
pub struct SeriesCache {
    provider: Arc<dyn DailyBarProvider>,
    store: Arc<dyn SeriesStore>,
    catalog: Arc<SymbolCatalog>,
    engine: IndicatorEngine,
    indicators: IndicatorConfig,
    config: CacheConfig,
    symbol_locks: SymbolLockMap,
}

impl SeriesCache {
    pub fn new(
        provider: Arc<dyn DailyBarProvider>,
        store: Arc<dyn SeriesStore>,
        catalog: Arc<SymbolCatalog>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            provider,
            store,
            catalog,
            engine: IndicatorEngine::new(),
            indicators: config.indicators.clone(),
            config: config.cache.clone(),
            symbol_locks: RwLock::new(HashMap::new()),
        }
    }

    pub fn catalog(&self) -> &SymbolCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// `[from, to]` 구간의 지표 보강 시계열을 반환합니다.
    ///
    /// 캐시도 없고 Provider도 데이터를 주지 못하면 `Ok(None)`.
    /// 저장 실패나 잘못된 지표 설정만 에러입니다.
    #[instrument(skip(self))]
    pub fn get_series(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
        force_refresh: bool,
    ) -> Result<Option<PriceSeries>> {
        if from > to {
            return Err(DataError::InvalidInput(format!(
                "시작일이 종료일보다 늦습니다: {} > {}",
                from, to
            )));
        }

        let lock = self.get_or_create_lock(symbol);
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut cached = self.load_cached(symbol);

        if !force_refresh {
            if let Some(stored) = cached.as_mut().filter(|s| s.covers(from, to)) {
                if stored.is_complete() {
                    debug!(symbol = %symbol, rows = stored.rows.len(), "캐시 적중");
                } else {
                    info!(symbol = %symbol, "지표 컬럼 불완전, 전체 이력 재계산");
                    self.enrich(stored)?;
                    self.store.save(symbol, stored)?;
                }
                return Ok(Some(stored.range(from, to)));
            }
        }

        let fresh = self.fetch_from_provider(symbol, from, to);

        if fresh.is_empty() {
            let Some(mut stored) = cached else {
                info!(symbol = %symbol, %from, %to, "캐시와 새 데이터 모두 없음");
                return Ok(None);
            };

            warn!(symbol = %symbol, %from, %to, "새 데이터 없음, 기존 캐시 사용");
            if !stored.is_complete() {
                self.enrich(&mut stored)?;
                self.store.save(symbol, &stored)?;
            }
            let series = stored.range(from, to);
            return Ok((!series.is_empty()).then_some(series));
        }

        let cached_rows = cached.as_ref().map_or(0, |s| s.rows.len());
        let fetched = fresh.len();
        let fetched_from = cached
            .as_ref()
            .and_then(|s| s.fetched_from)
            .map_or(from, |f| f.min(from));
        let existing = cached.map(StoredSeries::into_bars).unwrap_or_default();

        let mut stored = StoredSeries::from_bars(symbol, merge_bars(existing, fresh));
        stored.fetched_from = Some(fetched_from);
        self.enrich(&mut stored)?;
        self.store.save(symbol, &stored)?;

        info!(
            symbol = %symbol,
            cached = cached_rows,
            fetched = fetched,
            total = stored.rows.len(),
            "시계열 병합 및 저장 완료"
        );

        Ok(Some(stored.range(from, to)))
    }

    /// 분석 구간 앞에 버퍼(기본 150 달력일)를 붙여 시계열을 요청합니다.
    ///
    /// 장기 이동평균이 분석 시작일에 이미 정의되어 있도록 하기 위함입니다.
    pub fn fetch_with_buffer(
        &self,
        symbol: &str,
        analysis_start: NaiveDate,
        analysis_end: NaiveDate,
    ) -> Result<Option<PriceSeries>> {
        let from = analysis_start - Duration::days(self.config.buffer_days);
        self.get_series(symbol, from, analysis_end, false)
    }

    /// 저장된 시계열의 거래일 목록. 캐시가 없으면 빈 목록.
    pub fn trading_days(&self, symbol: &str) -> Vec<NaiveDate> {
        let lock = self.get_or_create_lock(symbol);
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());

        self.load_cached(symbol)
            .map(|s| s.dates())
            .unwrap_or_default()
    }

    /// 저장 레코드 로드. 읽기/파싱 실패는 캐시 없음으로 취급합니다.
    fn load_cached(&self, symbol: &str) -> Option<StoredSeries> {
        match self.store.load(symbol) {
            Ok(stored) => stored,
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "캐시 레코드 손상, 무시");
                None
            }
        }
    }

    /// 전체 행에 대해 지표를 다시 계산하고 컬럼 목록을 채웁니다.
    fn enrich(&self, stored: &mut StoredSeries) -> Result<()> {
        let bars: Vec<DailyBar> = stored.rows.iter().map(|r| r.bar.clone()).collect();
        stored.rows = self.engine.enrich(&bars, &self.indicators)?;
        stored.indicator_columns = IndicatorColumn::REQUIRED.into_iter().collect();
        Ok(())
    }

    /// Provider 조회. 어떤 실패든 빈 결과로 돌려줍니다.
    fn fetch_from_provider(&self, symbol: &str, from: NaiveDate, to: NaiveDate) -> Vec<DailyBar> {
        let Some(instrument_id) = self.catalog.instrument_id(symbol) else {
            warn!(symbol = %symbol, "instrument 토큰 없음, 새 데이터 없음으로 처리");
            return Vec::new();
        };

        match self.provider.get_daily_bars(instrument_id, from, to) {
            Ok(bars) => {
                debug!(symbol = %symbol, instrument_id, count = bars.len(), "Provider 조회 완료");
                bars
            }
            Err(e) => {
                warn!(symbol = %symbol, instrument_id, error = %e, "Provider 조회 실패");
                Vec::new()
            }
        }
    }

    /// 동시성 제어를 위한 Lock 획득 또는 생성.
    fn get_or_create_lock(&self, symbol: &str) -> Arc<Mutex<()>> {
        let locks = self.symbol_locks.read().unwrap_or_else(|e| e.into_inner());
        if let Some(lock) = locks.get(symbol) {
            return lock.clone();
        }
        drop(locks);

        let mut locks = self.symbol_locks.write().unwrap_or_else(|e| e.into_inner());
        locks
            .entry(symbol.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

impl std::fmt::Debug for SeriesCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeriesCache")
            .field("config", &self.config)
            .field("indicators", &self.indicators)
            .finish_non_exhaustive()
    }
}
