//! 실적 이벤트 분석 파이프라인.
//!
//! 캘린더 해석 → 버퍼 포함 시계열 요청 → 분석 순서로 한 이벤트를 처리합니다.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument};

use alpha_analytics::{AccumulationSignal, AnalysisResult, EventAnalyzer};
use alpha_core::{
    event_span, EngineConfig, EventWindowSet, PriceSeries, SignalConfig, SymbolCatalog, TradingCalendar,
    WindowConfig,
};

use crate::cache::SeriesCache;
use crate::error::Result;

/// 한 실적 이벤트의 분석 산출물.
#[derive(Debug, Clone, Serialize)]
pub struct EventAnalysis {
    pub symbol: String,
    /// 실적 발표일
    pub anchor: NaiveDate,
    /// 인도 회계연도 분기 라벨 (예: "Q3 FY25")
    pub quarter_label: String,
    pub windows: EventWindowSet,
    /// 분석에 사용한 버퍼 포함 시계열
    pub series: PriceSeries,
    pub result: AnalysisResult,
    /// 매집일별 신호 (RVOL 임계값, RSI 백분위 구간)
    pub signals: Vec<AccumulationSignal>,
}

/// 종목 실적 이벤트 분석기.
#[derive(Debug)]
pub struct EventStudy {
    cache: Arc<SeriesCache>,
    analyzer: EventAnalyzer,
    windows: WindowConfig,
    signals: SignalConfig,
    default_history_days: i64,
    as_of: NaiveDate,
}

impl EventStudy {
    pub fn new(cache: Arc<SeriesCache>, config: &EngineConfig) -> Self {
        Self {
            cache,
            analyzer: EventAnalyzer::from_config(config),
            windows: config.windows.clone(),
            signals: config.signals.clone(),
            default_history_days: config.cache.default_history_days,
            as_of: Utc::now().date_naive(),
        }
    }

    /// 기준 날짜(오늘)를 고정합니다.
    pub fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = as_of;
        self
    }

    pub fn catalog(&self) -> &SymbolCatalog {
        self.cache.catalog()
    }

    /// 한 실적 이벤트를 분석합니다. 데이터가 없으면 `Ok(None)`.
    pub fn analyze_event(&self, symbol: &str, anchor: NaiveDate) -> Result<Option<EventAnalysis>> {
        let _span = event_span!("analyze_event", symbol, anchor).entered();

        let calendar = self.calendar(symbol, anchor)?;
        if calendar.is_empty() {
            info!(symbol = %symbol, "거래일 캘린더 없음");
            return Ok(None);
        }

        let windows = calendar.window_set(anchor, &self.windows);
        let Some((obs_start, obs_end)) = windows.observation_bounds() else {
            return Ok(None);
        };

        let Some(series) = self.cache.fetch_with_buffer(symbol, obs_start, obs_end)? else {
            info!(symbol = %symbol, %obs_start, %obs_end, "분석 구간 시계열 없음");
            return Ok(None);
        };

        let result = self.analyzer.analyze(&series.rows, &windows);
        let signals: Vec<AccumulationSignal> = result
            .accumulation_days
            .iter()
            .map(|day| day.signal(&self.signals))
            .collect();
        debug!(
            symbol = %symbol,
            rows = series.len(),
            accumulation_days = result.accumulation_days.len(),
            high_probability = signals.iter().filter(|s| s.high_probability).count(),
            "이벤트 분석 완료"
        );

        Ok(Some(EventAnalysis {
            symbol: symbol.to_string(),
            anchor,
            quarter_label: SymbolCatalog::quarter_label(anchor),
            windows,
            series,
            result,
            signals,
        }))
    }

    /// 종목의 모든 실적 이벤트를 최신순으로 분석합니다.
    ///
    /// 알 수 없는 종목은 빈 목록, 데이터가 없는 이벤트는 건너뜁니다.
    #[instrument(skip(self))]
    pub fn analyze_symbol(&self, symbol: &str) -> Result<Vec<EventAnalysis>> {
        let Some(dates) = self.catalog().earnings_dates(symbol) else {
            info!(symbol = %symbol, "카탈로그에 없는 종목");
            return Ok(Vec::new());
        };

        let mut analyses = Vec::with_capacity(dates.len());
        for anchor in dates {
            if let Some(analysis) = self.analyze_event(symbol, anchor)? {
                analyses.push(analysis);
            }
        }
        Ok(analyses)
    }

    /// 캐시된 거래일로 캘린더를 만듭니다.
    ///
    /// 캐시된 이력이 기준일을 감싸지 못하면(비어 있음, 기준일 이후 시작, 기준일 이전에 끝남,
    /// 관측 시작 오프셋만큼의 선행 거래일 부족) 기본 이력을 먼저 가져옵니다.
    fn calendar(&self, symbol: &str, anchor: NaiveDate) -> Result<TradingCalendar> {
        let days = self.cache.trading_days(symbol);
        if self.spans_anchor(&days, anchor) {
            return Ok(TradingCalendar::new(days));
        }

        let from = anchor.min(self.as_of) - Duration::days(self.default_history_days);
        info!(
            symbol = %symbol,
            %from,
            to = %self.as_of,
            cached_first = ?days.first(),
            cached_last = ?days.last(),
            "거래일 이력 부트스트랩"
        );
        self.cache.get_series(symbol, from, self.as_of, false)?;

        Ok(TradingCalendar::new(self.cache.trading_days(symbol)))
    }

    /// 캐시된 거래일이 기준일의 이벤트 윈도우를 해석하기에 충분한지.
    fn spans_anchor(&self, days: &[NaiveDate], anchor: NaiveDate) -> bool {
        let (Some(&first), Some(&last)) = (days.first(), days.last()) else {
            return false;
        };
        let lookback = self.windows.observation_start_offset.unsigned_abs() as usize;
        let preceding = days.partition_point(|d| *d < anchor);

        first <= anchor && last >= anchor.min(self.as_of) && preceding >= lookback
    }
}
