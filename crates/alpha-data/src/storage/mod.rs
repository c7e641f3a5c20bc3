//! 종목별 시계열 저장소.
//!
//! 종목당 하나의 레코드를 전체 교체 방식으로 저장합니다.
//! - `JsonFileStore`: `<dir>/<SYMBOL>_ohlcv.json`
//! - `InMemorySeriesStore`: 임베딩 및 테스트용

pub mod json;
pub mod memory;

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use alpha_core::{DailyBar, IndicatorColumn, PriceSeries, SeriesRow};

use crate::error::Result;

/// 저장되는 종목 시계열 레코드.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSeries {
    /// 종목 심볼
    pub symbol: String,
    /// 현재 행 전체에 대해 계산이 끝난 지표 컬럼
    #[serde(default)]
    pub indicator_columns: BTreeSet<IndicatorColumn>,
    /// Provider에 요청해 확인한 가장 이른 시작일.
    ///
    /// 첫 행이 이보다 늦다면 그 사이에는 거래일이 없었던 것입니다 (주말, 휴장, 상장 전).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetched_from: Option<NaiveDate>,
    /// 날짜 오름차순 행
    pub rows: Vec<SeriesRow>,
}

impl StoredSeries {
    /// 지표가 없는 원시 일봉으로 레코드를 생성합니다.
    pub fn from_bars(symbol: impl Into<String>, bars: Vec<DailyBar>) -> Self {
        Self {
            symbol: symbol.into(),
            indicator_columns: BTreeSet::new(),
            fetched_from: None,
            rows: bars.into_iter().map(SeriesRow::from_bar).collect(),
        }
    }

    /// 필수 지표 컬럼이 모두 계산되어 있는지.
    pub fn is_complete(&self) -> bool {
        IndicatorColumn::REQUIRED
            .iter()
            .all(|c| self.indicator_columns.contains(c))
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.rows.first().map(|r| r.bar.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|r| r.bar.date)
    }

    /// 이미 확인된 이력의 시작일 (`fetched_from`과 첫 행 중 이른 쪽).
    pub fn coverage_start(&self) -> Option<NaiveDate> {
        let first = self.first_date()?;
        Some(self.fetched_from.map_or(first, |f| f.min(first)))
    }

    /// `[from, to]` 구간을 포함하는지.
    pub fn covers(&self, from: NaiveDate, to: NaiveDate) -> bool {
        matches!(
            (self.coverage_start(), self.last_date()),
            (Some(start), Some(last)) if start <= from && last >= to
        )
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.bar.date).collect()
    }

    /// 지표를 버린 원시 일봉.
    pub fn into_bars(self) -> Vec<DailyBar> {
        self.rows.into_iter().map(|r| r.bar).collect()
    }

    /// `[from, to]` 구간의 시계열.
    pub fn range(&self, from: NaiveDate, to: NaiveDate) -> PriceSeries {
        let rows = self
            .rows
            .iter()
            .filter(|r| r.bar.date >= from && r.bar.date <= to)
            .cloned()
            .collect();
        PriceSeries::new(self.symbol.clone(), rows)
    }
}

/// 종목별 시계열 저장소 trait.
pub trait SeriesStore: Send + Sync {
    /// 저장된 레코드를 읽습니다. 레코드가 없으면 `Ok(None)`.
    fn load(&self, symbol: &str) -> Result<Option<StoredSeries>>;

    /// 레코드를 통째로 교체합니다.
    fn save(&self, symbol: &str, series: &StoredSeries) -> Result<()>;
}
