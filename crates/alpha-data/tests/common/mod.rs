//! 통합 테스트 공용 픽스처.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use alpha_core::{DailyBar, SymbolCatalog, SymbolDetails};
use alpha_data::{DailyBarProvider, ProviderError};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub const SYMBOL: &str = "POLYCAB";
pub const TOKEN: u64 = 2455041;

/// `start`부터 연속된 평일.
pub fn business_days(start: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let mut days = Vec::with_capacity(count);
    let mut d = start;
    while days.len() < count {
        if !matches!(d.weekday(), Weekday::Sat | Weekday::Sun) {
            days.push(d);
        }
        d += Duration::days(1);
    }
    days
}

/// 종가가 `close`인 평평한 봉 (고가 +5, 저가 -5).
pub fn flat_bar(date: NaiveDate, close: Decimal) -> DailyBar {
    DailyBar::new(date, close, close + dec!(5), close - dec!(5), close, dec!(1000))
}

pub fn flat_bars(days: &[NaiveDate], close: Decimal) -> Vec<DailyBar> {
    days.iter().map(|&d| flat_bar(d, close)).collect()
}

pub fn catalog(earnings_dates: Vec<NaiveDate>) -> SymbolCatalog {
    SymbolCatalog::new([
        SymbolDetails {
            symbol: SYMBOL.to_string(),
            instrument_token: Some(TOKEN),
            earnings_dates,
            name: Some("Polycab India".to_string()),
        },
        SymbolDetails {
            symbol: "NOTOKEN".to_string(),
            instrument_token: None,
            earnings_dates: vec![],
            name: None,
        },
    ])
}

/// 호출 기록을 남기는 테스트용 Provider.
#[derive(Default)]
pub struct MockProvider {
    bars: Mutex<Vec<DailyBar>>,
    failing: AtomicBool,
    calls: AtomicUsize,
    requests: Mutex<Vec<(u64, NaiveDate, NaiveDate)>>,
}

impl MockProvider {
    pub fn new(bars: Vec<DailyBar>) -> Self {
        Self {
            bars: Mutex::new(bars),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        let provider = Self::default();
        provider.set_failing(true);
        provider
    }

    pub fn set_bars(&self, bars: Vec<DailyBar>) {
        *self.bars.lock().unwrap() = bars;
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<(u64, NaiveDate, NaiveDate)> {
        self.requests.lock().unwrap().clone()
    }
}

impl DailyBarProvider for MockProvider {
    fn get_daily_bars(
        &self,
        instrument_id: u64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyBar>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push((instrument_id, from, to));

        if self.failing.load(Ordering::SeqCst) {
            return Err(ProviderError::Network("connection refused".to_string()));
        }

        Ok(self
            .bars
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.date >= from && b.date <= to)
            .cloned()
            .collect())
    }
}
