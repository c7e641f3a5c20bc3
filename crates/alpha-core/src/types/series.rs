//! 종목별 지표 포함 일봉 시계열.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::bar::SeriesRow;

/// 날짜 오름차순으로 정렬된 종목 시계열.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSeries {
    /// 종목 심볼
    pub symbol: String,
    /// 날짜 오름차순 행
    pub rows: Vec<SeriesRow>,
}

impl PriceSeries {
    /// 새 시계열을 생성합니다. 행은 이미 정렬되어 있다고 가정합니다.
    pub fn new(symbol: impl Into<String>, rows: Vec<SeriesRow>) -> Self {
        Self {
            symbol: symbol.into(),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 첫 거래일.
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.rows.first().map(|r| r.bar.date)
    }

    /// 마지막 거래일.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|r| r.bar.date)
    }

    /// 모든 거래일.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.bar.date).collect()
    }

    /// 모든 종가.
    pub fn closes(&self) -> Vec<Decimal> {
        self.rows.iter().map(|r| r.bar.close).collect()
    }

    /// `[from, to]` 구간을 포함하는지 확인합니다.
    pub fn covers(&self, from: NaiveDate, to: NaiveDate) -> bool {
        matches!(
            (self.first_date(), self.last_date()),
            (Some(first), Some(last)) if first <= from && last >= to
        )
    }

    /// `[from, to]` 구간(양끝 포함)의 부분 시계열을 반환합니다.
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
