//! 실적 이벤트 분석기.

use alpha_core::{pct_change, pct_change_opt, EngineConfig, EventWindowSet, SeriesRow, TradingCalendar, WindowConfig};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use super::rvol::{frozen_relative_volume, RelativeVolume};
use super::{AccumulationDay, AnalysisResult, EventReturns, ForwardReturn, ReferenceHigh};

/// 지표가 붙은 시계열과 해석된 윈도우 세트로 이벤트를 분석합니다.
///
/// 입력을 변경하지 않는 순수 계산이며, 윈도우 경계가 없으면 빈 결과를 돌려줍니다.
#[derive(Debug, Clone, Default)]
pub struct EventAnalyzer {
    windows: WindowConfig,
}

impl EventAnalyzer {
    pub fn new(windows: WindowConfig) -> Self {
        Self { windows }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.windows.clone())
    }

    pub fn windows(&self) -> &WindowConfig {
        &self.windows
    }

    /// 이벤트 분석.
    ///
    /// `rows`는 날짜 오름차순이어야 합니다.
    pub fn analyze(&self, rows: &[SeriesRow], windows: &EventWindowSet) -> AnalysisResult {
        let (Some(acc_start), Some(acc_end), Some(obs_start)) = (
            windows.accumulation_start,
            windows.accumulation_end,
            windows.observation_start,
        ) else {
            debug!(anchor = %windows.anchor, "윈도우 경계 없음, 빈 결과 반환");
            return AnalysisResult::empty();
        };

        let rvol = frozen_relative_volume(rows, windows.anchor, self.windows.baseline_freeze_offset);

        let accumulation_days = self.accumulation_days(rows, &rvol, acc_start, acc_end, windows.anchor);
        let Some(first_day) = accumulation_days.first() else {
            debug!(anchor = %windows.anchor, %acc_start, %acc_end, "매집 구간에 데이터 없음");
            return AnalysisResult::empty();
        };
        let accumulation_price = first_day.typical_price;

        let reference_high = reference_high(rows, obs_start, first_day.date);
        let drawdown_pct = reference_high.and_then(|h| pct_change(h.price, accumulation_price));

        let returns = self.returns(rows, windows, accumulation_price);

        debug!(
            anchor = %windows.anchor,
            accumulation_price = %accumulation_price,
            accumulation_days = accumulation_days.len(),
            drawdown = ?drawdown_pct,
            "이벤트 분석 완료"
        );

        AnalysisResult {
            accumulation_price: Some(accumulation_price),
            accumulation_days,
            reference_high,
            drawdown_pct,
            returns,
        }
    }

    /// 매집 구간에서 최저 대표가를 기록한 모든 날.
    fn accumulation_days(
        &self,
        rows: &[SeriesRow],
        rvol: &RelativeVolume,
        start: NaiveDate,
        end: NaiveDate,
        anchor: NaiveDate,
    ) -> Vec<AccumulationDay> {
        let in_window: Vec<(usize, Decimal)> = rows
            .iter()
            .enumerate()
            .filter(|(_, r)| r.bar.date >= start && r.bar.date <= end)
            .map(|(i, r)| (i, r.bar.typical_price()))
            .collect();

        let Some(min_typical) = in_window.iter().map(|(_, tp)| *tp).min() else {
            return Vec::new();
        };

        let calendar = TradingCalendar::new(rows.iter().map(|r| r.bar.date));

        in_window
            .into_iter()
            .filter(|(_, tp)| *tp == min_typical)
            .map(|(i, typical_price)| {
                let row = &rows[i];
                AccumulationDay {
                    date: row.bar.date,
                    open: row.bar.open,
                    high: row.bar.high,
                    low: row.bar.low,
                    close: row.bar.close,
                    typical_price,
                    rvol_short: rvol.short[i],
                    rvol_medium: rvol.medium[i],
                    rsi: row.indicators.rsi,
                    rsi_percentile: row.indicators.rsi_percentile,
                    days_before_anchor: calendar.trading_days_between(row.bar.date, anchor),
                }
            })
            .collect()
    }

    fn returns(&self, rows: &[SeriesRow], windows: &EventWindowSet, accumulation_price: Decimal) -> EventReturns {
        let row_at = |offset: i32| windows.date_at(offset).and_then(|date| row_on(rows, date));

        let pre_event_close = row_at(self.windows.pre_event_offset).map(|r| r.bar.close);
        let exit_close = row_at(self.windows.event_exit_offset).map(|r| r.bar.close);

        let run_up = pre_event_close.and_then(|close| pct_change(accumulation_price, close));
        let event = pct_change_opt(pre_event_close, exit_close);

        let forward = self
            .windows
            .return_offsets
            .iter()
            .map(|&offset| {
                let date = windows.date_at(offset);
                let fr = match date.and_then(|d| row_on(rows, d)) {
                    Some(row) => {
                        let ret = |price: Decimal| pct_change(accumulation_price, price);
                        ForwardReturn {
                            date,
                            close: ret(row.bar.close),
                            low: ret(row.bar.low),
                            high: ret(row.bar.high),
                            typical: ret(row.bar.typical_price()),
                        }
                    }
                    None => ForwardReturn {
                        date,
                        ..Default::default()
                    },
                };
                (offset, fr)
            })
            .collect();

        EventReturns {
            run_up,
            event,
            forward,
        }
    }
}

/// 날짜가 정확히 일치하는 행.
fn row_on(rows: &[SeriesRow], date: NaiveDate) -> Option<&SeriesRow> {
    rows.binary_search_by(|r| r.bar.date.cmp(&date))
        .ok()
        .map(|i| &rows[i])
}

/// `[start, end)` 구간의 최고 고가와 그 첫 날짜.
fn reference_high(rows: &[SeriesRow], start: NaiveDate, end: NaiveDate) -> Option<ReferenceHigh> {
    rows.iter()
        .filter(|r| r.bar.date >= start && r.bar.date < end)
        .fold(None, |best: Option<ReferenceHigh>, r| match best {
            Some(b) if b.price >= r.bar.high => Some(b),
            _ => Some(ReferenceHigh {
                price: r.bar.high,
                date: r.bar.date,
            }),
        })
}
