//! 실적 이벤트 윈도우 분석.
//!
//! 실적 발표일(T) 전후의 가격/거래량 패턴을 분석합니다:
//! - 매집 구간(T-10 ~ T-2)의 대표가 최저점 (매집가)
//! - 고정 기준선 상대 거래량 (RVOL)
//! - 관측 시작부터 매집일 직전까지의 기준 고점과 낙폭
//! - 발표 직전 상승률, 이벤트 수익률, 발표 이후 오프셋별 수익률 (4가지 청산가 정책)

mod analyzer;
pub mod rvol;
mod signal;

use std::collections::BTreeMap;

use alpha_core::SignalConfig;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use analyzer::EventAnalyzer;
pub use signal::RsiPercentileZone;

/// 매집 구간 최저 대표가를 기록한 날.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccumulationDay {
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    /// (저가 + 고가 + 종가) / 3
    pub typical_price: Decimal,
    /// 거래량 / 단기 거래량 SMA (고정 기준선)
    pub rvol_short: Option<Decimal>,
    /// 거래량 / 중기 거래량 SMA (고정 기준선)
    pub rvol_medium: Option<Decimal>,
    pub rsi: Option<Decimal>,
    pub rsi_percentile: Option<Decimal>,
    /// 이 날과 실적 발표일 사이(양끝 제외)의 거래일 수
    pub days_before_anchor: usize,
}

impl AccumulationDay {
    /// 중기 RVOL이 임계값(`rvol_high_probability`)을 넘는 고확률 매집일인지.
    pub fn is_high_probability(&self, signals: &SignalConfig) -> bool {
        self.rvol_medium
            .is_some_and(|rvol| rvol > signals.rvol_high_probability)
    }

    /// RSI 백분위 구간.
    pub fn rsi_zone(&self, signals: &SignalConfig) -> Option<RsiPercentileZone> {
        self.rsi_percentile
            .map(|p| RsiPercentileZone::classify(p, signals))
    }

    /// 설정 임계값으로 매집일 신호를 분류합니다.
    pub fn signal(&self, signals: &SignalConfig) -> AccumulationSignal {
        AccumulationSignal {
            date: self.date,
            high_probability: self.is_high_probability(signals),
            rsi_zone: self.rsi_zone(signals),
        }
    }
}

/// 매집일 신호 분류 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccumulationSignal {
    pub date: NaiveDate,
    /// 중기 RVOL 임계값 초과 여부
    pub high_probability: bool,
    pub rsi_zone: Option<RsiPercentileZone>,
}

/// 기준 고점 (가격과 날짜).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceHigh {
    pub price: Decimal,
    pub date: NaiveDate,
}

/// 수익률 계산에 쓰는 청산가 정책.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitPolicy {
    Close,
    Low,
    High,
    Typical,
}

impl ExitPolicy {
    pub const ALL: [ExitPolicy; 4] = [
        ExitPolicy::Close,
        ExitPolicy::Low,
        ExitPolicy::High,
        ExitPolicy::Typical,
    ];
}

/// 한 오프셋의 정책별 수익률 (%). 날짜나 가격이 없으면 각 값이 None.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardReturn {
    /// 오프셋에 해당하는 거래일
    pub date: Option<NaiveDate>,
    pub close: Option<Decimal>,
    pub low: Option<Decimal>,
    pub high: Option<Decimal>,
    pub typical: Option<Decimal>,
}

impl ForwardReturn {
    pub fn get(&self, policy: ExitPolicy) -> Option<Decimal> {
        match policy {
            ExitPolicy::Close => self.close,
            ExitPolicy::Low => self.low,
            ExitPolicy::High => self.high,
            ExitPolicy::Typical => self.typical,
        }
    }
}

/// 수익률 묶음.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventReturns {
    /// 매집가 → T-1 종가 (%)
    pub run_up: Option<Decimal>,
    /// T-1 종가 → T+2 종가 (%)
    pub event: Option<Decimal>,
    /// 오프셋별 매집가 대비 수익률
    pub forward: BTreeMap<i32, ForwardReturn>,
}

impl EventReturns {
    /// 오프셋과 정책에 해당하는 매집가 대비 수익률 (%).
    pub fn profit(&self, offset: i32, policy: ExitPolicy) -> Option<Decimal> {
        self.forward.get(&offset)?.get(policy)
    }
}

/// 한 실적 이벤트의 분석 결과.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// 매집 구간의 최저 대표가
    pub accumulation_price: Option<Decimal>,
    /// 최저 대표가를 기록한 모든 날 (날짜순)
    pub accumulation_days: Vec<AccumulationDay>,
    pub reference_high: Option<ReferenceHigh>,
    /// (매집가 - 기준 고점) / 기준 고점 × 100
    pub drawdown_pct: Option<Decimal>,
    pub returns: EventReturns,
}

impl AnalysisResult {
    /// 모든 값이 비어 있는 결과.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.accumulation_days.is_empty()
    }

    /// 가장 이른 매집일. 기준 고점 구간의 끝을 정합니다.
    pub fn primary_accumulation_day(&self) -> Option<&AccumulationDay> {
        self.accumulation_days.first()
    }
}
