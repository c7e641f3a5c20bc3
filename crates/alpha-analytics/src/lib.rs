//! # Alpha Analytics
//!
//! 일봉 시계열에 대한 기술적 지표 계산과 실적 이벤트 윈도우 분석을 제공합니다.
//!
//! - [`indicators`]: RSI, ATR, 볼린저 밴드, 이동평균, 롤링 백분위 순위 및 보강 파이프라인
//! - [`event`]: 고정 기준선 RVOL, 매집 구간, 기준 고점, 낙폭, 이벤트 수익률

pub mod event;
pub mod indicators;

pub use event::{
    AccumulationDay, AccumulationSignal, AnalysisResult, EventAnalyzer, EventReturns, ExitPolicy,
    ForwardReturn, ReferenceHigh, RsiPercentileZone,
};
pub use indicators::{IndicatorEngine, IndicatorError, IndicatorResult};
