//! 매집일 신호 분류.

use alpha_core::SignalConfig;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// RSI 백분위 구간.
///
/// - **ExtremelyLow**: 1년 분포의 하위 20% (기본)
/// - **Low**: 20-40%
/// - **Neutral**: 40-60%
/// - **High**: 60-80%
/// - **ExtremelyHigh**: 상위 20%
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RsiPercentileZone {
    ExtremelyLow,
    Low,
    Neutral,
    High,
    ExtremelyHigh,
}

impl RsiPercentileZone {
    /// 임계값에 따라 RSI 백분위를 분류합니다.
    pub fn classify(percentile: Decimal, thresholds: &SignalConfig) -> Self {
        if percentile < thresholds.rsi_percentile_extremely_low {
            Self::ExtremelyLow
        } else if percentile < thresholds.rsi_percentile_low {
            Self::Low
        } else if percentile < thresholds.rsi_percentile_high {
            Self::Neutral
        } else if percentile < thresholds.rsi_percentile_extremely_high {
            Self::High
        } else {
            Self::ExtremelyHigh
        }
    }

    /// 과매도 쪽 구간인지.
    pub fn is_oversold(self) -> bool {
        matches!(self, Self::ExtremelyLow | Self::Low)
    }
}

impl fmt::Display for RsiPercentileZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ExtremelyLow => "극저",
            Self::Low => "저",
            Self::Neutral => "중립",
            Self::High => "고",
            Self::ExtremelyHigh => "극고",
        };
        f.write_str(label)
    }
}
