//! 변동성 지표 (Volatility Indicators).
//!
//! - Bollinger Bands (모표준편차)
//! - ATR (Average True Range, Wilder 평활)

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use alpha_core::DailyBar;

use super::{IndicatorError, IndicatorResult};

/// 볼린저 밴드 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BollingerBandsParams {
    /// 이동평균 기간 (기본: 20).
    pub period: usize,
    /// 표준편차 배수 (기본: 2.0).
    pub std_dev_multiplier: Decimal,
}

impl Default for BollingerBandsParams {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_multiplier: dec!(2.0),
        }
    }
}

/// 볼린저 밴드 결과.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BollingerBandsResult {
    /// 상단 밴드 (MA + k × σ).
    pub upper: Option<Decimal>,
    /// 중간 밴드 (MA).
    pub middle: Option<Decimal>,
    /// 하단 밴드 (MA - k × σ).
    pub lower: Option<Decimal>,
    /// 밴드 폭 ((상단 - 하단) / 중간 × 100).
    pub width: Option<Decimal>,
}

/// ATR 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AtrParams {
    /// ATR 기간 (기본: 14).
    pub period: usize,
}

impl Default for AtrParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// 변동성 지표 계산기.
#[derive(Debug, Default)]
pub struct VolatilityIndicators;

impl VolatilityIndicators {
    pub fn new() -> Self {
        Self
    }

    /// 볼린저 밴드 (MA ± k × σ, σ는 모표준편차).
    ///
    /// 합과 제곱합을 윈도우와 함께 밀어 가며 계산합니다.
    /// 중간 밴드가 0이면 폭은 None입니다.
    pub fn bollinger_bands(
        &self,
        prices: &[Decimal],
        params: BollingerBandsParams,
    ) -> IndicatorResult<Vec<BollingerBandsResult>> {
        let period = params.period;
        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "볼린저 기간은 0보다 커야 합니다".to_string(),
            ));
        }
        if prices.len() < period {
            return Err(IndicatorError::InsufficientData {
                required: period,
                provided: prices.len(),
            });
        }

        let n = Decimal::from(period);
        let mut sum = Decimal::ZERO;
        let mut sum_sq = Decimal::ZERO;
        let mut bands = vec![BollingerBandsResult::default(); period - 1];
        bands.reserve(prices.len() + 1 - period);

        for (i, &price) in prices.iter().enumerate() {
            sum += price;
            sum_sq += price * price;
            if i >= period {
                let leaving = prices[i - period];
                sum -= leaving;
                sum_sq -= leaving * leaving;
            }
            if i + 1 < period {
                continue;
            }

            let mean = sum / n;
            // 반올림 오차로 음수가 될 수 있음
            let variance = (sum_sq / n - mean * mean).max(Decimal::ZERO);
            let half_width = params.std_dev_multiplier * self.sqrt_decimal(variance);

            let (upper, lower) = (mean + half_width, mean - half_width);
            bands.push(BollingerBandsResult {
                upper: Some(upper),
                middle: Some(mean),
                lower: Some(lower),
                width: (!mean.is_zero()).then(|| (upper - lower) / mean * dec!(100)),
            });
        }

        Ok(bands)
    }

    /// ATR (Average True Range).
    ///
    /// 첫 값은 인덱스 `period - 1`의 True Range 단순 평균이고, 이후 Wilder 평활입니다.
    pub fn atr(&self, bars: &[DailyBar], params: AtrParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = params.period;
        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "ATR 기간은 0보다 커야 합니다".to_string(),
            ));
        }
        if bars.len() < period {
            return Err(IndicatorError::InsufficientData {
                required: period,
                provided: bars.len(),
            });
        }

        let true_ranges: Vec<Decimal> = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| true_range(i.checked_sub(1).map(|p| bars[p].close), bar))
            .collect();

        let n = Decimal::from(period);
        let mut atr = true_ranges[..period].iter().sum::<Decimal>() / n;

        let mut values = vec![None; period - 1];
        values.push(Some(atr));
        for &tr in &true_ranges[period..] {
            atr = (atr * (n - Decimal::ONE) + tr) / n;
            values.push(Some(atr));
        }

        Ok(values)
    }

    /// Decimal 제곱근 (f64 값으로 시작하는 Newton 반복).
    pub(crate) fn sqrt_decimal(&self, value: Decimal) -> Decimal {
        if value <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let mut root = value
            .to_f64()
            .and_then(|v| Decimal::from_f64(v.sqrt()))
            .filter(|r| r.is_sign_positive() && !r.is_zero())
            .unwrap_or(value);

        for _ in 0..8 {
            let next = (root + value / root) / dec!(2);
            if next == root {
                break;
            }
            root = next;
        }
        root
    }
}

/// True Range. 전일 종가가 없으면 당일 범위입니다.
fn true_range(prev_close: Option<Decimal>, bar: &DailyBar) -> Decimal {
    match prev_close {
        Some(prev) => bar
            .range()
            .max((bar.high - prev).abs())
            .max((bar.low - prev).abs()),
        None => bar.range(),
    }
}
