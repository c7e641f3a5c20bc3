//! 모멘텀 지표 (Momentum Indicators).
//!
//! - RSI (Relative Strength Index, Wilder 평활)

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{IndicatorError, IndicatorResult};

/// RSI 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RsiParams {
    /// RSI 기간 (기본: 14).
    pub period: usize,
}

impl Default for RsiParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// 모멘텀 지표 계산기.
#[derive(Debug, Default)]
pub struct MomentumCalculator;

impl MomentumCalculator {
    /// 새로운 모멘텀 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// RSI (Relative Strength Index) 계산.
    ///
    /// RSI = 100 - (100 / (1 + RS))
    /// RS = 평균 상승폭 / 평균 하락폭
    ///
    /// 첫 평균은 처음 `period`개 변화량의 단순 평균이고, 이후는 Wilder 평활
    /// `avg = (prev × (period - 1) + 현재) / period` 입니다.
    /// 첫 값은 인덱스 `period`에서 나옵니다.
    ///
    /// 평균 하락폭이 0이면 100, 상승폭도 0이면 50.
    pub fn rsi(&self, prices: &[Decimal], params: RsiParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = params.period;

        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "기간은 0보다 커야 합니다".to_string(),
            ));
        }

        if prices.len() < period + 1 {
            return Err(IndicatorError::InsufficientData {
                required: period + 1,
                provided: prices.len(),
            });
        }

        let period_decimal = Decimal::from(period);
        let weight = Decimal::from(period - 1);

        let mut result = vec![None; period];
        let mut avg_gain = Decimal::ZERO;
        let mut avg_loss = Decimal::ZERO;

        for i in 1..prices.len() {
            let delta = prices[i] - prices[i - 1];
            let gain = delta.max(Decimal::ZERO);
            let loss = (-delta).max(Decimal::ZERO);

            if i <= period {
                avg_gain += gain;
                avg_loss += loss;
                if i < period {
                    continue;
                }
                avg_gain /= period_decimal;
                avg_loss /= period_decimal;
            } else {
                avg_gain = (avg_gain * weight + gain) / period_decimal;
                avg_loss = (avg_loss * weight + loss) / period_decimal;
            }

            result.push(Some(Self::rsi_value(avg_gain, avg_loss)));
        }

        Ok(result)
    }

    fn rsi_value(avg_gain: Decimal, avg_loss: Decimal) -> Decimal {
        if avg_loss.is_zero() {
            if avg_gain.is_zero() {
                dec!(50)
            } else {
                dec!(100)
            }
        } else {
            let rs = avg_gain / avg_loss;
            dec!(100) - (dec!(100) / (Decimal::ONE + rs))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_prices() -> Vec<Decimal> {
        vec![
            dec!(44.34),
            dec!(44.09),
            dec!(44.15),
            dec!(43.61),
            dec!(44.33),
            dec!(44.83),
            dec!(45.10),
            dec!(45.42),
            dec!(45.84),
            dec!(46.08),
            dec!(45.89),
            dec!(46.03),
            dec!(45.61),
            dec!(46.28),
            dec!(46.28),
            dec!(46.00),
            dec!(46.03),
            dec!(46.41),
            dec!(46.22),
            dec!(45.64),
        ]
    }

    #[test]
    fn test_rsi_first_value_at_period() {
        let momentum = MomentumCalculator::new();
        let result = momentum.rsi(&sample_prices(), RsiParams::default()).unwrap();

        assert_eq!(result.len(), 20);
        assert!(result[..14].iter().all(Option::is_none));
        assert!(result[14..].iter().all(Option::is_some));

        // Wilder 원전 예제: 첫 RSI ≈ 70.46
        let first = result[14].unwrap();
        assert!((first - dec!(70.46)).abs() < dec!(0.1), "rsi = {}", first);
    }

    #[test]
    fn test_rsi_range() {
        let momentum = MomentumCalculator::new();
        let result = momentum.rsi(&sample_prices(), RsiParams { period: 5 }).unwrap();

        for value in result.into_iter().flatten() {
            assert!(value >= Decimal::ZERO && value <= dec!(100));
        }
    }

    #[test]
    fn test_rsi_monotonic_series() {
        let momentum = MomentumCalculator::new();

        let rising: Vec<Decimal> = (1..=20).map(Decimal::from).collect();
        let result = momentum.rsi(&rising, RsiParams::default()).unwrap();
        assert_eq!(result[19], Some(dec!(100)));

        let flat = vec![dec!(10); 20];
        let result = momentum.rsi(&flat, RsiParams::default()).unwrap();
        assert_eq!(result[19], Some(dec!(50)));

        let falling: Vec<Decimal> = (1..=20).rev().map(Decimal::from).collect();
        let result = momentum.rsi(&falling, RsiParams::default()).unwrap();
        assert_eq!(result[19], Some(Decimal::ZERO));
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let momentum = MomentumCalculator::new();
        let err = momentum
            .rsi(&sample_prices()[..14], RsiParams::default())
            .unwrap_err();
        assert!(matches!(err, IndicatorError::InsufficientData { required: 15, .. }));
    }
}
