//! 이동평균과 이동평균 이격도.
//!
//! 종가 SMA 20/50/100/200, 거래량 SMA 20/50, 종가의 SMA 대비 거리(%)에 사용합니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{IndicatorError, IndicatorResult};

/// SMA 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SmaParams {
    /// 이동평균 기간.
    pub period: usize,
}

impl Default for SmaParams {
    fn default() -> Self {
        Self { period: 20 }
    }
}

/// 추세 지표 계산기.
#[derive(Debug, Default)]
pub struct TrendIndicators;

impl TrendIndicators {
    /// 새로운 추세 지표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 단순 이동평균 (SMA) 계산.
    ///
    /// SMA = (P1 + P2 + ... + Pn) / n
    ///
    /// 가격뿐 아니라 거래량 이동평균에도 같은 함수를 사용합니다.
    ///
    /// # 반환
    /// 각 시점의 SMA 값 (처음 period-1개는 None)
    pub fn sma(
        &self,
        values: &[Decimal],
        params: SmaParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = params.period;

        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "SMA 기간은 0보다 커야 합니다".to_string(),
            ));
        }

        if values.len() < period {
            return Err(IndicatorError::InsufficientData {
                required: period,
                provided: values.len(),
            });
        }

        let n = Decimal::from(period);
        let mut sum = Decimal::ZERO;

        let averages = values
            .iter()
            .enumerate()
            .map(|(i, &value)| {
                sum += value;
                if i >= period {
                    sum -= values[i - period];
                }
                (i + 1 >= period).then(|| sum / n)
            })
            .collect();

        Ok(averages)
    }

    /// 종가와 이동평균 사이의 거리 (%).
    ///
    /// 거리 = (종가 - SMA) / SMA × 100
    ///
    /// SMA가 없거나 0이면 None.
    pub fn distance_from(&self, closes: &[Decimal], sma: &[Option<Decimal>]) -> Vec<Option<Decimal>> {
        closes
            .iter()
            .zip(sma.iter())
            .map(|(&close, ma)| match ma {
                Some(ma) if !ma.is_zero() => Some((close - ma) / ma * dec!(100)),
                _ => None,
            })
            .collect()
    }
}
