//! 롤링 백분위 순위.
//!
//! 임의의 지표 컬럼을 과거 분포 안에서의 위치(0-100)로 정규화합니다.
//! RSI, ATR, 거래량에 같은 윈도우로 적용됩니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{IndicatorError, IndicatorResult};

/// 백분위 순위 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PercentileParams {
    /// 과거 샘플 윈도우 (기본: 252, 약 1년).
    pub window: usize,
}

impl Default for PercentileParams {
    fn default() -> Self {
        Self { window: 252 }
    }
}

/// 롤링 백분위 순위 계산.
///
/// 위치 `i`에서 `i`로 끝나는 최대 `window`개의 샘플 중 정의된 값만 사용합니다.
/// - 유효 샘플이 2개 미만이면 None
/// - 현재 값이 None이면 None
/// - 최대 == 최소이면 정확히 50
/// - 그 외 `(v[i] - min) / (max - min) × 100`
pub fn rolling_percentile_rank(
    values: &[Option<Decimal>],
    params: PercentileParams,
) -> IndicatorResult<Vec<Option<Decimal>>> {
    let window = params.window;

    if window < 2 {
        return Err(IndicatorError::InvalidParameter(format!(
            "백분위 윈도우는 2 이상이어야 합니다: {}",
            window
        )));
    }

    let ranks = values
        .iter()
        .enumerate()
        .map(|(i, current)| {
            let current = (*current)?;
            let start = (i + 1).saturating_sub(window);

            let mut valid = values[start..=i].iter().flatten();
            let first = *valid.next()?;
            let (min, max, count) = valid.fold((first, first, 1usize), |(min, max, n), &v| {
                (min.min(v), max.max(v), n + 1)
            });

            if count < 2 {
                return None;
            }
            if max == min {
                return Some(dec!(50));
            }
            Some((current - min) / (max - min) * dec!(100))
        })
        .collect();

    Ok(ranks)
}
