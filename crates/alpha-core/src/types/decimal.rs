//! 정밀한 금융 계산을 위한 Decimal 유틸리티.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// 금융 정밀도를 위한 가격 타입.
pub type Price = Decimal;

/// 거래량 타입.
pub type Volume = Decimal;

/// 퍼센트 타입 (5.0 = 5%).
pub type Percentage = Decimal;

/// 변화율(%) 계산: `(to - from) / from * 100`.
///
/// 기준값이 0이면 정의되지 않으므로 `None`을 반환합니다.
pub fn pct_change(from: Decimal, to: Decimal) -> Option<Percentage> {
    if from.is_zero() {
        return None;
    }
    Some((to - from) / from * dec!(100))
}

/// 두 선택값의 변화율(%) 계산. 어느 한쪽이라도 없으면 `None`.
pub fn pct_change_opt(from: Option<Decimal>, to: Option<Decimal>) -> Option<Percentage> {
    match (from, to) {
        (Some(from), Some(to)) => pct_change(from, to),
        _ => None,
    }
}
