//! 고정 기준선 상대 거래량 (RVOL).
//!
//! 실적 발표 직전에는 거래량이 급증해 롤링 이동평균 자체가 부풀어 오르므로,
//! 기준일(T-11) 이후로는 그 시점의 거래량 이동평균을 분모로 고정합니다.
//!
//! 계산 순서:
//! 1. 롤링 거래량 SMA (이미 시계열에 계산되어 있음)
//! 2. 고정 인덱스에서 SMA 스냅샷
//! 3. 날짜 비교로 분모를 고르는 단일 나눗셈

use alpha_core::SeriesRow;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// 단기/중기 RVOL 컬럼 (입력 시계열과 같은 길이).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelativeVolume {
    /// 거래량 / 단기 거래량 SMA
    pub short: Vec<Option<Decimal>>,
    /// 거래량 / 중기 거래량 SMA
    pub medium: Vec<Option<Decimal>>,
}

/// 기준일 위치: 기준일 당일 또는 이후 첫 행. 시계열 밖이면 None.
pub fn anchor_position(rows: &[SeriesRow], anchor: NaiveDate) -> Option<usize> {
    let idx = rows.partition_point(|r| r.bar.date < anchor);
    (idx < rows.len()).then_some(idx)
}

/// 기준선을 고정할 행 인덱스 (`anchor 위치 + freeze_offset`).
///
/// 선행 이력이 부족하거나 기준일이 시계열 밖이면 None.
pub fn freeze_index(rows: &[SeriesRow], anchor: NaiveDate, freeze_offset: i32) -> Option<usize> {
    let pos = anchor_position(rows, anchor)?;
    let idx = pos as i64 + i64::from(freeze_offset);
    (0..rows.len() as i64)
        .contains(&idx)
        .then_some(idx as usize)
}

/// 고정 기준선으로 RVOL을 계산합니다.
///
/// 고정일 이후(당일 포함)는 고정된 SMA를 분모로 쓰고, 그 이전이거나 고정값이
/// 없거나 0 이하이면 롤링 SMA를 씁니다. 분모가 없거나 0이면 None.
pub fn frozen_relative_volume(
    rows: &[SeriesRow],
    anchor: NaiveDate,
    freeze_offset: i32,
) -> RelativeVolume {
    let freeze = freeze_index(rows, anchor, freeze_offset).map(|i| &rows[i]);
    let freeze_date = freeze.map(|r| r.bar.date);
    let positive = |v: Option<Decimal>| v.filter(|v| *v > Decimal::ZERO);
    let frozen_short = freeze.and_then(|r| positive(r.indicators.volume_sma_short));
    let frozen_medium = freeze.and_then(|r| positive(r.indicators.volume_sma_medium));

    let ratio = |row: &SeriesRow, rolling: Option<Decimal>, frozen: Option<Decimal>| {
        let after_freeze = freeze_date.is_some_and(|d| row.bar.date >= d);
        let denominator = match frozen {
            Some(frozen) if after_freeze => Some(frozen),
            _ => rolling,
        };
        denominator
            .filter(|d| !d.is_zero())
            .map(|d| row.bar.volume / d)
    };

    let mut result = RelativeVolume {
        short: Vec::with_capacity(rows.len()),
        medium: Vec::with_capacity(rows.len()),
    };
    for row in rows {
        result
            .short
            .push(ratio(row, row.indicators.volume_sma_short, frozen_short));
        result
            .medium
            .push(ratio(row, row.indicators.volume_sma_medium, frozen_medium));
    }
    result
}
