//! 거래일 캘린더와 이벤트 윈도우.
//!
//! 별도의 휴장일 테이블 없이, 종목의 실제 일봉 날짜 집합을 권위 있는 캘린더로 사용합니다.
//! 오프셋 계산은 항상 보유 범위 안으로 클램핑되므로 범위를 벗어난 오프셋도
//! "사용 불가"가 아니라 가장 가까운 경계 거래일을 돌려줍니다.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::WindowConfig;

/// 정렬·중복 제거된 거래일 집합.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TradingCalendar {
    days: Vec<NaiveDate>,
}

impl TradingCalendar {
    /// 거래일 목록으로 캘린더를 생성합니다. 입력 순서는 상관없습니다.
    pub fn new(days: impl IntoIterator<Item = NaiveDate>) -> Self {
        let mut days: Vec<NaiveDate> = days.into_iter().collect();
        days.sort_unstable();
        days.dedup();
        Self { days }
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// 정렬된 거래일 슬라이스.
    pub fn days(&self) -> &[NaiveDate] {
        &self.days
    }

    pub fn first(&self) -> Option<NaiveDate> {
        self.days.first().copied()
    }

    pub fn last(&self) -> Option<NaiveDate> {
        self.days.last().copied()
    }

    /// 날짜가 거래일이면 그 위치를 반환합니다.
    pub fn position_of(&self, date: NaiveDate) -> Option<usize> {
        self.days.binary_search(&date).ok()
    }

    /// 기준일의 위치: 기준일 당일 또는 그 이후 첫 거래일.
    ///
    /// 모든 거래일보다 늦은 기준일은 마지막 위치로 맞춥니다.
    fn anchor_position(&self, anchor: NaiveDate) -> Option<usize> {
        if self.days.is_empty() {
            return None;
        }
        let idx = self.days.partition_point(|d| *d < anchor);
        Some(idx.min(self.days.len() - 1))
    }

    /// 기준일로부터 `offset` 거래일 떨어진 날짜를 반환합니다.
    ///
    /// 결과 위치는 `[0, len-1]`로 클램핑됩니다. 캘린더가 비어 있을 때만 `None`입니다.
    pub fn resolve(&self, anchor: NaiveDate, offset: i32) -> Option<NaiveDate> {
        let pos = self.anchor_position(anchor)?;
        let last = self.days.len() as i64 - 1;
        let target = (pos as i64 + i64::from(offset)).clamp(0, last);
        self.days.get(target as usize).copied()
    }

    /// 두 날짜 사이(양끝 제외)에 있는 거래일 수.
    pub fn trading_days_between(&self, a: NaiveDate, b: NaiveDate) -> usize {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let start = self.days.partition_point(|d| *d <= lo);
        let end = self.days.partition_point(|d| *d < hi);
        end.saturating_sub(start)
    }

    /// 실적 발표일 기준 이벤트 윈도우 세트를 계산합니다.
    pub fn window_set(&self, anchor: NaiveDate, config: &WindowConfig) -> EventWindowSet {
        if self.is_empty() {
            return EventWindowSet::empty(anchor);
        }

        let offsets = config
            .named_offsets()
            .into_iter()
            .filter_map(|offset| self.resolve(anchor, offset).map(|date| (offset, date)))
            .collect();

        EventWindowSet {
            anchor,
            observation_start: self.resolve(anchor, config.observation_start_offset),
            observation_end: self.last(),
            accumulation_start: self.resolve(anchor, config.accumulation_start_offset),
            accumulation_end: self.resolve(anchor, config.accumulation_end_offset),
            offsets,
        }
    }
}

/// 한 실적 이벤트의 해석된 날짜 집합.
///
/// 요청마다 새로 계산되며 저장되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventWindowSet {
    /// 실적 발표일 (T)
    pub anchor: NaiveDate,
    /// 관측 구간 시작 (T-20)
    pub observation_start: Option<NaiveDate>,
    /// 관측 구간 종료 (보유한 마지막 거래일)
    pub observation_end: Option<NaiveDate>,
    /// 매집 구간 시작 (T-10)
    pub accumulation_start: Option<NaiveDate>,
    /// 매집 구간 종료 (T-2)
    pub accumulation_end: Option<NaiveDate>,
    /// 이름 붙은 오프셋별 날짜 (T-1, T+0 ... T+20)
    pub offsets: BTreeMap<i32, NaiveDate>,
}

impl EventWindowSet {
    /// 캘린더가 없을 때의 빈 윈도우 세트.
    pub fn empty(anchor: NaiveDate) -> Self {
        Self {
            anchor,
            observation_start: None,
            observation_end: None,
            accumulation_start: None,
            accumulation_end: None,
            offsets: BTreeMap::new(),
        }
    }

    /// 오프셋에 해당하는 날짜.
    pub fn date_at(&self, offset: i32) -> Option<NaiveDate> {
        self.offsets.get(&offset).copied()
    }

    /// 오프셋 표기 (`T-1`, `T+0`, `T+2`).
    pub fn label(offset: i32) -> String {
        format!("T{:+}", offset)
    }

    /// 관측 구간 양끝이 모두 해석되었는지.
    pub fn observation_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.observation_start?, self.observation_end?))
    }
}
