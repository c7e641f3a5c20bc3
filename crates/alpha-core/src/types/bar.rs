//! 일봉 및 지표 컬럼 타입.
//!
//! - `DailyBar` - 일별 OHLCV 데이터
//! - `IndicatorColumn` - 캐시가 유지하는 파생 지표 컬럼 목록
//! - `IndicatorValues` - 한 거래일의 지표 값 묶음
//! - `SeriesRow` - 일봉 + 지표 값

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::decimal::{Price, Volume};

/// 일별 OHLCV 캔들.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyBar {
    /// 거래일
    pub date: NaiveDate,
    /// 시가
    pub open: Price,
    /// 고가
    pub high: Price,
    /// 저가
    pub low: Price,
    /// 종가
    pub close: Price,
    /// 거래량
    pub volume: Volume,
}

impl DailyBar {
    /// 새 일봉을 생성합니다.
    pub fn new(
        date: NaiveDate,
        open: Price,
        high: Price,
        low: Price,
        close: Price,
        volume: Volume,
    ) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// 대표가(저가+고가+종가 평균)를 반환합니다.
    pub fn typical_price(&self) -> Price {
        (self.low + self.high + self.close) / Decimal::from(3)
    }

    /// 캔들 범위(고가 - 저가)를 반환합니다.
    pub fn range(&self) -> Price {
        self.high - self.low
    }
}

/// 캐시가 유지하는 파생 지표 컬럼.
///
/// 직렬화 이름은 저장 레코드의 컬럼 이름(기본 기간 기준)을 따릅니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorColumn {
    #[serde(rename = "rsi_14")]
    Rsi,
    RsiPercentile,
    #[serde(rename = "atr_14")]
    Atr,
    AtrPercentile,
    BbLower,
    BbUpper,
    BbWidth,
    VolumePercentile,
    #[serde(rename = "sma_20")]
    SmaShort,
    #[serde(rename = "sma_50")]
    SmaMedium,
    #[serde(rename = "sma_100")]
    SmaLong,
    #[serde(rename = "sma_200")]
    SmaMajor,
    #[serde(rename = "volume_sma_20")]
    VolumeSmaShort,
    #[serde(rename = "volume_sma_50")]
    VolumeSmaMedium,
    #[serde(rename = "distance_sma_50")]
    DistanceSmaMedium,
    #[serde(rename = "distance_sma_100")]
    DistanceSmaLong,
    #[serde(rename = "distance_sma_200")]
    DistanceSmaMajor,
}

impl IndicatorColumn {
    /// 캐시 완전성 검사에 필요한 전체 컬럼.
    pub const REQUIRED: [IndicatorColumn; 17] = [
        IndicatorColumn::Rsi,
        IndicatorColumn::RsiPercentile,
        IndicatorColumn::Atr,
        IndicatorColumn::AtrPercentile,
        IndicatorColumn::BbLower,
        IndicatorColumn::BbUpper,
        IndicatorColumn::BbWidth,
        IndicatorColumn::VolumePercentile,
        IndicatorColumn::SmaShort,
        IndicatorColumn::SmaMedium,
        IndicatorColumn::SmaLong,
        IndicatorColumn::SmaMajor,
        IndicatorColumn::VolumeSmaShort,
        IndicatorColumn::VolumeSmaMedium,
        IndicatorColumn::DistanceSmaMedium,
        IndicatorColumn::DistanceSmaLong,
        IndicatorColumn::DistanceSmaMajor,
    ];

    /// 컬럼 이름.
    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorColumn::Rsi => "rsi_14",
            IndicatorColumn::RsiPercentile => "rsi_percentile",
            IndicatorColumn::Atr => "atr_14",
            IndicatorColumn::AtrPercentile => "atr_percentile",
            IndicatorColumn::BbLower => "bb_lower",
            IndicatorColumn::BbUpper => "bb_upper",
            IndicatorColumn::BbWidth => "bb_width",
            IndicatorColumn::VolumePercentile => "volume_percentile",
            IndicatorColumn::SmaShort => "sma_20",
            IndicatorColumn::SmaMedium => "sma_50",
            IndicatorColumn::SmaLong => "sma_100",
            IndicatorColumn::SmaMajor => "sma_200",
            IndicatorColumn::VolumeSmaShort => "volume_sma_20",
            IndicatorColumn::VolumeSmaMedium => "volume_sma_50",
            IndicatorColumn::DistanceSmaMedium => "distance_sma_50",
            IndicatorColumn::DistanceSmaLong => "distance_sma_100",
            IndicatorColumn::DistanceSmaMajor => "distance_sma_200",
        }
    }
}

impl std::fmt::Display for IndicatorColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 한 거래일의 지표 값.
///
/// `None`은 "이력 부족"을 의미하며 0으로 취급해서는 안 됩니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorValues {
    /// RSI
    #[serde(rename = "rsi_14")]
    pub rsi: Option<Decimal>,
    /// RSI의 롤링 백분위 순위 (0-100)
    pub rsi_percentile: Option<Decimal>,
    /// ATR
    #[serde(rename = "atr_14")]
    pub atr: Option<Decimal>,
    /// ATR의 롤링 백분위 순위 (0-100)
    pub atr_percentile: Option<Decimal>,
    /// 볼린저 하단 밴드
    pub bb_lower: Option<Decimal>,
    /// 볼린저 상단 밴드
    pub bb_upper: Option<Decimal>,
    /// 볼린저 밴드 폭 (중간 밴드 대비 %)
    pub bb_width: Option<Decimal>,
    /// 거래량의 롤링 백분위 순위 (0-100)
    pub volume_percentile: Option<Decimal>,
    /// 단기 가격 이동평균
    #[serde(rename = "sma_20")]
    pub sma_short: Option<Decimal>,
    /// 중기 가격 이동평균
    #[serde(rename = "sma_50")]
    pub sma_medium: Option<Decimal>,
    /// 장기 가격 이동평균
    #[serde(rename = "sma_100")]
    pub sma_long: Option<Decimal>,
    /// 주요 가격 이동평균
    #[serde(rename = "sma_200")]
    pub sma_major: Option<Decimal>,
    /// 단기 거래량 이동평균
    #[serde(rename = "volume_sma_20")]
    pub volume_sma_short: Option<Decimal>,
    /// 중기 거래량 이동평균
    #[serde(rename = "volume_sma_50")]
    pub volume_sma_medium: Option<Decimal>,
    /// 종가와 중기 이동평균의 거리 (%)
    #[serde(rename = "distance_sma_50")]
    pub distance_sma_medium: Option<Decimal>,
    /// 종가와 장기 이동평균의 거리 (%)
    #[serde(rename = "distance_sma_100")]
    pub distance_sma_long: Option<Decimal>,
    /// 종가와 주요 이동평균의 거리 (%)
    #[serde(rename = "distance_sma_200")]
    pub distance_sma_major: Option<Decimal>,
}

impl IndicatorValues {
    /// 컬럼 이름으로 값을 조회합니다.
    pub fn get(&self, column: IndicatorColumn) -> Option<Decimal> {
        match column {
            IndicatorColumn::Rsi => self.rsi,
            IndicatorColumn::RsiPercentile => self.rsi_percentile,
            IndicatorColumn::Atr => self.atr,
            IndicatorColumn::AtrPercentile => self.atr_percentile,
            IndicatorColumn::BbLower => self.bb_lower,
            IndicatorColumn::BbUpper => self.bb_upper,
            IndicatorColumn::BbWidth => self.bb_width,
            IndicatorColumn::VolumePercentile => self.volume_percentile,
            IndicatorColumn::SmaShort => self.sma_short,
            IndicatorColumn::SmaMedium => self.sma_medium,
            IndicatorColumn::SmaLong => self.sma_long,
            IndicatorColumn::SmaMajor => self.sma_major,
            IndicatorColumn::VolumeSmaShort => self.volume_sma_short,
            IndicatorColumn::VolumeSmaMedium => self.volume_sma_medium,
            IndicatorColumn::DistanceSmaMedium => self.distance_sma_medium,
            IndicatorColumn::DistanceSmaLong => self.distance_sma_long,
            IndicatorColumn::DistanceSmaMajor => self.distance_sma_major,
        }
    }

    /// 컬럼 이름으로 값을 설정합니다.
    pub fn set(&mut self, column: IndicatorColumn, value: Option<Decimal>) {
        let slot = match column {
            IndicatorColumn::Rsi => &mut self.rsi,
            IndicatorColumn::RsiPercentile => &mut self.rsi_percentile,
            IndicatorColumn::Atr => &mut self.atr,
            IndicatorColumn::AtrPercentile => &mut self.atr_percentile,
            IndicatorColumn::BbLower => &mut self.bb_lower,
            IndicatorColumn::BbUpper => &mut self.bb_upper,
            IndicatorColumn::BbWidth => &mut self.bb_width,
            IndicatorColumn::VolumePercentile => &mut self.volume_percentile,
            IndicatorColumn::SmaShort => &mut self.sma_short,
            IndicatorColumn::SmaMedium => &mut self.sma_medium,
            IndicatorColumn::SmaLong => &mut self.sma_long,
            IndicatorColumn::SmaMajor => &mut self.sma_major,
            IndicatorColumn::VolumeSmaShort => &mut self.volume_sma_short,
            IndicatorColumn::VolumeSmaMedium => &mut self.volume_sma_medium,
            IndicatorColumn::DistanceSmaMedium => &mut self.distance_sma_medium,
            IndicatorColumn::DistanceSmaLong => &mut self.distance_sma_long,
            IndicatorColumn::DistanceSmaMajor => &mut self.distance_sma_major,
        };
        *slot = value;
    }
}

/// 일봉과 그 날의 지표 값.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesRow {
    /// 일봉
    pub bar: DailyBar,
    /// 지표 값
    #[serde(default)]
    pub indicators: IndicatorValues,
}

impl SeriesRow {
    /// 지표 없이 일봉만으로 행을 생성합니다.
    pub fn from_bar(bar: DailyBar) -> Self {
        Self {
            bar,
            indicators: IndicatorValues::default(),
        }
    }

    /// 거래일.
    pub fn date(&self) -> NaiveDate {
        self.bar.date
    }
}
