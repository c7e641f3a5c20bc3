//! 기술적 지표 모듈.
//!
//! 각 지표는 `(컬럼, 파라미터) -> Vec<Option<Decimal>>` 형태의 순수 함수이며,
//! [`IndicatorEngine::enrich`]가 이들을 조합해 일봉 시계열에 지표 컬럼을 붙입니다.
//!
//! # 지원 지표
//!
//! ## 추세 지표 (Trend Indicators)
//! - **SMA**: 종가 20/50/100/200, 거래량 20/50
//! - **이동평균 거리**: 종가와 SMA 50/100/200 사이의 거리 (%)
//!
//! ## 모멘텀 지표 (Momentum Indicators)
//! - **RSI**: 상대강도지수 (Wilder 평활)
//!
//! ## 변동성 지표 (Volatility Indicators)
//! - **Bollinger Bands**: 볼린저 밴드 (하단/상단/폭)
//! - **ATR**: 평균 실제 범위
//!
//! ## 정규화
//! - **롤링 백분위 순위**: RSI, ATR, 거래량
//!
//! # 사용 예시
//!
//! ```ignore
//! use alpha_analytics::indicators::IndicatorEngine;
//! use alpha_core::IndicatorConfig;
//!
//! let engine = IndicatorEngine::new();
//! let rows = engine.enrich(&bars, &IndicatorConfig::default())?;
//! ```

pub mod momentum;
pub mod percentile;
pub mod trend;
pub mod volatility;

use alpha_core::{DailyBar, IndicatorConfig, IndicatorValues, SeriesRow};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

pub use momentum::{MomentumCalculator, RsiParams};
pub use percentile::{rolling_percentile_rank, PercentileParams};
pub use trend::{SmaParams, TrendIndicators};
pub use volatility::{AtrParams, BollingerBandsParams, BollingerBandsResult, VolatilityIndicators};

/// 지표 계산 오류.
#[derive(Debug, Error)]
pub enum IndicatorError {
    /// 데이터 부족 오류
    #[error("데이터가 부족합니다: 필요 {required}개, 제공 {provided}개")]
    InsufficientData { required: usize, provided: usize },

    /// 잘못된 파라미터
    #[error("잘못된 파라미터: {0}")]
    InvalidParameter(String),

    /// 계산 오류
    #[error("계산 오류: {0}")]
    CalculationError(String),
}

/// 지표 계산 결과 타입.
pub type IndicatorResult<T> = Result<T, IndicatorError>;

/// 데이터 부족은 전부 None인 컬럼으로, 나머지 오류는 그대로 전파합니다.
fn or_undefined<T: Clone>(result: IndicatorResult<Vec<T>>, len: usize, undefined: T) -> IndicatorResult<Vec<T>> {
    match result {
        Err(IndicatorError::InsufficientData { .. }) => Ok(vec![undefined; len]),
        other => other,
    }
}

/// 통합 지표 엔진.
#[derive(Debug, Default)]
pub struct IndicatorEngine {
    trend: TrendIndicators,
    momentum: MomentumCalculator,
    volatility: VolatilityIndicators,
}

impl IndicatorEngine {
    /// 새로운 지표 엔진 생성.
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== 개별 지표 ====================

    /// 단순 이동평균 (SMA) 계산.
    pub fn sma(&self, values: &[Decimal], params: SmaParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.trend.sma(values, params)
    }

    /// RSI (Relative Strength Index) 계산.
    pub fn rsi(&self, prices: &[Decimal], params: RsiParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.momentum.rsi(prices, params)
    }

    /// 볼린저 밴드 계산.
    pub fn bollinger_bands(
        &self,
        prices: &[Decimal],
        params: BollingerBandsParams,
    ) -> IndicatorResult<Vec<BollingerBandsResult>> {
        self.volatility.bollinger_bands(prices, params)
    }

    /// ATR (Average True Range) 계산.
    pub fn atr(&self, bars: &[DailyBar], params: AtrParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.volatility.atr(bars, params)
    }

    /// 롤링 백분위 순위 계산.
    pub fn percentile_rank(
        &self,
        values: &[Option<Decimal>],
        params: PercentileParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        rolling_percentile_rank(values, params)
    }

    // ==================== 보강 파이프라인 ====================

    /// 날짜 오름차순 일봉 전체에 지표 컬럼을 계산해 붙입니다.
    ///
    /// 이력이 부족한 컬럼은 전부 None이 되며, 0 기간 같은 잘못된 설정은 에러입니다.
    pub fn enrich(&self, bars: &[DailyBar], config: &IndicatorConfig) -> IndicatorResult<Vec<SeriesRow>> {
        let len = bars.len();
        let closes: Vec<Decimal> = bars.iter().map(|b| b.close).collect();
        let volumes: Vec<Decimal> = bars.iter().map(|b| b.volume).collect();

        let sma = |values: &[Decimal], period: usize| {
            or_undefined(self.trend.sma(values, SmaParams { period }), len, None)
        };
        let percentile = PercentileParams {
            window: config.percentile_window,
        };

        let rsi = or_undefined(
            self.momentum.rsi(&closes, RsiParams { period: config.rsi_period }),
            len,
            None,
        )?;
        let rsi_percentile = rolling_percentile_rank(&rsi, percentile)?;

        let atr = or_undefined(
            self.volatility.atr(bars, AtrParams { period: config.atr_period }),
            len,
            None,
        )?;
        let atr_percentile = rolling_percentile_rank(&atr, percentile)?;

        let bands = or_undefined(
            self.volatility.bollinger_bands(
                &closes,
                BollingerBandsParams {
                    period: config.bollinger_period,
                    std_dev_multiplier: config.bollinger_std_dev,
                },
            ),
            len,
            BollingerBandsResult::default(),
        )?;

        let volume_defined: Vec<Option<Decimal>> = volumes.iter().copied().map(Some).collect();
        let volume_percentile = rolling_percentile_rank(&volume_defined, percentile)?;

        let sma_short = sma(&closes, config.sma_short)?;
        let sma_medium = sma(&closes, config.sma_medium)?;
        let sma_long = sma(&closes, config.sma_long)?;
        let sma_major = sma(&closes, config.sma_major)?;
        let volume_sma_short = sma(&volumes, config.volume_sma_short)?;
        let volume_sma_medium = sma(&volumes, config.volume_sma_medium)?;

        let distance_sma_medium = self.trend.distance_from(&closes, &sma_medium);
        let distance_sma_long = self.trend.distance_from(&closes, &sma_long);
        let distance_sma_major = self.trend.distance_from(&closes, &sma_major);

        let rows = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| SeriesRow {
                bar: bar.clone(),
                indicators: IndicatorValues {
                    rsi: rsi[i],
                    rsi_percentile: rsi_percentile[i],
                    atr: atr[i],
                    atr_percentile: atr_percentile[i],
                    bb_lower: bands[i].lower,
                    bb_upper: bands[i].upper,
                    bb_width: bands[i].width,
                    volume_percentile: volume_percentile[i],
                    sma_short: sma_short[i],
                    sma_medium: sma_medium[i],
                    sma_long: sma_long[i],
                    sma_major: sma_major[i],
                    volume_sma_short: volume_sma_short[i],
                    volume_sma_medium: volume_sma_medium[i],
                    distance_sma_medium: distance_sma_medium[i],
                    distance_sma_long: distance_sma_long[i],
                    distance_sma_major: distance_sma_major[i],
                },
            })
            .collect();

        debug!(rows = len, "지표 보강 완료");

        Ok(rows)
    }
}
