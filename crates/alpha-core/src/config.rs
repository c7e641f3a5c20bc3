//! 설정 관리.
//!
//! 분석 윈도우, 지표 기간, 캐시 버퍼, 신호 임계값을 하나의 불변 설정 구조체로 묶습니다.
//! 캐시와 분석기는 생성 시 이 설정을 주입받습니다.

use std::path::Path;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{AlphaError, AlphaResult};

/// 환경 변수 오버라이드 접두사.
pub const ENV_PREFIX: &str = "ALPHA";

/// 엔진 전체 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// 이벤트 윈도우 (거래일 오프셋)
    pub windows: WindowConfig,
    /// 지표 기간
    pub indicators: IndicatorConfig,
    /// 캐시 설정
    pub cache: CacheConfig,
    /// 신호 임계값
    pub signals: SignalConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
}

/// 실적일(T) 기준 거래일 오프셋 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WindowConfig {
    /// 관측 구간 시작 (기본: T-20)
    pub observation_start_offset: i32,
    /// 매집 구간 시작 (기본: T-10)
    pub accumulation_start_offset: i32,
    /// 매집 구간 종료 (기본: T-2)
    pub accumulation_end_offset: i32,
    /// RVOL 기준선 고정 시점 (기본: T-11)
    pub baseline_freeze_offset: i32,
    /// 실적 발표 직전일 (기본: T-1)
    pub pre_event_offset: i32,
    /// 이벤트 수익률 청산 시점 (기본: T+2)
    pub event_exit_offset: i32,
    /// 윈도우에 포함할 발표 이후 오프셋 (기본: T+0 ~ T+20)
    pub forward_offsets: Vec<i32>,
    /// 수익률을 계산할 오프셋 (기본: T+0 ~ T+6)
    pub return_offsets: Vec<i32>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            observation_start_offset: -20,
            accumulation_start_offset: -10,
            accumulation_end_offset: -2,
            baseline_freeze_offset: -11,
            pre_event_offset: -1,
            event_exit_offset: 2,
            forward_offsets: (0..=20).collect(),
            return_offsets: (0..=6).collect(),
        }
    }
}

impl WindowConfig {
    /// 윈도우 세트에 이름 붙여 포함해야 하는 모든 오프셋 (정렬, 중복 제거).
    pub fn named_offsets(&self) -> Vec<i32> {
        let mut offsets: Vec<i32> = self
            .forward_offsets
            .iter()
            .chain(self.return_offsets.iter())
            .copied()
            .chain([self.pre_event_offset, self.event_exit_offset])
            .collect();
        offsets.sort_unstable();
        offsets.dedup();
        offsets
    }
}

/// 지표 기간 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// RSI 기간 (기본: 14)
    pub rsi_period: usize,
    /// ATR 기간 (기본: 14)
    pub atr_period: usize,
    /// 백분위 순위 윈도우 (기본: 252, 약 1년)
    pub percentile_window: usize,
    /// 볼린저 밴드 기간 (기본: 20)
    pub bollinger_period: usize,
    /// 볼린저 밴드 표준편차 배수 (기본: 2.0)
    pub bollinger_std_dev: Decimal,
    /// 단기 가격 이동평균 (기본: 20)
    pub sma_short: usize,
    /// 중기 가격 이동평균 (기본: 50)
    pub sma_medium: usize,
    /// 장기 가격 이동평균 (기본: 100)
    pub sma_long: usize,
    /// 주요 가격 이동평균 (기본: 200)
    pub sma_major: usize,
    /// 단기 거래량 이동평균, 전술적 (기본: 20)
    pub volume_sma_short: usize,
    /// 중기 거래량 이동평균, 전략적 (기본: 50)
    pub volume_sma_medium: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            atr_period: 14,
            percentile_window: 252,
            bollinger_period: 20,
            bollinger_std_dev: dec!(2.0),
            sma_short: 20,
            sma_medium: 50,
            sma_long: 100,
            sma_major: 200,
            volume_sma_short: 20,
            volume_sma_medium: 50,
        }
    }
}

/// 시계열 캐시 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// 분석 시작일 이전에 추가로 요청할 달력일 수 (기본: 150)
    pub buffer_days: i64,
    /// 캐시가 비어 있을 때 가져올 기본 이력 (달력일, 기본: 365)
    pub default_history_days: i64,
    /// 종목별 JSON 레코드 디렉토리
    pub cache_dir: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            buffer_days: 150,
            default_history_days: 365,
            cache_dir: "data".to_string(),
        }
    }
}

/// 신호 분류 임계값.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SignalConfig {
    /// RVOL(중기) 고확률 임계값 (기본: 1.5)
    pub rvol_high_probability: Decimal,
    /// RSI 백분위 극저 구간 상한 (기본: 20)
    pub rsi_percentile_extremely_low: Decimal,
    /// RSI 백분위 저 구간 상한 (기본: 40)
    pub rsi_percentile_low: Decimal,
    /// RSI 백분위 고 구간 하한 (기본: 60)
    pub rsi_percentile_high: Decimal,
    /// RSI 백분위 극고 구간 하한 (기본: 80)
    pub rsi_percentile_extremely_high: Decimal,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            rvol_high_probability: dec!(1.5),
            rsi_percentile_extremely_low: dec!(20),
            rsi_percentile_low: dec!(40),
            rsi_percentile_high: dec!(60),
            rsi_percentile_extremely_high: dec!(80),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
    /// span 진입/종료 이벤트 출력
    pub span_events: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            span_events: false,
        }
    }
}

impl EngineConfig {
    /// 파일과 환경 변수(`ALPHA__*`)에서 설정을 로드합니다.
    ///
    /// 기본값 → 파일 → 환경 변수 순서로 덮어씁니다.
    pub fn load<P: AsRef<Path>>(path: P) -> AlphaResult<Self> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    /// 지정한 환경 변수 접두사로 설정을 로드합니다.
    pub fn load_with_prefix<P: AsRef<Path>>(path: P, env_prefix: &str) -> AlphaResult<Self> {
        let defaults = config::Config::try_from(&EngineConfig::default())?;

        let builder = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix(env_prefix)
                    .separator("__")
                    .try_parsing(true),
            );

        let config: EngineConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 설정 값의 계약 위반을 검사합니다.
    pub fn validate(&self) -> AlphaResult<()> {
        let ind = &self.indicators;
        let periods = [
            ("rsi_period", ind.rsi_period),
            ("atr_period", ind.atr_period),
            ("bollinger_period", ind.bollinger_period),
            ("sma_short", ind.sma_short),
            ("sma_medium", ind.sma_medium),
            ("sma_long", ind.sma_long),
            ("sma_major", ind.sma_major),
            ("volume_sma_short", ind.volume_sma_short),
            ("volume_sma_medium", ind.volume_sma_medium),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, p)| *p == 0) {
            return Err(AlphaError::Config(format!("{}는 0보다 커야 합니다", name)));
        }
        if ind.percentile_window < 2 {
            return Err(AlphaError::Config(
                "percentile_window는 2 이상이어야 합니다".to_string(),
            ));
        }

        let win = &self.windows;
        if win.accumulation_start_offset > win.accumulation_end_offset {
            return Err(AlphaError::Config(format!(
                "매집 구간이 뒤집혀 있습니다: T{:+} > T{:+}",
                win.accumulation_start_offset, win.accumulation_end_offset
            )));
        }

        if self.cache.buffer_days < 0 || self.cache.default_history_days <= 0 {
            return Err(AlphaError::Config(
                "캐시 버퍼/기본 이력 일수가 올바르지 않습니다".to_string(),
            ));
        }

        self.logging.format.parse::<crate::logging::LogFormat>()?;

        Ok(())
    }
}
