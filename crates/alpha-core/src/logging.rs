//! tracing 구독자 설치 도우미.
//!
//! 엔진 자체는 `tracing` 이벤트만 남기고, 구독자 설치는 대시보드나 배치 스크립트
//! 같은 호출 측이 [`init_logging`]으로 한 번 수행합니다.
//!
//! 필터 우선순위: `RUST_LOG` → 설정 파일의 `logging.level` → [`DEFAULT_DIRECTIVES`].

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use crate::config::LoggingConfig;
use crate::error::{AlphaError, AlphaResult};

/// 레벨이 비어 있을 때의 기본 필터.
///
/// 캐시 적중/갱신 기록은 보이고, 지표 계산 디버그 로그는 숨깁니다.
pub const DEFAULT_DIRECTIVES: &str = "info,alpha_analytics=warn";

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    /// 수집기로 보내는 한 줄 JSON
    Json,
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = AlphaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            other => Err(AlphaError::Config(format!("unknown log format: {}", other))),
        }
    }
}

/// 구독자 설정.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `EnvFilter` 지시어 (예: "info,alpha_data=debug")
    pub directives: String,
    pub format: LogFormat,
    /// span 진입/종료 이벤트 출력 (이벤트별 분석 소요 시간 확인용)
    pub span_events: bool,
    /// 소스 파일/줄 번호 출력
    pub with_file: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            directives: DEFAULT_DIRECTIVES.to_string(),
            format: LogFormat::Pretty,
            span_events: false,
            with_file: false,
        }
    }
}

impl LogConfig {
    pub fn new(directives: impl Into<String>) -> Self {
        Self {
            directives: directives.into(),
            ..Default::default()
        }
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }

    /// `RUST_LOG`, `LOG_FORMAT` 환경 변수에서 설정을 만듭니다.
    pub fn from_env() -> Self {
        let directives =
            std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_DIRECTIVES.to_string());
        let format = std::env::var("LOG_FORMAT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();

        Self::new(directives).with_format(format)
    }
}

impl TryFrom<&LoggingConfig> for LogConfig {
    type Error = AlphaError;

    fn try_from(settings: &LoggingConfig) -> AlphaResult<Self> {
        let directives = if settings.level.trim().is_empty() {
            DEFAULT_DIRECTIVES.to_string()
        } else {
            settings.level.clone()
        };

        Ok(Self::new(directives)
            .with_format(settings.format.parse()?)
            .with_span_events(settings.span_events))
    }
}

/// 전역 구독자를 설치합니다.
///
/// 이미 설치되어 있거나 필터 지시어가 잘못되면 `AlphaError::Config`.
///
/// ```no_run
/// use alpha_core::logging::{init_logging, LogConfig, LogFormat};
///
/// init_logging(&LogConfig::new("debug").with_format(LogFormat::Json))?;
/// # Ok::<(), alpha_core::AlphaError>(())
/// ```
pub fn init_logging(config: &LogConfig) -> AlphaResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.directives)
            .map_err(|e| AlphaError::Config(format!("invalid log directives: {}", e)))?,
    };

    tracing_subscriber::registry()
        .with(fmt_layer(config))
        .with(filter)
        .try_init()
        .map_err(|e| AlphaError::Config(format!("subscriber already installed: {}", e)))?;

    tracing::debug!(format = ?config.format, directives = %config.directives, "로깅 초기화");
    Ok(())
}

/// `RUST_LOG`/`LOG_FORMAT`으로 구독자를 설치합니다.
pub fn init_logging_from_env() -> AlphaResult<()> {
    init_logging(&LogConfig::from_env())
}

fn fmt_layer(config: &LogConfig) -> Box<dyn Layer<Registry> + Send + Sync> {
    let span_events = if config.span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };
    let base = fmt::layer()
        .with_file(config.with_file)
        .with_line_number(config.with_file)
        .with_span_events(span_events);

    match config.format {
        LogFormat::Pretty => base.pretty().boxed(),
        LogFormat::Json => base.json().boxed(),
        LogFormat::Compact => base.compact().boxed(),
    }
}

/// 종목(및 실적일) 필드를 가진 span.
///
/// ```ignore
/// let _span = event_span!("analyze_event", symbol, anchor).entered();
/// ```
#[macro_export]
macro_rules! event_span {
    ($name:expr, $symbol:expr) => {
        tracing::info_span!($name, symbol = %$symbol)
    };
    ($name:expr, $symbol:expr, $anchor:expr) => {
        tracing::info_span!($name, symbol = %$symbol, anchor = %$anchor)
    };
}
