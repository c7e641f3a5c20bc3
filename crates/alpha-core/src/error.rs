//! 분석 엔진의 에러 타입.

use thiserror::Error;

/// 핵심 엔진 에러.
#[derive(Debug, Error)]
pub enum AlphaError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 데이터 에러
    #[error("데이터 에러: {0}")]
    Data(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),
}

/// 엔진 작업을 위한 Result 타입.
pub type AlphaResult<T> = Result<T, AlphaError>;

impl AlphaError {
    /// 설정 오류(셋업 버그)인지 확인합니다.
    pub fn is_config(&self) -> bool {
        matches!(self, AlphaError::Config(_) | AlphaError::InvalidInput(_))
    }
}

impl From<serde_json::Error> for AlphaError {
    fn from(err: serde_json::Error) -> Self {
        AlphaError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for AlphaError {
    fn from(err: config::ConfigError) -> Self {
        AlphaError::Config(err.to_string())
    }
}
