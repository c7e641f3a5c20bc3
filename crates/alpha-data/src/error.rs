//! 데이터 모듈 오류 타입.

use alpha_analytics::IndicatorError;
use thiserror::Error;

/// 데이터 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 저장소 오류
    #[error("Storage error: {0}")]
    StorageError(String),

    /// 파일 입출력 오류
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 직렬화/역직렬화 오류
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// 지표 계산 오류
    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    /// 잘못된 입력
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::SerializationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
