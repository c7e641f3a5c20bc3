//! 데이터 Provider 모듈.
//!
//! 외부 데이터 소스(브로커 API 등)에서 일봉을 가져오는 경계입니다.
//! 인증, 네트워크 호출 방식은 구현체의 몫이며, 캐시는 어떤 에러든
//! "새 데이터 없음"으로 취급하고 로그만 남깁니다.

use chrono::NaiveDate;
use thiserror::Error;

use alpha_core::DailyBar;

/// 데이터 Provider 에러.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// 네트워크 에러
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// 인증 실패
    #[error("인증 실패: {0}")]
    Authentication(String),

    /// API 에러
    #[error("API 에러: {0}")]
    Api(String),

    /// 파싱 에러
    #[error("파싱 에러: {0}")]
    Parse(String),

    /// 기타 에러
    #[error("기타 에러: {0}")]
    Other(String),
}

/// 일봉 데이터 Provider trait.
///
/// # 구현 예시
///
/// ```ignore
/// struct KiteProvider { client: KiteClient }
///
/// impl DailyBarProvider for KiteProvider {
///     fn get_daily_bars(&self, instrument_id: u64, from: NaiveDate, to: NaiveDate)
///         -> Result<Vec<DailyBar>, ProviderError>
///     {
///         self.client.historical(instrument_id, from, to, "day")
///             .map_err(|e| ProviderError::Network(e.to_string()))
///     }
/// }
/// ```
pub trait DailyBarProvider: Send + Sync {
    /// `[from, to]` 구간의 일봉을 가져옵니다. 빈 결과는 에러가 아닙니다.
    fn get_daily_bars(
        &self,
        instrument_id: u64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyBar>, ProviderError>;
}
