//! # Alpha Core
//!
//! 실적 발표 이벤트 분석 엔진의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 엔진 전반에서 사용되는 기본 타입을 제공합니다:
//! - 일봉(OHLCV) 및 지표 컬럼 타입
//! - 거래일 캘린더 및 이벤트 윈도우 계산
//! - 종목 메타데이터 카탈로그
//! - 엔진 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
