//! 데이터 관리 및 저장.
//!
//! 이 crate는 다음을 제공합니다:
//! - 일봉 데이터 Provider 추상화
//! - 종목별 시계열 저장소 (JSON 파일, 메모리)
//! - 병합·지표 보강·영속화를 수행하는 시계열 캐시
//! - 캘린더 → 캐시 → 분석기를 잇는 실적 이벤트 분석 파이프라인

pub mod cache;
pub mod error;
pub mod provider;
pub mod storage;
pub mod study;

pub use error::{DataError, Result};

pub use cache::series::{merge_bars, SeriesCache};
pub use provider::{DailyBarProvider, ProviderError};
pub use storage::json::JsonFileStore;
pub use storage::memory::InMemorySeriesStore;
pub use storage::{SeriesStore, StoredSeries};
pub use study::{EventAnalysis, EventStudy};
