//! 시계열 캐시 모듈.
//!
//! - `series`: 저장소 + Provider 기반 증분 캐시 (병합, 지표 보강, 영속화)

pub mod series;

pub use series::{merge_bars, SeriesCache};
