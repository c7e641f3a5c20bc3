//! 이벤트 분석을 위한 도메인 모델.

mod calendar;
mod symbol;

pub use calendar::*;
pub use symbol::*;
