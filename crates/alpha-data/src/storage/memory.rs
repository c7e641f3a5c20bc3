//! 메모리 시계열 저장소.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{SeriesStore, StoredSeries};
use crate::error::Result;

/// 프로세스 메모리에만 유지되는 저장소.
#[derive(Debug, Default)]
pub struct InMemorySeriesStore {
    records: RwLock<HashMap<String, StoredSeries>>,
}

impl InMemorySeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 저장된 종목 수.
    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SeriesStore for InMemorySeriesStore {
    fn load(&self, symbol: &str) -> Result<Option<StoredSeries>> {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        Ok(records.get(symbol).cloned())
    }

    fn save(&self, symbol: &str, series: &StoredSeries) -> Result<()> {
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        records.insert(symbol.to_string(), series.clone());
        Ok(())
    }
}
