//! JSON 파일 시계열 저장소.
//!
//! 종목당 `<dir>/<SYMBOL>_ohlcv.json` 파일 하나를 사용합니다.
//! 저장은 임시 파일에 쓴 뒤 rename 하므로 중간에 실패해도 기존 파일은 남습니다.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use alpha_core::CacheConfig;

use super::{SeriesStore, StoredSeries};
use crate::error::{DataError, Result};

/// 디렉토리 기반 JSON 저장소.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `cache.cache_dir` 설정 디렉토리를 사용합니다.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(&config.cache_dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 종목 레코드 파일 경로.
    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{}_ohlcv.json", symbol))
    }
}

impl SeriesStore for JsonFileStore {
    fn load(&self, symbol: &str) -> Result<Option<StoredSeries>> {
        let path = self.path_for(symbol);
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path)?;
        let series: StoredSeries = serde_json::from_str(&json)?;
        if series.symbol != symbol {
            return Err(DataError::StorageError(format!(
                "{}: 레코드 심볼 불일치 ({})",
                path.display(),
                series.symbol
            )));
        }

        debug!(symbol = %symbol, rows = series.rows.len(), "시계열 파일 로드");
        Ok(Some(series))
    }

    fn save(&self, symbol: &str, series: &StoredSeries) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path_for(symbol);
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_vec_pretty(series)?;

        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(&json)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &path)?;

        debug!(symbol = %symbol, rows = series.rows.len(), path = %path.display(), "시계열 파일 저장");
        Ok(())
    }
}
