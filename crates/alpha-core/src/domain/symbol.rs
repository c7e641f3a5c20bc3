//! 종목 메타데이터 카탈로그.
//!
//! 종목별 거래소 instrument 토큰과 실적 발표일 목록을 보관합니다.
//! 실행 중에는 읽기 전용입니다.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{AlphaError, AlphaResult};

/// 한 종목의 메타데이터 레코드.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolDetails {
    /// 종목 심볼 (예: "POLYCAB")
    pub symbol: String,
    /// 데이터 제공자의 instrument 토큰
    #[serde(default)]
    pub instrument_token: Option<u64>,
    /// 실적 발표일 (`YYYY-MM-DD`)
    #[serde(default)]
    pub earnings_dates: Vec<NaiveDate>,
    /// 종목명
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// 심볼 → 메타데이터 조회 테이블.
#[derive(Debug, Clone, Default)]
pub struct SymbolCatalog {
    entries: BTreeMap<String, SymbolDetails>,
}

impl SymbolCatalog {
    /// 레코드 목록으로 카탈로그를 생성합니다. 같은 심볼이 반복되면 뒤의 레코드가 우선합니다.
    pub fn new(details: impl IntoIterator<Item = SymbolDetails>) -> Self {
        let entries = details
            .into_iter()
            .map(|d| (d.symbol.clone(), d))
            .collect();
        Self { entries }
    }

    /// JSON 배열 문자열에서 카탈로그를 파싱합니다.
    pub fn from_json_str(json: &str) -> AlphaResult<Self> {
        let details: Vec<SymbolDetails> = serde_json::from_str(json)?;
        Ok(Self::new(details))
    }

    /// JSON 파일에서 카탈로그를 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> AlphaResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            AlphaError::Data(format!("종목 카탈로그 읽기 실패 ({}): {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    pub fn get(&self, symbol: &str) -> Option<&SymbolDetails> {
        self.entries.get(symbol)
    }

    /// 데이터 제공자 instrument ID.
    pub fn instrument_id(&self, symbol: &str) -> Option<u64> {
        self.entries.get(symbol)?.instrument_token
    }

    /// 실적 발표일 목록 (최신순). 알 수 없는 심볼이면 `None`.
    pub fn earnings_dates(&self, symbol: &str) -> Option<Vec<NaiveDate>> {
        let mut dates = self.entries.get(symbol)?.earnings_dates.clone();
        dates.sort_unstable_by(|a, b| b.cmp(a));
        dates.dedup();
        Some(dates)
    }

    /// 등록된 모든 심볼 (알파벳순).
    pub fn symbols(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// 인도 회계연도 분기 라벨 (`"Q3 FY25"`).
    ///
    /// Q1: 4-6월, Q2: 7-9월, Q3: 10-12월, Q4: 1-3월.
    /// Q4를 제외하면 회계연도는 달력 연도 + 1입니다.
    pub fn quarter_label(date: NaiveDate) -> String {
        let (quarter, fiscal_year) = match date.month() {
            4..=6 => (1, date.year() + 1),
            7..=9 => (2, date.year() + 1),
            10..=12 => (3, date.year() + 1),
            _ => (4, date.year()),
        };
        format!("Q{} FY{:02}", quarter, fiscal_year.rem_euclid(100))
    }
}
