//! 실적 이벤트 분석 파이프라인 통합 테스트.

mod common;

use std::sync::Arc;

use alpha_core::{DailyBar, EngineConfig};
use alpha_analytics::RsiPercentileZone;
use alpha_data::{EventStudy, InMemorySeriesStore, SeriesCache};
use chrono::NaiveDate;
use rust_decimal_macros::dec;

use common::{business_days, catalog, flat_bars, MockProvider, SYMBOL};

/// 400 평일, 각 실적일 5거래일 전에 저점이 있는 시계열.
struct Fixture {
    days: Vec<NaiveDate>,
    anchors: [usize; 2],
    study: EventStudy,
    cache: Arc<SeriesCache>,
    provider: Arc<MockProvider>,
}

fn fixture() -> Fixture {
    let days = business_days(NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(), 400);
    let anchors = [250, 350];

    let mut bars = flat_bars(&days, dec!(100));
    for &a in &anchors {
        let i = a - 5;
        bars[i] = DailyBar::new(days[i], dec!(80), dec!(85), dec!(75), dec!(80), dec!(3000));
    }

    let config = EngineConfig::default();
    let provider = Arc::new(MockProvider::new(bars));
    let cache = Arc::new(SeriesCache::new(
        provider.clone(),
        Arc::new(InMemorySeriesStore::new()),
        Arc::new(catalog(anchors.iter().map(|&a| days[a]).collect())),
        &config,
    ));
    let study = EventStudy::new(cache.clone(), &config).with_as_of(days[399]);

    Fixture {
        days,
        anchors,
        study,
        cache,
        provider,
    }
}

#[test]
fn test_analyze_symbol_most_recent_first() {
    let f = fixture();

    let analyses = f.study.analyze_symbol(SYMBOL).unwrap();

    assert_eq!(analyses.len(), 2);
    assert_eq!(analyses[0].anchor, f.days[f.anchors[1]]);
    assert_eq!(analyses[1].anchor, f.days[f.anchors[0]]);
    // 2024-05-06 → Q1 FY25, 2023-12-18 → Q3 FY24
    assert_eq!(analyses[0].quarter_label, "Q1 FY25");
    assert_eq!(analyses[1].quarter_label, "Q3 FY24");
    assert!(f.provider.calls() >= 1);
}

#[test]
fn test_analyze_event_finds_dip() {
    let f = fixture();
    let a = f.anchors[1];

    let analysis = f.study.analyze_event(SYMBOL, f.days[a]).unwrap().unwrap();
    let result = &analysis.result;

    assert_eq!(analysis.windows.accumulation_start, Some(f.days[a - 10]));
    assert_eq!(analysis.windows.accumulation_end, Some(f.days[a - 2]));

    assert_eq!(result.accumulation_price, Some(dec!(80)));
    assert_eq!(result.accumulation_days.len(), 1);
    let day = &result.accumulation_days[0];
    assert_eq!(day.date, f.days[a - 5]);
    assert_eq!(day.days_before_anchor, 4);
    // 거래량 3배 → 동결 기준 대비 RVOL > 1
    assert!(day.rvol_short.unwrap() > dec!(1));

    let high = result.reference_high.unwrap();
    assert_eq!(high.price, dec!(105));
    assert_eq!(high.date, f.days[a - 20]);

    let drawdown = result.drawdown_pct.unwrap();
    assert!((drawdown - dec!(-23.8095)).abs() < dec!(0.001));
    assert_eq!(result.returns.run_up, Some(dec!(25)));
    assert_eq!(result.returns.event, Some(dec!(0)));
    assert_eq!(result.returns.forward.len(), 7);

    // 버퍼 덕분에 분석 시작일보다 앞선 행이 포함됨
    assert!(analysis.series.first_date().unwrap() < f.days[a - 20]);

    // 거래량 3배 (중기 RVOL 3 > 1.5), 급락일 RSI는 1년 중 최저
    assert_eq!(analysis.signals.len(), 1);
    assert_eq!(analysis.signals[0].date, f.days[a - 5]);
    assert!(analysis.signals[0].high_probability);
    assert_eq!(analysis.signals[0].rsi_zone, Some(RsiPercentileZone::ExtremelyLow));
}

#[test]
fn test_cache_ending_before_anchor_is_extended() {
    let f = fixture();
    let a = f.anchors[1];

    // 이전 실행이 기준일 훨씬 전까지만 저장해 둔 상태
    f.cache.get_series(SYMBOL, f.days[0], f.days[260], false).unwrap();
    assert_eq!(f.provider.calls(), 1);

    let analysis = f.study.analyze_event(SYMBOL, f.days[a]).unwrap().unwrap();

    assert_eq!(f.provider.calls(), 2);
    assert_eq!(analysis.windows.accumulation_start, Some(f.days[a - 10]));
    assert_eq!(analysis.windows.observation_end, Some(f.days[399]));
    assert_eq!(analysis.result.accumulation_price, Some(dec!(80)));
    assert_eq!(analysis.result.accumulation_days[0].date, f.days[a - 5]);
}

#[test]
fn test_cache_without_enough_lookback_is_extended() {
    let f = fixture();
    let a = f.anchors[1];

    // 기준일 앞에 거래일이 5일뿐인 캐시
    f.cache.get_series(SYMBOL, f.days[a - 5], f.days[399], false).unwrap();

    let analysis = f.study.analyze_event(SYMBOL, f.days[a]).unwrap().unwrap();

    assert!(f.provider.calls() >= 2);
    assert_eq!(analysis.windows.observation_start, Some(f.days[a - 20]));
    assert_eq!(analysis.windows.accumulation_start, Some(f.days[a - 10]));
    assert_eq!(analysis.result.accumulation_price, Some(dec!(80)));
}

#[test]
fn test_cache_spanning_anchor_is_reused() {
    let f = fixture();

    f.study.analyze_symbol(SYMBOL).unwrap();
    let calls = f.provider.calls();
    f.study.analyze_symbol(SYMBOL).unwrap();

    assert_eq!(f.provider.calls(), calls);
}

#[test]
fn test_unknown_symbol_is_empty() {
    let f = fixture();

    assert!(f.study.analyze_symbol("UNLISTED").unwrap().is_empty());
    assert_eq!(f.provider.calls(), 0);
}

#[test]
fn test_symbol_without_token_has_no_analysis() {
    let f = fixture();

    assert!(f.study.analyze_event("NOTOKEN", f.days[300]).unwrap().is_none());
    assert_eq!(f.provider.calls(), 0);
}

#[test]
fn test_analysis_serializes_to_json() {
    let f = fixture();

    let analysis = f.study.analyze_event(SYMBOL, f.days[f.anchors[0]]).unwrap().unwrap();
    let json = serde_json::to_value(&analysis).unwrap();

    assert_eq!(json["symbol"], "POLYCAB");
    assert_eq!(json["quarter_label"], "Q3 FY24");
    assert!(json["result"]["accumulation_days"].is_array());
}
