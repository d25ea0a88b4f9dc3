//! Tests for the batch analysis use case: top-down outlook
//! classification, concurrent frame fan-out, and failure isolation.

mod common;

use common::{bear_closes, bull_closes, scope, series_from_closes};
use gannscope::domain::error::DomainError;
use gannscope::domain::values::campaign::StructuralBias;
use gannscope::domain::values::hierarchy::InfluenceSource;
use gannscope::domain::values::timeframe::{TradeClass, Timeframe};
use gannscope::infrastructure::feeds::fixed::FixedFeed;

#[tokio::test]
async fn test_batch_analyzes_a_frame_under_top_down_context() {
    let feed = FixedFeed::new()
        .with("BTC", Timeframe::Monthly, series_from_closes(&bull_closes()))
        .with("BTC", Timeframe::Weekly, series_from_closes(&bull_closes()))
        .with("BTC", Timeframe::Daily, series_from_closes(&bull_closes()));
    let gs = scope(feed);

    let report = gs.batch("BTC", &[Timeframe::Daily], None, None).await.unwrap();
    assert_eq!(report.asset, "BTC");
    assert!(report.errors.is_empty());
    assert_eq!(report.frames.len(), 1);

    // Both top frames made it into the outlook
    assert_eq!(
        report.outlook.bias_of(Timeframe::Monthly),
        Some(StructuralBias::Bull)
    );
    assert_eq!(
        report.outlook.bias_of(Timeframe::Weekly),
        Some(StructuralBias::Bull)
    );

    let frame = &report.frames[0];
    assert_eq!(frame.timeframe, Timeframe::Daily);
    assert_eq!(frame.trade_class, TradeClass::Swing);
    assert!(frame.classification.is_some());
    assert_eq!(frame.scan.current_price, 139.0);
    assert!(frame.scan.total_opportunities > 0);
    // The campaign range is derived from the frame's own multipliers
    assert!((frame.scan.campaign_high - 139.0 * 1.25).abs() < 1e-9);
    assert!((frame.scan.campaign_low - 139.0 * 0.80).abs() < 1e-9);
}

#[tokio::test]
async fn test_batch_monthly_bear_steers_the_daily_frame() {
    let feed = FixedFeed::new()
        .with("BTC", Timeframe::Monthly, series_from_closes(&bear_closes()))
        .with("BTC", Timeframe::Weekly, series_from_closes(&bull_closes()))
        .with("BTC", Timeframe::Daily, series_from_closes(&bull_closes()));
    let gs = scope(feed);

    let report = gs.batch("BTC", &[Timeframe::Daily], None, None).await.unwrap();
    assert_eq!(
        report.outlook.bias_of(Timeframe::Monthly),
        Some(StructuralBias::Bear)
    );

    let scan = &report.frames[0].scan;
    assert!(scan.total_opportunities > 0);
    for opp in &scan.opportunities {
        assert!(!opp.is_long());
        assert_eq!(opp.influence, InfluenceSource::MonthlyBear);
    }
}

#[tokio::test]
async fn test_batch_missing_frames_land_in_errors() {
    let feed = FixedFeed::new().with("BTC", Timeframe::Daily, series_from_closes(&bull_closes()));
    let gs = scope(feed);

    let report = gs
        .batch("BTC", &[Timeframe::Daily, Timeframe::FourHour], None, None)
        .await
        .unwrap();

    // Monthly and weekly failed to classify, 4h failed to load
    assert_eq!(report.frames.len(), 1);
    assert_eq!(report.frames[0].timeframe, Timeframe::Daily);
    assert_eq!(report.errors.len(), 3);
    assert!(report.errors.iter().any(|e| e.starts_with("monthly:")));
    assert!(report.errors.iter().any(|e| e.starts_with("weekly:")));
    assert!(report.errors.iter().any(|e| e.starts_with("4h:")));
}

#[tokio::test]
async fn test_batch_keeps_request_order() {
    let mut feed = FixedFeed::new();
    for timeframe in [Timeframe::Daily, Timeframe::FourHour, Timeframe::OneHour] {
        feed = feed.with("BTC", timeframe, series_from_closes(&bull_closes()));
    }
    let gs = scope(feed);

    let requested = [Timeframe::OneHour, Timeframe::Daily, Timeframe::FourHour];
    let report = gs.batch("BTC", &requested, None, None).await.unwrap();

    let analyzed: Vec<Timeframe> = report.frames.iter().map(|f| f.timeframe).collect();
    assert_eq!(analyzed, requested.to_vec());
}

#[tokio::test]
async fn test_batch_requires_a_frame() {
    let gs = scope(FixedFeed::new());
    let err = gs.batch("BTC", &[], None, None).await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidInput(_)));
}

#[tokio::test]
async fn test_batch_frame_too_short_to_classify_still_generates() {
    let short: Vec<f64> = (0..5).map(|i| 100.0 + i as f64).collect();
    let feed = FixedFeed::new().with("BTC", Timeframe::Daily, series_from_closes(&short));
    let gs = scope(feed);

    let report = gs.batch("BTC", &[Timeframe::Daily], None, None).await.unwrap();
    let frame = &report.frames[0];

    assert!(frame.classification.is_none());
    assert_eq!(frame.scan.current_price, 104.0);
    // Retracement and section candidates still come out of a neutral read
    assert!(frame.scan.total_opportunities > 0);
    assert!(report
        .errors
        .iter()
        .any(|e| e.starts_with("daily:") && e.contains("Insufficient")));
}
