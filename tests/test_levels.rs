//! Tests for the synchronous facade surface: retracement ladders, level
//! analysis, position sizing, and calendar cycle projection.

use chrono::{TimeZone, Utc};
use gannscope::domain::values::retracement::{GannLevel, RecommendedAction};
use gannscope::domain::values::timeframe::Timeframe;
use gannscope::infrastructure::feeds::fixed::FixedFeed;
use gannscope::GannScope;
use std::sync::Arc;

fn setup() -> GannScope {
    GannScope::with_feed(Arc::new(FixedFeed::new()))
}

#[test]
fn test_core_ladder_over_a_campaign_range() {
    let gs = setup();
    let ladder = gs.levels(100_000.0, 60_000.0, false).unwrap();

    assert_eq!(ladder.high, 100_000.0);
    assert_eq!(ladder.low, 60_000.0);
    assert_eq!(ladder.range, 40_000.0);
    assert_eq!(ladder.levels.len(), GannLevel::CORE.len());
    assert_eq!(ladder.price_of(GannLevel::Half), Some(80_000.0));
    assert_eq!(ladder.price_of(GannLevel::Quarter), Some(70_000.0));
    assert_eq!(ladder.price_of(GannLevel::Full), Some(100_000.0));
    // Core ladders stop at the range high
    assert!(ladder.price_of(GannLevel::Double).is_none());
}

#[test]
fn test_extended_ladder_projects_past_the_high() {
    let gs = setup();
    let ladder = gs.levels(100_000.0, 60_000.0, true).unwrap();

    assert_eq!(
        ladder.levels.len(),
        GannLevel::CORE.len() + GannLevel::EXTENDED.len()
    );
    assert_eq!(ladder.price_of(GannLevel::Double), Some(140_000.0));
    assert_eq!(ladder.price_of(GannLevel::Triple), Some(180_000.0));
    for lp in ladder.levels.iter().filter(|lp| lp.level.is_extended()) {
        assert!(lp.price > ladder.high);
    }
}

#[test]
fn test_inverted_or_flat_ranges_are_rejected() {
    let gs = setup();
    assert!(gs.levels(50.0, 100.0, false).is_err());
    assert!(gs.levels(100.0, 100.0, false).is_err());
    assert!(gs.levels(f64::NAN, 50.0, false).is_err());
}

#[test]
fn test_price_at_the_half_level_is_a_strong_entry() {
    let gs = setup();
    let analysis = gs
        .analyze_levels(200.0, 100.0, 150.0, Timeframe::Daily)
        .unwrap();

    assert!(analysis.at_half_level);
    assert_eq!(analysis.nearest_level, GannLevel::Half);
    assert_eq!(analysis.distance_to_nearest, 0.0);
    assert_eq!(analysis.priority_level, GannLevel::Half);
    assert_eq!(
        analysis.recommended_action,
        RecommendedAction::StrongEntrySignal
    );
    assert_eq!(analysis.action_level, Some(GannLevel::Half));
    // Only the five trading levels are analyzed
    assert_eq!(analysis.levels.len(), GannLevel::TRADING.len());
}

#[test]
fn test_price_off_the_half_level_reports_breaks() {
    let gs = setup();
    // 126 sits just above the 25% rung at 125, well clear of 137.5
    let analysis = gs
        .analyze_levels(200.0, 100.0, 126.0, Timeframe::Daily)
        .unwrap();

    assert!(!analysis.at_half_level);
    assert_eq!(analysis.nearest_level, GannLevel::Quarter);
    assert!(analysis.confirmed_breaks.contains(&GannLevel::ThreeEighths));
    assert!(!analysis.confirmed_breaks.contains(&GannLevel::Quarter));
    assert_eq!(analysis.recommended_action, RecommendedAction::ConfirmedBreak);
}

#[test]
fn test_position_size_risks_the_requested_slice() {
    let gs = setup();
    let size = gs.position_size(10_000.0, 2.0, 100.0, 95.0).unwrap();
    assert_eq!(size.risk_amount, 200.0);
    assert_eq!(size.units, 40.0);

    // Shorts risk the same amount on the other side of entry
    let short = gs.position_size(10_000.0, 2.0, 100.0, 105.0).unwrap();
    assert_eq!(short.units, 40.0);

    assert!(gs.position_size(10_000.0, 2.0, 100.0, 100.0).is_err());
    assert!(gs.position_size(0.0, 2.0, 100.0, 95.0).is_err());
}

#[test]
fn test_cycle_table_covers_every_frame() {
    let gs = setup();
    let start = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
    let table = gs.project_cycles(start);

    assert_eq!(table.start, start.date_naive());
    assert_eq!(table.frames.len(), Timeframe::ALL.len());
    assert_eq!(table.frames[0].timeframe, Timeframe::Monthly);

    // The 49-52 / 90-98 day counts only apply to the daily frame
    for frame in &table.frames {
        if frame.timeframe == Timeframe::Daily {
            assert_eq!(frame.major_cycles.len(), 4);
        } else {
            assert!(frame.major_cycles.is_empty());
        }
    }
    assert!(table
        .hierarchy
        .description
        .contains("Monthly timeframe (Weight 10)"));
}

#[test]
fn test_single_frame_projection_windows_ascend() {
    let gs = setup();
    let start = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
    let cycles = gs.project_timeframe_cycles(start, Timeframe::Weekly);

    assert_eq!(cycles.timeframe, Timeframe::Weekly);
    assert_eq!(cycles.sections.len(), 4);
    for window in &cycles.sections {
        assert!(window.min <= window.max);
        assert!(window.min >= start.date_naive());
    }
    // The final section is the reversal watch
    assert!(cycles.sections[3].reversal_watch);
    assert!(!cycles.sections[0].reversal_watch);
    assert!(cycles.bear_rally_max > start.date_naive());
}
