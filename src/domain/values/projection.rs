//! Calendar projection of campaign sections and time cycles.
//!
//! Builds per-timeframe tables of expected section windows from a start
//! date, with the major Gann counts attached to the daily frame.

use crate::domain::values::timeframe::Timeframe;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

/// Calendar window a campaign section is expected to complete within,
/// projected forward from a start date.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SectionWindow {
    pub section: u8,
    pub min: NaiveDate,
    pub max: NaiveDate,
    pub description: &'static str,
    pub reversal_watch: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimeframeCycles {
    pub timeframe: Timeframe,
    pub weight: u8,
    pub campaign_duration: &'static str,
    pub sections: Vec<SectionWindow>,
    pub bear_rally_max: NaiveDate,
    pub bear_rally_note: &'static str,
    /// Gann's 49-52 and 90-98 day counts. Daily frame only.
    pub major_cycles: Vec<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CycleHierarchy {
    pub description: &'static str,
    pub rules: [&'static str; 4],
}

#[derive(Debug, Clone, Serialize)]
pub struct CycleTable {
    pub start: NaiveDate,
    pub frames: Vec<TimeframeCycles>,
    pub hierarchy: CycleHierarchy,
}

enum Offset {
    Days(i64),
    Hours(i64),
    Minutes(i64),
}

impl Offset {
    fn apply(&self, start: DateTime<Utc>) -> NaiveDate {
        let shifted = match *self {
            Offset::Days(n) => start + Duration::days(n),
            Offset::Hours(n) => start + Duration::hours(n),
            Offset::Minutes(n) => start + Duration::minutes(n),
        };
        shifted.date_naive()
    }
}

struct Stage {
    section: u8,
    min: Offset,
    max: Offset,
    description: &'static str,
    reversal_watch: bool,
}

/// Project the expected section windows for one timeframe.
pub fn project_timeframe_cycles(start: DateTime<Utc>, timeframe: Timeframe) -> TimeframeCycles {
    use Offset::{Days, Hours, Minutes};

    let (campaign_duration, stages, rally_max, rally_note): (_, Vec<Stage>, _, _) = match timeframe
    {
        Timeframe::Monthly => (
            "12-36 months",
            vec![
                Stage {
                    section: 1,
                    min: Days(30),
                    max: Days(90),
                    description: "Initial advance from final bottom",
                    reversal_watch: false,
                },
                Stage {
                    section: 2,
                    min: Days(21),
                    max: Days(42),
                    description: "Advance above 1st section highs - MOST RELIABLE",
                    reversal_watch: false,
                },
                Stage {
                    section: 3,
                    min: Days(7),
                    max: Days(14),
                    description: "Extension to new campaign highs",
                    reversal_watch: false,
                },
                Stage {
                    section: 4,
                    min: Days(3),
                    max: Days(7),
                    description: "FINAL EXTENSION - HIGHEST REVERSAL PROBABILITY",
                    reversal_watch: true,
                },
            ],
            Days(60),
            "Maximum duration for bear market rallies",
        ),
        Timeframe::Weekly => (
            "3-9 months",
            vec![
                Stage {
                    section: 1,
                    min: Days(14),
                    max: Days(28),
                    description: "Weekly trend establishment",
                    reversal_watch: false,
                },
                Stage {
                    section: 2,
                    min: Days(7),
                    max: Days(14),
                    description: "Weekly trend confirmation",
                    reversal_watch: false,
                },
                Stage {
                    section: 3,
                    min: Days(3),
                    max: Days(7),
                    description: "Weekly extension move",
                    reversal_watch: false,
                },
                Stage {
                    section: 4,
                    min: Days(1),
                    max: Days(3),
                    description: "Weekly final push - reversal watch",
                    reversal_watch: true,
                },
            ],
            Days(21),
            "Weekly bear rally limit",
        ),
        Timeframe::Daily => (
            "6-16 weeks",
            vec![
                Stage {
                    section: 1,
                    min: Days(7),
                    max: Days(14),
                    description: "Daily trend initiation",
                    reversal_watch: false,
                },
                Stage {
                    section: 2,
                    min: Days(3),
                    max: Days(7),
                    description: "Daily trend acceleration",
                    reversal_watch: false,
                },
                Stage {
                    section: 3,
                    min: Days(1),
                    max: Days(3),
                    description: "Daily climax move",
                    reversal_watch: false,
                },
                Stage {
                    section: 4,
                    min: Hours(4),
                    max: Hours(24),
                    description: "Daily final spike - reversal imminent",
                    reversal_watch: true,
                },
            ],
            Days(10),
            "Daily bear rally maximum",
        ),
        Timeframe::FourHour => (
            "3-14 days",
            vec![
                Stage {
                    section: 1,
                    min: Hours(16),
                    max: Hours(96),
                    description: "4H initial move",
                    reversal_watch: false,
                },
                Stage {
                    section: 2,
                    min: Hours(12),
                    max: Hours(72),
                    description: "4H continuation",
                    reversal_watch: false,
                },
                Stage {
                    section: 3,
                    min: Hours(4),
                    max: Hours(48),
                    description: "4H extension",
                    reversal_watch: false,
                },
            ],
            Hours(240),
            "4H bear rally limit",
        ),
        Timeframe::OneHour => (
            "4-24 hours",
            vec![
                Stage {
                    section: 1,
                    min: Hours(4),
                    max: Hours(8),
                    description: "1H impulse move",
                    reversal_watch: false,
                },
                Stage {
                    section: 2,
                    min: Hours(2),
                    max: Hours(4),
                    description: "1H follow-through",
                    reversal_watch: false,
                },
                Stage {
                    section: 3,
                    min: Hours(1),
                    max: Hours(2),
                    description: "1H final push",
                    reversal_watch: false,
                },
            ],
            Hours(12),
            "1H bear rally limit",
        ),
        Timeframe::FifteenMin => (
            "1-4 hours",
            vec![
                Stage {
                    section: 1,
                    min: Minutes(60),
                    max: Minutes(120),
                    description: "15M scalp initiation",
                    reversal_watch: false,
                },
                Stage {
                    section: 2,
                    min: Minutes(30),
                    max: Minutes(60),
                    description: "15M scalp continuation",
                    reversal_watch: false,
                },
                Stage {
                    section: 3,
                    min: Minutes(15),
                    max: Minutes(30),
                    description: "15M scalp completion",
                    reversal_watch: false,
                },
            ],
            Minutes(180),
            "15M bear rally limit",
        ),
        Timeframe::FiveMin => (
            "15 minutes - 2 hours",
            vec![
                Stage {
                    section: 1,
                    min: Minutes(20),
                    max: Minutes(40),
                    description: "5M quick scalp start",
                    reversal_watch: false,
                },
                Stage {
                    section: 2,
                    min: Minutes(10),
                    max: Minutes(20),
                    description: "5M quick scalp push",
                    reversal_watch: false,
                },
                Stage {
                    section: 3,
                    min: Minutes(5),
                    max: Minutes(10),
                    description: "5M quick scalp finish",
                    reversal_watch: false,
                },
            ],
            Minutes(60),
            "5M bear rally limit",
        ),
        Timeframe::OneMin => (
            "5-60 minutes",
            vec![
                Stage {
                    section: 1,
                    min: Minutes(4),
                    max: Minutes(8),
                    description: "1M ultra-short impulse",
                    reversal_watch: false,
                },
                Stage {
                    section: 2,
                    min: Minutes(2),
                    max: Minutes(4),
                    description: "1M ultra-short follow",
                    reversal_watch: false,
                },
                Stage {
                    section: 3,
                    min: Minutes(1),
                    max: Minutes(2),
                    description: "1M ultra-short spike",
                    reversal_watch: false,
                },
            ],
            Minutes(12),
            "1M bear rally limit",
        ),
    };

    let major_cycles = if timeframe == Timeframe::Daily {
        vec![
            Offset::Days(49).apply(start),
            Offset::Days(52).apply(start),
            Offset::Days(90).apply(start),
            Offset::Days(98).apply(start),
        ]
    } else {
        Vec::new()
    };

    TimeframeCycles {
        timeframe,
        weight: timeframe.weight(),
        campaign_duration,
        sections: stages
            .into_iter()
            .map(|stage| SectionWindow {
                section: stage.section,
                min: stage.min.apply(start),
                max: stage.max.apply(start),
                description: stage.description,
                reversal_watch: stage.reversal_watch,
            })
            .collect(),
        bear_rally_max: rally_max.apply(start),
        bear_rally_note: rally_note,
        major_cycles,
    }
}

/// Project section windows for every timeframe from a common start.
pub fn project_cycles(start: DateTime<Utc>) -> CycleTable {
    CycleTable {
        start: start.date_naive(),
        frames: Timeframe::ALL
            .iter()
            .map(|&tf| project_timeframe_cycles(start, tf))
            .collect(),
        hierarchy: CycleHierarchy {
            description: "Monthly timeframe (Weight 10) drives all analysis decisions",
            rules: [
                "Monthly trend overrides all lower timeframes",
                "Lower timeframes must align with higher timeframes for high-probability trades",
                "4th section completions on any timeframe signal highest probability reversals",
                "Time corrections scale proportionally through timeframes",
            ],
        },
    }
}

/// Gann watches the 7th, 14th, 21st and 28th of the month. True when the
/// date lands within two days of one of them.
pub fn near_gann_cycle_day(date: NaiveDate) -> bool {
    use chrono::Datelike;
    let day = date.day() as i64;
    [7, 14, 21, 28].iter().any(|&c| (day - c).abs() <= 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_monthly_windows_project_in_days() {
        let cycles = project_timeframe_cycles(start(), Timeframe::Monthly);
        assert_eq!(cycles.weight, 10);
        assert_eq!(cycles.campaign_duration, "12-36 months");
        assert_eq!(cycles.sections.len(), 4);
        // Section 1: 30-90 days out
        assert_eq!(
            cycles.sections[0].min,
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
        );
        assert_eq!(
            cycles.sections[0].max,
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
        );
        assert!(cycles.sections[3].reversal_watch);
        assert_eq!(
            cycles.bear_rally_max,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert!(cycles.major_cycles.is_empty());
    }

    #[test]
    fn test_daily_carries_major_cycles() {
        let cycles = project_timeframe_cycles(start(), Timeframe::Daily);
        assert_eq!(
            cycles.major_cycles,
            vec![
                NaiveDate::from_ymd_opt(2024, 2, 19).unwrap(),
                NaiveDate::from_ymd_opt(2024, 2, 22).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
                NaiveDate::from_ymd_opt(2024, 4, 8).unwrap(),
            ]
        );
        // Section 4 is an hour-scale spike window
        assert_eq!(cycles.sections[3].min, start().date_naive());
        assert_eq!(
            cycles.sections[3].max,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
    }

    #[test]
    fn test_intraday_frames_stop_at_section_three() {
        for tf in [
            Timeframe::FourHour,
            Timeframe::OneHour,
            Timeframe::FifteenMin,
            Timeframe::FiveMin,
            Timeframe::OneMin,
        ] {
            let cycles = project_timeframe_cycles(start(), tf);
            assert_eq!(cycles.sections.len(), 3, "{tf}");
            assert!(cycles.sections.iter().all(|s| !s.reversal_watch));
        }
    }

    #[test]
    fn test_full_table_covers_every_frame() {
        let table = project_cycles(start());
        assert_eq!(table.frames.len(), 8);
        assert_eq!(table.frames[0].timeframe, Timeframe::Monthly);
        assert_eq!(table.frames[7].timeframe, Timeframe::OneMin);
        assert_eq!(table.hierarchy.rules.len(), 4);
    }

    #[test]
    fn test_gann_day_proximity() {
        assert!(near_gann_cycle_day(NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()));
        assert!(near_gann_cycle_day(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()));
        assert!(near_gann_cycle_day(NaiveDate::from_ymd_opt(2024, 3, 30).unwrap()));
        assert!(!near_gann_cycle_day(NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()));
        assert!(!near_gann_cycle_day(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()));
        assert!(!near_gann_cycle_day(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
    }
}
