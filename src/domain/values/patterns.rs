use crate::domain::values::swing::find_swings;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const PATTERN_LOOKBACK: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Impulse,
    Correction,
    DoubleTop,
    DoubleBottom,
}

/// One labelled point of a recognized pattern, anchored to a bar index.
#[derive(Debug, Clone, Serialize)]
pub struct PatternPoint {
    pub kind: PatternKind,
    pub index: usize,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternSignal {
    BreakoutAboveSwingHigh,
    BreakdownBelowSwingLow,
}

impl fmt::Display for PatternSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternSignal::BreakoutAboveSwingHigh => {
                write!(f, "Breakout above previous swing high")
            }
            PatternSignal::BreakdownBelowSwingLow => {
                write!(f, "Breakdown below previous swing low")
            }
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PatternRead {
    pub points: Vec<PatternPoint>,
    pub signals: Vec<PatternSignal>,
}

fn near(a: f64, b: f64) -> bool {
    (a - b).abs() < 0.01 * a.abs()
}

/// Reads the swing structure for 1-2-3 impulse and A-B-C correction
/// labels, double tops and bottoms, and breakaways past the previous
/// swing extreme. Wave labels need at least three swings on each side;
/// the other reads degrade gracefully.
pub fn recognize_patterns(closes: &[f64], lookback: usize) -> PatternRead {
    let swings = find_swings(closes, lookback);
    let mut points = Vec::new();
    let mut signals = Vec::new();

    if swings.highs.len() >= 3 && swings.lows.len() >= 3 {
        points.push(PatternPoint {
            kind: PatternKind::Impulse,
            index: swings.highs[0],
            label: "1",
        });
        points.push(PatternPoint {
            kind: PatternKind::Impulse,
            index: swings.lows[0],
            label: "2",
        });
        points.push(PatternPoint {
            kind: PatternKind::Impulse,
            index: swings.highs[1],
            label: "3",
        });
        points.push(PatternPoint {
            kind: PatternKind::Correction,
            index: swings.lows[1],
            label: "A",
        });
        points.push(PatternPoint {
            kind: PatternKind::Correction,
            index: swings.highs[2],
            label: "B",
        });
        points.push(PatternPoint {
            kind: PatternKind::Correction,
            index: swings.lows[2],
            label: "C",
        });
    }

    if let Some(&last) = closes.last() {
        if swings.highs.len() > 1 && last > closes[swings.highs[swings.highs.len() - 2]] {
            signals.push(PatternSignal::BreakoutAboveSwingHigh);
        }
        if swings.lows.len() > 1 && last < closes[swings.lows[swings.lows.len() - 2]] {
            signals.push(PatternSignal::BreakdownBelowSwingLow);
        }
    }

    for pair in swings.highs.windows(2) {
        if near(closes[pair[1]], closes[pair[0]]) {
            points.push(PatternPoint {
                kind: PatternKind::DoubleTop,
                index: pair[1],
                label: "Double Top",
            });
        }
    }
    for pair in swings.lows.windows(2) {
        if near(closes[pair[1]], closes[pair[0]]) {
            points.push(PatternPoint {
                kind: PatternKind::DoubleBottom,
                index: pair[1],
                label: "Double Bottom",
            });
        }
    }

    PatternRead { points, signals }
}
