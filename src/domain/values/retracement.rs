//! Gann retracement ladder mathematics.
//!
//! Divides a campaign range into eighths and thirds and prices each rung:
//! `price = low + range * fraction` where:
//! - `range` = campaign high minus campaign low
//! - `fraction` = the level's share of the range (1/8 through 3/1)
//! - levels past 8/8 project beyond the campaign high
//!
//! The 50% level carries the most weight in the method and gets its own
//! tolerance band when price is tested against the ladder.

use crate::domain::error::DomainError;
use crate::domain::values::breaks::{validate_break, BreakConfirmation};
use crate::domain::values::timeframe::Timeframe;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The canonical Gann retracement levels, expressed in eighths and thirds
/// of the campaign range. The 50% level dominates everything else in the
/// method. Levels beyond 100% project past the range extreme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GannLevel {
    #[serde(rename = "12.5%")]
    Eighth,
    #[serde(rename = "25%")]
    Quarter,
    #[serde(rename = "33.3%")]
    Third,
    #[serde(rename = "37.5%")]
    ThreeEighths,
    #[serde(rename = "50%")]
    Half,
    #[serde(rename = "62.5%")]
    FiveEighths,
    #[serde(rename = "66.7%")]
    TwoThirds,
    #[serde(rename = "75%")]
    ThreeQuarters,
    #[serde(rename = "87.5%")]
    SevenEighths,
    #[serde(rename = "100%")]
    Full,
    #[serde(rename = "112.5%")]
    NineEighths,
    #[serde(rename = "125%")]
    FiveQuarters,
    #[serde(rename = "150%")]
    ThreeHalves,
    #[serde(rename = "175%")]
    SevenQuarters,
    #[serde(rename = "200%")]
    Double,
    #[serde(rename = "250%")]
    FiveHalves,
    #[serde(rename = "300%")]
    Triple,
}

impl GannLevel {
    /// Levels inside the range, lowest to highest.
    pub const CORE: [GannLevel; 10] = [
        GannLevel::Eighth,
        GannLevel::Quarter,
        GannLevel::Third,
        GannLevel::ThreeEighths,
        GannLevel::Half,
        GannLevel::FiveEighths,
        GannLevel::TwoThirds,
        GannLevel::ThreeQuarters,
        GannLevel::SevenEighths,
        GannLevel::Full,
    ];

    /// Projections beyond the range extreme.
    pub const EXTENDED: [GannLevel; 7] = [
        GannLevel::NineEighths,
        GannLevel::FiveQuarters,
        GannLevel::ThreeHalves,
        GannLevel::SevenQuarters,
        GannLevel::Double,
        GannLevel::FiveHalves,
        GannLevel::Triple,
    ];

    /// The five levels trades are actually taken against.
    pub const TRADING: [GannLevel; 5] = [
        GannLevel::Quarter,
        GannLevel::ThreeEighths,
        GannLevel::Half,
        GannLevel::FiveEighths,
        GannLevel::ThreeQuarters,
    ];

    pub fn fraction(&self) -> f64 {
        match self {
            GannLevel::Eighth => 0.125,
            GannLevel::Quarter => 0.25,
            GannLevel::Third => 0.333,
            GannLevel::ThreeEighths => 0.375,
            GannLevel::Half => 0.5,
            GannLevel::FiveEighths => 0.625,
            GannLevel::TwoThirds => 0.667,
            GannLevel::ThreeQuarters => 0.75,
            GannLevel::SevenEighths => 0.875,
            GannLevel::Full => 1.0,
            GannLevel::NineEighths => 1.125,
            GannLevel::FiveQuarters => 1.25,
            GannLevel::ThreeHalves => 1.5,
            GannLevel::SevenQuarters => 1.75,
            GannLevel::Double => 2.0,
            GannLevel::FiveHalves => 2.5,
            GannLevel::Triple => 3.0,
        }
    }

    pub fn percent(&self) -> f64 {
        self.fraction() * 100.0
    }

    pub fn is_extended(&self) -> bool {
        self.fraction() > 1.0
    }

    /// Price of this level over a low/range pair.
    pub fn price_at(&self, low: f64, range: f64) -> f64 {
        low + range * self.fraction()
    }

    /// How much weight the level carries when validating an entry.
    /// Strongest at the halfway point, weakest at the quarter extremes.
    pub fn significance(&self) -> f64 {
        match self {
            GannLevel::Half => 1.0,
            GannLevel::ThreeEighths | GannLevel::FiveEighths => 0.8,
            GannLevel::Quarter | GannLevel::ThreeQuarters => 0.7,
            _ => 0.5,
        }
    }
}

impl fmt::Display for GannLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pct = self.percent();
        if (pct - pct.round()).abs() < 1e-9 {
            write!(f, "{}%", pct.round() as i64)
        } else {
            write!(f, "{pct:.1}%")
        }
    }
}

impl FromStr for GannLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim_end_matches('%');
        GannLevel::CORE
            .iter()
            .chain(GannLevel::EXTENDED.iter())
            .find(|level| {
                let label = level.to_string();
                label.trim_end_matches('%') == trimmed || label == s
            })
            .copied()
            .ok_or_else(|| format!("Unknown Gann level: {s}"))
    }
}

/// One priced rung of a retracement ladder.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LevelPrice {
    pub level: GannLevel,
    pub price: f64,
}

/// Full retracement ladder over a campaign range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelLadder {
    pub high: f64,
    pub low: f64,
    pub range: f64,
    pub levels: Vec<LevelPrice>,
}

impl LevelLadder {
    pub fn price_of(&self, level: GannLevel) -> Option<f64> {
        self.levels
            .iter()
            .find(|lp| lp.level == level)
            .map(|lp| lp.price)
    }
}

fn check_range(high: f64, low: f64) -> Result<f64, DomainError> {
    if !high.is_finite() || !low.is_finite() {
        return Err(DomainError::InvalidInput(format!(
            "range bounds must be finite, got high={high} low={low}"
        )));
    }
    if high <= low {
        return Err(DomainError::InvalidInput(format!(
            "high must exceed low, got high={high} low={low}"
        )));
    }
    Ok(high - low)
}

/// Build the retracement ladder for a range. With `extended` the ladder
/// continues past the high through the 300% projection.
pub fn calculate_levels(
    high: f64,
    low: f64,
    extended: bool,
) -> Result<LevelLadder, DomainError> {
    let range = check_range(high, low)?;
    let mut levels: Vec<LevelPrice> = GannLevel::CORE
        .iter()
        .map(|&level| LevelPrice {
            level,
            price: level.price_at(low, range),
        })
        .collect();
    if extended {
        levels.extend(GannLevel::EXTENDED.iter().map(|&level| LevelPrice {
            level,
            price: level.price_at(low, range),
        }));
    }
    Ok(LevelLadder {
        high,
        low,
        range,
        levels,
    })
}

/// What the ladder analysis suggests doing at the current price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedAction {
    StrongEntrySignal,
    ConfirmedBreak,
    SecondaryLevelWatch,
    ExtremeLevelReversal,
    InsufficientBreakConfirmation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelBreak {
    pub level: GannLevel,
    pub price: f64,
    pub confirmation: BreakConfirmation,
}

/// Position of the current price against the trading levels of a range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetracementAnalysis {
    pub current_price: f64,
    pub levels: Vec<LevelPrice>,
    pub nearest_level: GannLevel,
    pub nearest_price: f64,
    pub distance_to_nearest: f64,
    /// The 50% level always leads the watch list.
    pub priority_level: GannLevel,
    /// True when price sits within tolerance of the 50% level.
    pub at_half_level: bool,
    pub break_confirmations: Vec<LevelBreak>,
    pub confirmed_breaks: Vec<GannLevel>,
    pub recommended_action: RecommendedAction,
    /// Level the recommendation refers to, when one applies.
    pub action_level: Option<GannLevel>,
}

/// Tolerance band around the 50% level, as a fraction of the level price.
const HALF_LEVEL_TOLERANCE: f64 = 0.002;

/// Analyze where the current price sits against the trading levels of the
/// range, including break confirmations on this timeframe.
pub fn analyze_retracements(
    high: f64,
    low: f64,
    current_price: f64,
    timeframe: Timeframe,
) -> Result<RetracementAnalysis, DomainError> {
    let range = check_range(high, low)?;
    if !current_price.is_finite() || current_price <= 0.0 {
        return Err(DomainError::InvalidInput(format!(
            "current price must be positive and finite, got {current_price}"
        )));
    }

    let levels: Vec<LevelPrice> = GannLevel::TRADING
        .iter()
        .map(|&level| LevelPrice {
            level,
            price: level.price_at(low, range),
        })
        .collect();

    // Nearest trading level by absolute distance; ties keep the lower rung
    let nearest = levels
        .iter()
        .min_by(|a, b| {
            let da = (current_price - a.price).abs();
            let db = (current_price - b.price).abs();
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
        .copied()
        .ok_or_else(|| DomainError::InvalidInput("empty level grid".to_string()))?;

    let mut break_confirmations = Vec::with_capacity(levels.len());
    let mut confirmed_breaks = Vec::new();
    for lp in &levels {
        let confirmation = validate_break(lp.price, current_price, timeframe, None)?;
        if confirmation.confirmed {
            confirmed_breaks.push(lp.level);
        }
        break_confirmations.push(LevelBreak {
            level: lp.level,
            price: lp.price,
            confirmation,
        });
    }

    let half_price = GannLevel::Half.price_at(low, range);
    let at_half_level = (current_price - half_price).abs() <= half_price * HALF_LEVEL_TOLERANCE;

    let (recommended_action, action_level) = if at_half_level {
        (RecommendedAction::StrongEntrySignal, Some(GannLevel::Half))
    } else if let Some(&first) = confirmed_breaks.first() {
        (RecommendedAction::ConfirmedBreak, Some(first))
    } else if matches!(nearest.level, GannLevel::ThreeEighths | GannLevel::FiveEighths) {
        (RecommendedAction::SecondaryLevelWatch, Some(nearest.level))
    } else if matches!(nearest.level, GannLevel::Quarter | GannLevel::ThreeQuarters) {
        (RecommendedAction::ExtremeLevelReversal, Some(nearest.level))
    } else {
        (RecommendedAction::InsufficientBreakConfirmation, None)
    };

    Ok(RetracementAnalysis {
        current_price,
        levels,
        nearest_level: nearest.level,
        nearest_price: nearest.price,
        distance_to_nearest: (current_price - nearest.price).abs(),
        priority_level: GannLevel::Half,
        at_half_level,
        break_confirmations,
        confirmed_breaks,
        recommended_action,
        action_level,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ladder_prices_over_unit_range() {
        let ladder = calculate_levels(1000.0, 0.0, false).unwrap();
        assert_eq!(ladder.range, 1000.0);
        assert_eq!(ladder.price_of(GannLevel::Half), Some(500.0));
        assert_eq!(ladder.price_of(GannLevel::Quarter), Some(250.0));
        assert_eq!(ladder.price_of(GannLevel::SevenEighths), Some(875.0));
        assert_eq!(ladder.price_of(GannLevel::Full), Some(1000.0));
        assert_eq!(ladder.price_of(GannLevel::Double), None);
    }

    #[test]
    fn test_extended_ladder_projects_past_high() {
        let ladder = calculate_levels(200.0, 100.0, true).unwrap();
        assert_eq!(ladder.price_of(GannLevel::NineEighths), Some(212.5));
        assert_eq!(ladder.price_of(GannLevel::Double), Some(300.0));
        assert_eq!(ladder.price_of(GannLevel::Triple), Some(400.0));
    }

    #[test]
    fn test_ladder_is_monotonic() {
        let ladder = calculate_levels(68_432.0, 15_476.0, true).unwrap();
        for pair in ladder.levels.windows(2) {
            assert!(pair[0].price < pair[1].price);
        }
    }

    #[test]
    fn test_rejects_inverted_range() {
        assert!(calculate_levels(100.0, 100.0, false).is_err());
        assert!(calculate_levels(99.0, 100.0, false).is_err());
        assert!(calculate_levels(f64::NAN, 0.0, false).is_err());
    }

    #[test]
    fn test_price_at_half_signals_strong_entry() {
        let analysis = analyze_retracements(1000.0, 0.0, 500.0, Timeframe::Daily).unwrap();
        assert!(analysis.at_half_level);
        assert_eq!(analysis.nearest_level, GannLevel::Half);
        assert_eq!(analysis.priority_level, GannLevel::Half);
        assert_eq!(
            analysis.recommended_action,
            RecommendedAction::StrongEntrySignal
        );
        assert_eq!(analysis.action_level, Some(GannLevel::Half));
    }

    #[test]
    fn test_half_tolerance_is_two_tenths_percent() {
        // 500 * 0.002 = 1.0 either side
        let inside = analyze_retracements(1000.0, 0.0, 500.9, Timeframe::Daily).unwrap();
        assert!(inside.at_half_level);
        let outside = analyze_retracements(1000.0, 0.0, 501.5, Timeframe::Daily).unwrap();
        assert!(!outside.at_half_level);
    }

    #[test]
    fn test_confirmed_break_reported_when_off_level() {
        // 290 is 16% above the 250 quarter level, well past the daily 3%
        let analysis = analyze_retracements(1000.0, 0.0, 290.0, Timeframe::Daily).unwrap();
        assert_eq!(analysis.recommended_action, RecommendedAction::ConfirmedBreak);
        assert_eq!(analysis.action_level, Some(GannLevel::Quarter));
        assert!(analysis.confirmed_breaks.contains(&GannLevel::Quarter));
    }

    #[test]
    fn test_secondary_watch_near_three_eighths() {
        // Narrow range keeps every level inside the daily 3% threshold:
        // levels sit at 100.75 / 101.125 / 101.5 / 101.875 / 102.25
        let analysis = analyze_retracements(103.0, 100.0, 101.1, Timeframe::Daily).unwrap();
        assert!(analysis.confirmed_breaks.is_empty());
        assert_eq!(analysis.nearest_level, GannLevel::ThreeEighths);
        assert_eq!(
            analysis.recommended_action,
            RecommendedAction::SecondaryLevelWatch
        );
    }

    #[test]
    fn test_extreme_level_reversal_near_quarter() {
        let analysis = analyze_retracements(103.0, 100.0, 100.8, Timeframe::Daily).unwrap();
        assert!(analysis.confirmed_breaks.is_empty());
        assert_eq!(analysis.nearest_level, GannLevel::Quarter);
        assert_eq!(
            analysis.recommended_action,
            RecommendedAction::ExtremeLevelReversal
        );
    }

    #[test]
    fn test_insufficient_when_half_is_near_but_not_reached() {
        // Levels at 102.5 / 103.75 / 105 / 106.25 / 107.5; 105.5 is nearest
        // the half level but outside its 0.21 tolerance, with no breaks
        let analysis = analyze_retracements(110.0, 100.0, 105.5, Timeframe::Daily).unwrap();
        assert!(analysis.confirmed_breaks.is_empty());
        assert_eq!(analysis.nearest_level, GannLevel::Half);
        assert!(!analysis.at_half_level);
        assert_eq!(
            analysis.recommended_action,
            RecommendedAction::InsufficientBreakConfirmation
        );
        assert_eq!(analysis.action_level, None);
    }

    #[test]
    fn test_half_significance_dominates() {
        assert_eq!(GannLevel::Half.significance(), 1.0);
        assert!(GannLevel::ThreeEighths.significance() > GannLevel::Quarter.significance());
        assert_eq!(GannLevel::Eighth.significance(), 0.5);
    }

    #[test]
    fn test_level_labels_parse_back() {
        for level in GannLevel::CORE.iter().chain(GannLevel::EXTENDED.iter()) {
            let parsed: GannLevel = level.to_string().parse().unwrap();
            assert_eq!(parsed, *level);
        }
        assert_eq!("50".parse::<GannLevel>().unwrap(), GannLevel::Half);
        assert!("40%".parse::<GannLevel>().is_err());
    }
}
