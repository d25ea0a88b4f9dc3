use crate::domain::error::DomainError;
use crate::domain::values::timeframe::Timeframe;
use crate::domain::values::volume::VolumeSnapshot;
use serde::{Deserialize, Serialize};

/// Which side of the level price currently sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakDirection {
    Above,
    Below,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakStrength {
    Strong,
    Moderate,
    Weak,
}

/// Outcome of testing whether price has broken away from a Gann level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakConfirmation {
    pub confirmed: bool,
    pub direction: BreakDirection,
    pub strength: BreakStrength,
    /// Movement away from the level, percent of the level price.
    pub move_percent: f64,
    /// Timeframe threshold the movement is measured against.
    pub required_percent: f64,
    /// None when no volume data was supplied.
    pub volume_confirmed: Option<bool>,
}

/// Minimum percentage move for a level break to count, per timeframe.
/// Higher frames demand proportionally larger moves.
pub fn required_move_percent(timeframe: Timeframe) -> f64 {
    match timeframe {
        Timeframe::Monthly => 8.0,
        Timeframe::Weekly => 5.0,
        Timeframe::Daily => 3.0,
        Timeframe::FourHour => 2.0,
        Timeframe::OneHour => 1.5,
        Timeframe::FifteenMin => 1.2,
        Timeframe::FiveMin => 0.8,
        Timeframe::OneMin => 0.5,
    }
}

/// Test a price against a level. The movement threshold is inclusive, and
/// when volume data is present confirmation additionally requires current
/// volume at 1.5x its average; missing volume never vetoes. Strength is a
/// pure function of the movement (2x threshold reads Strong even if
/// volume withholds confirmation).
pub fn validate_break(
    level_price: f64,
    current_price: f64,
    timeframe: Timeframe,
    volume: Option<&VolumeSnapshot>,
) -> Result<BreakConfirmation, DomainError> {
    if !level_price.is_finite() || level_price <= 0.0 {
        return Err(DomainError::InvalidInput(format!(
            "level price must be positive and finite, got {level_price}"
        )));
    }
    if !current_price.is_finite() || current_price <= 0.0 {
        return Err(DomainError::InvalidInput(format!(
            "current price must be positive and finite, got {current_price}"
        )));
    }

    let required_percent = required_move_percent(timeframe);
    let move_percent = (current_price - level_price).abs() / level_price * 100.0;
    let direction = if current_price >= level_price {
        BreakDirection::Above
    } else {
        BreakDirection::Below
    };

    let volume_confirmed = volume.map(|v| v.current >= 1.5 * v.average);
    let confirmed = move_percent >= required_percent && volume_confirmed.unwrap_or(true);
    let strength = if move_percent >= required_percent * 2.0 {
        BreakStrength::Strong
    } else if confirmed {
        BreakStrength::Moderate
    } else {
        BreakStrength::Weak
    };

    Ok(BreakConfirmation {
        confirmed,
        direction,
        strength,
        move_percent,
        required_percent,
        volume_confirmed,
    })
}
