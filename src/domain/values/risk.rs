use crate::domain::error::DomainError;
use crate::domain::values::timeframe::Timeframe;
use crate::domain::values::trade_direction::TradeDirection;
use serde::{Deserialize, Serialize};

/// Proportional stop and target distances, as fractions of the entry
/// price.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RiskParams {
    pub stop_fraction: f64,
    pub target_fraction: f64,
    pub nominal_risk_reward: f64,
}

/// Risk widens with the frame: a monthly campaign stop sits 25% away,
/// a one-minute scalp stop 0.8%.
pub fn risk_params(timeframe: Timeframe) -> RiskParams {
    let (stop_fraction, target_fraction, nominal_risk_reward) = match timeframe {
        Timeframe::Monthly => (0.25, 0.80, 3.2),
        Timeframe::Weekly => (0.15, 0.45, 3.0),
        Timeframe::Daily => (0.10, 0.25, 2.5),
        Timeframe::FourHour => (0.06, 0.15, 2.5),
        Timeframe::OneHour => (0.04, 0.08, 2.0),
        Timeframe::FifteenMin => (0.025, 0.05, 2.0),
        Timeframe::FiveMin => (0.015, 0.03, 2.0),
        Timeframe::OneMin => (0.008, 0.015, 1.9),
    };
    RiskParams {
        stop_fraction,
        target_fraction,
        nominal_risk_reward,
    }
}

impl RiskParams {
    pub fn stop_price(&self, entry: f64, direction: TradeDirection) -> f64 {
        let distance = entry * self.stop_fraction;
        match direction {
            TradeDirection::Long => entry - distance,
            TradeDirection::Short => entry + distance,
        }
    }

    pub fn target_price(&self, entry: f64, direction: TradeDirection) -> f64 {
        let distance = entry * self.target_fraction;
        match direction {
            TradeDirection::Long => entry + distance,
            TradeDirection::Short => entry - distance,
        }
    }
}

/// Reward per unit of risk from concrete prices. Zero when the stop sits
/// on the entry.
pub fn actual_risk_reward(entry: f64, stop: f64, target: f64) -> f64 {
    let risk = (entry - stop).abs();
    if risk > 0.0 {
        (target - entry).abs() / risk
    } else {
        0.0
    }
}

/// Units bought for a fixed trade amount. Zero on a degenerate entry.
pub fn position_units(trade_amount: f64, entry: f64) -> f64 {
    if entry > 0.0 {
        trade_amount / entry
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PositionSize {
    pub risk_amount: f64,
    pub units: f64,
}

/// Size a position so that hitting the stop loses exactly
/// `risk_percentage` of the account.
pub fn position_size(
    account_size: f64,
    risk_percentage: f64,
    entry: f64,
    stop: f64,
) -> Result<PositionSize, DomainError> {
    if stop == entry {
        return Err(DomainError::InvalidInput(
            "Entry price cannot be the same as stop loss price".to_string(),
        ));
    }
    if !account_size.is_finite() || account_size <= 0.0 {
        return Err(DomainError::InvalidInput(format!(
            "Account size must be positive, got {account_size}"
        )));
    }
    let risk_amount = account_size * risk_percentage / 100.0;
    let units = risk_amount / (entry - stop).abs();
    Ok(PositionSize { risk_amount, units })
}

/// A closed trade plus the bars that were on screen at entry, for
/// protective-stop suggestions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRecord {
    pub direction: TradeDirection,
    pub entry: f64,
    /// Realized profit or loss.
    pub result: f64,
    pub highs_at_entry: Vec<f64>,
    pub lows_at_entry: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountRisk {
    /// One tenth of capital per Gann's capital rule.
    pub allowed_risk: f64,
    /// Below the lowest of the last five lows for longs, above the
    /// highest of the last five highs for shorts.
    pub protective_stop: Option<f64>,
    pub loss_streak: usize,
    pub pause_trading: bool,
}

pub fn manage_account_risk(history: &[TradeRecord], capital: f64) -> AccountRisk {
    let allowed_risk = capital / 10.0;

    let protective_stop = history.last().and_then(|trade| match trade.direction {
        TradeDirection::Long => trade
            .lows_at_entry
            .iter()
            .rev()
            .take(5)
            .copied()
            .fold(None, |acc: Option<f64>, low| {
                Some(acc.map_or(low, |m| m.min(low)))
            }),
        TradeDirection::Short => trade
            .highs_at_entry
            .iter()
            .rev()
            .take(5)
            .copied()
            .fold(None, |acc: Option<f64>, high| {
                Some(acc.map_or(high, |m| m.max(high)))
            }),
    });

    let loss_streak = history
        .iter()
        .rev()
        .take_while(|trade| trade.result < 0.0)
        .count();

    AccountRisk {
        allowed_risk,
        protective_stop,
        loss_streak,
        pause_trading: loss_streak >= 3,
    }
}
