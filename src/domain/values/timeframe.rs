use crate::domain::values::priority::ConfidenceLevel;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Analysis timeframe. Higher frames dominate lower ones in the Gann
/// hierarchy: monthly structure overrides everything below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Monthly,
    Weekly,
    Daily,
    #[serde(rename = "4h")]
    FourHour,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "15m")]
    FifteenMin,
    #[serde(rename = "5m")]
    FiveMin,
    #[serde(rename = "1m")]
    OneMin,
}

impl Timeframe {
    pub const ALL: [Timeframe; 8] = [
        Timeframe::Monthly,
        Timeframe::Weekly,
        Timeframe::Daily,
        Timeframe::FourHour,
        Timeframe::OneHour,
        Timeframe::FifteenMin,
        Timeframe::FiveMin,
        Timeframe::OneMin,
    ];

    /// Hierarchy weight, 10 (monthly) down to 3 (one-minute).
    pub fn weight(&self) -> u8 {
        match self {
            Timeframe::Monthly => 10,
            Timeframe::Weekly => 9,
            Timeframe::Daily => 8,
            Timeframe::FourHour => 7,
            Timeframe::OneHour => 6,
            Timeframe::FifteenMin => 5,
            Timeframe::FiveMin => 4,
            Timeframe::OneMin => 3,
        }
    }

    /// Campaign range estimate around the current price when no explicit
    /// high/low is supplied: (high multiplier, low multiplier).
    pub fn analysis_range(&self) -> (f64, f64) {
        match self {
            Timeframe::Monthly => (1.80, 0.30),
            Timeframe::Weekly => (1.45, 0.60),
            Timeframe::Daily => (1.25, 0.80),
            Timeframe::FourHour => (1.12, 0.90),
            Timeframe::OneHour => (1.06, 0.95),
            Timeframe::FifteenMin => (1.03, 0.98),
            Timeframe::FiveMin => (1.015, 0.985),
            Timeframe::OneMin => (1.008, 0.992),
        }
    }

    /// Slightly wider range used when pricing opportunity entries, so
    /// level grids reach beyond the immediate trading band.
    pub fn generation_range(&self) -> (f64, f64) {
        match self {
            Timeframe::Monthly => (1.80, 0.30),
            Timeframe::Weekly => (1.80, 0.60),
            Timeframe::Daily => (1.25, 0.80),
            Timeframe::FourHour => (1.15, 0.90),
            Timeframe::OneHour => (1.08, 0.95),
            Timeframe::FifteenMin => (1.04, 0.98),
            Timeframe::FiveMin => (1.02, 0.99),
            Timeframe::OneMin => (1.008, 0.996),
        }
    }

    /// Expected holding window for trades on this frame.
    pub fn duration_label(&self) -> &'static str {
        match self {
            Timeframe::Monthly => "6-12 months",
            Timeframe::Weekly => "2-8 weeks",
            Timeframe::Daily => "3-14 days",
            Timeframe::FourHour => "1-3 days",
            Timeframe::OneHour => "4-12 hours",
            Timeframe::FifteenMin => "30min-2 hours",
            Timeframe::FiveMin => "5-30 minutes",
            Timeframe::OneMin => "1-10 minutes",
        }
    }

    /// Default signal confidence for the frame. Higher frames carry more
    /// reliable structure.
    pub fn confidence(&self) -> ConfidenceLevel {
        match self {
            Timeframe::Monthly | Timeframe::Weekly => ConfidenceLevel::High,
            Timeframe::Daily | Timeframe::FourHour | Timeframe::OneHour => {
                ConfidenceLevel::Medium
            }
            Timeframe::FifteenMin | Timeframe::FiveMin | Timeframe::OneMin => {
                ConfidenceLevel::Low
            }
        }
    }

    /// Entry tolerance band as a fraction of price.
    pub fn tolerance(&self) -> f64 {
        match self {
            Timeframe::Monthly => 0.10,
            Timeframe::Weekly => 0.03,
            Timeframe::Daily => 0.02,
            Timeframe::FourHour => 0.015,
            Timeframe::OneHour => 0.01,
            Timeframe::FifteenMin => 0.012,
            Timeframe::FiveMin => 0.015,
            Timeframe::OneMin => 0.003,
        }
    }

    pub fn trade_class(&self) -> TradeClass {
        match self {
            Timeframe::Monthly => TradeClass::Investment,
            Timeframe::Weekly | Timeframe::Daily => TradeClass::Swing,
            Timeframe::FourHour | Timeframe::OneHour => TradeClass::DayTrade,
            Timeframe::FifteenMin | Timeframe::FiveMin | Timeframe::OneMin => {
                TradeClass::Scalping
            }
        }
    }

    pub fn is_scalping(&self) -> bool {
        self.trade_class() == TradeClass::Scalping
    }

    pub fn description(&self) -> &'static str {
        match self {
            Timeframe::Monthly => "Major campaign analysis",
            Timeframe::Weekly => "Trend following",
            Timeframe::Daily => "Swing trading",
            Timeframe::FourHour => "Short-term swings",
            Timeframe::OneHour => "Intraday swings",
            Timeframe::FifteenMin => "Scalping",
            Timeframe::FiveMin => "Ultra-short scalping",
            Timeframe::OneMin => "Micro-scalping",
        }
    }

    /// Trading notes attached to batch reports.
    pub fn playbook(&self) -> [&'static str; 2] {
        match self {
            Timeframe::Monthly => [
                "Monthly trend overrides all lower timeframes",
                "4th section completions signal major reversals",
            ],
            Timeframe::Weekly => [
                "Follow monthly bias, trade weekly swings",
                "Strong 2nd section breakouts most reliable",
            ],
            Timeframe::Daily => [
                "Gann's major 49-52 and 90-98 day cycles",
                "Daily 4th sections signal swing reversals",
            ],
            Timeframe::FourHour => [
                "Short-term swing entries and exits",
                "Quick section completions possible",
            ],
            Timeframe::OneHour => [
                "Intraday momentum and reversal plays",
                "50% retracements most reliable",
            ],
            Timeframe::FifteenMin => [
                "Pure scalping opportunities",
                "Tight stop losses required",
            ],
            Timeframe::FiveMin => ["Ultra-short term momentum", "Micro-section analysis"],
            Timeframe::OneMin => ["Tick-by-tick analysis", "Extremely tight risk management"],
        }
    }

    /// One confirmation period expressed in days. Sub-daily frames use
    /// fractional days.
    pub fn confirmation_day_multiplier(&self) -> f64 {
        match self {
            Timeframe::Monthly => 30.0,
            Timeframe::Weekly => 7.0,
            Timeframe::Daily => 1.0,
            Timeframe::FourHour => 0.17,
            Timeframe::OneHour => 0.04,
            Timeframe::FifteenMin => 0.01,
            Timeframe::FiveMin => 0.003,
            Timeframe::OneMin => 0.0007,
        }
    }

    /// Lenient parse used where a missing or malformed frame should fall
    /// back to daily rather than fail.
    pub fn parse_lenient(s: &str) -> Timeframe {
        s.parse().unwrap_or(Timeframe::Daily)
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timeframe::Monthly => write!(f, "monthly"),
            Timeframe::Weekly => write!(f, "weekly"),
            Timeframe::Daily => write!(f, "daily"),
            Timeframe::FourHour => write!(f, "4h"),
            Timeframe::OneHour => write!(f, "1h"),
            Timeframe::FifteenMin => write!(f, "15m"),
            Timeframe::FiveMin => write!(f, "5m"),
            Timeframe::OneMin => write!(f, "1m"),
        }
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monthly" | "month" | "1mo" => Ok(Timeframe::Monthly),
            "weekly" | "week" | "1w" => Ok(Timeframe::Weekly),
            "daily" | "day" | "1d" => Ok(Timeframe::Daily),
            "4h" | "4hr" | "240m" => Ok(Timeframe::FourHour),
            "1h" | "1hr" | "60m" | "hourly" => Ok(Timeframe::OneHour),
            "15m" | "15min" => Ok(Timeframe::FifteenMin),
            "5m" | "5min" => Ok(Timeframe::FiveMin),
            "1m" | "1min" => Ok(Timeframe::OneMin),
            _ => Err(format!("Unknown timeframe: {s}")),
        }
    }
}

/// Broad trade style implied by the timeframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeClass {
    Investment,
    Swing,
    DayTrade,
    Scalping,
}

impl TradeClass {
    pub fn label(&self) -> &'static str {
        match self {
            TradeClass::Investment => "Investment",
            TradeClass::Swing => "Swing trade",
            TradeClass::DayTrade => "Day trade",
            TradeClass::Scalping => "Scalping",
        }
    }
}

impl fmt::Display for TradeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeClass::Investment => write!(f, "investment"),
            TradeClass::Swing => write!(f, "swing"),
            TradeClass::DayTrade => write!(f, "day_trade"),
            TradeClass::Scalping => write!(f, "scalping"),
        }
    }
}
