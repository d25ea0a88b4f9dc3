use crate::domain::values::breaks::BreakConfirmation;
use crate::domain::values::campaign::SectionTag;
use crate::domain::values::projection::near_gann_cycle_day;
use crate::domain::values::hierarchy::InfluenceSource;
use crate::domain::values::priority::ConfidenceLevel;
use crate::domain::values::retracement::GannLevel;
use crate::domain::values::timeframe::Timeframe;
use crate::domain::values::trade_direction::TradeDirection;
use crate::domain::values::volume::VolumeStrength;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The six checks every candidate trade is scored against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckKind {
    TimeframeAlignment,
    VolumeConfirmation,
    PriceLevelSignificance,
    TimeCycleAlignment,
    RiskRewardRatio,
    CampaignPosition,
}

impl CheckKind {
    pub const ALL: [CheckKind; 6] = [
        CheckKind::TimeframeAlignment,
        CheckKind::VolumeConfirmation,
        CheckKind::PriceLevelSignificance,
        CheckKind::TimeCycleAlignment,
        CheckKind::RiskRewardRatio,
        CheckKind::CampaignPosition,
    ];

    pub fn weight(&self) -> f64 {
        match self {
            CheckKind::TimeframeAlignment => 0.25,
            CheckKind::VolumeConfirmation => 0.20,
            CheckKind::PriceLevelSignificance => 0.20,
            CheckKind::TimeCycleAlignment => 0.15,
            CheckKind::RiskRewardRatio => 0.10,
            CheckKind::CampaignPosition => 0.10,
        }
    }

    /// Score below which the check fails outright.
    pub fn minimum(&self) -> f64 {
        match self {
            CheckKind::TimeframeAlignment => 0.6,
            CheckKind::VolumeConfirmation => 0.7,
            CheckKind::PriceLevelSignificance => 0.8,
            CheckKind::TimeCycleAlignment => 0.5,
            CheckKind::RiskRewardRatio => 0.8,
            CheckKind::CampaignPosition => 0.6,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CheckKind::TimeframeAlignment => "Higher timeframes must align with trade direction",
            CheckKind::VolumeConfirmation => "Volume must confirm price action per Gann rules",
            CheckKind::PriceLevelSignificance => {
                "Entry must be at significant Gann retracement level"
            }
            CheckKind::TimeCycleAlignment => "Entry timing must align with Gann time cycles",
            CheckKind::RiskRewardRatio => "Risk/reward must meet minimum Gann standards",
            CheckKind::CampaignPosition => "Trade must align with current campaign section",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CheckKind::TimeframeAlignment => "TIMEFRAME_ALIGNMENT",
            CheckKind::VolumeConfirmation => "VOLUME_CONFIRMATION",
            CheckKind::PriceLevelSignificance => "PRICE_LEVEL_SIGNIFICANCE",
            CheckKind::TimeCycleAlignment => "TIME_CYCLE_ALIGNMENT",
            CheckKind::RiskRewardRatio => "RISK_REWARD_RATIO",
            CheckKind::CampaignPosition => "CAMPAIGN_POSITION",
        };
        write!(f, "{name}")
    }
}

/// Letter grade shared by trade validation and transition assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    F,
}

impl Grade {
    pub fn from_validation_score(score: f64) -> Grade {
        if score >= 0.85 {
            Grade::A
        } else if score >= 0.75 {
            Grade::B
        } else if score >= 0.65 {
            Grade::C
        } else {
            Grade::F
        }
    }

    /// Transition probabilities grade on a coarser curve.
    pub fn from_transition_probability(probability: f64) -> Grade {
        if probability >= 0.8 {
            Grade::A
        } else if probability >= 0.6 {
            Grade::B
        } else if probability >= 0.4 {
            Grade::C
        } else {
            Grade::F
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grade::A => write!(f, "A"),
            Grade::B => write!(f, "B"),
            Grade::C => write!(f, "C"),
            Grade::F => write!(f, "F"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    TakeTrade,
    ConsiderTrade,
    WatchTrade,
    AvoidTrade,
}

impl Recommendation {
    pub fn from_score(score: f64) -> Recommendation {
        if score >= 0.85 {
            Recommendation::TakeTrade
        } else if score >= 0.70 {
            Recommendation::ConsiderTrade
        } else if score >= 0.55 {
            Recommendation::WatchTrade
        } else {
            Recommendation::AvoidTrade
        }
    }
}

/// Everything the scorer needs to know about a candidate trade.
#[derive(Debug, Clone)]
pub struct TradeSetup<'a> {
    pub direction: TradeDirection,
    pub timeframe: Timeframe,
    pub influence: InfluenceSource,
    pub entry_level: Option<GannLevel>,
    pub break_confirmation: Option<&'a BreakConfirmation>,
    pub volume_strength: Option<VolumeStrength>,
    pub section: Option<SectionTag>,
    pub confidence: ConfidenceLevel,
    /// Reward per unit of risk, from concrete prices.
    pub risk_reward: f64,
    pub evaluated_on: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub check: CheckKind,
    pub score: f64,
    pub passes: bool,
    pub weight: f64,
    pub description: &'static str,
    pub details: String,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TradeValidation {
    pub validated: bool,
    pub final_score: f64,
    pub grade: Grade,
    pub recommendation: Recommendation,
    pub checks: Vec<CheckResult>,
    /// Checks that failed their minimum.
    pub critical_issues: Vec<CheckKind>,
    /// Checks scoring 0.8 or better.
    pub strengths: Vec<CheckKind>,
}

/// Minimum acceptable risk/reward per timeframe.
pub fn minimum_risk_reward(timeframe: Timeframe) -> f64 {
    match timeframe {
        Timeframe::Monthly => 2.5,
        Timeframe::Weekly => 2.0,
        Timeframe::Daily => 1.8,
        Timeframe::FourHour => 1.5,
        Timeframe::OneHour => 1.3,
        Timeframe::FifteenMin => 1.2,
        Timeframe::FiveMin => 1.1,
        Timeframe::OneMin => 1.0,
    }
}

fn check_timeframe_alignment(setup: &TradeSetup) -> (f64, String, Vec<String>) {
    let is_long = setup.direction.is_long();
    let mut issues = Vec::new();
    let score = match (setup.influence, is_long) {
        (InfluenceSource::MonthlyBear, true) => {
            issues.push("Bull trade conflicts with monthly bear trend".to_string());
            0.2
        }
        (InfluenceSource::WeeklyBear, true) => {
            issues.push("Bull trade conflicts with weekly bear trend".to_string());
            0.6
        }
        (InfluenceSource::MonthlyBear, false) => 1.0,
        (InfluenceSource::Local, _) => 0.8,
        _ => 1.0,
    };
    (
        score,
        format!("Timeframe alignment: {}", setup.influence),
        issues,
    )
}

fn check_volume_confirmation(setup: &TradeSetup) -> (f64, String, Vec<String>) {
    let score = setup
        .volume_strength
        .map(|strength| strength.score())
        .unwrap_or(0.5);
    let mut issues = Vec::new();

    if setup.section == Some(SectionTag::Bull2)
        && setup.volume_strength != Some(VolumeStrength::Strong)
    {
        issues.push("Bull section 2 breakout requires STRONG volume".to_string());
    }
    if setup.section == Some(SectionTag::BearA) && setup.volume_strength == Some(VolumeStrength::Weak)
    {
        issues.push("Bear section A decline should have higher volume".to_string());
    }

    let label = setup
        .volume_strength
        .map(|strength| format!("{strength:?}"))
        .unwrap_or_else(|| "unknown".to_string());
    (score, format!("Volume strength: {label}"), issues)
}

fn check_price_level_significance(setup: &TradeSetup) -> (f64, String, Vec<String>) {
    let base = setup
        .entry_level
        .map(|level| level.significance())
        .unwrap_or(0.5);
    let mut issues = Vec::new();

    let score = match setup.break_confirmation {
        Some(confirmation) if !confirmation.confirmed => {
            issues.push(format!(
                "Insufficient break confirmation: {:.2}% vs required {:.2}%",
                confirmation.move_percent, confirmation.required_percent
            ));
            base * 0.5
        }
        _ => base,
    };

    let level_label = setup
        .entry_level
        .map(|level| level.to_string())
        .unwrap_or_else(|| "unmapped".to_string());
    let strength_label = setup
        .break_confirmation
        .map(|confirmation| format!("{:?}", confirmation.strength))
        .unwrap_or_else(|| "unknown".to_string());
    (
        score,
        format!("Entry at {level_label} Gann level with {strength_label} break confirmation"),
        issues,
    )
}

fn check_time_cycle_alignment(setup: &TradeSetup) -> (f64, String, Vec<String>) {
    let mut score: f64 = 0.7;
    let mut issues = Vec::new();

    let weekday = setup.evaluated_on.weekday();
    if matches!(
        weekday,
        Weekday::Mon | Weekday::Tue | Weekday::Wed | Weekday::Thu
    ) {
        score += 0.1;
    } else {
        issues.push("Trading on less favorable day of week".to_string());
    }

    if near_gann_cycle_day(setup.evaluated_on) {
        score += 0.2;
    }

    (
        score.min(1.0),
        format!("Time cycle alignment for {}", setup.timeframe),
        issues,
    )
}

fn check_risk_reward(setup: &TradeSetup) -> (f64, String, Vec<String>) {
    let minimum = minimum_risk_reward(setup.timeframe);
    let ratio = setup.risk_reward;
    let score = (ratio / minimum).min(1.0);
    let mut issues = Vec::new();

    if ratio < minimum {
        issues.push(format!(
            "Risk/reward ratio {ratio:.2} below minimum {minimum} for {}",
            setup.timeframe
        ));
    }

    (
        score,
        format!("Risk/reward: 1:{ratio:.2} (min required: 1:{minimum})"),
        issues,
    )
}

fn check_campaign_position(setup: &TradeSetup) -> (f64, String, Vec<String>) {
    let base = setup
        .section
        .map(|section| section.reliability())
        .unwrap_or(0.6);
    let score = base * setup.confidence.multiplier();

    let section_label = setup
        .section
        .map(|section| section.to_string())
        .unwrap_or_else(|| "none".to_string());
    (
        score,
        format!(
            "Campaign position: {section_label} with {} confidence",
            setup.confidence
        ),
        Vec::new(),
    )
}

/// Score a candidate trade against all six checks. A trade validates only
/// when every check clears its minimum and the weighted score reaches 0.70.
pub fn validate_trade(setup: &TradeSetup) -> TradeValidation {
    let mut total = 0.0;
    let mut weight_sum = 0.0;
    let mut checks = Vec::with_capacity(CheckKind::ALL.len());

    for kind in CheckKind::ALL {
        let (score, details, issues) = match kind {
            CheckKind::TimeframeAlignment => check_timeframe_alignment(setup),
            CheckKind::VolumeConfirmation => check_volume_confirmation(setup),
            CheckKind::PriceLevelSignificance => check_price_level_significance(setup),
            CheckKind::TimeCycleAlignment => check_time_cycle_alignment(setup),
            CheckKind::RiskRewardRatio => check_risk_reward(setup),
            CheckKind::CampaignPosition => check_campaign_position(setup),
        };
        let weight = kind.weight();
        total += score * weight;
        weight_sum += weight;
        checks.push(CheckResult {
            check: kind,
            score,
            passes: score >= kind.minimum(),
            weight,
            description: kind.description(),
            details,
            issues,
        });
    }

    let final_score = total / weight_sum;
    let all_pass = checks.iter().all(|result| result.passes);

    TradeValidation {
        validated: all_pass && final_score >= 0.7,
        final_score,
        grade: Grade::from_validation_score(final_score),
        recommendation: Recommendation::from_score(final_score),
        critical_issues: checks
            .iter()
            .filter(|result| !result.passes)
            .map(|result| result.check)
            .collect(),
        strengths: checks
            .iter()
            .filter(|result| result.score >= 0.8)
            .map(|result| result.check)
            .collect(),
        checks,
    }
}
