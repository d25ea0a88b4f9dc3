use crate::domain::error::DomainError;
use crate::domain::values::campaign::SectionTag;
use crate::domain::values::timeframe::Timeframe;
use serde::{Deserialize, Serialize};

/// Current volume against its reference average.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VolumeSnapshot {
    pub current: f64,
    pub average: f64,
}

impl VolumeSnapshot {
    /// Last bar vs the mean of the whole slice. None for an empty slice.
    pub fn from_slice(volume: &[f64]) -> Option<VolumeSnapshot> {
        let last = *volume.last()?;
        let average = volume.iter().sum::<f64>() / volume.len() as f64;
        Some(VolumeSnapshot {
            current: last,
            average,
        })
    }

    pub fn ratio(&self) -> f64 {
        if self.average > 0.0 {
            self.current / self.average
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceMove {
    Up,
    Down,
    Flat,
}

/// Spike/divergence read over a close and volume series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeSignal {
    StrongUpConfirmed,
    StrongDownConfirmed,
    Divergence,
    Neutral,
}

#[derive(Debug, Clone, Serialize)]
pub struct VolumeRead {
    pub signal: VolumeSignal,
    pub spike: bool,
    pub price_move: PriceMove,
    pub current: f64,
    pub average: f64,
}

/// Classic spike/divergence read: a volume spike (1.5x the trailing
/// average) confirms a directional close; direction without the spike is
/// a divergence warning.
pub fn read_volume(
    closes: &[f64],
    volume: &[f64],
    lookback: usize,
) -> Result<VolumeRead, DomainError> {
    if volume.is_empty() {
        return Err(DomainError::InsufficientData {
            required: 1,
            got: 0,
        });
    }
    let window = &volume[volume.len().saturating_sub(lookback)..];
    let average = window.iter().sum::<f64>() / window.len() as f64;
    let current = volume[volume.len() - 1];
    let spike = current > average * 1.5;

    let price_move = if closes.len() < 2 {
        PriceMove::Flat
    } else {
        let last = closes[closes.len() - 1];
        let prev = closes[closes.len() - 2];
        if last > prev {
            PriceMove::Up
        } else if last < prev {
            PriceMove::Down
        } else {
            PriceMove::Flat
        }
    };

    let signal = match (spike, price_move) {
        (true, PriceMove::Up) => VolumeSignal::StrongUpConfirmed,
        (true, PriceMove::Down) => VolumeSignal::StrongDownConfirmed,
        (false, PriceMove::Up) | (false, PriceMove::Down) => VolumeSignal::Divergence,
        (_, PriceMove::Flat) => VolumeSignal::Neutral,
    };

    Ok(VolumeRead {
        signal,
        spike,
        price_move,
        current,
        average,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeStrength {
    Strong,
    Medium,
    Weak,
    VeryWeak,
}

impl VolumeStrength {
    /// Score used by the volume-confirmation validation check.
    pub fn score(&self) -> f64 {
        match self {
            VolumeStrength::Strong => 1.0,
            VolumeStrength::Medium => 0.7,
            VolumeStrength::Weak => 0.4,
            VolumeStrength::VeryWeak => 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reliability {
    VeryHigh,
    High,
    Medium,
    Low,
}

impl Reliability {
    /// Collapse pattern reliability onto the strength scale the validator
    /// scores against.
    pub fn as_strength(&self) -> VolumeStrength {
        match self {
            Reliability::VeryHigh | Reliability::High => VolumeStrength::Strong,
            Reliability::Medium => VolumeStrength::Medium,
            Reliability::Low => VolumeStrength::Weak,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeExpectation {
    Increasing,
    High,
    Decreasing,
    Weak,
    Medium,
    Neutral,
}

/// Simple per-section volume expectation used when annotating generated
/// opportunities.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct VolumeExpectationRule {
    pub expected: VolumeExpectation,
    pub strength: VolumeStrength,
    pub description: &'static str,
}

pub fn section_expectation(section: Option<SectionTag>) -> VolumeExpectationRule {
    let Some(section) = section else {
        return VolumeExpectationRule {
            expected: VolumeExpectation::Neutral,
            strength: VolumeStrength::Medium,
            description: "Standard volume analysis",
        };
    };
    match section {
        SectionTag::Bull1 => VolumeExpectationRule {
            expected: VolumeExpectation::Increasing,
            strength: VolumeStrength::Medium,
            description: "Increasing volume on advances",
        },
        SectionTag::Bull2 => VolumeExpectationRule {
            expected: VolumeExpectation::High,
            strength: VolumeStrength::Strong,
            description: "Strong volume on breakouts - MOST RELIABLE",
        },
        SectionTag::Bull3 => VolumeExpectationRule {
            expected: VolumeExpectation::Decreasing,
            strength: VolumeStrength::Weak,
            description: "Decreasing volume in distribution phase",
        },
        SectionTag::Bull4 => VolumeExpectationRule {
            expected: VolumeExpectation::Weak,
            strength: VolumeStrength::VeryWeak,
            description: "Weak volume signals reversal",
        },
        SectionTag::BearA => VolumeExpectationRule {
            expected: VolumeExpectation::High,
            strength: VolumeStrength::Strong,
            description: "High volume confirms initial decline",
        },
        SectionTag::BearSecondaryRally => VolumeExpectationRule {
            expected: VolumeExpectation::Weak,
            strength: VolumeStrength::Weak,
            description: "Weak volume on bear rally",
        },
        SectionTag::BearRetest => VolumeExpectationRule {
            expected: VolumeExpectation::Medium,
            strength: VolumeStrength::Medium,
            description: "Medium volume on retest",
        },
        SectionTag::BearB => VolumeExpectationRule {
            expected: VolumeExpectation::High,
            strength: VolumeStrength::Strong,
            description: "High volume confirms major decline",
        },
        SectionTag::BearCounterRally => VolumeExpectationRule {
            expected: VolumeExpectation::Weak,
            strength: VolumeStrength::Weak,
            description: "Weak volume on counter rally",
        },
        SectionTag::BearC => VolumeExpectationRule {
            expected: VolumeExpectation::Medium,
            strength: VolumeStrength::Medium,
            description: "Final decline volume",
        },
    }
}

/// Named volume pattern each campaign section is expected to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumePattern {
    IncreasingOnAdvances,
    StrongBreakoutVolume,
    DistributionSigns,
    VolumeDivergence,
    PanicSelling,
    WeakRally,
    OrderlyRetest,
    MajorBreakdown,
    Capitulation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeTendency {
    Increasing,
    Strong,
    Weakening,
    NegativeDivergence,
    Climactic,
    Weak,
    Steady,
    StrongSelling,
    ClimacticSelling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntrySignal {
    StrongVolumeConfirmation,
    VolumeIncreaseOnBreakout,
    LowVolumeRallyFailure,
    ClimacticVolumeReversal,
    AvoidEntries,
    VolumeConfirmationRequired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitSignal {
    VolumeDivergenceWarning,
    VolumeExhaustion,
    NegativeDivergence,
    ImmediateExit,
    VolumeIncreaseOnDecline,
    VolumeClimax,
    ExhaustionReversal,
}

/// A named ratio threshold within a section profile, relative to average
/// volume.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct VolumeThreshold {
    pub name: &'static str,
    pub ratio: f64,
}

/// Expected volume behavior for one campaign section.
#[derive(Debug, Clone, Serialize)]
pub struct SectionVolumeProfile {
    pub pattern: VolumePattern,
    pub tendency: VolumeTendency,
    pub reliability: Reliability,
    pub thresholds: [VolumeThreshold; 2],
    pub entry_signal: EntrySignal,
    pub exit_signal: ExitSignal,
}

impl SectionVolumeProfile {
    /// Ratio the entry rule is keyed on.
    pub fn entry_threshold(&self) -> f64 {
        self.thresholds[0].ratio
    }
}

pub fn section_profile(section: SectionTag) -> SectionVolumeProfile {
    match section {
        SectionTag::Bull1 => SectionVolumeProfile {
            pattern: VolumePattern::IncreasingOnAdvances,
            tendency: VolumeTendency::Increasing,
            reliability: Reliability::Medium,
            thresholds: [
                VolumeThreshold { name: "advance_volume_min", ratio: 1.2 },
                VolumeThreshold { name: "decline_volume_max", ratio: 0.8 },
            ],
            entry_signal: EntrySignal::VolumeIncreaseOnBreakout,
            exit_signal: ExitSignal::VolumeDivergenceWarning,
        },
        SectionTag::Bull2 => SectionVolumeProfile {
            pattern: VolumePattern::StrongBreakoutVolume,
            tendency: VolumeTendency::Strong,
            reliability: Reliability::VeryHigh,
            thresholds: [
                VolumeThreshold { name: "breakout_volume_min", ratio: 1.8 },
                VolumeThreshold { name: "follow_through_min", ratio: 1.3 },
            ],
            entry_signal: EntrySignal::StrongVolumeConfirmation,
            exit_signal: ExitSignal::VolumeExhaustion,
        },
        SectionTag::Bull3 => SectionVolumeProfile {
            pattern: VolumePattern::DistributionSigns,
            tendency: VolumeTendency::Weakening,
            reliability: Reliability::High,
            thresholds: [
                VolumeThreshold { name: "advance_volume_max", ratio: 0.9 },
                VolumeThreshold { name: "decline_volume_min", ratio: 1.1 },
            ],
            entry_signal: EntrySignal::VolumeConfirmationRequired,
            exit_signal: ExitSignal::NegativeDivergence,
        },
        SectionTag::Bull4 => SectionVolumeProfile {
            pattern: VolumePattern::VolumeDivergence,
            tendency: VolumeTendency::NegativeDivergence,
            reliability: Reliability::VeryHigh,
            thresholds: [
                VolumeThreshold { name: "advance_volume_max", ratio: 0.7 },
                VolumeThreshold { name: "new_high_volume_max", ratio: 0.5 },
            ],
            entry_signal: EntrySignal::AvoidEntries,
            exit_signal: ExitSignal::ImmediateExit,
        },
        SectionTag::BearA => SectionVolumeProfile {
            pattern: VolumePattern::PanicSelling,
            tendency: VolumeTendency::Climactic,
            reliability: Reliability::VeryHigh,
            thresholds: [
                VolumeThreshold { name: "break_volume_min", ratio: 2.0 },
                VolumeThreshold { name: "follow_through_min", ratio: 1.5 },
            ],
            entry_signal: EntrySignal::StrongVolumeConfirmation,
            exit_signal: ExitSignal::VolumeExhaustion,
        },
        SectionTag::BearSecondaryRally => SectionVolumeProfile {
            pattern: VolumePattern::WeakRally,
            tendency: VolumeTendency::Weak,
            reliability: Reliability::High,
            thresholds: [
                VolumeThreshold { name: "rally_volume_max", ratio: 0.6 },
                VolumeThreshold { name: "decline_volume_normal", ratio: 1.0 },
            ],
            entry_signal: EntrySignal::LowVolumeRallyFailure,
            exit_signal: ExitSignal::VolumeIncreaseOnDecline,
        },
        SectionTag::BearRetest => SectionVolumeProfile {
            pattern: VolumePattern::OrderlyRetest,
            tendency: VolumeTendency::Steady,
            reliability: Reliability::Medium,
            thresholds: [
                VolumeThreshold { name: "retest_volume_max", ratio: 1.1 },
                VolumeThreshold { name: "decline_volume_normal", ratio: 1.0 },
            ],
            entry_signal: EntrySignal::VolumeConfirmationRequired,
            exit_signal: ExitSignal::VolumeIncreaseOnDecline,
        },
        SectionTag::BearB => SectionVolumeProfile {
            pattern: VolumePattern::MajorBreakdown,
            tendency: VolumeTendency::StrongSelling,
            reliability: Reliability::VeryHigh,
            thresholds: [
                VolumeThreshold { name: "breakdown_volume_min", ratio: 1.5 },
                VolumeThreshold { name: "acceleration_volume_min", ratio: 1.2 },
            ],
            entry_signal: EntrySignal::VolumeConfirmationRequired,
            exit_signal: ExitSignal::VolumeClimax,
        },
        SectionTag::BearCounterRally => SectionVolumeProfile {
            pattern: VolumePattern::WeakRally,
            tendency: VolumeTendency::Weak,
            reliability: Reliability::High,
            thresholds: [
                VolumeThreshold { name: "rally_volume_max", ratio: 0.6 },
                VolumeThreshold { name: "decline_volume_normal", ratio: 1.0 },
            ],
            entry_signal: EntrySignal::LowVolumeRallyFailure,
            exit_signal: ExitSignal::VolumeIncreaseOnDecline,
        },
        SectionTag::BearC => SectionVolumeProfile {
            pattern: VolumePattern::Capitulation,
            tendency: VolumeTendency::ClimacticSelling,
            reliability: Reliability::VeryHigh,
            thresholds: [
                VolumeThreshold { name: "final_drop_volume_min", ratio: 2.5 },
                VolumeThreshold { name: "climax_volume_min", ratio: 3.0 },
            ],
            entry_signal: EntrySignal::ClimacticVolumeReversal,
            exit_signal: ExitSignal::ExhaustionReversal,
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RulePriority {
    Critical,
    High,
    Medium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryRuleKind {
    VolumeBreakoutConfirmation,
    GradualVolumeIncrease,
    LowVolumeFailure,
    ClimacticReversal,
    AvoidAllEntries,
    StandardVolumeConfirmation,
}

#[derive(Debug, Clone, Serialize)]
pub struct VolumeEntryRule {
    pub rule: EntryRuleKind,
    pub description: String,
    pub threshold: f64,
    pub priority: RulePriority,
    pub timeframe_adjustment: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitRuleKind {
    VolumeExhaustionExit,
    NegativeDivergenceExit,
    ImmediateFullExit,
    ClimacticVolumeExit,
    StandardVolumeExit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitAction {
    PartialExitHalf,
    ImmediateExitThreeQuarters,
    FullExitImmediately,
    StagedExitOverTime,
    MonitorVolumePatterns,
}

#[derive(Debug, Clone, Serialize)]
pub struct VolumeExitRule {
    pub rule: ExitRuleKind,
    pub description: &'static str,
    pub threshold: f64,
    pub priority: RulePriority,
    pub action: ExitAction,
}

#[derive(Debug, Clone, Serialize)]
pub struct VolumeMonitoringRules {
    pub pattern: VolumePattern,
    pub key_indicators: Vec<String>,
    pub warning_signs: Vec<&'static str>,
    pub confirmation_signals: Vec<&'static str>,
}

/// Volume thresholds tighten as the frame shortens; monthly signals need
/// less relative volume than one-minute noise.
pub fn timeframe_volume_adjustment(timeframe: Timeframe) -> f64 {
    match timeframe {
        Timeframe::Monthly => 0.8,
        Timeframe::Weekly => 0.9,
        Timeframe::Daily => 1.0,
        Timeframe::FourHour => 1.1,
        Timeframe::OneHour => 1.2,
        Timeframe::FifteenMin => 1.3,
        Timeframe::FiveMin => 1.4,
        Timeframe::OneMin => 1.5,
    }
}

fn entry_rule(profile: &SectionVolumeProfile, timeframe: Timeframe) -> VolumeEntryRule {
    let adjustment = timeframe_volume_adjustment(timeframe);
    match profile.entry_signal {
        EntrySignal::StrongVolumeConfirmation => VolumeEntryRule {
            rule: EntryRuleKind::VolumeBreakoutConfirmation,
            description: format!(
                "Entry requires volume {}x above average",
                profile.entry_threshold()
            ),
            threshold: profile.entry_threshold(),
            priority: RulePriority::Critical,
            timeframe_adjustment: adjustment,
        },
        EntrySignal::VolumeIncreaseOnBreakout => VolumeEntryRule {
            rule: EntryRuleKind::GradualVolumeIncrease,
            description: format!(
                "Entry on volume increase above {}x average",
                profile.entry_threshold()
            ),
            threshold: profile.entry_threshold(),
            priority: RulePriority::High,
            timeframe_adjustment: adjustment,
        },
        EntrySignal::LowVolumeRallyFailure => VolumeEntryRule {
            rule: EntryRuleKind::LowVolumeFailure,
            description: format!(
                "Enter on rally failure with volume below {}x average",
                profile.entry_threshold()
            ),
            threshold: profile.entry_threshold(),
            priority: RulePriority::High,
            timeframe_adjustment: adjustment,
        },
        EntrySignal::ClimacticVolumeReversal => VolumeEntryRule {
            rule: EntryRuleKind::ClimacticReversal,
            description: format!(
                "Enter after climactic volume above {}x average",
                profile.thresholds[1].ratio
            ),
            threshold: profile.thresholds[1].ratio,
            priority: RulePriority::Critical,
            timeframe_adjustment: adjustment,
        },
        EntrySignal::AvoidEntries => VolumeEntryRule {
            rule: EntryRuleKind::AvoidAllEntries,
            description: "Volume divergence signals avoid all new entries".to_string(),
            threshold: 0.0,
            priority: RulePriority::Critical,
            timeframe_adjustment: 1.0,
        },
        EntrySignal::VolumeConfirmationRequired => VolumeEntryRule {
            rule: EntryRuleKind::StandardVolumeConfirmation,
            description: "Entry requires above-average volume confirmation".to_string(),
            threshold: 1.2,
            priority: RulePriority::Medium,
            timeframe_adjustment: adjustment,
        },
    }
}

fn exit_rule(profile: &SectionVolumeProfile) -> VolumeExitRule {
    match profile.exit_signal {
        ExitSignal::VolumeExhaustion => VolumeExitRule {
            rule: ExitRuleKind::VolumeExhaustionExit,
            description: "Exit when volume drops below 50% of breakout volume",
            threshold: 0.5,
            priority: RulePriority::High,
            action: ExitAction::PartialExitHalf,
        },
        ExitSignal::NegativeDivergence => VolumeExitRule {
            rule: ExitRuleKind::NegativeDivergenceExit,
            description: "Exit on price advance with declining volume",
            threshold: profile.entry_threshold(),
            priority: RulePriority::Critical,
            action: ExitAction::ImmediateExitThreeQuarters,
        },
        ExitSignal::ImmediateExit => VolumeExitRule {
            rule: ExitRuleKind::ImmediateFullExit,
            description: "Volume divergence requires immediate full exit",
            threshold: 0.0,
            priority: RulePriority::Critical,
            action: ExitAction::FullExitImmediately,
        },
        ExitSignal::VolumeClimax => VolumeExitRule {
            rule: ExitRuleKind::ClimacticVolumeExit,
            description: "Exit on climactic volume spike (trend exhaustion)",
            threshold: 2.0,
            priority: RulePriority::High,
            action: ExitAction::StagedExitOverTime,
        },
        ExitSignal::VolumeDivergenceWarning
        | ExitSignal::VolumeIncreaseOnDecline
        | ExitSignal::ExhaustionReversal => VolumeExitRule {
            rule: ExitRuleKind::StandardVolumeExit,
            description: "Monitor for volume-based exit signals",
            threshold: 1.0,
            priority: RulePriority::Medium,
            action: ExitAction::MonitorVolumePatterns,
        },
    }
}

fn monitoring_rules(profile: &SectionVolumeProfile) -> VolumeMonitoringRules {
    let mut warning_signs = Vec::new();
    if profile.pattern == VolumePattern::VolumeDivergence
        || profile.tendency == VolumeTendency::NegativeDivergence
    {
        warning_signs.push("Price/volume divergence indicates trend weakness");
    }
    if matches!(
        profile.tendency,
        VolumeTendency::Climactic | VolumeTendency::ClimacticSelling
    ) {
        warning_signs.push("Climactic volume may signal trend exhaustion");
    }
    if profile.tendency == VolumeTendency::Weakening {
        warning_signs.push("Weakening volume trend reduces trade reliability");
    }

    let mut confirmation_signals = Vec::new();
    if profile.reliability == Reliability::VeryHigh {
        confirmation_signals.push("Very high reliability pattern - strong volume confirmation");
    }
    if profile.pattern == VolumePattern::StrongBreakoutVolume {
        confirmation_signals.push("Breakout volume confirms trend continuation");
    }
    if profile.tendency == VolumeTendency::Strong {
        confirmation_signals.push("Strong volume trend supports trade direction");
    }

    VolumeMonitoringRules {
        pattern: profile.pattern,
        key_indicators: vec![
            format!("Volume tendency: {:?}", profile.tendency),
            format!("Reliability: {:?}", profile.reliability),
            format!("Pattern type: {:?}", profile.pattern),
        ],
        warning_signs,
        confirmation_signals,
    }
}

/// Complete volume rule pack attached to generated opportunities.
#[derive(Debug, Clone, Serialize)]
pub struct VolumeRulePack {
    pub pattern: VolumePattern,
    pub tendency: VolumeTendency,
    pub reliability: Reliability,
    pub entry: VolumeEntryRule,
    pub exit: VolumeExitRule,
    pub monitoring: VolumeMonitoringRules,
}

pub fn volume_rules(section: SectionTag, timeframe: Timeframe) -> VolumeRulePack {
    let profile = section_profile(section);
    VolumeRulePack {
        pattern: profile.pattern,
        tendency: profile.tendency,
        reliability: profile.reliability,
        entry: entry_rule(&profile, timeframe),
        exit: exit_rule(&profile),
        monitoring: monitoring_rules(&profile),
    }
}

/// Signal raised when a section's volume behaves as Gann expects, or
/// fails to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionVolumeSignal {
    Bull1Confirmed,
    Bull2BreakoutConfirmed,
    Bull3Exhaustion,
    Bull3Strong,
    Bull4Divergence,
    BearAConfirmed,
    BearRallyWeak,
    BearSellingContinues,
    BearClimacticSelling,
    BearExhaustion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeTrendDir {
    Increasing,
    Decreasing,
}

/// Section-against-volume verdict used by the campaign classifier.
#[derive(Debug, Clone, Serialize)]
pub struct SectionVolumeAssessment {
    pub confirmed: bool,
    pub signal: Option<SectionVolumeSignal>,
    pub trend: VolumeTrendDir,
    pub rules: Vec<&'static str>,
    pub warning: Option<&'static str>,
    pub current: f64,
    pub average: f64,
}

/// Check the latest volume against what the current section should print.
/// The trend compares the mean of the last three bars with the three
/// before them; with fewer than four bars the comparison degrades to
/// Decreasing.
pub fn assess_section_volume(
    volume: &[f64],
    section: SectionTag,
) -> Result<SectionVolumeAssessment, DomainError> {
    if volume.is_empty() {
        return Err(DomainError::InsufficientData {
            required: 1,
            got: 0,
        });
    }

    let current = volume[volume.len() - 1];
    let average = volume.iter().sum::<f64>() / volume.len() as f64;

    let recent_start = volume.len().saturating_sub(3);
    let earlier_start = volume.len().saturating_sub(6);
    let recent = &volume[recent_start..];
    let earlier = &volume[earlier_start..recent_start];
    let recent_avg = recent.iter().sum::<f64>() / recent.len() as f64;
    let trend = if !earlier.is_empty()
        && recent_avg > earlier.iter().sum::<f64>() / earlier.len() as f64
    {
        VolumeTrendDir::Increasing
    } else {
        VolumeTrendDir::Decreasing
    };

    let mut out = SectionVolumeAssessment {
        confirmed: false,
        signal: None,
        trend,
        rules: Vec::new(),
        warning: None,
        current,
        average,
    };

    match section {
        SectionTag::Bull1 => {
            if trend == VolumeTrendDir::Increasing {
                out.confirmed = true;
                out.signal = Some(SectionVolumeSignal::Bull1Confirmed);
                out.rules
                    .push("Volume increasing on 1st section advance - BULLISH CONFIRMATION");
            } else {
                out.warning = Some("Volume should increase in 1st section advance");
            }
        }
        SectionTag::Bull2 => {
            if current > average * 1.5 {
                out.confirmed = true;
                out.signal = Some(SectionVolumeSignal::Bull2BreakoutConfirmed);
                out.rules
                    .push("Strong volume on 2nd section breakout - MOST RELIABLE SIGNAL");
            } else {
                out.warning = Some("Weak volume on 2nd section breakout - caution advised");
            }
        }
        SectionTag::Bull3 => {
            if trend == VolumeTrendDir::Decreasing {
                out.signal = Some(SectionVolumeSignal::Bull3Exhaustion);
                out.rules
                    .push("Decreasing volume in 3rd section - WATCH FOR COMPLETION");
                out.warning = Some("Volume exhaustion may signal campaign end approaching");
            } else {
                out.confirmed = true;
                out.signal = Some(SectionVolumeSignal::Bull3Strong);
            }
        }
        SectionTag::Bull4 => {
            if trend == VolumeTrendDir::Decreasing || current < average * 0.7 {
                out.confirmed = true;
                out.signal = Some(SectionVolumeSignal::Bull4Divergence);
                out.rules.push("Weak volume in 4th section - REVERSAL SIGNAL");
            } else {
                out.warning = Some("Strong volume in 4th section - may extend further");
            }
        }
        SectionTag::BearA => {
            if current > average * 1.8 {
                out.confirmed = true;
                out.signal = Some(SectionVolumeSignal::BearAConfirmed);
                out.rules
                    .push("Heavy selling volume on trend break - BEAR MARKET CONFIRMED");
            } else {
                out.warning = Some("Light volume on break - may be false breakdown");
            }
        }
        SectionTag::BearSecondaryRally => {
            if current < average * 0.8 {
                out.confirmed = true;
                out.signal = Some(SectionVolumeSignal::BearRallyWeak);
                out.rules
                    .push("Light volume on bear rally - BEARISH CONFIRMATION");
            } else {
                out.warning = Some("Strong volume on bear rally - may be reversal attempt");
            }
        }
        SectionTag::BearRetest | SectionTag::BearB => {
            if trend == VolumeTrendDir::Decreasing {
                out.signal = Some(SectionVolumeSignal::BearSellingContinues);
                out.rules.push("Continued selling with decreasing intensity");
            }
        }
        SectionTag::BearCounterRally | SectionTag::BearC => {
            if current > average * 2.0 {
                out.confirmed = true;
                out.signal = Some(SectionVolumeSignal::BearClimacticSelling);
                out.rules.push("Climactic selling volume - REVERSAL IMMINENT");
            } else if trend == VolumeTrendDir::Decreasing {
                out.signal = Some(SectionVolumeSignal::BearExhaustion);
                out.rules
                    .push("Volume exhaustion in final decline - REVERSAL SIGNAL");
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spike_with_up_close_confirms() {
        let closes = [100.0, 105.0];
        let volume = [10.0, 10.0, 10.0, 10.0, 40.0];
        let read = read_volume(&closes, &volume, 20).unwrap();
        assert!(read.spike);
        assert_eq!(read.price_move, PriceMove::Up);
        assert_eq!(read.signal, VolumeSignal::StrongUpConfirmed);
    }

    #[test]
    fn test_directional_move_without_spike_is_divergence() {
        let closes = [100.0, 95.0];
        let volume = [10.0, 10.0, 10.0, 10.0, 9.0];
        let read = read_volume(&closes, &volume, 20).unwrap();
        assert!(!read.spike);
        assert_eq!(read.signal, VolumeSignal::Divergence);
    }

    #[test]
    fn test_flat_close_is_neutral_even_on_spike() {
        let closes = [100.0, 100.0];
        let volume = [10.0, 10.0, 50.0];
        let read = read_volume(&closes, &volume, 20).unwrap();
        assert!(read.spike);
        assert_eq!(read.signal, VolumeSignal::Neutral);
    }

    #[test]
    fn test_read_requires_volume() {
        assert!(matches!(
            read_volume(&[100.0], &[], 20),
            Err(DomainError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_reliability_collapses_onto_strength() {
        assert_eq!(Reliability::VeryHigh.as_strength(), VolumeStrength::Strong);
        assert_eq!(Reliability::Medium.as_strength(), VolumeStrength::Medium);
        assert_eq!(Reliability::Low.as_strength(), VolumeStrength::Weak);
    }

    #[test]
    fn test_markup_expects_strong_breakout_volume() {
        let profile = section_profile(SectionTag::Bull2);
        assert_eq!(profile.pattern, VolumePattern::StrongBreakoutVolume);
        assert_eq!(profile.entry_threshold(), 1.8);
        assert_eq!(profile.reliability, Reliability::VeryHigh);
    }

    #[test]
    fn test_entry_rules_scale_with_timeframe() {
        let monthly = volume_rules(SectionTag::Bull2, Timeframe::Monthly);
        let one_min = volume_rules(SectionTag::Bull2, Timeframe::OneMin);
        assert_eq!(monthly.entry.timeframe_adjustment, 0.8);
        assert_eq!(one_min.entry.timeframe_adjustment, 1.5);
        assert_eq!(monthly.entry.rule, EntryRuleKind::VolumeBreakoutConfirmation);
        assert_eq!(monthly.entry.priority, RulePriority::Critical);
    }

    #[test]
    fn test_fourth_section_blocks_entries_and_exits_hard() {
        let pack = volume_rules(SectionTag::Bull4, Timeframe::Daily);
        assert_eq!(pack.entry.rule, EntryRuleKind::AvoidAllEntries);
        assert_eq!(pack.exit.rule, ExitRuleKind::ImmediateFullExit);
        assert_eq!(pack.exit.action, ExitAction::FullExitImmediately);
        assert!(pack
            .monitoring
            .warning_signs
            .contains(&"Price/volume divergence indicates trend weakness"));
    }

    #[test]
    fn test_capitulation_monitoring_flags_exhaustion() {
        let pack = volume_rules(SectionTag::BearC, Timeframe::Daily);
        assert_eq!(pack.entry.rule, EntryRuleKind::ClimacticReversal);
        assert_eq!(pack.entry.threshold, 3.0);
        assert!(pack
            .monitoring
            .warning_signs
            .contains(&"Climactic volume may signal trend exhaustion"));
    }

    #[test]
    fn test_bull2_breakout_assessment() {
        // Current at 2x the series average confirms the markup section
        let volume = [10.0, 10.0, 10.0, 10.0, 10.0, 25.0];
        let verdict = assess_section_volume(&volume, SectionTag::Bull2).unwrap();
        assert!(verdict.confirmed);
        assert_eq!(verdict.signal, Some(SectionVolumeSignal::Bull2BreakoutConfirmed));

        let weak = [10.0, 10.0, 10.0, 10.0, 10.0, 11.0];
        let verdict = assess_section_volume(&weak, SectionTag::Bull2).unwrap();
        assert!(!verdict.confirmed);
        assert!(verdict.warning.is_some());
    }

    #[test]
    fn test_bull4_divergence_on_fading_volume() {
        let volume = [20.0, 22.0, 24.0, 12.0, 10.0, 8.0];
        let verdict = assess_section_volume(&volume, SectionTag::Bull4).unwrap();
        assert!(verdict.confirmed);
        assert_eq!(verdict.signal, Some(SectionVolumeSignal::Bull4Divergence));
        assert_eq!(verdict.trend, VolumeTrendDir::Decreasing);
    }

    #[test]
    fn test_bear_climax_needs_double_average() {
        let climactic = [10.0, 10.0, 10.0, 10.0, 10.0, 30.0];
        let verdict = assess_section_volume(&climactic, SectionTag::BearC).unwrap();
        assert!(verdict.confirmed);
        assert_eq!(verdict.signal, Some(SectionVolumeSignal::BearClimacticSelling));

        let fading = [20.0, 20.0, 20.0, 10.0, 9.0, 8.0];
        let verdict = assess_section_volume(&fading, SectionTag::BearC).unwrap();
        assert!(!verdict.confirmed);
        assert_eq!(verdict.signal, Some(SectionVolumeSignal::BearExhaustion));
    }

    #[test]
    fn test_section_expectation_covers_neutral() {
        let rule = section_expectation(None);
        assert_eq!(rule.expected, VolumeExpectation::Neutral);
        assert_eq!(rule.strength, VolumeStrength::Medium);
        let markup = section_expectation(Some(SectionTag::Bull2));
        assert_eq!(markup.strength, VolumeStrength::Strong);
    }
}
