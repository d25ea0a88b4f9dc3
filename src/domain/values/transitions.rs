use crate::domain::values::breaks::required_move_percent;
use crate::domain::values::campaign::SectionTag;
use crate::domain::values::timeframe::Timeframe;
use crate::domain::values::validation::Grade;
use serde::{Deserialize, Serialize};

/// What price must do for the transition to count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceRequirement {
    #[serde(rename = "NEW_HIGH_ABOVE_SECTION_1")]
    NewHighAboveSection1,
    #[serde(rename = "NEW_HIGH_ABOVE_SECTION_2")]
    NewHighAboveSection2,
    #[serde(rename = "MARGINAL_NEW_HIGH_OR_DOUBLE_TOP")]
    MarginalNewHighOrDoubleTop,
    #[serde(rename = "BOUNCE_FROM_SECTION_A_LOW")]
    BounceFromSectionALow,
    #[serde(rename = "RETEST_SECTION_A_LOW")]
    RetestSectionALow,
    #[serde(rename = "BREAK_BELOW_SECTION_A_LOW")]
    BreakBelowSectionALow,
    #[serde(rename = "OVERSOLD_BOUNCE_FROM_SECTION_B")]
    OversoldBounceFromSectionB,
    #[serde(rename = "FINAL_LOW_BELOW_SECTION_B")]
    FinalLowBelowSectionB,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolumeRequirement {
    #[serde(rename = "VOLUME_INCREASE_50_PERCENT")]
    Increase50Percent,
    #[serde(rename = "VOLUME_MAINTAINED_OR_DECREASING")]
    MaintainedOrDecreasing,
    #[serde(rename = "VOLUME_DIVERGENCE_REQUIRED")]
    DivergenceRequired,
    #[serde(rename = "VOLUME_DECREASE_FROM_SECTION_A")]
    DecreaseFromSectionA,
    #[serde(rename = "VOLUME_NORMAL_TO_SLIGHTLY_HIGHER")]
    NormalToSlightlyHigher,
    #[serde(rename = "VOLUME_INCREASE_SIGNIFICANT")]
    IncreaseSignificant,
    #[serde(rename = "VOLUME_DECREASE_ON_BOUNCE")]
    DecreaseOnBounce,
    #[serde(rename = "CLIMACTIC_VOLUME_SPIKE")]
    ClimacticSpike,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeRequirement {
    #[serde(rename = "WITHIN_EXPECTED_TIME_WINDOW")]
    WithinExpectedWindow,
    #[serde(rename = "PROPORTIONAL_TO_SECTION_2")]
    ProportionalToSection2,
    #[serde(rename = "SHORTER_THAN_SECTION_3")]
    ShorterThanSection3,
    #[serde(rename = "SHORTER_THAN_SECTION_A")]
    ShorterThanSectionA,
    #[serde(rename = "RETEST_WITHIN_TIME_WINDOW")]
    RetestWithinWindow,
    #[serde(rename = "BREAKDOWN_CONFIRMATION_REQUIRED")]
    BreakdownConfirmation,
    #[serde(rename = "BRIEF_COUNTER_TREND_MOVE")]
    BriefCounterTrend,
    #[serde(rename = "CAPITULATION_PHASE")]
    CapitulationPhase,
}

/// Rule governing one section-to-section handoff.
#[derive(Debug, Clone, Serialize)]
pub struct TransitionRule {
    pub from: SectionTag,
    pub to: SectionTag,
    pub price_requirement: PriceRequirement,
    pub volume_requirement: VolumeRequirement,
    pub time_requirement: TimeRequirement,
    pub base_periods: f64,
    pub success_probability: f64,
    pub reversal_watch: bool,
    pub failure_signals: [&'static str; 3],
}

pub fn transition_rule(from: SectionTag, to: SectionTag) -> Option<TransitionRule> {
    let (price, volume, time, base_periods, probability, watch, signals) = match (from, to) {
        (SectionTag::Bull1, SectionTag::Bull2) => (
            PriceRequirement::NewHighAboveSection1,
            VolumeRequirement::Increase50Percent,
            TimeRequirement::WithinExpectedWindow,
            3.0,
            0.85,
            false,
            [
                "Volume fails to increase",
                "New high not sustained",
                "Time window exceeded",
            ],
        ),
        (SectionTag::Bull2, SectionTag::Bull3) => (
            PriceRequirement::NewHighAboveSection2,
            VolumeRequirement::MaintainedOrDecreasing,
            TimeRequirement::ProportionalToSection2,
            2.0,
            0.70,
            false,
            [
                "Volume increases on new high",
                "No new high achieved",
                "Time relationship violated",
            ],
        ),
        (SectionTag::Bull3, SectionTag::Bull4) => (
            PriceRequirement::MarginalNewHighOrDoubleTop,
            VolumeRequirement::DivergenceRequired,
            TimeRequirement::ShorterThanSection3,
            1.0,
            0.90,
            true,
            [
                "Strong volume on new high",
                "Significant new high",
                "Extended time duration",
            ],
        ),
        (SectionTag::BearA, SectionTag::BearSecondaryRally) => (
            PriceRequirement::BounceFromSectionALow,
            VolumeRequirement::DecreaseFromSectionA,
            TimeRequirement::ShorterThanSectionA,
            2.0,
            0.75,
            false,
            [
                "No bounce occurs",
                "Volume remains high",
                "Extended decline continues",
            ],
        ),
        (SectionTag::BearSecondaryRally, SectionTag::BearRetest) => (
            PriceRequirement::RetestSectionALow,
            VolumeRequirement::NormalToSlightlyHigher,
            TimeRequirement::RetestWithinWindow,
            2.0,
            0.80,
            false,
            [
                "No retest occurs",
                "Retest on very high volume",
                "Retest too early or late",
            ],
        ),
        (SectionTag::BearRetest, SectionTag::BearB) => (
            PriceRequirement::BreakBelowSectionALow,
            VolumeRequirement::IncreaseSignificant,
            TimeRequirement::BreakdownConfirmation,
            3.0,
            0.85,
            false,
            [
                "Breakdown fails",
                "Volume insufficient",
                "Quick reversal above breakdown",
            ],
        ),
        (SectionTag::BearB, SectionTag::BearCounterRally) => (
            PriceRequirement::OversoldBounceFromSectionB,
            VolumeRequirement::DecreaseOnBounce,
            TimeRequirement::BriefCounterTrend,
            1.0,
            0.70,
            false,
            [
                "No bounce occurs",
                "High volume bounce",
                "Extended counter-trend move",
            ],
        ),
        (SectionTag::BearCounterRally, SectionTag::BearC) => (
            PriceRequirement::FinalLowBelowSectionB,
            VolumeRequirement::ClimacticSpike,
            TimeRequirement::CapitulationPhase,
            2.0,
            0.95,
            true,
            [
                "Volume not climactic",
                "No new low",
                "Gradual decline instead of spike",
            ],
        ),
        _ => return None,
    };

    Some(TransitionRule {
        from,
        to,
        price_requirement: price,
        volume_requirement: volume,
        time_requirement: time,
        base_periods,
        success_probability: probability,
        reversal_watch: watch,
        failure_signals: signals,
    })
}

pub fn expected_behavior(from: SectionTag, to: SectionTag) -> &'static str {
    match (from, to) {
        (SectionTag::Bull1, SectionTag::Bull2) => {
            "Section 2 should show strong momentum with increasing volume - most reliable bull phase"
        }
        (SectionTag::Bull2, SectionTag::Bull3) => {
            "Section 3 should show distribution signs with decreasing volume on advances"
        }
        (SectionTag::Bull3, SectionTag::Bull4) => {
            "Section 4 should show clear volume divergence and trend exhaustion signals"
        }
        (SectionTag::BearA, SectionTag::BearSecondaryRally) => {
            "Section a should be a weak rally with declining volume"
        }
        (SectionTag::BearSecondaryRally, SectionTag::BearRetest) => {
            "Section b should retest lows with normal volume"
        }
        (SectionTag::BearRetest, SectionTag::BearB) => {
            "Section B should break down with significant volume increase"
        }
        (SectionTag::BearB, SectionTag::BearCounterRally) => {
            "Section c should be a brief oversold bounce with weak volume"
        }
        (SectionTag::BearCounterRally, SectionTag::BearC) => {
            "Section C should show climactic selling with exhaustion signals"
        }
        _ => "Transition behavior analysis not available",
    }
}

/// Confirmation span in days for a number of base periods on a frame.
pub fn confirmation_days(timeframe: Timeframe, base_periods: f64) -> f64 {
    base_periods * timeframe.confirmation_day_multiplier()
}

/// Observed market facts a transition is judged against. All fields are
/// optional; a requirement with no evidence passes leniently and says so.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TransitionEvidence {
    pub current_price: Option<f64>,
    /// Extreme of the section being left: its high for bull advances,
    /// its low for bear declines.
    pub prior_section_extreme: Option<f64>,
    /// Current volume over its recent average.
    pub volume_ratio: Option<f64>,
    /// Days spent in the forming section.
    pub elapsed_days: Option<f64>,
    /// Days the prior section ran.
    pub prior_section_days: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequirementCheck {
    pub valid: bool,
    /// False when evidence was missing and the check passed leniently.
    pub evaluated: bool,
    pub details: String,
}

impl RequirementCheck {
    fn evaluated(valid: bool, met: &str, unmet: &str) -> RequirementCheck {
        RequirementCheck {
            valid,
            evaluated: true,
            details: if valid { met.to_string() } else { unmet.to_string() },
        }
    }

    fn lenient(kind: &str) -> RequirementCheck {
        RequirementCheck {
            valid: true,
            evaluated: false,
            details: format!("{kind} evidence unavailable - requirement not enforced"),
        }
    }
}

fn check_price(
    requirement: PriceRequirement,
    evidence: &TransitionEvidence,
    timeframe: Timeframe,
) -> RequirementCheck {
    let (current, extreme) = match (evidence.current_price, evidence.prior_section_extreme) {
        (Some(current), Some(extreme)) => (current, extreme),
        _ => return RequirementCheck::lenient("Price"),
    };
    let threshold = required_move_percent(timeframe) / 100.0;

    match requirement {
        PriceRequirement::NewHighAboveSection1 => RequirementCheck::evaluated(
            current >= extreme * (1.0 + threshold),
            "Price requirement met for section 1 to 2 transition",
            "No confirmed new high above section 1",
        ),
        PriceRequirement::NewHighAboveSection2 => RequirementCheck::evaluated(
            current >= extreme * (1.0 + threshold),
            "Price requirement met for section 2 to 3 transition",
            "No confirmed new high above section 2",
        ),
        // At or marginally above the old top, but short of a full break
        PriceRequirement::MarginalNewHighOrDoubleTop => RequirementCheck::evaluated(
            current >= extreme * 0.99 && current < extreme * (1.0 + threshold),
            "Marginal new high indicates distribution phase",
            "Neither marginal new high nor double top present",
        ),
        PriceRequirement::BounceFromSectionALow => RequirementCheck::evaluated(
            current > extreme,
            "Bounce from section A low confirmed",
            "No bounce from section A low",
        ),
        PriceRequirement::RetestSectionALow => RequirementCheck::evaluated(
            (current - extreme).abs() / extreme <= timeframe.tolerance(),
            "Retest of section A low completed",
            "Price not retesting section A low",
        ),
        PriceRequirement::BreakBelowSectionALow => RequirementCheck::evaluated(
            current <= extreme * (1.0 - threshold),
            "Breakdown below section A low confirmed",
            "Price holding above section A low",
        ),
        PriceRequirement::OversoldBounceFromSectionB => RequirementCheck::evaluated(
            current > extreme,
            "Oversold bounce from section B identified",
            "No bounce from section B low",
        ),
        PriceRequirement::FinalLowBelowSectionB => RequirementCheck::evaluated(
            current < extreme,
            "Final low below section B achieved",
            "No new low below section B",
        ),
    }
}

fn check_volume(requirement: VolumeRequirement, evidence: &TransitionEvidence) -> RequirementCheck {
    let ratio = match evidence.volume_ratio {
        Some(ratio) => ratio,
        None => return RequirementCheck::lenient("Volume"),
    };

    match requirement {
        VolumeRequirement::Increase50Percent => RequirementCheck::evaluated(
            ratio >= 1.5,
            "Volume increased 50% above average",
            "Volume fails the 50% increase requirement",
        ),
        VolumeRequirement::MaintainedOrDecreasing => RequirementCheck::evaluated(
            ratio <= 1.2,
            "Volume maintained or decreasing as expected",
            "Volume expanding against expectations",
        ),
        VolumeRequirement::DivergenceRequired => RequirementCheck::evaluated(
            ratio < 1.0,
            "Volume divergence identified - bearish signal",
            "No volume divergence on new high",
        ),
        VolumeRequirement::DecreaseFromSectionA => RequirementCheck::evaluated(
            ratio < 1.0,
            "Volume decreased from section A levels",
            "Volume still at section A levels",
        ),
        VolumeRequirement::NormalToSlightlyHigher => RequirementCheck::evaluated(
            (0.8..=1.5).contains(&ratio),
            "Volume at normal to slightly higher levels",
            "Volume outside the normal band",
        ),
        VolumeRequirement::IncreaseSignificant => RequirementCheck::evaluated(
            ratio >= 2.0,
            "Significant volume increase on breakdown",
            "Breakdown volume insufficient",
        ),
        VolumeRequirement::DecreaseOnBounce => RequirementCheck::evaluated(
            ratio < 1.0,
            "Volume decreased on counter-trend bounce",
            "Bounce volume too high",
        ),
        VolumeRequirement::ClimacticSpike => RequirementCheck::evaluated(
            ratio >= 2.5,
            "Climactic volume spike indicates capitulation",
            "Volume not climactic",
        ),
    }
}

fn check_time(
    requirement: TimeRequirement,
    evidence: &TransitionEvidence,
    window_days: f64,
) -> RequirementCheck {
    let elapsed = match evidence.elapsed_days {
        Some(elapsed) => elapsed,
        None => return RequirementCheck::lenient("Time"),
    };

    // Requirements judged against the prior section need its duration too.
    let against_prior = |valid: fn(f64, f64) -> bool, met: &str, unmet: &str| match evidence
        .prior_section_days
    {
        Some(prior) => RequirementCheck::evaluated(valid(elapsed, prior), met, unmet),
        None => RequirementCheck::lenient("Prior-section time"),
    };

    match requirement {
        TimeRequirement::WithinExpectedWindow => RequirementCheck::evaluated(
            elapsed <= window_days,
            "Transition occurred within expected time window",
            "Time window exceeded",
        ),
        TimeRequirement::ProportionalToSection2 => against_prior(
            |elapsed, prior| elapsed >= prior * 0.5 && elapsed <= prior * 2.0,
            "Time duration proportional to section 2",
            "Duration out of proportion to section 2",
        ),
        TimeRequirement::ShorterThanSection3 => against_prior(
            |elapsed, prior| elapsed < prior,
            "Duration shorter than section 3 as expected",
            "Section running longer than section 3",
        ),
        TimeRequirement::ShorterThanSectionA => against_prior(
            |elapsed, prior| elapsed < prior,
            "Duration shorter than section A",
            "Rally outlasting section A",
        ),
        TimeRequirement::RetestWithinWindow => RequirementCheck::evaluated(
            elapsed <= window_days,
            "Retest occurred within acceptable time window",
            "Retest outside the time window",
        ),
        TimeRequirement::BreakdownConfirmation => RequirementCheck::evaluated(
            elapsed >= window_days,
            "Breakdown confirmation period satisfied",
            "Breakdown confirmation period not yet complete",
        ),
        TimeRequirement::BriefCounterTrend => against_prior(
            |elapsed, prior| elapsed < prior,
            "Counter-trend move was brief as expected",
            "Counter-trend move overextended",
        ),
        TimeRequirement::CapitulationPhase => RequirementCheck::evaluated(
            elapsed <= window_days,
            "Capitulation phase timing confirmed",
            "Decline too gradual for capitulation",
        ),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TransitionAssessment {
    pub from: SectionTag,
    pub to: SectionTag,
    pub valid: bool,
    pub probability: f64,
    pub grade: Grade,
    pub price: RequirementCheck,
    pub volume: RequirementCheck,
    pub time: RequirementCheck,
    pub confirmation_days: f64,
    pub reversal_watch: bool,
    pub failure_signals: Vec<&'static str>,
    pub expected_behavior: &'static str,
    pub reason: Option<&'static str>,
}

/// Judge whether a section handoff is behaving the way Gann's model says
/// it should. Failing any evaluated requirement cuts the success
/// probability to 30% of base.
pub fn validate_transition(
    from: SectionTag,
    to: SectionTag,
    evidence: &TransitionEvidence,
    timeframe: Timeframe,
) -> TransitionAssessment {
    let rule = match transition_rule(from, to) {
        Some(rule) => rule,
        None => {
            let unevaluated = RequirementCheck {
                valid: false,
                evaluated: false,
                details: "Invalid transition pattern".to_string(),
            };
            return TransitionAssessment {
                from,
                to,
                valid: false,
                probability: 0.0,
                grade: Grade::F,
                price: unevaluated.clone(),
                volume: unevaluated.clone(),
                time: unevaluated,
                confirmation_days: 0.0,
                reversal_watch: false,
                failure_signals: Vec::new(),
                expected_behavior: expected_behavior(from, to),
                reason: Some("Invalid transition pattern"),
            };
        }
    };

    let window = confirmation_days(timeframe, rule.base_periods);
    let price = check_price(rule.price_requirement, evidence, timeframe);
    let volume = check_volume(rule.volume_requirement, evidence);
    let time = check_time(rule.time_requirement, evidence, window);

    let valid = price.valid && volume.valid && time.valid;
    let probability = if valid {
        rule.success_probability
    } else {
        rule.success_probability * 0.3
    };

    TransitionAssessment {
        from,
        to,
        valid,
        probability,
        grade: Grade::from_transition_probability(probability),
        price,
        volume,
        time,
        confirmation_days: window,
        reversal_watch: rule.reversal_watch,
        failure_signals: rule.failure_signals.to_vec(),
        expected_behavior: expected_behavior(from, to),
        reason: None,
    }
}
