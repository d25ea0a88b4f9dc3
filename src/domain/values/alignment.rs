use crate::domain::error::DomainError;
use crate::domain::values::campaign::StructuralBias;
use crate::domain::values::structure::CampaignClassification;
use crate::domain::values::timeframe::Timeframe;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecommendedAction {
    LongBias,
    ShortBias,
    WaitForClarity,
}

/// A terminal section (bull 4 or bear C) somewhere in the stack puts the
/// whole market on reversal watch.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReversalSignal {
    pub timeframe: Timeframe,
    pub weight: u8,
    /// Reversal probability reported by the flagging frame, 0-100.
    pub confidence: f64,
}

/// Weighted agreement across however many frames were classified.
#[derive(Debug, Clone, Serialize)]
pub struct AlignmentRead {
    /// 0-100: weighted share of frames leaning bullish.
    pub overall_alignment: u32,
    pub bullish_timeframes: usize,
    pub bearish_timeframes: usize,
    pub neutral_timeframes: usize,
    pub dominant_trend: StructuralBias,
    pub recommended_action: RecommendedAction,
    /// Distance from the 50/50 line, doubled: 0 (split) to 100 (unanimous).
    pub confidence: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reversal_signal: Option<ReversalSignal>,
}

/// Weigh the structural bias of every classified frame into a single
/// read. Only frames actually present count toward the weighting; when
/// several frames sit in a terminal section, the heaviest one carries
/// the reversal signal.
pub fn align(
    classifications: &HashMap<Timeframe, CampaignClassification>,
) -> Result<AlignmentRead, DomainError> {
    if classifications.is_empty() {
        return Err(DomainError::InsufficientData {
            required: 1,
            got: 0,
        });
    }

    let mut total_weight = 0u32;
    let mut bullish_weight = 0u32;
    let mut bullish = 0usize;
    let mut bearish = 0usize;
    let mut neutral = 0usize;
    let mut reversal: Option<ReversalSignal> = None;

    for (timeframe, classification) in classifications {
        let weight = timeframe.weight();
        total_weight += u32::from(weight);

        match classification.structural_bias {
            StructuralBias::Bull => {
                bullish_weight += u32::from(weight);
                bullish += 1;
            }
            StructuralBias::Bear => bearish += 1,
            StructuralBias::Neutral => neutral += 1,
        }

        if classification.section.is_terminal()
            && reversal.map_or(true, |signal| weight > signal.weight)
        {
            reversal = Some(ReversalSignal {
                timeframe: *timeframe,
                weight,
                confidence: classification.reversal_probability,
            });
        }
    }

    let overall_alignment =
        ((bullish_weight as f64 / total_weight as f64) * 100.0).round() as u32;
    let (dominant_trend, recommended_action) = if overall_alignment > 70 {
        (StructuralBias::Bull, RecommendedAction::LongBias)
    } else if overall_alignment < 30 {
        (StructuralBias::Bear, RecommendedAction::ShortBias)
    } else {
        (StructuralBias::Neutral, RecommendedAction::WaitForClarity)
    };

    Ok(AlignmentRead {
        overall_alignment,
        bullish_timeframes: bullish,
        bearish_timeframes: bearish,
        neutral_timeframes: neutral,
        dominant_trend,
        recommended_action,
        confidence: overall_alignment.abs_diff(50) * 2,
        reversal_signal: reversal,
    })
}
