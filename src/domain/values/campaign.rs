use crate::domain::values::priority::ConfidenceLevel;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction of the campaign being analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignType {
    Bull,
    Bear,
}

impl fmt::Display for CampaignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CampaignType::Bull => write!(f, "bull"),
            CampaignType::Bear => write!(f, "bear"),
        }
    }
}

/// Structural bias derived from where price sits inside the campaign range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructuralBias {
    Bull,
    Bear,
    Neutral,
}

impl fmt::Display for StructuralBias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructuralBias::Bull => write!(f, "bull"),
            StructuralBias::Bear => write!(f, "bear"),
            StructuralBias::Neutral => write!(f, "neutral"),
        }
    }
}

impl FromStr for StructuralBias {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bull" | "bullish" => Ok(StructuralBias::Bull),
            "bear" | "bearish" => Ok(StructuralBias::Bear),
            "neutral" => Ok(StructuralBias::Neutral),
            _ => Err(format!("Unknown bias: {s}")),
        }
    }
}

/// Short-window trend read from the last 20 closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Bull,
    Bear,
    Sideways,
}

/// How complete the current campaign looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionSignal {
    Low,
    Medium,
    High,
}

/// Campaign section under Gann's sectional model. Bull campaigns run
/// through four numbered sections; bear campaigns alternate declines
/// (capital letters) with corrective rallies (lowercase letters).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionTag {
    #[serde(rename = "bull_1")]
    Bull1,
    #[serde(rename = "bull_2")]
    Bull2,
    #[serde(rename = "bull_3")]
    Bull3,
    #[serde(rename = "bull_4")]
    Bull4,
    #[serde(rename = "bear_A")]
    BearA,
    #[serde(rename = "bear_a")]
    BearSecondaryRally,
    #[serde(rename = "bear_b")]
    BearRetest,
    #[serde(rename = "bear_B")]
    BearB,
    #[serde(rename = "bear_c")]
    BearCounterRally,
    #[serde(rename = "bear_C")]
    BearC,
}

impl SectionTag {
    pub fn campaign_type(&self) -> CampaignType {
        match self {
            SectionTag::Bull1 | SectionTag::Bull2 | SectionTag::Bull3 | SectionTag::Bull4 => {
                CampaignType::Bull
            }
            _ => CampaignType::Bear,
        }
    }

    /// Single-character chart label. Bear labels are case-sensitive:
    /// capitals mark declines, lowercase the corrective rallies.
    pub fn label(&self) -> &'static str {
        match self {
            SectionTag::Bull1 => "1",
            SectionTag::Bull2 => "2",
            SectionTag::Bull3 => "3",
            SectionTag::Bull4 => "4",
            SectionTag::BearA => "A",
            SectionTag::BearSecondaryRally => "a",
            SectionTag::BearRetest => "b",
            SectionTag::BearB => "B",
            SectionTag::BearCounterRally => "c",
            SectionTag::BearC => "C",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SectionTag::Bull1 => "Accumulation",
            SectionTag::Bull2 => "Markup",
            SectionTag::Bull3 => "Distribution",
            SectionTag::Bull4 => "Decline",
            SectionTag::BearA => "Initial Decline",
            SectionTag::BearSecondaryRally => "Rally",
            SectionTag::BearRetest => "Retest",
            SectionTag::BearB => "Major Decline",
            SectionTag::BearCounterRally => "Counter Rally",
            SectionTag::BearC => "Final Decline",
        }
    }

    /// Default confidence in signals taken during this section.
    pub fn confidence(&self) -> ConfidenceLevel {
        match self {
            SectionTag::Bull1 | SectionTag::Bull2 => ConfidenceLevel::High,
            SectionTag::Bull3 => ConfidenceLevel::Medium,
            SectionTag::Bull4 => ConfidenceLevel::Low,
            SectionTag::BearA => ConfidenceLevel::Medium,
            SectionTag::BearSecondaryRally => ConfidenceLevel::Low,
            SectionTag::BearRetest => ConfidenceLevel::Medium,
            SectionTag::BearB => ConfidenceLevel::High,
            SectionTag::BearCounterRally | SectionTag::BearC => ConfidenceLevel::Low,
        }
    }

    /// How reliably trades work out when entered during this section.
    /// Section 2 of a bull campaign is the standout, the 4th section the
    /// worst; bear B (the major decline) is the strongest short.
    pub fn reliability(&self) -> f64 {
        match self {
            SectionTag::Bull1 => 0.7,
            SectionTag::Bull2 => 1.0,
            SectionTag::Bull3 => 0.6,
            SectionTag::Bull4 => 0.4,
            SectionTag::BearA => 0.8,
            SectionTag::BearSecondaryRally => 0.5,
            SectionTag::BearRetest => 0.6,
            SectionTag::BearB => 0.9,
            SectionTag::BearCounterRally => 0.6,
            SectionTag::BearC => 0.7,
        }
    }

    /// Position in campaign order, 1-based within the campaign type.
    pub fn ordinal(&self) -> u8 {
        match self {
            SectionTag::Bull1 => 1,
            SectionTag::Bull2 => 2,
            SectionTag::Bull3 => 3,
            SectionTag::Bull4 => 4,
            SectionTag::BearA => 1,
            SectionTag::BearSecondaryRally => 2,
            SectionTag::BearRetest => 3,
            SectionTag::BearB => 4,
            SectionTag::BearCounterRally => 5,
            SectionTag::BearC => 6,
        }
    }

    /// The section that normally precedes this one, if any.
    pub fn previous(&self) -> Option<SectionTag> {
        match self {
            SectionTag::Bull1 => None,
            SectionTag::Bull2 => Some(SectionTag::Bull1),
            SectionTag::Bull3 => Some(SectionTag::Bull2),
            SectionTag::Bull4 => Some(SectionTag::Bull3),
            SectionTag::BearA => None,
            SectionTag::BearSecondaryRally => Some(SectionTag::BearA),
            SectionTag::BearRetest => Some(SectionTag::BearSecondaryRally),
            SectionTag::BearB => Some(SectionTag::BearRetest),
            SectionTag::BearCounterRally => Some(SectionTag::BearB),
            SectionTag::BearC => Some(SectionTag::BearCounterRally),
        }
    }

    /// The section that normally follows this one, if any.
    pub fn next(&self) -> Option<SectionTag> {
        match self {
            SectionTag::Bull1 => Some(SectionTag::Bull2),
            SectionTag::Bull2 => Some(SectionTag::Bull3),
            SectionTag::Bull3 => Some(SectionTag::Bull4),
            SectionTag::Bull4 => None,
            SectionTag::BearA => Some(SectionTag::BearSecondaryRally),
            SectionTag::BearSecondaryRally => Some(SectionTag::BearRetest),
            SectionTag::BearRetest => Some(SectionTag::BearB),
            SectionTag::BearB => Some(SectionTag::BearCounterRally),
            SectionTag::BearCounterRally => Some(SectionTag::BearC),
            SectionTag::BearC => None,
        }
    }

    /// Terminal sections put the campaign on reversal watch.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SectionTag::Bull4 | SectionTag::BearC)
    }
}

impl fmt::Display for SectionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.campaign_type(), self.label())
    }
}

impl FromStr for SectionTag {
    type Err = String;

    // Bear labels are case-sensitive, so no lowercasing here.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bull_1" => Ok(SectionTag::Bull1),
            "bull_2" => Ok(SectionTag::Bull2),
            "bull_3" => Ok(SectionTag::Bull3),
            "bull_4" => Ok(SectionTag::Bull4),
            "bear_A" => Ok(SectionTag::BearA),
            "bear_a" => Ok(SectionTag::BearSecondaryRally),
            "bear_b" => Ok(SectionTag::BearRetest),
            "bear_B" => Ok(SectionTag::BearB),
            "bear_c" => Ok(SectionTag::BearCounterRally),
            "bear_C" => Ok(SectionTag::BearC),
            _ => Err(format!("Unknown section: {s}")),
        }
    }
}
