use crate::domain::error::DomainError;
use crate::domain::values::campaign::{
    CampaignType, CompletionSignal, SectionTag, StructuralBias, Trend,
};
use crate::domain::values::swing::find_swings;
use crate::domain::values::timeframe::Timeframe;
use crate::domain::values::volume::{
    assess_section_volume, SectionVolumeAssessment, SectionVolumeSignal,
};
use serde::Serialize;

/// Campaign-structure analysis needs at least this many candles.
pub const MIN_CANDLES: usize = 8;

const TREND_WINDOW: usize = 20;
const TREND_BAND: f64 = 0.03;
const SWING_LOOKBACK: usize = 5;

/// Where a market sits inside Gann's sectional campaign model.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignClassification {
    pub timeframe: Timeframe,
    pub campaign_type: CampaignType,
    pub section: SectionTag,
    /// Campaign completion expressed in eighths, e.g. "2/8".
    pub section_progress: &'static str,
    pub completion: CompletionSignal,
    /// 0-100. Only terminal sections start above zero; volume climax and
    /// divergence signals raise it further.
    pub reversal_probability: f64,
    pub structural_bias: StructuralBias,
    /// Rounded position in range, -100 (at the low) to +100 (at the high).
    pub bias_percentage: i32,
    pub pattern_confidence: f64,
    pub trend: Trend,
    pub next_expected_move: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<SectionVolumeAssessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<&'static str>,
}

struct SectionMeta {
    progress: &'static str,
    completion: CompletionSignal,
    reversal_probability: f64,
    next_move: &'static str,
}

fn section_meta(section: SectionTag) -> SectionMeta {
    match section {
        SectionTag::Bull1 => SectionMeta {
            progress: "1/8",
            completion: CompletionSignal::Low,
            reversal_probability: 0.0,
            next_move: "Advance to Section 2",
        },
        SectionTag::Bull2 => SectionMeta {
            progress: "2/8",
            completion: CompletionSignal::Medium,
            reversal_probability: 0.0,
            next_move: "Advance to Section 3",
        },
        SectionTag::Bull3 => SectionMeta {
            progress: "3/8",
            completion: CompletionSignal::High,
            reversal_probability: 0.0,
            next_move: "Watch for Section 4 completion",
        },
        SectionTag::Bull4 => SectionMeta {
            progress: "4/8",
            completion: CompletionSignal::High,
            reversal_probability: 85.0,
            next_move: "REVERSAL TO BEAR MARKET",
        },
        SectionTag::BearA => SectionMeta {
            progress: "1/8",
            completion: CompletionSignal::Low,
            reversal_probability: 0.0,
            next_move: "Continue decline to section a",
        },
        SectionTag::BearSecondaryRally => SectionMeta {
            progress: "2/8",
            completion: CompletionSignal::Medium,
            reversal_probability: 0.0,
            next_move: "Rally then decline to b",
        },
        SectionTag::BearRetest => SectionMeta {
            progress: "4/8",
            completion: CompletionSignal::High,
            reversal_probability: 0.0,
            next_move: "Rally to B then final decline",
        },
        SectionTag::BearB => SectionMeta {
            progress: "5/8",
            completion: CompletionSignal::High,
            reversal_probability: 0.0,
            next_move: "Oversold bounce to section c",
        },
        SectionTag::BearCounterRally => SectionMeta {
            progress: "5/8",
            completion: CompletionSignal::High,
            reversal_probability: 0.0,
            next_move: "Final decline to section C",
        },
        SectionTag::BearC => SectionMeta {
            progress: "6/8",
            completion: CompletionSignal::High,
            reversal_probability: 90.0,
            next_move: "REVERSAL TO BULL MARKET",
        },
    }
}

/// Short-window trend over the last 20 closes. A move beyond 3% of the
/// window's first close in either direction breaks the sideways band.
pub fn detect_trend(closes: &[f64]) -> Trend {
    let window = &closes[closes.len().saturating_sub(TREND_WINDOW)..];
    let (Some(first), Some(last)) = (window.first(), window.last()) else {
        return Trend::Sideways;
    };
    if *last > first * (1.0 + TREND_BAND) {
        Trend::Bull
    } else if *last < first * (1.0 - TREND_BAND) {
        Trend::Bear
    } else {
        Trend::Sideways
    }
}

/// Section implied by the swing record alone. Each confirmed break of a
/// prior swing close escalates the stage; the checks run in order so the
/// latest structural event wins.
fn swing_stage(closes: &[f64], campaign_type: CampaignType) -> SectionTag {
    let swings = find_swings(closes, SWING_LOOKBACK);
    let last = closes[closes.len() - 1];
    match campaign_type {
        CampaignType::Bull => {
            let mut stage = SectionTag::Bull1;
            if swings.lows.len() >= 2 && last > closes[swings.lows[swings.lows.len() - 2]] {
                stage = SectionTag::Bull2;
            }
            if swings.highs.len() >= 2 && last > closes[swings.highs[swings.highs.len() - 2]] {
                stage = SectionTag::Bull3;
            }
            if swings.highs.len() >= 3 && last < closes[swings.highs[swings.highs.len() - 1]] {
                stage = SectionTag::Bull4;
            }
            stage
        }
        CampaignType::Bear => {
            let mut stage = SectionTag::BearA;
            if swings.highs.len() >= 2 && last < closes[swings.highs[swings.highs.len() - 2]] {
                stage = SectionTag::BearSecondaryRally;
            }
            if swings.lows.len() >= 2 && last < closes[swings.lows[swings.lows.len() - 2]] {
                stage = SectionTag::BearB;
            }
            if swings.lows.len() >= 3 && last > closes[swings.lows[swings.lows.len() - 1]] {
                stage = SectionTag::BearC;
            }
            stage
        }
    }
}

fn later_of(a: SectionTag, b: SectionTag) -> SectionTag {
    if b.ordinal() > a.ordinal() {
        b
    } else {
        a
    }
}

/// Classify where a series sits in its campaign.
///
/// Campaign direction comes from the first and last closes; the section
/// from price's position inside the full high-low range, refined by the
/// swing record when the short-window trend agrees with the campaign
/// direction. When volume is present, the per-section volume rules can
/// confirm the section and adjust the completion signal and reversal
/// probability.
pub fn classify_campaign(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    volume: &[f64],
    timeframe: Timeframe,
) -> Result<CampaignClassification, DomainError> {
    let len = highs.len().min(lows.len()).min(closes.len());
    if len < MIN_CANDLES {
        return Err(DomainError::InsufficientData {
            required: MIN_CANDLES,
            got: len,
        });
    }

    let first_close = closes[0];
    let last_close = closes[closes.len() - 1];
    let campaign_type = if last_close > first_close {
        CampaignType::Bull
    } else {
        CampaignType::Bear
    };

    let major_high = highs.iter().fold(f64::MIN, |acc, &h| acc.max(h));
    let major_low = lows.iter().fold(f64::MAX, |acc, &l| acc.min(l));
    let range = major_high - major_low;
    // A flat range pins price to the midpoint instead of dividing by zero.
    let position = if range > 0.0 {
        (last_close - major_low) / range
    } else {
        0.5
    };

    let bias_percentage = ((position - 0.5) * 200.0).round() as i32;
    let structural_bias = if bias_percentage > 25 {
        StructuralBias::Bull
    } else if bias_percentage < -25 {
        StructuralBias::Bear
    } else {
        StructuralBias::Neutral
    };

    let binned = match campaign_type {
        CampaignType::Bull => {
            if position < 0.30 {
                SectionTag::Bull1
            } else if position < 0.60 {
                SectionTag::Bull2
            } else if position < 0.85 {
                SectionTag::Bull3
            } else {
                SectionTag::Bull4
            }
        }
        CampaignType::Bear => {
            if position > 0.70 {
                SectionTag::BearA
            } else if position > 0.50 {
                SectionTag::BearSecondaryRally
            } else if position > 0.30 {
                SectionTag::BearRetest
            } else {
                SectionTag::BearC
            }
        }
    };

    let trend = detect_trend(closes);
    // Swing refinement only applies while the short-window trend agrees
    // with the campaign direction.
    let section = match (campaign_type, trend) {
        (CampaignType::Bull, Trend::Bull) | (CampaignType::Bear, Trend::Bear) => {
            later_of(binned, swing_stage(closes, campaign_type))
        }
        _ => binned,
    };

    let meta = section_meta(section);
    let mut completion = meta.completion;
    let mut reversal_probability = meta.reversal_probability;
    let mut warning = None;

    let volume_read = if volume.is_empty() {
        None
    } else {
        Some(assess_section_volume(volume, section)?)
    };

    if let Some(read) = &volume_read {
        if read.confirmed && completion == CompletionSignal::Medium {
            completion = CompletionSignal::High;
        } else if !read.confirmed && completion == CompletionSignal::High {
            completion = CompletionSignal::Medium;
            warning = read.warning;
        }
        match read.signal {
            Some(SectionVolumeSignal::Bull4Divergence)
            | Some(SectionVolumeSignal::BearClimacticSelling) => {
                reversal_probability = (reversal_probability + 15.0).min(95.0);
            }
            Some(SectionVolumeSignal::BearExhaustion) => {
                reversal_probability = (reversal_probability + 10.0).min(90.0);
            }
            _ => {}
        }
    }

    let completion_bonus = match completion {
        CompletionSignal::High => 25.0,
        CompletionSignal::Medium => 12.0,
        CompletionSignal::Low => 0.0,
    };
    let confirmation_bonus = if volume_read.as_ref().map_or(false, |v| v.confirmed) {
        20.0
    } else {
        0.0
    };
    let volume_bonus = if volume_read.is_some() { 15.0 } else { 0.0 };
    let pattern_confidence = (len as f64 * 8.0
        + reversal_probability * 0.6
        + completion_bonus
        + confirmation_bonus
        + volume_bonus)
        .min(100.0);

    Ok(CampaignClassification {
        timeframe,
        campaign_type,
        section,
        section_progress: meta.progress,
        completion,
        reversal_probability,
        structural_bias,
        bias_percentage,
        pattern_confidence,
        trend,
        next_expected_move: meta.next_move,
        volume: volume_read,
        warning,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_short_series() {
        let prices = [100.0; 7];
        let result = classify_campaign(&prices, &prices, &prices, &[], Timeframe::Daily);
        assert!(matches!(
            result,
            Err(DomainError::InsufficientData {
                required: 8,
                got: 7
            })
        ));
    }

    #[test]
    fn test_early_bull_campaign_low_in_range() {
        // Rising closes but price sits in the bottom fifth of the range.
        let highs = [110.0, 200.0, 180.0, 150.0, 140.0, 130.0, 125.0, 122.0];
        let lows = [100.0, 140.0, 130.0, 120.0, 115.0, 110.0, 108.0, 105.0];
        let closes = [105.0, 150.0, 145.0, 140.0, 135.0, 130.0, 125.0, 120.0];

        let result = classify_campaign(&highs, &lows, &closes, &[], Timeframe::Daily).unwrap();
        assert_eq!(result.campaign_type, CampaignType::Bull);
        assert_eq!(result.section, SectionTag::Bull1);
        assert_eq!(result.section_progress, "1/8");
        assert_eq!(result.next_expected_move, "Advance to Section 2");
        assert_eq!(result.completion, CompletionSignal::Low);
        assert_eq!(result.bias_percentage, -60);
        assert_eq!(result.structural_bias, StructuralBias::Bear);
        assert!(result.volume.is_none());
        // 8 candles, no reversal, no completion or volume bonuses
        assert!((result.pattern_confidence - 64.0).abs() < 1e-9);
    }

    #[test]
    fn test_terminal_bull_section_with_volume_divergence() {
        let closes = [
            100.0, 110.0, 125.0, 140.0, 150.0, 160.0, 170.0, 180.0, 190.0, 198.0,
        ];
        let highs = [
            105.0, 115.0, 130.0, 145.0, 155.0, 165.0, 175.0, 185.0, 195.0, 200.0,
        ];
        let lows = [
            100.0, 105.0, 120.0, 135.0, 145.0, 155.0, 165.0, 175.0, 185.0, 193.0,
        ];
        let volume = [30.0, 30.0, 30.0, 30.0, 30.0, 30.0, 30.0, 12.0, 10.0, 8.0];

        let result =
            classify_campaign(&highs, &lows, &closes, &volume, Timeframe::Daily).unwrap();
        assert_eq!(result.section, SectionTag::Bull4);
        assert!(result.section.is_terminal());
        assert_eq!(result.completion, CompletionSignal::High);
        assert_eq!(result.next_expected_move, "REVERSAL TO BEAR MARKET");
        // 85 base, +15 for the divergence, capped at 95
        assert!((result.reversal_probability - 95.0).abs() < 1e-9);
        assert!((result.pattern_confidence - 100.0).abs() < 1e-9);
        let read = result.volume.unwrap();
        assert!(read.confirmed);
        assert_eq!(read.signal, Some(SectionVolumeSignal::Bull4Divergence));
    }

    #[test]
    fn test_bear_swing_break_escalates_past_position_bin() {
        // Decline with two failed rallies. An early flush put the range low
        // far beneath the closes, so position alone only reads section b;
        // the break below the first swing low's close marks section B.
        let closes = [
            200.0, 195.0, 190.0, 185.0, 180.0, 175.0, 170.0, 165.0, 160.0, 170.0, 178.0, 183.0,
            180.0, 174.0, 168.0, 160.0, 152.0, 145.0, 150.0, 155.0, 158.0, 150.0, 146.0, 135.0,
            125.0,
        ];
        let mut highs = [0.0; 25];
        let mut lows = [0.0; 25];
        for (i, close) in closes.iter().enumerate() {
            highs[i] = close + 2.0;
            lows[i] = close - 2.0;
        }
        lows[2] = 60.0;
        let mut volume = [10.0; 25];
        volume[19] = 14.0;
        volume[20] = 14.0;
        volume[21] = 14.0;
        volume[22] = 9.0;
        volume[23] = 9.0;
        volume[24] = 9.0;

        let result =
            classify_campaign(&highs, &lows, &closes, &volume, Timeframe::Daily).unwrap();
        assert_eq!(result.campaign_type, CampaignType::Bear);
        assert_eq!(result.trend, Trend::Bear);
        assert_eq!(result.section, SectionTag::BearB);
        assert_eq!(result.section_progress, "5/8");
        assert_eq!(result.next_expected_move, "Oversold bounce to section c");
        assert_eq!(result.bias_percentage, -8);
        assert_eq!(result.structural_bias, StructuralBias::Neutral);
        // Unconfirmed volume pulls the completion signal back down.
        assert_eq!(result.completion, CompletionSignal::Medium);
        let read = result.volume.unwrap();
        assert!(!read.confirmed);
        assert_eq!(read.signal, Some(SectionVolumeSignal::BearSellingContinues));
    }

    #[test]
    fn test_breakout_volume_upgrades_completion() {
        // Markup pullback: price mid-range after a run to 162.
        let closes = [100.0, 120.0, 140.0, 160.0, 150.0, 140.0, 132.0, 128.0];
        let mut highs = [0.0; 8];
        let mut lows = [0.0; 8];
        for (i, close) in closes.iter().enumerate() {
            highs[i] = close + 2.0;
            lows[i] = close - 2.0;
        }
        let volume = [10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 25.0];

        let result =
            classify_campaign(&highs, &lows, &closes, &volume, Timeframe::Daily).unwrap();
        assert_eq!(result.section, SectionTag::Bull2);
        assert_eq!(result.completion, CompletionSignal::High);
        assert!(result.warning.is_none());
        let read = result.volume.unwrap();
        assert_eq!(read.signal, Some(SectionVolumeSignal::Bull2BreakoutConfirmed));
    }

    #[test]
    fn test_flat_series_reads_as_midpoint() {
        let prices = [100.0; 8];
        let result = classify_campaign(&prices, &prices, &prices, &[], Timeframe::Daily).unwrap();
        assert_eq!(result.campaign_type, CampaignType::Bear);
        assert_eq!(result.bias_percentage, 0);
        assert_eq!(result.structural_bias, StructuralBias::Neutral);
        assert_eq!(result.section, SectionTag::BearRetest);
        assert_eq!(result.trend, Trend::Sideways);
    }

    #[test]
    fn test_trend_uses_only_the_last_twenty_closes() {
        let mut closes = vec![500.0; 5];
        closes.extend((0..20).map(|i| 100.0 + i as f64 * 2.5));
        assert_eq!(detect_trend(&closes), Trend::Bull);

        let mut closes = vec![50.0; 5];
        closes.extend((0..20).map(|i| 200.0 - i as f64 * 3.0));
        assert_eq!(detect_trend(&closes), Trend::Bear);

        assert_eq!(detect_trend(&[100.0, 102.0]), Trend::Sideways);
        assert_eq!(detect_trend(&[]), Trend::Sideways);
    }
}
