pub mod campaign_section;
pub mod cycle_reversal;
pub mod retracement;
pub mod volume_signal;
