//! Absolute borrow-rate level and day-over-day delta classification.

use flowstate_core::{BorrowDeltaConfig, BorrowLevel, BorrowLevelConfig, BorrowTrend};

/// Classifies a borrow rate into LOW / MEDIUM / HIGH.
///
/// Both thresholds are inclusive on the upper side: a rate exactly at the
/// medium threshold is MEDIUM, exactly at the high threshold is HIGH.
///
/// # Arguments
/// * `rate` - Annualized borrow rate in percent
/// * `config` - Level thresholds
#[must_use]
pub fn classify_level(rate: f64, config: &BorrowLevelConfig) -> BorrowLevel {
    if rate >= config.high_threshold_percent {
        BorrowLevel::High
    } else if rate >= config.medium_threshold_percent {
        BorrowLevel::Medium
    } else {
        BorrowLevel::Low
    }
}

/// Classifies a day-over-day borrow-rate change.
///
/// Deltas at or beyond a threshold take that threshold's classification;
/// everything between the two is STABLE.
///
/// # Arguments
/// * `delta` - Today's rate minus yesterday's, in percentage points
/// * `config` - Delta thresholds
#[must_use]
pub fn classify_delta(delta: f64, config: &BorrowDeltaConfig) -> BorrowTrend {
    if delta >= config.increase_threshold_pct_points {
        BorrowTrend::Strengthening
    } else if delta <= config.decrease_threshold_pct_points {
        BorrowTrend::Weakening
    } else {
        BorrowTrend::Stable
    }
}
