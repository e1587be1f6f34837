//! Closed state taxonomy for the flow-state monitor.
//!
//! Every regime and decision in the system is one of the enums below. The
//! serialized tokens (SCREAMING_SNAKE_CASE) are a stable output contract:
//! downstream consumers match on them, so renaming a variant is a breaking
//! change.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Absolute borrow-rate regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BorrowLevel {
    /// Below the medium threshold: nothing notable.
    Low,
    /// At or above the medium threshold: shorts are paying attention.
    Medium,
    /// At or above the high threshold: borrow is expensive and scarce.
    High,
}

impl BorrowLevel {
    /// Returns true for MEDIUM or HIGH, the levels that can support a flow state.
    #[must_use]
    pub const fn is_elevated(self) -> bool {
        matches!(self, Self::Medium | Self::High)
    }
}

impl fmt::Display for BorrowLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// Day-over-day borrow-rate change regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BorrowTrend {
    /// Delta at or above the increase threshold.
    Strengthening,
    /// Delta between the two thresholds.
    Stable,
    /// Delta at or below the decrease threshold.
    Weakening,
}

impl fmt::Display for BorrowTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strengthening => write!(f, "STRENGTHENING"),
            Self::Stable => write!(f, "STABLE"),
            Self::Weakening => write!(f, "WEAKENING"),
        }
    }
}

/// Smoothed borrow-momentum regime, classified from the delta EMA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MomentumClass {
    /// EMA at or above the positive threshold.
    Positive,
    /// EMA strictly between the thresholds.
    Neutral,
    /// EMA at or below the negative threshold.
    Negative,
}

impl fmt::Display for MomentumClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positive => write!(f, "POSITIVE"),
            Self::Neutral => write!(f, "NEUTRAL"),
            Self::Negative => write!(f, "NEGATIVE"),
        }
    }
}

/// Structural tension regime: is the borrow rate high enough that shorts
/// are under pressure at all?
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketState {
    On,
    Off,
}

impl fmt::Display for MarketState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On => write!(f, "ON"),
            Self::Off => write!(f, "OFF"),
        }
    }
}

/// Forced-buying regime: is short-covering pressure actively building,
/// fading, or absent?
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowState {
    /// Elevated borrow with a supporting indicator: pressure is building.
    On,
    /// Elevated borrow but momentum or trend is fading.
    Weakening,
    /// No elevated borrow, or elevated borrow with nothing behind it.
    Off,
}

impl FlowState {
    /// Process exit code for scripting against the CLI.
    ///
    /// OFF maps to 0, ON to 1, WEAKENING to 2. Code 3 is reserved for
    /// validation and configuration failures.
    #[must_use]
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Off => 0,
            Self::On => 1,
            Self::Weakening => 2,
        }
    }
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On => write!(f, "ON"),
            Self::Weakening => write!(f, "WEAKENING"),
            Self::Off => write!(f, "OFF"),
        }
    }
}

/// Transition-triggered trading decision for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    /// Returns true if this signal changes a position (BUY or SELL).
    #[must_use]
    pub const fn is_actionable(self) -> bool {
        !matches!(self, Self::Hold)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
            Self::Hold => write!(f, "HOLD"),
        }
    }
}

/// Whether a day's result carries a full evaluation or only a warm-up
/// placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultStatus {
    /// The day had enough history; all classifiers ran.
    Evaluated,
    /// The day fell inside the warm-up window; the signal is a forced HOLD.
    InsufficientHistory,
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Evaluated => write!(f, "EVALUATED"),
            Self::InsufficientHistory => write!(f, "INSUFFICIENT_HISTORY"),
        }
    }
}
