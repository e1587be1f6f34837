//! Exponential moving average of borrow-rate deltas.
//!
//! Borrow-rate turning points are not sharply observable in noisy data, so
//! the monitor smooths daily deltas with a true EMA rather than a rolling
//! mean: recent deltas get more weight and the average responds faster when
//! the trend turns.

use flowstate_core::{BorrowMomentumConfig, MomentumClass};
use serde::{Deserialize, Serialize};

/// Running EMA over borrow-rate deltas.
///
/// Seeded at the first delta it sees, then updated with the standard
/// recurrence `EMA_t = alpha * delta_t + (1 - alpha) * EMA_{t-1}` where
/// `alpha = 2 / (span + 1)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowMomentum {
    alpha: f64,
    ema: Option<f64>,
}

impl BorrowMomentum {
    /// Creates an empty EMA with the given span.
    #[must_use]
    pub fn new(span: usize) -> Self {
        Self {
            alpha: 2.0 / (span as f64 + 1.0),
            ema: None,
        }
    }

    /// Feeds one delta and returns the updated EMA.
    ///
    /// The first delta seeds the average directly; there is no separate
    /// warm-up bias.
    pub fn update(&mut self, delta: f64) -> f64 {
        let next = match self.ema {
            Some(prev) => self.alpha * delta + (1.0 - self.alpha) * prev,
            None => delta,
        };
        self.ema = Some(next);
        next
    }

    /// Current EMA value, if any delta has been fed.
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        self.ema
    }

    /// Smoothing factor in use.
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

/// Classifies a momentum EMA as POSITIVE / NEUTRAL / NEGATIVE.
///
/// Threshold comparisons are inclusive. These thresholds feed the flow-state
/// classifier only; the signal engine's exit deadband is a separate, much
/// smaller value.
#[must_use]
pub fn classify_momentum(ema: f64, config: &BorrowMomentumConfig) -> MomentumClass {
    if ema >= config.positive_threshold_pct_points {
        MomentumClass::Positive
    } else if ema <= config.negative_threshold_pct_points {
        MomentumClass::Negative
    } else {
        MomentumClass::Neutral
    }
}
