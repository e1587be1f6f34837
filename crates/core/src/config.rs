use crate::error::MonitorError;
use serde::{Deserialize, Serialize};

/// Full configuration for the flow-state monitor.
///
/// Every field has a default, so a partial YAML file (or none at all) yields
/// a working configuration. `validate` rejects internally inconsistent
/// thresholds instead of silently clamping them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub borrow_level: BorrowLevelConfig,
    pub borrow_delta: BorrowDeltaConfig,
    pub borrow_momentum: BorrowMomentumConfig,
    pub market_state: MarketStateConfig,
    pub price_behavior: PriceBehaviorConfig,
    pub signals: SignalConfig,
    /// Minimum series length before any day is fully evaluated. Days before
    /// this point come back tagged INSUFFICIENT_HISTORY.
    pub min_data_points: usize,
}

/// Thresholds for the absolute borrow-rate level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorrowLevelConfig {
    /// Rates at or above this are MEDIUM (annualized percent).
    pub medium_threshold_percent: f64,
    /// Rates at or above this are HIGH (annualized percent).
    pub high_threshold_percent: f64,
}

/// Thresholds for the day-over-day borrow-rate change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorrowDeltaConfig {
    /// Deltas at or above this are STRENGTHENING (percentage points).
    pub increase_threshold_pct_points: f64,
    /// Deltas at or below this are WEAKENING (percentage points, negative).
    pub decrease_threshold_pct_points: f64,
}

/// Parameters for the borrow-momentum EMA and its classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorrowMomentumConfig {
    /// EMA span; the smoothing factor is 2 / (span + 1).
    pub ema_span: usize,
    /// EMA values at or above this classify as POSITIVE momentum.
    pub positive_threshold_pct_points: f64,
    /// EMA values at or below this classify as NEGATIVE momentum.
    pub negative_threshold_pct_points: f64,
}

/// Threshold for the binary market-state gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketStateConfig {
    /// Borrow rates at or above this put the market ON (constrained).
    /// Independent of the level classifier's own thresholds.
    pub tension_threshold_percent: f64,
}

/// Parameters for price spike and abnormal-volatility detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceBehaviorConfig {
    /// Daily returns at or above this are spikes (percent).
    pub spike_threshold_percent: f64,
    /// Number of prior returns in the volatility baseline.
    pub volatility_lookback_period: usize,
    /// A day is abnormally volatile when its return magnitude exceeds the
    /// baseline standard deviation times this multiplier.
    pub volatility_threshold_multiplier: f64,
}

/// Parameters for the signal engine's exit detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Exhaustion deadband: EMA readings below the negated value count
    /// toward the exit streak. Separate from the momentum thresholds above
    /// and much smaller.
    pub epsilon: f64,
    /// Number of consecutive exhausted days required before SELL fires.
    pub exit_confirmation_days: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            borrow_level: BorrowLevelConfig::default(),
            borrow_delta: BorrowDeltaConfig::default(),
            borrow_momentum: BorrowMomentumConfig::default(),
            market_state: MarketStateConfig::default(),
            price_behavior: PriceBehaviorConfig::default(),
            signals: SignalConfig::default(),
            min_data_points: 6,
        }
    }
}

impl Default for BorrowLevelConfig {
    fn default() -> Self {
        Self {
            medium_threshold_percent: 5.0,
            high_threshold_percent: 10.0,
        }
    }
}

impl Default for BorrowDeltaConfig {
    fn default() -> Self {
        Self {
            increase_threshold_pct_points: 2.0,
            decrease_threshold_pct_points: -2.0,
        }
    }
}

impl Default for BorrowMomentumConfig {
    fn default() -> Self {
        Self {
            ema_span: 3,
            positive_threshold_pct_points: 1.0,
            negative_threshold_pct_points: -1.0,
        }
    }
}

impl Default for MarketStateConfig {
    fn default() -> Self {
        Self {
            tension_threshold_percent: 5.0,
        }
    }
}

impl Default for PriceBehaviorConfig {
    fn default() -> Self {
        Self {
            spike_threshold_percent: 5.0,
            volatility_lookback_period: 20,
            volatility_threshold_multiplier: 2.0,
        }
    }
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            epsilon: 0.05,
            exit_confirmation_days: 1,
        }
    }
}

impl MonitorConfig {
    /// Checks that every threshold is finite and the combination is
    /// internally consistent.
    ///
    /// # Errors
    /// Returns `MonitorError::Configuration` naming the first offending
    /// option. Nothing is clamped or repaired.
    pub fn validate(&self) -> Result<(), MonitorError> {
        let numeric_fields = [
            (
                "borrow_level.medium_threshold_percent",
                self.borrow_level.medium_threshold_percent,
            ),
            (
                "borrow_level.high_threshold_percent",
                self.borrow_level.high_threshold_percent,
            ),
            (
                "borrow_delta.increase_threshold_pct_points",
                self.borrow_delta.increase_threshold_pct_points,
            ),
            (
                "borrow_delta.decrease_threshold_pct_points",
                self.borrow_delta.decrease_threshold_pct_points,
            ),
            (
                "borrow_momentum.positive_threshold_pct_points",
                self.borrow_momentum.positive_threshold_pct_points,
            ),
            (
                "borrow_momentum.negative_threshold_pct_points",
                self.borrow_momentum.negative_threshold_pct_points,
            ),
            (
                "market_state.tension_threshold_percent",
                self.market_state.tension_threshold_percent,
            ),
            (
                "price_behavior.spike_threshold_percent",
                self.price_behavior.spike_threshold_percent,
            ),
            (
                "price_behavior.volatility_threshold_multiplier",
                self.price_behavior.volatility_threshold_multiplier,
            ),
            ("signals.epsilon", self.signals.epsilon),
        ];
        for (name, value) in numeric_fields {
            if !value.is_finite() {
                return Err(MonitorError::configuration(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }

        if self.borrow_level.medium_threshold_percent >= self.borrow_level.high_threshold_percent {
            return Err(MonitorError::configuration(format!(
                "borrow_level.medium_threshold_percent ({}) must be below high_threshold_percent ({})",
                self.borrow_level.medium_threshold_percent, self.borrow_level.high_threshold_percent
            )));
        }
        if self.borrow_delta.increase_threshold_pct_points <= 0.0 {
            return Err(MonitorError::configuration(format!(
                "borrow_delta.increase_threshold_pct_points must be positive, got {}",
                self.borrow_delta.increase_threshold_pct_points
            )));
        }
        if self.borrow_delta.decrease_threshold_pct_points >= 0.0 {
            return Err(MonitorError::configuration(format!(
                "borrow_delta.decrease_threshold_pct_points must be negative, got {}",
                self.borrow_delta.decrease_threshold_pct_points
            )));
        }
        if self.borrow_momentum.ema_span == 0 {
            return Err(MonitorError::configuration(
                "borrow_momentum.ema_span must be at least 1",
            ));
        }
        if self.borrow_momentum.positive_threshold_pct_points <= 0.0 {
            return Err(MonitorError::configuration(format!(
                "borrow_momentum.positive_threshold_pct_points must be positive, got {}",
                self.borrow_momentum.positive_threshold_pct_points
            )));
        }
        if self.borrow_momentum.negative_threshold_pct_points >= 0.0 {
            return Err(MonitorError::configuration(format!(
                "borrow_momentum.negative_threshold_pct_points must be negative, got {}",
                self.borrow_momentum.negative_threshold_pct_points
            )));
        }
        if self.price_behavior.spike_threshold_percent <= 0.0 {
            return Err(MonitorError::configuration(format!(
                "price_behavior.spike_threshold_percent must be positive, got {}",
                self.price_behavior.spike_threshold_percent
            )));
        }
        if self.price_behavior.volatility_lookback_period < 2 {
            return Err(MonitorError::configuration(format!(
                "price_behavior.volatility_lookback_period must be at least 2, got {}",
                self.price_behavior.volatility_lookback_period
            )));
        }
        if self.price_behavior.volatility_threshold_multiplier <= 0.0 {
            return Err(MonitorError::configuration(format!(
                "price_behavior.volatility_threshold_multiplier must be positive, got {}",
                self.price_behavior.volatility_threshold_multiplier
            )));
        }
        if self.signals.epsilon < 0.0 {
            return Err(MonitorError::configuration(format!(
                "signals.epsilon must be non-negative, got {}",
                self.signals.epsilon
            )));
        }
        if self.signals.exit_confirmation_days == 0 {
            return Err(MonitorError::configuration(
                "signals.exit_confirmation_days must be at least 1",
            ));
        }
        if self.min_data_points < 2 {
            return Err(MonitorError::configuration(format!(
                "min_data_points must be at least 2, got {}",
                self.min_data_points
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============================================
    // Default Tests
    // ============================================

    #[test]
    fn default_config_passes_validation() {
        let config = MonitorConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn default_thresholds_match_documented_values() {
        let config = MonitorConfig::default();
        assert!((config.borrow_level.medium_threshold_percent - 5.0).abs() < f64::EPSILON);
        assert!((config.borrow_level.high_threshold_percent - 10.0).abs() < f64::EPSILON);
        assert!((config.borrow_delta.increase_threshold_pct_points - 2.0).abs() < f64::EPSILON);
        assert!((config.borrow_delta.decrease_threshold_pct_points + 2.0).abs() < f64::EPSILON);
        assert_eq!(config.borrow_momentum.ema_span, 3);
        assert!((config.signals.epsilon - 0.05).abs() < f64::EPSILON);
        assert_eq!(config.signals.exit_confirmation_days, 1);
        assert_eq!(config.min_data_points, 6);
    }

    // ============================================
    // Validation Tests
    // ============================================

    #[test]
    fn medium_at_or_above_high_rejected() {
        let mut config = MonitorConfig::default();
        config.borrow_level.medium_threshold_percent = 10.0;
        config.borrow_level.high_threshold_percent = 10.0;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("medium_threshold_percent"));
    }

    #[test]
    fn non_positive_increase_threshold_rejected() {
        let mut config = MonitorConfig::default();
        config.borrow_delta.increase_threshold_pct_points = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_negative_decrease_threshold_rejected() {
        let mut config = MonitorConfig::default();
        config.borrow_delta.decrease_threshold_pct_points = 0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_ema_span_rejected() {
        let mut config = MonitorConfig::default();
        config.borrow_momentum.ema_span = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn negative_epsilon_rejected() {
        let mut config = MonitorConfig::default();
        config.signals.epsilon = -0.01;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_epsilon_accepted() {
        let mut config = MonitorConfig::default();
        config.signals.epsilon = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_confirmation_days_rejected() {
        let mut config = MonitorConfig::default();
        config.signals.exit_confirmation_days = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn short_volatility_lookback_rejected() {
        let mut config = MonitorConfig::default();
        config.price_behavior.volatility_lookback_period = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn min_data_points_below_two_rejected() {
        let mut config = MonitorConfig::default();
        config.min_data_points = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn nan_threshold_rejected() {
        let mut config = MonitorConfig::default();
        config.signals.epsilon = f64::NAN;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("finite"), "error was {err}");
    }

    // ============================================
    // Serde Tests
    // ============================================

    #[test]
    fn partial_yaml_fills_defaults() {
        let yaml = "borrow_momentum:\n  ema_span: 5\n";
        let config: MonitorConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.borrow_momentum.ema_span, 5);
        // Untouched sections keep their defaults.
        assert!((config.borrow_level.medium_threshold_percent - 5.0).abs() < f64::EPSILON);
        assert_eq!(config.min_data_points, 6);
    }

    #[test]
    fn config_round_trips_through_yaml() {
        let mut config = MonitorConfig::default();
        config.signals.epsilon = 0.1;
        config.min_data_points = 8;

        let yaml = serde_yaml::to_string(&config).unwrap();
        let back: MonitorConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, config);
    }
}
