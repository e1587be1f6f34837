//! Batch driver: validated series in, signal trail out.

use crate::day::{classify_series, DayClassification};
use crate::engine::{SignalEngine, SignalEngineState, SignalResult};
use crate::report::ReportFormatter;
use flowstate_core::{MonitorConfig, MonitorError, Signal};
use serde::{Deserialize, Serialize};

/// Output of one full-series analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// One result per input day, warm-up days included.
    pub results: Vec<SignalResult>,
    /// One classification per evaluated day.
    pub classifications: Vec<DayClassification>,
    /// Engine state after the last day; persist it to resume a stream.
    pub final_state: SignalEngineState,
}

impl Analysis {
    /// The most recent day's result, if the series was non-empty.
    #[must_use]
    pub fn latest(&self) -> Option<&SignalResult> {
        self.results.last()
    }

    /// The most recent day's classification, if any day was evaluated.
    #[must_use]
    pub fn latest_classification(&self) -> Option<&DayClassification> {
        self.classifications.last()
    }

    /// BUY and SELL results, in day order.
    pub fn actionable(&self) -> impl Iterator<Item = &SignalResult> {
        self.results.iter().filter(|r| r.signal.is_actionable())
    }

    /// Number of days that fell inside the warm-up window.
    #[must_use]
    pub fn warm_up_days(&self) -> usize {
        self.results.len() - self.classifications.len()
    }

    /// Human-readable report over the whole analysis.
    #[must_use]
    pub fn summary(&self) -> String {
        ReportFormatter::format(self)
    }
}

/// Deterministic monitor over aligned borrow-rate and price series.
///
/// Construction validates the configuration; `analyze` validates the series,
/// classifies every evaluable day, and folds the signal engine over the
/// classifications. The same inputs always produce the same `Analysis`.
#[derive(Debug, Clone)]
pub struct FlowStateMonitor {
    config: MonitorConfig,
    engine: SignalEngine,
}

impl FlowStateMonitor {
    /// Creates a monitor with the given configuration.
    ///
    /// # Errors
    /// Returns `MonitorError::Configuration` if the thresholds are
    /// internally inconsistent.
    pub fn new(config: MonitorConfig) -> Result<Self, MonitorError> {
        config.validate()?;
        let engine = SignalEngine::new(config.signals.clone());
        Ok(Self { config, engine })
    }

    /// Creates a monitor with the built-in defaults.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            engine: SignalEngine::new(flowstate_core::SignalConfig::default()),
            config: MonitorConfig::default(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Runs the full pipeline over an aligned series pair.
    ///
    /// Oldest values first; index t of both slices describes the same day.
    /// Warm-up days come back as tagged HOLD results, never as errors; an
    /// empty pair yields an empty analysis.
    ///
    /// # Errors
    /// Fails fast on mismatched lengths, non-finite values, negative borrow
    /// rates, or non-positive prices. No partial results are produced.
    pub fn analyze(&self, borrow_rates: &[f64], prices: &[f64]) -> Result<Analysis, MonitorError> {
        validate_series(borrow_rates, prices)?;

        let classifications = classify_series(borrow_rates, prices, &self.config);
        // A series shorter than min_data_points is warm-up in its entirety.
        let warm_up_end = borrow_rates
            .len()
            .min(self.config.min_data_points.saturating_sub(1));

        let mut results = Vec::with_capacity(borrow_rates.len());
        for (t, &rate) in borrow_rates.iter().take(warm_up_end).enumerate() {
            results.push(SignalResult::insufficient_history(
                t,
                rate,
                t + 1,
                self.config.min_data_points,
            ));
        }

        let mut state = SignalEngineState::default();
        for day in &classifications {
            let result = self.engine.step(&mut state, day);
            if result.signal != Signal::Hold {
                tracing::debug!(
                    day = result.day_index,
                    signal = %result.signal,
                    reason = %result.reason,
                    "actionable signal"
                );
            }
            results.push(result);
        }

        tracing::debug!(
            days = borrow_rates.len(),
            evaluated = classifications.len(),
            "series analyzed"
        );

        Ok(Analysis {
            results,
            classifications,
            final_state: state,
        })
    }
}

/// Fail-fast input validation: aligned lengths, finite values, plausible
/// domains. Runs before any classification so the engine never sees data it
/// could not validate.
fn validate_series(borrow_rates: &[f64], prices: &[f64]) -> Result<(), MonitorError> {
    if borrow_rates.len() != prices.len() {
        return Err(MonitorError::SeriesLengthMismatch {
            borrow_len: borrow_rates.len(),
            price_len: prices.len(),
        });
    }
    for (index, &rate) in borrow_rates.iter().enumerate() {
        if !rate.is_finite() {
            return Err(MonitorError::NonFiniteValue {
                series: "borrow_rate",
                index,
            });
        }
        if rate < 0.0 {
            return Err(MonitorError::NegativeBorrowRate { index, value: rate });
        }
    }
    for (index, &price) in prices.iter().enumerate() {
        if !price.is_finite() {
            return Err(MonitorError::NonFiniteValue {
                series: "price",
                index,
            });
        }
        if price <= 0.0 {
            return Err(MonitorError::NonPositivePrice {
                index,
                value: price,
            });
        }
    }
    Ok(())
}
