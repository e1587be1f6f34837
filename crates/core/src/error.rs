//! Error taxonomy for the monitor.
//!
//! Only malformed input and inconsistent configuration are errors. A series
//! that is merely too short for full evaluation is not: warm-up days come
//! back as tagged HOLD results instead.

use thiserror::Error;

/// Errors produced when validating input series or configuration.
#[derive(Debug, Clone, Error)]
pub enum MonitorError {
    /// Borrow-rate and price series must be index-aligned.
    #[error("series length mismatch: {borrow_len} borrow rates vs {price_len} prices")]
    SeriesLengthMismatch {
        /// Length of the borrow-rate series.
        borrow_len: usize,
        /// Length of the price series.
        price_len: usize,
    },

    /// A series value was NaN or infinite.
    #[error("non-finite value in {series} series at index {index}")]
    NonFiniteValue {
        /// Which series held the value ("borrow_rate" or "price").
        series: &'static str,
        /// Index of the offending value.
        index: usize,
    },

    /// Borrow rates are annualized percentages and cannot be negative.
    #[error("negative borrow rate {value} at index {index}")]
    NegativeBorrowRate {
        /// Index of the offending value.
        index: usize,
        /// The rejected rate.
        value: f64,
    },

    /// Prices must be strictly positive for return calculations.
    #[error("non-positive price {value} at index {index}")]
    NonPositivePrice {
        /// Index of the offending value.
        index: usize,
        /// The rejected price.
        value: f64,
    },

    /// Configuration thresholds are internally inconsistent.
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

impl MonitorError {
    /// Creates a configuration error with the given message.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Returns true if this error concerns the input series rather than
    /// the configuration.
    #[must_use]
    pub fn is_data_error(&self) -> bool {
        !matches!(self, Self::Configuration(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_mismatch_message_names_both_lengths() {
        let err = MonitorError::SeriesLengthMismatch {
            borrow_len: 10,
            price_len: 8,
        };
        let msg = err.to_string();
        assert!(msg.contains("10"), "message was {msg}");
        assert!(msg.contains("8"), "message was {msg}");
    }

    #[test]
    fn non_finite_message_names_series_and_index() {
        let err = MonitorError::NonFiniteValue {
            series: "price",
            index: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("price"), "message was {msg}");
        assert!(msg.contains('3'), "message was {msg}");
    }

    #[test]
    fn configuration_errors_are_not_data_errors() {
        assert!(!MonitorError::configuration("bad thresholds").is_data_error());
        assert!(MonitorError::NegativeBorrowRate {
            index: 0,
            value: -1.0
        }
        .is_data_error());
    }
}
