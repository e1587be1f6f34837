//! Binary market-state gate.

use flowstate_core::{MarketState, MarketStateConfig};

/// ON when the borrow rate is at or above the tension threshold, OFF below.
///
/// The tension threshold is independent of the level classifier's
/// thresholds: it answers "has elasticity broken", not "how expensive is
/// borrow".
#[must_use]
pub fn classify_market(rate: f64, config: &MarketStateConfig) -> MarketState {
    if rate >= config.tension_threshold_percent {
        MarketState::On
    } else {
        MarketState::Off
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_below_threshold_is_off() {
        let config = MarketStateConfig::default();
        assert_eq!(classify_market(4.99, &config), MarketState::Off);
        assert_eq!(classify_market(0.0, &config), MarketState::Off);
    }

    #[test]
    fn rate_exactly_at_threshold_is_on() {
        let config = MarketStateConfig::default();
        assert_eq!(classify_market(5.0, &config), MarketState::On);
    }

    #[test]
    fn rate_above_threshold_is_on() {
        let config = MarketStateConfig::default();
        assert_eq!(classify_market(40.0, &config), MarketState::On);
    }

    #[test]
    fn custom_threshold_respected() {
        let config = MarketStateConfig {
            tension_threshold_percent: 15.0,
        };
        assert_eq!(classify_market(10.0, &config), MarketState::Off);
        assert_eq!(classify_market(15.0, &config), MarketState::On);
    }
}
