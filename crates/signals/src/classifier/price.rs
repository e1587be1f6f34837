//! Daily price returns, spike detection, and abnormal-volatility detection.

use flowstate_core::PriceBehaviorConfig;

/// Day-over-day return in percent.
#[must_use]
pub fn percent_return(previous: f64, current: f64) -> f64 {
    (current - previous) / previous * 100.0
}

/// Percent returns for a price series, one per day after the first.
#[must_use]
pub fn daily_returns(prices: &[f64]) -> Vec<f64> {
    prices
        .windows(2)
        .map(|pair| percent_return(pair[0], pair[1]))
        .collect()
}

/// True when a daily return is at or above the spike threshold.
///
/// Only upward moves count: forced buying shows up as price jumping, not
/// dropping.
#[must_use]
pub fn is_price_spike(return_percent: f64, config: &PriceBehaviorConfig) -> bool {
    return_percent >= config.spike_threshold_percent
}

/// True when the latest return is abnormally large against its own recent
/// baseline.
///
/// `returns` must end with the day under test. The baseline is the
/// population standard deviation of the `volatility_lookback_period` returns
/// immediately before it; the day is flagged when its magnitude exceeds
/// baseline times the multiplier. Too little history for a full baseline
/// yields false, never an error.
#[must_use]
pub fn is_abnormal_volatility(returns: &[f64], config: &PriceBehaviorConfig) -> bool {
    let lookback = config.volatility_lookback_period;
    if returns.len() < lookback + 1 {
        return false;
    }

    let current = returns[returns.len() - 1];
    let baseline = &returns[returns.len() - 1 - lookback..returns.len() - 1];
    let baseline_std = population_std(baseline);

    current.abs() > baseline_std * config.volatility_threshold_multiplier
}

fn population_std(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}
