//! Per-day classification of the aligned input series.

use crate::classifier::{
    classify_delta, classify_flow, classify_level, classify_market, classify_momentum,
    daily_returns, is_abnormal_volatility, is_price_spike, BorrowMomentum,
};
use flowstate_core::{
    BorrowLevel, BorrowTrend, FlowState, MarketState, MomentumClass, MonitorConfig,
};
use serde::{Deserialize, Serialize};

/// Everything the classifiers know about one day.
///
/// A classification is a pure function of the series prefix ending at
/// `day_index`; recomputing it for any day in any order gives the same
/// value. Raw statistics and their classified regimes are carried side by
/// side so downstream consumers never re-derive one from the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayClassification {
    /// Zero-based index into the input series.
    pub day_index: usize,
    /// Annualized borrow rate in percent.
    pub borrow_rate: f64,
    /// Rate change versus the previous day, in percentage points.
    pub borrow_delta: f64,
    /// Running EMA of deltas up to and including this day.
    pub borrow_momentum_ema: f64,
    /// Classified absolute level.
    pub borrow_level: BorrowLevel,
    /// Classified delta.
    pub borrow_trend: BorrowTrend,
    /// Classified momentum EMA.
    pub momentum: MomentumClass,
    /// Binary tension gate.
    pub market_state: MarketState,
    /// Forced-buying regime.
    pub flow_state: FlowState,
    /// Daily price return at or above the spike threshold.
    pub price_spike: bool,
    /// Daily return abnormally large against its recent baseline.
    pub abnormal_volatility: bool,
}

/// Classifies every evaluable day of an aligned series.
///
/// Days before the warm-up boundary (`min_data_points - 1`) are skipped;
/// the momentum EMA still consumes their deltas so the first emitted
/// classification carries the same EMA it would in a day-by-day replay.
/// Inputs must already be validated.
#[must_use]
pub fn classify_series(
    borrow_rates: &[f64],
    prices: &[f64],
    config: &MonitorConfig,
) -> Vec<DayClassification> {
    if borrow_rates.len() < config.min_data_points {
        return Vec::new();
    }
    let first_evaluated = config.min_data_points - 1;

    let returns = daily_returns(prices);
    let mut momentum = BorrowMomentum::new(config.borrow_momentum.ema_span);
    let mut classifications = Vec::with_capacity(borrow_rates.len() - first_evaluated);

    for t in 1..borrow_rates.len() {
        let delta = borrow_rates[t] - borrow_rates[t - 1];
        let ema = momentum.update(delta);

        if t < first_evaluated {
            continue;
        }

        let return_percent = returns[t - 1];
        let borrow_level = classify_level(borrow_rates[t], &config.borrow_level);
        let borrow_trend = classify_delta(delta, &config.borrow_delta);
        let momentum_class = classify_momentum(ema, &config.borrow_momentum);
        let price_spike = is_price_spike(return_percent, &config.price_behavior);
        let abnormal_volatility = is_abnormal_volatility(&returns[..t], &config.price_behavior);

        classifications.push(DayClassification {
            day_index: t,
            borrow_rate: borrow_rates[t],
            borrow_delta: delta,
            borrow_momentum_ema: ema,
            borrow_level,
            borrow_trend,
            momentum: momentum_class,
            market_state: classify_market(borrow_rates[t], &config.market_state),
            flow_state: classify_flow(borrow_level, borrow_trend, momentum_class, price_spike),
            price_spike,
            abnormal_volatility,
        });
    }

    classifications
}
