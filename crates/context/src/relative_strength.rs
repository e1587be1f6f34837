//! Relative strength comparison against market benchmarks.
//!
//! Compares a stock's total return over the analyzed window against one or
//! more named benchmark series (typically broad-market ETFs). Genuine
//! constraint pressure usually shows up as outperformance, so a flow ON
//! reading on an underperforming stock deserves suspicion, and a large move
//! with no flow pressure at all points at a narrative driver instead.

use flowstate_core::FlowState;
use serde::{Deserialize, Serialize};

/// Absolute stock return (percent) treated as a significant move.
pub const SIGNIFICANT_MOVE_PCT: f64 = 5.0;

/// Absolute stock-minus-benchmark difference (percentage points) treated as
/// a significant divergence.
pub const SIGNIFICANT_DIVERGENCE_PCT: f64 = 3.0;

/// Comparison of the stock's return against one benchmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkComparison {
    pub name: String,
    /// Total return of the benchmark over the window, in percent.
    pub benchmark_return: f64,
    /// Stock return minus benchmark return, in percentage points.
    pub relative: f64,
    pub outperforming: bool,
}

/// Relative strength of a stock against a set of benchmarks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelativeStrength {
    pub symbol: String,
    /// Total return of the stock over the window, in percent.
    pub stock_return: f64,
    pub comparisons: Vec<BenchmarkComparison>,
    /// Benchmarks whose series could not support a return calculation.
    pub skipped: Vec<String>,
    /// One-line human-readable summary.
    pub description: String,
}

/// Calculates the total percentage return across a price series.
///
/// # Returns
/// `None` when fewer than two prices are available, the starting price is
/// not positive, or either endpoint is not finite.
#[must_use]
pub fn total_return(prices: &[f64]) -> Option<f64> {
    if prices.len() < 2 {
        return None;
    }
    let start = prices[0];
    let end = prices[prices.len() - 1];
    if start <= 0.0 || !start.is_finite() || !end.is_finite() {
        return None;
    }
    Some((end - start) / start * 100.0)
}

/// Compares the stock's total return against each named benchmark.
///
/// Benchmarks whose series cannot support a return calculation are recorded
/// in `skipped` rather than failing the analysis. A stock series too short
/// for a return calculation is treated as flat.
#[must_use]
pub fn analyze_relative_strength(
    symbol: &str,
    stock_prices: &[f64],
    benchmarks: &[(String, Vec<f64>)],
) -> RelativeStrength {
    let stock_return = match total_return(stock_prices) {
        Some(value) => value,
        None => {
            tracing::warn!(symbol, "could not calculate stock return, treating as flat");
            0.0
        }
    };

    let mut comparisons = Vec::new();
    let mut skipped = Vec::new();
    for (name, prices) in benchmarks {
        match total_return(prices) {
            Some(benchmark_return) => {
                let relative = stock_return - benchmark_return;
                comparisons.push(BenchmarkComparison {
                    name: name.clone(),
                    benchmark_return,
                    relative,
                    outperforming: relative > 0.0,
                });
            }
            None => {
                tracing::warn!(benchmark = %name, "could not calculate benchmark return, skipping");
                skipped.push(name.clone());
            }
        }
    }

    let description = describe(symbol, stock_return, &comparisons);

    RelativeStrength {
        symbol: symbol.to_string(),
        stock_return,
        comparisons,
        skipped,
        description,
    }
}

fn describe(symbol: &str, stock_return: f64, comparisons: &[BenchmarkComparison]) -> String {
    let mut parts = vec![format!("{symbol}: {stock_return:+.2}%")];
    for comparison in comparisons {
        let status = if comparison.outperforming {
            "outperforming"
        } else {
            "underperforming"
        };
        parts.push(format!(
            "vs {} ({:+.2}%): {} by {:+.2}%",
            comparison.name, comparison.benchmark_return, status, comparison.relative
        ));
    }
    parts.join(" | ")
}

/// Formats relative strength as a report block, with warnings when the
/// comparison conflicts with the current flow state.
#[must_use]
pub fn format_relative_strength(strength: &RelativeStrength, flow_state: FlowState) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("═══════════════════════════════════════════════════════════════\n");
    output.push_str("                  RELATIVE STRENGTH ANALYSIS                   \n");
    output.push_str("═══════════════════════════════════════════════════════════════\n");
    output.push('\n');
    output.push_str(&strength.description);
    output.push('\n');

    if !strength.skipped.is_empty() {
        output.push_str(&format!(
            "Skipped benchmarks (insufficient data): {}\n",
            strength.skipped.join(", ")
        ));
    }

    for comparison in &strength.comparisons {
        if flow_state == FlowState::On && !comparison.outperforming {
            output.push('\n');
            output.push_str(&format!(
                "WARNING: flow is ON but the stock is underperforming {}.\n",
                comparison.name
            ));
            output.push_str("         This may indicate a weak or false signal.\n");
        }
        if flow_state == FlowState::Off && comparison.outperforming {
            output.push('\n');
            output.push_str(&format!(
                "NOTE: flow is OFF but the stock is outperforming {}.\n",
                comparison.name
            ));
            output.push_str("      The stock may have momentum independent of borrow pressure.\n");
        }
    }

    output.push('\n');
    output.push_str("═══════════════════════════════════════════════════════════════\n");
    output
}

/// Checks whether price action sits outside what borrow pressure explains.
///
/// When flow is OFF and the borrow rate is below the tension threshold, a
/// large stock move or a wide divergence from the benchmarks suggests a
/// non-mechanical driver. Returns a hint in that case, `None` otherwise.
#[must_use]
pub fn narrative_boundary_hint(
    strength: &RelativeStrength,
    flow_state: FlowState,
    borrow_rate: f64,
    tension_threshold: f64,
) -> Option<String> {
    if flow_state != FlowState::Off || borrow_rate >= tension_threshold {
        return None;
    }

    let significant_move = strength.stock_return.abs() > SIGNIFICANT_MOVE_PCT;
    let significant_divergence = strength
        .comparisons
        .iter()
        .any(|comparison| comparison.relative.abs() > SIGNIFICANT_DIVERGENCE_PCT);

    if significant_move || significant_divergence {
        Some(
            "HINT: significant price movement without flow pressure detected.\n      \
             Consider narrative analysis for non-mechanical drivers."
                .to_string(),
        )
    } else {
        None
    }
}
