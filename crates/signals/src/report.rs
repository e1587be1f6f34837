#![allow(clippy::format_push_string)]

use crate::monitor::Analysis;
use flowstate_core::ResultStatus;

pub struct ReportFormatter;

impl ReportFormatter {
    #[must_use]
    pub fn format(analysis: &Analysis) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push_str("                    FLOW STATE REPORT                          \n");
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        if analysis.results.is_empty() {
            output.push_str("No data analyzed.\n");
            output.push('\n');
            output.push_str("═══════════════════════════════════════════════════════════════\n");
            return output;
        }

        // Series
        output.push_str("Series\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!(
            "Days Analyzed:         {}\n",
            analysis.results.len()
        ));
        output.push_str(&format!(
            "Evaluated:             {}\n",
            analysis.classifications.len()
        ));
        output.push_str(&format!(
            "Warm-Up Days:          {}\n",
            analysis.warm_up_days()
        ));
        output.push('\n');

        // Latest Day
        output.push_str("Latest Day\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        if let Some(result) = analysis.latest() {
            output.push_str(&format!("Borrow Rate:           {:.2}%\n", result.borrow_rate));
            if let Some(day) = analysis.latest_classification() {
                output.push_str(&format!(
                    "Borrow Delta:          {:+.2} pct points\n",
                    day.borrow_delta
                ));
                output.push_str(&format!(
                    "Momentum EMA:          {:+.2}\n",
                    day.borrow_momentum_ema
                ));
                output.push_str(&format!("Borrow Level:          {}\n", day.borrow_level));
                output.push_str(&format!("Market State:          {}\n", day.market_state));
                output.push_str(&format!("Flow State:            {}\n", day.flow_state));
                if day.price_spike {
                    output.push_str("Price Spike:           YES\n");
                }
                if day.abnormal_volatility {
                    output.push_str("Abnormal Volatility:   YES\n");
                }
            }
            output.push_str(&format!("Signal:                {}\n", result.signal));
            output.push_str(&format!("Reason:                {}\n", result.reason));
            if result.status == ResultStatus::InsufficientHistory {
                output.push_str("Status:                INSUFFICIENT_HISTORY\n");
            }
        }
        output.push('\n');

        // Signal History
        output.push_str("Signal History\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        let mut any = false;
        for result in analysis.actionable() {
            any = true;
            output.push_str(&format!(
                "Day {:<5} {:<5} {}\n",
                result.day_index,
                result.signal.to_string(),
                result.reason
            ));
        }
        if !any {
            output.push_str("No actionable signals emitted.\n");
        }

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");

        output
    }
}
