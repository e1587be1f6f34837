//! Replay command: print the per-day signal trail for a market CSV.

use anyhow::{Context, Result};
use clap::Args;
use flowstate_core::{ConfigLoader, DEFAULT_CONFIG_PATH};
use flowstate_data::{load_market_csv, CsvColumns, MarketSeries};
use flowstate_signals::{Analysis, FlowStateMonitor};
use std::path::PathBuf;

/// Arguments for the replay command.
#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    /// Market data CSV with borrow rate and closing price columns
    #[arg(long)]
    pub csv: PathBuf,

    /// Configuration file path
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Emit the trail as JSON instead of text lines
    #[arg(long)]
    pub json: bool,
}

/// Runs the replay command, returning the process exit code.
///
/// Every day of the series gets one line: index, date when the CSV has
/// one, signal, and the reason the engine gave. The exit code carries the
/// final flow state the same way `analyze` does.
///
/// # Errors
/// Returns an error if configuration, ingestion, or analysis fails and
/// JSON mode is off.
pub fn run_replay(args: &ReplayArgs) -> Result<i32> {
    match replay(args) {
        Err(err) if args.json => {
            println!("{}", serde_json::json!({ "error": format!("{err:#}") }));
            Ok(3)
        }
        other => other,
    }
}

fn replay(args: &ReplayArgs) -> Result<i32> {
    let config = ConfigLoader::load_from(&args.config)
        .with_context(|| format!("failed to load configuration from {}", args.config.display()))?;
    let series = load_market_csv(&args.csv, &CsvColumns::default())?;

    let monitor = FlowStateMonitor::new(config)?;
    let analysis = monitor.analyze(&series.borrow_rates(), &series.prices())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis.results)?);
    } else {
        print_trail(&series, &analysis);
    }

    Ok(analysis
        .classifications
        .last()
        .map_or(0, |day| day.flow_state.exit_code()))
}

fn print_trail(series: &MarketSeries, analysis: &Analysis) {
    for result in &analysis.results {
        let date_label = series
            .date_at(result.day_index)
            .map_or_else(String::new, |date| format!(" {date}"));
        println!(
            "day {:>3}{}  {:<5} {}",
            result.day_index,
            date_label,
            result.signal.to_string(),
            result.reason
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn quiet_csv(days: usize) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::with_suffix(".csv").unwrap();
        writeln!(file, "borrow_rate,close").unwrap();
        for _ in 0..days {
            writeln!(file, "1.0,100.0").unwrap();
        }
        file.flush().unwrap();
        file
    }

    fn args_for(csv: &std::path::Path) -> ReplayArgs {
        ReplayArgs {
            csv: csv.to_path_buf(),
            config: PathBuf::from("/nonexistent/flowstate.yaml"),
            json: false,
        }
    }

    #[test]
    fn quiet_series_replays_to_exit_code_zero() {
        let file = quiet_csv(10);
        assert_eq!(run_replay(&args_for(file.path())).unwrap(), 0);
    }

    #[test]
    fn short_series_still_replays_as_warm_up() {
        // Three days never reach the evaluation threshold, so there is no
        // flow state and the code falls back to 0.
        let file = quiet_csv(3);
        assert_eq!(run_replay(&args_for(file.path())).unwrap(), 0);
    }

    #[test]
    fn json_mode_swallows_errors_into_a_document() {
        let mut args = args_for(std::path::Path::new("/nonexistent/data.csv"));
        args.json = true;

        assert_eq!(run_replay(&args).unwrap(), 3);
    }

    #[test]
    fn missing_csv_is_an_error_in_text_mode() {
        let args = args_for(std::path::Path::new("/nonexistent/data.csv"));
        assert!(run_replay(&args).is_err());
    }
}
