//! Analyze command: run the flow state monitor over a market CSV.

use anyhow::{Context, Result};
use clap::Args;
use flowstate_context::{
    analyze_relative_strength, format_relative_strength, narrative_boundary_hint, RelativeStrength,
};
use flowstate_core::{ConfigLoader, FlowState, MonitorConfig, DEFAULT_CONFIG_PATH};
use flowstate_data::{load_market_csv, load_price_csv, CsvColumns, MarketSeries};
use flowstate_signals::{Analysis, FlowStateMonitor};
use std::path::PathBuf;

/// Arguments for the analyze command.
#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Market data CSV with borrow rate and closing price columns
    #[arg(long)]
    pub csv: PathBuf,

    /// Column holding the daily borrow rate
    #[arg(long, default_value = "borrow_rate")]
    pub borrow_col: String,

    /// Column holding the daily closing price
    #[arg(long, default_value = "close")]
    pub price_col: String,

    /// Configuration file path
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Benchmark price CSV as NAME=FILE (repeatable)
    #[arg(long = "benchmark", value_name = "NAME=FILE", value_parser = parse_benchmark_spec)]
    pub benchmarks: Vec<(String, PathBuf)>,

    /// Symbol label for the analyzed series
    #[arg(long, default_value = "STOCK")]
    pub symbol: String,

    /// Emit a JSON document instead of the formatted report
    #[arg(long)]
    pub json: bool,
}

/// Runs the analyze command, returning the process exit code.
///
/// The exit code carries the final flow state (OFF = 0, ON = 1,
/// WEAKENING = 2); failures map to 3. In JSON mode failures are printed
/// as an error document on stdout instead of bubbling up.
///
/// # Errors
/// Returns an error if configuration, ingestion, or analysis fails and
/// JSON mode is off.
pub fn run_analyze(args: &AnalyzeArgs) -> Result<i32> {
    match analyze(args) {
        Err(err) if args.json => {
            println!("{}", serde_json::json!({ "error": format!("{err:#}") }));
            Ok(3)
        }
        other => other,
    }
}

fn analyze(args: &AnalyzeArgs) -> Result<i32> {
    let config = ConfigLoader::load_from(&args.config)
        .with_context(|| format!("failed to load configuration from {}", args.config.display()))?;

    let columns = CsvColumns {
        borrow_rate: args.borrow_col.clone(),
        close: args.price_col.clone(),
        ..CsvColumns::default()
    };
    let series = load_market_csv(&args.csv, &columns)?;

    let monitor = FlowStateMonitor::new(config.clone())?;
    let analysis = monitor.analyze(&series.borrow_rates(), &series.prices())?;

    let relative_strength = if args.benchmarks.is_empty() {
        None
    } else {
        let benchmarks = load_benchmarks(&args.benchmarks);
        Some(analyze_relative_strength(
            &args.symbol,
            &series.prices(),
            &benchmarks,
        ))
    };

    if args.json {
        print_json(args, &analysis, relative_strength.as_ref())?;
    } else {
        print_report(&config, &series, &analysis, relative_strength.as_ref());
    }

    Ok(analysis
        .classifications
        .last()
        .map_or(0, |day| day.flow_state.exit_code()))
}

/// An unreadable benchmark degrades to an empty series, which the analysis
/// then reports as skipped. Only the stock CSV is fatal.
fn load_benchmarks(specs: &[(String, PathBuf)]) -> Vec<(String, Vec<f64>)> {
    specs
        .iter()
        .map(|(name, path)| {
            let prices = match load_price_csv(path) {
                Ok(prices) => prices,
                Err(err) => {
                    tracing::warn!(benchmark = %name, "failed to load benchmark CSV: {err:#}");
                    Vec::new()
                }
            };
            (name.clone(), prices)
        })
        .collect()
}

fn print_json(
    args: &AnalyzeArgs,
    analysis: &Analysis,
    relative_strength: Option<&RelativeStrength>,
) -> Result<()> {
    let latest = analysis.latest();
    let latest_day = analysis.classifications.last();

    let mut document = serde_json::json!({
        "symbol": args.symbol,
        "market_state": latest_day.map(|day| day.market_state),
        "flow_state": latest_day.map(|day| day.flow_state),
        "signal": latest.map(|result| result.signal),
        "signal_reason": latest.map(|result| result.reason.clone()),
        "summary": analysis.summary(),
        "results": analysis.results,
    });
    if let Some(strength) = relative_strength {
        document["relative_strength"] = serde_json::to_value(strength)?;
    }

    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}

fn print_report(
    config: &MonitorConfig,
    series: &MarketSeries,
    analysis: &Analysis,
    relative_strength: Option<&RelativeStrength>,
) {
    println!("{}", analysis.summary());

    if let Some(strength) = relative_strength {
        let flow_state = analysis
            .classifications
            .last()
            .map_or(FlowState::Off, |day| day.flow_state);
        println!("{}", format_relative_strength(strength, flow_state));

        let borrow_rate = series.borrow_rates().last().copied().unwrap_or(0.0);
        if let Some(hint) = narrative_boundary_hint(
            strength,
            flow_state,
            borrow_rate,
            config.market_state.tension_threshold_percent,
        ) {
            println!("{hint}");
        }
    }
}

fn parse_benchmark_spec(spec: &str) -> Result<(String, PathBuf), String> {
    match spec.split_once('=') {
        Some((name, path)) if !name.trim().is_empty() && !path.trim().is_empty() => {
            Ok((name.trim().to_string(), PathBuf::from(path.trim())))
        }
        _ => Err(format!("expected NAME=FILE, got {spec:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn squeeze_csv() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::with_suffix(".csv").unwrap();
        writeln!(file, "date,borrow_rate,close").unwrap();
        let rows = [
            ("2025-01-02", 1.0, 100.0),
            ("2025-01-03", 1.0, 100.0),
            ("2025-01-06", 1.0, 100.0),
            ("2025-01-07", 1.0, 100.0),
            ("2025-01-08", 1.0, 100.0),
            ("2025-01-09", 1.0, 100.0),
            ("2025-01-10", 1.0, 100.0),
            ("2025-01-13", 6.0, 108.0),
            ("2025-01-14", 11.0, 118.0),
            ("2025-01-15", 14.0, 126.0),
            ("2025-01-16", 14.5, 127.0),
            ("2025-01-17", 13.0, 120.0),
            ("2025-01-21", 10.0, 112.0),
            ("2025-01-22", 7.0, 105.0),
            ("2025-01-23", 5.0, 100.0),
        ];
        for (date, rate, close) in rows {
            writeln!(file, "{date},{rate},{close}").unwrap();
        }
        file.flush().unwrap();
        file
    }

    fn args_for(csv: &std::path::Path) -> AnalyzeArgs {
        AnalyzeArgs {
            csv: csv.to_path_buf(),
            borrow_col: "borrow_rate".to_string(),
            price_col: "close".to_string(),
            config: PathBuf::from("/nonexistent/flowstate.yaml"),
            benchmarks: Vec::new(),
            symbol: "TEST".to_string(),
            json: false,
        }
    }

    #[test]
    fn exit_code_carries_the_final_flow_state() {
        let file = squeeze_csv();
        let code = run_analyze(&args_for(file.path())).unwrap();

        // The fixture ends with the squeeze unwinding.
        assert_eq!(code, FlowState::Weakening.exit_code());
    }

    #[test]
    fn json_mode_swallows_errors_into_a_document() {
        let mut args = args_for(std::path::Path::new("/nonexistent/data.csv"));
        args.json = true;

        let code = run_analyze(&args).unwrap();
        assert_eq!(code, 3);
    }

    #[test]
    fn missing_csv_is_an_error_in_text_mode() {
        let args = args_for(std::path::Path::new("/nonexistent/data.csv"));
        let err = run_analyze(&args).unwrap_err();

        assert!(format!("{err:#}").contains("/nonexistent/data.csv"));
    }

    #[test]
    fn custom_column_names_flow_through() {
        let mut file = tempfile::NamedTempFile::with_suffix(".csv").unwrap();
        writeln!(file, "fee,last").unwrap();
        for _ in 0..6 {
            writeln!(file, "1.0,100.0").unwrap();
        }
        file.flush().unwrap();

        let mut args = args_for(file.path());
        args.borrow_col = "fee".to_string();
        args.price_col = "last".to_string();

        // Quiet series: flow never turns on, exit code 0.
        assert_eq!(run_analyze(&args).unwrap(), 0);
    }

    #[test]
    fn benchmarks_do_not_change_the_exit_code() {
        let file = squeeze_csv();
        let mut benchmark = tempfile::NamedTempFile::with_suffix(".csv").unwrap();
        writeln!(benchmark, "close").unwrap();
        for price in [500.0, 501.0, 502.0, 503.0, 504.0] {
            writeln!(benchmark, "{price}").unwrap();
        }
        benchmark.flush().unwrap();

        let mut args = args_for(file.path());
        args.benchmarks = vec![("SPY".to_string(), benchmark.path().to_path_buf())];

        assert_eq!(run_analyze(&args).unwrap(), FlowState::Weakening.exit_code());
    }

    #[test]
    fn unreadable_benchmark_is_not_fatal() {
        let file = squeeze_csv();
        let mut args = args_for(file.path());
        args.benchmarks = vec![(
            "SPY".to_string(),
            PathBuf::from("/nonexistent/spy.csv"),
        )];

        assert!(run_analyze(&args).is_ok());
    }

    // ============================================================
    // Benchmark Spec Parsing
    // ============================================================

    #[test]
    fn parses_name_equals_file() {
        let (name, path) = parse_benchmark_spec("SPY=data/spy.csv").unwrap();
        assert_eq!(name, "SPY");
        assert_eq!(path, PathBuf::from("data/spy.csv"));
    }

    #[test]
    fn rejects_specs_without_an_equals_sign() {
        assert!(parse_benchmark_spec("SPY").is_err());
    }

    #[test]
    fn rejects_empty_name_or_file() {
        assert!(parse_benchmark_spec("=data/spy.csv").is_err());
        assert!(parse_benchmark_spec("SPY=").is_err());
    }
}
