pub mod classifier;
pub mod day;
pub mod engine;
pub mod monitor;
pub mod report;

// Re-export the pipeline surface for convenience
pub use classifier::{
    classify_delta, classify_flow, classify_level, classify_market, classify_momentum,
    daily_returns, is_abnormal_volatility, is_price_spike, percent_return, BorrowMomentum,
};
pub use day::{classify_series, DayClassification};
pub use engine::{SignalEngine, SignalEngineState, SignalResult, ENTRY_ALIGNMENT_WINDOW_DAYS};
pub use monitor::{Analysis, FlowStateMonitor};
pub use report::ReportFormatter;
