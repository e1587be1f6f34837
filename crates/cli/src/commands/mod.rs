//! CLI commands for the flow state monitor.

pub mod analyze;
pub mod check_config;
pub mod replay;

pub use analyze::{run_analyze, AnalyzeArgs};
pub use check_config::{run_check_config, CheckConfigArgs};
pub use replay::{run_replay, ReplayArgs};
