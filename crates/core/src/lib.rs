pub mod config;
pub mod config_loader;
pub mod error;
pub mod states;

pub use config::{
    BorrowDeltaConfig, BorrowLevelConfig, BorrowMomentumConfig, MarketStateConfig, MonitorConfig,
    PriceBehaviorConfig, SignalConfig,
};
pub use config_loader::{ConfigLoader, DEFAULT_CONFIG_PATH};
pub use error::MonitorError;
pub use states::{
    BorrowLevel, BorrowTrend, FlowState, MarketState, MomentumClass, ResultStatus, Signal,
};
