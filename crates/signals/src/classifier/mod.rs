//! Per-day regime classifiers.
//!
//! Each classifier is a pure function of the day's inputs and the
//! configuration; nothing here carries history except `BorrowMomentum`,
//! whose EMA state is explicit and serializable.

mod borrow;
mod flow;
mod market;
mod momentum;
mod price;

pub use borrow::{classify_delta, classify_level};
pub use flow::classify_flow;
pub use market::classify_market;
pub use momentum::{classify_momentum, BorrowMomentum};
pub use price::{daily_returns, is_abnormal_volatility, is_price_spike, percent_return};
