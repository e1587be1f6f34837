//! Flow-state combinator.

use flowstate_core::{BorrowLevel, BorrowTrend, FlowState, MomentumClass};

/// Combines the day's regimes into a flow state.
///
/// ON requires an elevated borrow level plus at least one supporting
/// indicator: positive momentum, strengthening delta, or a price spike.
/// WEAKENING requires an elevated level with momentum or delta fading.
/// Everything else is OFF, including an elevated level with nothing behind
/// it: expensive borrow alone is tension, not flow. ON wins when a day
/// qualifies for both.
#[must_use]
pub fn classify_flow(
    level: BorrowLevel,
    trend: BorrowTrend,
    momentum: MomentumClass,
    price_spike: bool,
) -> FlowState {
    if !level.is_elevated() {
        return FlowState::Off;
    }

    let building = momentum == MomentumClass::Positive
        || trend == BorrowTrend::Strengthening
        || price_spike;
    if building {
        return FlowState::On;
    }

    let fading = momentum == MomentumClass::Negative || trend == BorrowTrend::Weakening;
    if fading {
        return FlowState::Weakening;
    }

    FlowState::Off
}
