//! Transition-triggered signal engine.
//!
//! The engine is a sequential reducer: it folds `DayClassification` values
//! in strict index order, carrying a small serializable state, and emits one
//! `SignalResult` per day. BUY and SELL are triggered by transitions, never
//! by standing conditions, so replaying a series from day 0 always
//! reproduces the same signal trail.

use crate::day::DayClassification;
use flowstate_core::{FlowState, MarketState, ResultStatus, Signal, SignalConfig};
use serde::{Deserialize, Serialize};

/// Entry requires the market and flow flips to land within this many days
/// of each other.
pub const ENTRY_ALIGNMENT_WINDOW_DAYS: u32 = 1;

/// Flip counters saturate at this age; the entry gate only distinguishes
/// ages 0 and 1.
const MAX_FLIP_AGE_DAYS: u32 = 30;

/// Carry-over state between days.
///
/// Created empty at series start and advanced once per day in index order.
/// BUY/SELL timing depends on when a flip happened, not just that it
/// happened, so this state cannot be recomputed out of order. It is
/// serializable so a caller can persist it and resume a stream later.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalEngineState {
    /// Market state on the most recent evaluated day.
    pub last_market_state: Option<MarketState>,
    /// Flow state on the most recent evaluated day.
    pub last_flow_state: Option<FlowState>,
    /// Evaluated days since the market state last changed. None until a
    /// change has been observed.
    pub days_since_market_flip: Option<u32>,
    /// Evaluated days since the flow state last changed. None until a
    /// change has been observed.
    pub days_since_flow_flip: Option<u32>,
    /// Flow state immediately before its most recent flip. Entry requires
    /// the current ON run to have started from OFF.
    pub flow_flip_from: Option<FlowState>,
    /// Consecutive evaluated days with the momentum EMA below the exit
    /// deadband.
    pub momentum_exhaustion_streak: u32,
    /// Most recent actionable signal (BUY or SELL).
    pub last_signal: Option<Signal>,
}

/// One day's decision with its audit trail.
///
/// `market_state`, `flow_state`, `borrow_delta`, and `borrow_momentum_ema`
/// are None only on warm-up days, where they are undefined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalResult {
    /// Zero-based index into the input series.
    pub day_index: usize,
    pub signal: Signal,
    pub status: ResultStatus,
    /// Names exactly which condition produced the signal.
    pub reason: String,
    pub market_state: Option<MarketState>,
    pub flow_state: Option<FlowState>,
    pub borrow_rate: f64,
    pub borrow_delta: Option<f64>,
    pub borrow_momentum_ema: Option<f64>,
}

impl SignalResult {
    /// Warm-up placeholder: a forced HOLD with a distinguishing status so
    /// callers can tell "no signal" from "not enough data yet".
    #[must_use]
    pub fn insufficient_history(
        day_index: usize,
        borrow_rate: f64,
        available: usize,
        required: usize,
    ) -> Self {
        Self {
            day_index,
            signal: Signal::Hold,
            status: ResultStatus::InsufficientHistory,
            reason: format!("HOLD: insufficient history ({available} of {required} days)"),
            market_state: None,
            flow_state: None,
            borrow_rate,
            borrow_delta: None,
            borrow_momentum_ema: None,
        }
    }
}

/// Sequential BUY/SELL/HOLD reducer over classified days.
#[derive(Debug, Clone)]
pub struct SignalEngine {
    config: SignalConfig,
}

impl SignalEngine {
    #[must_use]
    pub fn new(config: SignalConfig) -> Self {
        Self { config }
    }

    /// Advances the state by one evaluated day and returns that day's result.
    ///
    /// Days must be fed in strict index order. SELL is checked before BUY:
    /// when both conditions land on the same day, exhaustion wins.
    pub fn step(&self, state: &mut SignalEngineState, day: &DayClassification) -> SignalResult {
        // Flip bookkeeping against yesterday's observed states. The first
        // evaluated day has no previous observation, so nothing counts as a
        // flip and the counters stay unset.
        let market_flipped = state
            .last_market_state
            .is_some_and(|prev| prev != day.market_state);
        let flow_flipped = state
            .last_flow_state
            .is_some_and(|prev| prev != day.flow_state);

        if market_flipped {
            state.days_since_market_flip = Some(0);
        } else if let Some(age) = state.days_since_market_flip {
            state.days_since_market_flip = Some((age + 1).min(MAX_FLIP_AGE_DAYS));
        }

        if flow_flipped {
            state.flow_flip_from = state.last_flow_state;
            state.days_since_flow_flip = Some(0);
        } else if let Some(age) = state.days_since_flow_flip {
            state.days_since_flow_flip = Some((age + 1).min(MAX_FLIP_AGE_DAYS));
        }

        // Exhaustion streak against the exit deadband. This is the small
        // epsilon, not the momentum classification threshold.
        let exhausted = day.borrow_momentum_ema < -self.config.epsilon;
        state.momentum_exhaustion_streak = if exhausted {
            state.momentum_exhaustion_streak.saturating_add(1)
        } else {
            0
        };

        let confirmation = self.config.exit_confirmation_days;
        let (signal, reason) = if exhausted && state.momentum_exhaustion_streak == confirmation {
            (
                Signal::Sell,
                format!(
                    "EXIT: borrow momentum EMA below -{} for {} consecutive day(s), constraint exhaustion",
                    self.config.epsilon, state.momentum_exhaustion_streak
                ),
            )
        } else if let Some((market_age, flow_age)) = Self::entry_alignment(state, day) {
            (
                Signal::Buy,
                format!(
                    "ENTRY: market_state and flow_state aligned OFF->ON within {ENTRY_ALIGNMENT_WINDOW_DAYS} day(s) \
                     (market flipped {market_age} day(s) ago, flow flipped {flow_age} day(s) ago)"
                ),
            )
        } else if exhausted && state.momentum_exhaustion_streak < confirmation {
            (
                Signal::Hold,
                format!(
                    "HOLD: exhaustion streak {} of {} day(s), awaiting exit confirmation",
                    state.momentum_exhaustion_streak, confirmation
                ),
            )
        } else if exhausted {
            (
                Signal::Hold,
                "HOLD: constraint exhausted, exit already signaled".to_string(),
            )
        } else if state.last_signal == Some(Signal::Buy) {
            (
                Signal::Hold,
                "HOLD: entry active, no exit condition met".to_string(),
            )
        } else {
            (Signal::Hold, "HOLD: entry conditions not met".to_string())
        };

        if signal.is_actionable() {
            state.last_signal = Some(signal);
        }
        state.last_market_state = Some(day.market_state);
        state.last_flow_state = Some(day.flow_state);

        SignalResult {
            day_index: day.day_index,
            signal,
            status: ResultStatus::Evaluated,
            reason,
            market_state: Some(day.market_state),
            flow_state: Some(day.flow_state),
            borrow_rate: day.borrow_rate,
            borrow_delta: Some(day.borrow_delta),
            borrow_momentum_ema: Some(day.borrow_momentum_ema),
        }
    }

    /// Checks the entry gate and returns the two flip ages when it passes.
    ///
    /// Entry needs: both states ON today, both flips observed and at most
    /// one day old, at least one flip landing today, and the flow run
    /// entered from OFF. A state that has been ON since before observation
    /// began (counter unset) is by definition past the window.
    fn entry_alignment(state: &SignalEngineState, day: &DayClassification) -> Option<(u32, u32)> {
        if day.market_state != MarketState::On || day.flow_state != FlowState::On {
            return None;
        }
        let (market_age, flow_age) =
            match (state.days_since_market_flip, state.days_since_flow_flip) {
                (Some(market_age), Some(flow_age)) => (market_age, flow_age),
                _ => return None,
            };

        let one_flip_today = market_age == 0 || flow_age == 0;
        let inside_window = market_age <= ENTRY_ALIGNMENT_WINDOW_DAYS
            && flow_age <= ENTRY_ALIGNMENT_WINDOW_DAYS;
        let entered_from_off = state.flow_flip_from == Some(FlowState::Off);

        if one_flip_today && inside_window && entered_from_off {
            Some((market_age, flow_age))
        } else {
            None
        }
    }
}
