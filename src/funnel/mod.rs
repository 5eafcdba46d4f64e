//! Lead capture funnel — the client-held view-state machine.
//!
//! The lead moves through four views (landing, registration, simulation,
//! dashboard). `FunnelState::update` is the pure transition function;
//! `Funnel` wraps it, tracks interactions, fires the lead submission when
//! the lead leaves registration, and ticks the cosmetic engagement counters.

pub mod machine;
pub mod state;
pub mod view;

pub use machine::{CounterTicker, Funnel, spawn_counter_ticker};
pub use state::{Action, Effect, FunnelState};
pub use view::View;
