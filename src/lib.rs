//! TokenBR Legal — lead capture funnel and submission relay.

pub mod analytics;
pub mod config;
pub mod counters;
pub mod dashboard;
pub mod error;
pub mod format;
pub mod funnel;
pub mod lead;
pub mod relay;
pub mod simulation;
pub mod submit;
