//! Error types for the TokenBR lead funnel.

use crate::funnel::View;
use crate::lead::{Field, UserType};

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Relay error: {0}")]
    Relay(#[from] RelayError),

    #[error("Funnel error: {0}")]
    Funnel(#[from] FunnelError),

    #[error("Submission error: {0}")]
    Submit(#[from] SubmitError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors raised while handling a lead submission on the relay.
///
/// Only `Validation` and `Unexpected` ever reach the caller; an
/// `UpstreamDelivery` failure is logged and dropped.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Webhook delivery failed: {0}")]
    UpstreamDelivery(String),

    #[error("Unexpected fault: {0}")]
    Unexpected(String),
}

/// Rejected view-state machine actions. The state is left untouched.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FunnelError {
    #[error("Cannot navigate from {from} to {to}")]
    InvalidTransition { from: View, to: View },

    #[error("No profile type selected")]
    NoProfileSelected,

    #[error("Field {field} does not belong to the {user_type} profile")]
    FieldNotInProfile { field: Field, user_type: UserType },

    #[error("A submission is already in flight")]
    SubmissionPending,

    #[error("Feedback is empty")]
    EmptyFeedback,

    #[error("No match card at index {index}")]
    MatchOutOfRange { index: usize },
}

/// Client-side failures calling the relay. Logged only, never surfaced.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Relay rejected submission with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
