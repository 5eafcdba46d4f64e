//! Submission relay — the server side of lead capture.
//!
//! A stateless handler: validate the minimal contract, log the receipt,
//! copy the payload to the webhook if one is configured. Webhook failures
//! never reach the caller.

pub mod routes;
pub mod webhook;

pub use routes::{RelayState, relay_routes};
pub use webhook::WebhookForwarder;
