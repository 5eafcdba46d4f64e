//! Configuration types, read from the environment.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::analytics::{DEFAULT_COLLECT_URL, EventSink, MeasurementCollector, Tracker};
use crate::counters::{EngagementCounters, TICK_INTERVAL};
use crate::error::ConfigError;

/// Service identity reported by the status endpoint.
pub const SERVICE_NAME: &str = "TokenBR Legal API";

/// Relay server configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// Optional destination that receives a copy of every accepted lead.
    pub webhook_url: Option<String>,
    pub service_name: String,
    pub version: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            webhook_url: None,
            service_name: SERVICE_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl RelayConfig {
    /// Reads `TOKENBR_BIND` (or `PORT`) and `FORM_WEBHOOK_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(bind) = non_empty_env("TOKENBR_BIND") {
            config.bind_addr = bind.parse().map_err(|e| ConfigError::InvalidValue {
                key: "TOKENBR_BIND".to_string(),
                message: format!("{e}"),
            })?;
        } else if let Some(port) = non_empty_env("PORT") {
            let port: u16 = port.parse().map_err(|e| ConfigError::InvalidValue {
                key: "PORT".to_string(),
                message: format!("{e}"),
            })?;
            config.bind_addr.set_port(port);
        }

        config.webhook_url = non_empty_env("FORM_WEBHOOK_URL");
        Ok(config)
    }

    pub fn with_webhook(mut self, url: impl Into<String>) -> Self {
        self.webhook_url = Some(url.into());
        self
    }
}

/// Client-side funnel configuration.
#[derive(Debug, Clone)]
pub struct FunnelConfig {
    /// Base URL of the relay, e.g. `http://localhost:3000`.
    pub relay_base_url: String,
    /// Analytics identifier. `None` disables event reporting.
    pub analytics_id: Option<String>,
    pub analytics_collect_url: String,
    pub analytics_api_secret: Option<String>,
    pub tick_interval: Duration,
    pub seed_counters: EngagementCounters,
}

impl Default for FunnelConfig {
    fn default() -> Self {
        Self {
            relay_base_url: "http://127.0.0.1:3000".to_string(),
            analytics_id: None,
            analytics_collect_url: DEFAULT_COLLECT_URL.to_string(),
            analytics_api_secret: None,
            tick_interval: TICK_INTERVAL,
            seed_counters: EngagementCounters::default(),
        }
    }
}

impl FunnelConfig {
    /// Reads `TOKENBR_RELAY_URL`, `GOOGLE_ANALYTICS_ID`,
    /// `GOOGLE_ANALYTICS_API_SECRET` and `ANALYTICS_COLLECT_URL`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(url) = non_empty_env("TOKENBR_RELAY_URL") {
            config.relay_base_url = url;
        }
        if let Some(url) = non_empty_env("ANALYTICS_COLLECT_URL") {
            config.analytics_collect_url = url;
        }
        config.analytics_id = non_empty_env("GOOGLE_ANALYTICS_ID");
        config.analytics_api_secret = non_empty_env("GOOGLE_ANALYTICS_API_SECRET");
        config
    }

    /// Build the tracker: reporting is enabled only with an analytics id.
    pub fn tracker(&self) -> Tracker {
        let sink = self.analytics_id.as_ref().map(|id| {
            Arc::new(MeasurementCollector::new(
                id.clone(),
                self.analytics_collect_url.clone(),
                self.analytics_api_secret.clone(),
            )) as Arc<dyn EventSink>
        });
        Tracker::new(sink)
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
