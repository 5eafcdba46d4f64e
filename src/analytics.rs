//! Interaction tracking.
//!
//! Every tracked event is logged. When an analytics identifier is configured,
//! events are also reported to an [`EventSink`]; without one, reporting is
//! silently disabled.

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Map, Value, json};
use tracing::{debug, info};
use uuid::Uuid;

use crate::funnel::View;
use crate::lead::UserType;

/// Category attached to every event.
pub const EVENT_CATEGORY: &str = "MVP_Validation";

/// Default Measurement Protocol collection endpoint.
pub const DEFAULT_COLLECT_URL: &str = "https://www.google-analytics.com/mp/collect";

/// A tracked interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyticsEvent {
    UserTypeSelected { user_type: UserType },
    SimulationCalculated { user_type: UserType, amount: Decimal, headline: Decimal },
    FormSubmitted { user_type: Option<UserType> },
    PageView { page: View },
    MatchClicked { index: usize },
    FeedbackSubmitted { feedback: String },
    EarlyAdopterClicked,
}

impl AnalyticsEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::UserTypeSelected { .. } => "user_type_selected",
            Self::SimulationCalculated { .. } => "simulation_calculated",
            Self::FormSubmitted { .. } => "form_submitted",
            Self::PageView { .. } => "page_view",
            Self::MatchClicked { .. } => "match_clicked",
            Self::FeedbackSubmitted { .. } => "feedback_submitted",
            Self::EarlyAdopterClicked => "early_adopter_clicked",
        }
    }

    /// Event-specific properties, before the common category/label.
    fn properties(&self) -> Map<String, Value> {
        let value = match self {
            Self::UserTypeSelected { user_type } => json!({ "userType": user_type.as_str() }),
            Self::SimulationCalculated { user_type, amount, headline } => {
                let headline_key = match user_type {
                    UserType::Business => "economia",
                    UserType::Investor => "retornoMensal",
                };
                let mut props = json!({
                    "tipo": user_type.as_str(),
                    "valor": amount.to_f64(),
                });
                props[headline_key] = json!(headline.to_f64());
                props
            }
            Self::FormSubmitted { user_type } => {
                json!({ "userType": user_type.map(|t| t.as_str()) })
            }
            Self::PageView { page } => json!({ "page": page.as_str() }),
            Self::MatchClicked { index } => json!({ "index": index }),
            Self::FeedbackSubmitted { feedback } => json!({ "feedback": feedback }),
            Self::EarlyAdopterClicked => json!({}),
        };
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    /// Full parameter bag as reported: category, label, then properties.
    pub fn params(&self, label: Option<UserType>) -> Value {
        let mut params = Map::new();
        params.insert("event_category".into(), json!(EVENT_CATEGORY));
        params.insert(
            "event_label".into(),
            json!(label.map(|t| t.as_str()).unwrap_or("unknown")),
        );
        params.extend(self.properties());
        Value::Object(params)
    }
}

/// Destination for reported events.
pub trait EventSink: Send + Sync {
    fn report(&self, client_id: &str, name: &str, params: Value);
}

/// Reports events to a Measurement Protocol style collector.
///
/// Each report is a detached POST; failures are logged at debug and dropped.
pub struct MeasurementCollector {
    client: reqwest::Client,
    collect_url: String,
    measurement_id: String,
    api_secret: Option<String>,
}

impl MeasurementCollector {
    pub fn new(measurement_id: String, collect_url: String, api_secret: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            collect_url,
            measurement_id,
            api_secret,
        }
    }

    fn request(&self, body: &Value) -> reqwest::RequestBuilder {
        let mut request = self
            .client
            .post(&self.collect_url)
            .query(&[("measurement_id", self.measurement_id.as_str())]);
        if let Some(ref secret) = self.api_secret {
            request = request.query(&[("api_secret", secret.as_str())]);
        }
        request.json(body)
    }
}

impl EventSink for MeasurementCollector {
    fn report(&self, client_id: &str, name: &str, params: Value) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            debug!(event = name, "No async runtime; analytics event not reported");
            return;
        };

        let body = json!({
            "client_id": client_id,
            "events": [{ "name": name, "params": params }],
        });
        let request = self.request(&body);
        let name = name.to_string();
        handle.spawn(async move {
            match request.send().await {
                Ok(resp) if !resp.status().is_success() => {
                    debug!(event = %name, status = %resp.status(), "Analytics collector rejected event");
                }
                Ok(_) => {}
                Err(e) => debug!(event = %name, error = %e, "Analytics report failed"),
            }
        });
    }
}

/// Logs every event and forwards it to the sink, if one is configured.
#[derive(Clone)]
pub struct Tracker {
    client_id: Uuid,
    sink: Option<Arc<dyn EventSink>>,
}

impl Tracker {
    pub fn new(sink: Option<Arc<dyn EventSink>>) -> Self {
        Self {
            client_id: Uuid::new_v4(),
            sink,
        }
    }

    /// A tracker that only logs.
    pub fn disabled() -> Self {
        Self::new(None)
    }

    pub fn client_id(&self) -> Uuid {
        self.client_id
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    pub fn track(&self, event: &AnalyticsEvent, label: Option<UserType>) {
        let params = event.params(label);
        info!(event = event.name(), properties = %params, "Tracked event");
        if let Some(ref sink) = self.sink {
            sink.report(&self.client_id.to_string(), event.name(), params);
        }
    }
}
