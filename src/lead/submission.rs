//! Lead submission payload — the JSON body exchanged with the relay.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::model::{LeadDraft, LeadProfile};
use crate::counters::EngagementCounters;
use crate::error::RelayError;
use crate::simulation::SimulationResult;

/// Message returned to callers missing a required field.
pub const MISSING_REQUIRED_MESSAGE: &str = "Email e tipo de usuário são obrigatórios";

/// A lead as posted to `/api/submit-form`.
///
/// Every field is optional on the wire. `simulation` and `analytics` are
/// opaque snapshots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSubmission {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cnpj: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub razao_social: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faturamento: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nome: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpf: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renda: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perfil_risco: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulation: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analytics: Option<Value>,
}

impl LeadSubmission {
    /// Build the payload for the active profile only. Fields of the inactive
    /// variant never leave the client.
    pub fn from_draft(
        draft: &LeadDraft,
        simulation: Option<&SimulationResult>,
        counters: &EngagementCounters,
        now: DateTime<Utc>,
    ) -> Self {
        let mut submission = Self {
            user_type: draft.user_type.map(|t| t.as_str().to_string()),
            email: non_empty(&draft.email),
            timestamp: Some(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
            simulation: simulation.map(SimulationResult::to_wire),
            analytics: Some(counters.to_wire()),
            ..Default::default()
        };

        match draft.profile() {
            Some(LeadProfile::Business(p)) => {
                submission.cnpj = non_empty(&p.cnpj);
                submission.razao_social = non_empty(&p.legal_name);
                submission.faturamento = non_empty(&p.revenue);
                submission.setor = non_empty(&p.sector);
            }
            Some(LeadProfile::Investor(p)) => {
                submission.nome = non_empty(&p.full_name);
                submission.cpf = non_empty(&p.cpf);
                submission.renda = non_empty(&p.income);
                submission.perfil_risco = non_empty(&p.risk_profile);
            }
            None => {}
        }

        submission
    }
}

/// What the relay logs about an accepted lead.
///
/// Read straight from the received JSON so a lead whose optional fields have
/// unexpected types is still accepted and forwarded untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadReceipt {
    pub user_type: String,
    pub email: String,
    pub timestamp: Option<String>,
    pub has_simulation: bool,
}

impl LeadReceipt {
    /// Apply the required-field rule: `email` and `userType` must be
    /// present and truthy. A `null` body cannot be inspected at all.
    pub fn from_payload(payload: &Value) -> Result<Self, RelayError> {
        if payload.is_null() {
            return Err(RelayError::Unexpected("submission body is null".to_string()));
        }

        let email = payload.get("email").filter(|v| is_truthy(v));
        let user_type = payload.get("userType").filter(|v| is_truthy(v));
        let (Some(email), Some(user_type)) = (email, user_type) else {
            return Err(RelayError::Validation(MISSING_REQUIRED_MESSAGE.to_string()));
        };

        Ok(Self {
            user_type: display_value(user_type),
            email: display_value(email),
            timestamp: payload
                .get("timestamp")
                .filter(|v| !v.is_null())
                .map(display_value),
            has_simulation: payload.get("simulation").is_some_and(is_truthy),
        })
    }
}

/// Web-client truthiness: `null`, `false`, zero and `""` are falsy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() { None } else { Some(s.to_string()) }
}
