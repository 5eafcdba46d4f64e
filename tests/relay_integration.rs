//! Integration tests for the submission relay and the funnel's use of it.
//!
//! Each test spins up the relay (and, where needed, a webhook receiver) on a
//! random port and exercises the real HTTP contract with reqwest.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::time::timeout;

use tokenbr_legal::analytics::Tracker;
use tokenbr_legal::config::RelayConfig;
use tokenbr_legal::counters::EngagementCounters;
use tokenbr_legal::funnel::{Funnel, View};
use tokenbr_legal::lead::{Field, UserType};
use tokenbr_legal::relay::{RelayState, relay_routes};
use tokenbr_legal::submit::HttpSubmitter;

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// An address nothing listens on.
const DEAD_WEBHOOK: &str = "http://127.0.0.1:9/hook";

async fn serve(app: Router) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give the server a moment to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;
    port
}

/// Start the relay, return its port.
async fn start_relay(config: RelayConfig) -> u16 {
    serve(relay_routes(RelayState::new(config))).await
}

/// Start a webhook receiver answering `status`; every payload it gets is
/// pushed onto the returned channel.
async fn start_webhook(status: StatusCode) -> (String, mpsc::UnboundedReceiver<Value>) {
    let (tx, rx) = mpsc::unbounded_channel();

    async fn receive(
        State((tx, status)): State<(mpsc::UnboundedSender<Value>, StatusCode)>,
        Json(payload): Json<Value>,
    ) -> StatusCode {
        let _ = tx.send(payload);
        status
    }

    let app = Router::new()
        .route("/hook", post(receive))
        .with_state((tx, status));
    let port = serve(app).await;
    (format!("http://127.0.0.1:{port}/hook"), rx)
}

fn submit_url(port: u16) -> String {
    format!("http://127.0.0.1:{port}/api/submit-form")
}

// ── Status ──────────────────────────────────────────────────────────

#[tokio::test]
async fn rest_status_endpoint() {
    timeout(TEST_TIMEOUT, async {
        let port = start_relay(RelayConfig::default()).await;

        let resp = reqwest::get(submit_url(port)).await.unwrap();
        assert_eq!(resp.status(), 200);

        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["status"], "OK");
        assert_eq!(body["service"], "TokenBR Legal API");
        assert!(body["version"].is_string());
        assert!(body["timestamp"].is_string());
    })
    .await
    .expect("test timed out");
}

// ── Submission contract ─────────────────────────────────────────────

#[tokio::test]
async fn rest_submit_accepts_minimal_lead() {
    timeout(TEST_TIMEOUT, async {
        let port = start_relay(RelayConfig::default()).await;

        let resp = reqwest::Client::new()
            .post(submit_url(port))
            .json(&json!({"userType": "empresa", "email": "a@b.com"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);

        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["success"], true);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn rest_submit_without_email_is_400() {
    timeout(TEST_TIMEOUT, async {
        let port = start_relay(RelayConfig::default()).await;

        let resp = reqwest::Client::new()
            .post(submit_url(port))
            .json(&json!({"userType": "empresa"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);

        let body: Value = resp.json().await.unwrap();
        assert!(body["error"].as_str().is_some_and(|s| !s.is_empty()));
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn rest_submit_malformed_json_is_500() {
    timeout(TEST_TIMEOUT, async {
        let port = start_relay(RelayConfig::default()).await;

        let resp = reqwest::Client::new()
            .post(submit_url(port))
            .header("content-type", "application/json")
            .body("{\"userType\": ")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 500);
    })
    .await
    .expect("test timed out");
}

// ── Webhook forwarding ──────────────────────────────────────────────

#[tokio::test]
async fn webhook_receives_payload_verbatim() {
    timeout(TEST_TIMEOUT, async {
        let (hook_url, mut hook_rx) = start_webhook(StatusCode::OK).await;
        let port = start_relay(RelayConfig::default().with_webhook(hook_url)).await;

        let payload = json!({
            "userType": "investidor",
            "email": "maria@example.com",
            "nome": "Maria",
            "simulation": {"tipo": "investidor", "valor": 10000},
            "utm_source": "newsletter"
        });
        let resp = reqwest::Client::new()
            .post(submit_url(port))
            .json(&payload)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);

        let forwarded = hook_rx.recv().await.unwrap();
        assert_eq!(forwarded, payload);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn numeric_optional_fields_are_accepted_and_forwarded() {
    timeout(TEST_TIMEOUT, async {
        let (hook_url, mut hook_rx) = start_webhook(StatusCode::OK).await;
        let port = start_relay(RelayConfig::default().with_webhook(hook_url)).await;

        let payload = json!({
            "userType": "empresa",
            "email": "a@b.com",
            "cnpj": 12345678000190u64,
            "timestamp": 1767225600000u64
        });
        let resp = reqwest::Client::new()
            .post(submit_url(port))
            .json(&payload)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);

        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["success"], true);

        let forwarded = hook_rx.recv().await.unwrap();
        assert_eq!(forwarded, payload);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn rejected_lead_is_not_forwarded() {
    timeout(TEST_TIMEOUT, async {
        let (hook_url, mut hook_rx) = start_webhook(StatusCode::OK).await;
        let port = start_relay(RelayConfig::default().with_webhook(hook_url)).await;

        let resp = reqwest::Client::new()
            .post(submit_url(port))
            .json(&json!({"email": "a@b.com"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
        assert!(hook_rx.try_recv().is_err());
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn unreachable_webhook_still_returns_success() {
    timeout(TEST_TIMEOUT, async {
        let port = start_relay(RelayConfig::default().with_webhook(DEAD_WEBHOOK)).await;

        let resp = reqwest::Client::new()
            .post(submit_url(port))
            .json(&json!({"userType": "empresa", "email": "a@b.com"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);

        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["success"], true);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn erroring_webhook_still_returns_success() {
    timeout(TEST_TIMEOUT, async {
        let (hook_url, mut hook_rx) = start_webhook(StatusCode::INTERNAL_SERVER_ERROR).await;
        let port = start_relay(RelayConfig::default().with_webhook(hook_url)).await;

        let resp = reqwest::Client::new()
            .post(submit_url(port))
            .json(&json!({"userType": "empresa", "email": "a@b.com"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        assert!(hook_rx.recv().await.is_some());
    })
    .await
    .expect("test timed out");
}

// ── Funnel → relay → webhook ────────────────────────────────────────

#[tokio::test]
async fn funnel_submission_reaches_webhook() {
    timeout(TEST_TIMEOUT, async {
        let (hook_url, mut hook_rx) = start_webhook(StatusCode::OK).await;
        let port = start_relay(RelayConfig::default().with_webhook(hook_url)).await;

        let funnel = Funnel::new(
            Arc::new(HttpSubmitter::new(&format!("http://127.0.0.1:{port}"))),
            Tracker::disabled(),
            EngagementCounters::default(),
        );

        funnel.advance(View::Registration).await.unwrap();
        funnel.select_profile(UserType::Business).await.unwrap();
        funnel.update_field(Field::TaxId, "12.345.678/0001-90").await.unwrap();
        funnel.update_field(Field::MonthlyRevenue, "50k-200k").await.unwrap();
        funnel.update_field(Field::Email, "financeiro@acme.com.br").await.unwrap();

        let handle = funnel.advance(View::Simulation).await.unwrap().unwrap();
        assert_eq!(funnel.view().await, View::Simulation);
        handle.await.unwrap();

        let forwarded = hook_rx.recv().await.unwrap();
        assert_eq!(forwarded["userType"], "empresa");
        assert_eq!(forwarded["cnpj"], "12.345.678/0001-90");
        assert_eq!(forwarded["faturamento"], "50k-200k");
        assert_eq!(forwarded["email"], "financeiro@acme.com.br");
        assert_eq!(forwarded["analytics"]["empresas"], 247);
        assert!(forwarded.get("simulation").is_none());
        assert!(funnel.can_continue().await);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn funnel_navigates_even_when_relay_rejects() {
    timeout(TEST_TIMEOUT, async {
        let port = start_relay(RelayConfig::default()).await;

        let funnel = Funnel::new(
            Arc::new(HttpSubmitter::new(&format!("http://127.0.0.1:{port}"))),
            Tracker::disabled(),
            EngagementCounters::default(),
        );

        // No email: the relay answers 400.
        funnel.advance(View::Registration).await.unwrap();
        funnel.select_profile(UserType::Investor).await.unwrap();
        let handle = funnel.advance(View::Simulation).await.unwrap().unwrap();
        handle.await.unwrap();

        assert_eq!(funnel.view().await, View::Simulation);
        assert!(funnel.can_continue().await);

        funnel.set_amount("10000").await.unwrap();
        funnel.advance(View::Dashboard).await.unwrap();
        assert_eq!(funnel.view().await, View::Dashboard);
    })
    .await
    .expect("test timed out");
}
