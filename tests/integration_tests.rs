use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::{delete, get, post};
use axum::Router;
use tower::ServiceExt;

use tinywed::config::AppConfig;
use tinywed::db;
use tinywed::handlers;
use tinywed::services::payments::{Charge, ChargeError, ChargeRequest, PaymentProvider};
use tinywed::state::AppState;

// ── Mock payment provider ──

struct MockPayments {
    charges: Arc<Mutex<Vec<ChargeRequest>>>,
    decline: Arc<AtomicBool>,
}

#[async_trait]
impl PaymentProvider for MockPayments {
    async fn charge(&self, request: &ChargeRequest) -> Result<Charge, ChargeError> {
        if self.decline.load(Ordering::SeqCst) {
            return Err(ChargeError::Declined("card declined".to_string()));
        }
        let mut charges = self.charges.lock().unwrap();
        charges.push(request.clone());
        Ok(Charge {
            payment_id: format!("pay-{}", charges.len()),
        })
    }
}

// ── Helpers ──

fn test_config() -> AppConfig {
    AppConfig {
        port: 3000,
        database_url: ":memory:".to_string(),
        admin_token: "test-token".to_string(),
        square_access_token: "".to_string(),
        square_location_id: "".to_string(),
        square_environment: "sandbox".to_string(),
        hold_hours: 12,
        reject_past_dates: true,
    }
}

struct TestHarness {
    state: Arc<AppState>,
    charges: Arc<Mutex<Vec<ChargeRequest>>>,
    decline: Arc<AtomicBool>,
}

fn test_harness() -> TestHarness {
    let charges = Arc::new(Mutex::new(vec![]));
    let decline = Arc::new(AtomicBool::new(false));
    let payments = MockPayments {
        charges: Arc::clone(&charges),
        decline: Arc::clone(&decline),
    };

    let conn = db::init_db(":memory:").unwrap();
    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: test_config(),
        payments: Box::new(payments),
    });

    TestHarness {
        state,
        charges,
        decline,
    }
}

fn test_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/bookings", post(handlers::bookings::create_booking))
        .route("/api/bookings/:id", get(handlers::bookings::get_booking))
        .route(
            "/api/bookings/:id/release",
            post(handlers::bookings::release_booking),
        )
        .route("/api/payments/deposit", post(handlers::payments::pay_deposit))
        .route("/api/payments/balance", post(handlers::payments::pay_balance))
        .route(
            "/api/dashboards/:id",
            get(handlers::dashboards::get_dashboard).post(handlers::dashboards::update_dashboard),
        )
        .route(
            "/api/dashboards/:id/services",
            post(handlers::dashboards::add_service),
        )
        .route(
            "/api/dashboards/:id/services/:service_id",
            delete(handlers::dashboards::remove_service),
        )
        .route("/api/vendors", get(handlers::vendors::list_vendors))
        .route(
            "/api/messages",
            get(handlers::messages::get_messages).post(handlers::messages::send_message),
        )
        .route("/api/messages/read", post(handlers::messages::mark_read))
        .route("/api/admin/status", get(handlers::admin::get_status))
        .route("/api/admin/bookings", get(handlers::admin::get_bookings))
        .route(
            "/api/admin/vendors",
            get(handlers::admin::get_vendors).post(handlers::vendors::create_vendor),
        )
        .route(
            "/api/admin/vendors/:id",
            post(handlers::vendors::update_vendor).delete(handlers::vendors::delete_vendor),
        )
        .with_state(state)
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_json_as(uri: &str, email: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-client-email", email)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn admin_get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", "Bearer test-token")
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a hold for `date` and return (booking_id, dashboard_id).
async fn create_hold(app: &Router, date: &str, package: &str, email: &str) -> (String, String) {
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/bookings",
            serde_json::json!({
                "event_date": date,
                "package_type": package,
                "client_email": email,
                "client_name": "Test Couple"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    (
        body["booking_id"].as_str().unwrap().to_string(),
        body["dashboard_id"].as_str().unwrap().to_string(),
    )
}

fn expire_hold(state: &AppState, booking_id: &str) {
    let conn = state.db.lock().unwrap();
    conn.execute(
        "UPDATE bookings SET held_until = '2020-01-01 00:00:00' WHERE id = ?1",
        rusqlite::params![booking_id],
    )
    .unwrap();
}

// ── Tests ──

#[tokio::test]
async fn test_health() {
    let harness = test_harness();
    let app = test_app(harness.state);

    let response = app.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_hold_request_creates_booking() {
    let harness = test_harness();
    let app = test_app(Arc::clone(&harness.state));

    let (booking_id, dashboard_id) =
        create_hold(&app, "2036-06-01", "fast", "couple@example.com").await;
    assert!(!dashboard_id.is_empty());

    let response = app
        .oneshot(get_request(&format!("/api/bookings/{booking_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    assert_eq!(body["status"], "pending_deposit");
    assert_eq!(body["package_type"], "fast");
    assert_eq!(body["total_cost"], 5000);
    assert_eq!(body["deposit_amount"], 1000);
    assert_eq!(body["balance_amount"], 4000);
    assert_eq!(body["deposit_paid"], false);
    assert!(!body["held_until"].is_null());
    assert_eq!(body["dashboard"]["status"], "building");
}

#[tokio::test]
async fn test_hold_request_custom_package_costs() {
    let harness = test_harness();
    let app = test_app(harness.state);

    let (booking_id, _) = create_hold(&app, "2036-06-02", "custom", "couple@example.com").await;

    let response = app
        .oneshot(get_request(&format!("/api/bookings/{booking_id}")))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["total_cost"], 0);
    assert_eq!(body["deposit_amount"], 1000);
    assert_eq!(body["balance_amount"], 0);
}

#[tokio::test]
async fn test_hold_request_requires_email() {
    let harness = test_harness();
    let app = test_app(harness.state);

    let response = app
        .oneshot(post_json(
            "/api/bookings",
            serde_json::json!({ "event_date": "2036-06-01", "package_type": "fast" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_hold_request_rejects_past_date() {
    let harness = test_harness();
    let app = test_app(harness.state);

    let response = app
        .oneshot(post_json(
            "/api/bookings",
            serde_json::json!({
                "event_date": "2020-06-01",
                "package_type": "fast",
                "client_email": "couple@example.com"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_hold_conflicts() {
    let harness = test_harness();
    let app = test_app(harness.state);

    create_hold(&app, "2036-06-01", "fast", "couple@example.com").await;

    let response = app
        .oneshot(post_json(
            "/api/bookings",
            serde_json::json!({
                "event_date": "2036-06-01",
                "package_type": "fast",
                "client_email": "other@example.com"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // The conflict message says the date is taken, not who holds it.
    let body = body_json(response).await;
    assert_eq!(body["error"], "date unavailable");
}

#[tokio::test]
async fn test_expired_hold_can_be_rebooked() {
    let harness = test_harness();
    let app = test_app(Arc::clone(&harness.state));

    let (stale_id, _) = create_hold(&app, "2036-06-01", "fast", "first@example.com").await;

    // Same date while the hold is open: refused.
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/bookings",
            serde_json::json!({
                "event_date": "2036-06-01",
                "package_type": "fast",
                "client_email": "second@example.com"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Push the clock past the hold window and try again.
    expire_hold(&harness.state, &stale_id);
    let (fresh_id, _) = create_hold(&app, "2036-06-01", "fast", "second@example.com").await;
    assert_ne!(fresh_id, stale_id);

    let response = app
        .oneshot(get_request(&format!("/api/bookings/{stale_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deposit_confirms_booking() {
    let harness = test_harness();
    let app = test_app(Arc::clone(&harness.state));

    let (booking_id, _) = create_hold(&app, "2036-06-01", "fast", "couple@example.com").await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/payments/deposit",
            serde_json::json!({ "booking_id": booking_id, "source_id": "cnon:card-ok" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["payment_id"], "pay-1");

    let response = app
        .oneshot(get_request(&format!("/api/bookings/{booking_id}")))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["deposit_paid"], true);
    assert_eq!(body["status"], "deposit_paid");
    assert!(body["held_until"].is_null());

    let charges = harness.charges.lock().unwrap();
    assert_eq!(charges.len(), 1);
    assert_eq!(charges[0].amount_minor, 1000);
}

#[tokio::test]
async fn test_second_deposit_is_rejected_without_charge() {
    let harness = test_harness();
    let app = test_app(Arc::clone(&harness.state));

    let (booking_id, _) = create_hold(&app, "2036-06-01", "fast", "couple@example.com").await;

    let pay = post_json(
        "/api/payments/deposit",
        serde_json::json!({ "booking_id": booking_id, "source_id": "cnon:card-ok" }),
    );
    assert_eq!(app.clone().oneshot(pay).await.unwrap().status(), StatusCode::OK);

    let retry = post_json(
        "/api/payments/deposit",
        serde_json::json!({ "booking_id": booking_id, "source_id": "cnon:card-ok" }),
    );
    let response = app.oneshot(retry).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    assert_eq!(harness.charges.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_declined_deposit_preserves_hold() {
    let harness = test_harness();
    let app = test_app(Arc::clone(&harness.state));

    let (booking_id, _) = create_hold(&app, "2036-06-01", "fast", "couple@example.com").await;

    let held_until_before = {
        let response = app
            .clone()
            .oneshot(get_request(&format!("/api/bookings/{booking_id}")))
            .await
            .unwrap();
        body_json(response).await["held_until"].clone()
    };

    harness.decline.store(true, Ordering::SeqCst);
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/payments/deposit",
            serde_json::json!({ "booking_id": booking_id, "source_id": "cnon:card-bad" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);

    let response = app
        .oneshot(get_request(&format!("/api/bookings/{booking_id}")))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["status"], "pending_deposit");
    assert_eq!(body["deposit_paid"], false);
    assert_eq!(body["held_until"], held_until_before);
}

#[tokio::test]
async fn test_deposit_for_unknown_booking() {
    let harness = test_harness();
    let app = test_app(harness.state);

    let response = app
        .oneshot(post_json(
            "/api/payments/deposit",
            serde_json::json!({ "booking_id": "missing", "source_id": "cnon:card-ok" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_balance_fast_package() {
    let harness = test_harness();
    let app = test_app(Arc::clone(&harness.state));

    let (booking_id, dashboard_id) =
        create_hold(&app, "2036-06-01", "fast", "couple@example.com").await;

    for uri in ["/api/payments/deposit", "/api/payments/balance"] {
        let response = app
            .clone()
            .oneshot(post_json(
                uri,
                serde_json::json!({ "booking_id": booking_id, "source_id": "cnon:card-ok" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/bookings/{booking_id}")))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["status"], "balance_paid");
    assert_eq!(body["total_cost"], 5000);

    let response = app
        .oneshot(get_request(&format!("/api/dashboards/{dashboard_id}")))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["status"], "finalized");

    let charges = harness.charges.lock().unwrap();
    assert_eq!(charges.len(), 2);
    assert_eq!(charges[1].amount_minor, 4000);
}

#[tokio::test]
async fn test_balance_custom_package_charges_selected_services() {
    let harness = test_harness();
    let app = test_app(Arc::clone(&harness.state));

    let (booking_id, dashboard_id) =
        create_hold(&app, "2036-06-01", "custom", "couple@example.com").await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/payments/deposit",
            serde_json::json!({ "booking_id": booking_id, "source_id": "cnon:card-ok" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    for (service, cost) in [("Floral Design", 1200), ("Photography", 2500)] {
        let response = app
            .clone()
            .oneshot(post_json(
                &format!("/api/dashboards/{dashboard_id}/services"),
                serde_json::json!({ "service": service, "cost": cost }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/payments/balance",
            serde_json::json!({ "booking_id": booking_id, "source_id": "cnon:card-ok" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get_request(&format!("/api/bookings/{booking_id}")))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["status"], "balance_paid");
    assert_eq!(body["balance_amount"], 3700);
    assert_eq!(body["total_cost"], 4700);

    let charges = harness.charges.lock().unwrap();
    assert_eq!(charges[1].amount_minor, 3700);
}

#[tokio::test]
async fn test_balance_requires_deposit_first() {
    let harness = test_harness();
    let app = test_app(harness.state);

    let (booking_id, _) = create_hold(&app, "2036-06-01", "fast", "couple@example.com").await;

    let response = app
        .oneshot(post_json(
            "/api/payments/balance",
            serde_json::json!({ "booking_id": booking_id, "source_id": "cnon:card-ok" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_release_deletes_unpaid_booking() {
    let harness = test_harness();
    let app = test_app(harness.state);

    let (booking_id, _) = create_hold(&app, "2036-06-01", "fast", "couple@example.com").await;

    let response = app
        .clone()
        .oneshot(post_json_as(
            &format!("/api/bookings/{booking_id}/release"),
            "couple@example.com",
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get_request(&format!("/api/bookings/{booking_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_release_requires_identity() {
    let harness = test_harness();
    let app = test_app(harness.state);

    let (booking_id, _) = create_hold(&app, "2036-06-01", "fast", "couple@example.com").await;

    let response = app
        .oneshot(post_json(
            &format!("/api/bookings/{booking_id}/release"),
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_release_rejects_non_owner() {
    let harness = test_harness();
    let app = test_app(harness.state);

    let (booking_id, _) = create_hold(&app, "2036-06-01", "fast", "couple@example.com").await;

    let response = app
        .oneshot(post_json_as(
            &format!("/api/bookings/{booking_id}/release"),
            "stranger@example.com",
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_release_rejects_paid_booking() {
    let harness = test_harness();
    let app = test_app(harness.state);

    let (booking_id, _) = create_hold(&app, "2036-06-01", "fast", "couple@example.com").await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/payments/deposit",
            serde_json::json!({ "booking_id": booking_id, "source_id": "cnon:card-ok" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(post_json_as(
            &format!("/api/bookings/{booking_id}/release"),
            "couple@example.com",
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Still confirmed.
    let response = app
        .oneshot(get_request(&format!("/api/bookings/{booking_id}")))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["deposit_paid"], true);
}

#[tokio::test]
async fn test_dashboard_update_and_fetch() {
    let harness = test_harness();
    let app = test_app(harness.state);

    let (_, dashboard_id) = create_hold(&app, "2036-06-01", "custom", "couple@example.com").await;

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/dashboards/{dashboard_id}"),
            serde_json::json!({
                "status": "submitted",
                "questionnaire": { "guest_count": 40, "venue": "Tiny Diner" }
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get_request(&format!("/api/dashboards/{dashboard_id}")))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["status"], "submitted");
    assert_eq!(body["questionnaire"]["guest_count"], 40);
}

#[tokio::test]
async fn test_dashboard_cannot_be_finalized_directly() {
    let harness = test_harness();
    let app = test_app(harness.state);

    let (_, dashboard_id) = create_hold(&app, "2036-06-01", "custom", "couple@example.com").await;

    let response = app
        .oneshot(post_json(
            &format!("/api/dashboards/{dashboard_id}"),
            serde_json::json!({ "status": "finalized" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_vendor_admin_and_public_listing() {
    let harness = test_harness();
    let app = test_app(harness.state);

    // Creating a vendor without the admin token is refused.
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/admin/vendors",
            serde_json::json!({
                "business_name": "Local Effort",
                "category": "catering",
                "contact_email": "hello@localeffort.com"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let admin_post = |uri: &str, body: serde_json::Value| {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .header("authorization", "Bearer test-token")
            .body(Body::from(body.to_string()))
            .unwrap()
    };

    let response = app
        .clone()
        .oneshot(admin_post(
            "/api/admin/vendors",
            serde_json::json!({
                "business_name": "Local Effort",
                "category": "catering",
                "contact_email": "hello@localeffort.com",
                "base_price": 2500
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(admin_post(
            "/api/admin/vendors",
            serde_json::json!({
                "business_name": "Dormant Florals",
                "category": "florals",
                "contact_email": "hi@dormant.com",
                "is_active": false
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Public list hides the inactive vendor; admin list shows both.
    let response = app.clone().oneshot(get_request("/api/vendors")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["business_name"], "Local Effort");

    let response = app.oneshot(admin_get("/api/admin/vendors")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_messages_flow() {
    let harness = test_harness();
    let app = test_app(Arc::clone(&harness.state));

    let (booking_id, dashboard_id) =
        create_hold(&app, "2036-06-01", "custom", "couple@example.com").await;

    let client_id = {
        let response = app
            .clone()
            .oneshot(get_request(&format!("/api/bookings/{booking_id}")))
            .await
            .unwrap();
        body_json(response).await["client_id"]
            .as_str()
            .unwrap()
            .to_string()
    };

    // Sending requires an identity.
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/messages",
            serde_json::json!({
                "dashboard_id": dashboard_id,
                "recipient_id": client_id,
                "content": "When should we schedule the tasting?"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(post_json_as(
            "/api/messages",
            "vendor@localeffort.com",
            serde_json::json!({
                "dashboard_id": dashboard_id,
                "recipient_id": client_id,
                "content": "When should we schedule the tasting?"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get_request(&format!(
            "/api/messages?dashboard_id={dashboard_id}"
        )))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["is_read"], false);

    let response = app
        .clone()
        .oneshot(post_json_as(
            "/api/messages/read",
            "couple@example.com",
            serde_json::json!({ "dashboard_id": dashboard_id }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get_request(&format!(
            "/api/messages?dashboard_id={dashboard_id}"
        )))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body[0]["is_read"], true);
}

#[tokio::test]
async fn test_admin_status_counts() {
    let harness = test_harness();
    let app = test_app(Arc::clone(&harness.state));

    let response = app.clone().oneshot(get_request("/api/admin/status")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let (paid_id, _) = create_hold(&app, "2036-06-01", "fast", "a@example.com").await;
    create_hold(&app, "2036-06-02", "fast", "b@example.com").await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/payments/deposit",
            serde_json::json!({ "booking_id": paid_id, "source_id": "cnon:card-ok" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(admin_get("/api/admin/status")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["confirmed_bookings"], 1);
    assert_eq!(body["active_holds"], 1);
    assert_eq!(body["pending_reconciliation"], 0);
}

#[tokio::test]
async fn test_admin_bookings_filter() {
    let harness = test_harness();
    let app = test_app(Arc::clone(&harness.state));

    let (paid_id, _) = create_hold(&app, "2036-06-01", "fast", "a@example.com").await;
    create_hold(&app, "2036-06-02", "fast", "b@example.com").await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/payments/deposit",
            serde_json::json!({ "booking_id": paid_id, "source_id": "cnon:card-ok" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(admin_get("/api/admin/bookings?status=deposit_paid"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], paid_id.as_str());
}
