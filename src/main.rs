use std::sync::{Arc, Mutex};

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use tinywed::config::AppConfig;
use tinywed::db;
use tinywed::handlers;
use tinywed::services::payments::square::SquarePaymentsProvider;
use tinywed::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    anyhow::ensure!(
        !config.square_access_token.is_empty(),
        "SQUARE_ACCESS_TOKEN must be set"
    );
    tracing::info!(
        "using Square payments ({} environment)",
        config.square_environment
    );
    let payments = SquarePaymentsProvider::new(
        config.square_access_token.clone(),
        config.square_location_id.clone(),
        &config.square_environment,
    );

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        payments: Box::new(payments),
    });

    let app = Router::new()
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
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
