use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::Booking;
use crate::state::AppState;

pub(crate) fn check_auth(headers: &HeaderMap, expected_token: &str) -> Result<(), AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token != expected_token {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

// GET /api/admin/status
#[derive(Serialize)]
pub struct StatusResponse {
    confirmed_bookings: i64,
    active_holds: i64,
    /// Charges that succeeded at the gateway but never made it onto a
    /// booking row; anything non-zero needs a human.
    pending_reconciliation: i64,
}

pub async fn get_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<StatusResponse>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let conn = state.db.lock().unwrap();
    let stats = queries::get_admin_stats(&conn, Utc::now().naive_utc())?;

    Ok(Json(StatusResponse {
        confirmed_bookings: stats.confirmed_bookings,
        active_holds: stats.active_holds,
        pending_reconciliation: stats.pending_reconciliation,
    }))
}

// GET /api/admin/bookings
#[derive(Deserialize)]
pub struct BookingsQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
}

pub async fn get_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Vec<Booking>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let limit = query.limit.unwrap_or(50);
    let conn = state.db.lock().unwrap();
    let bookings = queries::get_all_bookings(&conn, query.status.as_deref(), limit)?;

    Ok(Json(bookings))
}

// GET /api/admin/vendors — includes inactive vendors.
pub async fn get_vendors(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<crate::models::Vendor>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let conn = state.db.lock().unwrap();
    let vendors = queries::list_vendors(&conn, false)?;
    Ok(Json(vendors))
}
