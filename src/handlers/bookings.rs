use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, Dashboard, PackageType};
use crate::services::holds::{self, HoldRequest};
use crate::state::AppState;

use super::client_identity;

// POST /api/bookings
#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub event_date: NaiveDate,
    pub package_type: PackageType,
    pub client_email: Option<String>,
    pub client_name: Option<String>,
}

#[derive(Serialize)]
pub struct CreateBookingResponse {
    pub booking_id: String,
    pub dashboard_id: String,
    pub held_until: String,
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<CreateBookingRequest>,
) -> Result<Json<CreateBookingResponse>, AppError> {
    // A signed-in identity wins over whatever the form carried.
    let client_email = client_identity(&headers)
        .or(body.client_email)
        .ok_or_else(|| {
            AppError::BadRequest("client email required (sign in or provide one)".to_string())
        })?;

    let now = Utc::now().naive_utc();
    if state.config.reject_past_dates && body.event_date < now.date() {
        return Err(AppError::BadRequest("event date is in the past".to_string()));
    }

    let outcome = {
        let mut conn = state.db.lock().unwrap();
        holds::request_hold(
            &mut conn,
            &HoldRequest {
                event_date: body.event_date,
                package_type: body.package_type,
                client_email,
                client_name: body.client_name,
                hold_hours: state.config.hold_hours,
            },
            now,
        )?
    };

    Ok(Json(CreateBookingResponse {
        booking_id: outcome.booking.id,
        dashboard_id: outcome.dashboard.id,
        held_until: outcome
            .booking
            .held_until
            .map(|h| h.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default(),
    }))
}

// GET /api/bookings/:id
#[derive(Serialize)]
pub struct BookingDetailResponse {
    #[serde(flatten)]
    pub booking: Booking,
    pub dashboard: Option<Dashboard>,
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<BookingDetailResponse>, AppError> {
    let conn = state.db.lock().unwrap();
    let booking = queries::get_booking_by_id(&conn, &id)?
        .ok_or_else(|| AppError::NotFound(format!("booking {id}")))?;
    let dashboard = queries::get_dashboard_by_booking(&conn, &id)?;

    Ok(Json(BookingDetailResponse { booking, dashboard }))
}

// POST /api/bookings/:id/release
pub async fn release_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let requester = client_identity(&headers).ok_or(AppError::Unauthorized)?;

    let conn = state.db.lock().unwrap();
    holds::release_hold(&conn, &id, &requester)?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Date released"
    })))
}
