use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Dashboard, DashboardService, DashboardStatus};
use crate::services::dashboards::{self, NewService};
use crate::state::AppState;

// GET /api/dashboards/:id
#[derive(Serialize)]
pub struct DashboardDetailResponse {
    #[serde(flatten)]
    pub dashboard: Dashboard,
    pub services: Vec<DashboardService>,
}

pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DashboardDetailResponse>, AppError> {
    let conn = state.db.lock().unwrap();
    let dashboard = queries::get_dashboard_by_id(&conn, &id)?
        .ok_or_else(|| AppError::NotFound(format!("dashboard {id}")))?;
    let services = queries::get_dashboard_services(&conn, &id)?;

    Ok(Json(DashboardDetailResponse {
        dashboard,
        services,
    }))
}

// POST /api/dashboards/:id
#[derive(Deserialize)]
pub struct UpdateDashboardRequest {
    pub status: Option<DashboardStatus>,
    pub questionnaire: Option<serde_json::Value>,
}

pub async fn update_dashboard(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateDashboardRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    // Finalization happens through the balance payment, not this endpoint.
    if body.status == Some(DashboardStatus::Finalized) {
        return Err(AppError::InvalidState(
            "dashboards are finalized by paying the balance".to_string(),
        ));
    }

    let conn = state.db.lock().unwrap();
    let updated = queries::update_dashboard(
        &conn,
        &id,
        body.status.as_ref(),
        body.questionnaire.as_ref(),
        Utc::now().naive_utc(),
    )?;

    if !updated {
        return Err(AppError::NotFound(format!("dashboard {id}")));
    }
    Ok(Json(serde_json::json!({ "success": true })))
}

// POST /api/dashboards/:id/services
#[derive(Deserialize)]
pub struct AddServiceRequest {
    pub vendor_id: Option<String>,
    pub service: String,
    pub description: Option<String>,
    pub cost: i64,
}

pub async fn add_service(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<AddServiceRequest>,
) -> Result<Json<DashboardService>, AppError> {
    let mut conn = state.db.lock().unwrap();
    let service = dashboards::add_service(
        &mut conn,
        &id,
        NewService {
            vendor_id: body.vendor_id,
            service: body.service,
            description: body.description,
            cost: body.cost,
        },
        Utc::now().naive_utc(),
    )?;

    Ok(Json(service))
}

// DELETE /api/dashboards/:id/services/:service_id
pub async fn remove_service(
    State(state): State<Arc<AppState>>,
    Path((id, service_id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut conn = state.db.lock().unwrap();
    dashboards::remove_service(&mut conn, &id, &service_id, Utc::now().naive_utc())?;

    Ok(Json(serde_json::json!({ "success": true })))
}
