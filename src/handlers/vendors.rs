use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::Vendor;
use crate::state::AppState;

use super::admin::check_auth;

// GET /api/vendors — public listing, active vendors only.
pub async fn list_vendors(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Vendor>>, AppError> {
    let conn = state.db.lock().unwrap();
    let vendors = queries::list_vendors(&conn, true)?;
    Ok(Json(vendors))
}

#[derive(Deserialize)]
pub struct VendorRequest {
    pub business_name: String,
    pub category: String,
    pub description: Option<String>,
    pub base_price: Option<i64>,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub website: Option<String>,
    pub is_active: Option<bool>,
}

// POST /api/admin/vendors
pub async fn create_vendor(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<VendorRequest>,
) -> Result<Json<Vendor>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let vendor = Vendor {
        id: Uuid::new_v4().to_string(),
        business_name: body.business_name,
        category: body.category,
        description: body.description,
        base_price: body.base_price.unwrap_or(0),
        contact_email: body.contact_email,
        contact_phone: body.contact_phone,
        website: body.website,
        is_active: body.is_active.unwrap_or(true),
        created_at: Utc::now()
            .naive_utc()
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
    };

    let conn = state.db.lock().unwrap();
    queries::create_vendor(&conn, &vendor)?;
    Ok(Json(vendor))
}

// POST /api/admin/vendors/:id
pub async fn update_vendor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<VendorRequest>,
) -> Result<Json<Vendor>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let conn = state.db.lock().unwrap();
    let existing = queries::get_vendor_by_id(&conn, &id)?
        .ok_or_else(|| AppError::NotFound(format!("vendor {id}")))?;

    let vendor = Vendor {
        id,
        business_name: body.business_name,
        category: body.category,
        description: body.description,
        base_price: body.base_price.unwrap_or(existing.base_price),
        contact_email: body.contact_email,
        contact_phone: body.contact_phone,
        website: body.website,
        is_active: body.is_active.unwrap_or(existing.is_active),
        created_at: existing.created_at,
    };
    queries::update_vendor(&conn, &vendor)?;
    Ok(Json(vendor))
}

// DELETE /api/admin/vendors/:id
pub async fn delete_vendor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let conn = state.db.lock().unwrap();
    if !queries::delete_vendor(&conn, &id)? {
        return Err(AppError::NotFound(format!("vendor {id}")));
    }
    Ok(Json(serde_json::json!({ "success": true })))
}
