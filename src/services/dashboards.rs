use chrono::NaiveDateTime;
use rusqlite::Connection;
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{DashboardService, DashboardStatus};

pub struct NewService {
    pub vendor_id: Option<String>,
    pub service: String,
    pub description: Option<String>,
    pub cost: i64,
}

/// Add a service to a custom-package dashboard and keep the running total
/// in step. The total is what the balance charge will collect, so the two
/// writes happen in one transaction.
pub fn add_service(
    conn: &mut Connection,
    dashboard_id: &str,
    input: NewService,
    now: NaiveDateTime,
) -> Result<DashboardService, AppError> {
    if input.cost < 0 {
        return Err(AppError::BadRequest("cost must not be negative".to_string()));
    }

    let tx = conn.transaction()?;

    let dashboard = queries::get_dashboard_by_id(&tx, dashboard_id)?
        .ok_or_else(|| AppError::NotFound(format!("dashboard {dashboard_id}")))?;
    if dashboard.status == DashboardStatus::Finalized {
        return Err(AppError::InvalidState(
            "dashboard is finalized".to_string(),
        ));
    }

    if let Some(vendor_id) = &input.vendor_id {
        if queries::get_vendor_by_id(&tx, vendor_id)?.is_none() {
            return Err(AppError::NotFound(format!("vendor {vendor_id}")));
        }
    }

    let service = DashboardService {
        id: Uuid::new_v4().to_string(),
        dashboard_id: dashboard_id.to_string(),
        vendor_id: input.vendor_id,
        service: input.service,
        description: input.description,
        cost: input.cost,
        created_at: now.format("%Y-%m-%d %H:%M:%S").to_string(),
    };
    queries::insert_dashboard_service(&tx, &service)?;
    queries::recalc_dashboard_total(&tx, dashboard_id, now)?;

    tx.commit()?;
    Ok(service)
}

pub fn remove_service(
    conn: &mut Connection,
    dashboard_id: &str,
    service_id: &str,
    now: NaiveDateTime,
) -> Result<(), AppError> {
    let tx = conn.transaction()?;

    let dashboard = queries::get_dashboard_by_id(&tx, dashboard_id)?
        .ok_or_else(|| AppError::NotFound(format!("dashboard {dashboard_id}")))?;
    if dashboard.status == DashboardStatus::Finalized {
        return Err(AppError::InvalidState(
            "dashboard is finalized".to_string(),
        ));
    }

    if !queries::delete_dashboard_service(&tx, dashboard_id, service_id)? {
        return Err(AppError::NotFound(format!("service {service_id}")));
    }
    queries::recalc_dashboard_total(&tx, dashboard_id, now)?;

    tx.commit()?;
    Ok(())
}
