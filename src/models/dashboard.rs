use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 1:1 companion of a booking, created in the same transaction. Accumulates
/// the services a custom-package client selects and their total cost.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub id: String,
    pub booking_id: String,
    pub client_id: String,
    pub total_cost: i64,
    pub status: DashboardStatus,
    pub questionnaire: serde_json::Value,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum DashboardStatus {
    Building,
    Submitted,
    Approved,
    Finalized,
}

impl DashboardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DashboardStatus::Building => "building",
            DashboardStatus::Submitted => "submitted",
            DashboardStatus::Approved => "approved",
            DashboardStatus::Finalized => "finalized",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "submitted" => DashboardStatus::Submitted,
            "approved" => DashboardStatus::Approved,
            "finalized" => DashboardStatus::Finalized,
            _ => DashboardStatus::Building,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardService {
    pub id: String,
    pub dashboard_id: String,
    pub vendor_id: Option<String>,
    pub service: String,
    pub description: Option<String>,
    pub cost: i64,
    pub created_at: String,
}
