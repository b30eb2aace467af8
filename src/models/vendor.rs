use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vendor {
    pub id: String,
    pub business_name: String,
    pub category: String,
    pub description: Option<String>,
    pub base_price: i64,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub website: Option<String>,
    pub is_active: bool,
    pub created_at: String,
}
