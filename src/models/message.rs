use serde::{Deserialize, Serialize};

/// A message on a dashboard thread between the client and a vendor.
/// Delivery is pull-only; there is no push channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub dashboard_id: String,
    pub sender_id: String,
    pub recipient_id: String,
    pub content: String,
    pub is_read: bool,
    pub created_at: String,
}
