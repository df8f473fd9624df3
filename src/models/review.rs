use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub user_id: Uuid,
    /// 1 through 5 inclusive, validated at the edge.
    pub rating: u8,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}
