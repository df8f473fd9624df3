use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seller {
    pub id: Uuid,
    pub user_id: Uuid,
    pub store_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub business_category: Option<String>,
    pub business_level: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
