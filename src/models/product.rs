use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub user_id: Uuid,
    pub seller_id: Option<Uuid>,
    pub name: String,
    pub category: Option<String>,
    pub price: Decimal,
    /// Available stock. Decremented by the payment confirmation processor,
    /// clamped at zero.
    pub quantity: i32,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
