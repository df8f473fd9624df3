use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opening hours for one day of the week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingHours {
    pub day: String,
    pub open: Option<String>,
    pub close: Option<String>,
    #[serde(default)]
    pub closed: bool,
}

/// Service listing offered by a seller. Unlike products, services carry no
/// stock and are not purchasable through the checkout flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub user_id: Uuid,
    pub seller_id: Option<Uuid>,
    pub name: String,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub services_offered: Vec<String>,
    pub working_hours: Vec<WorkingHours>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
