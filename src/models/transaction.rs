use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::order::{Order, OrderStatus};

/// Immutable ledger entry, written once when an order transitions to `paid`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl TransactionRecord {
    /// Mirrors a settled order into a ledger entry.
    pub fn from_order(order: &Order) -> Self {
        Self {
            id: Uuid::new_v4(),
            seller_id: order.seller_id,
            order_id: order.id,
            product_id: order.product_id,
            amount: order.amount,
            currency: order.currency.clone(),
            status: order.status,
            created_at: Utc::now(),
        }
    }
}
