use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Order lifecycle. `Paid` and `Failed` are terminal: once reached, no
/// further transition is permitted, even on duplicate gateway deliveries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Paid,
    Failed,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Paid | OrderStatus::Failed)
    }
}

/// One purchase attempt. Created by order initiation with status `pending`,
/// settled exactly once by the payment confirmation processor, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub product_id: Uuid,
    pub seller_id: Uuid,
    pub buyer_id: Uuid,
    /// Fixed at creation from `product.price * quantity`; never recomputed.
    pub amount: Decimal,
    pub currency: String,
    pub quantity: i32,
    pub status: OrderStatus,
    /// Merchant transaction reference correlating this order with the
    /// gateway's asynchronous notification. Unique, never reused.
    pub reference: String,
    /// The gateway's own transaction identifier, set on confirmation.
    pub gateway_tx_id: Option<String>,
    pub metadata: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload returned by order initiation, consumed by the client-side
/// payment widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutDescriptor {
    pub order_id: Uuid,
    pub reference: String,
    pub amount: Decimal,
    pub currency: String,
    pub customer: CheckoutCustomer,
    pub product: CheckoutProduct,
    pub gateway_public_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutCustomer {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutProduct {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_is_not_terminal() {
        assert!(!OrderStatus::Pending.is_terminal());
    }

    #[test]
    fn paid_and_failed_are_terminal() {
        assert!(OrderStatus::Paid.is_terminal());
        assert!(OrderStatus::Failed.is_terminal());
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&OrderStatus::Paid).unwrap(), "\"paid\"");
        assert_eq!(
            serde_json::from_str::<OrderStatus>("\"pending\"").unwrap(),
            OrderStatus::Pending
        );
    }
}
