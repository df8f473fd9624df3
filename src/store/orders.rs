use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use crate::models::{Order, OrderStatus};

use super::{Page, StoreError};

/// Result of attempting to settle an order by merchant reference.
#[derive(Debug, Clone)]
pub enum SettleOutcome {
    /// The transition from `pending` was applied; carries the settled order.
    Applied(Order),
    /// The order was already in a terminal state. Duplicate delivery.
    AlreadySettled(OrderStatus),
    /// No order owns this reference.
    UnknownReference,
}

/// Durable order ledger keyed by id, with a unique index on the merchant
/// transaction reference. Orders are never deleted.
#[derive(Debug, Default)]
pub struct OrderStore {
    orders: DashMap<Uuid, Order>,
    by_reference: DashMap<String, Uuid>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Persists a new pending order. Fails if the merchant reference is
    /// already owned by another order.
    pub fn create(&self, order: Order) -> Result<Order, StoreError> {
        use dashmap::mapref::entry::Entry;

        match self.by_reference.entry(order.reference.clone()) {
            Entry::Occupied(_) => Err(StoreError::Conflict(format!(
                "merchant reference '{}' already exists",
                order.reference
            ))),
            Entry::Vacant(slot) => {
                slot.insert(order.id);
                self.orders.insert(order.id, order.clone());
                Ok(order)
            }
        }
    }

    pub fn find(&self, id: Uuid) -> Option<Order> {
        self.orders.get(&id).map(|o| o.clone())
    }

    pub fn find_by_reference(&self, reference: &str) -> Option<Order> {
        let id = *self.by_reference.get(reference)?;
        self.find(id)
    }

    /// Transitions the order owning `reference` out of `pending` as a single
    /// conditional update. The mutation happens under the map's exclusive
    /// per-key guard, so two concurrent duplicate deliveries observe exactly
    /// one `Applied`.
    pub fn settle(
        &self,
        reference: &str,
        status: OrderStatus,
        gateway_tx_id: Option<String>,
    ) -> SettleOutcome {
        debug_assert!(status.is_terminal());

        let Some(id) = self.by_reference.get(reference).map(|e| *e) else {
            return SettleOutcome::UnknownReference;
        };
        let Some(mut order) = self.orders.get_mut(&id) else {
            return SettleOutcome::UnknownReference;
        };
        if order.status.is_terminal() {
            return SettleOutcome::AlreadySettled(order.status);
        }
        order.status = status;
        if gateway_tx_id.is_some() {
            order.gateway_tx_id = gateway_tx_id;
        }
        order.updated_at = Utc::now();
        SettleOutcome::Applied(order.clone())
    }

    pub fn list_by_buyer(&self, buyer_id: Uuid, page: usize, limit: usize) -> Page<Order> {
        self.list_where(|o| o.buyer_id == buyer_id, page, limit)
    }

    pub fn list_by_seller(&self, seller_id: Uuid, page: usize, limit: usize) -> Page<Order> {
        self.list_where(|o| o.seller_id == seller_id, page, limit)
    }

    fn list_where(&self, keep: impl Fn(&Order) -> bool, page: usize, limit: usize) -> Page<Order> {
        let mut matched: Vec<Order> = self
            .orders
            .iter()
            .filter(|o| keep(o))
            .map(|o| o.clone())
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Page::slice(matched, page, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn pending_order(reference: &str) -> Order {
        let now = Utc::now();
        Order {
            id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            seller_id: Uuid::new_v4(),
            buyer_id: Uuid::new_v4(),
            amount: Decimal::from(1000),
            currency: "NGN".to_string(),
            quantity: 1,
            status: OrderStatus::Pending,
            reference: reference.to_string(),
            gateway_tx_id: None,
            metadata: serde_json::json!({}),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn duplicate_reference_is_a_conflict() {
        let store = OrderStore::new();
        store.create(pending_order("TL-1")).unwrap();
        assert!(matches!(
            store.create(pending_order("TL-1")),
            Err(StoreError::Conflict(_))
        ));
    }

    #[test]
    fn settle_applies_only_from_pending() {
        let store = OrderStore::new();
        store.create(pending_order("TL-1")).unwrap();

        let settled = match store.settle("TL-1", OrderStatus::Paid, Some("g-1".into())) {
            SettleOutcome::Applied(order) => order,
            other => panic!("expected Applied, got {other:?}"),
        };
        assert_eq!(settled.status, OrderStatus::Paid);
        assert_eq!(settled.gateway_tx_id.as_deref(), Some("g-1"));

        // Second delivery must not transition again.
        assert!(matches!(
            store.settle("TL-1", OrderStatus::Paid, Some("g-2".into())),
            SettleOutcome::AlreadySettled(OrderStatus::Paid)
        ));
        // Failed after paid is also absorbed.
        assert!(matches!(
            store.settle("TL-1", OrderStatus::Failed, None),
            SettleOutcome::AlreadySettled(OrderStatus::Paid)
        ));
        assert_eq!(
            store.find_by_reference("TL-1").unwrap().gateway_tx_id.as_deref(),
            Some("g-1")
        );
    }

    #[test]
    fn settle_unknown_reference() {
        let store = OrderStore::new();
        assert!(matches!(
            store.settle("TL-missing", OrderStatus::Paid, None),
            SettleOutcome::UnknownReference
        ));
    }

    #[test]
    fn concurrent_duplicate_settles_apply_once() {
        use std::sync::Arc;

        let store = Arc::new(OrderStore::new());
        store.create(pending_order("TL-race")).unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = Arc::clone(&store);
            handles.push(std::thread::spawn(move || {
                matches!(
                    store.settle("TL-race", OrderStatus::Paid, None),
                    SettleOutcome::Applied(_)
                )
            }));
        }
        let applied = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|applied| *applied)
            .count();
        assert_eq!(applied, 1);
    }
}
