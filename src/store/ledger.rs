use dashmap::DashMap;
use uuid::Uuid;

use crate::models::TransactionRecord;

use super::{Page, StoreError};

/// Write-once transaction ledger. Entries are never mutated or deleted, and
/// at most one entry may exist per order.
#[derive(Debug, Default)]
pub struct TransactionLedger {
    entries: DashMap<Uuid, TransactionRecord>,
    by_order: DashMap<Uuid, Uuid>,
}

impl TransactionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: TransactionRecord) -> Result<TransactionRecord, StoreError> {
        use dashmap::mapref::entry::Entry;

        match self.by_order.entry(entry.order_id) {
            Entry::Occupied(_) => Err(StoreError::Conflict(format!(
                "order {} already has a ledger entry",
                entry.order_id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(entry.id);
                self.entries.insert(entry.id, entry.clone());
                Ok(entry)
            }
        }
    }

    pub fn find_by_order(&self, order_id: Uuid) -> Option<TransactionRecord> {
        let id = *self.by_order.get(&order_id)?;
        self.entries.get(&id).map(|t| t.clone())
    }

    pub fn list_by_seller(
        &self,
        seller_id: Uuid,
        page: usize,
        limit: usize,
    ) -> Page<TransactionRecord> {
        let mut matched: Vec<TransactionRecord> = self
            .entries
            .iter()
            .filter(|t| t.seller_id == seller_id)
            .map(|t| t.clone())
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Page::slice(matched, page, limit)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderStatus;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn entry(order_id: Uuid) -> TransactionRecord {
        TransactionRecord {
            id: Uuid::new_v4(),
            seller_id: Uuid::new_v4(),
            order_id,
            product_id: Uuid::new_v4(),
            amount: Decimal::from(2000),
            currency: "NGN".to_string(),
            status: OrderStatus::Paid,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn one_entry_per_order() {
        let ledger = TransactionLedger::new();
        let order_id = Uuid::new_v4();
        ledger.record(entry(order_id)).unwrap();
        assert!(matches!(
            ledger.record(entry(order_id)),
            Err(StoreError::Conflict(_))
        ));
        assert_eq!(ledger.len(), 1);
    }
}
