//! In-memory document store, one collection struct per subsystem.
//!
//! Collections are concurrent maps; the exclusive per-key guard returned by
//! `DashMap::get_mut` is what makes conditional updates (notably the order
//! status transition) atomic with respect to concurrent requests.

use serde::Serialize;
use thiserror::Error;

pub mod catalog;
pub mod identity;
pub mod ledger;
pub mod messages;
pub mod orders;
pub mod reviews;
pub mod services;

pub use catalog::CatalogStore;
pub use identity::IdentityStore;
pub use ledger::TransactionLedger;
pub use messages::MessageStore;
pub use orders::{OrderStore, SettleOutcome};
pub use reviews::ReviewStore;
pub use services::ServiceStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Conflict: {0}")]
    Conflict(String),
}

/// One page of a sorted listing.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
}

impl<T: Serialize> Page<T> {
    /// Slices an already-sorted result set. `page` is 1-based; a zero
    /// `page` or `limit` falls back to the first page / a single item. Both
    /// values come straight from query parameters, so an offset past
    /// `usize::MAX` yields an empty page instead of overflowing.
    pub fn slice(all: Vec<T>, page: usize, limit: usize) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        let total = all.len();
        let items = match (page - 1).checked_mul(limit) {
            Some(offset) => all.into_iter().skip(offset).take(limit).collect(),
            None => Vec::new(),
        };
        Self {
            items,
            total,
            page,
            limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_slices_and_reports_total() {
        let page = Page::slice((0..7).collect::<Vec<i32>>(), 2, 3);
        assert_eq!(page.items, vec![3, 4, 5]);
        assert_eq!(page.total, 7);
        assert_eq!(page.page, 2);
    }

    #[test]
    fn page_zero_is_treated_as_first() {
        let page = Page::slice(vec![1, 2], 0, 10);
        assert_eq!(page.items, vec![1, 2]);
        assert_eq!(page.page, 1);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let page = Page::slice(vec![1, 2], 5, 10);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 2);
    }

    #[test]
    fn page_offset_overflow_is_empty() {
        let page = Page::slice(vec![1, 2, 3], usize::MAX, 20);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 3);
    }
}
