use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use crate::models::Product;

/// Product catalog. Stock mutation is clamped so a paid order can never
/// drive `quantity` negative.
#[derive(Debug, Default)]
pub struct CatalogStore {
    products: DashMap<Uuid, Product>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, product: Product) -> Product {
        self.products.insert(product.id, product.clone());
        product
    }

    pub fn find(&self, id: Uuid) -> Option<Product> {
        self.products.get(&id).map(|p| p.clone())
    }

    pub fn list(&self) -> Vec<Product> {
        let mut all: Vec<Product> = self.products.iter().map(|p| p.clone()).collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all
    }

    pub fn list_by_seller(&self, seller_id: Uuid) -> Vec<Product> {
        let mut matched: Vec<Product> = self
            .products
            .iter()
            .filter(|p| p.seller_id == Some(seller_id))
            .map(|p| p.clone())
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matched
    }

    pub fn count_by_seller(&self, seller_id: Uuid) -> usize {
        self.products
            .iter()
            .filter(|p| p.seller_id == Some(seller_id))
            .count()
    }

    pub fn delete(&self, id: Uuid) -> bool {
        self.products.remove(&id).is_some()
    }

    /// Decrements available stock by `amount`, clamped at zero. Returns the
    /// remaining stock, or `None` when the product no longer exists.
    pub fn decrement_stock(&self, id: Uuid, amount: i32) -> Option<i32> {
        let mut product = self.products.get_mut(&id)?;
        product.quantity = (product.quantity - amount.abs()).max(0);
        product.updated_at = Utc::now();
        Some(product.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn product(quantity: i32) -> Product {
        let now = Utc::now();
        Product {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            seller_id: Some(Uuid::new_v4()),
            name: "Basket".to_string(),
            category: None,
            price: Decimal::from(500),
            quantity,
            description: None,
            image_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn decrement_clamps_at_zero() {
        let store = CatalogStore::new();
        let p = store.create(product(1));
        assert_eq!(store.decrement_stock(p.id, 5), Some(0));
        assert_eq!(store.find(p.id).unwrap().quantity, 0);
    }

    #[test]
    fn decrement_normal_case() {
        let store = CatalogStore::new();
        let p = store.create(product(10));
        assert_eq!(store.decrement_stock(p.id, 2), Some(8));
    }

    #[test]
    fn decrement_missing_product() {
        let store = CatalogStore::new();
        assert_eq!(store.decrement_stock(Uuid::new_v4(), 1), None);
    }
}
