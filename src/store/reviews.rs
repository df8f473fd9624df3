use dashmap::DashMap;
use uuid::Uuid;

use crate::models::Review;

#[derive(Debug, Default)]
pub struct ReviewStore {
    reviews: DashMap<Uuid, Review>,
}

impl ReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, review: Review) -> Review {
        self.reviews.insert(review.id, review.clone());
        review
    }

    pub fn list_by_seller(&self, seller_id: Uuid) -> Vec<Review> {
        let mut matched: Vec<Review> = self
            .reviews
            .iter()
            .filter(|r| r.seller_id == seller_id)
            .map(|r| r.clone())
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matched
    }

    pub fn count_by_seller(&self, seller_id: Uuid) -> usize {
        self.reviews
            .iter()
            .filter(|r| r.seller_id == seller_id)
            .count()
    }
}
