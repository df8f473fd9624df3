use dashmap::DashMap;
use uuid::Uuid;

use crate::models::Service;

#[derive(Debug, Default)]
pub struct ServiceStore {
    services: DashMap<Uuid, Service>,
}

impl ServiceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, service: Service) -> Service {
        self.services.insert(service.id, service.clone());
        service
    }

    pub fn find(&self, id: Uuid) -> Option<Service> {
        self.services.get(&id).map(|s| s.clone())
    }

    pub fn list(&self) -> Vec<Service> {
        let mut all: Vec<Service> = self.services.iter().map(|s| s.clone()).collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all
    }

    pub fn list_by_seller(&self, seller_id: Uuid) -> Vec<Service> {
        let mut matched: Vec<Service> = self
            .services
            .iter()
            .filter(|s| s.seller_id == Some(seller_id))
            .map(|s| s.clone())
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matched
    }

    pub fn delete(&self, id: Uuid) -> bool {
        self.services.remove(&id).is_some()
    }
}
