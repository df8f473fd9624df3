use dashmap::DashMap;
use uuid::Uuid;

use crate::models::{Seller, User};

use super::StoreError;

/// User and seller records, with a unique index on user email.
#[derive(Debug, Default)]
pub struct IdentityStore {
    users: DashMap<Uuid, User>,
    users_by_email: DashMap<String, Uuid>,
    sellers: DashMap<Uuid, Seller>,
    sellers_by_user: DashMap<Uuid, Uuid>,
}

impl IdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_user(&self, user: User) -> Result<User, StoreError> {
        use dashmap::mapref::entry::Entry;

        match self.users_by_email.entry(user.email.to_lowercase()) {
            Entry::Occupied(_) => Err(StoreError::Conflict(format!(
                "email '{}' already registered",
                user.email
            ))),
            Entry::Vacant(slot) => {
                slot.insert(user.id);
                self.users.insert(user.id, user.clone());
                Ok(user)
            }
        }
    }

    pub fn find_user(&self, id: Uuid) -> Option<User> {
        self.users.get(&id).map(|u| u.clone())
    }

    pub fn find_user_by_email(&self, email: &str) -> Option<User> {
        let id = *self.users_by_email.get(&email.to_lowercase())?;
        self.find_user(id)
    }

    pub fn find_user_by_verify_token(&self, token: &str) -> Option<User> {
        self.users
            .iter()
            .find(|u| u.verify_token.as_deref() == Some(token))
            .map(|u| u.clone())
    }

    pub fn find_user_by_reset_token(&self, token: &str) -> Option<User> {
        self.users
            .iter()
            .find(|u| u.reset_token.as_deref() == Some(token))
            .map(|u| u.clone())
    }

    /// Replaces a user record, keeping the email index consistent when the
    /// address changed. Callers check email uniqueness beforehand.
    pub fn save_user(&self, user: User) {
        if let Some(previous) = self.users.get(&user.id).map(|u| u.email.to_lowercase()) {
            let current = user.email.to_lowercase();
            if previous != current {
                self.users_by_email.remove(&previous);
                self.users_by_email.insert(current, user.id);
            }
        }
        self.users.insert(user.id, user);
    }

    pub fn delete_user(&self, id: Uuid) -> bool {
        match self.users.remove(&id) {
            Some((_, user)) => {
                self.users_by_email.remove(&user.email.to_lowercase());
                true
            }
            None => false,
        }
    }

    pub fn create_seller(&self, seller: Seller) -> Seller {
        self.sellers_by_user.insert(seller.user_id, seller.id);
        self.sellers.insert(seller.id, seller.clone());
        seller
    }

    pub fn find_seller(&self, id: Uuid) -> Option<Seller> {
        self.sellers.get(&id).map(|s| s.clone())
    }

    pub fn find_seller_by_user(&self, user_id: Uuid) -> Option<Seller> {
        let id = *self.sellers_by_user.get(&user_id)?;
        self.find_seller(id)
    }

    pub fn save_seller(&self, seller: Seller) {
        self.sellers.insert(seller.id, seller);
    }
}
