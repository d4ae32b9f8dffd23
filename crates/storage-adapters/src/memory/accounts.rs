use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use domains::ports::UserRepository;
use domains::{Capability, ConflictKind, DomainError, Result, User};
use uuid::Uuid;

use super::MemoryStore;

impl MemoryStore {
    /// Flips the staff flag. Staff accounts are provisioned out of band.
    pub fn set_staff(&self, user_id: Uuid, is_staff: bool) -> Result<()> {
        let mut user = self
            .users
            .get_mut(&user_id)
            .ok_or_else(|| DomainError::not_found("User", user_id))?;
        user.is_staff = is_staff;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert_user(&self, user: User) -> Result<User> {
        match self.usernames.entry(user.username.clone()) {
            Entry::Occupied(_) => Err(DomainError::Conflict(ConflictKind::UsernameTaken)),
            Entry::Vacant(slot) => {
                self.users.insert(user.id, user.clone());
                slot.insert(user.id);
                Ok(user)
            }
        }
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let id = match self.usernames.get(username) {
            Some(id) => *id.value(),
            None => return Ok(None),
        };
        self.get_user(id).await
    }

    async fn grant_capability(&self, user_id: Uuid, capability: Capability) -> Result<bool> {
        let mut user = self
            .users
            .get_mut(&user_id)
            .ok_or_else(|| DomainError::not_found("User", user_id))?;
        Ok(user.capabilities.insert(capability))
    }
}
