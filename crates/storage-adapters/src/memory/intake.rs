use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use domains::ports::IntakeRepository;
use domains::*;
use uuid::Uuid;

use super::{snapshot, MemoryStore};

#[async_trait]
impl IntakeRepository for MemoryStore {
    async fn insert_contact_message(&self, message: ContactMessage) -> Result<ContactMessage> {
        self.contact_messages.insert(message.id, message.clone());
        Ok(message)
    }

    async fn list_contact_messages(&self) -> Result<Vec<ContactMessage>> {
        let mut rows = snapshot(&self.contact_messages);
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert_subscription(
        &self,
        subscription: NewsletterSubscription,
    ) -> Result<NewsletterSubscription> {
        match self.subscription_emails.entry(subscription.email.clone()) {
            Entry::Occupied(_) => Err(DomainError::Conflict(ConflictKind::DuplicateActive)),
            Entry::Vacant(slot) => {
                self.subscriptions.insert(subscription.id, subscription.clone());
                slot.insert(subscription.id);
                Ok(subscription)
            }
        }
    }

    async fn find_subscription_by_email(&self, email: &str) -> Result<Option<NewsletterSubscription>> {
        let id = match self.subscription_emails.get(email) {
            Some(id) => *id.value(),
            None => return Ok(None),
        };
        Ok(self.subscriptions.get(&id).map(|s| s.value().clone()))
    }

    async fn deactivate_subscription(&self, id: Uuid) -> Result<Option<NewsletterSubscription>> {
        let Some(mut subscription) = self.subscriptions.get_mut(&id) else {
            return Ok(None);
        };
        if subscription.is_active {
            subscription.is_active = false;
            subscription.updated_at = Utc::now();
        }
        Ok(Some(subscription.clone()))
    }

    async fn list_subscriptions(&self) -> Result<Vec<NewsletterSubscription>> {
        let mut rows = snapshot(&self.subscriptions);
        rows.sort_by(|a, b| b.subscribed_at.cmp(&a.subscribed_at));
        Ok(rows)
    }
}
