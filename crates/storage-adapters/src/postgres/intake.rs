use async_trait::async_trait;
use chrono::Utc;
use domains::ports::IntakeRepository;
use domains::*;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use super::{col, db_err, PgStore};

fn subscription_from(row: &PgRow) -> Result<NewsletterSubscription> {
    Ok(NewsletterSubscription {
        id: col(row, "id")?,
        email: col(row, "email")?,
        name: col(row, "name")?,
        is_active: col(row, "is_active")?,
        subscribed_at: col(row, "subscribed_at")?,
        updated_at: col(row, "updated_at")?,
        subscription_source: col(row, "subscription_source")?,
        interests: col(row, "interests")?,
    })
}

#[async_trait]
impl IntakeRepository for PgStore {
    async fn insert_contact_message(&self, message: ContactMessage) -> Result<ContactMessage> {
        sqlx::query(
            "INSERT INTO contact_messages (id, name, email, phone_number, message, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(message.id)
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.phone_number)
        .bind(&message.message)
        .bind(message.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(message)
    }

    async fn list_contact_messages(&self) -> Result<Vec<ContactMessage>> {
        let rows = sqlx::query("SELECT * FROM contact_messages ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter()
            .map(|row| {
                Ok(ContactMessage {
                    id: col(row, "id")?,
                    name: col(row, "name")?,
                    email: col(row, "email")?,
                    phone_number: col(row, "phone_number")?,
                    message: col(row, "message")?,
                    created_at: col(row, "created_at")?,
                })
            })
            .collect()
    }

    async fn insert_subscription(
        &self,
        subscription: NewsletterSubscription,
    ) -> Result<NewsletterSubscription> {
        sqlx::query(
            "INSERT INTO newsletter_subscriptions (id, email, name, is_active, subscribed_at, \
             updated_at, subscription_source, interests) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(subscription.id)
        .bind(&subscription.email)
        .bind(&subscription.name)
        .bind(subscription.is_active)
        .bind(subscription.subscribed_at)
        .bind(subscription.updated_at)
        .bind(&subscription.subscription_source)
        .bind(&subscription.interests)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(subscription)
    }

    async fn find_subscription_by_email(&self, email: &str) -> Result<Option<NewsletterSubscription>> {
        let row = sqlx::query("SELECT * FROM newsletter_subscriptions WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(subscription_from).transpose()
    }

    async fn deactivate_subscription(&self, id: Uuid) -> Result<Option<NewsletterSubscription>> {
        // Only an active row gets a fresh `updated_at`
        sqlx::query(
            "UPDATE newsletter_subscriptions SET is_active = FALSE, updated_at = $2 \
             WHERE id = $1 AND is_active",
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        let row = sqlx::query("SELECT * FROM newsletter_subscriptions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(subscription_from).transpose()
    }

    async fn list_subscriptions(&self) -> Result<Vec<NewsletterSubscription>> {
        let rows = sqlx::query("SELECT * FROM newsletter_subscriptions ORDER BY subscribed_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(subscription_from).collect()
    }
}
