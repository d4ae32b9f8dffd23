//! # Newsletter Intake
//!
//! Emails are normalised (trimmed, lower-cased) before any lookup. A row is
//! never deleted: `deactivate` only flips `is_active`.

use std::sync::Arc;

use domains::inputs::{self, SubscribeInput};
use domains::ports::IntakeRepository;
use domains::{ConflictKind, DomainError, NewsletterSubscription, Result, User};
use uuid::Uuid;

use crate::require_staff;
use crate::status::StatusMessage;

pub struct NewsletterService {
    intake: Arc<dyn IntakeRepository>,
    source_label: String,
}

impl NewsletterService {
    pub fn new(intake: Arc<dyn IntakeRepository>, source_label: impl Into<String>) -> Self {
        Self {
            intake,
            source_label: source_label.into(),
        }
    }

    pub async fn subscribe(&self, input: SubscribeInput) -> Result<NewsletterSubscription> {
        let input = SubscribeInput {
            email: input.email.trim().to_lowercase(),
            name: inputs::optional(&input.name),
        };
        inputs::validate(&input)?;

        if let Some(existing) = self.intake.find_subscription_by_email(&input.email).await? {
            let kind = if existing.is_active {
                ConflictKind::DuplicateActive
            } else {
                ConflictKind::InactiveSubscription
            };
            return Err(DomainError::Conflict(kind));
        }

        let subscription = NewsletterSubscription::new(
            input.email,
            input.name.unwrap_or_default(),
            &self.source_label,
        );
        let subscription = self.intake.insert_subscription(subscription).await?;
        tracing::info!(subscription_id = %subscription.id, source = %subscription.subscription_source, "newsletter subscription created");
        Ok(subscription)
    }

    /// Soft delete; already inactive rows are returned unchanged.
    pub async fn deactivate(&self, subscription_id: Uuid, staff: &User) -> Result<NewsletterSubscription> {
        require_staff(staff, "Only staff can manage newsletter subscriptions.")?;
        let subscription = self
            .intake
            .deactivate_subscription(subscription_id)
            .await?
            .ok_or_else(|| DomainError::not_found("NewsletterSubscription", subscription_id))?;
        tracing::info!(subscription_id = %subscription_id, "newsletter subscription deactivated");
        Ok(subscription)
    }

    pub async fn list_subscriptions(&self, staff: &User) -> Result<Vec<NewsletterSubscription>> {
        require_staff(staff, "Only staff can manage newsletter subscriptions.")?;
        self.intake.list_subscriptions().await
    }
}

pub fn subscribed_message() -> StatusMessage {
    StatusMessage::success(
        "Thank you for subscribing to our newsletter! You will receive updates about our programs and initiatives.",
    )
}

pub fn deactivated_message() -> StatusMessage {
    StatusMessage::success("The subscription has been deactivated.")
}
