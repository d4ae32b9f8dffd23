//! Contact form intake. Messages are append-only.

use std::sync::Arc;

use chrono::Utc;
use domains::inputs::{self, ContactInput};
use domains::ports::IntakeRepository;
use domains::{ContactMessage, Result, User};
use uuid::Uuid;

use crate::require_staff;
use crate::status::StatusMessage;

pub struct ContactService {
    intake: Arc<dyn IntakeRepository>,
}

impl ContactService {
    pub fn new(intake: Arc<dyn IntakeRepository>) -> Self {
        Self { intake }
    }

    pub async fn submit(&self, input: ContactInput) -> Result<ContactMessage> {
        let input = ContactInput {
            name: input.name.trim().to_string(),
            email: input.email.trim().to_string(),
            phone_number: inputs::optional(&input.phone_number),
            message: input.message.trim().to_string(),
        };
        inputs::validate(&input)?;

        let message = ContactMessage {
            id: Uuid::now_v7(),
            name: input.name,
            email: input.email,
            phone_number: input.phone_number.unwrap_or_default(),
            message: input.message,
            created_at: Utc::now(),
        };
        let message = self.intake.insert_contact_message(message).await?;
        tracing::info!(message_id = %message.id, "contact message received");
        Ok(message)
    }

    pub async fn list_messages(&self, staff: &User) -> Result<Vec<ContactMessage>> {
        require_staff(staff, "Only staff can read contact messages.")?;
        self.intake.list_contact_messages().await
    }
}

pub fn sent_message() -> StatusMessage {
    StatusMessage::success("Thank you! Your message has been sent successfully.")
}
