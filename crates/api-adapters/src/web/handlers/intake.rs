use axum::extract::State;
use axum::Json;
use domains::inputs::{ContactInput, SubscribeInput};
use domains::{ContactMessage, NewsletterSubscription};
use services::contact::sent_message;
use services::newsletter::subscribed_message;
use services::Outcome;

use super::Reply;
use crate::web::{AppState, JsonBody};

pub async fn contact(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<ContactInput>,
) -> Reply<ContactMessage> {
    let result = state.contact.submit(input).await;
    state.metrics.track("contact", &result);
    Ok(Json(Outcome::new(sent_message(), result?)))
}

pub async fn subscribe(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<SubscribeInput>,
) -> Reply<NewsletterSubscription> {
    let result = state.newsletter.subscribe(input).await;
    state.metrics.track("subscribe", &result);
    Ok(Json(Outcome::new(subscribed_message(), result?)))
}
