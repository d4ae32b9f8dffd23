//! User-facing status messages attached to every state transition.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    pub level: Level,
    pub text: String,
}

impl StatusMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: Level::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            text: text.into(),
        }
    }
}

/// A mutation result paired with the message shown to the user.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome<T> {
    pub message: StatusMessage,
    pub data: T,
}

impl<T> Outcome<T> {
    pub fn new(message: StatusMessage, data: T) -> Self {
        Self { message, data }
    }
}
