//! # Typed Inputs
//!
//! One struct per operation, deserialized from request bodies and checked with
//! `validator`. Failures surface as `DomainError::Validation` with one entry per
//! rejected field, sorted by field name.

use std::borrow::Cow;

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::errors::{DomainError, FieldError, Result};

pub const REQUIRED: &str = "This field is required.";

/// Runs the input's field rules.
pub fn validate<T: Validate>(input: &T) -> Result<()> {
    input
        .validate()
        .map_err(|errors| DomainError::Validation(field_errors(&errors)))
}

pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value ({}).", e.code));
                FieldError::new(field.to_string(), message)
            })
        })
        .collect();
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

fn not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required").with_message(Cow::Borrowed(REQUIRED)));
    }
    Ok(())
}

fn valid_username(value: &str) -> std::result::Result<(), ValidationError> {
    not_blank(value)?;
    let ok = value
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'));
    if !ok {
        return Err(ValidationError::new("username").with_message(Cow::Borrowed(
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        )));
    }
    Ok(())
}

/// Trims a free-text field, mapping `None` to the empty string.
pub fn text(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_string()
}

/// Trims an optional field, mapping blank values to `None`.
pub fn optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// ── Accounts ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(
        custom(function = "valid_username"),
        length(max = 150, message = "Ensure this value has at most 150 characters.")
    )]
    pub username: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[validate(length(min = 8, message = "This password is too short. It must contain at least 8 characters."))]
    pub password: String,
    pub password_confirm: String,
    #[validate(length(max = 150, message = "Ensure this value has at most 150 characters."))]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginInput {
    #[validate(custom(function = "not_blank"))]
    pub username: String,
    #[validate(custom(function = "not_blank"))]
    pub password: String,
}

// ── Membership ──────────────────────────────────────────────────────────────

/// Body of a direct join. The role defaults to student.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JoinInput {
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct JoinRequestInput {
    pub role: Option<String>,
    #[validate(length(max = 2000, message = "Ensure this value has at most 2000 characters."))]
    pub message: Option<String>,
}

// ── Publication ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ArticleInput {
    #[validate(
        custom(function = "not_blank"),
        length(max = 250, message = "Ensure this value has at most 250 characters.")
    )]
    pub title: String,
    #[validate(custom(function = "not_blank"))]
    pub content: String,
    pub image: Option<String>,
    /// New articles are published unless this is `Some(false)`
    pub is_published: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BlogPostInput {
    #[validate(
        custom(function = "not_blank"),
        length(max = 250, message = "Ensure this value has at most 250 characters.")
    )]
    pub title: String,
    #[validate(
        custom(function = "not_blank"),
        length(max = 150, message = "Ensure this value has at most 150 characters.")
    )]
    pub author: String,
    #[validate(custom(function = "not_blank"))]
    pub content: String,
    pub image: Option<String>,
    /// Defaults to today
    pub date: Option<NaiveDate>,
    pub is_published: Option<bool>,
}

// ── Intake ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubscribeInput {
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[validate(length(max = 150, message = "Ensure this value has at most 150 characters."))]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ContactInput {
    #[validate(
        custom(function = "not_blank"),
        length(max = 150, message = "Ensure this value has at most 150 characters.")
    )]
    pub name: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[validate(length(max = 30, message = "Ensure this value has at most 30 characters."))]
    pub phone_number: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub message: String,
}

// ── Catalog (staff) ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CategoryInput {
    #[validate(
        custom(function = "not_blank"),
        length(max = 150, message = "Ensure this value has at most 150 characters.")
    )]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProjectInput {
    #[validate(required(message = "This field is required."))]
    pub category_id: Option<Uuid>,
    #[validate(
        required(message = "This field is required."),
        custom(function = "not_blank")
    )]
    pub image: Option<String>,
    #[validate(
        custom(function = "not_blank"),
        length(max = 200, message = "Ensure this value has at most 200 characters.")
    )]
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProgramInput {
    #[validate(required(message = "This field is required."))]
    pub category_id: Option<Uuid>,
    pub image: Option<String>,
    #[validate(
        custom(function = "not_blank"),
        length(max = 200, message = "Ensure this value has at most 200 characters.")
    )]
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SchoolInput {
    #[validate(
        custom(function = "not_blank"),
        length(max = 200, message = "Ensure this value has at most 200 characters.")
    )]
    pub name: String,
    #[validate(length(max = 300, message = "Ensure this value has at most 300 characters."))]
    pub location: Option<String>,
    pub image: Option<String>,
    pub badge: Option<String>,
    pub description: Option<String>,
    pub partnership_date: Option<NaiveDate>,
    #[validate(length(max = 200, message = "Ensure this value has at most 200 characters."))]
    pub contact_person: Option<String>,
    #[validate(email(message = "Enter a valid email address."))]
    pub contact_email: Option<String>,
    #[validate(length(max = 20, message = "Ensure this value has at most 20 characters."))]
    pub contact_phone: Option<String>,
    #[validate(length(max = 200, message = "Ensure this value has at most 200 characters."))]
    pub website: Option<String>,
    #[validate(range(min = 1, message = "Ensure this value is greater than or equal to 1."))]
    pub student_population: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ClubInput {
    pub school_id: Option<Uuid>,
    pub icon: Option<String>,
    pub image: Option<String>,
    #[validate(
        custom(function = "not_blank"),
        length(max = 200, message = "Ensure this value has at most 200 characters.")
    )]
    pub title: String,
    pub description: Option<String>,
    #[validate(length(max = 200, message = "Ensure this value has at most 200 characters."))]
    pub location: Option<String>,
    #[validate(length(max = 200, message = "Ensure this value has at most 200 characters."))]
    pub meeting_schedule: Option<String>,
    #[validate(length(max = 200, message = "Ensure this value has at most 200 characters."))]
    pub coordinator: Option<String>,
    #[validate(range(min = 0, message = "Ensure this value is greater than or equal to 0."))]
    pub member_count: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_article_reports_both_fields() {
        let input = ArticleInput {
            title: "   ".into(),
            content: String::new(),
            image: None,
            is_published: None,
        };
        match validate(&input) {
            Err(DomainError::Validation(fields)) => {
                let names: Vec<_> = fields.iter().map(|f| f.field.as_str()).collect();
                assert_eq!(names, vec!["content", "title"]);
                assert!(fields.iter().all(|f| f.message == REQUIRED));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn project_requires_category_and_image() {
        let input = ProjectInput {
            category_id: None,
            image: None,
            title: "Solar kits".into(),
            description: None,
        };
        let Err(DomainError::Validation(fields)) = validate(&input) else {
            panic!("expected validation error");
        };
        let names: Vec<_> = fields.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(names, vec!["category_id", "image"]);
    }

    #[test]
    fn usernames_reject_spaces() {
        let input = RegisterInput {
            username: "bad name".into(),
            email: "bad@example.org".into(),
            password: "longenough".into(),
            password_confirm: "longenough".into(),
            full_name: None,
        };
        assert!(validate(&input).is_err());
    }

    #[test]
    fn optional_helpers_trim() {
        assert_eq!(optional(&Some("  ".into())), None);
        assert_eq!(optional(&Some(" x ".into())), Some("x".into()));
        assert_eq!(text(&None), "");
    }
}
