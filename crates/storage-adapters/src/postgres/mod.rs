//! # PostgreSQL Store
//!
//! `sqlx`-backed implementation of every repository port. Rows are mapped by
//! hand; enums live in TEXT columns and round-trip through `as_str`/`FromStr`.
//!
//! Uniqueness is left to the schema (see `migrations/`). A unique violation is
//! translated into the `ConflictKind` that matches the constraint name, so a
//! lost race surfaces exactly like a pre-existing row.

mod accounts;
mod catalog;
mod intake;
mod membership;
mod publication;
mod showcase;

use std::time::Duration;

use domains::{ConflictKind, DomainError, Result};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Postgres, Row};
use uuid::Uuid;

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Opens a connection pool. The schema is not touched; call `migrate`.
    pub async fn connect(url: &str, max_connections: u32, acquire_timeout: Duration) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(url)
            .await
            .map_err(db_err)?;
        tracing::info!(max_connections, "postgres pool ready");
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the embedded migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DomainError::Internal(format!("migration failed: {e}")))?;
        Ok(())
    }

    /// Round trip used by the health check.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await.map_err(db_err)?;
        Ok(())
    }
}

/// Constraint names from `0001_init.sql`.
fn conflict_for(constraint: &str) -> Option<ConflictKind> {
    match constraint {
        "users_username_key" => Some(ConflictKind::UsernameTaken),
        "categories_name_key" | "spotlight_categories_kind_key" => Some(ConflictKind::DuplicateName),
        "memberships_project_user_key" => Some(ConflictKind::AlreadyMember),
        "membership_requests_pending_key" => Some(ConflictKind::AlreadyPending),
        "newsletter_subscriptions_email_key" => Some(ConflictKind::DuplicateActive),
        _ => None,
    }
}

pub(crate) fn db_err(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            if let Some(kind) = db.constraint().and_then(conflict_for) {
                return DomainError::Conflict(kind);
            }
        }
    }
    tracing::error!(error = %err, "database error");
    DomainError::Internal(err.to_string())
}

/// Like `db_err`, but a foreign-key violation means the project was deleted
/// between the service's lookup and this insert.
pub(crate) fn project_err(project_id: Uuid) -> impl FnOnce(sqlx::Error) -> DomainError {
    move |err| {
        if let sqlx::Error::Database(db) = &err {
            let on_project = db.constraint().is_some_and(|c| c.ends_with("_project_id_fkey"));
            if db.is_foreign_key_violation() && on_project {
                return DomainError::not_found("Project", project_id);
            }
        }
        db_err(err)
    }
}

/// Typed column read that reports decode failures as `Internal`.
pub(crate) fn col<'r, T>(row: &'r PgRow, name: &str) -> Result<T>
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    row.try_get(name).map_err(db_err)
}

/// Reads a TEXT column into one of the domain's text enums.
pub(crate) fn text_col<T>(row: &PgRow, name: &str) -> Result<T>
where
    T: std::str::FromStr<Err = DomainError>,
{
    col::<String>(row, name)?.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_names_map_to_conflicts() {
        assert_eq!(conflict_for("users_username_key"), Some(ConflictKind::UsernameTaken));
        assert_eq!(
            conflict_for("membership_requests_pending_key"),
            Some(ConflictKind::AlreadyPending)
        );
        assert_eq!(
            conflict_for("newsletter_subscriptions_email_key"),
            Some(ConflictKind::DuplicateActive)
        );
        assert_eq!(conflict_for("projects_pkey"), None);
    }

    #[test]
    fn non_database_errors_are_internal() {
        let err = db_err(sqlx::Error::RowNotFound);
        assert!(matches!(err, DomainError::Internal(_)));
        let err = project_err(Uuid::now_v7())(sqlx::Error::RowNotFound);
        assert!(matches!(err, DomainError::Internal(_)));
    }
}
