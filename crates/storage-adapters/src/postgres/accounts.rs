use async_trait::async_trait;
use domains::ports::UserRepository;
use domains::*;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use super::{col, db_err, PgStore};

const SELECT_USER: &str = "SELECT u.id, u.username, u.email, u.full_name, u.password_hash, \
     u.is_staff, u.date_joined, \
     COALESCE(array_agg(c.capability) FILTER (WHERE c.capability IS NOT NULL), '{}') AS capabilities \
     FROM users u LEFT JOIN user_capabilities c ON c.user_id = u.id";

fn user_from(row: &PgRow) -> Result<User> {
    let capabilities = col::<Vec<String>>(row, "capabilities")?
        .iter()
        .map(|c| c.parse::<Capability>())
        .collect::<Result<_>>()?;
    Ok(User {
        id: col(row, "id")?,
        username: col(row, "username")?,
        email: col(row, "email")?,
        full_name: col(row, "full_name")?,
        password_hash: col(row, "password_hash")?,
        is_staff: col(row, "is_staff")?,
        capabilities,
        date_joined: col(row, "date_joined")?,
    })
}

#[async_trait]
impl UserRepository for PgStore {
    async fn insert_user(&self, user: User) -> Result<User> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;
        sqlx::query(
            "INSERT INTO users (id, username, email, full_name, password_hash, is_staff, date_joined) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(&user.password_hash)
        .bind(user.is_staff)
        .bind(user.date_joined)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        for capability in &user.capabilities {
            sqlx::query("INSERT INTO user_capabilities (user_id, capability) VALUES ($1, $2)")
                .bind(user.id)
                .bind(capability.as_str())
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
        }
        tx.commit().await.map_err(db_err)?;
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query(&format!("{SELECT_USER} WHERE u.id = $1 GROUP BY u.id"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(user_from).transpose()
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!("{SELECT_USER} WHERE u.username = $1 GROUP BY u.id"))
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(user_from).transpose()
    }

    async fn grant_capability(&self, user_id: Uuid, capability: Capability) -> Result<bool> {
        let done = sqlx::query(
            "INSERT INTO user_capabilities (user_id, capability) VALUES ($1, $2) \
             ON CONFLICT (user_id, capability) DO NOTHING",
        )
        .bind(user_id)
        .bind(capability.as_str())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(done.rows_affected() == 1)
    }
}
