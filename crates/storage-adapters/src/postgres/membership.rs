use async_trait::async_trait;
use chrono::Utc;
use domains::ports::MembershipRepository;
use domains::*;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use super::{col, db_err, project_err, text_col, PgStore};

fn membership_from(row: &PgRow) -> Result<Membership> {
    Ok(Membership {
        project_id: col(row, "project_id")?,
        user_id: col(row, "user_id")?,
        role: text_col(row, "role")?,
        joined_at: col(row, "joined_at")?,
    })
}

fn request_from(row: &PgRow) -> Result<MembershipRequest> {
    Ok(MembershipRequest {
        id: col(row, "id")?,
        project_id: col(row, "project_id")?,
        user_id: col(row, "user_id")?,
        role: text_col(row, "role")?,
        message: col(row, "message")?,
        status: text_col(row, "status")?,
        created_at: col(row, "created_at")?,
        decided_at: col(row, "decided_at")?,
    })
}

const CLOSE_PENDING: &str = "UPDATE membership_requests SET status = $2, decided_at = $3 \
     WHERE id = $1 AND status = 'pending' RETURNING *";

#[async_trait]
impl MembershipRepository for PgStore {
    async fn insert_membership(&self, membership: Membership) -> Result<Membership> {
        sqlx::query(
            "INSERT INTO memberships (project_id, user_id, role, joined_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(membership.project_id)
        .bind(membership.user_id)
        .bind(membership.role.as_str())
        .bind(membership.joined_at)
        .execute(&self.pool)
        .await
        .map_err(project_err(membership.project_id))?;
        Ok(membership)
    }

    async fn find_membership(&self, project_id: Uuid, user_id: Uuid) -> Result<Option<Membership>> {
        let row = sqlx::query("SELECT * FROM memberships WHERE project_id = $1 AND user_id = $2")
            .bind(project_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(membership_from).transpose()
    }

    async fn delete_membership(&self, project_id: Uuid, user_id: Uuid) -> Result<bool> {
        let done = sqlx::query("DELETE FROM memberships WHERE project_id = $1 AND user_id = $2")
            .bind(project_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(done.rows_affected() == 1)
    }

    async fn list_members(&self, project_id: Uuid) -> Result<Vec<ProjectMember>> {
        let rows = sqlx::query(
            "SELECT m.*, u.username FROM memberships m JOIN users u ON u.id = m.user_id \
             WHERE m.project_id = $1 ORDER BY m.joined_at DESC",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.iter()
            .map(|row| {
                Ok(ProjectMember {
                    membership: membership_from(row)?,
                    username: col(row, "username")?,
                })
            })
            .collect()
    }

    async fn count_members(&self, project_id: Uuid) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM memberships WHERE project_id = $1")
            .bind(project_id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)
    }

    async fn insert_request(&self, request: MembershipRequest) -> Result<MembershipRequest> {
        sqlx::query(
            "INSERT INTO membership_requests \
             (id, project_id, user_id, role, message, status, created_at, decided_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(request.id)
        .bind(request.project_id)
        .bind(request.user_id)
        .bind(request.role.as_str())
        .bind(&request.message)
        .bind(request.status.as_str())
        .bind(request.created_at)
        .bind(request.decided_at)
        .execute(&self.pool)
        .await
        .map_err(project_err(request.project_id))?;
        Ok(request)
    }

    async fn get_request(&self, id: Uuid) -> Result<Option<MembershipRequest>> {
        let row = sqlx::query("SELECT * FROM membership_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(request_from).transpose()
    }

    async fn find_pending_request(
        &self,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<MembershipRequest>> {
        let row = sqlx::query(
            "SELECT * FROM membership_requests \
             WHERE project_id = $1 AND user_id = $2 AND status = 'pending'",
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        row.as_ref().map(request_from).transpose()
    }

    async fn list_pending_requests(&self, project_id: Uuid) -> Result<Vec<MembershipRequest>> {
        let rows = sqlx::query(
            "SELECT * FROM membership_requests WHERE project_id = $1 AND status = 'pending' \
             ORDER BY created_at",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.iter().map(request_from).collect()
    }

    async fn close_request(
        &self,
        id: Uuid,
        status: RequestStatus,
    ) -> Result<Option<MembershipRequest>> {
        let row = sqlx::query(CLOSE_PENDING)
            .bind(id)
            .bind(status.as_str())
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(request_from).transpose()
    }

    async fn approve_request(&self, id: Uuid) -> Result<Option<(MembershipRequest, Membership)>> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        // Of two concurrent approvals only one still finds the row pending
        let row = sqlx::query(CLOSE_PENDING)
            .bind(id)
            .bind(RequestStatus::Approved.as_str())
            .bind(Utc::now())
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_err)?;
        let Some(row) = row else {
            tx.rollback().await.map_err(db_err)?;
            return Ok(None);
        };
        let request = request_from(&row)?;

        sqlx::query(
            "INSERT INTO memberships (project_id, user_id, role, joined_at) VALUES ($1, $2, $3, $4) \
             ON CONFLICT (project_id, user_id) DO NOTHING",
        )
        .bind(request.project_id)
        .bind(request.user_id)
        .bind(request.role.as_str())
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        let row = sqlx::query("SELECT * FROM memberships WHERE project_id = $1 AND user_id = $2")
            .bind(request.project_id)
            .bind(request.user_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(db_err)?;
        let membership = membership_from(&row)?;

        tx.commit().await.map_err(db_err)?;
        Ok(Some((request, membership)))
    }
}
