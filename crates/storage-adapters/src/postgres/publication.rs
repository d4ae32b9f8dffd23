use async_trait::async_trait;
use domains::ports::ArticleRepository;
use domains::*;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use super::{col, db_err, PgStore};

/// The author's display name is joined in on every read.
const SELECT_ARTICLE: &str = "SELECT a.*, \
     COALESCE(NULLIF(TRIM(u.full_name), ''), u.username) AS author_name \
     FROM articles a JOIN users u ON u.id = a.author_id";

fn article_from(row: &PgRow) -> Result<Article> {
    Ok(Article {
        id: col(row, "id")?,
        title: col(row, "title")?,
        image: col(row, "image")?,
        author_id: col(row, "author_id")?,
        author_name: col(row, "author_name")?,
        date: col(row, "date")?,
        content: col(row, "content")?,
        is_published: col(row, "is_published")?,
        created_at: col(row, "created_at")?,
        updated_at: col(row, "updated_at")?,
    })
}

#[async_trait]
impl ArticleRepository for PgStore {
    async fn insert_article(&self, article: Article) -> Result<Article> {
        sqlx::query(
            "INSERT INTO articles (id, title, image, author_id, date, content, is_published, \
             created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(article.id)
        .bind(&article.title)
        .bind(&article.image)
        .bind(article.author_id)
        .bind(article.date)
        .bind(&article.content)
        .bind(article.is_published)
        .bind(article.created_at)
        .bind(article.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        self.get_article(article.id)
            .await?
            .ok_or_else(|| DomainError::not_found("Article", article.id))
    }

    async fn get_article(&self, id: Uuid) -> Result<Option<Article>> {
        let row = sqlx::query(&format!("{SELECT_ARTICLE} WHERE a.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(article_from).transpose()
    }

    async fn update_article(&self, article: Article) -> Result<Article> {
        let done = sqlx::query(
            "UPDATE articles SET title = $2, image = $3, date = $4, content = $5, \
             is_published = $6, updated_at = $7 WHERE id = $1",
        )
        .bind(article.id)
        .bind(&article.title)
        .bind(&article.image)
        .bind(article.date)
        .bind(&article.content)
        .bind(article.is_published)
        .bind(article.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        if done.rows_affected() == 0 {
            return Err(DomainError::not_found("Article", article.id));
        }
        self.get_article(article.id)
            .await?
            .ok_or_else(|| DomainError::not_found("Article", article.id))
    }

    async fn list_articles(&self, visibility: Visibility, limit: Option<i64>) -> Result<Vec<Article>> {
        let (everything, author) = match visibility {
            Visibility::Published => (false, None),
            Visibility::PublishedOrAuthoredBy(user_id) => (false, Some(user_id)),
            Visibility::Everything => (true, None),
        };
        let rows = sqlx::query(&format!(
            "{SELECT_ARTICLE} WHERE ($1 OR a.is_published OR a.author_id = $2) \
             ORDER BY a.date DESC, a.created_at DESC LIMIT $3"
        ))
        .bind(everything)
        .bind(author)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.iter().map(article_from).collect()
    }
}
