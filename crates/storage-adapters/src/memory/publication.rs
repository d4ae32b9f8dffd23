use async_trait::async_trait;
use domains::ports::ArticleRepository;
use domains::*;
use uuid::Uuid;

use super::{cap, snapshot, MemoryStore};

impl MemoryStore {
    /// Articles carry the author's current display name, never a stored copy.
    fn with_author_name(&self, mut article: Article) -> Article {
        if let Some(author) = self.users.get(&article.author_id) {
            article.author_name = author.display_name().to_string();
        }
        article
    }
}

#[async_trait]
impl ArticleRepository for MemoryStore {
    async fn insert_article(&self, article: Article) -> Result<Article> {
        self.articles.insert(article.id, article.clone());
        Ok(self.with_author_name(article))
    }

    async fn get_article(&self, id: Uuid) -> Result<Option<Article>> {
        let article = self.articles.get(&id).map(|a| a.value().clone());
        Ok(article.map(|a| self.with_author_name(a)))
    }

    async fn update_article(&self, article: Article) -> Result<Article> {
        match self.articles.get_mut(&article.id) {
            Some(mut stored) => *stored = article.clone(),
            None => return Err(DomainError::not_found("Article", article.id)),
        }
        Ok(self.with_author_name(article))
    }

    async fn list_articles(&self, visibility: Visibility, limit: Option<i64>) -> Result<Vec<Article>> {
        let mut rows: Vec<_> = snapshot(&self.articles)
            .into_iter()
            .filter(|a| visibility.allows(a))
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.created_at.cmp(&a.created_at)));
        Ok(cap(rows, limit)
            .into_iter()
            .map(|a| self.with_author_name(a))
            .collect())
    }
}
