//! Text store database operations

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Source text record
///
/// Content is immutable once created: segment offsets are only valid
/// against an unchanged content, so no update operation exists.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TextDocument {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: String,
}

/// Create text request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateText {
    pub title: String,
    pub content: String,
}

/// Text repository
pub struct TextRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> TextRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a text by id
    pub async fn get(&self, id: &str) -> Result<Option<TextDocument>> {
        let text = sqlx::query_as::<_, TextDocument>(
            r#"
            SELECT id, title, content, created_at
            FROM texts
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(text)
    }

    /// List all texts, newest first
    pub async fn list(&self) -> Result<Vec<TextDocument>> {
        let texts = sqlx::query_as::<_, TextDocument>(
            r#"
            SELECT id, title, content, created_at
            FROM texts
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(texts)
    }

    /// Create a new text
    pub async fn create(&self, data: &CreateText) -> Result<TextDocument> {
        if data.content.is_empty() {
            return Err(AppError::Validation(
                "text content must not be empty".to_string(),
            ));
        }

        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO texts (id, title, content, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&data.title)
        .bind(&data.content)
        .bind(&now)
        .execute(self.pool)
        .await?;

        self.get(&id)
            .await?
            .ok_or_else(|| AppError::Internal("Failed to fetch created text".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize_schema;

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        initialize_schema(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let pool = setup_test_db().await;
        let repo = TextRepository::new(&pool);

        let text = repo
            .create(&CreateText {
                title: "Interview 1".to_string(),
                content: "The quick fox".to_string(),
            })
            .await
            .unwrap();

        let loaded = repo.get(&text.id).await.unwrap().unwrap();
        assert_eq!(loaded.title, "Interview 1");
        assert_eq!(loaded.content, "The quick fox");
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let pool = setup_test_db().await;
        let repo = TextRepository::new(&pool);

        assert!(repo.get("nonexistent").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_empty_content() {
        let pool = setup_test_db().await;
        let repo = TextRepository::new(&pool);

        let err = repo
            .create(&CreateText {
                title: "Empty".to_string(),
                content: String::new(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }
}
