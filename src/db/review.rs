//! Review listing across texts and codes

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::Result;

/// A flattened review entry joining a segment with its text and code
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReviewEntry {
    pub segment_id: String,
    pub text_title: String,
    pub code_name: String,
    pub code_color: String,
    pub selected_text: String,
    pub created_at: String,
}

/// Review repository
pub struct ReviewRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ReviewRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all coded segments, newest first
    ///
    /// Ties on the timestamp fall back to reverse insertion order.
    pub async fn list(&self) -> Result<Vec<ReviewEntry>> {
        let entries = sqlx::query_as::<_, ReviewEntry>(
            r#"
            SELECT s.id AS segment_id, t.title AS text_title, c.name AS code_name,
                   c.color AS code_color, s.selected_text, s.created_at
            FROM segments s
            JOIN texts t ON t.id = s.text_id
            JOIN codes c ON c.id = s.code_id
            ORDER BY s.created_at DESC, s.rowid DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{
        initialize_schema, CodeRepository, CreateCode, CreateSegment, CreateText,
        SegmentRepository, TextRepository,
    };

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        initialize_schema(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_list_joins_and_orders_newest_first() {
        let pool = setup_test_db().await;

        let text = TextRepository::new(&pool)
            .create(&CreateText {
                title: "Interview 1".to_string(),
                content: "one two three".to_string(),
            })
            .await
            .unwrap();
        let code = CodeRepository::new(&pool)
            .create(&CreateCode {
                name: "numbers".to_string(),
                description: None,
                color: Some("#00ff00".to_string()),
            })
            .await
            .unwrap();

        let repo = SegmentRepository::new(&pool);
        let first = repo
            .create(&CreateSegment {
                text_id: text.id.clone(),
                code_id: code.id.clone(),
                selected_text: "one".to_string(),
                start: 0,
                end: 3,
            })
            .await
            .unwrap();
        let second = repo
            .create(&CreateSegment {
                text_id: text.id.clone(),
                code_id: code.id.clone(),
                selected_text: "two".to_string(),
                start: 4,
                end: 7,
            })
            .await
            .unwrap();

        let entries = ReviewRepository::new(&pool).list().await.unwrap();

        assert_eq!(entries.len(), 2);
        // newest first; equal timestamps fall back to reverse insertion
        assert_eq!(entries[0].segment_id, second.id);
        assert_eq!(entries[1].segment_id, first.id);
        assert_eq!(entries[0].text_title, "Interview 1");
        assert_eq!(entries[0].code_name, "numbers");
        assert_eq!(entries[0].code_color, "#00ff00");
        assert_eq!(entries[0].selected_text, "two");
    }

    #[tokio::test]
    async fn test_list_empty_store() {
        let pool = setup_test_db().await;
        let entries = ReviewRepository::new(&pool).list().await.unwrap();
        assert!(entries.is_empty());
    }
}
