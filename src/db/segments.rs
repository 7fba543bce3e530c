//! Segment store database operations
//!
//! Segments are validated against their parent text before insert: offsets
//! must lie inside the content, and the stored text must equal the content
//! slice (an integrity check against offset drift). Segments are immutable
//! once created; no update or delete operation exists.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::coding::validate_span;
use crate::error::{AppError, Result};

/// Coded segment record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Segment {
    pub id: String,
    #[serde(rename = "textId")]
    pub text_id: String,
    #[serde(rename = "codeId")]
    pub code_id: String,
    #[serde(rename = "selectedText")]
    pub selected_text: String,
    /// Start character offset (inclusive)
    #[serde(rename = "start")]
    pub start_offset: i64,
    /// End character offset (exclusive)
    #[serde(rename = "end")]
    pub end_offset: i64,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// Create segment request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSegment {
    pub text_id: String,
    pub code_id: String,
    pub selected_text: String,
    pub start: usize,
    pub end: usize,
}

/// Segment repository
pub struct SegmentRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SegmentRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a segment by id
    pub async fn get(&self, id: &str) -> Result<Option<Segment>> {
        let segment = sqlx::query_as::<_, Segment>(
            r#"
            SELECT id, text_id, code_id, selected_text, start_offset, end_offset, created_at
            FROM segments
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(segment)
    }

    /// Create a new segment
    ///
    /// Fails with `NotFound` when the referenced text or code does not
    /// exist, and with `Validation` when the span invariants do not hold.
    pub async fn create(&self, data: &CreateSegment) -> Result<Segment> {
        let text: Option<(String,)> = sqlx::query_as("SELECT content FROM texts WHERE id = ?")
            .bind(&data.text_id)
            .fetch_optional(self.pool)
            .await?;
        let (content,) = text
            .ok_or_else(|| AppError::NotFound(format!("Text not found: {}", data.text_id)))?;

        let code_exists: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM codes WHERE id = ?")
            .bind(&data.code_id)
            .fetch_one(self.pool)
            .await?;
        if code_exists.0 == 0 {
            return Err(AppError::NotFound(format!(
                "Code not found: {}",
                data.code_id
            )));
        }

        validate_span(&content, data.start, data.end, &data.selected_text)?;

        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO segments (id, text_id, code_id, selected_text, start_offset, end_offset, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&data.text_id)
        .bind(&data.code_id)
        .bind(&data.selected_text)
        .bind(data.start as i64)
        .bind(data.end as i64)
        .bind(&now)
        .execute(self.pool)
        .await?;

        self.get(&id)
            .await?
            .ok_or_else(|| AppError::Internal("Failed to fetch created segment".to_string()))
    }

    /// List segments for a text, ordered by start offset then creation order
    pub async fn list_for_text(&self, text_id: &str) -> Result<Vec<Segment>> {
        let segments = sqlx::query_as::<_, Segment>(
            r#"
            SELECT id, text_id, code_id, selected_text, start_offset, end_offset, created_at
            FROM segments
            WHERE text_id = ?
            ORDER BY start_offset ASC, rowid ASC
            "#,
        )
        .bind(text_id)
        .fetch_all(self.pool)
        .await?;

        Ok(segments)
    }

    /// List all segments, newest first
    pub async fn list(&self) -> Result<Vec<Segment>> {
        let segments = sqlx::query_as::<_, Segment>(
            r#"
            SELECT id, text_id, code_id, selected_text, start_offset, end_offset, created_at
            FROM segments
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{initialize_schema, CodeRepository, CreateCode, CreateText, TextRepository};

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        initialize_schema(&pool).await.unwrap();
        pool
    }

    async fn create_text(pool: &SqlitePool, content: &str) -> String {
        TextRepository::new(pool)
            .create(&CreateText {
                title: "Notes".to_string(),
                content: content.to_string(),
            })
            .await
            .unwrap()
            .id
    }

    async fn create_code(pool: &SqlitePool, name: &str) -> String {
        CodeRepository::new(pool)
            .create(&CreateCode {
                name: name.to_string(),
                description: None,
                color: None,
            })
            .await
            .unwrap()
            .id
    }

    fn request(text_id: &str, code_id: &str, text: &str, start: usize, end: usize) -> CreateSegment {
        CreateSegment {
            text_id: text_id.to_string(),
            code_id: code_id.to_string(),
            selected_text: text.to_string(),
            start,
            end,
        }
    }

    #[tokio::test]
    async fn test_create_valid_segment() {
        let pool = setup_test_db().await;
        let text_id = create_text(&pool, "The quick fox").await;
        let code_id = create_code(&pool, "animal").await;
        let repo = SegmentRepository::new(&pool);

        let segment = repo
            .create(&request(&text_id, &code_id, "quick", 4, 9))
            .await
            .unwrap();

        assert_eq!(segment.start_offset, 4);
        assert_eq!(segment.end_offset, 9);
        assert_eq!(segment.selected_text, "quick");

        let loaded = repo.get(&segment.id).await.unwrap().unwrap();
        assert_eq!(loaded.text_id, text_id);
        assert_eq!(loaded.code_id, code_id);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_text() {
        let pool = setup_test_db().await;
        let code_id = create_code(&pool, "animal").await;
        let repo = SegmentRepository::new(&pool);

        let err = repo
            .create(&request("missing", &code_id, "quick", 4, 9))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_code() {
        let pool = setup_test_db().await;
        let text_id = create_text(&pool, "The quick fox").await;
        let repo = SegmentRepository::new(&pool);

        let err = repo
            .create(&request(&text_id, "missing", "quick", 4, 9))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_spans() {
        let pool = setup_test_db().await;
        let text_id = create_text(&pool, "The quick fox").await;
        let code_id = create_code(&pool, "animal").await;
        let repo = SegmentRepository::new(&pool);

        // inverted offsets
        let err = repo
            .create(&request(&text_id, &code_id, "quick", 9, 4))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Coding(_)));

        // end past the content
        let err = repo
            .create(&request(&text_id, &code_id, "fox", 10, 99))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Coding(_)));

        // stored text does not match the slice
        let err = repo
            .create(&request(&text_id, &code_id, "brown", 4, 9))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Coding(_)));
    }

    #[tokio::test]
    async fn test_overlapping_segments_are_allowed() {
        let pool = setup_test_db().await;
        let text_id = create_text(&pool, "The quick fox").await;
        let code_id = create_code(&pool, "animal").await;
        let repo = SegmentRepository::new(&pool);

        repo.create(&request(&text_id, &code_id, "The quick", 0, 9))
            .await
            .unwrap();
        repo.create(&request(&text_id, &code_id, "quick fox", 4, 13))
            .await
            .unwrap();
        // identical span, recorded twice
        repo.create(&request(&text_id, &code_id, "quick fox", 4, 13))
            .await
            .unwrap();

        assert_eq!(repo.list_for_text(&text_id).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_list_for_text_ordered_by_start_then_insertion() {
        let pool = setup_test_db().await;
        let text_id = create_text(&pool, "abcdef").await;
        let code_id = create_code(&pool, "x").await;
        let repo = SegmentRepository::new(&pool);

        let late = repo.create(&request(&text_id, &code_id, "ef", 4, 6)).await.unwrap();
        let first = repo.create(&request(&text_id, &code_id, "ab", 0, 2)).await.unwrap();
        let tie_a = repo.create(&request(&text_id, &code_id, "cd", 2, 4)).await.unwrap();
        let tie_b = repo.create(&request(&text_id, &code_id, "cde", 2, 5)).await.unwrap();

        let ids: Vec<String> = repo
            .list_for_text(&text_id)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![first.id, tie_a.id, tie_b.id, late.id]);
    }
}
