//! Code store database operations

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Code definition record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Code {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub created_at: String,
}

/// Create code request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCode {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
}

/// Code repository
pub struct CodeRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CodeRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a code by id
    pub async fn get(&self, id: &str) -> Result<Option<Code>> {
        let code = sqlx::query_as::<_, Code>(
            r#"
            SELECT id, name, description, color, created_at
            FROM codes
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(code)
    }

    /// List all codes ordered by name
    pub async fn list(&self) -> Result<Vec<Code>> {
        let codes = sqlx::query_as::<_, Code>(
            r#"
            SELECT id, name, description, color, created_at
            FROM codes
            ORDER BY name ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(codes)
    }

    /// Create a new code
    ///
    /// Code names are unique across the store.
    pub async fn create(&self, data: &CreateCode) -> Result<Code> {
        if data.name.is_empty() {
            return Err(AppError::Validation(
                "code name must not be empty".to_string(),
            ));
        }

        let existing: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM codes WHERE name = ?")
            .bind(&data.name)
            .fetch_one(self.pool)
            .await?;
        if existing.0 > 0 {
            return Err(AppError::Validation(format!(
                "Code name already exists: {}",
                data.name
            )));
        }

        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let color = data.color.as_deref().unwrap_or("#ffff00");

        sqlx::query(
            r#"
            INSERT INTO codes (id, name, description, color, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(color)
        .bind(&now)
        .execute(self.pool)
        .await?;

        self.get(&id)
            .await?
            .ok_or_else(|| AppError::Internal("Failed to fetch created code".to_string()))
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
        let repo = CodeRepository::new(&pool);

        let code = repo
            .create(&CreateCode {
                name: "animal".to_string(),
                description: Some("animal references".to_string()),
                color: Some("#ff8800".to_string()),
            })
            .await
            .unwrap();

        let loaded = repo.get(&code.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "animal");
        assert_eq!(loaded.color, "#ff8800");
    }

    #[tokio::test]
    async fn test_create_defaults_color() {
        let pool = setup_test_db().await;
        let repo = CodeRepository::new(&pool);

        let code = repo
            .create(&CreateCode {
                name: "plain".to_string(),
                description: None,
                color: None,
            })
            .await
            .unwrap();

        assert_eq!(code.color, "#ffff00");
        assert!(code.description.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let pool = setup_test_db().await;
        let repo = CodeRepository::new(&pool);

        repo.create(&CreateCode {
            name: "animal".to_string(),
            description: None,
            color: None,
        })
        .await
        .unwrap();

        let err = repo
            .create(&CreateCode {
                name: "animal".to_string(),
                description: Some("again".to_string()),
                color: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_list_ordered_by_name() {
        let pool = setup_test_db().await;
        let repo = CodeRepository::new(&pool);

        for name in ["zebra", "apple", "mango"] {
            repo.create(&CreateCode {
                name: name.to_string(),
                description: None,
                color: None,
            })
            .await
            .unwrap();
        }

        let names: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["apple", "mango", "zebra"]);
    }
}
