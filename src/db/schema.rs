//! Database schema initialization

use sqlx::SqlitePool;

use crate::error::Result;

/// Initialize the database schema
pub async fn initialize_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(SCHEMA_SQL)
        .execute(pool)
        .await?;

    Ok(())
}

const SCHEMA_SQL: &str = r#"
-- Source texts (immutable once created; segment offsets index into content)
CREATE TABLE IF NOT EXISTS texts (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_texts_title ON texts(title);

-- Code definitions (analyst-defined labels)
CREATE TABLE IF NOT EXISTS codes (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    description TEXT,
    color TEXT NOT NULL DEFAULT '#ffff00',
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Coded segments (character ranges of a text tagged with a code)
-- 'end' is an SQL keyword, so offsets are stored as start_offset/end_offset
CREATE TABLE IF NOT EXISTS segments (
    id TEXT PRIMARY KEY,
    text_id TEXT NOT NULL,
    code_id TEXT NOT NULL,
    selected_text TEXT NOT NULL,
    start_offset INTEGER NOT NULL,
    end_offset INTEGER NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_segments_text_id ON segments(text_id);
CREATE INDEX IF NOT EXISTS idx_segments_code_id ON segments(code_id);
CREATE INDEX IF NOT EXISTS idx_segments_created ON segments(created_at);
"#;
