//! Application state management

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::coding::CodingSession;
use crate::config::Config;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    db: SqlitePool,
    session: CodingSession,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: Config, db: SqlitePool) -> Self {
        let session = CodingSession::new(db.clone());
        Self {
            inner: Arc::new(AppStateInner {
                config,
                db,
                session,
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the database pool
    pub fn db(&self) -> &SqlitePool {
        &self.inner.db
    }

    /// Get the coding session
    pub fn session(&self) -> &CodingSession {
        &self.inner.session
    }
}
