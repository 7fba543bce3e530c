//! Coding session state machine
//!
//! Holds the analyst's current text and pending selection, and orchestrates
//! load -> select -> apply-code against the stores. The state is an explicit
//! object with pure transition methods; the manager wraps it in a lock and
//! holds the write guard across each operation's store calls, so two
//! mutations never interleave.

use std::sync::Arc;

use serde::Serialize;
use sqlx::SqlitePool;
use tokio::sync::RwLock;

use crate::db::{CreateSegment, CreateText, Segment, SegmentRepository, TextDocument, TextRepository};
use crate::error::Result;

use super::resolver;
use super::types::{char_len, CodingError, Selection};

/// Session lifecycle states
#[derive(Debug, Clone)]
pub enum SessionState {
    /// No text loaded yet
    Empty,
    /// A text is loaded and ready for selection
    TextLoaded { text: TextDocument },
    /// A selection is pending a code
    SelectionActive {
        text: TextDocument,
        selection: Selection,
    },
}

impl SessionState {
    /// The loaded text, if any
    pub fn text(&self) -> Option<&TextDocument> {
        match self {
            SessionState::Empty => None,
            SessionState::TextLoaded { text }
            | SessionState::SelectionActive { text, .. } => Some(text),
        }
    }

    /// The pending selection, if any
    pub fn selection(&self) -> Option<&Selection> {
        match self {
            SessionState::SelectionActive { selection, .. } => Some(selection),
            _ => None,
        }
    }

    /// Transition: a text was loaded, dropping any pending selection
    pub fn with_text(&self, text: TextDocument) -> SessionState {
        SessionState::TextLoaded { text }
    }

    /// Transition: a selection was resolved against the loaded text
    pub fn with_selection(
        &self,
        selection: Selection,
    ) -> std::result::Result<SessionState, CodingError> {
        match self {
            SessionState::Empty => Err(CodingError::NoTextLoaded),
            SessionState::TextLoaded { text }
            | SessionState::SelectionActive { text, .. } => Ok(SessionState::SelectionActive {
                text: text.clone(),
                selection,
            }),
        }
    }

    /// Transition: the pending selection was coded or discarded
    pub fn without_selection(&self) -> std::result::Result<SessionState, CodingError> {
        match self {
            SessionState::SelectionActive { text, .. } => Ok(SessionState::TextLoaded {
                text: text.clone(),
            }),
            _ => Err(CodingError::NoActiveSelection),
        }
    }
}

/// Serializable snapshot of the session
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<TextDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<Selection>,
}

impl From<&SessionState> for SessionView {
    fn from(state: &SessionState) -> Self {
        match state {
            SessionState::Empty => SessionView {
                state: "empty",
                text: None,
                selection: None,
            },
            SessionState::TextLoaded { text } => SessionView {
                state: "textLoaded",
                text: Some(text.clone()),
                selection: None,
            },
            SessionState::SelectionActive { text, selection } => SessionView {
                state: "selectionActive",
                text: Some(text.clone()),
                selection: Some(selection.clone()),
            },
        }
    }
}

/// Manages the analyst's coding session
#[derive(Clone)]
pub struct CodingSession {
    inner: Arc<CodingSessionInner>,
}

struct CodingSessionInner {
    pool: SqlitePool,
    state: RwLock<SessionState>,
}

impl CodingSession {
    /// Create a new, empty session
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            inner: Arc::new(CodingSessionInner {
                pool,
                state: RwLock::new(SessionState::Empty),
            }),
        }
    }

    /// Load a new text into the session
    ///
    /// Persists the text and moves the session to `TextLoaded`. A pending
    /// selection is dropped without being recorded.
    pub async fn load_text(&self, title: &str, content: &str) -> Result<TextDocument> {
        let mut state = self.inner.state.write().await;

        if state.selection().is_some() {
            tracing::debug!("Discarding pending selection on text load");
        }

        let repo = TextRepository::new(&self.inner.pool);
        let text = repo
            .create(&CreateText {
                title: title.to_string(),
                content: content.to_string(),
            })
            .await?;

        tracing::info!(
            text_id = %text.id,
            title = %text.title,
            chars = char_len(&text.content),
            "Loaded text into session"
        );

        *state = state.with_text(text.clone());
        Ok(text)
    }

    /// Select a passage of the loaded text by its raw string
    ///
    /// On failure the session keeps its prior state; nothing is recorded.
    pub async fn select(&self, raw_selection: &str) -> Result<Selection> {
        let mut state = self.inner.state.write().await;

        let text = state.text().ok_or(CodingError::NoTextLoaded)?;
        let selection = resolver::resolve(&text.content, raw_selection)?;

        tracing::info!(
            text_id = %text.id,
            start = selection.start,
            end = selection.end,
            "Resolved selection"
        );

        let next = state.with_selection(selection.clone())?;
        *state = next;
        Ok(selection)
    }

    /// Select a passage by exact character offsets
    pub async fn select_range(&self, start: usize, end: usize) -> Result<Selection> {
        let mut state = self.inner.state.write().await;

        let text = state.text().ok_or(CodingError::NoTextLoaded)?;
        let selection = resolver::resolve_range(&text.content, start, end)?;

        tracing::info!(
            text_id = %text.id,
            start = selection.start,
            end = selection.end,
            "Accepted selection range"
        );

        let next = state.with_selection(selection.clone())?;
        *state = next;
        Ok(selection)
    }

    /// Apply a code to the pending selection, persisting a segment
    ///
    /// On success the selection is cleared. On any store error the selection
    /// stays active so the caller can retry or correct.
    pub async fn apply_code(&self, code_id: &str) -> Result<Segment> {
        let mut state = self.inner.state.write().await;

        let (text_id, selection) = match &*state {
            SessionState::SelectionActive { text, selection } => {
                (text.id.clone(), selection.clone())
            }
            SessionState::Empty => return Err(CodingError::NoTextLoaded.into()),
            SessionState::TextLoaded { .. } => return Err(CodingError::NoActiveSelection.into()),
        };

        let repo = SegmentRepository::new(&self.inner.pool);
        let segment = repo
            .create(&CreateSegment {
                text_id,
                code_id: code_id.to_string(),
                selected_text: selection.text.clone(),
                start: selection.start,
                end: selection.end,
            })
            .await?;

        tracing::info!(
            segment_id = %segment.id,
            code_id = %segment.code_id,
            start = selection.start,
            end = selection.end,
            "Recorded coded segment"
        );

        let next = state.without_selection()?;
        *state = next;
        Ok(segment)
    }

    /// Discard the pending selection without persisting anything
    pub async fn clear_selection(&self) -> Result<()> {
        let mut state = self.inner.state.write().await;

        let next = state.without_selection()?;
        *state = next;

        tracing::debug!("Selection cleared");
        Ok(())
    }

    /// Snapshot of the current session state
    pub async fn view(&self) -> SessionView {
        let state = self.inner.state.read().await;
        SessionView::from(&*state)
    }
}
