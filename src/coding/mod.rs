//! Span-annotation engine
//!
//! The core of the server: recording, validating and rendering labeled
//! character ranges over immutable source text.
//!
//! - Offset resolution: a raw text selection (or an exact offset pair from
//!   the hosting UI) becomes stable character offsets
//! - Span validation: offsets and stored text are checked against the
//!   source content before anything is persisted
//! - Overlap rendering: stored segments become display fragments covering
//!   the text exactly once, with overlapping codes kept as sets
//! - Session: the load/select/apply-code state machine

mod renderer;
mod resolver;
mod session;
mod types;

pub use renderer::render;
pub use resolver::{resolve, resolve_range};
pub use session::{CodingSession, SessionState, SessionView};
pub use types::{char_len, slice_by_chars, validate_span, CodingError, Fragment, Selection};
