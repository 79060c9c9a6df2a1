//! Per-user chat sessions

mod context;
mod repository;
mod transcript;

pub use context::{SessionContext, SessionId};
pub use repository::{SessionStore, SharedSession};
pub use transcript::{Transcript, TranscriptEntry};
