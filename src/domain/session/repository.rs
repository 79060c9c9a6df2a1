use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{SessionContext, SessionId};
use crate::domain::DomainError;

/// A session behind an async lock; one question at a time per session
pub type SharedSession = Arc<Mutex<SessionContext>>;

/// Registry of live sessions
#[async_trait]
pub trait SessionStore: Send + Sync + std::fmt::Debug {
    /// Register a session and return its shared handle
    async fn insert(&self, session: SessionContext) -> Result<SharedSession, DomainError>;

    /// Look up a session by ID
    async fn get(&self, id: &SessionId) -> Result<Option<SharedSession>, DomainError>;

    /// End a session, returning whether it existed
    async fn remove(&self, id: &SessionId) -> Result<bool, DomainError>;

    /// Number of live sessions
    async fn count(&self) -> Result<usize, DomainError>;
}
