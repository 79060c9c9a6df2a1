use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use moka::notification::RemovalCause;
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::session::{SessionContext, SessionId, SessionStore, SharedSession};
use crate::domain::DomainError;

const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);
const MAX_SESSIONS: u64 = 10_000;

/// Sessions live in process memory and vanish on restart.
///
/// A session nobody has touched for the idle timeout is evicted, taking its
/// credentials and transcript with it.
#[derive(Debug)]
pub struct InMemorySessionStore {
    sessions: Cache<SessionId, SharedSession>,
}

impl InMemorySessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        let sessions = Cache::<SessionId, SharedSession>::builder()
            .max_capacity(MAX_SESSIONS)
            .time_to_idle(idle_timeout)
            .eviction_listener(|id: Arc<SessionId>, _: SharedSession, cause: RemovalCause| {
                if matches!(cause, RemovalCause::Expired | RemovalCause::Size) {
                    debug!(session_id = %id, ?cause, "Session evicted");
                }
            })
            .build();

        Self { sessions }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_TIMEOUT)
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, session: SessionContext) -> Result<SharedSession, DomainError> {
        let id = session.id();
        let shared = Arc::new(Mutex::new(session));

        self.sessions.insert(id, Arc::clone(&shared)).await;
        debug!(session_id = %id, "Session registered");

        Ok(shared)
    }

    async fn get(&self, id: &SessionId) -> Result<Option<SharedSession>, DomainError> {
        Ok(self.sessions.get(id).await)
    }

    async fn remove(&self, id: &SessionId) -> Result<bool, DomainError> {
        let removed = self.sessions.remove(id).await.is_some();
        if removed {
            debug!(session_id = %id, "Session ended");
        }
        Ok(removed)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        self.sessions.run_pending_tasks().await;
        Ok(self.sessions.entry_count() as usize)
    }
}
