use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use super::Transcript;
use crate::domain::credentials::ProviderCredentials;
use crate::domain::llm::CompletionClient;
use crate::domain::pipeline::RagPipeline;
use crate::domain::DomainError;

/// Opaque session identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| DomainError::not_found(format!("Session '{}' not found", s)))
    }
}

/// Everything one user's conversation owns: credentials, the chat model
/// built from them, and the transcript.
#[derive(Debug)]
pub struct SessionContext {
    id: SessionId,
    credentials: ProviderCredentials,
    client: Arc<dyn CompletionClient>,
    transcript: Transcript,
    created_at: DateTime<Utc>,
}

impl SessionContext {
    pub fn new(credentials: ProviderCredentials, client: Arc<dyn CompletionClient>) -> Self {
        Self {
            id: SessionId::new(),
            credentials,
            client,
            transcript: Transcript::new(),
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn credentials(&self) -> &ProviderCredentials {
        &self.credentials
    }

    pub fn client(&self) -> &Arc<dyn CompletionClient> {
        &self.client
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Ask one question.
    ///
    /// The question is recorded before the pipeline runs and stays recorded
    /// if it fails; the answer is recorded only on success.
    pub async fn ask(
        &mut self,
        pipeline: &RagPipeline,
        question: &str,
    ) -> Result<String, DomainError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(DomainError::validation("Question must not be empty"));
        }

        self.transcript.push_user(question);
        debug!(session_id = %self.id, turn = self.transcript.len(), "Question recorded");

        match pipeline.answer(question, self.client.as_ref()).await {
            Ok(answer) => {
                self.transcript.push_assistant(answer.clone());
                Ok(answer)
            }
            Err(e) => {
                warn!(session_id = %self.id, error = %e, "Answer failed; session remains usable");
                Err(e)
            }
        }
    }
}
