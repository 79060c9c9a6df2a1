//! Session request/response bodies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{SessionId, TranscriptEntry};

/// POST /api/sessions
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSessionRequest {
    pub provider: String,
    pub api_key: String,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionCreatedResponse {
    pub session_id: SessionId,
    pub provider: String,
    pub model: String,
}

/// POST /api/sessions/{id}/messages
#[derive(Debug, Clone, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerResponse {
    pub answer: String,
    pub transcript_length: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranscriptResponse {
    pub session_id: SessionId,
    pub created_at: DateTime<Utc>,
    pub messages: Vec<TranscriptEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_is_optional() {
        let request: CreateSessionRequest =
            serde_json::from_str(r#"{"provider":"Groq","api_key":"gsk_x"}"#).unwrap();

        assert_eq!(request.provider, "Groq");
        assert!(request.model.is_none());
    }
}
