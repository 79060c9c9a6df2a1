//! Chat session handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use tracing::{debug, info};

use crate::api::state::AppState;
use crate::api::types::{
    AnswerResponse, ApiError, AskRequest, CreateSessionRequest, Json, SessionCreatedResponse,
    TranscriptResponse,
};
use crate::domain::{SessionContext, SessionId, SharedSession};

/// POST /api/sessions
///
/// Validates the credentials and builds the chat model; no provider request
/// is made until the first question.
pub async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionCreatedResponse>), ApiError> {
    let (credentials, client) =
        state
            .llm_factory
            .create_from_parts(&request.provider, &request.api_key, request.model)?;

    let session = SessionContext::new(credentials, client);
    let response = SessionCreatedResponse {
        session_id: session.id(),
        provider: session.credentials().provider().display_name().to_string(),
        model: session.credentials().effective_model().to_string(),
    };

    state.sessions.insert(session).await?;
    info!(
        session_id = %response.session_id,
        provider = %response.provider,
        model = %response.model,
        "Session started"
    );

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/sessions/{id}/messages
pub async fn get_transcript(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<TranscriptResponse>, ApiError> {
    let session = find_session(&state, &session_id).await?;
    let session = session.lock().await;

    Ok(Json(TranscriptResponse {
        session_id: session.id(),
        created_at: session.created_at(),
        messages: session.transcript().entries().to_vec(),
    }))
}

/// POST /api/sessions/{id}/messages
///
/// Questions to the same session are answered one at a time.
pub async fn ask_question(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AnswerResponse>, ApiError> {
    let session = find_session(&state, &session_id).await?;
    let mut session = session.lock().await;

    debug!(session_id = %session.id(), "Answering question");
    let answer = session.ask(&state.pipeline, &request.question).await?;

    Ok(Json(AnswerResponse {
        answer,
        transcript_length: session.transcript().len(),
    }))
}

/// DELETE /api/sessions/{id}
pub async fn end_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: SessionId = session_id.parse()?;

    if state.sessions.remove(&id).await? {
        info!(session_id = %id, "Session ended");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(format!("Session '{}' not found", id)))
    }
}

async fn find_session(state: &AppState, session_id: &str) -> Result<SharedSession, ApiError> {
    let id: SessionId = session_id.parse()?;

    state
        .sessions
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Session '{}' not found", id)))
}
