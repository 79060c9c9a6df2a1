//! Course banner, provider list and preset questions

use axum::extract::State;

use crate::api::state::AppState;
use crate::api::types::{
    CourseInfoResponse, Json, ProviderInfo, ProvidersResponse, SampleQuestionInfo,
    SampleQuestionsResponse,
};
use crate::domain::course::{MISSING_CREDENTIALS_MESSAGE, pending_sample_message};
use crate::domain::{ProviderKind, SAMPLE_QUESTIONS};

/// GET /api/info
pub async fn course_info(State(state): State<AppState>) -> Json<CourseInfoResponse> {
    let retriever = state.pipeline.retriever();

    Json(CourseInfoResponse {
        title: state.course.title.clone(),
        subtitle: state.course.subtitle.clone(),
        notice: state.course.notice.clone(),
        missing_credentials_message: MISSING_CREDENTIALS_MESSAGE,
        top_k: retriever.top_k(),
        index: retriever.index().stats(),
    })
}

/// GET /api/providers
pub async fn list_providers() -> Json<ProvidersResponse> {
    Json(ProvidersResponse {
        providers: ProviderKind::ALL.into_iter().map(ProviderInfo::from).collect(),
    })
}

/// GET /api/sample-questions
pub async fn list_sample_questions() -> Json<SampleQuestionsResponse> {
    let questions = SAMPLE_QUESTIONS
        .iter()
        .enumerate()
        .map(|(i, sample)| SampleQuestionInfo {
            number: i + 1,
            sample: *sample,
            pending_message: pending_sample_message(sample.question),
        })
        .collect();

    Json(SampleQuestionsResponse { questions })
}
