//! HTTP request and response types

pub mod catalog;
pub mod error;
pub mod json;
pub mod session;

pub use catalog::{
    CourseInfoResponse, ProviderInfo, ProvidersResponse, SampleQuestionInfo,
    SampleQuestionsResponse,
};
pub use error::{ApiError, ApiErrorResponse, ApiErrorType};
pub use json::Json;
pub use session::{
    AnswerResponse, AskRequest, CreateSessionRequest, SessionCreatedResponse, TranscriptResponse,
};
