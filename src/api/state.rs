//! Application state shared by the HTTP handlers

use std::sync::Arc;

use crate::domain::{CourseInfo, RagPipeline, SessionStore};
use crate::infrastructure::llm::LlmProviderFactory;

/// Read-only pipeline and course data, plus the session registry.
///
/// Cheap to clone; every field is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub course: Arc<CourseInfo>,
    pub pipeline: Arc<RagPipeline>,
    pub sessions: Arc<dyn SessionStore>,
    pub llm_factory: Arc<LlmProviderFactory>,
}

impl AppState {
    pub fn new(
        course: CourseInfo,
        pipeline: RagPipeline,
        sessions: Arc<dyn SessionStore>,
        llm_factory: LlmProviderFactory,
    ) -> Self {
        Self {
            course: Arc::new(course),
            pipeline: Arc::new(pipeline),
            sessions,
            llm_factory: Arc::new(llm_factory),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("course", &self.course.title)
            .field("index", &self.pipeline.retriever().index().name())
            .finish_non_exhaustive()
    }
}
