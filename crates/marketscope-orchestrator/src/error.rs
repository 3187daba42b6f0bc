use marketscope_analyzer::InferenceError;
use marketscope_core::TaskError;
use marketscope_report::ReportError;
use marketscope_scraper::FetchError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("task store lock poisoned")]
    Poisoned,

    #[error("task {0} not found")]
    NotFound(Uuid),

    #[error("task {0} already exists")]
    Duplicate(Uuid),

    #[error(transparent)]
    Transition(#[from] TaskError),
}

/// Failures building or running the insight pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to build content fetcher: {0}")]
    Fetcher(#[from] FetchError),

    #[error("failed to build inference client: {0}")]
    Inference(#[from] InferenceError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// A bug surfaced while running a task, such as a panic in an analyzer.
    #[error("internal error: {0}")]
    Defect(String),
}
