use marketscope_scraper::FetchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("inference service returned status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("inference service returned no content")]
    EmptyResponse,

    #[error("malformed JSON for {context}: {source}")]
    Malformed {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("expected a JSON object for {context}")]
    NotAnObject { context: String },
}

/// Failure of one analyzer step. Always recovered by the analyzer's fallback.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("inference failed: {0}")]
    Inference(#[from] InferenceError),
}
