//! Task orchestration for marketscope.
//!
//! [`TaskOrchestrator`] admits analysis requests, records them in a
//! [`TaskStore`], and drives each through the [`InsightPipeline`] on a
//! background task, publishing progress as the pipeline reports stages.

pub mod error;
pub mod orchestrator;
pub mod pipeline;
pub mod progress;
pub mod store;

pub use error::{OrchestratorError, PipelineError, StoreError};
pub use orchestrator::TaskOrchestrator;
pub use pipeline::{analyzer_count, InsightPipeline, LiveAnalyzers};
pub use progress::{LogProgress, ProgressSink, ProgressTracker};
pub use store::{InMemoryTaskStore, TaskStore};
