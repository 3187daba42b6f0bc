//! Task lifecycle: admit, run in the background, record the outcome.

use std::sync::Arc;

use marketscope_core::{AnalysisTask, AnalysisType};
use marketscope_report::ResultSerializer;
use tokio::task::{JoinError, JoinHandle};
use uuid::Uuid;

use crate::error::{OrchestratorError, PipelineError};
use crate::pipeline::{analyzer_count, InsightPipeline};
use crate::progress::{ProgressSink, ProgressTracker};
use crate::store::TaskStore;

/// Owns task state transitions and drives the pipeline for each task.
///
/// Analyzer failures never fail a task; only defects (a panic in the
/// pipeline, a store or serialization error) move a task to `failed`.
#[derive(Clone)]
pub struct TaskOrchestrator {
    store: Arc<dyn TaskStore>,
    pipeline: Arc<InsightPipeline>,
}

impl std::fmt::Debug for TaskOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskOrchestrator")
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}

impl TaskOrchestrator {
    #[must_use]
    pub fn new(store: Arc<dyn TaskStore>, pipeline: Arc<InsightPipeline>) -> Self {
        Self { store, pipeline }
    }

    #[must_use]
    pub fn pipeline(&self) -> &InsightPipeline {
        &self.pipeline
    }

    /// Admit `url`, create a pending task, and start it in the background.
    ///
    /// Returns the task as created; poll for later states. Must be called
    /// from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// - [`OrchestratorError::InvalidUrl`]: not an absolute `http`/`https` URL;
    ///   no task is created.
    /// - [`OrchestratorError::Store`]: the task could not be recorded.
    pub fn submit(
        &self,
        url: &str,
        analysis_type: AnalysisType,
    ) -> Result<AnalysisTask, OrchestratorError> {
        let task = self.create_task(url, analysis_type)?;
        let _handle = self.spawn(task.task_id);
        Ok(task)
    }

    /// Validate `url` and record a pending task without starting it.
    ///
    /// # Errors
    ///
    /// Same as [`Self::submit`].
    pub fn create_task(
        &self,
        url: &str,
        analysis_type: AnalysisType,
    ) -> Result<AnalysisTask, OrchestratorError> {
        let url = url.trim();
        marketscope_scraper::parse_http_url(url).map_err(|e| match e {
            marketscope_scraper::FetchError::InvalidUrl { url, reason } => {
                OrchestratorError::InvalidUrl { url, reason }
            }
            other => OrchestratorError::InvalidUrl {
                url: url.to_string(),
                reason: other.to_string(),
            },
        })?;

        let task = AnalysisTask::new(url, analysis_type);
        self.store.insert(task.clone())?;
        tracing::info!(
            task_id = %task.task_id,
            url = %task.url,
            analysis_type = %analysis_type,
            "analysis task created"
        );
        Ok(task)
    }

    /// Current state of a task, or `None` for unknown ids.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestratorError::Store`] if the store cannot be read.
    pub fn poll(&self, task_id: Uuid) -> Result<Option<AnalysisTask>, OrchestratorError> {
        Ok(self.store.get(task_id)?)
    }

    /// All known tasks, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestratorError::Store`] if the store cannot be read.
    pub fn list(&self) -> Result<Vec<AnalysisTask>, OrchestratorError> {
        Ok(self.store.list()?)
    }

    /// Run `execute` for `task_id` on the runtime.
    pub fn spawn(&self, task_id: Uuid) -> JoinHandle<Result<(), OrchestratorError>> {
        let orchestrator = self.clone();
        tokio::spawn(async move { orchestrator.execute(task_id).await })
    }

    /// Drive a pending task to a terminal state.
    ///
    /// Only the caller whose `start` transition succeeds owns the task; a
    /// refused start (the task is already running or finished) returns the
    /// error and leaves the record alone. After a successful start the
    /// pipeline runs on its own Tokio task so a panic inside it is caught at
    /// the join and recorded as a failure instead of unwinding into the
    /// caller.
    ///
    /// # Errors
    ///
    /// - [`OrchestratorError::Store`]: the task is unknown or could not be
    ///   started; nothing was changed.
    /// - Any later error, after the task has been moved to `failed`
    ///   (best effort).
    pub async fn execute(&self, task_id: Uuid) -> Result<(), OrchestratorError> {
        let task = self
            .store
            .update(task_id, &mut |t| t.start("analysis started"))?;
        tracing::info!(
            task_id = %task_id,
            url = %task.url,
            analysis_type = %task.analysis_type,
            live = self.pipeline.is_live(),
            "analysis started"
        );

        let store = Arc::clone(&self.store);
        let pipeline = Arc::clone(&self.pipeline);
        let outcome = match tokio::spawn(run_task(store, pipeline, task)).await {
            Ok(result) => result,
            Err(join_error) => Err(OrchestratorError::Defect(describe_join_error(join_error))),
        };

        if let Err(e) = &outcome {
            tracing::error!(task_id = %task_id, error = %e, "analysis task failed");
            fail_task_best_effort(self.store.as_ref(), task_id, &e.to_string());
        }
        outcome
    }
}

async fn run_task(
    store: Arc<dyn TaskStore>,
    pipeline: Arc<InsightPipeline>,
    task: AnalysisTask,
) -> Result<(), OrchestratorError> {
    let task_id = task.task_id;
    let tracker = ProgressTracker::new(
        Arc::clone(&store),
        task_id,
        analyzer_count(task.analysis_type),
    );
    let report = pipeline
        .run(&task.url, task.analysis_type, &tracker)
        .await;

    tracker.milestone(95, "serializing report");
    let value = ResultSerializer::serialize(&report).map_err(PipelineError::from)?;

    let mut value = Some(value);
    store.update(task_id, &mut |t| {
        t.complete(value.take().unwrap_or_default(), "analysis completed")
    })?;
    tracing::info!(
        task_id = %task_id,
        category = %report.category,
        degraded = report.live_analysis.as_ref().is_some_and(|l| l.is_degraded()),
        "analysis completed"
    );
    Ok(())
}

/// Best-effort transition to `failed`; a store error here is only logged.
fn fail_task_best_effort(store: &dyn TaskStore, task_id: Uuid, message: &str) {
    if let Err(e) = store.update(task_id, &mut |t| t.fail(message)) {
        tracing::error!(
            task_id = %task_id,
            error = %e,
            "failed to mark analysis task as failed"
        );
    }
}

fn describe_join_error(error: JoinError) -> String {
    if error.is_cancelled() {
        return "analysis task was cancelled".to_string();
    }
    let payload = error.into_panic();
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string());
    format!("analysis task panicked: {detail}")
}
