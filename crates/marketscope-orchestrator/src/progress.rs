//! Progress reporting driven by pipeline milestones and analyzer stage events.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use marketscope_analyzer::{AnalyzerKind, AnalyzerStage, StageObserver};
use uuid::Uuid;

use crate::store::TaskStore;

/// Progress when classification finishes and analyzers begin.
pub const ANALYZERS_START: u8 = 10;
/// Progress when every requested analyzer has assembled its result.
pub const ANALYZERS_END: u8 = 85;

/// Receives pipeline progress: coarse milestones plus per-analyzer stages.
pub trait ProgressSink: StageObserver {
    fn milestone(&self, progress: u8, message: &str);
}

/// Share of one analyzer's work that is done once it reaches `stage`.
fn stage_fraction(stage: AnalyzerStage) -> f64 {
    match stage {
        AnalyzerStage::Fetching => 0.1,
        AnalyzerStage::Identifying => 0.3,
        AnalyzerStage::Extracting => 0.5,
        AnalyzerStage::Fallback => 0.7,
        AnalyzerStage::Assembled => 1.0,
    }
}

/// Maps stage events from concurrently running analyzers onto the
/// `ANALYZERS_START..=ANALYZERS_END` band.
#[derive(Debug)]
struct StageBand {
    analyzers: usize,
    reached: Mutex<HashMap<AnalyzerKind, AnalyzerStage>>,
}

impl StageBand {
    fn new(analyzers: usize) -> Self {
        Self {
            analyzers: analyzers.max(1),
            reached: Mutex::new(HashMap::new()),
        }
    }

    /// Record `stage` for `kind` and return the overall progress.
    fn record(&self, kind: AnalyzerKind, stage: AnalyzerStage) -> u8 {
        let Ok(mut reached) = self.reached.lock() else {
            return ANALYZERS_START;
        };
        reached.insert(kind, stage);
        let done: f64 = reached.values().copied().map(stage_fraction).sum();
        #[allow(clippy::cast_precision_loss)]
        let share = done / self.analyzers as f64;
        let span = f64::from(ANALYZERS_END - ANALYZERS_START);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let offset = (share.min(1.0) * span).round() as u8;
        ANALYZERS_START + offset
    }
}

/// Writes progress to a task record in the store.
pub struct ProgressTracker {
    store: Arc<dyn TaskStore>,
    task_id: Uuid,
    band: StageBand,
}

impl ProgressTracker {
    #[must_use]
    pub fn new(store: Arc<dyn TaskStore>, task_id: Uuid, analyzers: usize) -> Self {
        Self {
            store,
            task_id,
            band: StageBand::new(analyzers),
        }
    }

    fn write(&self, progress: u8, message: &str) {
        if let Err(e) = self
            .store
            .update(self.task_id, &mut |task| task.advance(progress, message))
        {
            tracing::warn!(task_id = %self.task_id, progress, error = %e, "failed to record progress");
        }
    }
}

impl StageObserver for ProgressTracker {
    fn on_stage(&self, kind: AnalyzerKind, stage: AnalyzerStage) {
        let progress = self.band.record(kind, stage);
        self.write(progress, &format!("{kind} analyzer: {stage}"));
    }
}

impl ProgressSink for ProgressTracker {
    fn milestone(&self, progress: u8, message: &str) {
        self.write(progress, message);
    }
}

/// Logs progress instead of storing it; used for one-shot runs.
pub struct LogProgress {
    band: StageBand,
}

impl LogProgress {
    #[must_use]
    pub fn new(analyzers: usize) -> Self {
        Self {
            band: StageBand::new(analyzers),
        }
    }
}

impl StageObserver for LogProgress {
    fn on_stage(&self, kind: AnalyzerKind, stage: AnalyzerStage) {
        let progress = self.band.record(kind, stage);
        tracing::debug!(analyzer = %kind, %stage, progress, "analyzer stage");
    }
}

impl ProgressSink for LogProgress {
    fn milestone(&self, progress: u8, message: &str) {
        tracing::info!(progress, "{message}");
    }
}
