use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Requested analysis scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisType {
    Market,
    User,
    Competitor,
    #[default]
    Full,
}

impl AnalysisType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisType::Market => "market",
            AnalysisType::User => "user",
            AnalysisType::Competitor => "competitor",
            AnalysisType::Full => "full",
        }
    }

    #[must_use]
    pub fn includes_market(self) -> bool {
        matches!(self, AnalysisType::Market | AnalysisType::Full)
    }

    #[must_use]
    pub fn includes_user(self) -> bool {
        matches!(self, AnalysisType::User | AnalysisType::Full)
    }

    #[must_use]
    pub fn includes_competitor(self) -> bool {
        matches!(self, AnalysisType::Competitor | AnalysisType::Full)
    }
}

impl std::fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AnalysisType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "market" => Ok(AnalysisType::Market),
            "user" => Ok(AnalysisType::User),
            "competitor" => Ok(AnalysisType::Competitor),
            "full" => Ok(AnalysisType::Full),
            other => Err(format!(
                "unknown analysis type '{other}'; expected market, user, competitor, or full"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl TaskStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::Processing => write!(f, "processing"),
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("task cannot move from {from} to {to}")]
    InvalidTransition { from: TaskStatus, to: TaskStatus },
}

/// Lifecycle record for one analysis request.
///
/// Status only moves forward along `pending -> processing -> completed | failed`
/// and progress never decreases. Every mutator enforces this and leaves the
/// record untouched when it refuses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisTask {
    pub task_id: Uuid,
    pub url: String,
    pub analysis_type: AnalysisType,
    pub status: TaskStatus,
    pub progress: u8,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub result: Option<serde_json::Value>,
    pub error: Option<String>,
}

impl AnalysisTask {
    #[must_use]
    pub fn new(url: impl Into<String>, analysis_type: AnalysisType) -> Self {
        Self {
            task_id: Uuid::new_v4(),
            url: url.into(),
            analysis_type,
            status: TaskStatus::Pending,
            progress: 0,
            message: "analysis queued".to_string(),
            created_at: Utc::now(),
            completed_at: None,
            result: None,
            error: None,
        }
    }

    /// `pending -> processing`.
    ///
    /// # Errors
    ///
    /// Returns `TaskError::InvalidTransition` unless the task is pending.
    pub fn start(&mut self, message: impl Into<String>) -> Result<(), TaskError> {
        self.guard(TaskStatus::Pending, TaskStatus::Processing)?;
        self.status = TaskStatus::Processing;
        self.message = message.into();
        Ok(())
    }

    /// Record progress while processing.
    ///
    /// Values are capped at 99 (100 is reserved for completion). An update
    /// lower than the current progress is ignored, message included.
    ///
    /// # Errors
    ///
    /// Returns `TaskError::InvalidTransition` unless the task is processing.
    pub fn advance(&mut self, progress: u8, message: impl Into<String>) -> Result<(), TaskError> {
        self.guard(TaskStatus::Processing, TaskStatus::Processing)?;
        let progress = progress.min(99);
        if progress >= self.progress {
            self.progress = progress;
            self.message = message.into();
        }
        Ok(())
    }

    /// `processing -> completed`, attaching the serialized report.
    ///
    /// # Errors
    ///
    /// Returns `TaskError::InvalidTransition` unless the task is processing.
    pub fn complete(
        &mut self,
        result: serde_json::Value,
        message: impl Into<String>,
    ) -> Result<(), TaskError> {
        self.guard(TaskStatus::Processing, TaskStatus::Completed)?;
        self.status = TaskStatus::Completed;
        self.progress = 100;
        self.message = message.into();
        self.result = Some(result);
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    /// Any non-terminal state `-> failed`. No partial result is kept.
    ///
    /// # Errors
    ///
    /// Returns `TaskError::InvalidTransition` if the task already finished.
    pub fn fail(&mut self, error: impl Into<String>) -> Result<(), TaskError> {
        if self.status.is_terminal() {
            return Err(TaskError::InvalidTransition {
                from: self.status,
                to: TaskStatus::Failed,
            });
        }
        let error = error.into();
        self.status = TaskStatus::Failed;
        self.message = format!("analysis failed: {error}");
        self.error = Some(error);
        self.result = None;
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    fn guard(&self, expected: TaskStatus, to: TaskStatus) -> Result<(), TaskError> {
        if self.status == expected {
            Ok(())
        } else {
            Err(TaskError::InvalidTransition {
                from: self.status,
                to,
            })
        }
    }
}
