use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyzerKind {
    Market,
    User,
    Competitor,
}

impl std::fmt::Display for AnalyzerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalyzerKind::Market => write!(f, "market"),
            AnalyzerKind::User => write!(f, "user"),
            AnalyzerKind::Competitor => write!(f, "competitor"),
        }
    }
}

/// Steps of one analyzer run.
///
/// Success path: `Fetching -> Identifying -> Extracting -> Assembled`.
/// Recovery path: any step `-> Fallback -> Assembled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyzerStage {
    Fetching,
    Identifying,
    Extracting,
    Fallback,
    Assembled,
}

impl std::fmt::Display for AnalyzerStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalyzerStage::Fetching => write!(f, "fetching"),
            AnalyzerStage::Identifying => write!(f, "identifying"),
            AnalyzerStage::Extracting => write!(f, "extracting"),
            AnalyzerStage::Fallback => write!(f, "fallback"),
            AnalyzerStage::Assembled => write!(f, "assembled"),
        }
    }
}

/// Receives stage events as an analyzer works.
///
/// Called inline from the analyzer task, so implementations must not block.
pub trait StageObserver: Send + Sync {
    fn on_stage(&self, kind: AnalyzerKind, stage: AnalyzerStage);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl StageObserver for NoopObserver {
    fn on_stage(&self, _kind: AnalyzerKind, _stage: AnalyzerStage) {}
}
