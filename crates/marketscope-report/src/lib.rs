//! Report assembly for marketscope.
//!
//! [`InsightAggregator`] turns catalog facts into cited [`InsightPoint`]s,
//! [`live`] attaches provenance to inference-backed analyzer results, and
//! [`ResultSerializer`] produces the wire mapping stored on a task.
//!
//! [`InsightPoint`]: marketscope_core::InsightPoint

pub mod aggregator;
pub mod error;
pub mod live;
pub mod report;
pub mod serializer;

pub use aggregator::InsightAggregator;
pub use error::ReportError;
pub use live::{attribute, origin_confidence, Attributed, LiveAnalysis};
pub use report::{
    AnalysisReport, CompetitorEntry, CompetitorSection, MarketSection, StrategicRecommendations,
    UserSection, UserSegmentSection,
};
pub use serializer::ResultSerializer;
