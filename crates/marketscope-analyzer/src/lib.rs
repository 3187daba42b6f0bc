//! Inference-backed market, user and competitor analyzers.
//!
//! Each analyzer fetches the page, identifies the industry, then runs one
//! inference call per facet. Any failure routes that analyzer alone to a
//! URL-only inference attempt and then to a canned default, so `analyze`
//! always returns a schema-valid result.

pub mod client;
pub mod competitor;
pub mod error;
pub mod extractor;
pub mod lenient;
pub mod market;
pub mod prompts;
mod runner;
pub mod stage;
pub mod types;
pub mod user;

pub use client::{InferenceClient, OpenAiClient};
pub use competitor::CompetitorAnalyzer;
pub use error::{AnalyzerError, InferenceError};
pub use extractor::StructuredExtractor;
pub use lenient::JsonObject;
pub use market::MarketAnalyzer;
pub use stage::{AnalyzerKind, AnalyzerStage, NoopObserver, StageObserver};
pub use types::{
    Analyzed, AnalyzerOutput, CompetitorAnalysis, CompetitorProfile, IndustryInfo, MarketTrends,
    Origin, UserProfile,
};
pub use user::UserAnalyzer;
