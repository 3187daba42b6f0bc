//! Shared types for marketscope: configuration, the provenance data model,
//! analysis tasks, and the category catalog.

pub mod app_config;
pub mod catalog;
pub mod category;
pub mod classify;
pub mod config;
pub mod model;
pub mod task;

pub use app_config::{AppConfig, Environment, InferenceSettings};
pub use catalog::{
    Catalog, CompetitorFacts, MarketFacts, RangedValue, StrategyFacts, UserFacts, UserSegment,
};
pub use category::Category;
pub use classify::{CategoryClassifier, KeywordRule};
pub use config::{load_app_config, load_app_config_from_env};
pub use model::{DataSource, DataType, InsightPoint};
pub use task::{AnalysisTask, AnalysisType, TaskError, TaskStatus};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read catalog file {path}: {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog: {0}")]
    CatalogParse(#[from] serde_yaml::Error),

    #[error("catalog validation failed: {0}")]
    Validation(String),
}
