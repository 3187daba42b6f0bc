use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::classify::{CategoryClassifier, KeywordRule};
use crate::model::{DataSource, DataType};
use crate::ConfigError;

const BUILTIN_CATALOG: &str = include_str!("../catalog/default.yaml");

/// Minimum sources per data type; aggregate facts cite the first two.
const MIN_SOURCES_PER_TYPE: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangedValue {
    pub value: String,
    pub range: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketFacts {
    pub market_size: RangedValue,
    pub cagr: RangedValue,
    pub key_drivers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSegment {
    pub demographics: String,
    pub pain_points: Vec<String>,
    pub behaviors: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFacts {
    pub existing_users: UserSegment,
    pub potential_users: UserSegment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorFacts {
    pub name: String,
    pub market_share: String,
    pub core_advantages: Vec<String>,
    pub website_traffic: String,
    pub trends_score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyFacts {
    pub summary: String,
    pub marketing_opportunities: Vec<String>,
    pub potential_user_opportunities: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct SourceEntry {
    name: String,
    url: String,
    confidence: f64,
    timestamp: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct SourcesFile {
    market_data: Vec<SourceEntry>,
    user_research: Vec<SourceEntry>,
    competitor_analysis: Vec<SourceEntry>,
}

/// On-disk shape of a catalog resource.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    default_category: Category,
    sources: SourcesFile,
    classifier: Vec<KeywordRule>,
    #[serde(default)]
    markets: BTreeMap<Category, MarketFacts>,
    #[serde(default)]
    users: BTreeMap<Category, UserFacts>,
    #[serde(default)]
    competitors: BTreeMap<Category, Vec<CompetitorFacts>>,
    #[serde(default)]
    strategies: BTreeMap<Category, StrategyFacts>,
}

/// Per-category table whose lookups fall back to the default category's entry.
#[derive(Debug, Clone)]
struct CategoryTable<T> {
    default: T,
    entries: BTreeMap<Category, T>,
}

impl<T: Clone> CategoryTable<T> {
    fn build(
        entries: BTreeMap<Category, T>,
        default_category: Category,
        section: &str,
    ) -> Result<Self, ConfigError> {
        let default = entries.get(&default_category).cloned().ok_or_else(|| {
            ConfigError::Validation(format!(
                "default category '{default_category}' has no '{section}' entry"
            ))
        })?;
        Ok(Self { default, entries })
    }

    fn get(&self, category: Category) -> &T {
        self.entries.get(&category).unwrap_or(&self.default)
    }

    fn contains(&self, category: Category) -> bool {
        self.entries.contains_key(&category)
    }
}

/// Validated, immutable category catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    default_category: Category,
    market_data: Vec<DataSource>,
    user_research: Vec<DataSource>,
    competitor_analysis: Vec<DataSource>,
    classifier: CategoryClassifier,
    markets: CategoryTable<MarketFacts>,
    users: CategoryTable<UserFacts>,
    competitors: CategoryTable<Vec<CompetitorFacts>>,
    strategies: CategoryTable<StrategyFacts>,
}

impl Catalog {
    /// The catalog compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` only if the embedded resource is malformed.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_yaml_str(BUILTIN_CATALOG)
    }

    /// Load and validate a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load from `path` when given, otherwise use the built-in catalog.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the override cannot be loaded.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Self::builtin(),
        }
    }

    /// Parse and validate a catalog from YAML text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` on parse or validation failure.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let file: CatalogFile = serde_yaml::from_str(content)?;
        Self::from_file(file)
    }

    fn from_file(file: CatalogFile) -> Result<Self, ConfigError> {
        let market_data = build_sources(file.sources.market_data, DataType::MarketData)?;
        let user_research = build_sources(file.sources.user_research, DataType::UserResearch)?;
        let competitor_analysis =
            build_sources(file.sources.competitor_analysis, DataType::CompetitorAnalysis)?;

        validate_classifier(&file.classifier)?;
        validate_competitors(&file.competitors)?;

        let default_category = file.default_category;
        Ok(Self {
            default_category,
            market_data,
            user_research,
            competitor_analysis,
            classifier: CategoryClassifier::new(file.classifier),
            markets: CategoryTable::build(file.markets, default_category, "markets")?,
            users: CategoryTable::build(file.users, default_category, "users")?,
            competitors: CategoryTable::build(file.competitors, default_category, "competitors")?,
            strategies: CategoryTable::build(file.strategies, default_category, "strategies")?,
        })
    }

    #[must_use]
    pub fn default_category(&self) -> Category {
        self.default_category
    }

    #[must_use]
    pub fn classifier(&self) -> &CategoryClassifier {
        &self.classifier
    }

    /// Source catalog slice for one data type, in catalog order.
    #[must_use]
    pub fn sources(&self, data_type: DataType) -> &[DataSource] {
        match data_type {
            DataType::MarketData => &self.market_data,
            DataType::UserResearch => &self.user_research,
            DataType::CompetitorAnalysis => &self.competitor_analysis,
        }
    }

    #[must_use]
    pub fn market(&self, category: Category) -> &MarketFacts {
        self.markets.get(category)
    }

    #[must_use]
    pub fn users(&self, category: Category) -> &UserFacts {
        self.users.get(category)
    }

    #[must_use]
    pub fn competitors(&self, category: Category) -> &[CompetitorFacts] {
        self.competitors.get(category)
    }

    #[must_use]
    pub fn strategy(&self, category: Category) -> &StrategyFacts {
        self.strategies.get(category)
    }

    /// Whether any section resolves `category` through the default entry.
    #[must_use]
    pub fn falls_back(&self, category: Category) -> bool {
        !(self.markets.contains(category)
            && self.users.contains(category)
            && self.competitors.contains(category)
            && self.strategies.contains(category))
    }
}

fn build_sources(
    entries: Vec<SourceEntry>,
    data_type: DataType,
) -> Result<Vec<DataSource>, ConfigError> {
    if entries.len() < MIN_SOURCES_PER_TYPE {
        return Err(ConfigError::Validation(format!(
            "'{data_type}' needs at least {MIN_SOURCES_PER_TYPE} sources, found {}",
            entries.len()
        )));
    }

    entries
        .into_iter()
        .map(|entry| {
            if entry.name.trim().is_empty() || entry.url.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "'{data_type}' source must have a non-empty name and url"
                )));
            }
            if !(0.0..=1.0).contains(&entry.confidence) {
                return Err(ConfigError::Validation(format!(
                    "source '{}' has confidence {} outside [0, 1]",
                    entry.name, entry.confidence
                )));
            }
            Ok(DataSource::new(
                entry.name,
                entry.url,
                entry.confidence,
                data_type,
                entry.timestamp,
            ))
        })
        .collect()
}

fn validate_classifier(rules: &[KeywordRule]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for rule in rules {
        if rule.keyword.trim().is_empty() {
            return Err(ConfigError::Validation(
                "classifier keyword must be non-empty".to_string(),
            ));
        }
        if rule.keyword != rule.keyword.to_lowercase() {
            return Err(ConfigError::Validation(format!(
                "classifier keyword '{}' must be lowercase",
                rule.keyword
            )));
        }
        if !seen.insert(rule.keyword.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate classifier keyword: '{}'",
                rule.keyword
            )));
        }
    }
    Ok(())
}

fn validate_competitors(
    competitors: &BTreeMap<Category, Vec<CompetitorFacts>>,
) -> Result<(), ConfigError> {
    for (category, list) in competitors {
        if list.is_empty() {
            return Err(ConfigError::Validation(format!(
                "competitors for '{category}' must not be empty"
            )));
        }
        if list.iter().any(|c| c.name.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "competitor in '{category}' has an empty name"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
