use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    MarketData,
    UserResearch,
    CompetitorAnalysis,
}

impl DataType {
    pub const ALL: [DataType; 3] = [
        DataType::MarketData,
        DataType::UserResearch,
        DataType::CompetitorAnalysis,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DataType::MarketData => "market_data",
            DataType::UserResearch => "user_research",
            DataType::CompetitorAnalysis => "competitor_analysis",
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A citation backing an [`InsightPoint`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSource {
    pub name: String,
    pub url: String,
    pub confidence: f64,
    pub data_type: DataType,
    pub timestamp: String,
}

impl DataSource {
    /// Build a source, clamping `confidence` into `[0, 1]`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        confidence: f64,
        data_type: DataType,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            confidence: clamp_confidence(confidence),
            data_type,
            timestamp: timestamp.into(),
        }
    }
}

/// A single cited claim.
///
/// `sources` is an owned snapshot: later changes to the catalog the sources
/// were drawn from never reach an already-built point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightPoint {
    pub value: String,
    pub confidence: f64,
    pub description: String,
    pub sources: Vec<DataSource>,
}

impl InsightPoint {
    #[must_use]
    pub fn new(
        value: impl Into<String>,
        sources: &[DataSource],
        confidence: f64,
        description: impl Into<String>,
    ) -> Self {
        debug_assert!(!sources.is_empty(), "insight point needs at least one source");
        Self {
            value: value.into(),
            confidence: clamp_confidence(confidence),
            description: description.into(),
            sources: sources.to_vec(),
        }
    }
}

fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(confidence: f64) -> DataSource {
        DataSource::new(
            "Statista",
            "https://www.statista.com",
            confidence,
            DataType::MarketData,
            "2024",
        )
    }

    #[test]
    fn data_source_confidence_is_clamped() {
        assert!((source(1.7).confidence - 1.0).abs() < f64::EPSILON);
        assert!(source(-0.2).confidence.abs() < f64::EPSILON);
        assert!(source(f64::NAN).confidence.abs() < f64::EPSILON);
    }

    #[test]
    fn insight_point_snapshots_sources() {
        let mut catalog = vec![source(0.9), source(0.8)];
        let point = InsightPoint::new("5000亿美元", &catalog[..2], 0.92, "market size");
        catalog[0].name = "changed".to_string();
        catalog.clear();
        assert_eq!(point.sources.len(), 2);
        assert_eq!(point.sources[0].name, "Statista");
    }

    #[test]
    fn data_type_serializes_snake_case() {
        let json = serde_json::to_string(&DataType::CompetitorAnalysis).unwrap();
        assert_eq!(json, "\"competitor_analysis\"");
    }

    #[test]
    fn insight_point_field_order_is_stable() {
        let point = InsightPoint::new("8.5%", &[source(0.95)], 0.9, "cagr");
        let json = serde_json::to_string(&point).unwrap();
        let value_at = json.find("\"value\"").unwrap();
        let confidence_at = json.find("\"confidence\"").unwrap();
        let sources_at = json.find("\"sources\"").unwrap();
        assert!(value_at < confidence_at && confidence_at < sources_at);
    }
}
