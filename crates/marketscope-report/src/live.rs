//! Provenance for inference-backed analyzer results.

use marketscope_analyzer::{
    AnalyzerKind, AnalyzerOutput, Analyzed, CompetitorAnalysis, MarketTrends, Origin, UserProfile,
};
use marketscope_core::{DataSource, DataType};
use serde::{Deserialize, Serialize};

/// An analyzer result with the page it was drawn from and how it was obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attributed<T> {
    pub data: T,
    pub sources: Vec<DataSource>,
    pub confidence: f64,
    pub origin: Origin,
}

/// Live sections present for the requested scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiveAnalysis {
    pub market_trends: Option<Attributed<MarketTrends>>,
    pub user_profile: Option<Attributed<UserProfile>>,
    pub competitor_analysis: Option<Attributed<CompetitorAnalysis>>,
}

impl LiveAnalysis {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.market_trends.is_none()
            && self.user_profile.is_none()
            && self.competitor_analysis.is_none()
    }

    /// Whether any present section came from a fallback path.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        let origins = [
            self.market_trends.as_ref().map(|a| a.origin),
            self.user_profile.as_ref().map(|a| a.origin),
            self.competitor_analysis.as_ref().map(|a| a.origin),
        ];
        origins.into_iter().flatten().any(Origin::is_degraded)
    }
}

/// Confidence assigned to a live result by how it was obtained.
#[must_use]
pub fn origin_confidence(origin: Origin) -> f64 {
    match origin {
        Origin::Extracted => 0.75,
        Origin::UrlInferred => 0.4,
        Origin::CannedDefault => 0.1,
    }
}

fn data_type_for(kind: AnalyzerKind) -> DataType {
    match kind {
        AnalyzerKind::Market => DataType::MarketData,
        AnalyzerKind::User => DataType::UserResearch,
        AnalyzerKind::Competitor => DataType::CompetitorAnalysis,
    }
}

/// Wrap `analyzed` with a source built for the analysed page.
///
/// The source is named after the page title when the fetch succeeded and
/// after the URL otherwise; `timestamp` is the report's analysis date.
#[must_use]
pub fn attribute<T: AnalyzerOutput>(
    url: &str,
    timestamp: &str,
    analyzed: Analyzed<T>,
) -> Attributed<T> {
    let confidence = origin_confidence(analyzed.origin);
    let name = analyzed
        .page_title
        .filter(|title| !title.trim().is_empty())
        .unwrap_or_else(|| url.to_string());
    let source = DataSource::new(name, url, confidence, data_type_for(T::KIND), timestamp);
    Attributed {
        data: analyzed.result,
        sources: vec![source],
        confidence,
        origin: analyzed.origin,
    }
}
