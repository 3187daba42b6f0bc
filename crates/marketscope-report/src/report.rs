//! The wire shape of a finished analysis.
//!
//! Every leaf claim is an [`InsightPoint`]; the only uncited fields are
//! structural (url, category, timestamps, competitor names).

use chrono::{DateTime, Utc};
use marketscope_core::{AnalysisType, Category, InsightPoint};
use serde::{Deserialize, Serialize};

use crate::live::LiveAnalysis;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSection {
    pub market_size: InsightPoint,
    pub cagr: InsightPoint,
    pub key_drivers: Vec<InsightPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSegmentSection {
    pub demographics: InsightPoint,
    pub pain_points: Vec<InsightPoint>,
    pub behaviors: InsightPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSection {
    pub existing_users: UserSegmentSection,
    pub potential_users: UserSegmentSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorEntry {
    pub name: String,
    pub market_share: InsightPoint,
    pub core_advantages: Vec<InsightPoint>,
    pub website_traffic: InsightPoint,
    pub trends_score: InsightPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorSection {
    pub top_competitors: Vec<CompetitorEntry>,
}

/// Categorized recommendations plus a summary and two opportunity lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategicRecommendations {
    pub strategy: Vec<InsightPoint>,
    pub product: Vec<InsightPoint>,
    pub marketing: Vec<InsightPoint>,
    pub gtm: Vec<InsightPoint>,
    pub user_acquisition: Vec<InsightPoint>,
    pub strategic_summary: InsightPoint,
    pub marketing_opportunities: Vec<InsightPoint>,
    pub potential_user_opportunities: Vec<InsightPoint>,
}

/// One analysis, as stored on the task and returned to callers.
///
/// Sections outside the requested [`AnalysisType`] are `None` and serialize
/// as `null`, so the set of keys never changes between scopes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub url: String,
    pub category: Category,
    pub category_label: String,
    pub analysis_type: AnalysisType,
    /// Fixed when the report is built; serialization never touches it.
    pub analysis_timestamp: DateTime<Utc>,
    pub market_trends: Option<MarketSection>,
    pub user_profile: Option<UserSection>,
    pub competitor_analysis: Option<CompetitorSection>,
    pub strategic_recommendations: StrategicRecommendations,
    pub live_analysis: Option<LiveAnalysis>,
}

impl AnalysisReport {
    /// Every [`InsightPoint`] in the catalog-driven sections, in presentation order.
    #[must_use]
    pub fn insight_points(&self) -> Vec<&InsightPoint> {
        let mut points = Vec::new();
        if let Some(market) = &self.market_trends {
            points.push(&market.market_size);
            points.push(&market.cagr);
            points.extend(&market.key_drivers);
        }
        if let Some(users) = &self.user_profile {
            for segment in [&users.existing_users, &users.potential_users] {
                points.push(&segment.demographics);
                points.extend(&segment.pain_points);
                points.push(&segment.behaviors);
            }
        }
        if let Some(competition) = &self.competitor_analysis {
            for entry in &competition.top_competitors {
                points.push(&entry.market_share);
                points.extend(&entry.core_advantages);
                points.push(&entry.website_traffic);
                points.push(&entry.trends_score);
            }
        }
        let recs = &self.strategic_recommendations;
        for list in [
            &recs.strategy,
            &recs.product,
            &recs.marketing,
            &recs.gtm,
            &recs.user_acquisition,
        ] {
            points.extend(list);
        }
        points.push(&recs.strategic_summary);
        points.extend(&recs.marketing_opportunities);
        points.extend(&recs.potential_user_opportunities);
        points
    }
}
