//! Catalog-driven report assembly.
//!
//! Each catalog fact becomes an [`InsightPoint`] citing a fixed slice of the
//! source catalog: aggregate figures cite the first two sources of their data
//! type, atomic facts cite the first one, and competitor traffic and trend
//! scores cite sources 0 and 1 individually. These offsets and the confidence
//! constants are part of the report format.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use marketscope_core::{
    AnalysisType, Catalog, Category, CompetitorFacts, DataSource, DataType, InsightPoint,
    UserSegment,
};

use crate::live::LiveAnalysis;
use crate::report::{
    AnalysisReport, CompetitorEntry, CompetitorSection, MarketSection, StrategicRecommendations,
    UserSection, UserSegmentSection,
};

/// Confidence and description for each point of one user segment.
struct SegmentScores {
    demographics: (f64, &'static str),
    pain_points: (f64, &'static str),
    behaviors: (f64, &'static str),
}

const EXISTING_USERS: SegmentScores = SegmentScores {
    demographics: (0.88, "现有用户人口统计特征"),
    pain_points: (0.85, "用户痛点"),
    behaviors: (0.87, "用户行为特征"),
};

const POTENTIAL_USERS: SegmentScores = SegmentScores {
    demographics: (0.85, "潜在用户人口统计特征"),
    pain_points: (0.83, "潜在用户痛点"),
    behaviors: (0.84, "潜在用户行为特征"),
};

/// Builds [`AnalysisReport`]s from the catalog. Never fails.
#[derive(Debug, Clone)]
pub struct InsightAggregator {
    catalog: Arc<Catalog>,
}

impl InsightAggregator {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn classify(&self, url: &str) -> Category {
        self.catalog.classifier().classify(url)
    }

    /// Assemble the report for `url`, already classified as `category`.
    ///
    /// Sections outside `analysis_type` are omitted; strategic
    /// recommendations are always present.
    #[must_use]
    pub fn build(
        &self,
        url: &str,
        category: Category,
        analysis_type: AnalysisType,
        live: Option<LiveAnalysis>,
        analysis_timestamp: DateTime<Utc>,
    ) -> AnalysisReport {
        if self.catalog.falls_back(category) {
            tracing::debug!(
                %category,
                default = %self.catalog.default_category(),
                "catalog has no entry for category; using default data"
            );
        }

        AnalysisReport {
            url: url.to_string(),
            category,
            category_label: category.label().to_string(),
            analysis_type,
            analysis_timestamp,
            market_trends: analysis_type
                .includes_market()
                .then(|| self.market_trends(category)),
            user_profile: analysis_type
                .includes_user()
                .then(|| self.user_profile(category)),
            competitor_analysis: analysis_type
                .includes_competitor()
                .then(|| self.competitor_analysis(category)),
            strategic_recommendations: self.strategic_recommendations(category),
            live_analysis: live.filter(|l| !l.is_empty()),
        }
    }

    #[must_use]
    pub fn market_trends(&self, category: Category) -> MarketSection {
        let facts = self.catalog.market(category);
        let sources = self.sources(DataType::MarketData);
        let label = category.label();

        MarketSection {
            market_size: InsightPoint::new(
                facts.market_size.value.clone(),
                first(sources, 2),
                0.92,
                format!("{label}总市场规模"),
            ),
            cagr: InsightPoint::new(
                facts.cagr.value.clone(),
                first(sources, 2),
                0.90,
                format!("{label}年复合增长率"),
            ),
            key_drivers: facts
                .key_drivers
                .iter()
                .map(|driver| InsightPoint::new(driver.clone(), first(sources, 1), 0.88, "市场驱动因素"))
                .collect(),
        }
    }

    #[must_use]
    pub fn user_profile(&self, category: Category) -> UserSection {
        let facts = self.catalog.users(category);
        UserSection {
            existing_users: self.user_segment(&facts.existing_users, &EXISTING_USERS),
            potential_users: self.user_segment(&facts.potential_users, &POTENTIAL_USERS),
        }
    }

    fn user_segment(&self, segment: &UserSegment, scores: &SegmentScores) -> UserSegmentSection {
        let sources = self.sources(DataType::UserResearch);
        let (pain_confidence, pain_description) = scores.pain_points;

        UserSegmentSection {
            demographics: InsightPoint::new(
                segment.demographics.clone(),
                first(sources, 2),
                scores.demographics.0,
                scores.demographics.1,
            ),
            pain_points: segment
                .pain_points
                .iter()
                .map(|point| {
                    InsightPoint::new(point.clone(), first(sources, 1), pain_confidence, pain_description)
                })
                .collect(),
            behaviors: InsightPoint::new(
                segment.behaviors.clone(),
                first(sources, 2),
                scores.behaviors.0,
                scores.behaviors.1,
            ),
        }
    }

    #[must_use]
    pub fn competitor_analysis(&self, category: Category) -> CompetitorSection {
        CompetitorSection {
            top_competitors: self
                .catalog
                .competitors(category)
                .iter()
                .map(|facts| self.competitor_entry(facts))
                .collect(),
        }
    }

    fn competitor_entry(&self, facts: &CompetitorFacts) -> CompetitorEntry {
        let sources = self.sources(DataType::CompetitorAnalysis);
        CompetitorEntry {
            name: facts.name.clone(),
            market_share: InsightPoint::new(
                facts.market_share.clone(),
                first(sources, 2),
                0.90,
                "市场份额",
            ),
            core_advantages: facts
                .core_advantages
                .iter()
                .map(|advantage| {
                    InsightPoint::new(advantage.clone(), first(sources, 1), 0.87, "核心优势")
                })
                .collect(),
            website_traffic: InsightPoint::new(
                facts.website_traffic.clone(),
                nth(sources, 0),
                0.92,
                "网站流量",
            ),
            trends_score: InsightPoint::new(
                facts.trends_score.to_string(),
                nth(sources, 1),
                0.85,
                "Google Trends声量评分",
            ),
        }
    }

    #[must_use]
    pub fn strategic_recommendations(&self, category: Category) -> StrategicRecommendations {
        let md = self.sources(DataType::MarketData);
        let ur = self.sources(DataType::UserResearch);
        let ca = self.sources(DataType::CompetitorAnalysis);
        let facts = self.catalog.strategy(category);

        StrategicRecommendations {
            strategy: vec![
                InsightPoint::new("差异化定位策略", first(md, 1), 0.88, "基于用户画像和竞争分析的战略定位"),
                InsightPoint::new("市场渗透策略", first(md, 1), 0.85, "针对潜在用户的增长策略"),
            ],
            product: vec![
                InsightPoint::new("用户体验优化", first(ur, 2), 0.90, "基于用户痛点的产品改进"),
                InsightPoint::new("功能差异化", first(ca, 1), 0.87, "相对于竞争对手的产品优势"),
            ],
            marketing: vec![
                InsightPoint::new("精准用户定位", first(ur, 2), 0.88, "基于用户画像的营销策略"),
                InsightPoint::new("品牌差异化传播", first(ca, 1), 0.85, "区别于竞争对手的品牌传播"),
            ],
            gtm: vec![
                InsightPoint::new("渠道策略优化", first(md, 1), 0.86, "市场进入和渠道布局策略"),
                InsightPoint::new("定价策略调整", first(ur, 1), 0.84, "基于用户价格敏感度的定价"),
            ],
            user_acquisition: vec![
                InsightPoint::new("潜在用户转化", first(ur, 2), 0.89, "针对潜在用户的获取策略"),
                InsightPoint::new("用户留存优化", first(ur, 1), 0.87, "提升现有用户满意度和忠诚度"),
            ],
            strategic_summary: InsightPoint::new(
                facts.summary.clone(),
                first(md, 2),
                0.90,
                "基于市场分析的战略建议总结",
            ),
            marketing_opportunities: facts
                .marketing_opportunities
                .iter()
                .map(|o| InsightPoint::new(o.clone(), first(ur, 1), 0.87, "营销机会点"))
                .collect(),
            potential_user_opportunities: facts
                .potential_user_opportunities
                .iter()
                .map(|o| InsightPoint::new(o.clone(), first(ur, 2), 0.85, "潜在用户机会点"))
                .collect(),
        }
    }

    fn sources(&self, data_type: DataType) -> &[DataSource] {
        self.catalog.sources(data_type)
    }
}

/// The first `n` sources, or all of them when fewer exist.
fn first(sources: &[DataSource], n: usize) -> &[DataSource] {
    &sources[..n.min(sources.len())]
}

/// Exactly source `index`; the catalog guarantees at least two per type.
fn nth(sources: &[DataSource], index: usize) -> &[DataSource] {
    sources.get(index).map_or(&[][..], std::slice::from_ref)
}

#[cfg(test)]
#[path = "aggregator_test.rs"]
mod tests;
