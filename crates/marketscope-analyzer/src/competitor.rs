use marketscope_scraper::{ContentFetcher, COMPETITOR_KEYWORDS};
use serde::Deserialize;

use crate::error::AnalyzerError;
use crate::extractor::StructuredExtractor;
use crate::lenient::{self, JsonObject};
use crate::prompts::{self, COMPETITIVE_ANALYST_ROLE};
use crate::runner::{finish, to_json};
use crate::stage::{AnalyzerKind, AnalyzerStage, StageObserver};
use crate::types::{competitor_list, Analyzed, CompetitorAnalysis, CompetitorProfile, IndustryInfo};

const KIND: AnalyzerKind = AnalyzerKind::Competitor;

/// Competitors beyond this many are dropped before per-competitor enrichment.
const MAX_ENRICHED_COMPETITORS: usize = 5;

/// Market share is not inferred; every competitor carries this marker.
const MARKET_SHARE_PLACEHOLDER: &str = "需要进一步分析";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CompetitorsFacet {
    #[serde(deserialize_with = "competitor_list")]
    competitors: Vec<CompetitorProfile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StrengthsFacet {
    #[serde(deserialize_with = "lenient::string_list")]
    strengths: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WeaknessesFacet {
    #[serde(deserialize_with = "lenient::string_list")]
    weaknesses: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ComparisonFacet {
    #[serde(deserialize_with = "lenient::object_list")]
    product_comparison: Vec<JsonObject>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MarketingFacet {
    #[serde(deserialize_with = "lenient::object_list")]
    marketing_strategies: Vec<JsonObject>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AdvantagesFacet {
    #[serde(deserialize_with = "lenient::string_list")]
    competitive_advantages: Vec<String>,
}

/// Competitive analysis for a page.
///
/// Facets run in dependency order: competitors (each enriched with strengths
/// and weaknesses), landscape, product comparison, marketing strategies,
/// advantages, positioning. Later prompts embed the competitor list.
#[derive(Debug, Clone)]
pub struct CompetitorAnalyzer {
    fetcher: ContentFetcher,
    extractor: StructuredExtractor,
}

impl CompetitorAnalyzer {
    #[must_use]
    pub fn new(fetcher: ContentFetcher, extractor: StructuredExtractor) -> Self {
        Self { fetcher, extractor }
    }

    /// Analyze `url`. Never fails; see [`Analyzed::origin`] for degradation.
    pub async fn analyze(
        &self,
        url: &str,
        observer: &dyn StageObserver,
    ) -> Analyzed<CompetitorAnalysis> {
        let outcome = self.run(url, observer).await;
        finish(&self.extractor, url, observer, outcome).await
    }

    async fn run(
        &self,
        url: &str,
        observer: &dyn StageObserver,
    ) -> Result<(CompetitorAnalysis, String), AnalyzerError> {
        observer.on_stage(KIND, AnalyzerStage::Fetching);
        let page = self.fetcher.fetch(url, COMPETITOR_KEYWORDS).await?;

        observer.on_stage(KIND, AnalyzerStage::Identifying);
        let industry: IndustryInfo = self
            .extractor
            .extract_as(
                &prompts::identify_industry(&page, "market_players（主要市场参与者数组）"),
                COMPETITIVE_ANALYST_ROLE,
            )
            .await?;
        let industry_json = to_json(&industry);

        observer.on_stage(KIND, AnalyzerStage::Extracting);
        let facet: CompetitorsFacet = self
            .extractor
            .extract_as(
                &prompts::competitors(&page, &industry_json),
                COMPETITIVE_ANALYST_ROLE,
            )
            .await?;

        let mut competitors = facet.competitors;
        if competitors.len() > MAX_ENRICHED_COMPETITORS {
            tracing::debug!(
                url,
                found = competitors.len(),
                kept = MAX_ENRICHED_COMPETITORS,
                "truncating competitor list"
            );
            competitors.truncate(MAX_ENRICHED_COMPETITORS);
        }
        for competitor in &mut competitors {
            self.enrich(competitor).await?;
        }
        let competitors_json = to_json(&competitors);

        let competitive_landscape = self
            .extractor
            .extract(
                &prompts::competitive_landscape(&competitors_json, &industry_json),
                COMPETITIVE_ANALYST_ROLE,
            )
            .await?;

        let comparison: ComparisonFacet = self
            .extractor
            .extract_as(
                &prompts::product_comparison(&competitors_json, &page),
                COMPETITIVE_ANALYST_ROLE,
            )
            .await?;

        let marketing: MarketingFacet = self
            .extractor
            .extract_as(
                &prompts::marketing_strategies(&competitors_json),
                COMPETITIVE_ANALYST_ROLE,
            )
            .await?;

        let advantages: AdvantagesFacet = self
            .extractor
            .extract_as(
                &prompts::competitive_advantages(&page, &competitors_json),
                COMPETITIVE_ANALYST_ROLE,
            )
            .await?;

        let market_positioning = self
            .extractor
            .extract(
                &prompts::market_positioning(&page, &competitors_json),
                COMPETITIVE_ANALYST_ROLE,
            )
            .await?;

        let analysis = CompetitorAnalysis {
            competitors,
            competitive_landscape,
            product_comparison: comparison.product_comparison,
            marketing_strategies: marketing.marketing_strategies,
            competitive_advantages: advantages.competitive_advantages,
            market_positioning,
        };
        Ok((analysis, page.title))
    }

    async fn enrich(&self, competitor: &mut CompetitorProfile) -> Result<(), AnalyzerError> {
        let name = if competitor.name.is_empty() {
            "Unknown".to_string()
        } else {
            competitor.name.clone()
        };
        let snapshot = to_json(&*competitor);

        let strengths: StrengthsFacet = self
            .extractor
            .extract_as(
                &prompts::competitor_trait(&name, &snapshot, "strengths", "优势"),
                COMPETITIVE_ANALYST_ROLE,
            )
            .await?;
        let weaknesses: WeaknessesFacet = self
            .extractor
            .extract_as(
                &prompts::competitor_trait(&name, &snapshot, "weaknesses", "劣势"),
                COMPETITIVE_ANALYST_ROLE,
            )
            .await?;

        competitor.market_share = MARKET_SHARE_PLACEHOLDER.to_string();
        competitor.strengths = strengths.strengths;
        competitor.weaknesses = weaknesses.weaknesses;
        Ok(())
    }
}
