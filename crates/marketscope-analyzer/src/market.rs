use std::sync::Arc;

use marketscope_core::Catalog;
use marketscope_scraper::ContentFetcher;

use crate::error::AnalyzerError;
use crate::extractor::StructuredExtractor;
use crate::prompts::{self, MARKET_ANALYST_ROLE};
use crate::runner::{finish, to_json};
use crate::stage::{AnalyzerKind, AnalyzerStage, StageObserver};
use crate::types::{Analyzed, IndustryInfo, MarketTrends};

const KIND: AnalyzerKind = AnalyzerKind::Market;

/// Market trends for a page: size, growth, drivers, segments.
///
/// The trends prompt is seeded with the catalog's reference figures for the
/// URL's category.
#[derive(Debug, Clone)]
pub struct MarketAnalyzer {
    fetcher: ContentFetcher,
    extractor: StructuredExtractor,
    catalog: Arc<Catalog>,
}

impl MarketAnalyzer {
    #[must_use]
    pub fn new(
        fetcher: ContentFetcher,
        extractor: StructuredExtractor,
        catalog: Arc<Catalog>,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            catalog,
        }
    }

    /// Analyze `url`. Never fails; see [`Analyzed::origin`] for degradation.
    pub async fn analyze(&self, url: &str, observer: &dyn StageObserver) -> Analyzed<MarketTrends> {
        let outcome = self.run(url, observer).await;
        finish(&self.extractor, url, observer, outcome).await
    }

    async fn run(
        &self,
        url: &str,
        observer: &dyn StageObserver,
    ) -> Result<(MarketTrends, String), AnalyzerError> {
        observer.on_stage(KIND, AnalyzerStage::Fetching);
        let page = self.fetcher.fetch(url, &[]).await?;

        observer.on_stage(KIND, AnalyzerStage::Identifying);
        let industry: IndustryInfo = self
            .extractor
            .extract_as(
                &prompts::identify_industry(&page, "target_market（目标市场）"),
                MARKET_ANALYST_ROLE,
            )
            .await?;
        tracing::debug!(url, industry = %industry.industry_name, "industry identified");

        observer.on_stage(KIND, AnalyzerStage::Extracting);
        let category = self.catalog.classifier().classify(url);
        let reference = self.catalog.market(category);
        let trends: MarketTrends = self
            .extractor
            .extract_as(
                &prompts::market_trends(&page, &to_json(&industry), category.label(), reference),
                MARKET_ANALYST_ROLE,
            )
            .await?;

        Ok((trends, page.title))
    }
}
