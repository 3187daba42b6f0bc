//! One analysis run: classify, run the requested analyzers, aggregate.

use std::sync::Arc;

use chrono::Utc;
use marketscope_analyzer::{
    CompetitorAnalyzer, MarketAnalyzer, OpenAiClient, StageObserver, StructuredExtractor,
    UserAnalyzer,
};
use marketscope_core::{AnalysisType, AppConfig, Catalog};
use marketscope_report::{attribute, AnalysisReport, InsightAggregator, LiveAnalysis};
use marketscope_scraper::ContentFetcher;

use crate::error::PipelineError;
use crate::progress::{ProgressSink, ANALYZERS_END, ANALYZERS_START};

/// The three inference-backed analyzers.
#[derive(Debug, Clone)]
pub struct LiveAnalyzers {
    pub market: MarketAnalyzer,
    pub user: UserAnalyzer,
    pub competitor: CompetitorAnalyzer,
}

impl LiveAnalyzers {
    /// Build all three analyzers over one fetcher and one extractor.
    #[must_use]
    pub fn new(
        fetcher: &ContentFetcher,
        extractor: &StructuredExtractor,
        catalog: Arc<Catalog>,
    ) -> Self {
        Self {
            market: MarketAnalyzer::new(fetcher.clone(), extractor.clone(), catalog),
            user: UserAnalyzer::new(fetcher.clone(), extractor.clone()),
            competitor: CompetitorAnalyzer::new(fetcher.clone(), extractor.clone()),
        }
    }
}

/// Counts the analyzers `analysis_type` runs.
#[must_use]
pub fn analyzer_count(analysis_type: AnalysisType) -> usize {
    [
        analysis_type.includes_market(),
        analysis_type.includes_user(),
        analysis_type.includes_competitor(),
    ]
    .into_iter()
    .filter(|included| *included)
    .count()
}

/// Produces an [`AnalysisReport`] for a URL.
///
/// Catalog-driven sections are always built. When live analyzers are
/// configured, the requested ones run concurrently and their attributed
/// results land in the report's live section.
#[derive(Debug, Clone)]
pub struct InsightPipeline {
    aggregator: InsightAggregator,
    live: Option<LiveAnalyzers>,
}

impl InsightPipeline {
    #[must_use]
    pub fn new(aggregator: InsightAggregator, live: Option<LiveAnalyzers>) -> Self {
        Self { aggregator, live }
    }

    /// Build the pipeline described by `config`.
    ///
    /// Live analyzers are built only when inference settings are present.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] if the HTTP clients cannot be built.
    pub fn from_config(config: &AppConfig, catalog: Arc<Catalog>) -> Result<Self, PipelineError> {
        let aggregator = InsightAggregator::new(Arc::clone(&catalog));
        let live = match &config.inference {
            Some(settings) => {
                let fetcher = ContentFetcher::new(
                    config.fetch_timeout_secs,
                    &config.fetch_user_agent,
                    config.fetch_max_body_bytes,
                    config.content_max_chars,
                )?;
                let client = OpenAiClient::new(settings)?;
                let extractor = StructuredExtractor::new(Arc::new(client));
                tracing::info!(model = %settings.model, "live inference enabled");
                Some(LiveAnalyzers::new(&fetcher, &extractor, catalog))
            }
            None => {
                tracing::info!("live inference disabled; reports are catalog-only");
                None
            }
        };
        Ok(Self::new(aggregator, live))
    }

    #[must_use]
    pub fn aggregator(&self) -> &InsightAggregator {
        &self.aggregator
    }

    #[must_use]
    pub fn is_live(&self) -> bool {
        self.live.is_some()
    }

    /// Run one analysis. Analyzer failures are absorbed by each analyzer's
    /// fallback, so this only returns what the analyzers produced.
    pub async fn run(
        &self,
        url: &str,
        analysis_type: AnalysisType,
        progress: &dyn ProgressSink,
    ) -> AnalysisReport {
        progress.milestone(5, "classifying url");
        let category = self.aggregator.classify(url);
        tracing::debug!(url, %category, "classified url");
        progress.milestone(
            ANALYZERS_START,
            &format!("classified as {}", category.label()),
        );

        let analysis_timestamp = Utc::now();
        let live = match &self.live {
            Some(analyzers) => {
                let date = analysis_timestamp.format("%Y-%m-%d").to_string();
                Some(run_live(analyzers, url, analysis_type, &date, progress).await)
            }
            None => None,
        };
        progress.milestone(ANALYZERS_END, "analyzers finished");

        progress.milestone(90, "aggregating report");
        self.aggregator
            .build(url, category, analysis_type, live, analysis_timestamp)
    }
}

async fn run_live(
    analyzers: &LiveAnalyzers,
    url: &str,
    analysis_type: AnalysisType,
    date: &str,
    progress: &dyn ProgressSink,
) -> LiveAnalysis {
    let observer: &dyn StageObserver = progress;
    let market = async {
        if analysis_type.includes_market() {
            Some(analyzers.market.analyze(url, observer).await)
        } else {
            None
        }
    };
    let user = async {
        if analysis_type.includes_user() {
            Some(analyzers.user.analyze(url, observer).await)
        } else {
            None
        }
    };
    let competitor = async {
        if analysis_type.includes_competitor() {
            Some(analyzers.competitor.analyze(url, observer).await)
        } else {
            None
        }
    };
    let (market, user, competitor) = tokio::join!(market, user, competitor);

    for (kind, origin) in [
        ("market", market.as_ref().map(|a| a.origin)),
        ("user", user.as_ref().map(|a| a.origin)),
        ("competitor", competitor.as_ref().map(|a| a.origin)),
    ] {
        if let Some(origin) = origin.filter(|o| o.is_degraded()) {
            tracing::warn!(url, analyzer = kind, %origin, "analyzer result is degraded");
        }
    }

    LiveAnalysis {
        market_trends: market.map(|a| attribute(url, date, a)),
        user_profile: user.map(|a| attribute(url, date, a)),
        competitor_analysis: competitor.map(|a| attribute(url, date, a)),
    }
}
