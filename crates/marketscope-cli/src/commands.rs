//! Command handlers for the CLI.
//!
//! Each handler returns what `main` prints so output can be checked without
//! capturing stdout.

use std::fmt::Write as _;

use marketscope_core::{AnalysisType, Catalog, Category};
use marketscope_orchestrator::{analyzer_count, InsightPipeline, LogProgress};
use marketscope_report::{AnalysisReport, ResultSerializer};

/// Validate `url` and run one analysis in the foreground.
///
/// # Errors
///
/// Returns an error if `url` is not an absolute `http`/`https` URL. Analyzer
/// failures degrade the report instead of failing the command.
pub(crate) async fn build_report(
    pipeline: &InsightPipeline,
    url: &str,
    analysis_type: AnalysisType,
) -> anyhow::Result<AnalysisReport> {
    let url = url.trim();
    marketscope_scraper::parse_http_url(url)?;

    let progress = LogProgress::new(analyzer_count(analysis_type));
    let report = pipeline.run(url, analysis_type, &progress).await;
    if report
        .live_analysis
        .as_ref()
        .is_some_and(marketscope_report::LiveAnalysis::is_degraded)
    {
        tracing::warn!(url, "live analysis fell back for at least one analyzer");
    }
    Ok(report)
}

/// # Errors
///
/// Returns an error if the report cannot be rendered as JSON.
pub(crate) fn render_report(report: &AnalysisReport, compact: bool) -> anyhow::Result<String> {
    Ok(ResultSerializer::to_json_string(report, !compact)?)
}

pub(crate) fn classify_line(catalog: &Catalog, url: &str) -> String {
    let category = catalog.classifier().classify(url.trim());
    format!("{}\t{}", category.as_str(), category.label())
}

/// One line per category: id, label, keywords, and a marker when any section
/// is served from the default category's entry.
pub(crate) fn render_catalog(catalog: &Catalog) -> String {
    let mut out = String::new();
    for category in Category::ALL {
        let keywords: Vec<&str> = catalog
            .classifier()
            .rules()
            .iter()
            .filter(|rule| rule.category == category)
            .map(|rule| rule.keyword.as_str())
            .collect();
        let keywords = if keywords.is_empty() {
            "-".to_string()
        } else {
            keywords.join(",")
        };
        let marker = if category == catalog.default_category() {
            " (default)"
        } else if catalog.falls_back(category) {
            " (uses default facts)"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "{:<18} {}{marker}\t{keywords}",
            category.as_str(),
            category.label()
        );
    }
    out
}
