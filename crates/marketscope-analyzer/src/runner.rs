//! Shared fallback handling for the three analyzers.

use serde::Serialize;

use crate::error::AnalyzerError;
use crate::extractor::StructuredExtractor;
use crate::prompts;
use crate::stage::{AnalyzerStage, StageObserver};
use crate::types::{Analyzed, AnalyzerOutput, Origin};

/// Compact JSON for embedding earlier results in later prompts.
pub(crate) fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

/// Turn a pipeline outcome into a result, recovering from any step failure.
///
/// Never fails: a failed pipeline gets one URL-only inference attempt, and if
/// that fails too the canned default is used.
pub(crate) async fn finish<T: AnalyzerOutput>(
    extractor: &StructuredExtractor,
    url: &str,
    observer: &dyn StageObserver,
    outcome: Result<(T, String), AnalyzerError>,
) -> Analyzed<T> {
    let kind = T::KIND;
    let analyzed = match outcome {
        Ok((result, page_title)) => Analyzed {
            result,
            origin: Origin::Extracted,
            page_title: Some(page_title),
        },
        Err(e) => {
            tracing::warn!(analyzer = %kind, url, error = %e, "analyzer step failed, falling back");
            observer.on_stage(kind, AnalyzerStage::Fallback);
            recover::<T>(extractor, url).await
        }
    };
    tracing::debug!(analyzer = %kind, url, origin = %analyzed.origin, "analyzer assembled");
    observer.on_stage(kind, AnalyzerStage::Assembled);
    analyzed
}

async fn recover<T: AnalyzerOutput>(extractor: &StructuredExtractor, url: &str) -> Analyzed<T> {
    let kind = T::KIND;
    let prompt = prompts::url_only(kind, url);
    match extractor
        .extract_as::<T>(&prompt, prompts::system_role(kind))
        .await
    {
        Ok(mut result) => {
            result.fill_gaps();
            Analyzed {
                result,
                origin: Origin::UrlInferred,
                page_title: None,
            }
        }
        Err(e) => {
            tracing::warn!(analyzer = %kind, url, error = %e, "url-only inference failed, using canned default");
            Analyzed {
                result: T::canned_default(),
                origin: Origin::CannedDefault,
                page_title: None,
            }
        }
    }
}
