use marketscope_scraper::{ContentFetcher, USER_RESEARCH_KEYWORDS};
use serde::Deserialize;

use crate::error::AnalyzerError;
use crate::extractor::StructuredExtractor;
use crate::lenient::{self, JsonObject};
use crate::prompts::{self, USER_RESEARCH_ROLE};
use crate::runner::{finish, to_json};
use crate::stage::{AnalyzerKind, AnalyzerStage, StageObserver};
use crate::types::{Analyzed, IndustryInfo, UserProfile};

const KIND: AnalyzerKind = AnalyzerKind::User;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AudienceFacet {
    #[serde(deserialize_with = "lenient::object_list")]
    target_audience: Vec<JsonObject>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NeedsFacet {
    #[serde(deserialize_with = "lenient::string_list")]
    needs: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pain_points: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PersonaFacet {
    #[serde(deserialize_with = "lenient::object")]
    demographics: JsonObject,
    #[serde(deserialize_with = "lenient::object")]
    psychographics: JsonObject,
}

/// User profile for a page: audience, needs, pain points, behavior, persona.
#[derive(Debug, Clone)]
pub struct UserAnalyzer {
    fetcher: ContentFetcher,
    extractor: StructuredExtractor,
}

impl UserAnalyzer {
    #[must_use]
    pub fn new(fetcher: ContentFetcher, extractor: StructuredExtractor) -> Self {
        Self { fetcher, extractor }
    }

    /// Analyze `url`. Never fails; see [`Analyzed::origin`] for degradation.
    pub async fn analyze(&self, url: &str, observer: &dyn StageObserver) -> Analyzed<UserProfile> {
        let outcome = self.run(url, observer).await;
        finish(&self.extractor, url, observer, outcome).await
    }

    async fn run(
        &self,
        url: &str,
        observer: &dyn StageObserver,
    ) -> Result<(UserProfile, String), AnalyzerError> {
        observer.on_stage(KIND, AnalyzerStage::Fetching);
        let page = self.fetcher.fetch(url, USER_RESEARCH_KEYWORDS).await?;

        observer.on_stage(KIND, AnalyzerStage::Identifying);
        let industry: IndustryInfo = self
            .extractor
            .extract_as(
                &prompts::identify_industry(&page, "target_market（目标市场）"),
                USER_RESEARCH_ROLE,
            )
            .await?;

        observer.on_stage(KIND, AnalyzerStage::Extracting);
        let audience: AudienceFacet = self
            .extractor
            .extract_as(
                &prompts::target_audience(&page, &to_json(&industry)),
                USER_RESEARCH_ROLE,
            )
            .await?;

        let needs: NeedsFacet = self
            .extractor
            .extract_as(&prompts::needs_and_pain_points(&page), USER_RESEARCH_ROLE)
            .await?;

        let user_behavior = self
            .extractor
            .extract(&prompts::user_behavior(&page), USER_RESEARCH_ROLE)
            .await?;

        let persona: PersonaFacet = self
            .extractor
            .extract_as(
                &prompts::demographics_psychographics(&to_json(&audience.target_audience)),
                USER_RESEARCH_ROLE,
            )
            .await?;

        let profile = UserProfile {
            target_audience: audience.target_audience,
            user_needs: needs.needs,
            pain_points: needs.pain_points,
            user_behavior,
            demographics: persona.demographics,
            psychographics: persona.psychographics,
        };
        Ok((profile, page.title))
    }
}
