//! Typed analyzer results.
//!
//! Every field is optional on input and filled with its empty default, so any
//! JSON object the inference service returns deserializes into a valid record.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::lenient::{self, JsonObject};
use crate::stage::AnalyzerKind;

/// How an analyzer result was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Full pipeline over fetched page content.
    Extracted,
    /// Best-effort inference seeded only with the URL.
    UrlInferred,
    /// Hardcoded minimal result; no inference succeeded.
    CannedDefault,
}

impl Origin {
    #[must_use]
    pub fn is_degraded(self) -> bool {
        !matches!(self, Origin::Extracted)
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Origin::Extracted => write!(f, "extracted"),
            Origin::UrlInferred => write!(f, "url_inferred"),
            Origin::CannedDefault => write!(f, "canned_default"),
        }
    }
}

/// An analyzer result plus where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analyzed<T> {
    pub result: T,
    pub origin: Origin,
    /// Title of the fetched page, when the fetch step succeeded.
    pub page_title: Option<String>,
}

/// Shared behavior of the three analyzer result types.
pub trait AnalyzerOutput: serde::de::DeserializeOwned + Serialize + Send + Sized {
    const KIND: AnalyzerKind;

    /// Minimal result used when no inference call succeeds.
    fn canned_default() -> Self;

    /// Patch a URL-only result whose key fields came back empty.
    fn fill_gaps(&mut self) {}
}

/// Industry identification from the first inference step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndustryInfo {
    #[serde(deserialize_with = "lenient::string")]
    pub industry_name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub industry_category: String,
    #[serde(deserialize_with = "lenient::string_list")]
    pub key_products: Vec<String>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketTrends {
    #[serde(deserialize_with = "lenient::object")]
    pub market_size: JsonObject,
    #[serde(deserialize_with = "lenient::number")]
    pub cagr: f64,
    #[serde(deserialize_with = "lenient::string_list")]
    pub key_drivers: Vec<String>,
    #[serde(deserialize_with = "lenient::object")]
    pub growth_forecast: JsonObject,
    #[serde(deserialize_with = "lenient::object_list")]
    pub market_segments: Vec<JsonObject>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub industry_trends: Vec<String>,
}

impl AnalyzerOutput for MarketTrends {
    const KIND: AnalyzerKind = AnalyzerKind::Market;

    fn canned_default() -> Self {
        Self {
            market_size: object(json!({"current": "需要进一步分析"})),
            cagr: 5.0,
            key_drivers: strings(&["技术创新", "市场需求增长"]),
            growth_forecast: object(json!({"2025": "稳定增长"})),
            market_segments: vec![object(json!({"name": "主要市场", "share": 100}))],
            industry_trends: strings(&["数字化转型", "可持续发展"]),
        }
    }

    fn fill_gaps(&mut self) {
        if self.market_size.is_empty() {
            self.market_size = object(json!({"current": "N/A"}));
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    #[serde(deserialize_with = "lenient::object_list")]
    pub target_audience: Vec<JsonObject>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub user_needs: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub pain_points: Vec<String>,
    #[serde(deserialize_with = "lenient::object")]
    pub user_behavior: JsonObject,
    #[serde(deserialize_with = "lenient::object")]
    pub demographics: JsonObject,
    #[serde(deserialize_with = "lenient::object")]
    pub psychographics: JsonObject,
}

impl AnalyzerOutput for UserProfile {
    const KIND: AnalyzerKind = AnalyzerKind::User;

    fn canned_default() -> Self {
        Self {
            target_audience: vec![object(
                json!({"name": "主要用户群体", "characteristics": "需要进一步分析"}),
            )],
            user_needs: strings(&["功能需求", "体验需求"]),
            pain_points: strings(&["使用复杂", "功能不足"]),
            user_behavior: object(json!({"purchase_pattern": "需要分析", "usage_pattern": "需要分析"})),
            demographics: object(json!({"age_range": "25-45", "income_level": "中等"})),
            psychographics: object(json!({"lifestyle": "现代", "values": "效率"})),
        }
    }
}

/// One competitor, enriched with per-competitor strengths and weaknesses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompetitorProfile {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub market_share: String,
    #[serde(deserialize_with = "lenient::string_list")]
    pub strengths: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub weaknesses: Vec<String>,
    #[serde(flatten)]
    pub details: JsonObject,
}

impl CompetitorProfile {
    pub(crate) fn from_object(map: JsonObject) -> Self {
        serde_json::from_value(Value::Object(map)).unwrap_or_default()
    }
}

pub(crate) fn competitor_list<'de, D>(deserializer: D) -> Result<Vec<CompetitorProfile>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let rows = lenient::object_list(deserializer)?;
    Ok(rows.into_iter().map(CompetitorProfile::from_object).collect())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompetitorAnalysis {
    #[serde(deserialize_with = "competitor_list")]
    pub competitors: Vec<CompetitorProfile>,
    #[serde(deserialize_with = "lenient::object")]
    pub competitive_landscape: JsonObject,
    #[serde(deserialize_with = "lenient::object_list")]
    pub product_comparison: Vec<JsonObject>,
    #[serde(deserialize_with = "lenient::object_list")]
    pub marketing_strategies: Vec<JsonObject>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub competitive_advantages: Vec<String>,
    #[serde(deserialize_with = "lenient::object")]
    pub market_positioning: JsonObject,
}

impl AnalyzerOutput for CompetitorAnalysis {
    const KIND: AnalyzerKind = AnalyzerKind::Competitor;

    fn canned_default() -> Self {
        let mut competitor = CompetitorProfile {
            name: "主要竞争对手".to_string(),
            ..CompetitorProfile::default()
        };
        competitor
            .details
            .insert("type".to_string(), Value::String("直接竞争".to_string()));

        Self {
            competitors: vec![competitor],
            competitive_landscape: object(
                json!({"market_concentration": "中等", "competition_intensity": "高"}),
            ),
            product_comparison: vec![object(json!({"aspect": "功能", "comparison": "需要详细分析"}))],
            marketing_strategies: vec![object(
                json!({"strategy": "品牌营销", "effectiveness": "需要评估"}),
            )],
            competitive_advantages: strings(&["技术优势", "成本优势"]),
            market_positioning: object(
                json!({"target_market": "需要分析", "value_proposition": "需要明确"}),
            ),
        }
    }
}

fn object(value: Value) -> JsonObject {
    match value {
        Value::Object(map) => map,
        _ => JsonObject::new(),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn market_trends_from_sparse_object() {
        let trends: MarketTrends =
            serde_json::from_value(json!({"cagr": "8.5%", "key_drivers": ["5G"]})).unwrap();
        assert!((trends.cagr - 8.5).abs() < f64::EPSILON);
        assert_eq!(trends.key_drivers, vec!["5G"]);
        assert!(trends.market_size.is_empty());
        assert!(trends.market_segments.is_empty());
    }

    #[test]
    fn market_fill_gaps_marks_unknown_size() {
        let mut trends = MarketTrends::default();
        trends.fill_gaps();
        assert_eq!(trends.market_size["current"], "N/A");
    }

    #[test]
    fn competitor_profile_keeps_extra_details() {
        let analysis: CompetitorAnalysis = serde_json::from_value(json!({
            "competitors": [
                {"name": "Samsung", "type": "直接竞争", "strengths": "屏幕"},
                "Xiaomi"
            ]
        }))
        .unwrap();
        assert_eq!(analysis.competitors.len(), 2);
        assert_eq!(analysis.competitors[0].name, "Samsung");
        assert_eq!(analysis.competitors[0].strengths, vec!["屏幕"]);
        assert_eq!(analysis.competitors[0].details["type"], "直接竞争");
        assert_eq!(analysis.competitors[1].name, "Xiaomi");
    }

    #[test]
    fn canned_defaults_serialize_with_full_shape() {
        let market = serde_json::to_value(MarketTrends::canned_default()).unwrap();
        assert!((market["cagr"].as_f64().unwrap() - 5.0).abs() < f64::EPSILON);
        assert_eq!(market["market_segments"][0]["share"], 100);

        let user = serde_json::to_value(UserProfile::canned_default()).unwrap();
        assert_eq!(user["demographics"]["age_range"], "25-45");
        assert_eq!(user["pain_points"], json!(["使用复杂", "功能不足"]));

        let competitor = serde_json::to_value(CompetitorAnalysis::canned_default()).unwrap();
        assert_eq!(competitor["competitors"][0]["name"], "主要竞争对手");
        assert_eq!(competitor["competitors"][0]["type"], "直接竞争");
        assert_eq!(competitor["market_positioning"]["value_proposition"], "需要明确");
    }

    #[test]
    fn canned_defaults_round_trip() {
        let original = CompetitorAnalysis::canned_default();
        let value = serde_json::to_value(&original).unwrap();
        let back: CompetitorAnalysis = serde_json::from_value(value).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn origin_degraded_flags() {
        assert!(!Origin::Extracted.is_degraded());
        assert!(Origin::UrlInferred.is_degraded());
        assert!(Origin::CannedDefault.is_degraded());
    }
}
