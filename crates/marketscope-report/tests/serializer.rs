//! Wire-format tests for `ResultSerializer` over catalog-built reports.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use marketscope_analyzer::{
    AnalyzerOutput, Analyzed, CompetitorAnalysis, MarketTrends, Origin, UserProfile,
};
use marketscope_core::{AnalysisType, Catalog, Category};
use marketscope_report::{attribute, AnalysisReport, InsightAggregator, LiveAnalysis, ResultSerializer};

fn build(analysis_type: AnalysisType, live: Option<LiveAnalysis>) -> AnalysisReport {
    let aggregator = InsightAggregator::new(Arc::new(Catalog::builtin().unwrap()));
    aggregator.build(
        "https://www.apple.com",
        Category::Smartphone,
        analysis_type,
        live,
        Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap(),
    )
}

fn live() -> LiveAnalysis {
    let url = "https://www.apple.com";
    LiveAnalysis {
        market_trends: Some(attribute(
            url,
            "2026-10-16",
            Analyzed {
                result: MarketTrends::canned_default(),
                origin: Origin::Extracted,
                page_title: Some("Apple".to_string()),
            },
        )),
        user_profile: Some(attribute(
            url,
            "2026-10-16",
            Analyzed {
                result: UserProfile::canned_default(),
                origin: Origin::UrlInferred,
                page_title: None,
            },
        )),
        competitor_analysis: Some(attribute(
            url,
            "2026-10-16",
            Analyzed {
                result: CompetitorAnalysis::canned_default(),
                origin: Origin::CannedDefault,
                page_title: None,
            },
        )),
    }
}

#[test]
fn insight_points_flatten_to_value_and_sources() {
    let value = ResultSerializer::serialize(&build(AnalysisType::Full, None)).unwrap();

    let size = &value["market_trends"]["market_size"];
    assert_eq!(size["value"], "5000亿美元");
    assert_eq!(size["description"], "智能手机市场总市场规模");
    assert!((size["confidence"].as_f64().unwrap() - 0.92).abs() < f64::EPSILON);
    let source = &size["sources"][0];
    assert_eq!(source["name"], "Statista - 智能手机市场报告");
    assert_eq!(source["data_type"], "market_data");
    assert_eq!(source["timestamp"], "2024");
    assert!(source["url"].as_str().unwrap().starts_with("https://www.statista.com"));

    assert_eq!(value["category"], "smartphone");
    assert_eq!(value["category_label"], "智能手机市场");
    assert_eq!(value["analysis_type"], "full");
    assert_eq!(value["url"], "https://www.apple.com");
    assert!(value["live_analysis"].is_null());
}

#[test]
fn list_order_is_presentation_order() {
    let value = ResultSerializer::serialize(&build(AnalysisType::Full, None)).unwrap();

    let drivers: Vec<&str> = value["market_trends"]["key_drivers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["value"].as_str().unwrap())
        .collect();
    assert_eq!(drivers, ["5G技术普及", "AI功能集成", "可持续发展趋势"]);

    let competitors: Vec<&str> = value["competitor_analysis"]["top_competitors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(competitors, ["Samsung", "Apple", "Xiaomi"]);
}

#[test]
fn unrequested_sections_are_null_not_missing() {
    let value = ResultSerializer::serialize(&build(AnalysisType::User, None)).unwrap();
    let object = value.as_object().unwrap();
    for key in ["market_trends", "competitor_analysis", "live_analysis"] {
        assert!(object.contains_key(key), "missing key {key}");
        assert!(object[key].is_null());
    }
    assert!(value["user_profile"]["existing_users"]["demographics"].is_object());
    assert!(value["strategic_recommendations"]["strategic_summary"].is_object());
}

#[test]
fn serialization_is_idempotent() {
    let report = build(AnalysisType::Full, Some(live()));
    let first = ResultSerializer::to_json_string(&report, false).unwrap();
    let second = ResultSerializer::to_json_string(&report.clone(), false).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        ResultSerializer::serialize(&report).unwrap(),
        ResultSerializer::serialize(&report).unwrap()
    );
    assert!(first.contains("2026-10-16T09:30:00Z"));
}

#[test]
fn round_trip_preserves_report() {
    let report = build(AnalysisType::Full, Some(live()));
    let value = ResultSerializer::serialize(&report).unwrap();
    let back = ResultSerializer::deserialize(value).unwrap();
    assert_eq!(back, report);
}

#[test]
fn live_sections_carry_origin_and_dynamic_source() {
    let value = ResultSerializer::serialize(&build(AnalysisType::Full, Some(live()))).unwrap();
    let live = &value["live_analysis"];

    assert_eq!(live["market_trends"]["origin"], "extracted");
    assert_eq!(live["market_trends"]["sources"][0]["name"], "Apple");
    assert_eq!(live["market_trends"]["sources"][0]["data_type"], "market_data");
    assert_eq!(live["user_profile"]["origin"], "url_inferred");
    assert_eq!(
        live["user_profile"]["sources"][0]["name"],
        "https://www.apple.com"
    );
    assert_eq!(live["competitor_analysis"]["origin"], "canned_default");
    assert_eq!(
        live["competitor_analysis"]["data"]["competitors"][0]["type"],
        "直接竞争"
    );
}

#[test]
fn deserialize_rejects_non_report() {
    let result = ResultSerializer::deserialize(serde_json::json!({"url": 1}));
    assert!(result.is_err());
}
