use std::sync::Arc;

use chrono::{TimeZone, Utc};
use marketscope_core::{AnalysisType, Catalog, Category, DataType};

use super::InsightAggregator;

fn aggregator() -> InsightAggregator {
    InsightAggregator::new(Arc::new(Catalog::builtin().unwrap()))
}

fn names(points: &marketscope_core::InsightPoint) -> Vec<&str> {
    points.sources.iter().map(|s| s.name.as_str()).collect()
}

fn fixed_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap()
}

#[test]
fn apple_full_report_uses_smartphone_figures() {
    let agg = aggregator();
    let category = agg.classify("https://www.apple.com");
    assert_eq!(category, Category::Smartphone);

    let report = agg.build(
        "https://www.apple.com",
        category,
        AnalysisType::Full,
        None,
        fixed_time(),
    );
    let market = report.market_trends.as_ref().unwrap();
    assert_eq!(market.market_size.value, "5000亿美元");
    assert!(market.market_size.sources.len() >= 2);
    assert_eq!(market.market_size.description, "智能手机市场总市场规模");
    assert_eq!(market.cagr.value, "8.5%");
    assert_eq!(market.key_drivers.len(), 3);
    assert_eq!(report.category_label, "智能手机市场");
    assert!(report.user_profile.is_some());
    assert!(report.competitor_analysis.is_some());
    assert!(report.live_analysis.is_none());
}

#[test]
fn market_points_cite_fixed_source_slices() {
    let agg = aggregator();
    let market = agg.market_trends(Category::Smartphone);

    assert_eq!(
        names(&market.market_size),
        ["Statista - 智能手机市场报告", "McKinsey - 科技趋势分析"]
    );
    assert!((market.market_size.confidence - 0.92).abs() < f64::EPSILON);
    assert_eq!(names(&market.cagr).len(), 2);
    assert!((market.cagr.confidence - 0.90).abs() < f64::EPSILON);
    for driver in &market.key_drivers {
        assert_eq!(names(driver), ["Statista - 智能手机市场报告"]);
        assert!((driver.confidence - 0.88).abs() < f64::EPSILON);
        assert_eq!(driver.description, "市场驱动因素");
    }
}

#[test]
fn user_segments_use_distinct_confidences() {
    let profile = aggregator().user_profile(Category::ElectricVehicle);

    let existing = &profile.existing_users;
    assert_eq!(existing.demographics.value, "35-55岁，高收入，环保意识强");
    assert!((existing.demographics.confidence - 0.88).abs() < f64::EPSILON);
    assert_eq!(existing.demographics.sources.len(), 2);
    assert_eq!(existing.pain_points.len(), 3);
    assert_eq!(existing.pain_points[0].sources.len(), 1);
    assert!((existing.pain_points[0].confidence - 0.85).abs() < f64::EPSILON);
    assert!((existing.behaviors.confidence - 0.87).abs() < f64::EPSILON);

    let potential = &profile.potential_users;
    assert!((potential.demographics.confidence - 0.85).abs() < f64::EPSILON);
    assert_eq!(potential.pain_points[2].value, "二手车保值率低");
    assert_eq!(potential.pain_points[2].description, "潜在用户痛点");
    assert!((potential.pain_points[2].confidence - 0.83).abs() < f64::EPSILON);
    assert!((potential.behaviors.confidence - 0.84).abs() < f64::EPSILON);
    assert_eq!(potential.behaviors.description, "潜在用户行为特征");
}

#[test]
fn competitor_traffic_and_trends_cite_single_sources() {
    let section = aggregator().competitor_analysis(Category::Smartphone);
    assert_eq!(section.top_competitors.len(), 3);

    let samsung = &section.top_competitors[0];
    assert_eq!(samsung.name, "Samsung");
    assert_eq!(samsung.market_share.value, "21.8%");
    assert_eq!(samsung.market_share.sources.len(), 2);
    assert_eq!(names(&samsung.core_advantages[0]), ["SimilarWeb - 网站流量分析"]);
    assert_eq!(names(&samsung.website_traffic), ["SimilarWeb - 网站流量分析"]);
    assert!((samsung.website_traffic.confidence - 0.92).abs() < f64::EPSILON);
    assert_eq!(names(&samsung.trends_score), ["Google Trends - 搜索趋势"]);
    assert_eq!(samsung.trends_score.value, "85");
    assert_eq!(samsung.trends_score.description, "Google Trends声量评分");
}

#[test]
fn strategic_recommendations_follow_category() {
    let agg = aggregator();
    let recs = agg.strategic_recommendations(Category::ElectricVehicle);

    assert!(recs.strategic_summary.value.starts_with("电动汽车市场正处于快速增长期"));
    assert_eq!(recs.strategic_summary.sources.len(), 2);
    assert_eq!(recs.strategy[0].value, "差异化定位策略");
    assert_eq!(recs.product[1].sources[0].data_type, DataType::CompetitorAnalysis);
    assert!((recs.gtm[1].confidence - 0.84).abs() < f64::EPSILON);
    assert_eq!(recs.user_acquisition[0].sources.len(), 2);
    assert_eq!(recs.marketing_opportunities.len(), 3);
    assert_eq!(recs.marketing_opportunities[0].sources.len(), 1);
    assert_eq!(recs.potential_user_opportunities[0].value, "中产阶级：提供租赁和分期付款选项");
    assert_eq!(recs.potential_user_opportunities[0].sources.len(), 2);
}

#[test]
fn unknown_url_degrades_to_default_category_data() {
    let agg = aggregator();
    let category = agg.classify("https://www.example.org");
    assert_eq!(category, Category::GENERIC);

    let report = agg.build(
        "https://www.example.org",
        category,
        AnalysisType::Full,
        None,
        fixed_time(),
    );
    assert_eq!(report.category_label, "通用消费品市场");
    let market = report.market_trends.as_ref().unwrap();
    assert_eq!(market.market_size.value, "5000亿美元");
    assert_eq!(market.market_size.description, "通用消费品市场总市场规模");
    assert_eq!(
        report.competitor_analysis.as_ref().unwrap().top_competitors[0].name,
        "Samsung"
    );
    assert!(report.strategic_recommendations.strategic_summary.value.starts_with("智能手机市场"));
}

#[test]
fn scope_limits_sections() {
    let agg = aggregator();
    let report = agg.build(
        "https://www.tesla.com",
        Category::ElectricVehicle,
        AnalysisType::Competitor,
        None,
        fixed_time(),
    );
    assert!(report.market_trends.is_none());
    assert!(report.user_profile.is_none());
    assert_eq!(
        report.competitor_analysis.as_ref().unwrap().top_competitors[0].name,
        "Tesla"
    );
    assert!(!report.strategic_recommendations.strategy.is_empty());
}

#[test]
fn every_point_is_cited_within_bounds() {
    let agg = aggregator();
    for category in Category::ALL {
        let report = agg.build("https://x.example", category, AnalysisType::Full, None, fixed_time());
        let points = report.insight_points();
        assert!(!points.is_empty());
        for point in points {
            assert!(!point.sources.is_empty(), "uncited point: {}", point.value);
            assert!((0.0..=1.0).contains(&point.confidence));
            for source in &point.sources {
                assert!((0.0..=1.0).contains(&source.confidence));
            }
        }
    }
}

#[test]
fn empty_live_analysis_is_dropped() {
    let report = aggregator().build(
        "https://www.apple.com",
        Category::Smartphone,
        AnalysisType::Market,
        Some(crate::live::LiveAnalysis::default()),
        fixed_time(),
    );
    assert!(report.live_analysis.is_none());
}
