//! Prompt templates for each analyzer facet.

use marketscope_core::MarketFacts;
use marketscope_scraper::PageContent;

use crate::stage::AnalyzerKind;

pub const MARKET_ANALYST_ROLE: &str = "你是一个专业的市场分析师，擅长分析北美市场的趋势和机会。";
pub const USER_RESEARCH_ROLE: &str = "你是一个专业的用户研究分析师，擅长分析用户画像、需求和行为模式。";
pub const COMPETITIVE_ANALYST_ROLE: &str =
    "你是一个专业的竞争分析师，擅长分析市场竞争环境、竞争对手和竞争策略。";

const JSON_ONLY: &str = "只返回一个JSON对象，不要包含其他文字。";

#[must_use]
pub fn system_role(kind: AnalyzerKind) -> &'static str {
    match kind {
        AnalyzerKind::Market => MARKET_ANALYST_ROLE,
        AnalyzerKind::User => USER_RESEARCH_ROLE,
        AnalyzerKind::Competitor => COMPETITIVE_ANALYST_ROLE,
    }
}

/// First `max_chars` characters of `text`.
pub(crate) fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub(crate) fn identify_industry(page: &PageContent, extra_field: &str) -> String {
    format!(
        "基于以下网站信息，识别该网站所属的行业类别：\n\
         URL: {url}\n标题: {title}\n描述: {description}\n内容摘要: {content}\n\n\
         返回字段：industry_name（行业名称）、industry_category（行业分类）、\
         key_products（主要产品/服务数组）、{extra_field}。\n{JSON_ONLY}",
        url = page.url,
        title = page.title,
        description = page.description,
        content = excerpt(&page.content, 1000),
    )
}

pub(crate) fn market_trends(
    page: &PageContent,
    industry: &str,
    category_label: &str,
    reference: &MarketFacts,
) -> String {
    format!(
        "基于以下信息，分析北美市场的市场趋势：\n\
         行业信息: {industry}\n\
         参考市场数据（{category_label}）: 市场规模 {size}（区间 {size_range}），\
         年复合增长率 {cagr}（区间 {cagr_range}），驱动因素 {drivers}\n\
         网站内容: {content}\n\n\
         返回字段：market_size（对象）、cagr（数字，百分比数值）、key_drivers（数组）、\
         growth_forecast（对象）、market_segments（对象数组，含name和share）、\
         industry_trends（数组）。\n{JSON_ONLY}",
        size = reference.market_size.value,
        size_range = reference.market_size.range,
        cagr = reference.cagr.value,
        cagr_range = reference.cagr.range,
        drivers = reference.key_drivers.join("、"),
        content = excerpt(&page.content, 2000),
    )
}

pub(crate) fn target_audience(page: &PageContent, industry: &str) -> String {
    format!(
        "基于以下网站信息，分析目标用户群体：\n\
         行业信息: {industry}\n网站内容: {content}\n用户关键词: {keywords}\n\n\
         请识别主要用户群体、次要用户群体、每个群体的特征和规模估计。\n\
         返回字段：target_audience（对象数组）。\n{JSON_ONLY}",
        content = excerpt(&page.content, 2000),
        keywords = page.keyword_hits.join(", "),
    )
}

pub(crate) fn needs_and_pain_points(page: &PageContent) -> String {
    format!(
        "基于以下网站内容，分析用户需求和痛点：\n\
         网站内容: {content}\n用户关键词: {keywords}\n\n\
         返回字段：needs（数组）、pain_points（数组）。\n{JSON_ONLY}",
        content = excerpt(&page.content, 2000),
        keywords = page.keyword_hits.join(", "),
    )
}

pub(crate) fn user_behavior(page: &PageContent) -> String {
    format!(
        "基于以下网站内容，分析用户行为模式，包括购买行为、使用习惯、决策过程、互动方式和偏好特征：\n\
         网站内容: {content}\n\n{JSON_ONLY}",
        content = excerpt(&page.content, 1500),
    )
}

pub(crate) fn demographics_psychographics(audience: &str) -> String {
    format!(
        "基于以下目标用户群体信息，分析人口统计学特征（年龄、性别、收入、教育、地理位置）\
         和心理特征（价值观、生活方式、兴趣、态度）：\n\
         目标用户群体: {audience}\n\n\
         返回字段：demographics（对象）、psychographics（对象）。\n{JSON_ONLY}"
    )
}

pub(crate) fn competitors(page: &PageContent, industry: &str) -> String {
    format!(
        "基于以下信息，识别主要竞争对手（直接、间接和潜在竞争对手）及其基本信息：\n\
         网站内容: {content}\n行业信息: {industry}\n竞争对手关键词: {keywords}\n\n\
         返回字段：competitors（对象数组，每个对象至少包含name和type）。\n{JSON_ONLY}",
        content = excerpt(&page.content, 2000),
        keywords = page.keyword_hits.join(", "),
    )
}

pub(crate) fn competitor_trait(name: &str, competitor: &str, field: &str, label: &str) -> String {
    format!(
        "分析竞争对手 {name} 的{label}：\n竞争对手信息: {competitor}\n\n\
         返回字段：{field}（数组）。\n{JSON_ONLY}"
    )
}

pub(crate) fn competitive_landscape(competitors: &str, industry: &str) -> String {
    format!(
        "基于以下竞争对手信息，分析竞争格局，包括市场集中度、竞争强度、进入壁垒、替代品威胁和竞争策略类型：\n\
         竞争对手: {competitors}\n行业信息: {industry}\n\n{JSON_ONLY}"
    )
}

pub(crate) fn product_comparison(competitors: &str, page: &PageContent) -> String {
    format!(
        "基于以下信息，对比功能特性、价格策略、用户体验、技术优势和服务支持：\n\
         竞争对手: {competitors}\n网站内容: {content}\n\n\
         返回字段：product_comparison（对象数组）。\n{JSON_ONLY}",
        content = excerpt(&page.content, 1500),
    )
}

pub(crate) fn marketing_strategies(competitors: &str) -> String {
    format!(
        "基于以下竞争对手信息，分析品牌定位、内容营销、社交媒体、广告投放和客户获取策略：\n\
         竞争对手: {competitors}\n\n\
         返回字段：marketing_strategies（对象数组）。\n{JSON_ONLY}"
    )
}

pub(crate) fn competitive_advantages(page: &PageContent, competitors: &str) -> String {
    format!(
        "基于以下信息，分析技术、成本、差异化、网络效应和品牌方面的竞争优势：\n\
         网站内容: {content}\n竞争对手: {competitors}\n\n\
         返回字段：competitive_advantages（数组）。\n{JSON_ONLY}",
        content = excerpt(&page.content, 2000),
    )
}

pub(crate) fn market_positioning(page: &PageContent, competitors: &str) -> String {
    format!(
        "基于以下信息，分析目标市场定位、价值主张、品牌形象、差异化策略和市场地位：\n\
         网站内容: {content}\n竞争对手: {competitors}\n\n{JSON_ONLY}",
        content = excerpt(&page.content, 2000),
    )
}

pub(crate) fn url_only(kind: AnalyzerKind, url: &str) -> String {
    let (topic, fields) = match kind {
        AnalyzerKind::Market => (
            "市场趋势，包括市场规模、增长率、驱动因素等",
            "market_size、cagr、key_drivers、growth_forecast、market_segments、industry_trends",
        ),
        AnalyzerKind::User => (
            "目标用户画像，包括目标用户、需求、痛点等",
            "target_audience、user_needs、pain_points、user_behavior、demographics、psychographics",
        ),
        AnalyzerKind::Competitor => (
            "竞争环境，包括竞争对手、竞争格局等",
            "competitors、competitive_landscape、product_comparison、marketing_strategies、\
             competitive_advantages、market_positioning",
        ),
    };
    format!("基于URL {url}，分析该网站可能涉及的{topic}。\n返回字段：{fields}。\n{JSON_ONLY}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_respects_char_boundaries() {
        assert_eq!(excerpt("用户需求分析", 2), "用户");
        assert_eq!(excerpt("short", 100), "short");
    }

    #[test]
    fn url_only_prompt_names_fields() {
        let prompt = url_only(AnalyzerKind::Competitor, "https://www.tesla.com");
        assert!(prompt.contains("https://www.tesla.com"));
        assert!(prompt.contains("market_positioning"));
    }

    #[test]
    fn identify_prompt_truncates_content() {
        let page = PageContent {
            url: "https://www.apple.com".to_string(),
            content: "a".repeat(3000),
            ..PageContent::default()
        };
        let prompt = identify_industry(&page, "target_market（目标市场）");
        assert!(prompt.len() < 1500);
        assert!(prompt.contains("target_market"));
    }
}
