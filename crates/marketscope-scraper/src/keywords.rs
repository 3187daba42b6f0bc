/// Words that suggest a page discusses competing products.
pub const COMPETITOR_KEYWORDS: &[&str] = &[
    "competitor",
    "alternative",
    "vs",
    "compare",
    "similar",
    "competition",
    "rival",
    "opponent",
    "challenger",
];

/// Words that suggest a page talks about its audience and their needs.
pub const USER_RESEARCH_KEYWORDS: &[&str] = &[
    "用户",
    "客户",
    "消费者",
    "用户群体",
    "目标用户",
    "用户需求",
    "user",
    "customer",
    "consumer",
    "audience",
    "target",
    "need",
    "pain point",
    "problem",
    "solution",
    "benefit",
    "value",
];

/// Keywords from `keywords` that occur in `text`, case-insensitively.
///
/// Hits keep the order of `keywords` and appear once each.
#[must_use]
pub fn keyword_hits(text: &str, keywords: &[&str]) -> Vec<String> {
    let haystack = text.to_lowercase();
    let mut hits: Vec<String> = Vec::new();
    for keyword in keywords {
        let needle = keyword.to_lowercase();
        if needle.is_empty() || hits.contains(&needle) {
            continue;
        }
        if haystack.contains(&needle) {
            hits.push(needle);
        }
    }
    hits
}
