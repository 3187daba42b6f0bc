use serde::{Deserialize, Serialize};

use crate::category::Category;

/// A brand or domain keyword mapped to the category it implies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub keyword: String,
    pub category: Category,
}

/// Maps a URL to a market category by keyword substring match.
///
/// Rules are tried in order and the first hit wins. Matching is done against
/// the lowercased URL; keywords are expected to be lowercase already (the
/// catalog loader enforces this).
#[derive(Debug, Clone)]
pub struct CategoryClassifier {
    rules: Vec<KeywordRule>,
}

impl CategoryClassifier {
    #[must_use]
    pub fn new(rules: Vec<KeywordRule>) -> Self {
        Self { rules }
    }

    #[must_use]
    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }

    #[must_use]
    pub fn classify(&self, url: &str) -> Category {
        let lowered = url.to_lowercase();
        self.rules
            .iter()
            .find(|rule| lowered.contains(rule.keyword.as_str()))
            .map_or(Category::GENERIC, |rule| rule.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(keyword: &str, category: Category) -> KeywordRule {
        KeywordRule {
            keyword: keyword.to_string(),
            category,
        }
    }

    fn classifier() -> CategoryClassifier {
        CategoryClassifier::new(vec![
            rule("apple", Category::Smartphone),
            rule("tesla", Category::ElectricVehicle),
            rule("amazon", Category::Ecommerce),
        ])
    }

    #[test]
    fn classify_matches_case_insensitively() {
        assert_eq!(
            classifier().classify("https://WWW.Apple.COM/iphone"),
            Category::Smartphone
        );
    }

    #[test]
    fn classify_unknown_url_is_generic() {
        assert_eq!(
            classifier().classify("https://www.example.org"),
            Category::GeneralConsumer
        );
    }

    #[test]
    fn classify_first_rule_wins_on_multiple_hits() {
        assert_eq!(
            classifier().classify("https://www.amazon.com/tesla-apple-accessories"),
            Category::Smartphone
        );
    }

    #[test]
    fn classify_empty_input_is_generic() {
        assert_eq!(classifier().classify(""), Category::GeneralConsumer);
    }

    #[test]
    fn classify_with_no_rules_is_generic() {
        let empty = CategoryClassifier::new(Vec::new());
        assert_eq!(empty.classify("https://www.apple.com"), Category::GENERIC);
    }
}
