use serde::{Deserialize, Serialize};
use tabula_core::PreviewRow;

use crate::util::similarity;

/// Maps payees to a category id the ledger should suggest for the row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryRule {
    pub name: String,
    #[serde(default)]
    pub priority: i32,
    pub pattern: String,
    #[serde(default)]
    pub match_type: MatchType,
    pub category_id: String,
    pub amount_min_cents: Option<i64>,
    pub amount_max_cents: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// Payee or notes contain the pattern.
    #[default]
    Contains,
    Exact,
    Regex,
    Fuzzy {
        threshold: f32,
    },
}

/// Internal pairing of a rule with its precompiled regex (if applicable).
struct CompiledRule {
    rule: CategoryRule,
    compiled_regex: Option<regex::Regex>,
}

pub struct CategoryRuleEngine {
    rules: Vec<CompiledRule>,
}

impl CategoryRuleEngine {
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        let mut compiled: Vec<CompiledRule> = rules
            .into_iter()
            .map(|rule| {
                let compiled_regex = match &rule.match_type {
                    MatchType::Regex => match regex::Regex::new(&rule.pattern) {
                        Ok(re) => Some(re),
                        Err(e) => {
                            tracing::warn!(
                                "Category rule '{}' has an invalid regex: {e}",
                                rule.name
                            );
                            None
                        }
                    },
                    _ => None,
                };
                CompiledRule { rule, compiled_regex }
            })
            .collect();
        // Highest priority first; stable, so equal priorities keep file order.
        compiled.sort_by(|a, b| b.rule.priority.cmp(&a.rule.priority));
        Self { rules: compiled }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn find_matching_rule(&self, row: &PreviewRow) -> Option<&CategoryRule> {
        self.rules
            .iter()
            .find(|cr| rule_matches(cr, row))
            .map(|cr| &cr.rule)
    }

    /// Set `suggested_category_id` on every row a rule matches; returns how
    /// many rows received a suggestion.
    pub fn apply(&self, rows: &mut [PreviewRow]) -> usize {
        let mut applied = 0;
        for row in rows.iter_mut() {
            if let Some(rule) = self.find_matching_rule(row) {
                row.suggested_category_id = Some(rule.category_id.clone());
                applied += 1;
            }
        }
        applied
    }
}

fn rule_matches(cr: &CompiledRule, row: &PreviewRow) -> bool {
    let rule = &cr.rule;

    if rule.amount_min_cents.is_some_and(|min| row.amount < min) {
        return false;
    }
    if rule.amount_max_cents.is_some_and(|max| row.amount > max) {
        return false;
    }

    let payee = row.payee.to_lowercase();
    let pattern = rule.pattern.to_lowercase();

    match &rule.match_type {
        MatchType::Contains => {
            payee.contains(&pattern)
                || row
                    .notes
                    .as_deref()
                    .is_some_and(|n| n.to_lowercase().contains(&pattern))
        }
        MatchType::Exact => payee.trim() == pattern.trim(),
        MatchType::Regex => cr
            .compiled_regex
            .as_ref()
            .is_some_and(|re| re.is_match(&row.payee)),
        MatchType::Fuzzy { threshold } => similarity(&payee, &pattern) >= *threshold,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_row(payee: &str, amount: i64) -> PreviewRow {
        PreviewRow {
            date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            payee: payee.to_string(),
            amount,
            notes: None,
            imported_id: "id".to_string(),
            iban: None,
            category: None,
            account_id: None,
            suggested_category_id: None,
        }
    }

    fn make_rule(
        pattern: &str,
        match_type: MatchType,
        category: &str,
        priority: i32,
    ) -> CategoryRule {
        CategoryRule {
            name: "test".to_string(),
            priority,
            pattern: pattern.to_string(),
            match_type,
            category_id: category.to_string(),
            amount_min_cents: None,
            amount_max_cents: None,
        }
    }

    #[test]
    fn contains_match_case_insensitive() {
        let engine =
            CategoryRuleEngine::new(vec![make_rule("rewe", MatchType::Contains, "groceries", 1)]);
        assert!(engine.find_matching_rule(&make_row("REWE Markt GmbH", -2350)).is_some());
        assert!(engine.find_matching_rule(&make_row("Aral Tankstelle", -6000)).is_none());
    }

    #[test]
    fn contains_also_searches_notes() {
        let engine =
            CategoryRuleEngine::new(vec![make_rule("miete", MatchType::Contains, "rent", 1)]);
        let mut row = make_row("Hausverwaltung Schmidt", -95000);
        row.notes = Some("Miete Januar".to_string());
        assert!(engine.find_matching_rule(&row).is_some());
    }

    #[test]
    fn exact_match() {
        let engine =
            CategoryRuleEngine::new(vec![make_rule("netflix", MatchType::Exact, "streaming", 1)]);
        assert!(engine.find_matching_rule(&make_row("Netflix", -999)).is_some());
        assert!(engine.find_matching_rule(&make_row("Netflix International", -999)).is_none());
    }

    #[test]
    fn regex_match() {
        let engine = CategoryRuleEngine::new(vec![make_rule(
            r"^(AMZN|Amazon)",
            MatchType::Regex,
            "shopping",
            1,
        )]);
        assert!(engine.find_matching_rule(&make_row("Amazon EU S.a.r.l.", -1999)).is_some());
        assert!(engine.find_matching_rule(&make_row("AMZN Mktp DE", -1399)).is_some());
        assert!(engine.find_matching_rule(&make_row("Lidl", -1000)).is_none());
    }

    #[test]
    fn invalid_regex_never_matches() {
        let engine =
            CategoryRuleEngine::new(vec![make_rule("(unclosed", MatchType::Regex, "x", 1)]);
        assert!(engine.find_matching_rule(&make_row("(unclosed", -1)).is_none());
    }

    #[test]
    fn fuzzy_match_similar_strings() {
        let engine = CategoryRuleEngine::new(vec![make_rule(
            "spotify",
            MatchType::Fuzzy { threshold: 0.8 },
            "streaming",
            1,
        )]);
        assert!(engine.find_matching_rule(&make_row("Spotfy", -1099)).is_some());
        assert!(engine.find_matching_rule(&make_row("Stadtwerke", -4500)).is_none());
    }

    #[test]
    fn priority_ordering_highest_wins() {
        let engine = CategoryRuleEngine::new(vec![
            make_rule("amazon", MatchType::Contains, "shopping", 1),
            make_rule("amazon prime", MatchType::Contains, "streaming", 10),
        ]);
        let rule = engine.find_matching_rule(&make_row("Amazon Prime", -899)).unwrap();
        assert_eq!(rule.category_id, "streaming");
    }

    #[test]
    fn amount_bounds() {
        let rule = CategoryRule {
            amount_min_cents: Some(-10_000),
            amount_max_cents: Some(0),
            ..make_rule("amazon", MatchType::Contains, "small-purchases", 1)
        };
        let engine = CategoryRuleEngine::new(vec![rule]);
        assert!(engine.find_matching_rule(&make_row("Amazon", -9_999)).is_some());
        assert!(engine.find_matching_rule(&make_row("Amazon", -10_001)).is_none());
        assert!(engine.find_matching_rule(&make_row("Amazon", 500)).is_none());
    }

    #[test]
    fn apply_sets_suggestions() {
        let engine = CategoryRuleEngine::new(vec![make_rule(
            "netflix",
            MatchType::Contains,
            "streaming",
            1,
        )]);
        let mut rows = vec![make_row("Netflix", -999), make_row("REWE", -2000)];
        assert_eq!(engine.apply(&mut rows), 1);
        assert_eq!(rows[0].suggested_category_id.as_deref(), Some("streaming"));
        assert_eq!(rows[1].suggested_category_id, None);
    }

    #[test]
    fn rules_deserialize_from_toml() {
        #[derive(Deserialize)]
        struct File {
            rules: Vec<CategoryRule>,
        }
        let file: File = toml::from_str(
            r#"
            [[rules]]
            name = "Streaming"
            pattern = "spotify"
            category_id = "streaming"
            match_type = { fuzzy = { threshold = 0.8 } }

            [[rules]]
            name = "Groceries"
            priority = 5
            pattern = "rewe"
            category_id = "groceries"
            "#,
        )
        .unwrap();
        assert_eq!(file.rules.len(), 2);
        assert_eq!(file.rules[0].match_type, MatchType::Fuzzy { threshold: 0.8 });
        assert_eq!(file.rules[1].match_type, MatchType::Contains);
        assert_eq!(file.rules[1].priority, 5);
    }
}
