use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interval {
    Weekly,
    Monthly,
    Quarterly,
    SemiAnnual,
    Annual,
}

impl Interval {
    pub fn as_str(self) -> &'static str {
        match self {
            Interval::Weekly => "weekly",
            Interval::Monthly => "monthly",
            Interval::Quarterly => "quarterly",
            Interval::SemiAnnual => "semi_annual",
            Interval::Annual => "annual",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A repeating payment inferred from history alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringPattern {
    pub payee: String,
    /// Rounded mean of the observed amounts, minor units.
    pub amount: i64,
    pub likely_interval: Interval,
    pub occurrence_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringReport {
    pub patterns: Vec<RecurringPattern>,
    pub count: usize,
}

impl From<Vec<RecurringPattern>> for RecurringReport {
    fn from(patterns: Vec<RecurringPattern>) -> Self {
        RecurringReport {
            count: patterns.len(),
            patterns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_wire_names() {
        assert_eq!(serde_json::to_string(&Interval::SemiAnnual).unwrap(), "\"semi_annual\"");
        assert_eq!(Interval::Monthly.to_string(), "monthly");
    }

    #[test]
    fn report_counts_patterns() {
        let report = RecurringReport::from(vec![RecurringPattern {
            payee: "Netflix".to_string(),
            amount: 999,
            likely_interval: Interval::Monthly,
            occurrence_count: 6,
        }]);
        assert_eq!(report.count, 1);
    }
}
