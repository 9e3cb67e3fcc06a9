use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tabula_core::{Interval, ObservedTransaction, RecurringPattern};

/// Inclusive range of mean day-gaps that classifies as one interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapRange {
    pub min_days: u32,
    pub max_days: u32,
}

impl GapRange {
    pub const fn new(min_days: u32, max_days: u32) -> Self {
        Self { min_days, max_days }
    }

    fn contains(self, mean_gap: f64) -> bool {
        f64::from(self.min_days) <= mean_gap && mean_gap <= f64::from(self.max_days)
    }
}

/// Tunables for recurring-payment inference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Groups with fewer transactions are ignored.
    pub min_occurrences: usize,
    /// Allowed spread `max - min` as a percentage of `|min|`.
    pub amount_tolerance_percent: u32,
    pub weekly: GapRange,
    pub monthly: GapRange,
    pub quarterly: GapRange,
    pub semi_annual: GapRange,
    pub annual: GapRange,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_occurrences: 2,
            amount_tolerance_percent: 10,
            weekly: GapRange::new(5, 9),
            monthly: GapRange::new(25, 35),
            quarterly: GapRange::new(85, 95),
            semi_annual: GapRange::new(170, 190),
            annual: GapRange::new(350, 380),
        }
    }
}

impl DetectorConfig {
    fn buckets(&self) -> [(Interval, GapRange); 5] {
        [
            (Interval::Weekly, self.weekly),
            (Interval::Monthly, self.monthly),
            (Interval::Quarterly, self.quarterly),
            (Interval::SemiAnnual, self.semi_annual),
            (Interval::Annual, self.annual),
        ]
    }

    /// First bucket containing `mean_gap`, in weekly → annual order.
    pub fn classify(&self, mean_gap: f64) -> Option<Interval> {
        self.buckets()
            .into_iter()
            .find(|(_, range)| range.contains(mean_gap))
            .map(|(interval, _)| interval)
    }

    /// Integer form of `(max - min) <= tolerance * |min|`.
    ///
    /// When `min` is 0 the allowance is 0, so the group is stable only if
    /// every amount is identical.
    pub fn amounts_stable(&self, min: i64, max: i64) -> bool {
        let spread = i128::from(max) - i128::from(min);
        spread * 100 <= i128::from(self.amount_tolerance_percent) * i128::from(min).abs()
    }
}

#[derive(Debug)]
struct PayeeGroup {
    payee: String,
    amounts: Vec<i64>,
    dates: Vec<NaiveDate>,
}

pub struct RecurringDetector {
    pub config: DetectorConfig,
}

impl Default for RecurringDetector {
    fn default() -> Self {
        Self::new(DetectorConfig::default())
    }
}

impl RecurringDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// Infer recurring payments. Output is ordered by normalized payee and is
    /// identical for identical input.
    pub fn detect(&self, transactions: &[ObservedTransaction]) -> Vec<RecurringPattern> {
        let mut groups: BTreeMap<String, PayeeGroup> = BTreeMap::new();
        for tx in transactions {
            let key = tx.payee.to_lowercase().trim().to_string();
            if key.is_empty() {
                continue;
            }
            let group = groups.entry(key).or_insert_with(|| PayeeGroup {
                payee: tx.payee.trim().to_string(),
                amounts: Vec::new(),
                dates: Vec::new(),
            });
            group.amounts.push(tx.amount);
            group.dates.push(tx.date);
        }

        let patterns: Vec<RecurringPattern> = groups
            .into_values()
            .filter_map(|group| self.evaluate(group))
            .collect();
        tracing::debug!(
            transactions = transactions.len(),
            patterns = patterns.len(),
            "recurring detection finished"
        );
        patterns
    }

    fn evaluate(&self, mut group: PayeeGroup) -> Option<RecurringPattern> {
        if group.dates.len() < self.config.min_occurrences.max(2) {
            return None;
        }

        let min = *group.amounts.iter().min()?;
        let max = *group.amounts.iter().max()?;
        if !self.config.amounts_stable(min, max) {
            return None;
        }

        group.dates.sort_unstable();
        let gaps: Vec<i64> = group
            .dates
            .windows(2)
            .map(|w| (w[1] - w[0]).num_days())
            .collect();
        let mean_gap = gaps.iter().sum::<i64>() as f64 / gaps.len() as f64;
        let likely_interval = self.config.classify(mean_gap)?;

        let sum: i128 = group.amounts.iter().map(|&a| i128::from(a)).sum();
        Some(RecurringPattern {
            payee: group.payee,
            amount: rounded_mean(sum, group.amounts.len()),
            likely_interval,
            occurrence_count: group.dates.len(),
        })
    }
}

/// Convenience wrapper using the default configuration.
pub fn detect_patterns(transactions: &[ObservedTransaction]) -> Vec<RecurringPattern> {
    RecurringDetector::default().detect(transactions)
}

/// Mean rounded half away from zero.
fn rounded_mean(sum: i128, count: usize) -> i64 {
    let n = count.max(1) as i128;
    let rounded = (2 * sum + sum.signum() * n) / (2 * n);
    i64::try_from(rounded).unwrap_or(if rounded < 0 { i64::MIN } else { i64::MAX })
}
