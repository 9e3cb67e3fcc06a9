use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::money::Money;

/// One normalized transaction candidate produced by an import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewRow {
    /// Serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub payee: String,
    /// Signed minor units.
    pub amount: i64,
    pub notes: Option<String>,
    pub imported_id: String,
    pub iban: Option<String>,
    pub category: Option<String>,
    pub account_id: Option<String>,
    pub suggested_category_id: Option<String>,
}

impl PreviewRow {
    pub fn money(&self) -> Money {
        Money::from_cents(self.amount)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedFormat {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportPreviewResult {
    pub rows: Vec<PreviewRow>,
    pub total: usize,
    pub skipped: usize,
    pub detected_format: Option<DetectedFormat>,
    pub warnings: Vec<String>,
}

impl ImportPreviewResult {
    pub fn new(
        rows: Vec<PreviewRow>,
        skipped: usize,
        detected_format: Option<DetectedFormat>,
        warnings: Vec<String>,
    ) -> Self {
        Self {
            total: rows.len(),
            rows,
            skipped,
            detected_format,
            warnings,
        }
    }

    /// Net sum of all row amounts.
    pub fn net_amount(&self) -> Money {
        self.rows.iter().map(PreviewRow::money).sum()
    }
}

/// The minimal shape the recurring detector needs from a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedTransaction {
    pub payee: String,
    pub amount: i64,
    pub date: NaiveDate,
}

impl From<&PreviewRow> for ObservedTransaction {
    fn from(row: &PreviewRow) -> Self {
        ObservedTransaction {
            payee: row.payee.clone(),
            amount: row.amount,
            date: row.date,
        }
    }
}
