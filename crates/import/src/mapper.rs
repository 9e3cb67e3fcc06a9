use std::collections::BTreeMap;

use tabula_core::{BankFormatDescriptor, LogicalField, PreviewRow};

use crate::amount::parse_amount;
use crate::date::parse_date;
use crate::hash::imported_id;

pub const UNKNOWN_PAYEE: &str = "Unknown";

/// Header names tried, in order, when no bank format is known.
const FALLBACK_CANDIDATES: &[(LogicalField, &[&str])] = &[
    (
        LogicalField::Date,
        &["Buchungstag", "Buchungsdatum", "Datum", "Date", "Valuta"],
    ),
    (
        LogicalField::Payee,
        &["Empfänger", "Payee", "Auftraggeber", "Beguenstigter", "Name"],
    ),
    (LogicalField::Amount, &["Betrag", "Amount", "Umsatz"]),
    (
        LogicalField::Notes,
        &["Verwendungszweck", "Notes", "Memo", "Description", "Beschreibung"],
    ),
    (LogicalField::Iban, &["IBAN", "Kontonummer"]),
    (LogicalField::Category, &["Kategorie", "Category"]),
];

/// Column index per logical field, resolved once per import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    indices: BTreeMap<LogicalField, usize>,
    date_format: Option<&'static str>,
}

impl ColumnMap {
    /// Resolve columns by substring match against `headers`, using the
    /// format's configured names or the fallback candidates.
    pub fn resolve(headers: &[String], format: Option<&BankFormatDescriptor>) -> Self {
        let lowered: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
        let find = |name: &str| {
            let name = name.to_lowercase();
            lowered.iter().position(|h| h.contains(&name))
        };

        let mut indices = BTreeMap::new();
        match format {
            Some(f) => {
                for (field, name) in f.columns {
                    if let Some(idx) = find(name) {
                        indices.insert(*field, idx);
                    }
                }
            }
            None => {
                for (field, candidates) in FALLBACK_CANDIDATES {
                    if let Some(idx) = candidates.iter().find_map(|c| find(c)) {
                        indices.insert(*field, idx);
                    }
                }
            }
        }

        Self {
            indices,
            date_format: format.map(|f| f.date_format),
        }
    }

    pub fn index_of(&self, field: LogicalField) -> Option<usize> {
        self.indices.get(&field).copied()
    }

    fn cell<'r>(&self, row: &'r [String], field: LogicalField) -> &'r str {
        self.index_of(field)
            .and_then(|idx| row.get(idx))
            .map(|c| c.trim())
            .unwrap_or("")
    }

    fn optional(&self, row: &[String], field: LogicalField) -> Option<String> {
        Some(self.cell(row, field))
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// Map one data row; `None` when its date cannot be parsed.
    pub fn map_row(&self, row: &[String], row_index: usize) -> Option<PreviewRow> {
        let date = parse_date(self.cell(row, LogicalField::Date), self.date_format)?;
        let payee = match self.cell(row, LogicalField::Payee) {
            "" => UNKNOWN_PAYEE.to_string(),
            p => p.to_string(),
        };
        let amount = parse_amount(self.cell(row, LogicalField::Amount));

        Some(PreviewRow {
            imported_id: imported_id(date, &payee, amount, row_index),
            date,
            payee,
            amount,
            notes: self.optional(row, LogicalField::Notes),
            iban: self.optional(row, LogicalField::Iban),
            category: self.optional(row, LogicalField::Category),
            account_id: None,
            suggested_category_id: None,
        })
    }
}

/// One-shot form of [`ColumnMap::map_row`].
pub fn map_row(
    row: &[String],
    format: Option<&BankFormatDescriptor>,
    headers: &[String],
    row_index: usize,
) -> Option<PreviewRow> {
    ColumnMap::resolve(headers, format).map_row(row, row_index)
}
