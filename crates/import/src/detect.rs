use tabula_core::{BankFormatDescriptor, LogicalField};

use crate::registry::REGISTRY;

/// Pick the first registry entry whose date and payee column names both
/// occur (case-insensitively, as substrings) in `headers`.
///
/// Spreadsheet-only formats are considered only when
/// `include_spreadsheet_only` is set.
pub fn detect(
    headers: &[String],
    include_spreadsheet_only: bool,
) -> Option<&'static BankFormatDescriptor> {
    let lowered: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
    let has = |needle: Option<&str>| {
        needle.is_some_and(|n| {
            let n = n.to_lowercase();
            lowered.iter().any(|h| h.contains(&n))
        })
    };

    REGISTRY
        .iter()
        .filter(|d| include_spreadsheet_only || !d.spreadsheet_only)
        .find(|d| has(d.column(LogicalField::Date)) && has(d.column(LogicalField::Payee)))
}
