//! Free-function entry points over a default [`Importer`].

use std::collections::BTreeMap;

use tabula_core::{FormatSummary, ImportPreviewResult, ObservedTransaction, RecurringReport};

use crate::error::ImportError;
use crate::pipeline::{ImportOptions, Importer};
use crate::recurring::{DetectorConfig, RecurringDetector};
use crate::registry;

pub fn list_formats() -> Vec<FormatSummary> {
    registry::list_formats()
}

/// Decode and map a delimited bank export. `None` arguments are detected.
pub fn import_csv(
    bytes: &[u8],
    format_id: Option<&str>,
    delimiter: Option<char>,
    encoding: Option<&str>,
) -> Result<ImportPreviewResult, ImportError> {
    let options = ImportOptions {
        format_id: format_id.map(str::to_string),
        delimiter,
        encoding: encoding.map(str::to_string),
        account_mapping: BTreeMap::new(),
    };
    Importer::default().import_csv(bytes, &options)
}

/// Map the first sheet of a workbook, optionally tagging rows whose IBAN
/// appears in `account_mapping`.
pub fn import_spreadsheet(
    bytes: &[u8],
    account_mapping: Option<&BTreeMap<String, String>>,
) -> Result<ImportPreviewResult, ImportError> {
    let options = ImportOptions {
        account_mapping: account_mapping.cloned().unwrap_or_default(),
        ..ImportOptions::default()
    };
    Importer::default().import_spreadsheet(bytes, &options)
}

pub fn detect_recurring(transactions: &[ObservedTransaction]) -> RecurringReport {
    RecurringDetector::default().detect(transactions).into()
}

/// Recurring detection over an untyped JSON array of
/// `{payee, amount, date}` objects.
pub fn detect_recurring_json(
    transactions: &serde_json::Value,
    config: &DetectorConfig,
) -> Result<RecurringReport, ImportError> {
    if !transactions.is_array() {
        return Err(ImportError::InvalidArgument(
            "transactions must be an array".to_string(),
        ));
    }
    let parsed: Vec<ObservedTransaction> = serde_json::from_value(transactions.clone())
        .map_err(|e| ImportError::InvalidArgument(format!("malformed transaction: {e}")))?;
    Ok(RecurringDetector::new(config.clone()).detect(&parsed).into())
}
