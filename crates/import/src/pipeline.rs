use std::collections::BTreeMap;

use tabula_core::{
    BankFormatDescriptor, DetectedFormat, FormatSummary, ImportPreviewResult, LogicalField,
    PreviewRow,
};

use crate::decode::{Decoder, EncodingRsDecoder};
use crate::delimited::{parse_table, sniff_delimiter};
use crate::detect::detect;
use crate::error::ImportError;
use crate::header::find_header_row;
use crate::mapper::ColumnMap;
use crate::registry;
use crate::rules::{CategoryRule, CategoryRuleEngine};
use crate::sheet::TableReader;
use crate::util::compact_iban;

/// Encoding assumed when neither the caller nor a pinned format names one.
pub const DEFAULT_ENCODING: &str = "iso-8859-1";

/// Per-request knobs. Everything is optional; an empty value means
/// "detect it".
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    pub format_id: Option<String>,
    pub delimiter: Option<char>,
    pub encoding: Option<String>,
    /// IBAN → internal account id, applied to rows carrying an IBAN.
    pub account_mapping: BTreeMap<String, String>,
}

/// Orchestrates: decode → table → header → format → map rows → annotate.
///
/// Holds no per-request state, so one instance can serve many imports.
pub struct Importer {
    decoder: Box<dyn Decoder>,
    table_reader: Option<Box<dyn TableReader>>,
    rules: CategoryRuleEngine,
}

impl Default for Importer {
    fn default() -> Self {
        let importer = Self::new(EncodingRsDecoder);
        #[cfg(feature = "xlsx")]
        let importer = importer.with_table_reader(crate::sheet::CalamineReader);
        importer
    }
}

impl Importer {
    /// An importer without a spreadsheet reader.
    pub fn new(decoder: impl Decoder + 'static) -> Self {
        Self {
            decoder: Box::new(decoder),
            table_reader: None,
            rules: CategoryRuleEngine::new(Vec::new()),
        }
    }

    pub fn with_table_reader(mut self, reader: impl TableReader + 'static) -> Self {
        self.table_reader = Some(Box::new(reader));
        self
    }

    pub fn with_category_rules(mut self, rules: Vec<CategoryRule>) -> Self {
        self.rules = CategoryRuleEngine::new(rules);
        self
    }

    pub fn list_formats(&self) -> Vec<FormatSummary> {
        registry::list_formats()
    }

    /// Import a delimited-text export (CSV and friends).
    pub fn import_csv(
        &self,
        bytes: &[u8],
        options: &ImportOptions,
    ) -> Result<ImportPreviewResult, ImportError> {
        if bytes.is_empty() {
            return Err(ImportError::MissingInput);
        }
        let pinned = pinned_format(options)?;

        let encoding = options
            .encoding
            .as_deref()
            .or(pinned.map(|f| f.encoding))
            .unwrap_or(DEFAULT_ENCODING);
        let text = self.decoder.decode(bytes, encoding)?;
        tracing::debug!(encoding, chars = text.len(), "decoded input");

        let delimiter = match options.delimiter {
            Some(c) if c.is_ascii() => c as u8,
            Some(c) => {
                return Err(ImportError::InvalidArgument(format!(
                    "delimiter must be a single ASCII character, got '{c}'"
                )))
            }
            None => sniff_delimiter(&text),
        };

        let table = parse_table(&text, delimiter)?;
        tracing::debug!(rows = table.len(), delimiter = %(delimiter as char), "parsed table");
        if table.len() < 2 {
            return Err(ImportError::TooFewRows);
        }

        Ok(self.build_preview(&table, pinned, false, options))
    }

    /// Import the first sheet of a workbook through the configured reader.
    pub fn import_spreadsheet(
        &self,
        bytes: &[u8],
        options: &ImportOptions,
    ) -> Result<ImportPreviewResult, ImportError> {
        if bytes.is_empty() {
            return Err(ImportError::MissingInput);
        }
        let reader = self
            .table_reader
            .as_ref()
            .ok_or(ImportError::SpreadsheetReaderUnavailable)?;
        let pinned = pinned_format(options)?;

        let sheet = reader.first_sheet(bytes)?.ok_or(ImportError::NoSheetsFound)?;
        let table: Vec<Vec<String>> = sheet
            .rows
            .into_iter()
            .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
            .collect();
        tracing::debug!(sheet = %sheet.name, rows = table.len(), "read first sheet");
        if table.len() < 2 {
            return Err(ImportError::SpreadsheetEmpty);
        }

        Ok(self.build_preview(&table, pinned, true, options))
    }

    fn build_preview(
        &self,
        table: &[Vec<String>],
        pinned: Option<&'static BankFormatDescriptor>,
        include_spreadsheet_only: bool,
        options: &ImportOptions,
    ) -> ImportPreviewResult {
        let mut warnings = Vec::new();

        let header_idx = find_header_row(table, pinned);
        let headers = &table[header_idx];

        let format = match pinned {
            Some(f) => {
                warnings.push(format!("Using format: {}", f.name));
                Some(f)
            }
            None => match detect(headers, include_spreadsheet_only) {
                Some(f) => {
                    warnings.push(format!("Auto-detected format: {}", f.name));
                    Some(f)
                }
                None => {
                    tracing::warn!(?headers, "no known bank format matched");
                    warnings.push(
                        "No known bank format detected; using best-effort column mapping"
                            .to_string(),
                    );
                    None
                }
            },
        };

        let columns = ColumnMap::resolve(headers, format);
        for field in [LogicalField::Date, LogicalField::Amount] {
            if columns.index_of(field).is_none() {
                warnings.push(format!("Could not find a {field} column in the header row"));
            }
        }

        let mut rows: Vec<PreviewRow> = Vec::new();
        let mut skipped = 0usize;
        for (row_index, raw) in table[header_idx + 1..].iter().enumerate() {
            match columns.map_row(raw, row_index) {
                Some(row) => rows.push(row),
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            tracing::warn!(skipped, "rows without a parseable date were skipped");
            warnings.push(format!("Skipped {skipped} row(s) with unparseable dates"));
        }

        if !rows.is_empty() && rows.iter().all(|r| r.amount == 0) {
            warnings.push("Every imported amount is zero; check the amount column".to_string());
        }

        let mapped_accounts = apply_account_mapping(&mut rows, &options.account_mapping);
        let categorized = if self.rules.is_empty() {
            0
        } else {
            self.rules.apply(&mut rows)
        };

        let result = ImportPreviewResult::new(
            rows,
            skipped,
            format.map(|f| DetectedFormat {
                id: f.id.to_string(),
                name: f.name.to_string(),
            }),
            warnings,
        );
        tracing::info!(
            format = format.map(|f| f.id).unwrap_or("none"),
            header_row = header_idx,
            rows = result.total,
            skipped,
            mapped_accounts,
            categorized,
            net = %result.net_amount(),
            "import preview built"
        );
        result
    }
}

fn pinned_format(
    options: &ImportOptions,
) -> Result<Option<&'static BankFormatDescriptor>, ImportError> {
    match options.format_id.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(id) => registry::find(id)
            .map(Some)
            .ok_or_else(|| ImportError::InvalidArgument(format!("unknown format id '{id}'"))),
    }
}

/// Set `account_id` on rows whose IBAN is a key of `mapping`; returns how
/// many rows were mapped. Keys and cells are compared in compact form.
fn apply_account_mapping(rows: &mut [PreviewRow], mapping: &BTreeMap<String, String>) -> usize {
    if mapping.is_empty() {
        return 0;
    }
    let normalized: BTreeMap<String, &String> = mapping
        .iter()
        .map(|(iban, account)| (compact_iban(iban), account))
        .collect();

    let mut mapped = 0;
    for row in rows.iter_mut() {
        let account = row
            .iban
            .as_deref()
            .and_then(|iban| normalized.get(&compact_iban(iban)));
        if let Some(account) = account {
            row.account_id = Some((*account).clone());
            mapped += 1;
        }
    }
    mapped
}
