use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical column roles a bank export is mapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalField {
    Date,
    Payee,
    Amount,
    Iban,
    Notes,
    Category,
}

impl LogicalField {
    pub const ALL: [LogicalField; 6] = [
        LogicalField::Date,
        LogicalField::Payee,
        LogicalField::Amount,
        LogicalField::Iban,
        LogicalField::Notes,
        LogicalField::Category,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LogicalField::Date => "date",
            LogicalField::Payee => "payee",
            LogicalField::Amount => "amount",
            LogicalField::Iban => "iban",
            LogicalField::Notes => "notes",
            LogicalField::Category => "category",
        }
    }
}

impl fmt::Display for LogicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of one bank's export layout.
///
/// `columns` maps logical fields to the literal header text the bank uses.
/// Fields the bank does not export are simply absent. `date_format` is a
/// chrono format string tried before the generic date fallbacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BankFormatDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub encoding: &'static str,
    pub delimiter: char,
    pub skip_rows: usize,
    pub columns: &'static [(LogicalField, &'static str)],
    pub date_format: &'static str,
    pub spreadsheet_only: bool,
}

impl BankFormatDescriptor {
    pub fn column(&self, field: LogicalField) -> Option<&'static str> {
        self.columns
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, name)| *name)
    }

    pub fn summary(&self) -> FormatSummary {
        FormatSummary {
            id: self.id.to_string(),
            name: self.name.to_string(),
            encoding: self.encoding.to_string(),
            delimiter: self.delimiter.to_string(),
        }
    }
}

/// The registry entry as shown to a user picking a format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatSummary {
    pub id: String,
    pub name: String,
    pub encoding: String,
    pub delimiter: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: BankFormatDescriptor = BankFormatDescriptor {
        id: "sample",
        name: "Sample Bank",
        encoding: "utf-8",
        delimiter: ';',
        skip_rows: 2,
        columns: &[
            (LogicalField::Date, "Datum"),
            (LogicalField::Amount, "Betrag"),
        ],
        date_format: "%d.%m.%Y",
        spreadsheet_only: false,
    };

    #[test]
    fn column_lookup() {
        assert_eq!(SAMPLE.column(LogicalField::Date), Some("Datum"));
        assert_eq!(SAMPLE.column(LogicalField::Iban), None);
    }

    #[test]
    fn summary_stringifies_delimiter() {
        let s = SAMPLE.summary();
        assert_eq!(s.id, "sample");
        assert_eq!(s.delimiter, ";");
    }

    #[test]
    fn logical_field_serializes_snake_case() {
        let json = serde_json::to_string(&LogicalField::Payee).unwrap();
        assert_eq!(json, "\"payee\"");
        assert_eq!(LogicalField::Notes.to_string(), "notes");
    }
}
