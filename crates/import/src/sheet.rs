use chrono::{NaiveDate, TimeDelta};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableReadError {
    #[error("Unreadable workbook: {0}")]
    Unreadable(String),
}

/// One worksheet flattened to text cells; missing cells are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

/// Abstraction over a spreadsheet reader.
/// Implementations accept raw workbook bytes (XLSX, XLS, ODS) and return the
/// first worksheet, or `None` when the workbook has no sheets at all.
pub trait TableReader: Send + Sync {
    fn first_sheet(&self, bytes: &[u8]) -> Result<Option<Sheet>, TableReadError>;
}

/// Convert an Excel serial day number to `YYYY-MM-DD`; `None` when the
/// serial is not finite or lands outside chrono's calendar.
pub fn excel_serial_to_date(serial: f64) -> Option<String> {
    if !serial.is_finite() {
        return None;
    }
    // Excel epoch is 1899-12-30 (accounting for the 1900 leap year bug)
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let date = base.checked_add_signed(TimeDelta::try_days(serial.floor() as i64)?)?;
    Some(date.format("%Y-%m-%d").to_string())
}

// ── calamine backend (optional, gated behind `xlsx` feature) ──────────────────

#[cfg(feature = "xlsx")]
pub mod calamine_backend {
    use super::{excel_serial_to_date, Sheet, TableReadError, TableReader};
    use calamine::{open_workbook_auto_from_rs, Data, Reader};
    use std::io::Cursor;

    #[derive(Debug, Default, Clone, Copy)]
    pub struct CalamineReader;

    impl TableReader for CalamineReader {
        fn first_sheet(&self, bytes: &[u8]) -> Result<Option<Sheet>, TableReadError> {
            let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
                .map_err(|e| TableReadError::Unreadable(e.to_string()))?;
            let Some(name) = workbook.sheet_names().first().cloned() else {
                return Ok(None);
            };
            let range = workbook
                .worksheet_range(&name)
                .map_err(|e| TableReadError::Unreadable(e.to_string()))?;
            let rows = range
                .rows()
                .map(|row| row.iter().map(cell_text).collect())
                .collect();
            Ok(Some(Sheet { name, rows }))
        }
    }

    fn cell_text(cell: &Data) -> String {
        match cell {
            Data::String(s) => s.clone(),
            Data::Float(f) => f.to_string(),
            Data::Int(i) => i.to_string(),
            Data::Bool(b) => b.to_string(),
            Data::DateTime(dt) => excel_serial_to_date(dt.as_f64()).unwrap_or_default(),
            Data::DateTimeIso(s) => s.clone(),
            _ => String::new(),
        }
    }

}

#[cfg(feature = "xlsx")]
pub use calamine_backend::CalamineReader;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excel_serial_dates() {
        assert_eq!(excel_serial_to_date(45000.0).as_deref(), Some("2023-03-15"));
        assert_eq!(excel_serial_to_date(46022.75).as_deref(), Some("2025-12-31"));
    }

    #[test]
    fn excel_serial_out_of_range_is_none() {
        assert_eq!(excel_serial_to_date(1e300), None);
        assert_eq!(excel_serial_to_date(-1e300), None);
        assert_eq!(excel_serial_to_date(1e12), None);
        assert_eq!(excel_serial_to_date(f64::NAN), None);
        assert_eq!(excel_serial_to_date(f64::INFINITY), None);
    }
}
