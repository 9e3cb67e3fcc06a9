use tabula_core::{BankFormatDescriptor, LogicalField};

/// How many leading rows are considered when looking for the header.
pub const HEADER_SCAN_LIMIT: usize = 20;

const FALLBACK_KEYWORDS: &[&str] = &["buchungstag", "betrag", "date", "amount", "buchung", "datum"];

/// Index of the row that most plausibly names the columns.
///
/// With a caller-pinned `format` the keywords are its date/amount column
/// names and one hit suffices; otherwise a built-in keyword list is used and
/// a row needs two hits. Falls back to row 0 when nothing qualifies.
pub fn find_header_row(rows: &[Vec<String>], format: Option<&BankFormatDescriptor>) -> usize {
    let keywords: Vec<String> = match format {
        Some(f) => [LogicalField::Date, LogicalField::Amount]
            .into_iter()
            .filter_map(|field| f.column(field))
            .map(str::to_lowercase)
            .collect(),
        None => FALLBACK_KEYWORDS.iter().map(|k| k.to_string()).collect(),
    };
    let required = if format.is_some() { 1 } else { 2 };

    rows.iter()
        .take(HEADER_SCAN_LIMIT)
        .position(|row| keyword_hits(row, &keywords) >= required)
        .unwrap_or(0)
}

fn keyword_hits(row: &[String], keywords: &[String]) -> usize {
    let cells: Vec<String> = row.iter().map(|c| c.trim().to_lowercase()).collect();
    keywords
        .iter()
        .filter(|k| cells.iter().any(|c| c.contains(k.as_str())))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::find;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn skips_preamble_with_fallback_keywords() {
        let table = rows(&[
            &["Kontonummer:", "DE12 1203 0000 0000 0000 00"],
            &["Von:", "01.01.2025"],
            &["Bis:", "31.12.2025"],
            &["Kontostand vom 31.12.2025:", "1.234,56 EUR"],
            &["Buchungstag", "Wertstellung", "Betrag (EUR)"],
            &["02.01.2025", "02.01.2025", "-9,99"],
        ]);
        assert_eq!(find_header_row(&table, None), 4);
    }

    #[test]
    fn single_hit_is_not_enough_without_pinned_format() {
        let table = rows(&[&["Datum", "Text"], &["Date", "Amount"]]);
        assert_eq!(find_header_row(&table, None), 1);
    }

    #[test]
    fn pinned_format_accepts_single_hit() {
        let ing = find("ing").unwrap();
        let table = rows(&[&["Umsatzanzeige"], &["Buchung", "Text"], &["x"]]);
        assert_eq!(find_header_row(&table, Some(ing)), 1);
    }

    #[test]
    fn pinned_format_uses_its_own_column_names() {
        let dkb = find("dkb").unwrap();
        let table = rows(&[&["Datum", "Betrag"], &["Buchungstag", "Betrag (EUR)"]]);
        assert_eq!(find_header_row(&table, Some(dkb)), 1);
    }

    #[test]
    fn no_match_defaults_to_first_row() {
        let table = rows(&[&["foo", "bar"], &["1", "2"]]);
        assert_eq!(find_header_row(&table, None), 0);
    }

    #[test]
    fn scan_stops_after_limit() {
        let mut table = vec![vec!["preamble".to_string()]; HEADER_SCAN_LIMIT];
        table.push(vec!["Datum".to_string(), "Betrag".to_string()]);
        assert_eq!(find_header_row(&table, None), 0);
    }
}
