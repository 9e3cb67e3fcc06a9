/// Delimiter used when the caller does not name one: `;` if the first line
/// contains it (German exports), `,` otherwise.
pub fn sniff_delimiter(text: &str) -> u8 {
    let first_line = text.lines().next().unwrap_or_default();
    if first_line.contains(';') {
        b';'
    } else {
        b','
    }
}

/// Split decoded text into a ragged 2-D table.
///
/// Rows may have differing lengths and quoted fields may embed delimiters,
/// quotes and newlines. Rows whose cells are all blank are dropped.
pub fn parse_table(text: &str, delimiter: u8) -> Result<Vec<Vec<String>>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}
