use chrono::NaiveDate;
use sha2::{Digest, Sha256};

/// Number of hex characters kept from the digest.
const IMPORTED_ID_LEN: usize = 16;

/// Compute SHA-256 of an in-memory byte slice.
pub fn sha256_bytes(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Encode a raw 32-byte hash as a lowercase hex string (64 chars).
pub fn to_hex(hash: &[u8; 32]) -> String {
    hash.iter().map(|b| format!("{b:02x}")).collect()
}

/// Short dedup identifier for an imported row.
///
/// `row_index` is the row's position among this import's data rows, so the
/// same transaction at a different position gets a different id.
pub fn imported_id(date: NaiveDate, payee: &str, amount: i64, row_index: usize) -> String {
    let key = format!("{date}|{payee}|{amount}|{row_index}");
    let mut hex = to_hex(&sha256_bytes(key.as_bytes()));
    hex.truncate(IMPORTED_ID_LEN);
    hex
}
