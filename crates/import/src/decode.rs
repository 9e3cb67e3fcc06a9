use encoding_rs::Encoding;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Unknown encoding: {0}")]
    UnknownEncoding(String),
    #[error("Decoder failed: {0}")]
    Failed(String),
}

/// Abstraction over a character-set decoder.
/// Implementations turn raw file bytes in the named encoding into text,
/// dropping any byte-order mark.
pub trait Decoder: Send + Sync {
    fn decode(&self, bytes: &[u8], encoding: &str) -> Result<String, DecodeError>;
}

// ── encoding_rs backend (default) ─────────────────────────────────────────────

/// Decodes via the WHATWG encoding labels known to `encoding_rs`.
///
/// A UTF-8 or UTF-16 byte-order mark overrides the requested encoding.
/// Malformed sequences become U+FFFD instead of failing the import.
#[derive(Debug, Default, Clone, Copy)]
pub struct EncodingRsDecoder;

impl Decoder for EncodingRsDecoder {
    fn decode(&self, bytes: &[u8], encoding: &str) -> Result<String, DecodeError> {
        let label = encoding.trim();
        let encoding = Encoding::for_label(label.as_bytes())
            .ok_or_else(|| DecodeError::UnknownEncoding(label.to_string()))?;
        let (text, used, had_errors) = encoding.decode(bytes);
        if had_errors {
            tracing::warn!("Input contained bytes invalid in {}; replaced", used.name());
        }
        Ok(text.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin1_umlauts() {
        // "Begünstigter" with ü as 0xFC
        let bytes = b"Beg\xfcnstigter";
        let text = EncodingRsDecoder.decode(bytes, "ISO-8859-1").unwrap();
        assert_eq!(text, "Begünstigter");
    }

    #[test]
    fn utf8_bom_is_stripped_and_wins() {
        let bytes = "\u{feff}Empfänger".as_bytes();
        let text = EncodingRsDecoder.decode(bytes, "iso-8859-1").unwrap();
        assert_eq!(text, "Empfänger");
    }

    #[test]
    fn utf8_without_bom() {
        let text = EncodingRsDecoder.decode("Betrag €".as_bytes(), "utf-8").unwrap();
        assert_eq!(text, "Betrag €");
    }

    #[test]
    fn unknown_label() {
        assert_eq!(
            EncodingRsDecoder.decode(b"x", "klingon"),
            Err(DecodeError::UnknownEncoding("klingon".to_string()))
        );
    }
}
