//! File-name normalization.
//!
//! The legacy upload client transmits file names as raw UTF-8 bytes that the
//! transport decodes as latin-1, so a name like "Công văn.pdf" arrives as
//! mojibake. Normalization re-encodes the latin-1 code points back to bytes
//! and re-reads them as UTF-8 when that produces a valid string.

use encoding_rs::mem::{encode_latin1_lossy, is_str_latin1};

/// Decode a file name from its legacy transport encoding into canonical UTF-8.
///
/// Idempotent: applying it to an already-canonical name returns the name
/// unchanged, because a repaired Vietnamese name contains code points above
/// U+00FF, and a genuinely latin-1 name does not re-decode as UTF-8.
pub fn normalize_file_name(raw: &str) -> String {
    if !is_str_latin1(raw) {
        return raw.to_string();
    }

    let bytes = encode_latin1_lossy(raw);
    match std::str::from_utf8(&bytes) {
        Ok(decoded) if decoded != raw => decoded.to_string(),
        _ => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // "Công văn số 123.pdf" after its UTF-8 bytes were decoded as latin-1.
    fn mojibake() -> String {
        "Công văn số 123.pdf"
            .bytes()
            .map(|b| char::from(b))
            .collect()
    }

    #[test]
    fn test_repairs_legacy_encoded_name() {
        assert_eq!(normalize_file_name(&mojibake()), "Công văn số 123.pdf");
    }

    #[test]
    fn test_ascii_name_unchanged() {
        assert_eq!(normalize_file_name("report.pdf"), "report.pdf");
    }

    #[test]
    fn test_idempotent() {
        let once = normalize_file_name(&mojibake());
        let twice = normalize_file_name(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_canonical_vietnamese_name_unchanged() {
        // Already contains code points above U+00FF, so no repair is attempted.
        assert_eq!(normalize_file_name("Di tích lịch sử.docx"), "Di tích lịch sử.docx");
    }

    #[test]
    fn test_genuine_latin1_name_kept() {
        // Valid latin-1 text that is not valid UTF-8 when re-encoded.
        assert_eq!(normalize_file_name("Caf\u{00E9}.pdf"), "Caf\u{00E9}.pdf");
    }
}
