//! Byte decoding for fetched documents.
//!
//! Pages arrive as bytes with, at best, a hint about their charset. The
//! decode order is byte-order mark, transport-declared charset, charset
//! declared in the markup itself, then UTF-8. Undecodable sequences
//! become replacement characters rather than errors.

use encoding_rs::{Encoding, UTF_8};

use crate::metadata::encoding_from_content;

/// Leading bytes scanned for an in-markup charset declaration.
const SNIFF_WINDOW: usize = 4096;

/// Decode raw page bytes into UTF-8 markup.
///
/// Returns the decoded string and the name of the encoding actually
/// used, which callers surface as the page's detected encoding.
#[must_use]
pub fn decode_html(bytes: &[u8], declared: Option<&str>) -> (String, &'static str) {
    let encoding = sniff_encoding(bytes, declared);
    let (decoded, used, _had_errors) = encoding.decode(bytes);
    (decoded.into_owned(), used.name())
}

fn sniff_encoding(bytes: &[u8], declared: Option<&str>) -> &'static Encoding {
    if let Some((encoding, _bom_length)) = Encoding::for_bom(bytes) {
        return encoding;
    }
    if let Some(encoding) = declared.and_then(|label| Encoding::for_label(label.as_bytes())) {
        return encoding;
    }
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(SNIFF_WINDOW)]);
    if let Some(label) = encoding_from_content(&head) {
        if let Some(encoding) = Encoding::for_label(label.as_bytes()) {
            return encoding;
        }
    }
    UTF_8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_without_declarations() {
        let (text, used) = decode_html("<p>Hello</p>".as_bytes(), None);
        assert_eq!(text, "<p>Hello</p>");
        assert_eq!(used, "UTF-8");
    }

    #[test]
    fn transport_charset_is_honored() {
        let bytes = b"<html><body>Caf\xE9</body></html>";
        let (text, used) = decode_html(bytes, Some("ISO-8859-1"));
        assert!(text.contains("Caf\u{e9}"));
        // WHATWG folds latin-1 into windows-1252
        assert_eq!(used, "windows-1252");
    }

    #[test]
    fn meta_charset_in_markup_is_sniffed() {
        let bytes = b"<html><head><meta charset=\"windows-1252\"></head><body>\x93quoted\x94</body></html>";
        let (text, _) = decode_html(bytes, None);
        assert!(text.contains("\u{201C}quoted\u{201D}"));
    }

    #[test]
    fn bom_wins_over_declarations() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("<p>bom</p>".as_bytes());
        let (text, used) = decode_html(&bytes, Some("ISO-8859-1"));
        assert!(text.contains("<p>bom</p>"));
        assert_eq!(used, "UTF-8");
    }

    #[test]
    fn invalid_sequences_become_replacements() {
        let bytes = b"<p>ok \xFF\xFE still ok</p>";
        let (text, _) = decode_html(bytes, None);
        assert!(text.contains("ok"));
        assert!(text.contains("still ok"));
    }
}
