//! Character encoding detection and transcoding.
//!
//! Fetched pages arrive as bytes. The charset is taken from a byte order
//! mark or a `<meta>` declaration and the page is decoded to UTF-8 before
//! extraction.

use encoding_rs::{Encoding, UTF_8};

use crate::patterns::CHARSET_META;

/// Number of leading bytes searched for a charset declaration.
const SNIFF_LEN: usize = 1024;

/// Detect character encoding from HTML bytes.
///
/// Looks for, in order:
/// 1. A byte order mark
/// 2. `<meta charset="...">` or `<meta http-equiv="Content-Type" content="...; charset=...">`
/// 3. Defaults to UTF-8
#[must_use]
pub fn detect_encoding(html: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(html) {
        return encoding;
    }

    let head = String::from_utf8_lossy(&html[..html.len().min(SNIFF_LEN)]);
    declared_charset(&head)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8)
}

fn declared_charset(head: &str) -> Option<String> {
    CHARSET_META
        .captures(head)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Transcode HTML bytes to a UTF-8 string.
///
/// Invalid sequences are replaced with U+FFFD rather than failing.
///
/// # Examples
///
/// ```
/// use rs_pagesift::encoding::transcode_to_utf8;
///
/// let html = b"<html><body>Hello, World!</body></html>";
/// assert!(transcode_to_utf8(html).contains("Hello, World!"));
/// ```
#[must_use]
pub fn transcode_to_utf8(html: &[u8]) -> String {
    let encoding = detect_encoding(html);
    // decode() also strips a matching BOM
    let (decoded, _, _) = encoding.decode(html);
    decoded.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_utf8_from_meta_charset() {
        let html = br#"<html><head><meta charset="utf-8"></head><body>Test</body></html>"#;
        assert_eq!(detect_encoding(html), UTF_8);
    }

    #[test]
    fn test_detect_windows1252_from_latin1_label() {
        let html = br#"<html><head><meta charset="ISO-8859-1"></head><body>Test</body></html>"#;
        // encoding_rs maps ISO-8859-1 to windows-1252 per WHATWG
        assert_eq!(detect_encoding(html).name(), "windows-1252");
    }

    #[test]
    fn test_detect_charset_from_content_type() {
        let html = br#"<meta http-equiv="Content-Type" content="text/html; charset=Shift_JIS">"#;
        assert_eq!(detect_encoding(html).name(), "Shift_JIS");
    }

    #[test]
    fn test_bom_wins_over_meta() {
        let mut html = vec![0xFE, 0xFF];
        html.extend_from_slice(br#"<meta charset="windows-1252">"#);
        assert_eq!(detect_encoding(&html).name(), "UTF-16BE");
    }

    #[test]
    fn test_unknown_label_defaults_to_utf8() {
        assert_eq!(detect_encoding(br#"<meta charset="klingon">"#), UTF_8);
        assert_eq!(detect_encoding(b"<p>plain</p>"), UTF_8);
    }

    #[test]
    fn test_transcode_latin1_to_utf8() {
        let html = b"<html><head><meta charset=\"ISO-8859-1\"></head><body>Caf\xE9</body></html>";
        assert!(transcode_to_utf8(html).contains("Café"));
    }

    #[test]
    fn test_transcode_strips_utf8_bom() {
        let html = b"\xEF\xBB\xBF<p>x</p>";
        assert_eq!(transcode_to_utf8(html), "<p>x</p>");
    }

    #[test]
    fn test_invalid_bytes_are_replaced() {
        let result = transcode_to_utf8(b"<body>Test \xFF\xFE Invalid</body>");
        assert!(result.contains("Test"));
        assert!(result.contains('\u{FFFD}'));
    }
}
