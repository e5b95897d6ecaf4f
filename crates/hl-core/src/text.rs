//! Best-effort text decoding and line splitting for exported files.

use std::sync::LazyLock;

use regex::Regex;

/// Every line boundary recognised in exported text: CRLF, LF, a lone CR, the
/// vertical tab, form feed, the file/group/record separators, NEL and the
/// Unicode line and paragraph separators.
static LINE_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\r\n|[\n\r\x0B\x0C\x1C-\x1E\x{85}\x{2028}\x{2029}]")
        .expect("valid line break regex")
});

/// Decodes bytes as UTF-8, dropping invalid byte sequences instead of failing.
///
/// Exports from payroll systems and calendar tools are not always clean UTF-8;
/// a stray Latin-1 byte must not cost the whole file.
pub fn decode_lossy(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}

/// Splits text into lines on any recognised line boundary.
///
/// A trailing boundary does not produce a final empty line. Paged exports put a
/// form feed before the first line of each page; it ends the previous line
/// here instead of prefixing the next one.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = LINE_BREAK_RE.split(text).collect();
    if lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_utf8_passes_through() {
        assert_eq!(decode_lossy("Año Nuevo".as_bytes()), "Año Nuevo");
    }

    #[test]
    fn invalid_bytes_are_dropped() {
        // 0xF1 is a Latin-1 "ñ" and not valid UTF-8 on its own.
        let bytes = b"A\xF1o Nuevo\xFF";
        assert_eq!(decode_lossy(bytes), "Ao Nuevo");
    }

    #[test]
    fn split_lines_handles_every_boundary() {
        assert_eq!(split_lines("a\r\nb\nc\rd"), ["a", "b", "c", "d"]);
        assert_eq!(split_lines("a\x0cb\x0bc"), ["a", "b", "c"]);
        assert_eq!(split_lines("a\x1cb\x1dc\x1ed"), ["a", "b", "c", "d"]);
        assert_eq!(split_lines("a\u{85}b\u{2028}c\u{2029}d"), ["a", "b", "c", "d"]);
    }

    #[test]
    fn split_lines_drops_only_the_trailing_boundary() {
        assert_eq!(split_lines("a\n"), ["a"]);
        assert_eq!(split_lines("a\n\nb\n"), ["a", "", "b"]);
        assert_eq!(split_lines("a\r\n\r\n"), ["a", ""]);
        assert!(split_lines("").is_empty());
    }
}
