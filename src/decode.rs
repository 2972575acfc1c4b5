//! Byte decoding for corpus files.
//!
//! Corpus exports are mostly UTF-8, but older releases contain Windows-1252
//! files. Decoded text is NFC-normalized so composed and decomposed accents
//! compare equal downstream.

use std::str::Utf8Error;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// How input bytes are turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputEncoding {
    /// UTF-8, falling back to Windows-1252 when the bytes are not valid
    /// UTF-8.
    #[default]
    Auto,
    /// Strict UTF-8; invalid files are reported as failures.
    Utf8,
    /// Always Windows-1252.
    Windows1252,
}

/// Windows-1252 code points for bytes `0x80..=0x9F`. Unassigned bytes map to
/// the matching C1 control.
const CP1252_HIGH: [char; 32] = [
    '\u{20AC}', '\u{0081}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{008D}', '\u{017D}', '\u{008F}',
    '\u{0090}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{009D}', '\u{017E}', '\u{0178}',
];

/// Decodes `bytes` and NFC-normalizes the result. A leading UTF-8 byte order
/// mark is dropped.
pub fn decode_document(bytes: &[u8], encoding: InputEncoding) -> Result<String, Utf8Error> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let text = match encoding {
        InputEncoding::Utf8 => std::str::from_utf8(bytes)?.nfc().collect(),
        InputEncoding::Windows1252 => decode_windows_1252(bytes).nfc().collect(),
        InputEncoding::Auto => match std::str::from_utf8(bytes) {
            Ok(text) => text.nfc().collect(),
            Err(_) => decode_windows_1252(bytes).nfc().collect(),
        },
    };
    Ok(text)
}

fn decode_windows_1252(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| match b {
            0x80..=0x9F => CP1252_HIGH[usize::from(b - 0x80)],
            _ => char::from(b),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_is_normalized_to_nfc() {
        let decomposed = "Cafe\u{301}".as_bytes();
        let text = decode_document(decomposed, InputEncoding::Auto).unwrap();
        assert_eq!(text, "Caf\u{e9}");
    }

    #[test]
    fn invalid_utf8_falls_back_to_windows_1252() {
        let bytes = b"\x93quoted\x94 caf\xe9 \x80";
        let text = decode_document(bytes, InputEncoding::Auto).unwrap();
        assert_eq!(text, "\u{201c}quoted\u{201d} caf\u{e9} \u{20ac}");
    }

    #[test]
    fn strict_utf8_rejects_invalid_bytes() {
        assert!(decode_document(b"caf\xe9", InputEncoding::Utf8).is_err());
    }

    #[test]
    fn forced_windows_1252_ignores_valid_utf8() {
        let text = decode_document("\u{e9}".as_bytes(), InputEncoding::Windows1252).unwrap();
        assert_eq!(text, "\u{c3}\u{a9}");
    }

    #[test]
    fn byte_order_mark_is_dropped() {
        let text = decode_document(b"\xEF\xBB\xBF@@1\n", InputEncoding::Auto).unwrap();
        assert_eq!(text, "@@1\n");
    }
}
