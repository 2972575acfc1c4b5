//! Whitespace handling for text reconstruction and alignment.
//!
//! The boundary oracle works on running text, so the token stream is joined
//! back into one string with [`reconstruct_text`]. Alignment between that
//! text and the token stream ignores whitespace entirely: [`alignment_key`]
//! strips it and folds case, so a sentence from the oracle and the forms
//! accumulated for it compare equal regardless of how the oracle spaced or
//! trimmed its output.
//!
//! # Examples
//!
//! ```rust
//! use cleaner::alignment_key;
//!
//! assert_eq!(alignment_key("They went  home."), "theywenthome.");
//! assert_eq!(alignment_key("home . The"), alignment_key("home.The"));
//! ```

use crate::record::TokenRecord;

/// Lower-cased text with all whitespace removed.
///
/// Both sides of every alignment check go through this function, so
/// case-folding quirks (`ß`, final sigma) apply identically to each.
pub fn alignment_key(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Joins record forms with single spaces, skipping boundary sentinels.
///
/// ```rust
/// use cleaner::{reconstruct_text, TokenRecord};
///
/// let records = vec![
///     TokenRecord::new("The", "the", "at"),
///     TokenRecord::new("dog", "dog", "nn1"),
///     TokenRecord::boundary(),
/// ];
/// assert_eq!(reconstruct_text(&records), "The dog");
/// ```
pub fn reconstruct_text(records: &[TokenRecord]) -> String {
    let capacity = records.iter().map(|r| r.form.len() + 1).sum();
    let mut text = String::with_capacity(capacity);
    for record in records.iter().filter(|r| !r.is_boundary()) {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(&record.form);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_drops_every_kind_of_whitespace() {
        assert_eq!(alignment_key(" a\tb\nc\u{a0}d "), "abcd");
    }

    #[test]
    fn key_folds_case() {
        assert_eq!(alignment_key("ÉCOLE Dog"), "écoledog");
    }

    #[test]
    fn empty_records_give_empty_text() {
        assert_eq!(reconstruct_text(&[]), "");
    }
}
