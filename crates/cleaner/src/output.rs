//! Serialization of cleaned documents.
//!
//! Two formats:
//!
//! - **Tagged**: the header line, then one `form\tlemma\ttag` line per
//!   record. Lemma and tag are lower-cased on the way out; the form keeps its
//!   case.
//! - **Plain text**: the first header field, a blank line, then the forms
//!   joined by single spaces. Boundary sentinels, the skip token and any form
//!   containing `<` (HTML leftovers) are left out.

use std::io::{self, Write};

use crate::record::TokenRecord;

/// Renders the tagged format into a string.
pub fn render_tagged(header: &str, records: &[TokenRecord]) -> String {
    let mut out = String::with_capacity(header.len() + records.len() * 24);
    out.push_str(header);
    out.push('\n');
    for record in records {
        out.push_str(&tagged_line(record));
        out.push('\n');
    }
    out
}

/// Streams the tagged format into `writer`.
pub fn write_tagged<W: Write>(
    writer: &mut W,
    header: &str,
    records: &[TokenRecord],
) -> io::Result<()> {
    writeln!(writer, "{header}")?;
    for record in records {
        writeln!(writer, "{}", tagged_line(record))?;
    }
    Ok(())
}

fn tagged_line(record: &TokenRecord) -> String {
    format!(
        "{}\t{}\t{}",
        record.form,
        record.lemma.to_lowercase(),
        record.tag.to_lowercase()
    )
}

/// Renders the plain-text format from in-memory records.
pub fn render_plain_text(header: &str, records: &[TokenRecord], skip_token: &str) -> String {
    plain_text(header, records.iter().map(|r| r.form.as_str()), skip_token)
}

/// Derives the plain-text format from an already cleaned tagged file.
///
/// The first line is the header; every other line contributes its first
/// column.
pub fn plain_text_from_tagged(tagged: &str, skip_token: &str) -> String {
    let mut lines = tagged.lines();
    let header = lines.next().unwrap_or_default();
    let forms = lines.filter_map(|line| line.split('\t').next());
    plain_text(header, forms, skip_token)
}

fn plain_text<'a>(header: &str, forms: impl Iterator<Item = &'a str>, skip_token: &str) -> String {
    let title = header.split('\t').next().unwrap_or_default();
    let body = forms
        .filter(|form| !form.is_empty())
        .filter(|form| !form.eq_ignore_ascii_case(skip_token) && !form.contains('<'))
        .collect::<Vec<_>>()
        .join(" ");
    format!("{title}\n\n{body}")
}
