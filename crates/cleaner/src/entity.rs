//! HTML entity decoding for token forms.
//!
//! The upstream export escapes some characters as HTML entities
//! (`&amp;`, `&#233;`). Known named entities and every valid numeric
//! reference are decoded; anything else is left untouched.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[A-Za-z][A-Za-z0-9]*);")
        .expect("entity pattern is a valid regex")
});

/// Same trigger the corpus exports use: a named or decimal reference.
static DETECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&\w+;|&#[0-9]+;").expect("entity detection pattern is a valid regex"));

const NAMED: &[(&str, char)] = &[
    ("amp", '&'),
    ("lt", '<'),
    ("gt", '>'),
    ("quot", '"'),
    ("apos", '\''),
    ("nbsp", '\u{a0}'),
    ("iexcl", '¡'),
    ("cent", '¢'),
    ("pound", '£'),
    ("yen", '¥'),
    ("sect", '§'),
    ("copy", '©'),
    ("laquo", '«'),
    ("raquo", '»'),
    ("reg", '®'),
    ("deg", '°'),
    ("plusmn", '±'),
    ("para", '¶'),
    ("middot", '·'),
    ("frac14", '¼'),
    ("frac12", '½'),
    ("frac34", '¾'),
    ("iquest", '¿'),
    ("times", '×'),
    ("divide", '÷'),
    ("agrave", 'à'),
    ("aacute", 'á'),
    ("acirc", 'â'),
    ("auml", 'ä'),
    ("ccedil", 'ç'),
    ("egrave", 'è'),
    ("eacute", 'é'),
    ("ecirc", 'ê'),
    ("euml", 'ë'),
    ("iacute", 'í'),
    ("icirc", 'î'),
    ("iuml", 'ï'),
    ("ntilde", 'ñ'),
    ("oacute", 'ó'),
    ("ocirc", 'ô'),
    ("ouml", 'ö'),
    ("uacute", 'ú'),
    ("ucirc", 'û'),
    ("uuml", 'ü'),
    ("Eacute", 'É'),
    ("szlig", 'ß'),
    ("ndash", '–'),
    ("mdash", '—'),
    ("lsquo", '‘'),
    ("rsquo", '’'),
    ("ldquo", '“'),
    ("rdquo", '”'),
    ("hellip", '…'),
    ("bull", '•'),
    ("dagger", '†'),
    ("trade", '™'),
];

/// `true` when `form` contains something that looks like an entity.
pub fn contains_entity(form: &str) -> bool {
    DETECT.is_match(form)
}

/// Decodes the entities in `form`, borrowing when nothing changes.
pub fn decode_entities(form: &str) -> Cow<'_, str> {
    ENTITY.replace_all(form, |caps: &Captures<'_>| {
        let body = &caps[1];
        match decode_one(body) {
            Some(ch) => ch.to_string(),
            None => caps[0].to_string(),
        }
    })
}

fn decode_one(body: &str) -> Option<char> {
    if let Some(numeric) = body.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }
    NAMED
        .iter()
        .find(|(name, _)| *name == body)
        .or_else(|| NAMED.iter().find(|(name, _)| name.eq_ignore_ascii_case(body)))
        .map(|(_, ch)| *ch)
}
