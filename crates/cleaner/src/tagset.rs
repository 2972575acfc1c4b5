//! Penn Treebank → CLAWS7-style tag mapping.
//!
//! The external tagger speaks Penn Treebank; the corpus speaks a CLAWS7
//! derivative. [`TagMapper`] translates between the two with a fixed table.
//! Lookups are case-insensitive, output is always lower-cased, and tags
//! missing from the table pass through unchanged apart from casing.

use crate::annotator::CoarsePos;

/// Penn Treebank tag → CLAWS7 tag. `PRP` and `WP` have no single CLAWS7
/// equivalent and map onto the closest general tag; `Y` is the corpus's
/// catch-all for punctuation and symbols.
const PENN_TO_CLAWS7: &[(&str, &str)] = &[
    ("CC", "CC"),
    ("CD", "MC"),
    ("DT", "DD"),
    ("EX", "EX"),
    ("FW", "FW"),
    ("IN", "II"),
    ("JJ", "JJ"),
    ("JJR", "JJR"),
    ("JJS", "JJT"),
    ("LS", "MC"),
    ("MD", "VM"),
    ("NN", "NN1"),
    ("NNS", "NN2"),
    ("NNP", "NP1"),
    ("NNPS", "NP2"),
    ("PDT", "DB"),
    ("POS", "GE"),
    ("PRP", "PRP"),
    ("PRP$", "APPGE"),
    ("RB", "RR"),
    ("RBR", "RRR"),
    ("RBS", "RRT"),
    ("RP", "RP"),
    ("SYM", "Y"),
    ("TO", "TO"),
    ("UH", "UH"),
    ("VB", "VV0"),
    ("VBD", "VVD"),
    ("VBG", "VVG"),
    ("VBN", "VVN"),
    ("VBP", "VV0"),
    ("VBZ", "VVZ"),
    ("WDT", "DDQ"),
    ("WP", "PNQ"),
    ("WP$", "PNQ"),
    ("WRB", "RRQ"),
    ("$", "Y"),
    ("#", "Y"),
    ("\"", "Y"),
    ("``", "Y"),
    ("(", "Y"),
    (")", "Y"),
    (",", "Y"),
    (".", "Y"),
    (":", "Y"),
    ("''", "Y"),
];

/// Tag used when the tagger returns an empty tag.
const EMPTY_TAG_FALLBACK: &str = "NN";

/// Stateless Penn → CLAWS7 translator.
#[derive(Debug, Clone, Copy, Default)]
pub struct TagMapper;

impl TagMapper {
    /// Maps a Penn tag to its lower-cased CLAWS7 counterpart.
    pub fn map(&self, penn_tag: &str) -> String {
        let upper = if penn_tag.trim().is_empty() {
            EMPTY_TAG_FALLBACK.to_string()
        } else {
            penn_tag.to_uppercase()
        };
        PENN_TO_CLAWS7
            .iter()
            .find(|(penn, _)| *penn == upper)
            .map(|(_, claws)| claws.to_lowercase())
            .unwrap_or_else(|| penn_tag.to_lowercase())
    }

    /// Coarse category handed to the lemmatizer. Unknown tags default to
    /// [`CoarsePos::Noun`].
    pub fn coarse(&self, penn_tag: &str) -> CoarsePos {
        let tag = penn_tag.to_uppercase();
        if tag.starts_with('J') || tag == "PDT" || tag == "RP" {
            CoarsePos::Adj
        } else if tag.starts_with('V') {
            CoarsePos::Verb
        } else if tag.starts_with('N') {
            CoarsePos::Noun
        } else if tag.starts_with('R') || tag == "IN" || tag == "EX" {
            CoarsePos::Adv
        } else {
            CoarsePos::Noun
        }
    }

    /// `<claws>_<suffix>`, the tag format of re-derived records.
    pub fn recovered_tag(&self, penn_tag: &str, suffix: &str) -> String {
        format!("{}_{}", self.map(penn_tag), suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_case_insensitively_to_lowercase() {
        let mapper = TagMapper;
        assert_eq!(mapper.map("NN"), "nn1");
        assert_eq!(mapper.map("nns"), "nn2");
        assert_eq!(mapper.map("JJS"), "jjt");
        assert_eq!(mapper.map("PRP$"), "appge");
        assert_eq!(mapper.map("."), "y");
    }

    #[test]
    fn unmapped_tags_pass_through_lowercased() {
        let mapper = TagMapper;
        assert_eq!(mapper.map("NN1"), "nn1");
        assert_eq!(mapper.map("XYZ"), "xyz");
    }

    #[test]
    fn empty_tag_is_treated_as_noun() {
        assert_eq!(TagMapper.map(""), "nn1");
    }

    #[test]
    fn coarse_categories() {
        let mapper = TagMapper;
        assert_eq!(mapper.coarse("JJR"), CoarsePos::Adj);
        assert_eq!(mapper.coarse("RP"), CoarsePos::Adj);
        assert_eq!(mapper.coarse("VBD"), CoarsePos::Verb);
        assert_eq!(mapper.coarse("NNS"), CoarsePos::Noun);
        assert_eq!(mapper.coarse("IN"), CoarsePos::Adv);
        assert_eq!(mapper.coarse("DT"), CoarsePos::Noun);
    }

    #[test]
    fn recovered_tag_format() {
        assert_eq!(TagMapper.recovered_tag("VBD", "mal"), "vvd_mal");
    }
}
