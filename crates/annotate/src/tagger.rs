//! Lexicon and suffix-rule Penn Treebank tagger.
//!
//! Good enough to re-derive tags for the handful of tokens the cleaner has
//! to repair. Closed-class words and common irregular verbs come from a
//! fixed lexicon; open-class words are guessed from their suffix and the
//! previous tag.

use fxhash::FxHashMap;
use once_cell::sync::Lazy;
use unicode_categories::UnicodeCategories;

use cleaner::{AnnotatorError, SentenceTagger, TaggedToken};

const CLOSED_CLASS: &[(&str, &str)] = &[
    // determiners
    ("the", "DT"),
    ("a", "DT"),
    ("an", "DT"),
    ("this", "DT"),
    ("that", "DT"),
    ("these", "DT"),
    ("those", "DT"),
    ("each", "DT"),
    ("every", "DT"),
    ("some", "DT"),
    ("any", "DT"),
    ("no", "DT"),
    ("another", "DT"),
    ("either", "DT"),
    ("neither", "DT"),
    ("all", "DT"),
    ("both", "DT"),
    // prepositions and subordinators
    ("of", "IN"),
    ("in", "IN"),
    ("on", "IN"),
    ("at", "IN"),
    ("by", "IN"),
    ("for", "IN"),
    ("with", "IN"),
    ("from", "IN"),
    ("into", "IN"),
    ("onto", "IN"),
    ("upon", "IN"),
    ("about", "IN"),
    ("above", "IN"),
    ("across", "IN"),
    ("after", "IN"),
    ("against", "IN"),
    ("along", "IN"),
    ("among", "IN"),
    ("around", "IN"),
    ("before", "IN"),
    ("behind", "IN"),
    ("below", "IN"),
    ("beneath", "IN"),
    ("beside", "IN"),
    ("between", "IN"),
    ("beyond", "IN"),
    ("during", "IN"),
    ("except", "IN"),
    ("inside", "IN"),
    ("near", "IN"),
    ("off", "IN"),
    ("outside", "IN"),
    ("over", "IN"),
    ("since", "IN"),
    ("through", "IN"),
    ("toward", "IN"),
    ("towards", "IN"),
    ("under", "IN"),
    ("until", "IN"),
    ("within", "IN"),
    ("without", "IN"),
    ("like", "IN"),
    ("than", "IN"),
    ("because", "IN"),
    ("if", "IN"),
    ("though", "IN"),
    ("although", "IN"),
    ("while", "IN"),
    ("whether", "IN"),
    ("unless", "IN"),
    ("as", "IN"),
    ("to", "TO"),
    // conjunctions
    ("and", "CC"),
    ("or", "CC"),
    ("but", "CC"),
    ("nor", "CC"),
    ("&", "CC"),
    // pronouns
    ("i", "PRP"),
    ("me", "PRP"),
    ("you", "PRP"),
    ("he", "PRP"),
    ("him", "PRP"),
    ("she", "PRP"),
    ("her", "PRP"),
    ("it", "PRP"),
    ("we", "PRP"),
    ("us", "PRP"),
    ("they", "PRP"),
    ("them", "PRP"),
    ("myself", "PRP"),
    ("yourself", "PRP"),
    ("himself", "PRP"),
    ("herself", "PRP"),
    ("itself", "PRP"),
    ("ourselves", "PRP"),
    ("themselves", "PRP"),
    ("mine", "PRP"),
    ("my", "PRP$"),
    ("your", "PRP$"),
    ("his", "PRP$"),
    ("its", "PRP$"),
    ("our", "PRP$"),
    ("their", "PRP$"),
    ("who", "WP"),
    ("whom", "WP"),
    ("what", "WP"),
    ("whoever", "WP"),
    ("whatever", "WP"),
    ("whose", "WP$"),
    ("which", "WDT"),
    ("whichever", "WDT"),
    ("where", "WRB"),
    ("when", "WRB"),
    ("why", "WRB"),
    ("how", "WRB"),
    ("whenever", "WRB"),
    ("wherever", "WRB"),
    // modals and auxiliaries
    ("can", "MD"),
    ("could", "MD"),
    ("will", "MD"),
    ("would", "MD"),
    ("shall", "MD"),
    ("should", "MD"),
    ("may", "MD"),
    ("might", "MD"),
    ("must", "MD"),
    ("ought", "MD"),
    ("'ll", "MD"),
    ("'d", "MD"),
    ("be", "VB"),
    ("am", "VBP"),
    ("are", "VBP"),
    ("'re", "VBP"),
    ("'m", "VBP"),
    ("is", "VBZ"),
    ("was", "VBD"),
    ("were", "VBD"),
    ("been", "VBN"),
    ("being", "VBG"),
    ("have", "VBP"),
    ("'ve", "VBP"),
    ("has", "VBZ"),
    ("had", "VBD"),
    ("having", "VBG"),
    ("do", "VBP"),
    ("does", "VBZ"),
    ("did", "VBD"),
    ("done", "VBN"),
    ("'s", "POS"),
    ("n't", "RB"),
    ("not", "RB"),
    // irregular past tense
    ("went", "VBD"),
    ("saw", "VBD"),
    ("came", "VBD"),
    ("took", "VBD"),
    ("gave", "VBD"),
    ("made", "VBD"),
    ("said", "VBD"),
    ("got", "VBD"),
    ("knew", "VBD"),
    ("thought", "VBD"),
    ("told", "VBD"),
    ("found", "VBD"),
    ("left", "VBD"),
    ("felt", "VBD"),
    ("became", "VBD"),
    ("began", "VBD"),
    ("ran", "VBD"),
    ("sat", "VBD"),
    ("stood", "VBD"),
    ("wrote", "VBD"),
    ("brought", "VBD"),
    ("bought", "VBD"),
    ("caught", "VBD"),
    ("taught", "VBD"),
    ("kept", "VBD"),
    ("held", "VBD"),
    ("meant", "VBD"),
    ("met", "VBD"),
    ("paid", "VBD"),
    ("sold", "VBD"),
    ("sent", "VBD"),
    ("spent", "VBD"),
    ("built", "VBD"),
    ("lost", "VBD"),
    ("led", "VBD"),
    ("spoke", "VBD"),
    ("broke", "VBD"),
    ("chose", "VBD"),
    ("ate", "VBD"),
    ("fell", "VBD"),
    ("drove", "VBD"),
    ("rode", "VBD"),
    ("rose", "VBD"),
    ("grew", "VBD"),
    ("threw", "VBD"),
    ("flew", "VBD"),
    ("drew", "VBD"),
    ("wore", "VBD"),
    ("sang", "VBD"),
    ("drank", "VBD"),
    ("won", "VBD"),
    ("heard", "VBD"),
    ("slept", "VBD"),
    ("woke", "VBD"),
    ("fought", "VBD"),
    ("understood", "VBD"),
    // irregular past participles
    ("gone", "VBN"),
    ("seen", "VBN"),
    ("taken", "VBN"),
    ("given", "VBN"),
    ("known", "VBN"),
    ("written", "VBN"),
    ("spoken", "VBN"),
    ("broken", "VBN"),
    ("chosen", "VBN"),
    ("eaten", "VBN"),
    ("fallen", "VBN"),
    ("driven", "VBN"),
    ("grown", "VBN"),
    ("thrown", "VBN"),
    ("drawn", "VBN"),
    ("forgotten", "VBN"),
    ("hidden", "VBN"),
    ("begun", "VBN"),
    // adverbs
    ("never", "RB"),
    ("always", "RB"),
    ("often", "RB"),
    ("very", "RB"),
    ("too", "RB"),
    ("also", "RB"),
    ("just", "RB"),
    ("still", "RB"),
    ("already", "RB"),
    ("even", "RB"),
    ("only", "RB"),
    ("ever", "RB"),
    ("again", "RB"),
    ("here", "RB"),
    ("now", "RB"),
    ("then", "RB"),
    ("soon", "RB"),
    ("perhaps", "RB"),
    ("quite", "RB"),
    ("rather", "RB"),
    ("almost", "RB"),
    ("so", "RB"),
    ("there", "RB"),
    // adjectives
    ("good", "JJ"),
    ("bad", "JJ"),
    ("new", "JJ"),
    ("old", "JJ"),
    ("great", "JJ"),
    ("little", "JJ"),
    ("big", "JJ"),
    ("small", "JJ"),
    ("long", "JJ"),
    ("high", "JJ"),
    ("other", "JJ"),
    ("many", "JJ"),
    ("few", "JJ"),
    ("much", "JJ"),
    ("own", "JJ"),
    ("same", "JJ"),
    ("last", "JJ"),
    ("first", "JJ"),
    ("next", "JJ"),
    ("better", "JJR"),
    ("worse", "JJR"),
    ("more", "JJR"),
    ("less", "JJR"),
    ("best", "JJS"),
    ("worst", "JJS"),
    ("most", "JJS"),
    ("least", "JJS"),
    // numbers
    ("one", "CD"),
    ("two", "CD"),
    ("three", "CD"),
    ("four", "CD"),
    ("five", "CD"),
    ("six", "CD"),
    ("seven", "CD"),
    ("eight", "CD"),
    ("nine", "CD"),
    ("ten", "CD"),
    ("hundred", "CD"),
    ("thousand", "CD"),
    ("million", "CD"),
    // interjections
    ("yes", "UH"),
    ("oh", "UH"),
    ("ah", "UH"),
    ("hello", "UH"),
    ("ok", "UH"),
    ("okay", "UH"),
];

static LEXICON: Lazy<FxHashMap<&'static str, &'static str>> =
    Lazy::new(|| CLOSED_CLASS.iter().copied().collect());

const ADJECTIVE_SUFFIXES: &[&str] = &[
    "ous", "ful", "ive", "able", "ible", "less", "ish", "ical", "ary", "ic", "al",
];

const NOUN_SUFFIXES: &[&str] = &[
    "tion", "sion", "ment", "ness", "ity", "ship", "ance", "ence", "ism", "ist",
];

/// Forms of *have* and *be* that turn a following `-ed` word into a
/// participle.
const PERFECT_AUXILIARIES: &[&str] = &[
    "have", "has", "had", "having", "'ve", "be", "is", "am", "are", "was", "were", "been",
    "being", "'s", "'re", "'m",
];

/// Rule-based tagger. Optional entries take precedence over the built-in
/// lexicon.
#[derive(Debug, Clone, Default)]
pub struct LexiconTagger {
    overrides: FxHashMap<String, String>,
}

impl LexiconTagger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `(word, tag)` overrides; words are matched case-insensitively.
    pub fn with_entries<I, W, T>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (W, T)>,
        W: Into<String>,
        T: Into<String>,
    {
        self.overrides.extend(
            entries
                .into_iter()
                .map(|(w, t)| (w.into().to_lowercase(), t.into())),
        );
        self
    }

    /// Tags `tokens` left to right.
    pub fn tag_tokens(&self, tokens: &[String]) -> Vec<TaggedToken> {
        let mut tagged: Vec<TaggedToken> = Vec::with_capacity(tokens.len());
        for (index, token) in tokens.iter().enumerate() {
            let context = Context {
                index,
                prev_word: index.checked_sub(1).map(|p| tokens[p].to_lowercase()),
                prev_tag: tagged.last().map(|t| t.tag.as_str()),
                next_word: tokens.get(index + 1).map(|t| t.to_lowercase()),
            };
            let tag = self.tag_one(token, &context);
            tagged.push(TaggedToken::new(token.clone(), tag));
        }
        tagged
    }

    fn tag_one(&self, token: &str, ctx: &Context<'_>) -> String {
        let lower = token.to_lowercase();
        if let Some(tag) = self.overrides.get(&lower) {
            return tag.clone();
        }
        if !token.chars().any(char::is_alphanumeric) {
            return punctuation_tag(token).to_string();
        }
        if is_number(token) {
            return "CD".to_string();
        }
        if let Some(tag) = lexicon_tag(&lower, ctx) {
            return tag.to_string();
        }

        let capitalized = token.chars().next().is_some_and(char::is_uppercase);
        if capitalized && ctx.index > 0 && !ctx.prev_tag.is_some_and(opens_sentence) {
            return "NNP".to_string();
        }
        suffix_tag(&lower, ctx).to_string()
    }
}

impl SentenceTagger for LexiconTagger {
    fn tag(&self, tokens: &[String]) -> Result<Vec<TaggedToken>, AnnotatorError> {
        Ok(self.tag_tokens(tokens))
    }
}

struct Context<'a> {
    index: usize,
    prev_word: Option<String>,
    prev_tag: Option<&'a str>,
    next_word: Option<String>,
}

fn lexicon_tag(lower: &str, ctx: &Context<'_>) -> Option<&'static str> {
    let tag = *LEXICON.get(lower)?;
    let tag = match (lower, tag) {
        ("there", _) if ctx.next_word.as_deref().is_some_and(is_be_form) => "EX",
        ("'s", _) if ctx.prev_tag == Some("PRP") => "VBZ",
        _ => tag,
    };
    Some(tag)
}

fn suffix_tag(lower: &str, ctx: &Context<'_>) -> &'static str {
    let len = lower.chars().count();
    if matches!(ctx.prev_tag, Some("TO" | "MD")) {
        return "VB";
    }
    if lower.ends_with("ing") && len > 4 {
        return "VBG";
    }
    if lower.ends_with("ed") && len > 3 {
        let after_auxiliary = ctx
            .prev_word
            .as_deref()
            .is_some_and(|w| PERFECT_AUXILIARIES.contains(&w));
        return if after_auxiliary { "VBN" } else { "VBD" };
    }
    if lower.ends_with("ly") && len > 3 {
        return "RB";
    }
    if lower.ends_with("est") && len > 5 {
        return "JJS";
    }
    if lower.ends_with('s')
        && len > 3
        && !["ss", "us", "is"].iter().any(|end| lower.ends_with(end))
    {
        let after_subject = matches!(ctx.prev_tag, Some("PRP" | "NN" | "NNP"));
        return if after_subject { "VBZ" } else { "NNS" };
    }
    if NOUN_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
        return "NN";
    }
    if ADJECTIVE_SUFFIXES
        .iter()
        .any(|s| lower.ends_with(s) && len > s.len() + 2)
    {
        return "JJ";
    }
    "NN"
}

fn is_be_form(word: &str) -> bool {
    matches!(word, "is" | "are" | "was" | "were" | "'s" | "be" | "been")
}

/// Tags after which a capitalized word is read as a sentence opener.
fn opens_sentence(tag: &str) -> bool {
    matches!(tag, "." | "``" | ":" | "(")
}

fn is_number(token: &str) -> bool {
    token.chars().next().is_some_and(|c| c.is_ascii_digit())
        && token
            .trim_end_matches('s')
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '/' | '-' | ':'))
}

fn punctuation_tag(token: &str) -> &'static str {
    match token {
        "." | "!" | "?" | "?!" | "!!" => ".",
        "," => ",",
        ":" | ";" | "-" | "--" | "..." | "\u{2026}" | "\u{2013}" | "\u{2014}" => ":",
        "(" | "[" | "{" => "(",
        ")" | "]" | "}" => ")",
        "\u{201c}" | "\u{2018}" | "``" => "``",
        "\"" | "'" | "\u{201d}" | "\u{2019}" | "''" => "''",
        "$" | "\u{a3}" | "\u{20ac}" => "$",
        "#" => "#",
        _ if token.chars().all(|c| c.is_punctuation()) => ":",
        _ => "SYM",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(sentence: &str) -> Vec<String> {
        let tokens: Vec<String> = sentence.split_whitespace().map(str::to_string).collect();
        LexiconTagger::new()
            .tag_tokens(&tokens)
            .into_iter()
            .map(|t| t.tag)
            .collect()
    }

    #[test]
    fn closed_class_and_subject_agreement() {
        assert_eq!(tags("The dog barks ."), vec!["DT", "NN", "VBZ", "."]);
        assert_eq!(tags("They went home ."), vec!["PRP", "VBD", "NN", "."]);
    }

    #[test]
    fn participles_follow_auxiliaries() {
        assert_eq!(tags("He has walked quickly"), vec!["PRP", "VBZ", "VBN", "RB"]);
        assert_eq!(tags("She walked"), vec!["PRP", "VBD"]);
    }

    #[test]
    fn base_form_after_to_and_modals() {
        assert_eq!(tags("to run"), vec!["TO", "VB"]);
        assert_eq!(tags("We must leave"), vec!["PRP", "MD", "VB"]);
    }

    #[test]
    fn existential_there() {
        assert_eq!(tags("There is a problem"), vec!["EX", "VBZ", "DT", "NN"]);
        assert_eq!(tags("Go there"), vec!["NN", "RB"]);
    }

    #[test]
    fn capitalized_words_inside_a_sentence_are_proper_nouns() {
        assert_eq!(tags("John likes Mary"), vec!["NN", "VBZ", "NNP"]);
        assert_eq!(tags("Dogs bark"), vec!["NNS", "NN"]);
    }

    #[test]
    fn punctuation_numbers_and_symbols() {
        assert_eq!(
            tags("-- , 1920s \u{201c} ( % 3.5"),
            vec![":", ",", "CD", "``", "(", ":", "CD"]
        );
        assert_eq!(tags("+"), vec!["SYM"]);
    }

    #[test]
    fn suffixes_guess_open_classes() {
        assert_eq!(
            tags("the famous nation 's happiness"),
            vec!["DT", "JJ", "NN", "POS", "NN"]
        );
        assert_eq!(tags("running"), vec!["VBG"]);
    }

    #[test]
    fn overrides_win() {
        let tagger = LexiconTagger::new().with_entries([("Home", "RB")]);
        let out = tagger.tag_tokens(&["home".to_string()]);
        assert_eq!(out[0].tag, "RB");
    }

    #[test]
    fn output_mirrors_input_tokens() {
        let tokens: Vec<String> = ["Hello", "world", "!"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let out = LexiconTagger::new().tag(&tokens).unwrap();
        let words: Vec<&str> = out.iter().map(|t| t.token.as_str()).collect();
        assert_eq!(words, vec!["Hello", "world", "!"]);
        assert!(LexiconTagger::new().tag(&[]).unwrap().is_empty());
    }
}
