//! Exception tables plus suffix detachment, in the spirit of WordNet's
//! morphy.
//!
//! Irregular forms are looked up first. Regular forms lose an inflectional
//! suffix; the stem is then undoubled (`stopped` → `stop`) or gets its `e`
//! back (`making` → `make`) by a small heuristic. Results are always lower
//! case.

use fxhash::FxHashMap;
use once_cell::sync::Lazy;

use cleaner::{AnnotatorError, CoarsePos, Lemmatizer};

const VERB_EXCEPTIONS: &[(&str, &str)] = &[
    ("is", "be"),
    ("am", "be"),
    ("are", "be"),
    ("was", "be"),
    ("were", "be"),
    ("been", "be"),
    ("being", "be"),
    ("'s", "be"),
    ("'m", "be"),
    ("'re", "be"),
    ("has", "have"),
    ("had", "have"),
    ("having", "have"),
    ("'ve", "have"),
    ("does", "do"),
    ("did", "do"),
    ("done", "do"),
    ("went", "go"),
    ("gone", "go"),
    ("goes", "go"),
    ("saw", "see"),
    ("seen", "see"),
    ("came", "come"),
    ("took", "take"),
    ("taken", "take"),
    ("gave", "give"),
    ("given", "give"),
    ("made", "make"),
    ("said", "say"),
    ("got", "get"),
    ("gotten", "get"),
    ("knew", "know"),
    ("known", "know"),
    ("thought", "think"),
    ("told", "tell"),
    ("found", "find"),
    ("left", "leave"),
    ("felt", "feel"),
    ("became", "become"),
    ("began", "begin"),
    ("begun", "begin"),
    ("ran", "run"),
    ("sat", "sit"),
    ("stood", "stand"),
    ("wrote", "write"),
    ("written", "write"),
    ("brought", "bring"),
    ("bought", "buy"),
    ("caught", "catch"),
    ("taught", "teach"),
    ("kept", "keep"),
    ("held", "hold"),
    ("meant", "mean"),
    ("met", "meet"),
    ("paid", "pay"),
    ("sold", "sell"),
    ("sent", "send"),
    ("spent", "spend"),
    ("built", "build"),
    ("lost", "lose"),
    ("led", "lead"),
    ("spoke", "speak"),
    ("spoken", "speak"),
    ("broke", "break"),
    ("broken", "break"),
    ("chose", "choose"),
    ("chosen", "choose"),
    ("ate", "eat"),
    ("eaten", "eat"),
    ("fell", "fall"),
    ("fallen", "fall"),
    ("drove", "drive"),
    ("driven", "drive"),
    ("rode", "ride"),
    ("ridden", "ride"),
    ("rose", "rise"),
    ("risen", "rise"),
    ("grew", "grow"),
    ("grown", "grow"),
    ("threw", "throw"),
    ("thrown", "throw"),
    ("flew", "fly"),
    ("flown", "fly"),
    ("drew", "draw"),
    ("drawn", "draw"),
    ("wore", "wear"),
    ("worn", "wear"),
    ("sang", "sing"),
    ("sung", "sing"),
    ("drank", "drink"),
    ("drunk", "drink"),
    ("won", "win"),
    ("heard", "hear"),
    ("slept", "sleep"),
    ("woke", "wake"),
    ("fought", "fight"),
    ("understood", "understand"),
    ("forgot", "forget"),
    ("forgotten", "forget"),
    ("hid", "hide"),
    ("hidden", "hide"),
    ("lay", "lie"),
    ("lain", "lie"),
    ("lying", "lie"),
    ("dying", "die"),
    ("tying", "tie"),
];

const NOUN_EXCEPTIONS: &[(&str, &str)] = &[
    ("men", "man"),
    ("women", "woman"),
    ("children", "child"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("geese", "goose"),
    ("mice", "mouse"),
    ("oxen", "ox"),
    ("lives", "life"),
    ("wives", "wife"),
    ("knives", "knife"),
    ("wolves", "wolf"),
    ("leaves", "leaf"),
    ("halves", "half"),
    ("selves", "self"),
    ("shelves", "shelf"),
    ("thieves", "thief"),
    ("loaves", "loaf"),
    ("news", "news"),
    ("series", "series"),
    ("species", "species"),
];

const ADJ_EXCEPTIONS: &[(&str, &str)] = &[
    ("better", "good"),
    ("best", "good"),
    ("worse", "bad"),
    ("worst", "bad"),
    ("further", "far"),
    ("farther", "far"),
    ("furthest", "far"),
    ("farthest", "far"),
    ("larger", "large"),
    ("largest", "large"),
    ("elder", "old"),
    ("eldest", "old"),
];

const ADV_EXCEPTIONS: &[(&str, &str)] = &[
    ("better", "well"),
    ("best", "well"),
    ("further", "far"),
    ("farther", "far"),
    ("harder", "hard"),
    ("hardest", "hard"),
];

/// Adjectives that end in `-er` without being comparatives.
const PLAIN_ER_ADJECTIVES: &[&str] = &[
    "other", "over", "under", "clever", "proper", "eager", "bitter", "tender", "sober", "silver",
    "super", "former", "latter", "upper", "inner", "outer", "utter", "slender", "sinister",
];

static EXCEPTIONS: Lazy<FxHashMap<(CoarsePos, &'static str), &'static str>> = Lazy::new(|| {
    let tables = [
        (CoarsePos::Verb, VERB_EXCEPTIONS),
        (CoarsePos::Noun, NOUN_EXCEPTIONS),
        (CoarsePos::Adj, ADJ_EXCEPTIONS),
        (CoarsePos::Adv, ADV_EXCEPTIONS),
    ];
    tables
        .into_iter()
        .flat_map(|(pos, table)| table.iter().map(move |&(form, lemma)| ((pos, form), lemma)))
        .collect()
});

/// Rule-based lemmatizer.
#[derive(Debug, Clone, Default)]
pub struct RuleLemmatizer {
    extra: FxHashMap<(CoarsePos, String), String>,
}

impl RuleLemmatizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds irregular forms for `pos`, consulted before the built-in tables.
    pub fn with_exceptions<I, F, L>(mut self, pos: CoarsePos, entries: I) -> Self
    where
        I: IntoIterator<Item = (F, L)>,
        F: Into<String>,
        L: Into<String>,
    {
        self.extra.extend(
            entries
                .into_iter()
                .map(|(form, lemma)| ((pos, form.into().to_lowercase()), lemma.into())),
        );
        self
    }

    /// Base form of `token` read as `pos`.
    pub fn lemma(&self, token: &str, pos: CoarsePos) -> String {
        let word = token.to_lowercase();
        if !word.chars().any(char::is_alphabetic) {
            return word;
        }
        if let Some(lemma) = self.extra.get(&(pos, word.clone())) {
            return lemma.clone();
        }
        if let Some(lemma) = EXCEPTIONS.get(&(pos, word.as_str())) {
            return (*lemma).to_string();
        }
        match pos {
            CoarsePos::Noun => noun_base(&word),
            CoarsePos::Verb => verb_base(&word),
            CoarsePos::Adj => adjective_base(&word),
            CoarsePos::Adv => word,
        }
    }
}

impl Lemmatizer for RuleLemmatizer {
    fn lemmatize(&self, token: &str, pos: CoarsePos) -> Result<String, AnnotatorError> {
        Ok(self.lemma(token, pos))
    }
}

fn noun_base(word: &str) -> String {
    let len = word.chars().count();
    if len > 4 {
        if let Some(stem) = word.strip_suffix("ies") {
            return format!("{stem}y");
        }
    }
    if let Some(stem) = word.strip_suffix("es") {
        if ["ss", "x", "z", "ch", "sh"].iter().any(|end| stem.ends_with(end)) {
            return stem.to_string();
        }
    }
    if len > 3 && !["ss", "us", "is"].iter().any(|end| word.ends_with(end)) {
        if let Some(stem) = word.strip_suffix('s') {
            return stem.to_string();
        }
    }
    word.to_string()
}

fn verb_base(word: &str) -> String {
    let len = word.chars().count();
    if len > 4 {
        if let Some(stem) = word
            .strip_suffix("ies")
            .or_else(|| word.strip_suffix("ied"))
        {
            return format!("{stem}y");
        }
    }
    if let Some(stem) = word.strip_suffix("es") {
        if ["ss", "x", "z", "ch", "sh"].iter().any(|end| stem.ends_with(end)) {
            return stem.to_string();
        }
    }
    if len > 3 && !word.ends_with("ss") {
        if let Some(stem) = word.strip_suffix('s') {
            return stem.to_string();
        }
    }
    if len > 4 {
        if let Some(stem) = word.strip_suffix("ing") {
            return restore_stem(stem);
        }
    }
    if len > 3 {
        if let Some(stem) = word.strip_suffix("ed") {
            return restore_stem(stem);
        }
    }
    word.to_string()
}

fn adjective_base(word: &str) -> String {
    if PLAIN_ER_ADJECTIVES.contains(&word) {
        return word.to_string();
    }
    let len = word.chars().count();
    if let Some(stem) = word
        .strip_suffix("iest")
        .or_else(|| word.strip_suffix("ier"))
    {
        if !stem.is_empty() {
            return format!("{stem}y");
        }
    }
    if len > 4 {
        if let Some(stem) = word.strip_suffix("est") {
            return restore_stem(stem);
        }
    }
    if len > 3 {
        if let Some(stem) = word.strip_suffix("er") {
            return restore_stem(stem);
        }
    }
    word.to_string()
}

/// Repairs a stem left behind by `-ing`, `-ed`, `-er` or `-est`.
fn restore_stem(stem: &str) -> String {
    let chars: Vec<char> = stem.chars().collect();
    let n = chars.len();
    if n < 2 {
        return format!("{stem}e");
    }
    let (prev, last) = (chars[n - 2], chars[n - 1]);

    if prev == last && !is_vowel(last) && !matches!(last, 'l' | 's' | 'z' | 'f') {
        return chars[..n - 1].iter().collect();
    }

    let needs_e = match last {
        'v' | 'u' => true,
        'c' => prev != 'c',
        'l' => !is_vowel(prev) && !matches!(prev, 'l' | 'r'),
        _ => {
            n == 3
                && !is_vowel(chars[0])
                && is_vowel(prev)
                && !is_vowel(last)
                && !matches!(last, 'w' | 'x' | 'y')
        }
    };
    if needs_e {
        format!("{stem}e")
    } else {
        stem.to_string()
    }
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}
