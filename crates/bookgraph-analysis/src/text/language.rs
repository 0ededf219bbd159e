//! Stopword-profile language guessing.
//!
//! Four fixed stopword sets (English, French, Spanish, German) are matched
//! against the opening tokens of a text. The language with the most hits
//! wins; ties resolve in [`Language::DETECTABLE`] order.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::text::word_tokens;

/// Texts shorter than this (in characters) are never classified.
pub const MIN_DETECTION_CHARS: usize = 50;
/// Only the first tokens of a text are sampled.
pub const DETECTION_SAMPLE_TOKENS: usize = 100;
/// A language needs at least this many stopword hits to be reported.
pub const MIN_STOPWORD_HITS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Fr,
    Es,
    De,
    Unknown,
}

impl Language {
    /// Detection order; earlier entries win ties.
    pub const DETECTABLE: [Language; 4] = [Self::En, Self::Fr, Self::Es, Self::De];

    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Fr => "fr",
            Self::Es => "es",
            Self::De => "de",
            Self::Unknown => "unknown",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Fr => "French",
            Self::Es => "Spanish",
            Self::De => "German",
            Self::Unknown => "Unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        *self != Self::Unknown
    }

    /// Stopword set for this language; `Unknown` uses the English set.
    pub fn stopwords(&self) -> &'static HashSet<&'static str> {
        match self {
            Self::En | Self::Unknown => &EN_STOPWORDS,
            Self::Fr => &FR_STOPWORDS,
            Self::Es => &ES_STOPWORDS,
            Self::De => &DE_STOPWORDS,
        }
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords().contains(word)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Guess the language of `text` from stopword frequency.
///
/// Returns [`Language::Unknown`] for texts under 50 characters or when no
/// language reaches three stopword hits in the first 100 tokens.
pub fn detect_language(text: &str) -> Language {
    if text.chars().count() < MIN_DETECTION_CHARS {
        return Language::Unknown;
    }

    let tokens: Vec<String> = word_tokens(text).take(DETECTION_SAMPLE_TOKENS).collect();
    let (best, hits) = best_stopword_match(&tokens);
    if hits < MIN_STOPWORD_HITS {
        Language::Unknown
    } else {
        best
    }
}

/// Language with the most stopword hits among `words`, defaulting to
/// English. No length or hit threshold: meant for short strings such as
/// titles where [`detect_language`] would give up.
pub fn guess_from_words<S: AsRef<str>>(words: &[S]) -> Language {
    let (best, hits) = best_stopword_match(words);
    if hits == 0 { Language::En } else { best }
}

fn best_stopword_match<S: AsRef<str>>(words: &[S]) -> (Language, usize) {
    let mut best = (Language::Unknown, 0usize);
    for language in Language::DETECTABLE {
        let set = language.stopwords();
        let hits = words.iter().filter(|w| set.contains(w.as_ref())).count();
        if hits > best.1 {
            best = (language, hits);
        }
    }
    best
}

// ─── Stopword sets ──────────────────────────────────────────

static EN_STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and",
        "another", "any", "are", "as", "at", "be", "because", "been", "before", "being", "below",
        "between", "both", "but", "by", "came", "can", "come", "could", "did", "do", "does",
        "doing", "down", "during", "each", "few", "for", "from", "further", "get", "got", "had",
        "has", "have", "having", "he", "her", "here", "hers", "herself", "him", "himself", "his",
        "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just", "like", "make",
        "many", "me", "might", "more", "most", "much", "must", "my", "myself", "never", "no",
        "nor", "not", "now", "of", "off", "on", "once", "only", "or", "other", "our", "ours",
        "out", "over", "own", "said", "same", "she", "should", "since", "so", "some", "still",
        "such", "take", "than", "that", "the", "their", "them", "themselves", "then", "there",
        "these", "they", "this", "those", "through", "to", "too", "under", "until", "up", "upon",
        "very", "was", "way", "we", "well", "were", "what", "when", "where", "which", "while",
        "who", "whom", "why", "will", "with", "would", "you", "your", "yours",
    ]
    .into_iter()
    .collect()
});

static FR_STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "au", "aux", "avec", "ce", "ces", "cet", "cette", "chez", "comme", "d", "dans", "de",
        "des", "donc", "dont", "du", "elle", "elles", "en", "entre", "est", "et", "été", "être",
        "eux", "il", "ils", "je", "j", "l", "la", "le", "les", "leur", "leurs", "lui", "m", "ma",
        "mais", "me", "même", "mes", "moi", "mon", "n", "ne", "ni", "nos", "notre", "nous", "on",
        "ont", "ou", "où", "par", "pas", "pour", "qu", "que", "qui", "s", "sa", "sans", "se",
        "ses", "son", "sont", "sous", "sur", "ta", "te", "tes", "toi", "ton", "tous", "tout",
        "toute", "très", "tu", "un", "une", "vers", "vos", "votre", "vous", "y", "était",
        "avait", "aussi", "bien", "plus", "fait", "c",
    ]
    .into_iter()
    .collect()
});

static ES_STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "al", "algo", "ante", "como", "con", "contra", "cuando", "de", "del", "desde", "donde",
        "durante", "e", "el", "ella", "ellas", "ellos", "en", "entre", "era", "es", "esa",
        "ese", "eso", "esta", "está", "este", "esto", "estos", "estas", "fue", "ha", "han",
        "hasta", "hay", "la", "las", "le", "les", "lo", "los", "más", "me", "mi", "mis", "muy",
        "nos", "nuestra", "nuestro", "o", "para", "pero", "por", "porque", "que", "qué", "se",
        "ser", "si", "sí", "sin", "sobre", "son", "su", "sus", "también", "tiene", "todo",
        "todos", "tras", "u", "un", "una", "unas", "uno", "unos", "y", "ya", "yo",
    ]
    .into_iter()
    .collect()
});

static DE_STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "aber", "als", "am", "an", "auch", "auf", "aus", "bei", "bis", "da", "damit", "das",
        "dass", "dem", "den", "denn", "der", "des", "die", "dies", "diese", "dieser", "dieses",
        "doch", "du", "durch", "ein", "eine", "einem", "einen", "einer", "eines", "er", "es",
        "für", "gegen", "hat", "haben", "hatte", "ich", "ihr", "ihre", "ihren", "im", "in",
        "ist", "kein", "keine", "man", "mit", "nach", "nicht", "noch", "nur", "oder", "ohne",
        "schon", "sein", "seine", "seinen", "sich", "sie", "sind", "so", "über", "um", "und",
        "uns", "unter", "vom", "von", "vor", "war", "waren", "was", "weil", "wenn", "werden",
        "wie", "wir", "wird", "zu", "zum", "zur", "zwischen",
    ]
    .into_iter()
    .collect()
});
