//! Built-in word lists

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

const ENGLISH_STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for",
    "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself",
    "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just",
    "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once",
    "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same", "she",
    "should", "so", "some", "such", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those", "through", "to", "too",
    "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "would", "you", "your", "yours", "yourself",
    "yourselves", "also", "may", "might", "must", "shall", "upon", "us",
];

const SPANISH_STOPWORDS: &[&str] = &[
    "de", "la", "que", "el", "en", "y", "los", "se", "del", "las", "un", "por", "con", "una",
    "su", "para", "es", "al", "lo", "como", "más", "pero", "sus", "le", "ya", "o", "este", "fue",
    "ha", "sí", "porque", "esta", "son", "entre", "cuando", "muy", "sin", "sobre", "también",
    "hay", "donde", "nos", "durante", "todos", "uno", "ni", "contra", "otros", "ese", "eso",
    "hasta", "desde", "está", "estos", "mi", "yo", "él", "ella",
];

const FRENCH_STOPWORDS: &[&str] = &[
    "le", "la", "les", "de", "des", "du", "un", "une", "et", "est", "en", "que", "qui", "dans",
    "pour", "pas", "sur", "au", "aux", "avec", "ce", "ces", "il", "elle", "nous", "vous", "ils",
    "elles", "je", "tu", "on", "mais", "ou", "où", "donc", "ne", "par", "plus", "son", "sa",
    "ses", "leur", "été", "être", "avoir", "fait", "comme", "cette", "sont", "très", "aussi",
];

const GERMAN_STOPWORDS: &[&str] = &[
    "der", "die", "das", "und", "ist", "nicht", "ein", "eine", "einen", "dem", "den", "des",
    "zu", "mit", "sich", "auf", "für", "von", "im", "auch", "es", "an", "als", "wie", "bei",
    "nach", "aus", "wird", "werden", "hat", "haben", "sind", "war", "noch", "nur", "oder",
    "aber", "wenn", "ich", "du", "er", "sie", "wir", "ihr", "mein", "dass", "kann", "durch",
    "über", "vor", "sehr",
];

/// Languages with a stopword profile, in tie-break order
pub const PROFILED_LANGUAGES: [&str; 4] = ["en", "es", "fr", "de"];

const POSITIVE_TERMS: &[(&str, f64)] = &[
    ("good", 1.0),
    ("great", 1.5),
    ("excellent", 2.0),
    ("amazing", 2.0),
    ("wonderful", 2.0),
    ("fantastic", 2.0),
    ("love", 1.5),
    ("loved", 1.5),
    ("like", 0.5),
    ("enjoy", 1.0),
    ("enjoyed", 1.0),
    ("happy", 1.5),
    ("pleased", 1.0),
    ("nice", 1.0),
    ("best", 1.5),
    ("better", 0.8),
    ("perfect", 2.0),
    ("positive", 1.0),
    ("helpful", 1.0),
    ("recommend", 1.0),
    ("beautiful", 1.5),
    ("brilliant", 1.8),
    ("success", 1.2),
    ("successful", 1.2),
    ("fast", 0.5),
    ("reliable", 1.0),
    ("easy", 0.8),
    ("clean", 0.6),
    ("impressive", 1.5),
    ("satisfied", 1.2),
];

const NEGATIVE_TERMS: &[(&str, f64)] = &[
    ("bad", -1.0),
    ("terrible", -2.0),
    ("awful", -2.0),
    ("horrible", -2.0),
    ("poor", -1.2),
    ("worst", -2.0),
    ("worse", -1.0),
    ("hate", -1.8),
    ("hated", -1.8),
    ("dislike", -1.0),
    ("sad", -1.2),
    ("angry", -1.5),
    ("disappointed", -1.5),
    ("disappointing", -1.5),
    ("broken", -1.2),
    ("slow", -0.6),
    ("fail", -1.2),
    ("failed", -1.2),
    ("failure", -1.2),
    ("problem", -0.8),
    ("bug", -0.8),
    ("crash", -1.2),
    ("useless", -1.8),
    ("annoying", -1.2),
    ("difficult", -0.6),
    ("wrong", -1.0),
    ("negative", -1.0),
    ("ugly", -1.5),
    ("expensive", -0.6),
    ("unreliable", -1.2),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "neither", "nor", "without", "hardly",
    "cannot",
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.5),
    ("really", 1.3),
    ("extremely", 2.0),
    ("incredibly", 1.8),
    ("so", 1.2),
    ("absolutely", 1.8),
    ("totally", 1.5),
    ("quite", 1.2),
    ("slightly", 0.5),
    ("somewhat", 0.7),
    ("barely", 0.4),
];

const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "vs", "etc", "e.g", "i.e", "inc", "ltd",
    "co", "corp", "no", "fig", "approx", "dept", "est", "gen", "gov", "jan", "feb", "mar",
    "apr", "jun", "jul", "aug", "sep", "sept", "oct", "nov", "dec", "u.s", "u.k", "a.m", "p.m",
    "vol", "pp", "ed", "cf", "al",
];

fn set(words: &'static [&'static str]) -> HashSet<&'static str> {
    words.iter().copied().collect()
}

fn weights(entries: &'static [(&'static str, f64)]) -> HashMap<&'static str, f64> {
    entries.iter().copied().collect()
}

/// Stopwords for a language code; unprofiled languages have none
pub fn stopwords(language: &str) -> &'static HashSet<&'static str> {
    static EN: OnceLock<HashSet<&str>> = OnceLock::new();
    static ES: OnceLock<HashSet<&str>> = OnceLock::new();
    static FR: OnceLock<HashSet<&str>> = OnceLock::new();
    static DE: OnceLock<HashSet<&str>> = OnceLock::new();
    static NONE: OnceLock<HashSet<&str>> = OnceLock::new();

    match language {
        "en" => EN.get_or_init(|| set(ENGLISH_STOPWORDS)),
        "es" => ES.get_or_init(|| set(SPANISH_STOPWORDS)),
        "fr" => FR.get_or_init(|| set(FRENCH_STOPWORDS)),
        "de" => DE.get_or_init(|| set(GERMAN_STOPWORDS)),
        _ => NONE.get_or_init(HashSet::new),
    }
}

/// Whether a lower-cased word is an English stopword
pub fn is_stopword(word: &str) -> bool {
    stopwords("en").contains(word)
}

/// Polarity weight of a lower-cased word, if it carries one
pub fn polarity(word: &str) -> Option<f64> {
    static LEXICON: OnceLock<HashMap<&str, f64>> = OnceLock::new();
    LEXICON
        .get_or_init(|| {
            let mut lexicon = weights(POSITIVE_TERMS);
            lexicon.extend(weights(NEGATIVE_TERMS));
            lexicon
        })
        .get(word)
        .copied()
}

/// Whether a lower-cased word negates what follows
pub fn is_negation(word: &str) -> bool {
    static SET: OnceLock<HashSet<&str>> = OnceLock::new();
    SET.get_or_init(|| set(NEGATIONS)).contains(word) || word.ends_with("n't")
}

/// Multiplier applied by an intensifier, if the word is one
pub fn intensifier(word: &str) -> Option<f64> {
    static MAP: OnceLock<HashMap<&str, f64>> = OnceLock::new();
    MAP.get_or_init(|| weights(INTENSIFIERS)).get(word).copied()
}

/// Whether a lower-cased token (without its final period) is a known
/// abbreviation
pub fn is_abbreviation(token: &str) -> bool {
    static SET: OnceLock<HashSet<&str>> = OnceLock::new();
    SET.get_or_init(|| set(ABBREVIATIONS)).contains(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stopwords() {
        assert!(is_stopword("the"));
        assert!(!is_stopword("telemetry"));
        assert!(stopwords("de").contains("und"));
        assert!(stopwords("xx").is_empty());
    }

    #[test]
    fn test_sentiment_lexicon() {
        assert_eq!(polarity("excellent"), Some(2.0));
        assert_eq!(polarity("terrible"), Some(-2.0));
        assert_eq!(polarity("table"), None);
        assert!(is_negation("never"));
        assert!(is_negation("don't"));
        assert_eq!(intensifier("very"), Some(1.5));
    }

    #[test]
    fn test_abbreviations() {
        assert!(is_abbreviation("dr"));
        assert!(is_abbreviation("e.g"));
        assert!(!is_abbreviation("end"));
    }
}
