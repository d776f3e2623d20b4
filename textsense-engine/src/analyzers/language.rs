//! Language identification

use crate::{lexicon, tokenize};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use textsense_core::strategy::StrategyParameters;
use textsense_core::{CostProbe, QualityRecord};

/// Words examined at depth 1
const SHALLOW_SAMPLE_WORDS: usize = 200;

/// CJK share above which the script decides the language
const CJK_SCRIPT_THRESHOLD: f64 = 0.3;

/// Code reported when nothing identifies the language
pub const UNDETERMINED: &str = "und";

/// Detected language with per-candidate scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageGuess {
    /// ISO 639-1 code, or `und`
    pub code: String,
    /// Share of the evidence supporting `code`
    pub confidence: f64,
    /// Evidence share per candidate language
    pub scores: BTreeMap<String, f64>,
}

impl LanguageGuess {
    fn undetermined() -> Self {
        Self {
            code: UNDETERMINED.to_string(),
            confidence: 0.0,
            scores: BTreeMap::new(),
        }
    }

    fn single(code: &str, confidence: f64) -> Self {
        Self {
            code: code.to_string(),
            confidence,
            scores: BTreeMap::from([(code.to_string(), confidence)]),
        }
    }
}

/// What a detection pass looked at
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Evidence {
    pub examined: usize,
    pub available: usize,
}

fn script_guess(text: &str) -> Option<LanguageGuess> {
    let (mut letters, mut kana, mut hangul, mut han) = (0usize, 0usize, 0usize, 0usize);
    for c in text.chars().filter(|c| c.is_alphabetic()) {
        letters += 1;
        if tokenize::is_kana(c) {
            kana += 1;
        } else if tokenize::is_hangul(c) {
            hangul += 1;
        } else if tokenize::is_han(c) {
            han += 1;
        }
    }

    let cjk = kana + hangul + han;
    let share = cjk as f64 / letters.max(1) as f64;
    if letters == 0 || share <= CJK_SCRIPT_THRESHOLD {
        return None;
    }

    let code = if kana > 0 {
        "ja"
    } else if hangul > han {
        "ko"
    } else {
        "zh"
    };
    Some(LanguageGuess::single(code, share))
}

/// Guess the language from script, then from stopword profiles
///
/// `sample` bounds how many words the stopword pass looks at.
pub(crate) fn guess_language(text: &str, sample: Option<usize>) -> (LanguageGuess, Evidence) {
    if let Some(guess) = script_guess(text) {
        let chars = text.chars().count();
        let evidence = Evidence {
            examined: chars,
            available: chars,
        };
        return (guess, evidence);
    }

    let words: Vec<String> = tokenize::normalized_words(text).collect();
    let limit = sample.unwrap_or(words.len()).min(words.len());
    let mut hits: BTreeMap<&str, usize> = BTreeMap::new();
    for word in &words[..limit] {
        for code in lexicon::PROFILED_LANGUAGES {
            if lexicon::stopwords(code).contains(word.as_str()) {
                *hits.entry(code).or_insert(0) += 1;
            }
        }
    }
    let evidence = Evidence {
        examined: limit,
        available: words.len(),
    };

    let total: usize = hits.values().sum();
    if total == 0 {
        return (LanguageGuess::undetermined(), evidence);
    }

    let mut winner = (lexicon::PROFILED_LANGUAGES[0], 0usize);
    for code in lexicon::PROFILED_LANGUAGES {
        let count = hits.get(code).copied().unwrap_or(0);
        if count > winner.1 {
            winner = (code, count);
        }
    }

    let guess = LanguageGuess {
        code: winner.0.to_string(),
        confidence: winner.1 as f64 / total as f64,
        scores: hits
            .into_iter()
            .map(|(code, count)| (code.to_string(), count as f64 / total as f64))
            .collect(),
    };
    (guess, evidence)
}

/// Detect the language, reporting work into `probe`
///
/// Depth 1 only samples the first words of the text.
pub fn detect_language(
    text: &str,
    params: &StrategyParameters,
    probe: &CostProbe,
) -> (LanguageGuess, QualityRecord) {
    let shallow = params.depth <= 1;
    let sample = shallow.then_some(SHALLOW_SAMPLE_WORDS);
    let (guess, evidence) = guess_language(text, sample);
    probe.add_steps(evidence.examined as u64);

    let accuracy = if shallow { 0.7 } else { 0.85 };
    let coverage = if evidence.available == 0 {
        0.0
    } else {
        evidence.examined as f64 / evidence.available as f64
    };
    let quality = QualityRecord::new(accuracy, guess.confidence, coverage);
    (guess, quality)
}
