//! Readability scores

use super::segment::split_sentences;
use crate::tokenize;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use textsense_core::strategy::StrategyParameters;
use textsense_core::{CostProbe, QualityRecord};

/// Readability formulas over one text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Readability {
    /// Words scored
    pub words: usize,
    /// Sentences found
    pub sentences: usize,
    /// Estimated syllables
    pub syllables: u32,
    /// Words of three or more syllables
    pub complex_words: usize,
    /// Flesch reading ease; higher is easier
    pub flesch_reading_ease: f64,
    /// Flesch–Kincaid grade level
    pub flesch_kincaid_grade: f64,
    /// Gunning fog index, computed at depth 3 and up
    pub gunning_fog: Option<f64>,
    /// SMOG grade, computed at depth 3 and up
    pub smog_index: Option<f64>,
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y')
}

/// Vowel-group syllable estimate for an English word; never below 1
pub(crate) fn count_syllables(word: &str) -> u32 {
    let letters: Vec<char> = word
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if letters.is_empty() {
        return 1;
    }

    let mut count = 0u32;
    let mut previous_vowel = false;
    for &c in &letters {
        let vowel = is_vowel(c);
        if vowel && !previous_vowel {
            count += 1;
        }
        previous_vowel = vowel;
    }

    // silent final e, but not "-le"
    if count > 1 && letters.ends_with(&['e']) && !letters.ends_with(&['l', 'e']) {
        count -= 1;
    }
    count.max(1)
}

/// Score readability, reporting work into `probe`
pub fn readability(
    text: &str,
    params: &StrategyParameters,
    probe: &CostProbe,
) -> (Readability, QualityRecord) {
    let depth = params.depth;
    let mut memo: HashMap<String, u32> = HashMap::new();
    let mut result = Readability::default();
    let mut latin_words = 0usize;

    for word in tokenize::words(text) {
        probe.increment_steps();
        let key = word.to_lowercase();
        let syllables = match memo.get(&key) {
            Some(&cached) => {
                probe.record_cache_hit();
                cached
            }
            None => {
                let counted = count_syllables(&key);
                memo.insert(key, counted);
                counted
            }
        };

        result.words += 1;
        result.syllables += syllables;
        if syllables >= 3 {
            result.complex_words += 1;
        }
        if word.chars().any(|c| c.is_ascii_alphabetic()) {
            latin_words += 1;
        }
    }

    let base_accuracy = if depth >= 3 { 0.85 } else { 0.75 };
    if result.words == 0 {
        return (result, QualityRecord::new(base_accuracy, 0.0, 0.0));
    }

    result.sentences = split_sentences(text, depth).len();
    let words = result.words as f64;
    let sentences = result.sentences.max(1) as f64;
    let words_per_sentence = words / sentences;
    let syllables_per_word = result.syllables as f64 / words;

    result.flesch_reading_ease =
        206.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word;
    result.flesch_kincaid_grade = 0.39 * words_per_sentence + 11.8 * syllables_per_word - 15.59;

    if depth >= 3 {
        let complex = result.complex_words as f64;
        result.gunning_fog = Some(0.4 * (words_per_sentence + 100.0 * complex / words));
        result.smog_index = Some(1.0430 * (complex * 30.0 / sentences).sqrt() + 3.1291);
    }

    let accuracy = if tokenize::cjk_ratio(text) > 0.3 {
        0.3
    } else {
        base_accuracy
    };
    let quality = QualityRecord::new(
        accuracy,
        (words / 100.0).min(1.0),
        latin_words as f64 / words,
    );
    (result, quality)
}
