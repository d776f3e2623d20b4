//! Descriptive text statistics

use super::segment::split_sentences;
use crate::tokenize;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use textsense_core::strategy::StrategyParameters;
use textsense_core::{CostProbe, QualityRecord};

/// Counts and ratios describing a text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextStatistics {
    /// Characters, whitespace included
    pub chars: usize,
    /// Characters excluding whitespace
    pub non_whitespace_chars: usize,
    /// Words
    pub words: usize,
    /// Distinct lower-cased words
    pub unique_words: usize,
    /// Sentences
    pub sentences: usize,
    /// Blocks separated by blank lines
    pub paragraphs: usize,
    /// Mean word length in characters
    pub mean_word_length: f64,
    /// Mean sentence length in words
    pub mean_sentence_length: f64,
    /// Type/token ratio
    pub lexical_diversity: f64,
}

impl TextStatistics {
    /// Compute statistics, sentence boundaries found at `depth`
    pub(crate) fn compute(text: &str, depth: u8) -> Self {
        let words: Vec<&str> = tokenize::words(text).collect();
        let unique: HashSet<String> = words.iter().map(|w| w.to_lowercase()).collect();
        let word_chars: usize = words.iter().map(|w| w.chars().count()).sum();
        let sentences = split_sentences(text, depth).len();
        let paragraphs = text
            .split("\n\n")
            .filter(|block| !block.trim().is_empty())
            .count();

        let n_words = words.len();
        Self {
            chars: text.chars().count(),
            non_whitespace_chars: text.chars().filter(|c| !c.is_whitespace()).count(),
            words: n_words,
            unique_words: unique.len(),
            sentences,
            paragraphs,
            mean_word_length: word_chars as f64 / n_words.max(1) as f64,
            mean_sentence_length: n_words as f64 / sentences.max(1) as f64,
            lexical_diversity: unique.len() as f64 / n_words.max(1) as f64,
        }
    }
}

/// Compute text statistics, reporting work into `probe`
pub fn text_statistics(
    text: &str,
    params: &StrategyParameters,
    probe: &CostProbe,
) -> (TextStatistics, QualityRecord) {
    let stats = TextStatistics::compute(text, params.depth);
    probe.add_steps((stats.words + stats.sentences) as u64);

    if stats.words == 0 {
        return (stats, QualityRecord::new(1.0, 0.0, 0.0));
    }

    // unspaced scripts make word counts approximate
    let accuracy = if tokenize::cjk_ratio(text) > 0.3 {
        0.6
    } else {
        0.95
    };
    let word_chars: usize = tokenize::words(text).map(|w| w.chars().count()).sum();
    let coverage = (word_chars as f64 / stats.non_whitespace_chars.max(1) as f64).min(1.0);

    (stats, QualityRecord::new(accuracy, 1.0, coverage))
}
