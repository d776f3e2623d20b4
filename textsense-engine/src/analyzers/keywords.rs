//! Keyword extraction by term frequency

use crate::{lexicon, tokenize};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use textsense_core::strategy::{Algorithm, StrategyParameters};
use textsense_core::{CostProbe, QualityRecord};

/// Keywords returned per depth level
const RESULTS_PER_DEPTH: usize = 5;

/// Score multiplier for repeated two-word phrases
const BIGRAM_WEIGHT: f64 = 1.5;

/// One extracted term or phrase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    /// Lower-cased term, or two terms joined by a space
    pub term: String,
    /// Occurrences in the text
    pub count: usize,
    /// Frequency relative to all candidate terms
    pub score: f64,
}

/// Whether a lower-cased word can be a keyword
pub(crate) fn is_candidate(word: &str) -> bool {
    word.chars().count() >= 3 && !lexicon::is_stopword(word) && !tokenize::is_numeric(word)
}

/// Candidate terms of `text` in order of appearance
pub(crate) fn candidate_terms(text: &str) -> Vec<String> {
    tokenize::normalized_words(text)
        .filter(|w| is_candidate(w))
        .collect()
}

/// Keywords returned at a processing depth
pub fn max_results(depth: u8) -> usize {
    RESULTS_PER_DEPTH * usize::from(depth.max(1))
}

/// Extract keywords, reporting work into `probe`
///
/// `Contextual` adds two-word phrases that occur at least twice.
pub fn keywords(
    text: &str,
    params: &StrategyParameters,
    probe: &CostProbe,
) -> (Vec<Keyword>, QualityRecord) {
    let mut normalized: HashMap<&str, String> = HashMap::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut bigrams: HashMap<String, usize> = HashMap::new();
    let mut previous: Option<String> = None;
    let mut words = 0usize;
    let mut candidates = 0usize;
    let use_phrases = params.has(Algorithm::Contextual);

    for raw in tokenize::words(text) {
        probe.increment_steps();
        words += 1;

        let word = match normalized.get(raw) {
            Some(word) => {
                probe.record_cache_hit();
                word.clone()
            }
            None => {
                let word = raw.to_lowercase();
                normalized.insert(raw, word.clone());
                word
            }
        };

        if !is_candidate(&word) {
            previous = None;
            continue;
        }
        candidates += 1;
        if use_phrases {
            if let Some(prev) = previous.take() {
                *bigrams.entry(format!("{prev} {word}")).or_insert(0) += 1;
            }
            previous = Some(word.clone());
        }
        *counts.entry(word).or_insert(0) += 1;
    }

    let accuracy = (0.55 + 0.05 * f64::from(params.depth)).min(0.8);
    if candidates == 0 {
        return (Vec::new(), QualityRecord::new(accuracy, 0.0, 0.0));
    }

    let total = candidates as f64;
    let mut ranked: Vec<Keyword> = counts
        .into_iter()
        .map(|(term, count)| Keyword {
            score: count as f64 / total,
            term,
            count,
        })
        .chain(
            bigrams
                .into_iter()
                .filter(|(_, count)| *count >= 2)
                .map(|(term, count)| Keyword {
                    score: count as f64 * BIGRAM_WEIGHT / total,
                    term,
                    count,
                }),
        )
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.term.cmp(&b.term)));
    ranked.truncate(max_results(params.depth));

    let top_count = ranked.first().map_or(0, |k| k.count) as f64;
    let quality = QualityRecord::new(
        accuracy,
        (top_count / 3.0).min(1.0),
        candidates as f64 / words as f64,
    );
    (ranked, quality)
}
