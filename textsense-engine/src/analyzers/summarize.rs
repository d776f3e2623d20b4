//! Extractive summarization

use super::keywords::candidate_terms;
use super::segment::split_sentences;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use textsense_core::strategy::StrategyParameters;
use textsense_core::{CostProbe, QualityRecord};

/// Share of sentences kept
const SUMMARY_RATIO: f64 = 0.3;

/// Extra weight for early sentences at depth 3 and up
const POSITION_WEIGHT: f64 = 0.5;

/// Selected sentences in their original order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Selected sentence texts
    pub sentences: Vec<String>,
    /// Indices of the selected sentences in the source
    pub indices: Vec<usize>,
    /// Sentences in the source
    pub source_sentences: usize,
}

impl Summary {
    /// Selected sentences joined with spaces
    pub fn text(&self) -> String {
        self.sentences.join(" ")
    }
}

/// Summarize by keyword density, reporting work into `probe`
pub fn summarize(
    text: &str,
    params: &StrategyParameters,
    probe: &CostProbe,
) -> (Summary, QualityRecord) {
    let depth = params.depth;
    let mut accuracy = 0.55;
    if depth >= 3 {
        accuracy += 0.1;
    }
    if depth >= 4 {
        accuracy += 0.05;
    }

    let sentences = split_sentences(text, depth);
    let n = sentences.len();
    if n == 0 {
        return (Summary::default(), QualityRecord::new(accuracy, 0.0, 0.0));
    }

    let mut frequency: HashMap<String, usize> = HashMap::new();
    for term in candidate_terms(text) {
        *frequency.entry(term).or_insert(0) += 1;
    }

    let sentence_terms: Vec<Vec<String>> = sentences
        .iter()
        .map(|s| candidate_terms(&s.text))
        .collect();

    let scores: Vec<f64> = sentence_terms
        .iter()
        .enumerate()
        .map(|(idx, terms)| {
            probe.add_steps(terms.len() as u64 + 1);
            let total: usize = terms.iter().map(|t| frequency.get(t).copied().unwrap_or(0)).sum();
            let mut score = total as f64 / terms.len().max(1) as f64;
            if depth >= 3 {
                score *= 1.0 + POSITION_WEIGHT * (1.0 - idx as f64 / n as f64);
            }
            score
        })
        .collect();
    probe.checkpoint("scored");

    let keep = ((n as f64 * SUMMARY_RATIO).ceil() as usize).clamp(1, n);
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]).then_with(|| a.cmp(&b)));
    let mut indices: Vec<usize> = order.into_iter().take(keep).collect();
    indices.sort_unstable();

    let best = scores.iter().copied().fold(0.0, f64::max);
    let selected_mean = indices.iter().map(|&i| scores[i]).sum::<f64>() / keep as f64;
    let confidence = if best > 0.0 { selected_mean / best } else { 0.0 };

    let document_terms: HashSet<&String> = frequency.keys().collect();
    let covered: HashSet<&String> = indices
        .iter()
        .flat_map(|&i| sentence_terms[i].iter())
        .collect();
    let coverage = covered.len() as f64 / document_terms.len().max(1) as f64;

    let summary = Summary {
        sentences: indices.iter().map(|&i| sentences[i].text.clone()).collect(),
        indices,
        source_sentences: n,
    };
    (summary, QualityRecord::new(accuracy, confidence, coverage))
}

#[cfg(test)]
mod tests {
    use super::*;
    use textsense_core::{Strategy, StrategyName};

    const TEXT: &str = "Cats are nice. Telemetry telemetry telemetry matters. Dogs bark loudly. \
                        Telemetry stores telemetry data. Birds sing.";

    #[test]
    fn test_selects_dense_sentences_in_order() {
        let params = Strategy::canonical(StrategyName::Fast).parameters;
        let (summary, quality) = summarize(TEXT, &params, &CostProbe::start());

        assert_eq!(summary.source_sentences, 5);
        assert_eq!(summary.indices, vec![1, 3]);
        assert_eq!(
            summary.text(),
            "Telemetry telemetry telemetry matters. Telemetry stores telemetry data."
        );
        assert!(quality.confidence > 0.0 && quality.confidence <= 1.0);
        assert!(quality.coverage > 0.0 && quality.coverage < 1.0);
    }

    #[test]
    fn test_single_sentence() {
        let params = Strategy::canonical(StrategyName::Comprehensive).parameters;
        let (summary, quality) = summarize("Only one sentence here.", &params, &CostProbe::start());
        assert_eq!(summary.indices, vec![0]);
        assert_eq!(quality.confidence, 1.0);
        assert_eq!(quality.coverage, 1.0);
    }

    #[test]
    fn test_empty() {
        let params = Strategy::canonical(StrategyName::Balanced).parameters;
        let (summary, quality) = summarize("", &params, &CostProbe::start());
        assert_eq!(summary, Summary::default());
        assert_eq!(quality.confidence, 0.0);
    }
}
