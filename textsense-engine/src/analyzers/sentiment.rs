//! Lexicon-based sentiment scoring

use crate::{lexicon, tokenize};
use serde::{Deserialize, Serialize};
use textsense_core::strategy::{Algorithm, StrategyParameters};
use textsense_core::{CostProbe, QualityRecord};

/// Scores within this distance of zero are neutral
const NEUTRAL_BAND: f64 = 0.05;

/// Words after a negation whose polarity is flipped
const NEGATION_WINDOW: usize = 3;

/// Polarity multiplier for a negated term
const NEGATION_FACTOR: f64 = -0.74;

/// Normalization constant for `x / sqrt(x² + α)`
const NORMALIZATION_ALPHA: f64 = 15.0;

/// Overall polarity label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    /// Score above the neutral band
    Positive,
    /// Score below the neutral band
    Negative,
    /// Score inside the neutral band
    Neutral,
}

impl SentimentLabel {
    fn from_score(score: f64) -> Self {
        if score > NEUTRAL_BAND {
            SentimentLabel::Positive
        } else if score < -NEUTRAL_BAND {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

/// Sentiment of one text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    /// Normalized polarity in [-1, 1]
    pub score: f64,
    /// Label derived from the score
    pub label: SentimentLabel,
    /// Terms that contributed positively
    pub positive_terms: usize,
    /// Terms that contributed negatively
    pub negative_terms: usize,
    /// Words examined
    pub words: usize,
}

impl Default for Sentiment {
    fn default() -> Self {
        Self {
            score: 0.0,
            label: SentimentLabel::Neutral,
            positive_terms: 0,
            negative_terms: 0,
            words: 0,
        }
    }
}

/// Score sentiment, reporting work into `probe`
///
/// `Statistical` enables negation handling and `Linguistic` enables
/// intensifiers; the basic pass only sums lexicon weights.
pub fn sentiment(
    text: &str,
    params: &StrategyParameters,
    probe: &CostProbe,
) -> (Sentiment, QualityRecord) {
    let use_negation = params.has(Algorithm::Statistical);
    let use_intensifiers = params.has(Algorithm::Linguistic);

    let mut result = Sentiment::default();
    let mut total = 0.0;
    let mut negation_left = 0usize;
    let mut boost = 1.0;

    for word in tokenize::normalized_words(text) {
        probe.increment_steps();
        result.words += 1;

        if use_negation && lexicon::is_negation(&word) {
            negation_left = NEGATION_WINDOW;
            boost = 1.0;
            continue;
        }
        if use_intensifiers {
            if let Some(multiplier) = lexicon::intensifier(&word) {
                boost = multiplier;
                continue;
            }
        }

        if let Some(weight) = lexicon::polarity(&word) {
            let mut weight = weight * boost;
            if negation_left > 0 {
                weight *= NEGATION_FACTOR;
            }
            if weight > 0.0 {
                result.positive_terms += 1;
            } else {
                result.negative_terms += 1;
            }
            total += weight;
        }
        boost = 1.0;
        negation_left = negation_left.saturating_sub(1);
    }

    let mut accuracy = 0.65;
    if use_negation {
        accuracy += 0.1;
    }
    if use_intensifiers {
        accuracy += 0.1;
    }
    if result.words == 0 {
        return (result, QualityRecord::new(accuracy, 0.0, 0.0));
    }

    result.score = total / (total * total + NORMALIZATION_ALPHA).sqrt();
    result.label = SentimentLabel::from_score(result.score);

    let matched = (result.positive_terms + result.negative_terms) as f64;
    let quality = QualityRecord::new(
        accuracy,
        (matched / 3.0).min(1.0),
        matched / result.words as f64,
    );
    (result, quality)
}
