//! Recommendations and summaries derived from outcome history

use super::characteristics::TextCharacteristics;
use super::outcome::Outcome;
use super::preference::PreferenceTable;
use super::similarity::find_similar_outcomes;
use super::types::StrategyName;
use crate::config::defaults;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A strategy suggested by comparable past inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Suggested strategy
    pub strategy: StrategyName,
    /// Mean score of similar successful outcomes
    pub expected_score: f64,
    /// `min(samples / 10, 1)`
    pub confidence: f64,
    /// Similar successful outcomes behind the suggestion
    pub sample_count: usize,
    /// Human-readable explanation
    pub reasoning: String,
}

/// Direction of a strategy's scores over time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTrend {
    /// Newer scores are higher
    Improving,
    /// Newer scores are lower
    Declining,
    /// No change beyond the dead band
    Stable,
    /// Too few outcomes to tell
    InsufficientData,
}

/// Per-strategy aggregate in an insights report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyInsight {
    /// Outcomes recorded for the strategy
    pub usage_count: usize,
    /// Share of those outcomes marked successful
    pub success_rate: f64,
    /// Mean overall score
    pub average_score: f64,
    /// Score direction
    pub trend: ScoreTrend,
}

/// Summary of everything the selector has learned
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsightsReport {
    /// Outcomes currently in history
    pub total_outcomes: usize,
    /// Share of outcomes marked successful
    pub success_rate: f64,
    /// Per-strategy aggregates
    pub strategies: BTreeMap<StrategyName, StrategyInsight>,
    /// Best strategy per domain by mean score of successful outcomes
    pub best_strategy_by_domain: BTreeMap<String, StrategyName>,
    /// Learned preference values
    pub preferences: BTreeMap<String, f64>,
}

/// Rank strategies by how they did on inputs similar to `target`
pub(crate) fn recommend<'a>(
    history: impl IntoIterator<Item = &'a Outcome>,
    target: &TextCharacteristics,
    threshold: f64,
) -> Vec<Recommendation> {
    let mut per_strategy: BTreeMap<StrategyName, (usize, f64)> = BTreeMap::new();

    for outcome in find_similar_outcomes(history, target, threshold)
        .into_iter()
        .filter(|o| o.success)
    {
        let entry = per_strategy.entry(outcome.strategy.name).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += outcome.score.overall;
    }

    let mut recommendations: Vec<Recommendation> = per_strategy
        .into_iter()
        .map(|(strategy, (count, total))| {
            let expected_score = total / count as f64;
            Recommendation {
                strategy,
                expected_score,
                confidence: (count as f64 / defaults::RECOMMENDATION_SATURATION).min(1.0),
                sample_count: count,
                reasoning: format!(
                    "{count} similar successful run(s) with {strategy} averaged {expected_score:.2}"
                ),
            }
        })
        .collect();

    recommendations.sort_by(|a, b| {
        b.expected_score
            .total_cmp(&a.expected_score)
            .then_with(|| a.strategy.cmp(&b.strategy))
    });
    recommendations
}

/// Build an insights report over the whole history
pub(crate) fn summarize<'a>(
    history: impl IntoIterator<Item = &'a Outcome>,
    preferences: &PreferenceTable,
) -> InsightsReport {
    let mut total = 0usize;
    let mut successes = 0usize;
    let mut scores_by_strategy: BTreeMap<StrategyName, Vec<(f64, bool)>> = BTreeMap::new();
    let mut domain_scores: BTreeMap<String, BTreeMap<StrategyName, (usize, f64)>> =
        BTreeMap::new();

    for outcome in history {
        total += 1;
        if outcome.success {
            successes += 1;
            let entry = domain_scores
                .entry(outcome.characteristics.domain.clone())
                .or_default()
                .entry(outcome.strategy.name)
                .or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += outcome.score.overall;
        }
        scores_by_strategy
            .entry(outcome.strategy.name)
            .or_default()
            .push((outcome.score.overall, outcome.success));
    }

    let strategies = scores_by_strategy
        .into_iter()
        .map(|(name, samples)| {
            let usage_count = samples.len();
            let wins = samples.iter().filter(|(_, ok)| *ok).count();
            let scores: Vec<f64> = samples.iter().map(|(s, _)| *s).collect();
            let insight = StrategyInsight {
                usage_count,
                success_rate: wins as f64 / usage_count.max(1) as f64,
                average_score: mean(&scores),
                trend: trend(&scores),
            };
            (name, insight)
        })
        .collect();

    let best_strategy_by_domain = domain_scores
        .into_iter()
        .filter_map(|(domain, by_strategy)| {
            by_strategy
                .into_iter()
                .map(|(name, (count, sum))| (name, sum / count.max(1) as f64))
                .max_by(|a, b| a.1.total_cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
                .map(|(name, _)| (domain, name))
        })
        .collect();

    InsightsReport {
        total_outcomes: total,
        success_rate: successes as f64 / total.max(1) as f64,
        strategies,
        best_strategy_by_domain,
        preferences: preferences
            .iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Compare the newer half of the scores with the older half
pub(crate) fn trend(scores: &[f64]) -> ScoreTrend {
    if scores.len() < defaults::TREND_MIN_SAMPLES {
        return ScoreTrend::InsufficientData;
    }
    let (older, newer) = scores.split_at(scores.len() / 2);
    let delta = mean(newer) - mean(older);
    if delta > defaults::TREND_DEAD_BAND {
        ScoreTrend::Improving
    } else if delta < -defaults::TREND_DEAD_BAND {
        ScoreTrend::Declining
    } else {
        ScoreTrend::Stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_classification() {
        assert_eq!(trend(&[0.5, 0.6]), ScoreTrend::InsufficientData);
        assert_eq!(trend(&[0.4, 0.4, 0.8, 0.8]), ScoreTrend::Improving);
        assert_eq!(trend(&[0.9, 0.9, 0.5, 0.5]), ScoreTrend::Declining);
        assert_eq!(trend(&[0.7, 0.72, 0.71, 0.7]), ScoreTrend::Stable);
    }

    #[test]
    fn test_mean_of_nothing_is_zero() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_empty_history() {
        let report = summarize(std::iter::empty(), &PreferenceTable::default());
        assert_eq!(report.total_outcomes, 0);
        assert_eq!(report.success_rate, 0.0);
        assert!(report.strategies.is_empty());

        let recs = recommend(std::iter::empty(), &TextCharacteristics::default(), 0.7);
        assert!(recs.is_empty());
    }
}
