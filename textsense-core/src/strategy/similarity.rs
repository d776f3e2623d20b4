//! Similarity between text characteristics

use super::characteristics::TextCharacteristics;
use super::outcome::Outcome;

const LENGTH_WEIGHT: f64 = 0.3;
const LANGUAGE_WEIGHT: f64 = 0.2;
const DOMAIN_WEIGHT: f64 = 0.3;
const COMPLEXITY_WEIGHT: f64 = 0.2;

/// Weighted similarity in [0, 1]
///
/// Terms: length ratio `min/max` (0.3), exact language match (0.2), domain
/// match (0.3, half credit when one domain contains the other) and
/// complexity closeness `1 - |Δ|` (0.2). The sum is divided by the weights
/// that applied; length and complexity only apply when both sides know
/// them.
pub fn calculate_similarity(a: &TextCharacteristics, b: &TextCharacteristics) -> f64 {
    let mut score = 0.0;
    let mut weight = 0.0;

    if let (Some(la), Some(lb)) = (a.length, b.length) {
        let (lo, hi) = (la.min(lb) as f64, la.max(lb) as f64);
        let ratio = if hi == 0.0 { 1.0 } else { lo / hi };
        score += ratio * LENGTH_WEIGHT;
        weight += LENGTH_WEIGHT;
    }

    if a.language == b.language {
        score += LANGUAGE_WEIGHT;
    }
    weight += LANGUAGE_WEIGHT;

    score += domain_match(&a.domain, &b.domain) * DOMAIN_WEIGHT;
    weight += DOMAIN_WEIGHT;

    if let (Some(ca), Some(cb)) = (a.complexity, b.complexity) {
        score += (1.0 - (ca - cb).abs()).clamp(0.0, 1.0) * COMPLEXITY_WEIGHT;
        weight += COMPLEXITY_WEIGHT;
    }

    score / weight
}

fn domain_match(a: &str, b: &str) -> f64 {
    if a == b {
        1.0
    } else if !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a)) {
        0.5
    } else {
        0.0
    }
}

/// Outcomes whose input is more similar than `threshold` to `target`, in
/// recording order
pub fn find_similar_outcomes<'a>(
    history: impl IntoIterator<Item = &'a Outcome>,
    target: &TextCharacteristics,
    threshold: f64,
) -> Vec<&'a Outcome> {
    history
        .into_iter()
        .filter(|outcome| calculate_similarity(&outcome.characteristics, target) > threshold)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TextCharacteristics {
        TextCharacteristics::new(2_000, "en", "technical", 0.6)
    }

    #[test]
    fn test_identical_is_one() {
        assert_eq!(calculate_similarity(&sample(), &sample()), 1.0);
    }

    #[test]
    fn test_language_only_difference() {
        let other = sample().with_language("de");
        let similarity = calculate_similarity(&sample(), &other);
        assert!(similarity < 1.0 && similarity > 0.0);
        assert!((similarity - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_domain_containment_is_half_credit() {
        let other = sample().with_domain("technical-docs");
        let similarity = calculate_similarity(&sample(), &other);
        assert!((similarity - 0.85).abs() < 1e-12);
    }

    #[test]
    fn test_empty_domain_gets_no_containment_credit() {
        let a = sample().with_domain("");
        let similarity = calculate_similarity(&a, &sample());
        assert!((similarity - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_attributes_are_skipped() {
        let a = TextCharacteristics::default()
            .with_language("en")
            .with_domain("news");
        let b = TextCharacteristics::new(5_000, "en", "news", 0.9);
        // only language and domain apply
        assert_eq!(calculate_similarity(&a, &b), 1.0);
    }

    #[test]
    fn test_length_ratio() {
        let a = sample().with_length(1_000);
        let b = sample().with_length(4_000);
        // 0.25 * 0.3 + 0.2 + 0.3 + 0.2 = 0.775
        assert!((calculate_similarity(&a, &b) - 0.775).abs() < 1e-12);
    }

    #[test]
    fn test_zero_lengths_match() {
        let a = sample().with_length(0);
        assert_eq!(calculate_similarity(&a, &a.clone()), 1.0);
    }
}
