//! Inputs to strategy selection: what the text looks like and what the
//! caller needs

use serde::{Deserialize, Serialize};

/// Description of one input text
///
/// `length` and `complexity` are optional: an unknown value skips the
/// selection rules and similarity terms that depend on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextCharacteristics {
    /// Length in characters
    pub length: Option<usize>,
    /// Language tag such as `en` or `ja`
    pub language: String,
    /// Free-form domain tag such as `technical` or `social-media`
    pub domain: String,
    /// Complexity score in [0, 1]
    pub complexity: Option<f64>,
    /// Structure tag such as `plain`, `list` or `dialogue`
    pub structure: String,
}

impl Default for TextCharacteristics {
    fn default() -> Self {
        Self {
            length: None,
            language: "und".to_string(),
            domain: "general".to_string(),
            complexity: None,
            structure: "plain".to_string(),
        }
    }
}

impl TextCharacteristics {
    /// Characteristics with a known length and complexity
    pub fn new(
        length: usize,
        language: impl Into<String>,
        domain: impl Into<String>,
        complexity: f64,
    ) -> Self {
        Self {
            length: Some(length),
            language: language.into(),
            domain: domain.into(),
            complexity: Some(complexity.clamp(0.0, 1.0)),
            ..Default::default()
        }
    }

    /// Set the length
    pub fn with_length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    /// Set the language tag
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the domain tag
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Set the complexity, clamped into [0, 1]
    pub fn with_complexity(mut self, complexity: f64) -> Self {
        self.complexity = Some(complexity.clamp(0.0, 1.0));
        self
    }

    /// Set the structure tag
    pub fn with_structure(mut self, structure: impl Into<String>) -> Self {
        self.structure = structure.into();
        self
    }
}

/// What the caller needs from a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequirementSpec {
    /// Minimum acceptable quality in [0, 1]
    pub min_quality: f64,
    /// Time budget in milliseconds; 0 means unbounded
    pub max_time_ms: u64,
    /// Memory budget in MB; 0 means unbounded
    pub max_memory_mb: u64,
    /// Relative weight of quality in the optimization score
    pub quality_weight: f64,
    /// Relative weight of speed in the optimization score
    pub speed_weight: f64,
    /// Relative weight of memory in the optimization score
    pub memory_weight: f64,
}

impl Default for RequirementSpec {
    fn default() -> Self {
        Self {
            min_quality: 0.0,
            max_time_ms: 0,
            max_memory_mb: 0,
            quality_weight: 0.5,
            speed_weight: 0.3,
            memory_weight: 0.2,
        }
    }
}

impl RequirementSpec {
    /// Require at least this quality
    pub fn with_min_quality(mut self, min_quality: f64) -> Self {
        self.min_quality = min_quality;
        self
    }

    /// Bound wall-clock time
    pub fn with_max_time_ms(mut self, max_time_ms: u64) -> Self {
        self.max_time_ms = max_time_ms;
        self
    }

    /// Bound memory
    pub fn with_max_memory_mb(mut self, max_memory_mb: u64) -> Self {
        self.max_memory_mb = max_memory_mb;
        self
    }

    /// Set the quality/speed/memory trade-off weights
    pub fn with_weights(mut self, quality: f64, speed: f64, memory: f64) -> Self {
        self.quality_weight = quality;
        self.speed_weight = speed;
        self.memory_weight = memory;
        self
    }

    /// Whether a time budget applies
    pub fn has_time_budget(&self) -> bool {
        self.max_time_ms > 0
    }

    /// Whether a memory budget applies
    pub fn has_memory_budget(&self) -> bool {
        self.max_memory_mb > 0
    }

    /// Weights scaled to sum to 1; negative weights count as 0 and an
    /// all-zero set falls back to equal thirds
    pub fn normalized_weights(&self) -> (f64, f64, f64) {
        let q = self.quality_weight.max(0.0);
        let s = self.speed_weight.max(0.0);
        let m = self.memory_weight.max(0.0);
        let total = q + s + m;
        if total <= f64::EPSILON || !total.is_finite() {
            return (1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0);
        }
        (q / total, s / total, m / total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_methods() {
        let chars = TextCharacteristics::default()
            .with_length(500)
            .with_language("en")
            .with_domain("technical")
            .with_complexity(1.4)
            .with_structure("list");

        assert_eq!(chars.length, Some(500));
        assert_eq!(chars.complexity, Some(1.0));
        assert_eq!(chars.domain, "technical");
        assert_eq!(chars.structure, "list");
    }

    #[test]
    fn test_default_requirements_are_unbounded() {
        let req = RequirementSpec::default();
        assert!(!req.has_time_budget());
        assert!(!req.has_memory_budget());
        assert_eq!(req.min_quality, 0.0);
    }

    #[test]
    fn test_normalized_weights() {
        let (q, s, m) = RequirementSpec::default()
            .with_weights(2.0, 1.0, 1.0)
            .normalized_weights();
        assert_eq!((q, s, m), (0.5, 0.25, 0.25));

        let (q, s, m) = RequirementSpec::default()
            .with_weights(0.0, 0.0, -1.0)
            .normalized_weights();
        assert!((q - 1.0 / 3.0).abs() < 1e-12);
        assert!((s - 1.0 / 3.0).abs() < 1e-12);
        assert!((m - 1.0 / 3.0).abs() < 1e-12);
    }
}
