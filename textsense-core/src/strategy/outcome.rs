//! Recorded results of past selections

use super::characteristics::{RequirementSpec, TextCharacteristics};
use super::types::Strategy;
use crate::telemetry::quality::clamp_unit;
use serde::{Deserialize, Serialize};

/// How well a run met the caller's trade-offs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimizationScore {
    /// Combined score in [0, 1]; drives preference updates
    pub overall: f64,
    /// Quality component in [0, 1]
    pub quality: f64,
    /// Speed component in [0, 1]
    pub speed: f64,
    /// Memory component in [0, 1]
    pub memory: f64,
}

impl OptimizationScore {
    /// Score where every component equals `overall`
    pub fn uniform(overall: f64) -> Self {
        let overall = clamp_unit(overall);
        Self {
            overall,
            quality: overall,
            speed: overall,
            memory: overall,
        }
    }

    /// Combine components by the requirement's trade-off weights
    pub fn weighted(
        quality: f64,
        speed: f64,
        memory: f64,
        requirements: &RequirementSpec,
    ) -> Self {
        let quality = clamp_unit(quality);
        let speed = clamp_unit(speed);
        let memory = clamp_unit(memory);
        let (wq, ws, wm) = requirements.normalized_weights();

        Self {
            overall: clamp_unit(quality * wq + speed * ws + memory * wm),
            quality,
            speed,
            memory,
        }
    }
}

/// One past selection and how it turned out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// Position in the selector's recording order, starting at 0
    pub sequence: u64,
    /// The input that was analyzed
    pub characteristics: TextCharacteristics,
    /// The strategy that was used
    pub strategy: Strategy,
    /// Measured optimization score
    pub score: OptimizationScore,
    /// Whether the caller found the result satisfactory
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_clamps() {
        let score = OptimizationScore::uniform(1.4);
        assert_eq!(score.overall, 1.0);
        assert_eq!(score.speed, 1.0);
    }

    #[test]
    fn test_weighted_uses_requirement_weights() {
        let req = RequirementSpec::default().with_weights(1.0, 0.0, 0.0);
        let score = OptimizationScore::weighted(0.9, 0.1, 0.1, &req);
        assert!((score.overall - 0.9).abs() < 1e-12);

        let req = RequirementSpec::default().with_weights(1.0, 1.0, 0.0);
        let score = OptimizationScore::weighted(0.8, 0.4, 0.0, &req);
        assert!((score.overall - 0.6).abs() < 1e-12);
    }
}
