//! Self-reported quality of one analysis call

use serde::{Deserialize, Serialize};

/// Accuracy, confidence and coverage reported by a collaborator
///
/// Values are meant to sit in [0, 1]. Producers occasionally overshoot,
/// so consumers call [`QualityRecord::clamped`] instead of rejecting them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityRecord {
    /// Estimated correctness of the result
    pub accuracy: f64,
    /// How sure the collaborator is of its own estimate
    pub confidence: f64,
    /// Share of the input the result accounts for
    pub coverage: f64,
}

impl QualityRecord {
    /// Create a record as reported, without clamping
    pub fn new(accuracy: f64, confidence: f64, coverage: f64) -> Self {
        Self {
            accuracy,
            confidence,
            coverage,
        }
    }

    /// Copy with every component clamped into [0, 1]; NaN becomes 0
    pub fn clamped(&self) -> Self {
        Self {
            accuracy: clamp_unit(self.accuracy),
            confidence: clamp_unit(self.confidence),
            coverage: clamp_unit(self.coverage),
        }
    }

    /// Whether any component falls outside [0, 1]
    pub fn is_out_of_range(&self) -> bool {
        [self.accuracy, self.confidence, self.coverage]
            .iter()
            .any(|v| !(0.0..=1.0).contains(v))
    }

    /// Unweighted mean of the three components after clamping
    pub fn overall(&self) -> f64 {
        let c = self.clamped();
        (c.accuracy + c.confidence + c.coverage) / 3.0
    }
}

/// Clamp into [0, 1], mapping NaN to 0
pub(crate) fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped() {
        let quality = QualityRecord::new(1.2, -0.1, 0.5).clamped();
        assert_eq!(quality, QualityRecord::new(1.0, 0.0, 0.5));
    }

    #[test]
    fn test_nan_clamps_to_zero() {
        let quality = QualityRecord::new(f64::NAN, 0.5, 0.5).clamped();
        assert_eq!(quality.accuracy, 0.0);
    }

    #[test]
    fn test_out_of_range() {
        assert!(QualityRecord::new(1.01, 0.5, 0.5).is_out_of_range());
        assert!(!QualityRecord::new(1.0, 0.0, 0.5).is_out_of_range());
    }

    #[test]
    fn test_overall() {
        let quality = QualityRecord::new(0.9, 0.6, 0.3);
        assert!((quality.overall() - 0.6).abs() < 1e-12);
    }
}
