//! Learned preference scalars

use super::types::StrategyName;
use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How preference values evolve between updates
///
/// The default policy applies neither decay nor bounds, so repeated
/// outcomes keep pushing a preference in the same direction. Long-running
/// processes can set `decay < 1` to let old evidence fade, `clamp` to cap
/// the magnitude, or both.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferencePolicy {
    /// Multiplier applied to every stored preference before an update,
    /// in (0, 1]
    pub decay: f64,
    /// Symmetric bound on updated values
    pub clamp: Option<f64>,
}

impl Default for PreferencePolicy {
    fn default() -> Self {
        Self {
            decay: 1.0,
            clamp: None,
        }
    }
}

impl PreferencePolicy {
    /// No decay, values bounded to `[-limit, limit]`
    pub fn bounded(limit: f64) -> Self {
        Self {
            decay: 1.0,
            clamp: Some(limit),
        }
    }

    /// Check the policy parameters
    pub fn validate(&self) -> Result<()> {
        if !(self.decay > 0.0 && self.decay <= 1.0) {
            return Err(CoreError::InvalidConfig {
                reason: format!("preference decay must be within (0, 1], got {}", self.decay),
            });
        }
        if let Some(limit) = self.clamp {
            if !(limit > 0.0 && limit.is_finite()) {
                return Err(CoreError::InvalidConfig {
                    reason: format!("preference clamp must be a positive number, got {limit}"),
                });
            }
        }
        Ok(())
    }

    fn bound(&self, value: f64) -> f64 {
        match self.clamp {
            Some(limit) => value.clamp(-limit, limit),
            None => value,
        }
    }
}

/// Signed adjustments keyed by strategy name or `domain_<domain>_<strategy>`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreferenceTable {
    values: BTreeMap<String, f64>,
}

impl PreferenceTable {
    /// Key for a strategy's own preference
    pub fn strategy_key(name: StrategyName) -> String {
        name.as_str().to_string()
    }

    /// Key for a strategy's preference within one domain
    pub fn domain_key(domain: &str, name: StrategyName) -> String {
        format!("domain_{domain}_{}", name.as_str())
    }

    /// Current value of a key; unknown keys are 0
    pub fn get(&self, key: &str) -> f64 {
        self.values.get(key).copied().unwrap_or(0.0)
    }

    /// Preference for a strategy name
    pub fn for_strategy(&self, name: StrategyName) -> f64 {
        self.get(name.as_str())
    }

    /// Preference for a strategy within a domain
    pub fn for_domain(&self, domain: &str, name: StrategyName) -> f64 {
        self.get(&Self::domain_key(domain, name))
    }

    /// Apply decay to all entries
    pub(crate) fn decay_all(&mut self, policy: &PreferencePolicy) {
        if policy.decay < 1.0 {
            for value in self.values.values_mut() {
                *value *= policy.decay;
            }
        }
    }

    /// Add `delta` to one entry, bounded by the policy
    pub(crate) fn adjust(&mut self, key: String, delta: f64, policy: &PreferencePolicy) -> f64 {
        let entry = self.values.entry(key).or_insert(0.0);
        *entry = policy.bound(*entry + delta);
        *entry
    }

    /// All entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no preference has been learned
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
