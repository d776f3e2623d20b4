//! Strategy bundles and the catalog that holds them

use crate::config::defaults;
use crate::error::{CoreError, Result};
use crate::telemetry::CallParams;
use serde::{Deserialize, Deserializer, Serialize};
use smallvec::{smallvec, SmallVec};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The closed set of strategy names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyName {
    /// Cheapest bundle, shallow analysis
    Fast,
    /// Middle ground between cost and quality
    Balanced,
    /// Deepest analysis, highest cost
    Comprehensive,
}

impl StrategyName {
    /// Every canonical name, cheapest first
    pub const ALL: [StrategyName; 3] = [
        StrategyName::Fast,
        StrategyName::Balanced,
        StrategyName::Comprehensive,
    ];

    /// Lower-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyName::Fast => "fast",
            StrategyName::Balanced => "balanced",
            StrategyName::Comprehensive => "comprehensive",
        }
    }
}

impl fmt::Display for StrategyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fast" => Ok(StrategyName::Fast),
            "balanced" => Ok(StrategyName::Balanced),
            "comprehensive" => Ok(StrategyName::Comprehensive),
            _ => Err(CoreError::InvalidStrategy {
                name: s.to_string(),
            }),
        }
    }
}

/// Optional analysis passes a collaborator may run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Core single-pass transform
    Basic,
    /// Frequency and negation-aware passes
    Statistical,
    /// Morphology, intensifiers and syllable-level detail
    Linguistic,
    /// Multi-token context such as phrases and positions
    Contextual,
}

/// Sub-algorithm set; four fit inline
pub type AlgorithmSet = SmallVec<[Algorithm; 4]>;

/// Parameters a collaborator reads to decide how much work to do
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyParameters {
    /// Processing depth in `MIN_DEPTH..=MAX_DEPTH`
    pub depth: u8,
    /// Target quality the collaborator should aim for
    pub quality: f64,
    /// Process in batches/streams to stay inside a memory budget
    #[serde(default)]
    pub streaming: bool,
    /// Sub-algorithms to run
    pub algorithms: AlgorithmSet,
}

impl StrategyParameters {
    /// Whether a sub-algorithm is enabled
    pub fn has(&self, algorithm: Algorithm) -> bool {
        self.algorithms.contains(&algorithm)
    }
}

/// Resource expectations for a strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceEnvelope {
    /// Memory the strategy needs at minimum, in MB
    pub min_memory_mb: u64,
    /// Memory the strategy may use at most, in MB
    pub max_memory_mb: u64,
    /// Estimated CPU time in milliseconds
    pub estimated_cpu_ms: f64,
    /// Whether remote resources are advisable
    pub use_network: bool,
    /// Whether caching intermediate results is advisable
    pub use_caching: bool,
}

/// A named parameter bundle with its quality/speed expectations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    /// Canonical name
    pub name: StrategyName,
    /// Expected quality in [0, 1]
    pub expected_quality: f64,
    /// Expected speed in [0, 1]; higher is faster
    pub expected_speed: f64,
    /// What the collaborator should do
    pub parameters: StrategyParameters,
    /// What the run is expected to cost
    pub resources: ResourceEnvelope,
}

impl Strategy {
    /// The canonical bundle for a name
    pub fn canonical(name: StrategyName) -> Self {
        match name {
            StrategyName::Fast => Self {
                name,
                expected_quality: 0.70,
                expected_speed: 0.95,
                parameters: StrategyParameters {
                    depth: 1,
                    quality: 0.70,
                    streaming: false,
                    algorithms: smallvec![Algorithm::Basic],
                },
                resources: ResourceEnvelope {
                    min_memory_mb: 16,
                    max_memory_mb: 64,
                    estimated_cpu_ms: 50.0,
                    use_network: false,
                    use_caching: false,
                },
            },
            StrategyName::Balanced => Self {
                name,
                expected_quality: 0.82,
                expected_speed: 0.70,
                parameters: StrategyParameters {
                    depth: 3,
                    quality: 0.80,
                    streaming: false,
                    algorithms: smallvec![Algorithm::Basic, Algorithm::Statistical],
                },
                resources: ResourceEnvelope {
                    min_memory_mb: 64,
                    max_memory_mb: 256,
                    estimated_cpu_ms: 250.0,
                    use_network: false,
                    use_caching: true,
                },
            },
            StrategyName::Comprehensive => Self {
                name,
                expected_quality: 0.92,
                expected_speed: 0.40,
                parameters: StrategyParameters {
                    depth: 4,
                    quality: 0.90,
                    streaming: false,
                    algorithms: smallvec![
                        Algorithm::Basic,
                        Algorithm::Statistical,
                        Algorithm::Linguistic,
                        Algorithm::Contextual
                    ],
                },
                resources: ResourceEnvelope {
                    min_memory_mb: 256,
                    max_memory_mb: 1024,
                    estimated_cpu_ms: 1500.0,
                    use_network: true,
                    use_caching: true,
                },
            },
        }
    }

    /// Parameters in the shape the telemetry store records
    pub fn call_params(&self) -> CallParams {
        let algorithms = self
            .parameters
            .algorithms
            .iter()
            .map(|a| format!("{a:?}").to_lowercase())
            .collect::<Vec<_>>()
            .join("+");

        CallParams::new()
            .with("strategy", self.name.as_str())
            .with("depth", self.parameters.depth)
            .with("target_quality", self.parameters.quality)
            .with("algorithms", algorithms)
            .with("streaming", self.parameters.streaming)
    }

    fn validate(&self, key: &str) -> Result<()> {
        let invalid = |reason: String| CoreError::InvalidConfig {
            reason: format!("strategy '{key}': {reason}"),
        };

        if self.name.as_str() != key {
            return Err(invalid(format!("name field is '{}'", self.name)));
        }
        if !(defaults::MIN_DEPTH..=defaults::MAX_DEPTH).contains(&self.parameters.depth) {
            return Err(invalid(format!(
                "depth {} outside {}..={}",
                self.parameters.depth,
                defaults::MIN_DEPTH,
                defaults::MAX_DEPTH
            )));
        }
        for (label, value) in [
            ("expected_quality", self.expected_quality),
            ("expected_speed", self.expected_speed),
            ("quality", self.parameters.quality),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(format!("{label} {value} outside [0, 1]")));
            }
        }
        if self.parameters.algorithms.is_empty() {
            return Err(invalid("no algorithms enabled".to_string()));
        }
        if self.resources.min_memory_mb > self.resources.max_memory_mb {
            return Err(invalid("min_memory_mb exceeds max_memory_mb".to_string()));
        }
        Ok(())
    }
}

/// Strategy bundles keyed by name
///
/// The default catalog holds the three canonical bundles. Deserialized
/// tables replace the bundle of the same name and leave the others at
/// their canonical values. A catalog must hold every [`StrategyName`] to
/// validate; selecting a missing bundle is an [`CoreError::InvalidStrategy`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StrategyCatalog {
    templates: BTreeMap<String, Strategy>,
}

impl<'de> Deserialize<'de> for StrategyCatalog {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let overrides = BTreeMap::<String, Strategy>::deserialize(deserializer)?;
        let mut catalog = StrategyCatalog::default();
        catalog.templates.extend(overrides);
        Ok(catalog)
    }
}

impl Default for StrategyCatalog {
    fn default() -> Self {
        let templates = StrategyName::ALL
            .iter()
            .map(|&name| (name.as_str().to_string(), Strategy::canonical(name)))
            .collect();
        Self { templates }
    }
}

impl StrategyCatalog {
    /// Catalog with no bundles
    pub fn empty() -> Self {
        Self {
            templates: BTreeMap::new(),
        }
    }

    /// A fresh copy of the bundle for `name`
    pub fn get(&self, name: StrategyName) -> Result<Strategy> {
        self.templates
            .get(name.as_str())
            .cloned()
            .ok_or_else(|| CoreError::InvalidStrategy {
                name: name.as_str().to_string(),
            })
    }

    /// Add or replace a bundle
    pub fn insert(&mut self, strategy: Strategy) {
        self.templates
            .insert(strategy.name.as_str().to_string(), strategy);
    }

    /// Remove a bundle, returning it if present
    pub fn remove(&mut self, name: StrategyName) -> Option<Strategy> {
        self.templates.remove(name.as_str())
    }

    /// Bundles in name order
    pub fn iter(&self) -> impl Iterator<Item = &Strategy> {
        self.templates.values()
    }

    /// Number of bundles
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the catalog has no bundles
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Check that every name has a bundle and every bundle's keys and ranges
    pub fn validate(&self) -> Result<()> {
        for name in StrategyName::ALL {
            if !self.templates.contains_key(name.as_str()) {
                return Err(CoreError::InvalidConfig {
                    reason: format!("strategy catalog has no '{name}' bundle"),
                });
            }
        }
        for (key, strategy) in &self.templates {
            StrategyName::from_str(key).map_err(|_| CoreError::InvalidConfig {
                reason: format!("unknown strategy '{key}' in catalog"),
            })?;
            strategy.validate(key)?;
        }
        Ok(())
    }
}
