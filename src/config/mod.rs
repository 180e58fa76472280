//! Sampling specifications.
//!
//! A specification is a JSON document with six sections:
//!
//! ```json
//! {
//!   "base_probabilities_finite":        { "field": { "value": 0.5, ... } },
//!   "base_probabilities_distributions": { "field": { "type": "normal", ... } },
//!   "factors":                          { "source": { "target": { "source_value": { "target_value": 2.0 } } } },
//!   "override_distributions":           [ { "condition": { ... }, "field": "...", "distribution": { ... } } ],
//!   "transform_distributions":          { "field": { "trait_field": { "trait_value": { "mean_shift": 1.0 } } } },
//!   "metadata":                         { "key": "constant" }
//! }
//! ```
//!
//! The document decodes into a [`RawSamplingConfig`]. Validation turns it
//! into a [`SamplingConfig`], which is immutable and the only form the
//! samplers accept. Every map keeps declaration order.

pub mod serialization;
pub mod validation;

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;

use crate::distribution::{Distribution, DistributionTransform};
use crate::entity::SampledFields;
use crate::error::{SamplerError, SamplerResult, ValidationError};
use crate::value::FieldValue;

/// Value label → base probability for one finite field.
pub type ProbabilityTable = IndexMap<String, f64>;

/// Source value → target value → multiplier.
pub type FactorTable = IndexMap<String, IndexMap<String, f64>>;

/// Source field → target field → [`FactorTable`].
pub type FactorGraph = IndexMap<String, IndexMap<String, FactorTable>>;

/// Trait field → trait value → transform, for one distribution field.
pub type TraitTransforms = IndexMap<String, IndexMap<String, DistributionTransform>>;

/// Conditional override as it appears in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawOverride {
    #[serde(default)]
    pub condition: IndexMap<String, String>,
    pub field: String,
    pub distribution: serde_json::Value,
}

/// Unvalidated specification document.
///
/// Distributions and factors are kept as raw JSON so that malformed entries
/// surface as [`ValidationError`]s with a path rather than decode errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSamplingConfig {
    #[serde(default)]
    pub base_probabilities_finite: IndexMap<String, ProbabilityTable>,
    #[serde(default)]
    pub base_probabilities_distributions: IndexMap<String, serde_json::Value>,
    #[serde(default)]
    pub factors: IndexMap<String, serde_json::Value>,
    #[serde(default)]
    pub override_distributions: Vec<RawOverride>,
    #[serde(default)]
    pub transform_distributions: IndexMap<String, TraitTransforms>,
    #[serde(default)]
    pub metadata: IndexMap<String, FieldValue>,
}

impl RawSamplingConfig {
    /// Runs every specification check and returns the validated config.
    pub fn validate(self) -> Result<SamplingConfig, ValidationError> {
        validation::validate(self)
    }
}

/// Replacement distribution used when `condition` holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionOverride {
    pub condition: IndexMap<String, String>,
    pub field: String,
    pub distribution: Distribution,
}

impl DistributionOverride {
    /// True if this override targets `field` and every condition entry is
    /// already sampled with the required label.
    #[must_use]
    pub fn matches(&self, field: &str, sampled: &SampledFields) -> bool {
        self.field == field
            && self
                .condition
                .iter()
                .all(|(key, label)| sampled.get(key).is_some_and(|v| v.is_label(label)))
    }
}

/// A validated sampling specification.
///
/// Immutable once built; share it by reference across workers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SamplingConfig {
    pub(crate) base_probabilities_finite: IndexMap<String, ProbabilityTable>,
    pub(crate) base_probabilities_distributions: IndexMap<String, Distribution>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub(crate) factors: FactorGraph,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) override_distributions: Vec<DistributionOverride>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub(crate) transform_distributions: IndexMap<String, TraitTransforms>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub(crate) metadata: IndexMap<String, FieldValue>,
}

impl SamplingConfig {
    /// Decodes and validates a JSON document.
    pub fn from_json(json: &str) -> SamplerResult<Self> {
        serialization::from_json(json)
    }

    /// Decodes and validates an already-parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> SamplerResult<Self> {
        let raw: RawSamplingConfig = serde_json::from_value(value).map_err(|e| SamplerError::Decode {
            message: e.to_string(),
        })?;
        Ok(raw.validate()?)
    }

    /// Reads, decodes and validates a JSON file.
    pub fn load(path: impl AsRef<Path>) -> SamplerResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        info!(
            path = %path.display(),
            finite_fields = config.base_probabilities_finite.len(),
            distribution_fields = config.base_probabilities_distributions.len(),
            factors = config.factors.len(),
            overrides = config.override_distributions.len(),
            "loaded sampling config"
        );
        Ok(config)
    }

    /// Serializes to pretty JSON. Loading the output yields an equal config.
    pub fn to_json_pretty(&self) -> SamplerResult<String> {
        serialization::to_json_pretty(self)
    }

    #[must_use]
    pub fn finite_fields(&self) -> &IndexMap<String, ProbabilityTable> {
        &self.base_probabilities_finite
    }

    #[must_use]
    pub fn distribution_fields(&self) -> &IndexMap<String, Distribution> {
        &self.base_probabilities_distributions
    }

    #[must_use]
    pub fn factors(&self) -> &FactorGraph {
        &self.factors
    }

    #[must_use]
    pub fn overrides(&self) -> &[DistributionOverride] {
        &self.override_distributions
    }

    #[must_use]
    pub fn transforms(&self) -> &IndexMap<String, TraitTransforms> {
        &self.transform_distributions
    }

    #[must_use]
    pub fn metadata(&self) -> &IndexMap<String, FieldValue> {
        &self.metadata
    }

    /// Base probabilities of a finite field.
    #[must_use]
    pub fn probabilities(&self, field: &str) -> Option<&ProbabilityTable> {
        self.base_probabilities_finite.get(field)
    }

    /// Base distribution of a continuous field.
    #[must_use]
    pub fn distribution(&self, field: &str) -> Option<&Distribution> {
        self.base_probabilities_distributions.get(field)
    }

    #[must_use]
    pub fn is_finite(&self, field: &str) -> bool {
        self.base_probabilities_finite.contains_key(field)
    }

    #[must_use]
    pub fn is_distribution(&self, field: &str) -> bool {
        self.base_probabilities_distributions.contains_key(field)
    }

    /// Number of keys an entity carries: sampled fields plus metadata.
    #[must_use]
    pub fn entity_width(&self) -> usize {
        self.base_probabilities_finite.len() + self.base_probabilities_distributions.len() + self.metadata.len()
    }
}

impl<'de> Deserialize<'de> for SamplingConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawSamplingConfig::deserialize(deserializer)?
            .validate()
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn pets() -> serde_json::Value {
        json!({
            "base_probabilities_finite": {
                "species": {"cat": 0.5, "dog": 0.5},
                "size": {"small": 0.6, "large": 0.4}
            },
            "base_probabilities_distributions": {
                "weight": {"type": "normal", "mean": 8.0, "std": 2.0}
            },
            "factors": {
                "species": {"size": {"dog": {"large": 3.0}}}
            },
            "override_distributions": [
                {"condition": {"size": "large"}, "field": "weight", "distribution": {"type": "normal", "mean": 25.0, "std": 5.0}}
            ],
            "transform_distributions": {
                "weight": {"species": {"cat": {"std_mult": 0.5}}}
            },
            "metadata": {"world": "test"}
        })
    }

    #[test]
    fn from_value_validates_and_keeps_order() {
        let config = SamplingConfig::from_value(pets()).unwrap();
        let finite: Vec<&str> = config.finite_fields().keys().map(String::as_str).collect();
        assert_eq!(finite, vec!["species", "size"]);
        assert!(config.is_finite("size"));
        assert!(config.is_distribution("weight"));
        assert_eq!(config.factors()["species"]["size"]["dog"]["large"], 3.0);
        assert_eq!(config.overrides().len(), 1);
        assert_eq!(config.entity_width(), 4);
    }

    #[test]
    fn from_value_surfaces_validation_errors() {
        let mut doc = pets();
        doc["base_probabilities_finite"]["size"]["large"] = json!(0.2);
        let err = SamplingConfig::from_value(doc).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn decode_errors_are_not_validation_errors() {
        let err = SamplingConfig::from_json("{\"base_probabilities_finite\": 3}").unwrap_err();
        assert!(matches!(err, SamplerError::Decode { .. }));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", pets()).unwrap();
        let config = SamplingConfig::load(file.path()).unwrap();
        assert_eq!(config.metadata()["world"], FieldValue::from("test"));

        let missing = SamplingConfig::load(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(SamplerError::Io(_))));
    }

    #[test]
    fn override_matching_requires_full_condition() {
        let config = SamplingConfig::from_value(pets()).unwrap();
        let o = &config.overrides()[0];
        let mut sampled = SampledFields::new();
        assert!(!o.matches("weight", &sampled));
        sampled.insert("size".to_string(), FieldValue::from("large"));
        assert!(o.matches("weight", &sampled));
        assert!(!o.matches("height", &sampled));
        sampled.insert("size".to_string(), FieldValue::from("small"));
        assert!(!o.matches("weight", &sampled));
    }

    #[test]
    fn config_deserializes_through_validation() {
        let config: SamplingConfig = serde_json::from_value(pets()).unwrap();
        assert_eq!(config, SamplingConfig::from_value(pets()).unwrap());

        let mut doc = pets();
        doc["factors"]["species"]["size"]["dog"]["large"] = json!(-1.0);
        assert!(serde_json::from_value::<SamplingConfig>(doc).is_err());
    }
}
