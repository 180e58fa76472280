//! Sampled entity records.
//!
//! Sampling writes into a [`SampledFields`] accumulator that is created
//! fresh for every entity and owned by one generation call. Once sampling
//! finishes the accumulator is frozen into a [`SampledEntity`], which
//! downstream post-processors may only extend.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{SamplerError, SamplerResult, ValidationError};
use crate::value::FieldValue;

/// Per-entity working map from field name to sampled value.
///
/// Insertion order is the order fields were resolved in.
pub type SampledFields = IndexMap<String, FieldValue>;

/// A fully sampled entity.
///
/// # Examples
///
/// ```
/// use worldsample::{FieldValue, SampledEntity, SampledFields};
///
/// let mut fields = SampledFields::new();
/// fields.insert("species".to_string(), FieldValue::from("fox"));
///
/// let mut entity = SampledEntity::from_fields(fields);
/// entity.enrich("nickname", "Rusty").unwrap();
///
/// assert_eq!(entity.get("species"), Some(&FieldValue::from("fox")));
/// assert!(entity.enrich("species", "hawk").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SampledEntity {
    fields: SampledFields,
}

impl SampledEntity {
    /// Freezes a finished accumulator into an entity record.
    #[must_use]
    pub fn from_fields(fields: SampledFields) -> Self {
        Self { fields }
    }

    /// Returns the value of `field`, if present.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Returns true if `field` is present.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Iterates fields in resolution order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Adds a new key. Existing keys are never replaced or removed.
    pub fn enrich(
        &mut self,
        field: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Result<(), ValidationError> {
        let field = field.into();
        if self.fields.contains_key(&field) {
            return Err(ValidationError::InvalidField {
                field,
                reason: "already present; enrichment is add-only".to_string(),
            });
        }
        self.fields.insert(field, value.into());
        Ok(())
    }

    /// Returns the underlying map.
    #[must_use]
    pub fn into_fields(self) -> SampledFields {
        self.fields
    }

    /// Serializes the entity as a flat JSON object.
    pub fn to_json(&self) -> SamplerResult<String> {
        serde_json::to_string(self).map_err(|e| SamplerError::internal(format!("serialize entity: {e}")))
    }
}

impl fmt::Display for SampledEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity(")?;
        for (idx, (k, v)) in self.fields.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{k}={v}")?;
        }
        write!(f, ")")
    }
}

/// Post-processor that decorates a finished entity with derived keys
/// (names, identifiers, labels).
///
/// Enrichers run after all sampling and metadata copying. They receive the
/// entity mutably but can only add keys through [`SampledEntity::enrich`].
pub trait Enricher: Send + Sync {
    /// Adds derived keys to `entity`.
    fn enrich(&self, entity: &mut SampledEntity) -> SamplerResult<()>;
}

impl<F> Enricher for F
where
    F: Fn(&mut SampledEntity) -> SamplerResult<()> + Send + Sync,
{
    fn enrich(&self, entity: &mut SampledEntity) -> SamplerResult<()> {
        self(entity)
    }
}
