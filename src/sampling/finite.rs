//! Categorical field sampling.

use rand::distributions::{Distribution as _, WeightedIndex};
use rand::Rng;
use tracing::{debug, trace};

use super::factors::apply_factor_multipliers;
use crate::config::SamplingConfig;
use crate::entity::SampledFields;
use crate::error::SamplingError;
use crate::value::FieldValue;

/// Order in which finite fields are drawn.
///
/// Factor sources come first, in the factor mapping's declaration order,
/// followed by every other finite field in declaration order. Validation
/// guarantees a source is declared before any source it influences, so
/// every field is drawn after all of its conditioning fields.
#[must_use]
pub fn sampling_order(config: &SamplingConfig) -> Vec<&str> {
    let finite = config.finite_fields();
    let mut order: Vec<&str> = config
        .factors()
        .keys()
        .filter(|k| finite.contains_key(*k))
        .map(String::as_str)
        .collect();
    for field in finite.keys() {
        if !order.contains(&field.as_str()) {
            order.push(field);
        }
    }
    order
}

/// Draws every finite field not already present in `sampled`.
///
/// Each draw sees the fields drawn before it, so factors condition later
/// fields on earlier ones. Pre-seeded fields are left untouched and count
/// as sampled for conditioning.
///
/// # Errors
///
/// [`SamplingError::DegenerateProbabilities`] if factors drive every value
/// of a field to zero. Fields drawn before the failure stay in `sampled`.
pub fn sample_finite_fields<R: Rng + ?Sized>(
    config: &SamplingConfig,
    sampled: &mut SampledFields,
    rng: &mut R,
) -> Result<(), SamplingError> {
    for field in sampling_order(config) {
        if sampled.contains_key(field) {
            continue;
        }
        let Some(base) = config.probabilities(field) else {
            continue;
        };

        let adjusted = apply_factor_multipliers(base, field, sampled, config.factors());
        trace!(field, probabilities = ?adjusted, "adjusted probabilities");

        let degenerate = || SamplingError::DegenerateProbabilities {
            field: field.to_string(),
        };
        let weights = WeightedIndex::<f64>::new(adjusted.values()).map_err(|_| degenerate())?;
        let (label, _) = adjusted.get_index(weights.sample(rng)).ok_or_else(degenerate)?;

        debug!(field, value = %label, "sampled finite field");
        sampled.insert(field.to_string(), FieldValue::String(label.clone()));
    }
    Ok(())
}
