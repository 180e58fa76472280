//! Continuous field sampling: base distribution, first matching override,
//! then trait transforms in declared order.

use std::borrow::Cow;

use rand::Rng;
use tracing::debug;

use crate::config::SamplingConfig;
use crate::distribution::Distribution;
use crate::entity::SampledFields;
use crate::error::SamplingError;
use crate::value::FieldValue;

/// Resolves the distribution a field is drawn from, given what has been
/// sampled so far.
///
/// The first override targeting `field` whose condition fully matches
/// replaces `base`. Every trait field with a transform registered for its
/// sampled value then transforms the working distribution, in the order
/// the trait fields are declared. `base` itself is never modified.
///
/// # Errors
///
/// Fails if a transform targets a distribution that cannot be transformed.
pub fn resolve_distribution<'a>(
    config: &'a SamplingConfig,
    field: &str,
    base: &'a Distribution,
    sampled: &SampledFields,
) -> Result<Cow<'a, Distribution>, SamplingError> {
    let overridden = config.overrides().iter().position(|o| o.matches(field, sampled));
    let mut dist = match overridden {
        Some(index) => Cow::Borrowed(&config.overrides()[index].distribution),
        None => Cow::Borrowed(base),
    };

    let mut applied = 0usize;
    if let Some(traits) = config.transforms().get(field) {
        for (trait_field, by_value) in traits {
            let transform = sampled
                .get(trait_field)
                .and_then(FieldValue::as_str)
                .and_then(|label| by_value.get(label));
            if let Some(transform) = transform {
                dist = Cow::Owned(dist.with_transform(transform)?);
                applied += 1;
            }
        }
    }

    debug!(
        field,
        kind = dist.kind(),
        override_index = ?overridden,
        transforms = applied,
        "resolved distribution"
    );
    Ok(dist)
}

/// Draws every continuous field not already present in `sampled`.
///
/// Fields are drawn in declaration order. Function-based and Bernoulli
/// distributions read their inputs from `sampled`, including fields drawn
/// earlier in this call.
///
/// # Errors
///
/// Propagates the first sampling error; fields drawn before it stay in
/// `sampled`.
pub fn sample_distribution_fields_with_overrides<R: Rng + ?Sized>(
    config: &SamplingConfig,
    sampled: &mut SampledFields,
    rng: &mut R,
) -> Result<(), SamplingError> {
    for (field, base) in config.distribution_fields() {
        if sampled.contains_key(field) {
            continue;
        }
        let dist = resolve_distribution(config, field, base, sampled)?;
        let value = dist.draw(&*sampled, rng)?;
        sampled.insert(field.clone(), value);
    }
    Ok(())
}
