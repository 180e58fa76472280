//! Factor-adjusted probabilities for a single finite field.

use tracing::{debug, trace};

use crate::config::{FactorGraph, ProbabilityTable};
use crate::entity::SampledFields;
use crate::value::FieldValue;

/// Adjusts `base` for `target_field` by every factor whose source field is
/// already sampled, then renormalizes.
///
/// For each source field with an entry for `target_field`, the multipliers
/// registered under the source's sampled label are applied to the matching
/// target values. Sources not yet sampled are skipped, as are multipliers for
/// values `base` does not contain. Multipliers compose by multiplication, so
/// the order in which sources are visited does not change the result.
///
/// If every adjusted probability is zero the all-zero table is returned
/// unnormalized; callers decide how to treat it. Products that overflow
/// `f64` are recomputed in log space, so large but valid multipliers still
/// yield a proper distribution.
#[must_use]
pub fn apply_factor_multipliers(
    base: &ProbabilityTable,
    target_field: &str,
    sampled: &SampledFields,
    factors: &FactorGraph,
) -> ProbabilityTable {
    let mut adjusted = combine(base, target_field, sampled, factors, |p| p, |p, m| p * m);
    let mut total: f64 = adjusted.values().sum();

    if !total.is_finite() {
        debug!(field = target_field, "factor product overflowed, rescaling in log space");
        adjusted = combine(base, target_field, sampled, factors, f64::ln, |p, m| p + m.ln());
        let max = adjusted.values().copied().fold(f64::NEG_INFINITY, f64::max);
        for p in adjusted.values_mut() {
            *p = if max == f64::NEG_INFINITY { 0.0 } else { (*p - max).exp() };
        }
        total = adjusted.values().sum();
    }

    if total > 0.0 {
        for p in adjusted.values_mut() {
            *p /= total;
        }
    }
    adjusted
}

/// Folds every applicable multiplier into `base`, with `lift` mapping base
/// probabilities into the working space and `apply` composing one multiplier.
fn combine(
    base: &ProbabilityTable,
    target_field: &str,
    sampled: &SampledFields,
    factors: &FactorGraph,
    lift: impl Fn(f64) -> f64,
    apply: impl Fn(f64, f64) -> f64,
) -> ProbabilityTable {
    let mut adjusted: ProbabilityTable = base.iter().map(|(k, p)| (k.clone(), lift(*p))).collect();

    for (source, targets) in factors {
        let Some(table) = targets.get(target_field) else {
            continue;
        };
        let Some(label) = sampled.get(source).and_then(FieldValue::as_str) else {
            continue;
        };
        let Some(row) = table.get(label) else {
            continue;
        };
        for (target_value, multiplier) in row {
            if let Some(p) = adjusted.get_mut(target_value) {
                *p = apply(*p, *multiplier);
            }
        }
        trace!(source = %source, label, target = target_field, "applied factor");
    }
    adjusted
}
