//! Specification validation.
//!
//! Every check runs once, when a document is loaded, and the first
//! failure aborts loading. Checks run in this order:
//!
//! 1. finite fields: non-empty, probabilities finite, non-negative and
//!    summing to 1 within [`PROBABILITY_TOLERANCE`]
//! 2. distribution fields: parameters parse and are in range
//! 3. factors: shape, multiplier sign, field and value references
//! 4. factor graph: no cycles, then declaration order
//! 5. overrides, transforms and metadata

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use super::{
    DistributionOverride, FactorGraph, FactorTable, ProbabilityTable, RawOverride, RawSamplingConfig,
    SamplingConfig, TraitTransforms,
};
use crate::distribution::Distribution;
use crate::error::ValidationError;
use crate::value::FieldValue;

/// Allowed deviation of a finite field's probability sum from 1.0.
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Validates a raw document and builds the immutable config.
pub fn validate(raw: RawSamplingConfig) -> Result<SamplingConfig, ValidationError> {
    let RawSamplingConfig {
        base_probabilities_finite,
        base_probabilities_distributions,
        factors,
        override_distributions,
        transform_distributions,
        metadata,
    } = raw;

    for (field, table) in &base_probabilities_finite {
        validate_probabilities(field, table)?;
    }
    let distributions = parse_distributions(&base_probabilities_distributions, &base_probabilities_finite)?;

    let factors = parse_factors(&factors)?;
    validate_factor_references(&factors, &base_probabilities_finite)?;
    detect_cycles(&factors)?;
    validate_factor_order(&factors)?;

    let overrides = parse_overrides(&override_distributions, &base_probabilities_finite, &distributions)?;
    validate_transforms(&transform_distributions, &base_probabilities_finite, &distributions, &overrides)?;
    validate_metadata(&metadata, &base_probabilities_finite, &distributions)?;

    debug!(
        finite_fields = base_probabilities_finite.len(),
        distribution_fields = distributions.len(),
        factor_sources = factors.len(),
        overrides = overrides.len(),
        "sampling config validated"
    );

    Ok(SamplingConfig {
        base_probabilities_finite,
        base_probabilities_distributions: distributions,
        factors,
        override_distributions: overrides,
        transform_distributions,
        metadata,
    })
}

/// Checks one finite field's base probabilities.
pub fn validate_probabilities(field: &str, table: &ProbabilityTable) -> Result<(), ValidationError> {
    if table.is_empty() {
        return Err(ValidationError::EmptyField {
            field: field.to_string(),
        });
    }
    for (value, &probability) in table {
        if !probability.is_finite() || probability < 0.0 {
            return Err(ValidationError::InvalidProbability {
                field: field.to_string(),
                value: value.clone(),
                probability,
            });
        }
    }
    let total: f64 = table.values().sum();
    if (total - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(ValidationError::ProbabilitySum {
            field: field.to_string(),
            total,
        });
    }
    Ok(())
}

fn parse_distributions(
    raw: &IndexMap<String, Value>,
    finite: &IndexMap<String, ProbabilityTable>,
) -> Result<IndexMap<String, Distribution>, ValidationError> {
    let mut out = IndexMap::with_capacity(raw.len());
    for (field, value) in raw {
        if finite.contains_key(field) {
            return Err(ValidationError::InvalidField {
                field: field.clone(),
                reason: "declared as both a finite and a distribution field".to_string(),
            });
        }
        let dist = Distribution::parse(value).map_err(|e| e.in_field(field))?;
        out.insert(field.clone(), dist);
    }
    Ok(out)
}

fn object<'a>(value: &'a Value, path: &str, expected: &str) -> Result<&'a serde_json::Map<String, Value>, ValidationError> {
    value.as_object().ok_or_else(|| ValidationError::MalformedFactor {
        path: path.to_string(),
        reason: format!("expected {expected}, got {value}"),
    })
}

/// Decodes the nested factor mapping, checking shape and multipliers.
pub fn parse_factors(raw: &IndexMap<String, Value>) -> Result<FactorGraph, ValidationError> {
    let mut graph = FactorGraph::with_capacity(raw.len());
    for (source, targets) in raw {
        let targets = object(targets, source, "a map of target fields")?;
        let mut by_target = IndexMap::with_capacity(targets.len());
        for (target, table) in targets {
            let path = format!("{source}.{target}");
            let table = object(table, &path, "a map of source values")?;
            let mut rows = FactorTable::with_capacity(table.len());
            for (source_value, multipliers) in table {
                let path = format!("{source}.{target}.{source_value}");
                let multipliers = object(multipliers, &path, "a map of target values to multipliers")?;
                let mut row = IndexMap::with_capacity(multipliers.len());
                for (target_value, multiplier) in multipliers {
                    let path = format!("{path}.{target_value}");
                    let Some(m) = multiplier.as_f64() else {
                        return Err(ValidationError::MalformedFactor {
                            path,
                            reason: format!("multiplier must be a number, got {multiplier}"),
                        });
                    };
                    if !m.is_finite() || m < 0.0 {
                        return Err(ValidationError::InvalidMultiplier { path, multiplier: m });
                    }
                    row.insert(target_value.clone(), m);
                }
                rows.insert(source_value.clone(), row);
            }
            by_target.insert(target.clone(), rows);
        }
        graph.insert(source.clone(), by_target);
    }
    Ok(graph)
}

/// Sources and targets must be finite fields; every value must be declared.
pub fn validate_factor_references(
    factors: &FactorGraph,
    finite: &IndexMap<String, ProbabilityTable>,
) -> Result<(), ValidationError> {
    let declared = |field: &str| {
        finite.get(field).ok_or_else(|| ValidationError::UnknownFactorField {
            field: field.to_string(),
        })
    };
    for (source, targets) in factors {
        let source_values = declared(source)?;
        for (target, table) in targets {
            let target_values = declared(target)?;
            for (source_value, row) in table {
                if !source_values.contains_key(source_value) {
                    return Err(ValidationError::UnknownFactorValue {
                        field: source.clone(),
                        value: source_value.clone(),
                    });
                }
                if let Some(target_value) = row.keys().find(|v| !target_values.contains_key(*v)) {
                    return Err(ValidationError::UnknownFactorValue {
                        field: target.clone(),
                        value: target_value.clone(),
                    });
                }
            }
        }
    }
    Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Visiting,
    Visited,
}

/// Rejects cycles in the source → target graph (three-color DFS).
pub fn detect_cycles(factors: &FactorGraph) -> Result<(), ValidationError> {
    let mut marks: IndexMap<&str, Mark> = factors.keys().map(|k| (k.as_str(), Mark::Unvisited)).collect();
    for node in factors.keys() {
        if marks.get(node.as_str()) == Some(&Mark::Unvisited) {
            visit(node, factors, &mut marks)?;
        }
    }
    Ok(())
}

fn visit<'a>(node: &'a str, factors: &'a FactorGraph, marks: &mut IndexMap<&'a str, Mark>) -> Result<(), ValidationError> {
    marks.insert(node, Mark::Visiting);
    if let Some(targets) = factors.get(node) {
        for next in targets.keys() {
            match marks.get(next.as_str()).copied().unwrap_or(Mark::Unvisited) {
                Mark::Visiting => {
                    return Err(ValidationError::FactorCycle {
                        from: node.to_string(),
                        to: next.clone(),
                    })
                }
                Mark::Unvisited => visit(next, factors, marks)?,
                Mark::Visited => {}
            }
        }
    }
    marks.insert(node, Mark::Visited);
    Ok(())
}

/// A target that is itself a factor source must be declared after every
/// source that influences it.
pub fn validate_factor_order(factors: &FactorGraph) -> Result<(), ValidationError> {
    for (source_position, (source, targets)) in factors.iter().enumerate() {
        for target in targets.keys() {
            if let Some(target_position) = factors.get_index_of(target) {
                if target_position <= source_position {
                    return Err(ValidationError::FactorOrder {
                        source_field: source.clone(),
                        target: target.clone(),
                        source_position,
                        target_position,
                    });
                }
            }
        }
    }
    Ok(())
}

fn parse_overrides(
    raw: &[RawOverride],
    finite: &IndexMap<String, ProbabilityTable>,
    distributions: &IndexMap<String, Distribution>,
) -> Result<Vec<DistributionOverride>, ValidationError> {
    let mut out = Vec::with_capacity(raw.len());
    for (index, o) in raw.iter().enumerate() {
        if !distributions.contains_key(&o.field) {
            return Err(ValidationError::UnknownOverrideField {
                index,
                field: o.field.clone(),
            });
        }
        for (key, label) in &o.condition {
            let values = finite.get(key).ok_or_else(|| ValidationError::UnknownConditionField {
                index,
                field: key.clone(),
            })?;
            if !values.contains_key(label) {
                return Err(ValidationError::UnknownConditionValue {
                    index,
                    field: key.clone(),
                    value: label.clone(),
                });
            }
        }
        let distribution = Distribution::parse(&o.distribution).map_err(|e| e.in_field(&o.field))?;
        out.push(DistributionOverride {
            condition: o.condition.clone(),
            field: o.field.clone(),
            distribution,
        });
    }
    Ok(out)
}

fn validate_transforms(
    transforms: &IndexMap<String, TraitTransforms>,
    finite: &IndexMap<String, ProbabilityTable>,
    distributions: &IndexMap<String, Distribution>,
    overrides: &[DistributionOverride],
) -> Result<(), ValidationError> {
    let invalid = |path: String, reason: String| ValidationError::InvalidTransform { path, reason };

    for (field, traits) in transforms {
        let Some(base) = distributions.get(field) else {
            return Err(invalid(field.clone(), "not a declared distribution field".to_string()));
        };
        let candidates = std::iter::once(base).chain(
            overrides
                .iter()
                .filter(|o| &o.field == field)
                .map(|o| &o.distribution),
        );
        for dist in candidates {
            if !dist.is_transformable() {
                return Err(invalid(
                    field.clone(),
                    format!("{} distributions cannot be transformed", dist.kind()),
                ));
            }
        }

        for (trait_field, by_value) in traits {
            let Some(values) = finite.get(trait_field) else {
                return Err(invalid(
                    format!("{field}.{trait_field}"),
                    "trait field is not a declared finite field".to_string(),
                ));
            };
            for (trait_value, transform) in by_value {
                let path = format!("{field}.{trait_field}.{trait_value}");
                if !values.contains_key(trait_value) {
                    return Err(invalid(path, format!("'{trait_value}' is not a declared value of '{trait_field}'")));
                }
                transform.validate(&path)?;
            }
        }
    }
    Ok(())
}

fn validate_metadata(
    metadata: &IndexMap<String, FieldValue>,
    finite: &IndexMap<String, ProbabilityTable>,
    distributions: &IndexMap<String, Distribution>,
) -> Result<(), ValidationError> {
    match metadata
        .keys()
        .find(|k| finite.contains_key(*k) || distributions.contains_key(*k))
    {
        Some(key) => Err(ValidationError::MetadataCollision { key: key.clone() }),
        None => Ok(()),
    }
}
