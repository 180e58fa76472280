//! Closed-form functions used for function-evaluated means and noise scales.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{SamplingError, ValidationError};

/// Input handed to a [`FunctionConfig`].
///
/// Single-variable functions take a scalar. `multi_linear` takes a map of
/// field values keyed by field name.
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionInput {
    Scalar(f64),
    Fields(IndexMap<String, f64>),
}

impl Default for FunctionInput {
    fn default() -> Self {
        Self::Scalar(0.0)
    }
}

impl From<f64> for FunctionInput {
    fn from(v: f64) -> Self {
        Self::Scalar(v)
    }
}

/// A parameterized function of one or more sampled fields.
///
/// Serialized as `{"type": "...", "params": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "params", rename_all = "snake_case")]
pub enum FunctionConfig {
    /// `value`
    Constant { value: f64 },

    /// `slope * x + intercept`
    Linear { slope: f64, intercept: f64 },

    /// `base * e^(rate * x)`
    Exponential { base: f64, rate: f64 },

    /// `a * x^2 + b * x + c`
    Quadratic { a: f64, b: f64, c: f64 },

    /// `intercept + sum(coefficients[f] * x[f])`
    MultiLinear {
        intercept: f64,
        coefficients: IndexMap<String, f64>,
    },
}

impl FunctionConfig {
    /// Short name of the function type.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Constant { .. } => "constant",
            Self::Linear { .. } => "linear",
            Self::Exponential { .. } => "exponential",
            Self::Quadratic { .. } => "quadratic",
            Self::MultiLinear { .. } => "multi_linear",
        }
    }

    /// True if the function consumes a per-field map rather than a scalar.
    #[must_use]
    pub const fn is_multi_input(&self) -> bool {
        matches!(self, Self::MultiLinear { .. })
    }

    /// Fields a `multi_linear` function reads. Empty for scalar functions.
    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        let coefficients = match self {
            Self::MultiLinear { coefficients, .. } => Some(coefficients),
            _ => None,
        };
        coefficients.into_iter().flat_map(|c| c.keys().map(String::as_str))
    }

    /// Checks that every parameter is finite.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let params: Vec<(&str, f64)> = match self {
            Self::Constant { value } => vec![("value", *value)],
            Self::Linear { slope, intercept } => vec![("slope", *slope), ("intercept", *intercept)],
            Self::Exponential { base, rate } => vec![("base", *base), ("rate", *rate)],
            Self::Quadratic { a, b, c } => vec![("a", *a), ("b", *b), ("c", *c)],
            Self::MultiLinear {
                intercept,
                coefficients,
            } => {
                if coefficients.is_empty() {
                    return Err(ValidationError::InvalidFunction {
                        reason: "multi_linear requires at least one coefficient".to_string(),
                    });
                }
                std::iter::once(("intercept", *intercept))
                    .chain(coefficients.iter().map(|(k, v)| (k.as_str(), *v)))
                    .collect()
            }
        };
        for (name, value) in params {
            if !value.is_finite() {
                return Err(ValidationError::InvalidFunction {
                    reason: format!("{} parameter '{name}' must be finite (got {value})", self.kind()),
                });
            }
        }
        Ok(())
    }

    /// Evaluates the function.
    ///
    /// Scalar functions reject a field map and `multi_linear` rejects a
    /// scalar. `multi_linear` fails if any coefficient's field is absent.
    pub fn evaluate(&self, input: &FunctionInput) -> Result<f64, SamplingError> {
        let value = match (self, input) {
            (Self::Constant { value }, FunctionInput::Scalar(_)) => *value,
            (Self::Linear { slope, intercept }, FunctionInput::Scalar(x)) => slope * x + intercept,
            (Self::Exponential { base, rate }, FunctionInput::Scalar(x)) => base * (rate * x).exp(),
            (Self::Quadratic { a, b, c }, FunctionInput::Scalar(x)) => a * x * x + b * x + c,
            (
                Self::MultiLinear {
                    intercept,
                    coefficients,
                },
                FunctionInput::Fields(values),
            ) => {
                let mut total = *intercept;
                for (field, coefficient) in coefficients {
                    let x = values.get(field).ok_or_else(|| SamplingError::MissingField {
                        field: field.clone(),
                    })?;
                    total += coefficient * x;
                }
                total
            }
            (Self::MultiLinear { .. }, FunctionInput::Scalar(_)) => {
                return Err(SamplingError::WrongInputShape {
                    function: self.kind(),
                    expected: "a per-field map",
                });
            }
            (_, FunctionInput::Fields(_)) => {
                return Err(SamplingError::WrongInputShape {
                    function: self.kind(),
                    expected: "a scalar",
                });
            }
        };
        Ok(value)
    }
}
