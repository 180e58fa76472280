//! Noise applied around a function-evaluated mean.

use rand::Rng;
use rand_distr::{Distribution as _, Normal, StandardNormal};
use serde::{Deserialize, Serialize};

use super::function::{FunctionConfig, FunctionInput};
use super::{truncated, FieldLookup};
use crate::error::{SamplingError, ValidationError};

/// Shape of the noise added to a function-based mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseKind {
    /// `mean + N(0, scale)`
    Normal,
    /// `mean * exp(N(0, ln(1 + scale)))`
    Lognormal,
    /// `mean + TN(0, scale, lower, upper)`
    TruncatedNormal,
}

impl NoiseKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Lognormal => "lognormal",
            Self::TruncatedNormal => "truncated_normal",
        }
    }
}

/// Parameters shared by every noise kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseParams {
    /// Field whose value drives the noise scale.
    pub field_name: String,
    /// Scale as a function of `field_name`.
    pub scale_factor: FunctionConfig,
    /// Lower bound on the noise term. Truncated noise only; defaults to 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower: Option<f64>,
    /// Upper bound on the noise term. Truncated noise only; defaults to +inf.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<f64>,
}

/// Noise function configuration: `{"type": ..., "params": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseFunction {
    #[serde(rename = "type")]
    pub kind: NoiseKind,
    pub params: NoiseParams,
}

impl NoiseFunction {
    fn bounds(&self) -> (f64, f64) {
        (
            self.params.lower.unwrap_or(0.0),
            self.params.upper.unwrap_or(f64::INFINITY),
        )
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.params.field_name.trim().is_empty() {
            return Err(ValidationError::MissingField {
                field: "noise_function.params.field_name".to_string(),
            });
        }
        self.params.scale_factor.validate()?;
        if [self.params.lower, self.params.upper].iter().flatten().any(|b| !b.is_finite()) {
            return Err(ValidationError::InvalidDistribution {
                reason: "noise bounds must be finite".to_string(),
            });
        }
        if self.kind == NoiseKind::TruncatedNormal {
            let (lower, upper) = self.bounds();
            if lower.is_nan() || upper.is_nan() || lower >= upper {
                return Err(ValidationError::InvalidDistribution {
                    reason: format!("truncated noise bounds must satisfy lower < upper (got {lower}, {upper})"),
                });
            }
        } else if self.params.lower.is_some() || self.params.upper.is_some() {
            return Err(ValidationError::InvalidDistribution {
                reason: format!("{} noise does not take bounds", self.kind.as_str()),
            });
        }
        Ok(())
    }

    /// Applies noise to `mean`, reading the scale input from `inputs`.
    pub fn apply<L, R>(&self, mean: f64, inputs: &L, rng: &mut R) -> Result<f64, SamplingError>
    where
        L: FieldLookup + ?Sized,
        R: Rng + ?Sized,
    {
        let x = inputs.number(&self.params.field_name)?;
        let scale = self.params.scale_factor.evaluate(&FunctionInput::Scalar(x))?;
        if !scale.is_finite() || scale < 0.0 {
            return Err(SamplingError::InvalidParameter {
                parameter: "noise scale",
                value: scale,
            });
        }

        let value = match self.kind {
            NoiseKind::Normal => {
                if scale == 0.0 {
                    return Ok(mean);
                }
                let noise = Normal::new(0.0, scale)
                    .map_err(|_| SamplingError::InvalidParameter {
                        parameter: "noise scale",
                        value: scale,
                    })?
                    .sample(rng);
                mean + noise
            }
            NoiseKind::Lognormal => {
                let sigma = scale.ln_1p();
                let z: f64 = StandardNormal.sample(rng);
                mean * (sigma * z).exp()
            }
            NoiseKind::TruncatedNormal => {
                if scale == 0.0 {
                    return Err(SamplingError::InvalidParameter {
                        parameter: "truncated noise scale",
                        value: scale,
                    });
                }
                let (lower, upper) = self.bounds();
                mean + truncated::sample(0.0, scale, lower, upper, rng)
            }
        };

        if !value.is_finite() {
            return Err(SamplingError::NoiseOutOfDomain {
                kind: self.kind.as_str(),
                noise: value,
            });
        }
        Ok(value)
    }
}
