//! Parameter transforms for the parametric distributions.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Additive mean shift and multiplicative spread scale.
///
/// Absent parameters are the identity (shift 0, scale 1). Applying a
/// transform never mutates the distribution it is applied to; see
/// [`Distribution::with_transform`](super::Distribution::with_transform).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DistributionTransform {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean_shift: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub std_mult: Option<f64>,
}

impl DistributionTransform {
    #[must_use]
    pub const fn shift(mean_shift: f64) -> Self {
        Self {
            mean_shift: Some(mean_shift),
            std_mult: None,
        }
    }

    #[must_use]
    pub const fn scale(std_mult: f64) -> Self {
        Self {
            mean_shift: None,
            std_mult: Some(std_mult),
        }
    }

    #[must_use]
    pub fn mean_shift_or_default(&self) -> f64 {
        self.mean_shift.unwrap_or(0.0)
    }

    #[must_use]
    pub fn std_mult_or_default(&self) -> f64 {
        self.std_mult.unwrap_or(1.0)
    }

    /// `mean_shift` must be finite; `std_mult` must be finite and positive.
    /// An empty transform is valid.
    pub fn validate(&self, path: &str) -> Result<(), ValidationError> {
        if let Some(shift) = self.mean_shift {
            if !shift.is_finite() {
                return Err(ValidationError::InvalidTransform {
                    path: path.to_string(),
                    reason: format!("mean_shift must be finite (got {shift})"),
                });
            }
        }
        if let Some(mult) = self.std_mult {
            if !mult.is_finite() || mult <= 0.0 {
                return Err(ValidationError::InvalidTransform {
                    path: path.to_string(),
                    reason: format!("std_mult must be positive and finite (got {mult})"),
                });
            }
        }
        Ok(())
    }
}
