//! Error types for worldsample.
//!
//! All errors are strongly typed using thiserror. Two classes matter to
//! callers: [`ValidationError`] is raised once, while a specification is
//! being loaded, and blocks all sampling; [`SamplingError`] is raised per
//! draw and leaves the choice of skip, retry or abort to the caller.

use thiserror::Error;

/// Specification errors detected before any sampling happens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Probabilities for '{field}' sum to {total}, expected 1.0")]
    ProbabilitySum {
        field: String,
        total: f64,
    },

    #[error("Probability for '{field}'.'{value}' must be finite and non-negative (got {probability})")]
    InvalidProbability {
        field: String,
        value: String,
        probability: f64,
    },

    #[error("Finite field '{field}' declares no values")]
    EmptyField {
        field: String,
    },

    #[error("Factor entry at {path} is malformed: {reason}")]
    MalformedFactor {
        path: String,
        reason: String,
    },

    #[error("Multiplier at {path} must be a finite non-negative number (got {multiplier})")]
    InvalidMultiplier {
        path: String,
        multiplier: f64,
    },

    #[error("Factor references undeclared field '{field}'")]
    UnknownFactorField {
        field: String,
    },

    #[error("Factor references value '{value}' which is not declared for field '{field}'")]
    UnknownFactorValue {
        field: String,
        value: String,
    },

    #[error("Cycle detected in factor graph: '{from}' -> '{to}'")]
    FactorCycle {
        from: String,
        to: String,
    },

    #[error("Invalid factor ordering: '{source_field}' influences '{target}', but '{target}' is declared at position {target_position} before position {source_position}")]
    FactorOrder {
        source_field: String,
        target: String,
        source_position: usize,
        target_position: usize,
    },

    #[error("Override #{index} targets '{field}', which is not a declared distribution field")]
    UnknownOverrideField {
        index: usize,
        field: String,
    },

    #[error("Override #{index} condition references undeclared field '{field}'")]
    UnknownConditionField {
        index: usize,
        field: String,
    },

    #[error("Override #{index} condition value '{value}' is not declared for field '{field}'")]
    UnknownConditionValue {
        index: usize,
        field: String,
        value: String,
    },

    #[error("Invalid transform at {path}: {reason}")]
    InvalidTransform {
        path: String,
        reason: String,
    },

    #[error("Unsupported distribution type '{tag}'")]
    UnknownDistribution {
        tag: String,
    },

    #[error("Invalid distribution parameters: {reason}")]
    InvalidDistribution {
        reason: String,
    },

    #[error("Invalid function configuration: {reason}")]
    InvalidFunction {
        reason: String,
    },

    #[error("Required field '{field}' is missing")]
    MissingField {
        field: String,
    },

    #[error("Invalid field '{field}': {reason}")]
    InvalidField {
        field: String,
        reason: String,
    },

    #[error("Metadata key '{key}' collides with a sampled field")]
    MetadataCollision {
        key: String,
    },

    #[error("Invalid generator settings: {reason}")]
    InvalidSettings {
        reason: String,
    },
}

impl ValidationError {
    /// Prefixes the reason of a distribution error with the field it belongs to.
    #[must_use]
    pub fn in_field(self, field: &str) -> Self {
        match self {
            Self::InvalidDistribution { reason } => Self::InvalidDistribution {
                reason: format!("{field}: {reason}"),
            },
            Self::InvalidFunction { reason } => Self::InvalidFunction {
                reason: format!("{field}: {reason}"),
            },
            other => other,
        }
    }
}

/// Errors raised while drawing a single value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SamplingError {
    #[error("Distribution '{kind}' does not support {operation}")]
    Unsupported {
        kind: &'static str,
        operation: &'static str,
    },

    #[error("Referenced field '{field}' has not been sampled")]
    MissingField {
        field: String,
    },

    #[error("Referenced field '{field}' holds a {found} value, expected a number")]
    NonNumericField {
        field: String,
        found: &'static str,
    },

    #[error("Function '{function}' expected {expected} input")]
    WrongInputShape {
        function: &'static str,
        expected: &'static str,
    },

    #[error("Noisy value {noise} violates the '{kind}' noise domain")]
    NoiseOutOfDomain {
        kind: &'static str,
        noise: f64,
    },

    #[error("Evaluated {parameter} is invalid: {value}")]
    InvalidParameter {
        parameter: &'static str,
        value: f64,
    },

    #[error("All adjusted probabilities for '{field}' are zero")]
    DegenerateProbabilities {
        field: String,
    },
}

/// Top-level error type for worldsample.
#[derive(Debug, Error)]
pub enum SamplerError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Sampling error: {0}")]
    Sampling(#[from] SamplingError),

    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode configuration: {message}")]
    Decode {
        message: String,
    },

    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl SamplerError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is a sampling error.
    #[must_use]
    pub const fn is_sampling(&self) -> bool {
        matches!(self, Self::Sampling(_))
    }

    /// Returns true if redrawing with fresh randomness may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Sampling(e) => matches!(
                e,
                SamplingError::NoiseOutOfDomain { .. } | SamplingError::InvalidParameter { .. }
            ),
            Self::Validation(_) | Self::Io(_) | Self::Decode { .. } | Self::Internal { .. } => false,
        }
    }
}

/// Result type alias for worldsample operations.
pub type SamplerResult<T> = Result<T, SamplerError>;
