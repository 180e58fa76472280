//! Config serialization helpers.
//!
//! Serde does the work; these helpers pin the error mapping and keep the
//! output format stable.

use crate::config::{RawSamplingConfig, SamplingConfig};
use crate::error::{SamplerError, SamplerResult};

/// Serialize a validated config to pretty JSON.
pub fn to_json_pretty(config: &SamplingConfig) -> SamplerResult<String> {
    serde_json::to_string_pretty(config).map_err(|e| SamplerError::internal(format!("serialize config: {e}")))
}

/// Deserialize and validate a config from JSON.
pub fn from_json(s: &str) -> SamplerResult<SamplingConfig> {
    let raw = serde_json::from_str::<RawSamplingConfig>(s).map_err(|e| SamplerError::Decode {
        message: e.to_string(),
    })?;
    Ok(raw.validate()?)
}
