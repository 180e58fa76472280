//! Samplers.
//!
//! Both samplers write into a caller-owned [`SampledFields`] accumulator
//! and skip fields already present in it. Run the finite sampler first:
//! overrides, transforms and function inputs read the finite draws.
//!
//! [`SampledFields`]: crate::entity::SampledFields

pub mod continuous;
pub mod factors;
pub mod finite;

pub use continuous::{resolve_distribution, sample_distribution_fields_with_overrides};
pub use factors::apply_factor_multipliers;
pub use finite::{sample_finite_fields, sampling_order};
