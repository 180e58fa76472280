//! # worldsample - Declarative Probabilistic Attribute Sampling
//!
//! worldsample draws internally consistent attribute sets for generated
//! entities (creatures, villagers, products, ...) from a declarative JSON
//! specification. The specification is validated once, then shared
//! read-only by any number of generation workers.
//!
//! ## Core Concepts
//!
//! - **Finite field**: categorical attribute with labeled base probabilities
//! - **Distribution field**: numeric attribute drawn from a [`Distribution`]
//! - **Factor**: multiplier adjusting one finite field's probabilities once
//!   another finite field has been sampled
//! - **Override**: replacement distribution used when a condition over
//!   sampled fields holds (first match wins)
//! - **Transform**: pure mean shift / spread scale applied per sampled trait
//!
//! ## Usage
//!
//! ```rust
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use worldsample::{EntityGenerator, SamplingConfig};
//!
//! let config = SamplingConfig::from_json(r#"{
//!     "base_probabilities_finite": {
//!         "habitat": {"forest": 0.6, "desert": 0.4},
//!         "species": {"fox": 0.5, "lizard": 0.5}
//!     },
//!     "base_probabilities_distributions": {
//!         "weight": {"type": "lognormal", "mean": 4.0, "std": 1.5}
//!     },
//!     "factors": {
//!         "habitat": {"species": {"desert": {"lizard": 9.0}}}
//!     }
//! }"#)?;
//!
//! let generator = EntityGenerator::new(&config);
//! let entity = generator.generate_one(&mut StdRng::seed_from_u64(7))?;
//! assert_eq!(entity.len(), 3);
//! # Ok::<(), worldsample::SamplerError>(())
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Core types
pub mod entity;
pub mod error;
pub mod rng;
pub mod value;

// Specification and sampling
pub mod config;
pub mod distribution;
pub mod generator;
pub mod sampling;

// Re-export primary types at crate root for convenience
pub use config::{
    DistributionOverride, FactorGraph, ProbabilityTable, RawSamplingConfig, SamplingConfig, TraitTransforms,
};
pub use distribution::{
    BernoulliBasedDist, Distribution, DistributionTransform, FieldLookup, FieldRef, FunctionBasedDist,
    FunctionConfig, FunctionInput, LogNormalDist, NoiseFunction, NoiseKind, NormalDist, TruncatedNormalDist,
};
pub use entity::{Enricher, SampledEntity, SampledFields};
pub use error::{SamplerError, SamplerResult, SamplingError, ValidationError};
pub use generator::{BatchReport, EntityGenerator, FailurePolicy, GeneratorSettings};
pub use rng::{SamplerRng, SeedStreams};
pub use sampling::{apply_factor_multipliers, sample_distribution_fields_with_overrides, sample_finite_fields};
pub use value::FieldValue;
