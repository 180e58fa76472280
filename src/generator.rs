//! Entity generation.
//!
//! [`EntityGenerator`] runs the full per-entity pipeline against a shared,
//! validated [`SamplingConfig`]:
//!
//! 1. finite fields ([`sample_finite_fields`])
//! 2. continuous fields ([`sample_distribution_fields_with_overrides`])
//! 3. metadata constants, written only where the key is still absent
//! 4. registered [`Enricher`]s, in registration order
//!
//! Batches fan out over scoped worker threads. Each worker owns one
//! generator stream from [`SeedStreams`], so a seeded batch is reproducible
//! for a fixed worker count.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use chrono::{DateTime, Utc};
use crossbeam_channel::bounded;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::SamplingConfig;
use crate::entity::{Enricher, SampledEntity, SampledFields};
use crate::error::{SamplerError, SamplerResult, ValidationError};
use crate::rng::SeedStreams;
use crate::sampling::{sample_distribution_fields_with_overrides, sample_finite_fields};

/// Upper bound on batch worker threads.
pub const MAX_WORKERS: usize = 256;

/// Results buffered per worker before it blocks.
const CHANNEL_DEPTH: usize = 64;

/// What a batch does when an entity fails to sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop the batch and return the error.
    #[default]
    Abort,
    /// Drop the entity and continue.
    Skip,
    /// Redraw the entity up to `max_retries` times, then drop it.
    Retry,
}

/// Batch generation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Base seed. `None` seeds every worker from OS entropy.
    pub seed: Option<u64>,
    /// Worker threads.
    pub workers: usize,
    pub failure_policy: FailurePolicy,
    /// Redraws per entity under [`FailurePolicy::Retry`].
    pub max_retries: usize,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            seed: None,
            workers: 1,
            failure_policy: FailurePolicy::Abort,
            max_retries: 3,
        }
    }
}

impl GeneratorSettings {
    /// Reproducible settings with one worker.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Validate settings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.workers == 0 || self.workers > MAX_WORKERS {
            return Err(ValidationError::InvalidSettings {
                reason: format!("workers must be in 1..={MAX_WORKERS} (got {})", self.workers),
            });
        }
        if self.failure_policy == FailurePolicy::Retry && self.max_retries == 0 {
            return Err(ValidationError::InvalidSettings {
                reason: "max_retries must be > 0 under the retry policy".to_string(),
            });
        }
        Ok(())
    }
}

/// Outcome of a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    /// Generated entities, ordered by batch index.
    pub entities: Vec<SampledEntity>,
    pub requested: usize,
    pub skipped: usize,
    /// Redraws across the batch, including those of skipped entities.
    pub retried: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BatchReport {
    #[must_use]
    pub fn generated(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at.signed_duration_since(self.started_at)
    }
}

enum Outcome {
    Generated { entity: SampledEntity, retries: usize },
    Skipped { error: SamplerError, retries: usize },
    Failed(SamplerError),
}

/// Generates entities from a validated config.
pub struct EntityGenerator<'a> {
    config: &'a SamplingConfig,
    enrichers: Vec<Box<dyn Enricher + 'a>>,
}

impl fmt::Debug for EntityGenerator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityGenerator")
            .field("enrichers", &self.enrichers.len())
            .finish_non_exhaustive()
    }
}

impl<'a> EntityGenerator<'a> {
    #[must_use]
    pub fn new(config: &'a SamplingConfig) -> Self {
        Self {
            config,
            enrichers: Vec::new(),
        }
    }

    /// Registers a post-processor. Enrichers run in registration order.
    #[must_use]
    pub fn with_enricher(mut self, enricher: impl Enricher + 'a) -> Self {
        self.enrichers.push(Box::new(enricher));
        self
    }

    #[must_use]
    pub const fn config(&self) -> &'a SamplingConfig {
        self.config
    }

    /// Generates one entity from scratch.
    pub fn generate_one<R: Rng + ?Sized>(&self, rng: &mut R) -> SamplerResult<SampledEntity> {
        self.generate_seeded(SampledFields::new(), rng)
    }

    /// Generates one entity starting from pre-seeded fields.
    ///
    /// Seeded fields are never resampled and condition every later draw.
    pub fn generate_seeded<R: Rng + ?Sized>(&self, seed: SampledFields, rng: &mut R) -> SamplerResult<SampledEntity> {
        let mut sampled = seed;
        sample_finite_fields(self.config, &mut sampled, rng)?;
        sample_distribution_fields_with_overrides(self.config, &mut sampled, rng)?;
        for (key, value) in self.config.metadata() {
            sampled.entry(key.clone()).or_insert_with(|| value.clone());
        }

        let mut entity = SampledEntity::from_fields(sampled);
        for enricher in &self.enrichers {
            enricher.enrich(&mut entity)?;
        }
        Ok(entity)
    }

    fn attempt<R: Rng + ?Sized>(&self, settings: &GeneratorSettings, rng: &mut R) -> Outcome {
        let mut retries = 0;
        loop {
            let error = match self.generate_one(rng) {
                Ok(entity) => return Outcome::Generated { entity, retries },
                Err(error) => error,
            };
            if !error.is_sampling() {
                return Outcome::Failed(error);
            }
            match settings.failure_policy {
                FailurePolicy::Abort => return Outcome::Failed(error),
                FailurePolicy::Retry if retries < settings.max_retries => {
                    retries += 1;
                    warn!(attempt = retries, error = %error, "redrawing entity");
                }
                FailurePolicy::Skip | FailurePolicy::Retry => return Outcome::Skipped { error, retries },
            }
        }
    }

    /// Generates `count` entities across `settings.workers` threads.
    ///
    /// Worker `w` draws batch indices `w, w + workers, ...` from stream `w`.
    /// Non-sampling errors (such as a failing enricher) abort the batch
    /// under every policy.
    pub fn generate_batch(&self, count: usize, settings: &GeneratorSettings) -> SamplerResult<BatchReport> {
        settings.validate()?;
        let started_at = Utc::now();
        let workers = settings.workers.min(count).max(1);
        let streams = SeedStreams::from_option(settings.seed);
        let abort = AtomicBool::new(false);

        let mut slots: Vec<Option<SampledEntity>> = vec![None; count];
        let mut skipped = 0;
        let mut retried = 0;
        let mut failure: Option<SamplerError> = None;

        thread::scope(|scope| -> SamplerResult<()> {
            let (tx, rx) = bounded::<(usize, Outcome)>(workers * CHANNEL_DEPTH);
            for worker in 0..workers {
                let tx = tx.clone();
                let abort = &abort;
                let mut rng = streams.stream(worker as u64);
                thread::Builder::new()
                    .name(format!("worldsample-worker-{worker}"))
                    .spawn_scoped(scope, move || {
                        for index in (worker..count).step_by(workers) {
                            if abort.load(Ordering::Relaxed) {
                                break;
                            }
                            let outcome = self.attempt(settings, &mut rng);
                            let failed = matches!(outcome, Outcome::Failed(_));
                            if tx.send((index, outcome)).is_err() || failed {
                                break;
                            }
                        }
                    })?;
            }
            drop(tx);

            for (index, outcome) in rx {
                match outcome {
                    Outcome::Generated { entity, retries } => {
                        retried += retries;
                        slots[index] = Some(entity);
                    }
                    Outcome::Skipped { error, retries } => {
                        retried += retries;
                        skipped += 1;
                        warn!(index, error = %error, "skipped entity");
                    }
                    Outcome::Failed(error) => {
                        abort.store(true, Ordering::Relaxed);
                        warn!(index, error = %error, "aborting batch");
                        failure.get_or_insert(error);
                    }
                }
            }
            Ok(())
        })?;

        if let Some(error) = failure {
            return Err(error);
        }

        let report = BatchReport {
            entities: slots.into_iter().flatten().collect(),
            requested: count,
            skipped,
            retried,
            started_at,
            finished_at: Utc::now(),
        };
        info!(
            requested = report.requested,
            generated = report.generated(),
            skipped = report.skipped,
            retried = report.retried,
            workers,
            elapsed_ms = report.elapsed().num_milliseconds(),
            "batch generated"
        );
        Ok(report)
    }
}
