//! The orchestrator: one invocation per newly observed object.
//!
//! Resolves the format from the blob name, drives the validator, triage and
//! notification steps in order, and converts unexpected failures into a
//! terminal rejected-with-error state. Runs for different objects share no
//! mutable state beyond the read-only rule registry and may execute fully in
//! parallel.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{error, info, warn};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::notify::NotificationEmitter;
use crate::observe::{PipelineObserver, RunContext};
use crate::report::{ObjectIdentity, ValidationReport};
use crate::rules::{self, FileFormat};
use crate::storage::{ObjectLocation, ObjectStore};
use crate::triage::TriageEngine;
use crate::validators;

/// Options controlling [`Pipeline::process_batch`].
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Number of worker threads. If `None`, uses the platform's available
    /// parallelism.
    pub num_threads: Option<usize>,
}

/// The validation-and-triage pipeline.
///
/// Owns the object-store handle explicitly and passes it into the triage and
/// notification components; there is no ambient client.
pub struct Pipeline {
    config: PipelineConfig,
    triage: TriageEngine,
    notifier: NotificationEmitter,
    observer: Option<Arc<dyn PipelineObserver>>,
}

impl Pipeline {
    /// Create a pipeline around a store handle and container configuration.
    pub fn new(store: Arc<dyn ObjectStore>, config: PipelineConfig) -> Self {
        let triage = TriageEngine::new(Arc::clone(&store), &config);
        let notifier =
            NotificationEmitter::new(store, config.notifications_container.clone());
        Self {
            config,
            triage,
            notifier,
            observer: None,
        }
    }

    /// Attach an observer for run outcomes.
    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Run pure validation for one object, without touching the store.
    ///
    /// Validating identical bytes twice yields identical reports except for
    /// the timestamp.
    pub fn validate(&self, blob_name: &str, bytes: &[u8]) -> ValidationReport {
        let identity = ObjectIdentity::parse(blob_name, &self.config.source_container);
        self.run_validator(&identity, bytes)
    }

    /// Run the full pipeline for one object: validate, relocate to the
    /// outcome area, persist the report.
    ///
    /// A report is emitted whenever one could be constructed, including when
    /// triage fails; in that case the synthetic error is appended first and
    /// the triage failure is returned to the caller.
    ///
    /// # Errors
    ///
    /// Fails when the triage copy or the report persistence fails. Rule
    /// violations never surface here; they reject the object instead.
    pub fn process(&self, blob_name: &str, bytes: &[u8]) -> PipelineResult<ValidationReport> {
        let identity = ObjectIdentity::parse(blob_name, &self.config.source_container);
        let ctx = RunContext {
            blob_name: blob_name.to_string(),
            format: FileFormat::from_extension(&identity.extension),
        };

        let mut report = self.run_validator(&identity, bytes);
        let source = ObjectLocation::new(self.config.source_container.clone(), identity.key);

        match self.triage.relocate(bytes, &source, &report) {
            Ok(destination) => {
                if report.valid {
                    info!("accepted {}, staged at {}", report.blob_name, destination);
                } else {
                    warn!(
                        "rejected {}: {:?}, moved to {}",
                        report.blob_name, report.errors, destination
                    );
                }
                let emitted = self.notifier.emit(&report);
                if let Some(observer) = &self.observer {
                    if report.valid {
                        observer.on_accepted(&ctx, &report);
                    } else {
                        observer.on_rejected(&ctx, &report);
                    }
                }
                if let Err(err) = emitted {
                    error!("failed to store report for {}: {}", report.blob_name, err);
                    if let Some(observer) = &self.observer {
                        observer.on_run_failure(&ctx, &err);
                    }
                    return Err(err);
                }
                Ok(report)
            }
            Err(store_err) => {
                error!("triage failed for {}: {}", report.blob_name, store_err);
                report.errors.push(format!("internal error: {store_err}"));
                report.valid = false;
                if let Err(emit_err) = self.notifier.emit(&report) {
                    error!(
                        "failed to store report for {} after triage failure: {}",
                        report.blob_name, emit_err
                    );
                }
                let err = PipelineError::from(store_err);
                if let Some(observer) = &self.observer {
                    observer.on_run_failure(&ctx, &err);
                }
                Err(err)
            }
        }
    }

    /// Process a batch of objects in parallel.
    ///
    /// Each object is an independent run; results come back in input order.
    ///
    /// # Panics
    ///
    /// Panics if the worker pool cannot be built.
    pub fn process_batch(
        &self,
        objects: &[(String, Vec<u8>)],
        options: &BatchOptions,
    ) -> Vec<PipelineResult<ValidationReport>> {
        let num_threads = options.num_threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        });
        let pool = ThreadPoolBuilder::new()
            .num_threads(num_threads.max(1))
            .build()
            .expect("failed to build rayon thread pool");

        pool.install(|| {
            objects
                .par_iter()
                .map(|(blob_name, bytes)| self.process(blob_name, bytes))
                .collect()
        })
    }

    /// Dispatch to the format validator and derive the final `valid` flag.
    ///
    /// A panic inside a validator is caught here and recorded as a synthetic
    /// internal error on whatever partial report exists, so the object still
    /// reaches triage as rejected.
    fn run_validator(&self, identity: &ObjectIdentity, bytes: &[u8]) -> ValidationReport {
        let mut report = ValidationReport::new(identity, bytes.len() as u64);
        let format = FileFormat::from_extension(&identity.extension);

        match rules::lookup(format) {
            Ok(ruleset) => {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                    validators::run(format, bytes, ruleset, &mut report)
                }));
                if let Err(panic) = outcome {
                    let message = panic_message(panic.as_ref());
                    error!("validator panicked for {}: {}", identity.blob_name, message);
                    report.errors.push(format!("internal error: {message}"));
                }
            }
            Err(_) => {
                report.errors.push(format!(
                    "unsupported extension: .{}",
                    identity.extension
                ));
            }
        }

        report.valid = report.errors.is_empty();
        report
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "validator panicked".to_string()
    }
}
