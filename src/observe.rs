use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::PipelineError;
use crate::report::ValidationReport;
use crate::rules::FileFormat;

/// Context about one processing run.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Blob name of the processed object.
    pub blob_name: String,
    /// Format resolved from the extension.
    pub format: FileFormat,
}

/// Observer interface for run outcomes.
///
/// Implementors can record metrics, write best-effort status rows to a
/// relational sink, or trigger alerts. Correctness of the pipeline never
/// depends on an observer.
pub trait PipelineObserver: Send + Sync {
    /// Called when a run completes and the object was staged.
    fn on_accepted(&self, _ctx: &RunContext, _report: &ValidationReport) {}

    /// Called when a run completes and the object was rejected.
    fn on_rejected(&self, _ctx: &RunContext, _report: &ValidationReport) {}

    /// Called when a run fails outright (triage or report persistence).
    fn on_run_failure(&self, _ctx: &RunContext, _error: &PipelineError) {}
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn PipelineObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn PipelineObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl PipelineObserver for CompositeObserver {
    fn on_accepted(&self, ctx: &RunContext, report: &ValidationReport) {
        for o in &self.observers {
            o.on_accepted(ctx, report);
        }
    }

    fn on_rejected(&self, ctx: &RunContext, report: &ValidationReport) {
        for o in &self.observers {
            o.on_rejected(ctx, report);
        }
    }

    fn on_run_failure(&self, ctx: &RunContext, error: &PipelineError) {
        for o in &self.observers {
            o.on_run_failure(ctx, error);
        }
    }
}

/// Logs run outcomes to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl PipelineObserver for StdErrObserver {
    fn on_accepted(&self, ctx: &RunContext, _report: &ValidationReport) {
        eprintln!("[triage][staged] format={:?} blob={}", ctx.format, ctx.blob_name);
    }

    fn on_rejected(&self, ctx: &RunContext, report: &ValidationReport) {
        eprintln!(
            "[triage][rejected] format={:?} blob={} errors={:?}",
            ctx.format, ctx.blob_name, report.errors
        );
    }

    fn on_run_failure(&self, ctx: &RunContext, error: &PipelineError) {
        eprintln!(
            "[triage][failed] format={:?} blob={} err={}",
            ctx.format, ctx.blob_name, error
        );
    }
}

/// Appends run outcomes to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl PipelineObserver for FileObserver {
    fn on_accepted(&self, ctx: &RunContext, _report: &ValidationReport) {
        self.append_line(&format!(
            "{} staged format={:?} blob={}",
            unix_ts(),
            ctx.format,
            ctx.blob_name
        ));
    }

    fn on_rejected(&self, ctx: &RunContext, report: &ValidationReport) {
        self.append_line(&format!(
            "{} rejected format={:?} blob={} errors={}",
            unix_ts(),
            ctx.format,
            ctx.blob_name,
            report.errors.len()
        ));
    }

    fn on_run_failure(&self, ctx: &RunContext, error: &PipelineError) {
        self.append_line(&format!(
            "{} failed format={:?} blob={} err={}",
            unix_ts(),
            ctx.format,
            ctx.blob_name,
            error
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
