//! `upload-triage` validates tenant-uploaded files against format-specific
//! acceptance rules and relocates every processed object into exactly one of
//! two terminal storage areas, producing an auditable
//! [`report::ValidationReport`] per run.
//!
//! The primary entrypoint is [`pipeline::Pipeline::process`], invoked once
//! per newly observed object by an external trigger mechanism. The format is
//! resolved from the file extension into a closed tagged set
//! ([`rules::FileFormat`]); the matching validator accumulates every
//! applicable rule violation (never stopping at the first one), triage
//! copies the object to the staging or rejected area and deletes the source,
//! and the finished report is persisted to the notifications container
//! regardless of outcome.
//!
//! ## Supported formats (resolved by extension)
//!
//! - **Delimited text**: `.csv`
//! - **Spreadsheets**: `.xlsx`, `.xls`, `.xlsm`, `.xlsb`, `.ods`
//! - **JSON**: `.json`
//! - **Columnar tables**: `.parquet`, `.pq`
//! - **Plain text**: `.txt`
//!
//! Anything else is rejected with an `unsupported extension` error and no
//! validator runs.
//!
//! ## Quick example
//!
//! ```
//! use std::sync::Arc;
//!
//! use upload_triage::config::PipelineConfig;
//! use upload_triage::pipeline::Pipeline;
//! use upload_triage::storage::{MemoryStore, ObjectLocation, ObjectStore, Tags};
//!
//! # fn main() -> Result<(), upload_triage::PipelineError> {
//! let store = Arc::new(MemoryStore::new());
//! let bytes = b"id,name\n1,Ada\n";
//! store.create_container("uploads")?;
//! store.put(
//!     &ObjectLocation::new("uploads", "acme/2026/08/07/people.csv"),
//!     bytes,
//!     &Tags::new(),
//! )?;
//!
//! let pipeline = Pipeline::new(store, PipelineConfig::default());
//! let report = pipeline.process("uploads/acme/2026/08/07/people.csv", bytes)?;
//! assert!(report.valid);
//! assert_eq!(report.metadata["rows"], 1);
//! # Ok(())
//! # }
//! ```
//!
//! The object store is an external collaborator: production deployments
//! implement [`storage::ObjectStore`] over their blob service, while
//! [`storage::MemoryStore`] and [`storage::FsStore`] cover tests and local
//! development.
//!
//! ## Modules
//!
//! - [`pipeline`]: the orchestrator and batch entrypoint
//! - [`validators`]: format-specific structural validators
//! - [`rules`]: the static per-format rule registry
//! - [`report`]: the per-object outcome record
//! - [`triage`]: outcome decision and copy-then-delete relocation
//! - [`notify`]: persistence of the report artifact
//! - [`storage`]: the object-store interface and bundled implementations
//! - [`observe`]: optional observers for run outcomes
//! - [`table`]: parsed tabular structure for downstream use
//! - [`config`]: container names and environment loading
//! - [`error`]: error types used across the pipeline

pub mod config;
pub mod error;
pub mod notify;
pub mod observe;
pub mod pipeline;
pub mod report;
pub mod rules;
pub mod storage;
pub mod table;
pub mod triage;
pub mod validators;

pub use error::{PipelineError, PipelineResult};
