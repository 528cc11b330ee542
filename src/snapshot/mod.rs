//! Snapshot export/import for disaster recovery.
//!
//! The exporter walks the store and writes one self-describing JSON
//! document; the importer reads such a document and applies it as a single
//! atomic unit behind a confirmation gate. The document format is the only
//! contract between the two, so they may run on different machines.
//!
//! Running export and import concurrently against the same store is
//! unsupported; both are one-shot, run-to-completion batch jobs.

mod confirm;
mod document;
mod error;
mod export;
mod import;

pub use confirm::{ConfirmationProvider, ImportSummary, ScriptedConfirmation, StdinConfirmation};
pub use document::{PermissionRow, SnapshotDocument};
pub use error::SnapshotError;
pub use export::{default_snapshot_path, export_snapshot, ExportReport};
pub use import::{apply_document, ApplyStats, ImportReport, ImportState, Importer};
