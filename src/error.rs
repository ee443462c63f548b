//! Pipeline error taxonomy.
//!
//! Only two failure classes abort a run: a missing export layout and a
//! failure to write the primary artifact. Per-file problems inside the
//! loaders are logged and skipped, never surfaced as errors.

use std::path::PathBuf;

/// Errors that abort an aggregation run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("no Instagram export found under {path}: expected a `connections` folder in the directory or an `instagram-photia` child")]
    Layout { path: PathBuf },

    #[error("failed to write {path}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "xlsx")]
    #[error("spreadsheet export failed: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),
}
