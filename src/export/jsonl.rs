//! Line-delimited JSON export.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::PipelineError;
use crate::export::sorted_for_export;
use crate::model::ContactMap;

/// Writes one JSON object per contact, sorted by engagement score
/// descending (insertion order breaks ties).
///
/// Absent optional fields are omitted entirely and non-ASCII text is
/// written unescaped; serde_json gives both for free with the model's
/// `skip_serializing_if` attributes.
pub fn export_jsonl(contacts: &ContactMap, path: &Path) -> Result<(), PipelineError> {
    let io_err = |source| PipelineError::Export {
        path: path.to_path_buf(),
        source,
    };

    let file = fs::File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);

    for record in sorted_for_export(contacts) {
        let line = serde_json::to_string(record)
            .map_err(|e| io_err(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
        writeln!(writer, "{line}").map_err(io_err)?;
    }
    writer.flush().map_err(io_err)?;

    info!(count = contacts.len(), path = %path.display(), "wrote JSONL export");
    Ok(())
}
