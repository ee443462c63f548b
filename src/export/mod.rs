//! Exporters for the aggregated contact map.
//!
//! The JSONL file is the primary artifact; a write failure there is
//! fatal. The spreadsheet is secondary and compiled behind the `xlsx`
//! feature: without it the exporter logs a warning and skips.

mod jsonl;
#[cfg(feature = "xlsx")]
mod xlsx;

pub use jsonl::export_jsonl;

#[cfg(feature = "xlsx")]
pub use xlsx::export_xlsx;

use crate::model::{ContactMap, ContactRecord};

/// Records sorted for export: engagement score descending, insertion
/// order preserved for equal scores.
pub(crate) fn sorted_for_export(contacts: &ContactMap) -> Vec<&ContactRecord> {
    let mut records: Vec<&ContactRecord> = contacts.values().collect();
    // sort_by is stable, so ties keep map insertion order
    records.sort_by(|a, b| {
        let sa = a.engagement_score.unwrap_or(0.0);
        let sb = b.engagement_score.unwrap_or(0.0);
        sb.partial_cmp(&sa).unwrap_or(std::cmp::Ordering::Equal)
    });
    records
}

/// Stub used when the spreadsheet backend is compiled out: logs and skips.
#[cfg(not(feature = "xlsx"))]
pub fn export_xlsx(
    _contacts: &ContactMap,
    path: &std::path::Path,
) -> Result<bool, crate::error::PipelineError> {
    tracing::warn!(
        path = %path.display(),
        "spreadsheet backend not compiled in (xlsx feature disabled), skipping export"
    );
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_is_descending_with_stable_ties() {
        let mut contacts = ContactMap::new();
        for (name, score) in [("low", 1.0), ("tie_a", 5.0), ("high", 9.0), ("tie_b", 5.0)] {
            let mut rec = ContactRecord::follower(name.into(), String::new(), None);
            rec.engagement_score = Some(score);
            contacts.insert(name.into(), rec);
        }
        let sorted = sorted_for_export(&contacts);
        let names: Vec<&str> = sorted.iter().map(|r| r.username.as_str()).collect();
        assert_eq!(names, vec!["high", "tie_a", "tie_b", "low"]);
    }
}
