//! Pipeline orchestrator.
//!
//! Sequences the loaders over a single contact map, relays progress at
//! fixed checkpoints, and writes the requested exports. The run is
//! strictly sequential: every stage depends on identities and fields
//! established by the stages before it.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::PipelineError;
use crate::export::{export_jsonl, export_xlsx};
use crate::layout::ExportLayout;
use crate::model::ContactMap;
use crate::score;
use crate::sources::{comments, followers, messages, requests, stories};

/// Default substring identifying the account owner in participant names.
pub const DEFAULT_OWNER_MARKER: &str = "photia";

/// Progress callback: `(message, percent)` at fixed milestones.
///
/// Invoked synchronously; the pipeline never yields mid-stage, so a
/// caller wanting cancellation must wrap the whole run.
pub type ProgressFn<'a> = dyn FnMut(&str, u8) + 'a;

/// Options for one aggregation run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Base name for output files, without extension.
    pub base_filename: String,
    /// Write the line-delimited JSON artifact.
    pub emit_jsonl: bool,
    /// Write the spreadsheet artifact.
    pub emit_xlsx: bool,
    /// Case-insensitive substring identifying the account owner among
    /// conversation participants.
    pub owner_marker: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            base_filename: "followers_aggregated".to_string(),
            emit_jsonl: true,
            emit_xlsx: true,
            owner_marker: DEFAULT_OWNER_MARKER.to_string(),
        }
    }
}

/// Counters and artifacts reported after a run.
///
/// Counts reflect whatever was successfully aggregated; skipped source
/// files reduce the numbers, they never fail the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub total_entries: usize,
    pub followers_count: usize,
    pub non_followers_count: usize,
    pub entries_with_interactions: usize,
    pub output_files: Vec<PathBuf>,
}

fn report(progress: &mut Option<&mut ProgressFn<'_>>, message: &str, percent: u8) {
    if let Some(cb) = progress.as_deref_mut() {
        cb(message, percent);
    }
}

/// Runs the full aggregation over `data_dir`, writing into `output_dir`.
///
/// Fails fast if `data_dir` holds no recognizable export; after that,
/// individual source files are fault-tolerant. The caller owns both
/// directories; nothing global is read or written.
pub fn run(
    data_dir: &Path,
    output_dir: &Path,
    options: &RunOptions,
    mut progress: Option<&mut ProgressFn<'_>>,
) -> Result<RunSummary, PipelineError> {
    let layout = ExportLayout::resolve(data_dir)?;
    info!(root = %layout.root().display(), "resolved export layout");

    let mut contacts = ContactMap::new();

    report(&mut progress, "Loading followers...", 5);
    let follower_count = followers::load_followers(&layout, &mut contacts);

    report(
        &mut progress,
        &format!("Loaded {follower_count} followers. Processing comments..."),
        15,
    );
    comments::load_comments(&layout, &mut contacts);

    report(&mut progress, "Processing messages...", 30);
    messages::load_inbox(&layout, &mut contacts, &options.owner_marker);

    report(&mut progress, "Processing story interactions...", 50);
    stories::load_story_interactions(&layout, &mut contacts);

    report(&mut progress, "Processing message requests...", 65);
    messages::load_message_requests(&layout, &mut contacts, &options.owner_marker);
    requests::load_follow_requests(&layout, &mut contacts);
    requests::load_recently_unfollowed(&layout, &mut contacts);

    report(&mut progress, "Finalizing...", 80);
    score::finalize(&mut contacts);

    let mut summary = RunSummary {
        total_entries: contacts.len(),
        followers_count: contacts.values().filter(|r| r.is_follower).count(),
        non_followers_count: contacts.values().filter(|r| !r.is_follower).count(),
        entries_with_interactions: contacts
            .values()
            .filter(|r| r.has_interactions == Some(true))
            .count(),
        output_files: Vec::new(),
    };

    if options.emit_jsonl {
        report(&mut progress, "Exporting JSONL...", 85);
        let path = output_dir.join(format!("{}.jsonl", options.base_filename));
        export_jsonl(&contacts, &path)?;
        summary.output_files.push(path);
    }

    if options.emit_xlsx {
        report(&mut progress, "Exporting spreadsheet...", 90);
        let path = output_dir.join(format!("{}.xlsx", options.base_filename));
        if export_xlsx(&contacts, &path)? {
            summary.output_files.push(path);
        }
    }

    report(&mut progress, "Done", 100);
    Ok(summary)
}
