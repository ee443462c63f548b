//! Source loaders for each export category.
//!
//! Every loader follows the same contract: it reads one category of the
//! export, matches entries against the shared [`ContactMap`](crate::model::ContactMap),
//! and merges interaction summaries into the matched records. A missing,
//! unreadable, or malformed file is logged and skipped; no loader aborts
//! the run.

pub mod comments;
pub mod followers;
pub mod messages;
pub mod requests;
pub mod stories;

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

/// Reads and parses one JSON source file, tolerating absence and damage.
///
/// Returns `None` when the file does not exist (debug log) or cannot be
/// read or parsed (warn log). Loaders treat `None` as "this source
/// contributes nothing".
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    if !path.exists() {
        debug!(path = %path.display(), "source file not present, skipping");
        return None;
    }
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            warn!(path = %path.display(), %err, "failed to read source file, skipping");
            return None;
        }
    };
    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(path = %path.display(), %err, "failed to parse source file, skipping");
            None
        }
    }
}

/// An export entry wrapping a single-element `string_list_data` list.
///
/// The follower lists, follow-request files, and unfollow file all share
/// this shape.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StringListEntry {
    #[serde(default)]
    pub string_list_data: Vec<StringListItem>,
}

impl StringListEntry {
    /// The normalized handle of the first list item, if any.
    pub fn normalized_value(&self) -> Option<String> {
        let item = self.string_list_data.first()?;
        let handle = crate::text::normalize_username(item.value.as_deref()?);
        if handle.is_empty() {
            None
        } else {
            Some(handle)
        }
    }
}

/// One item inside `string_list_data`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StringListItem {
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub timestamp: Option<i64>,
}
