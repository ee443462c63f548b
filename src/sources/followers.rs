//! Identity loader: builds the universe of matchable contacts from the
//! follower-list exports.

use std::fs;

use tracing::{info, warn};

use crate::layout::ExportLayout;
use crate::model::{ContactMap, ContactRecord};
use crate::sources::{read_json, StringListEntry};

/// Loads every `followers_*.json` file into the contact map.
///
/// Later files overwrite earlier records for the same handle
/// (last-write-wins on the base fields). Unreadable files are skipped.
/// Returns the number of unique followers loaded.
pub fn load_followers(layout: &ExportLayout, contacts: &mut ContactMap) -> usize {
    let dir = layout.connections_dir();
    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(path = %dir.display(), %err, "followers directory unreadable");
            return contacts.len();
        }
    };

    let mut paths: Vec<_> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("followers_") && n.ends_with(".json"))
        })
        .collect();
    // Deterministic file order so last-write-wins is reproducible.
    paths.sort();

    for path in paths {
        let Some(file_entries) = read_json::<Vec<StringListEntry>>(&path) else {
            continue;
        };
        for entry in file_entries {
            let Some(username) = entry.normalized_value() else {
                continue;
            };
            let item = &entry.string_list_data[0];
            let record = ContactRecord::follower(
                username.clone(),
                item.href.clone().unwrap_or_default(),
                item.timestamp,
            );
            contacts.insert(username, record);
        }
    }

    info!(count = contacts.len(), "loaded followers");
    contacts.len()
}
