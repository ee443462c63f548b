//! Follow-request and unfollow enrichers.
//!
//! Order is load-bearing: pending requests are applied before recent
//! requests (pending overwrites, recent only fills an unset status), and
//! unfollows run last so they can overwrite either. None of these sources
//! ever creates an identity.

use serde::Deserialize;
use tracing::info;

use crate::layout::ExportLayout;
use crate::model::{ContactMap, ContactStatus};
use crate::sources::{read_json, StringListEntry};

#[derive(Debug, Deserialize)]
struct FollowRequestsFile {
    #[serde(rename = "relationships_permanent_follow_requests", default)]
    entries: Vec<StringListEntry>,
}

#[derive(Debug, Deserialize)]
struct UnfollowedFile {
    #[serde(rename = "relationships_unfollowed_users", default)]
    entries: Vec<StringListEntry>,
}

/// Applies pending then recent follow requests.
///
/// Pending sets the status unconditionally; recent only when no status
/// has been set yet, so pending always wins for a contact present in both
/// files. Returns the number of statuses touched.
pub fn load_follow_requests(layout: &ExportLayout, contacts: &mut ContactMap) -> usize {
    let mut touched = 0;

    if let Some(file) = read_json::<FollowRequestsFile>(&layout.pending_requests_file()) {
        for entry in file.entries {
            let Some(username) = entry.normalized_value() else {
                continue;
            };
            if let Some(record) = contacts.get_mut(&username) {
                record.status = Some(ContactStatus::PendingRequest);
                touched += 1;
            }
        }
    }

    if let Some(file) = read_json::<FollowRequestsFile>(&layout.recent_requests_file()) {
        for entry in file.entries {
            let Some(username) = entry.normalized_value() else {
                continue;
            };
            if let Some(record) = contacts.get_mut(&username) {
                if record.status.is_none() {
                    record.status = Some(ContactStatus::RecentRequest);
                    touched += 1;
                }
            }
        }
    }

    info!(count = touched, "applied follow-request statuses");
    touched
}

/// Marks recently unfollowed contacts, overwriting any request status.
pub fn load_recently_unfollowed(layout: &ExportLayout, contacts: &mut ContactMap) -> usize {
    let mut touched = 0;

    if let Some(file) = read_json::<UnfollowedFile>(&layout.unfollowed_file()) {
        for entry in file.entries {
            let Some(username) = entry.normalized_value() else {
                continue;
            };
            if let Some(record) = contacts.get_mut(&username) {
                record.status = Some(ContactStatus::RecentlyUnfollowed);
                touched += 1;
            }
        }
    }

    info!(count = touched, "applied unfollow statuses");
    touched
}
