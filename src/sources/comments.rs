//! Comment enricher: matches `@mention`s in the comment export against
//! known contacts.

use serde::Deserialize;
use tracing::info;

use crate::layout::ExportLayout;
use crate::model::{iso_from_epoch, ContactMap, SampleComment};
use crate::sources::read_json;
use crate::text::{extract_mentioned_username, repair_mojibake, truncate_chars};

/// Samples kept per contact.
const MAX_SAMPLE_COMMENTS: usize = 5;

/// Sample text truncation, in characters.
const MAX_SAMPLE_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
struct CommentEntry {
    #[serde(default)]
    string_map_data: Option<CommentFields>,
}

#[derive(Debug, Deserialize)]
struct CommentFields {
    #[serde(rename = "Comment", default)]
    comment: Option<MapField>,
    #[serde(rename = "Time", default)]
    time: Option<MapField>,
}

#[derive(Debug, Deserialize)]
struct MapField {
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    timestamp: Option<i64>,
}

/// Aggregates the comment export into matching contact records.
///
/// A comment contributes only when it mentions a username that is already
/// in the map; no identities are created here. Returns the number of
/// comments matched.
pub fn load_comments(layout: &ExportLayout, contacts: &mut ContactMap) -> usize {
    let Some(entries) = read_json::<Vec<CommentEntry>>(&layout.comments_file()) else {
        return 0;
    };

    let mut matched = 0;
    for entry in entries {
        let Some(fields) = entry.string_map_data else {
            continue;
        };
        let raw_text = fields
            .comment
            .and_then(|c| c.value)
            .unwrap_or_default();
        let text = repair_mojibake(&raw_text);
        let timestamp = fields.time.and_then(|t| t.timestamp).unwrap_or(0);

        let Some(username) = extract_mentioned_username(&text) else {
            continue;
        };
        let Some(record) = contacts.get_mut(&username) else {
            continue;
        };

        let summary = record.comments_mut();
        summary.total_comments += 1;

        // Untimestamped comments count but contribute no bounds or samples.
        if timestamp != 0 {
            if summary.first_comment_timestamp.is_none_or(|t| timestamp < t) {
                summary.first_comment_timestamp = Some(timestamp);
                summary.first_comment_date = iso_from_epoch(timestamp);
            }
            if summary.last_comment_timestamp.is_none_or(|t| timestamp > t) {
                summary.last_comment_timestamp = Some(timestamp);
                summary.last_comment_date = iso_from_epoch(timestamp);
            }
            if summary.sample_comments.len() < MAX_SAMPLE_COMMENTS {
                summary.sample_comments.push(SampleComment {
                    text: truncate_chars(&text, MAX_SAMPLE_CHARS),
                    date: iso_from_epoch(timestamp).unwrap_or_default(),
                });
            }
        }

        matched += 1;
    }

    info!(count = matched, "processed comments from known contacts");
    matched
}
