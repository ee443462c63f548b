//! Story-interaction enricher: likes, emoji reactions, and countdown taps.
//!
//! Three sub-sources feed one shared summary per contact. Each entry is a
//! single event; the shared last-interaction timestamp is the maximum
//! across all three kinds, so sub-source order cannot change the result.

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::layout::ExportLayout;
use crate::model::ContactMap;
use crate::sources::{read_json, StringListItem};
use crate::text::normalize_username;

#[derive(Debug, Deserialize)]
struct StoryLikesFile {
    #[serde(rename = "story_activities_story_likes", default)]
    entries: Vec<TitledEntry>,
}

#[derive(Debug, Deserialize)]
struct EmojiReactionsFile {
    #[serde(rename = "story_activities_emoji_quick_reactions", default)]
    entries: Vec<TitledEntry>,
}

#[derive(Debug, Deserialize)]
struct CountdownsFile {
    #[serde(rename = "story_activities_countdowns", default)]
    entries: Vec<TitledEntry>,
}

/// An entry keyed by the contact's display name in `title`.
#[derive(Debug, Deserialize)]
struct TitledEntry {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    string_list_data: Vec<StringListItem>,
}

/// Which counter a sub-source feeds.
#[derive(Clone, Copy)]
enum Kind {
    Like,
    Emoji,
    Countdown,
}

fn apply_entries(contacts: &mut ContactMap, entries: Vec<TitledEntry>, kind: Kind) -> usize {
    let mut matched = 0;
    for entry in entries {
        let username = normalize_username(entry.title.as_deref().unwrap_or_default());
        if username.is_empty() {
            continue;
        }
        let Some(record) = contacts.get_mut(&username) else {
            continue;
        };
        let summary = record.stories_mut();
        match kind {
            Kind::Like => summary.story_likes_count += 1,
            Kind::Emoji => summary.emoji_reactions_count += 1,
            Kind::Countdown => summary.countdown_interactions_count += 1,
        }
        if let Some(ts) = entry.string_list_data.first().and_then(|i| i.timestamp) {
            if ts != 0 {
                summary.record_timestamp(ts);
            }
        }
        matched += 1;
    }
    matched
}

/// Aggregates all three story sub-sources into matching contacts.
///
/// Entries whose title resolves to no known contact are ignored. Returns
/// the number of matched events across all sub-sources.
pub fn load_story_interactions(layout: &ExportLayout, contacts: &mut ContactMap) -> usize {
    let dir = layout.story_dir();
    let mut matched = 0;

    if let Some(file) = read_json::<StoryLikesFile>(&story_path(&dir, "story_likes.json")) {
        matched += apply_entries(contacts, file.entries, Kind::Like);
    }
    if let Some(file) =
        read_json::<EmojiReactionsFile>(&story_path(&dir, "emoji_story_reactions.json"))
    {
        matched += apply_entries(contacts, file.entries, Kind::Emoji);
    }
    if let Some(file) = read_json::<CountdownsFile>(&story_path(&dir, "countdowns.json")) {
        matched += apply_entries(contacts, file.entries, Kind::Countdown);
    }

    info!(count = matched, "processed story interactions");
    matched
}

fn story_path(dir: &Path, file: &str) -> std::path::PathBuf {
    dir.join(file)
}
