//! Message enrichers: inbox conversations and message requests.
//!
//! Both read the per-conversation `message_1.json` layout. The inbox
//! enricher only updates known contacts; the message-request enricher is
//! the one path that can create new (non-follower) identities.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::layout::ExportLayout;
use crate::model::{ContactMap, ContactRecord};
use crate::sources::read_json;
use crate::text::normalize_username;

#[derive(Debug, Deserialize)]
struct Conversation {
    #[serde(default)]
    participants: Vec<Participant>,
    #[serde(default)]
    messages: Vec<RawMessage>,
}

#[derive(Debug, Deserialize)]
struct Participant {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    #[serde(default)]
    sender_name: Option<String>,
    #[serde(default)]
    timestamp_ms: Option<i64>,
}

/// Picks the conversation counterpart: the first participant whose name
/// does not contain the account-owner marker (case-insensitive), falling
/// back to the folder name with its trailing numeric-ID segment stripped.
fn resolve_participant(
    conversation: &Conversation,
    folder_name: &str,
    owner_marker: &str,
) -> Option<String> {
    let marker = owner_marker.to_lowercase();
    let other = conversation
        .participants
        .iter()
        .map(|p| p.name.as_deref().unwrap_or_default())
        .find(|name| !name.to_lowercase().contains(&marker));
    match other {
        Some(name) if !name.is_empty() => Some(name.to_string()),
        _ => handle_from_folder(folder_name),
    }
}

/// Derives a candidate handle from a `<username>_<numeric id>` folder name.
fn handle_from_folder(folder_name: &str) -> Option<String> {
    let parts: Vec<&str> = folder_name.split('_').collect();
    if parts.len() < 2 {
        return None;
    }
    let handle = normalize_username(&parts[..parts.len() - 1].join("_"));
    if handle.is_empty() {
        None
    } else {
        Some(handle)
    }
}

/// Matches a normalized participant to an existing contact key.
///
/// Exact match first, then substring containment in either direction over
/// the map in insertion order, first hit winning. Known limitation: a
/// handle that is a substring of another ("ann" inside "anna") can match
/// the wrong contact; which one wins depends purely on insertion order.
fn match_contact(contacts: &ContactMap, participant: &str) -> Option<String> {
    if contacts.contains_key(participant) {
        return Some(participant.to_string());
    }
    contacts
        .keys()
        .find(|key| participant.contains(key.as_str()) || key.contains(participant))
        .cloned()
}

/// Conversation folders under a messages directory, in sorted order.
///
/// Folder order decides substring-match winners, so it must be
/// deterministic rather than filesystem-dependent.
fn conversation_folders(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(path = %dir.display(), %err, "messages directory unreadable");
            return Vec::new();
        }
    };
    let mut folders: Vec<_> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    folders.sort();
    folders
}

/// True when the conversation's oldest message was sent by the matched
/// contact. The export stores messages newest-first, so the oldest is the
/// last element.
fn initiated_by(conversation: &Conversation, matched: &str) -> bool {
    let Some(first_message) = conversation.messages.last() else {
        return false;
    };
    let sender = normalize_username(first_message.sender_name.as_deref().unwrap_or_default());
    sender == matched || sender.contains(matched)
}

/// Enriches known contacts from the inbox.
///
/// Conversations that resolve to no known contact are dropped entirely;
/// this enricher never creates identities. Returns the number of
/// conversations merged.
pub fn load_inbox(layout: &ExportLayout, contacts: &mut ContactMap, owner_marker: &str) -> usize {
    let mut processed = 0;

    for folder in conversation_folders(&layout.inbox_dir()) {
        let Some(conversation) = read_json::<Conversation>(&folder.join("message_1.json")) else {
            continue;
        };
        if conversation.participants.is_empty() {
            continue;
        }
        let folder_name = folder
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let Some(participant) = resolve_participant(&conversation, folder_name, owner_marker)
        else {
            continue;
        };
        let participant = normalize_username(&participant);
        let Some(matched) = match_contact(contacts, &participant) else {
            continue;
        };
        if conversation.messages.is_empty() {
            continue;
        }

        let initiated = initiated_by(&conversation, &matched);
        let record = contacts.get_mut(&matched).expect("matched key exists");
        let summary = record.messages_mut();
        summary.initiated_conversation = initiated;

        for msg in &conversation.messages {
            let ms = msg.timestamp_ms.unwrap_or(0);
            if ms != 0 {
                summary.record_message(ms as f64 / 1000.0);
            }
        }

        processed += 1;
    }

    info!(count = processed, "processed inbox conversations");
    processed
}

/// Enriches contacts from message requests, creating non-follower leads.
///
/// A request matching an existing contact merges into it and force-sets
/// `initiated_conversation`: a request is by definition initiated by the
/// other party. An unmatched request creates a new non-follower record.
/// Returns the number of conversations processed.
pub fn load_message_requests(
    layout: &ExportLayout,
    contacts: &mut ContactMap,
    owner_marker: &str,
) -> usize {
    let mut processed = 0;

    for folder in conversation_folders(&layout.message_requests_dir()) {
        let Some(conversation) = read_json::<Conversation>(&folder.join("message_1.json")) else {
            continue;
        };
        if conversation.participants.is_empty() {
            continue;
        }
        let folder_name = folder
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let Some(participant) = resolve_participant(&conversation, folder_name, owner_marker)
        else {
            continue;
        };
        let participant = normalize_username(&participant);
        if conversation.messages.is_empty() {
            continue;
        }

        let message_total = conversation.messages.len() as u64;

        match match_contact(contacts, &participant) {
            Some(matched) => {
                let record = contacts.get_mut(&matched).expect("matched key exists");
                let summary = record.messages_mut();
                summary.message_request_count = Some(message_total);
                summary.initiated_conversation = true;
                for msg in &conversation.messages {
                    let ms = msg.timestamp_ms.unwrap_or(0);
                    if ms != 0 {
                        summary.record_message(ms as f64 / 1000.0);
                    }
                }
            }
            None => {
                let mut record = ContactRecord::message_request_lead(participant.clone());
                let summary = record.messages_mut();
                summary.message_request_count = Some(message_total);
                summary.initiated_conversation = true;
                for msg in &conversation.messages {
                    let ms = msg.timestamp_ms.unwrap_or(0);
                    if ms != 0 {
                        summary.record_message(ms as f64 / 1000.0);
                    }
                }
                // Leads count every message, timestamped or not.
                summary.message_count = message_total;
                contacts.insert(participant, record);
            }
        }

        processed += 1;
    }

    info!(count = processed, "processed message requests");
    processed
}
