//! Denormalized contact records and their nested interaction summaries.
//!
//! One [`ContactRecord`] per normalized username. Nested summaries are
//! `Option`s created lazily on the first matching event, so "never
//! observed" and "observed with zero count" stay distinguishable. Derived
//! fields are `None` until the finalizer runs.

use chrono::{Local, TimeZone};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The single in-memory mapping the whole pipeline mutates.
///
/// `IndexMap` keeps insertion order, which the substring-matching
/// heuristic in the message enrichers depends on (first match wins over
/// iteration order).
pub type ContactMap = IndexMap<String, ContactRecord>;

/// Relationship status of a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    ActiveFollower,
    PendingRequest,
    RecentRequest,
    RecentlyUnfollowed,
    MessageRequestOnly,
}

/// How a contact most likely found the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryMethod {
    ContentDiscovery,
    DirectOutreach,
    Unknown,
}

/// A truncated comment kept as a sample on the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleComment {
    pub text: String,
    pub date: String,
}

/// Aggregated comment activity for one contact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentSummary {
    pub total_comments: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_comment_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_comment_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_comment_timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_comment_timestamp: Option<i64>,
    #[serde(default)]
    pub sample_comments: Vec<SampleComment>,
}

/// Aggregated direct-message activity for one contact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageSummary {
    pub has_messaged: bool,
    pub message_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_request_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_message_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_message_timestamp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message_timestamp: Option<f64>,
    pub initiated_conversation: bool,
}

impl MessageSummary {
    /// Folds one timestamped message into the count and first/last bounds.
    pub fn record_message(&mut self, timestamp_secs: f64) {
        self.message_count += 1;
        if self
            .first_message_timestamp
            .is_none_or(|t| timestamp_secs < t)
        {
            self.first_message_timestamp = Some(timestamp_secs);
            self.first_message_date = iso_from_epoch(timestamp_secs as i64);
        }
        if self
            .last_message_timestamp
            .is_none_or(|t| timestamp_secs > t)
        {
            self.last_message_timestamp = Some(timestamp_secs);
            self.last_message_date = iso_from_epoch(timestamp_secs as i64);
        }
    }
}

/// Aggregated story interactions for one contact.
///
/// Three independent counters share a single last-interaction timestamp:
/// the maximum across all kinds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorySummary {
    pub story_likes_count: u64,
    pub emoji_reactions_count: u64,
    pub countdown_interactions_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_story_interaction_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_story_interaction_timestamp: Option<i64>,
}

impl StorySummary {
    /// Advances the shared last-interaction timestamp if this one is newer.
    pub fn record_timestamp(&mut self, timestamp: i64) {
        if self
            .last_story_interaction_timestamp
            .is_none_or(|t| timestamp > t)
        {
            self.last_story_interaction_timestamp = Some(timestamp);
            self.last_story_interaction_date = iso_from_epoch(timestamp);
        }
    }
}

/// One denormalized record per contact, keyed by normalized username.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactRecord {
    pub username: String,
    pub profile_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_date: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_date_iso: Option<String>,
    pub is_follower: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ContactStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<CommentSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<MessageSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story_interactions: Option<StorySummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inferred_discovery_method: Option<DiscoveryMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_interactions: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_interactions: Option<u64>,
}

impl ContactRecord {
    /// A follower loaded from the follower-list export.
    pub fn follower(username: String, profile_url: String, follow_date: Option<i64>) -> Self {
        let follow_date_iso = follow_date.filter(|&t| t != 0).and_then(iso_from_epoch);
        Self {
            username,
            profile_url,
            follow_date,
            follow_date_iso,
            is_follower: true,
            status: None,
            comments: None,
            messages: None,
            story_interactions: None,
            engagement_score: None,
            inferred_discovery_method: None,
            has_interactions: None,
            total_interactions: None,
        }
    }

    /// A non-follower lead discovered through a message request.
    pub fn message_request_lead(username: String) -> Self {
        let profile_url = format!("https://www.instagram.com/{username}");
        Self {
            username,
            profile_url,
            follow_date: None,
            follow_date_iso: None,
            is_follower: false,
            status: Some(ContactStatus::MessageRequestOnly),
            comments: None,
            messages: None,
            story_interactions: None,
            engagement_score: None,
            inferred_discovery_method: None,
            has_interactions: None,
            total_interactions: None,
        }
    }

    /// The messages summary, created on first use.
    pub fn messages_mut(&mut self) -> &mut MessageSummary {
        self.messages.get_or_insert_with(|| MessageSummary {
            has_messaged: true,
            ..MessageSummary::default()
        })
    }

    /// The story summary, created on first use.
    pub fn stories_mut(&mut self) -> &mut StorySummary {
        self.story_interactions.get_or_insert_with(StorySummary::default)
    }

    /// The comments summary, created on first use.
    pub fn comments_mut(&mut self) -> &mut CommentSummary {
        self.comments.get_or_insert_with(CommentSummary::default)
    }
}

/// Formats an epoch-seconds timestamp as a local ISO-8601 string.
///
/// Returns `None` for timestamps outside chrono's representable range.
pub fn iso_from_epoch(secs: i64) -> Option<String> {
    Local
        .timestamp_opt(secs, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S").to_string())
}
