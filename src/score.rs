//! Finalizer: derived fields computed once every source is merged.
//!
//! Scoring weights: comments 2, messages 3 (+5 if the contact opened the
//! conversation), story events 1 each. A recency bonus applies
//! independently to the last comment and the last message: +10 inside 30
//! days, +5 inside 90. Both bonuses stack.

use chrono::Utc;

use crate::model::{ContactMap, ContactRecord, ContactStatus, DiscoveryMethod};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Engagement score for one record, evaluated against `now` (epoch secs).
///
/// `now` is injected rather than read from the clock so scoring is
/// reproducible in tests.
pub fn engagement_score(record: &ContactRecord, now: f64) -> f64 {
    let mut score = 0.0;

    if let Some(comments) = &record.comments {
        score += comments.total_comments as f64 * 2.0;
        if let Some(last) = comments.last_comment_timestamp {
            score += recency_bonus(now, last as f64);
        }
    }

    if let Some(messages) = &record.messages {
        score += messages.message_count as f64 * 3.0;
        if messages.initiated_conversation {
            score += 5.0;
        }
        if let Some(last) = messages.last_message_timestamp {
            score += recency_bonus(now, last);
        }
    }

    if let Some(stories) = &record.story_interactions {
        score += (stories.story_likes_count
            + stories.emoji_reactions_count
            + stories.countdown_interactions_count) as f64;
    }

    (score * 100.0).round() / 100.0
}

fn recency_bonus(now: f64, last: f64) -> f64 {
    let days_ago = (now - last) / SECONDS_PER_DAY;
    if days_ago < 30.0 {
        10.0
    } else if days_ago < 90.0 {
        5.0
    } else {
        0.0
    }
}

/// Infers how the contact most likely found the account.
///
/// Fixed decision order: non-follower, then missing follow date, then
/// comment-before-follow, then message-before-follow, then initiated
/// conversation, then unknown.
pub fn infer_discovery_method(record: &ContactRecord) -> DiscoveryMethod {
    let initiated = record
        .messages
        .as_ref()
        .is_some_and(|m| m.initiated_conversation);

    if !record.is_follower {
        return DiscoveryMethod::DirectOutreach;
    }

    // A zero follow date means the export carried no timestamp.
    let follow_date = match record.follow_date.filter(|&t| t != 0) {
        Some(t) => t,
        None => {
            return if initiated {
                DiscoveryMethod::DirectOutreach
            } else {
                DiscoveryMethod::Unknown
            };
        }
    };

    if let Some(first_comment) = record
        .comments
        .as_ref()
        .and_then(|c| c.first_comment_timestamp)
    {
        if first_comment < follow_date {
            return DiscoveryMethod::ContentDiscovery;
        }
    }

    if let Some(first_message) = record
        .messages
        .as_ref()
        .and_then(|m| m.first_message_timestamp)
    {
        if first_message < follow_date as f64 {
            return DiscoveryMethod::DirectOutreach;
        }
    }

    if initiated {
        return DiscoveryMethod::DirectOutreach;
    }

    DiscoveryMethod::Unknown
}

/// Computes all derived fields for every record, against `now`.
pub fn finalize_with_now(contacts: &mut ContactMap, now: f64) {
    for record in contacts.values_mut() {
        if record.status.is_none() {
            record.status = Some(ContactStatus::ActiveFollower);
        }

        record.engagement_score = Some(engagement_score(record, now));
        record.inferred_discovery_method = Some(infer_discovery_method(record));

        record.has_interactions = Some(
            record.comments.is_some()
                || record.messages.is_some()
                || record.story_interactions.is_some(),
        );

        let mut total = 0;
        if let Some(comments) = &record.comments {
            total += comments.total_comments;
        }
        if let Some(messages) = &record.messages {
            total += messages.message_count;
        }
        if let Some(stories) = &record.story_interactions {
            total += stories.story_likes_count
                + stories.emoji_reactions_count
                + stories.countdown_interactions_count;
        }
        record.total_interactions = Some(total);
    }
}

/// Finalizes against the current wall clock.
pub fn finalize(contacts: &mut ContactMap) {
    finalize_with_now(contacts, Utc::now().timestamp() as f64);
}
