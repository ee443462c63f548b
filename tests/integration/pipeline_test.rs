//! End-to-end pipeline tests over synthetic export trees.

use chrono::Utc;

use ifa::model::ContactStatus;
use ifa::pipeline::{run, RunOptions};
use ifa::ContactRecord;

use crate::fixture::ExportFixture;

fn no_export_options() -> RunOptions {
    RunOptions {
        emit_jsonl: false,
        emit_xlsx: false,
        ..RunOptions::default()
    }
}

fn jsonl_only_options() -> RunOptions {
    RunOptions {
        emit_xlsx: false,
        ..RunOptions::default()
    }
}

fn read_records(path: &std::path::Path) -> Vec<ContactRecord> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn full_run_produces_expected_summary() {
    let now = Utc::now().timestamp();
    let fixture = ExportFixture::new();
    fixture
        .followers(&[("ann", now - 100 * 86_400), ("bob", now - 50 * 86_400)])
        .comments(&[("@ann nice!", now - 10 * 86_400)])
        .conversation(
            "message_requests",
            "stranger_42",
            "Stranger",
            &[("Stranger", (now - 5 * 86_400) * 1000)],
        )
        .story_likes(&[("bob", now - 3 * 86_400)]);

    let out = tempfile::tempdir().unwrap();
    let summary = run(fixture.path(), out.path(), &jsonl_only_options(), None).unwrap();

    assert_eq!(summary.total_entries, 3);
    assert_eq!(summary.followers_count, 2);
    assert_eq!(summary.non_followers_count, 1);
    assert_eq!(summary.entries_with_interactions, 3);
    assert_eq!(summary.output_files.len(), 1);
}

#[test]
fn worked_engagement_example_scores_31() {
    // 3 comments (last 10 days ago), 1 initiated message (40 days ago),
    // 2 story likes: 6 + 8 + 2 + 10 + 5 = 31.00
    let now = Utc::now().timestamp();
    let fixture = ExportFixture::new();
    fixture
        .followers(&[("ann", now - 365 * 86_400)])
        .comments(&[
            ("@ann one", now - 20 * 86_400),
            ("@ann two", now - 15 * 86_400),
            ("@ann three", now - 10 * 86_400),
        ])
        .conversation(
            "inbox",
            "ann_123",
            "ann",
            &[("ann", (now - 40 * 86_400) * 1000)],
        )
        .story_likes(&[("ann", now - 3 * 86_400), ("ann", now - 2 * 86_400)]);

    let out = tempfile::tempdir().unwrap();
    run(fixture.path(), out.path(), &jsonl_only_options(), None).unwrap();

    let records = read_records(&out.path().join("followers_aggregated.jsonl"));
    let ann = records.iter().find(|r| r.username == "ann").unwrap();
    assert_eq!(ann.engagement_score, Some(31.00));
}

#[test]
fn status_ordering_pending_then_recent_then_unfollow() {
    let fixture = ExportFixture::new();
    fixture
        .followers(&[("gone", 100), ("pending_only", 100), ("recent_only", 100)])
        .pending_requests(&["gone", "pending_only"])
        .recent_requests(&["gone", "pending_only", "recent_only"])
        .unfollowed(&["gone"]);

    let out = tempfile::tempdir().unwrap();
    run(fixture.path(), out.path(), &jsonl_only_options(), None).unwrap();

    let records = read_records(&out.path().join("followers_aggregated.jsonl"));
    let status_of = |name: &str| {
        records
            .iter()
            .find(|r| r.username == name)
            .unwrap()
            .status
    };
    // unfollow overwrites; pending beats recent; recent fills absence
    assert_eq!(status_of("gone"), Some(ContactStatus::RecentlyUnfollowed));
    assert_eq!(status_of("pending_only"), Some(ContactStatus::PendingRequest));
    assert_eq!(status_of("recent_only"), Some(ContactStatus::RecentRequest));
}

#[test]
fn message_request_creates_non_follower_lead() {
    let fixture = ExportFixture::new();
    fixture.followers(&[("ann", 100)]).conversation(
        "message_requests",
        "fresh_lead_9",
        "Fresh Lead",
        &[("Fresh Lead", 2_000_000), ("Fresh Lead", 1_000_000)],
    );

    let out = tempfile::tempdir().unwrap();
    let summary = run(fixture.path(), out.path(), &jsonl_only_options(), None).unwrap();
    assert_eq!(summary.non_followers_count, 1);

    let records = read_records(&out.path().join("followers_aggregated.jsonl"));
    let lead = records.iter().find(|r| !r.is_follower).unwrap();
    assert_eq!(lead.status, Some(ContactStatus::MessageRequestOnly));
    let messages = lead.messages.as_ref().unwrap();
    assert_eq!(messages.message_request_count, Some(2));
    assert_eq!(messages.message_count, 2);
    assert!(messages.initiated_conversation);
}

#[test]
fn jsonl_is_sorted_by_score_descending() {
    let now = Utc::now().timestamp();
    let fixture = ExportFixture::new();
    fixture
        .followers(&[("idle", 100), ("busy", 100)])
        .comments(&[("@busy hello", now - 5 * 86_400)]);

    let out = tempfile::tempdir().unwrap();
    run(fixture.path(), out.path(), &jsonl_only_options(), None).unwrap();

    let records = read_records(&out.path().join("followers_aggregated.jsonl"));
    assert_eq!(records[0].username, "busy");
    assert_eq!(records[1].username, "idle");
    let scores: Vec<f64> = records.iter().map(|r| r.engagement_score.unwrap()).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn sample_comments_never_exceed_five() {
    let now = Utc::now().timestamp();
    let fixture = ExportFixture::new();
    let comments: Vec<(String, i64)> = (0..9)
        .map(|i| (format!("@ann comment {i}"), now - (i + 1) * 86_400))
        .collect();
    let comment_refs: Vec<(&str, i64)> =
        comments.iter().map(|(t, ts)| (t.as_str(), *ts)).collect();
    fixture.followers(&[("ann", 100)]).comments(&comment_refs);

    let out = tempfile::tempdir().unwrap();
    run(fixture.path(), out.path(), &jsonl_only_options(), None).unwrap();

    let records = read_records(&out.path().join("followers_aggregated.jsonl"));
    let ann = records.iter().find(|r| r.username == "ann").unwrap();
    let summary = ann.comments.as_ref().unwrap();
    assert_eq!(summary.total_comments, 9);
    assert_eq!(summary.sample_comments.len(), 5);
}

#[test]
fn run_without_exports_writes_nothing() {
    let fixture = ExportFixture::new();
    fixture.followers(&[("ann", 100)]);
    let out = tempfile::tempdir().unwrap();
    let summary = run(fixture.path(), out.path(), &no_export_options(), None).unwrap();
    assert!(summary.output_files.is_empty());
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn malformed_source_files_do_not_abort_the_run() {
    let fixture = ExportFixture::new();
    fixture.followers(&[("ann", 100)]);
    let comments_dir = fixture.path().join("your_instagram_activity/comments");
    std::fs::create_dir_all(&comments_dir).unwrap();
    std::fs::write(comments_dir.join("post_comments_1.json"), "{{{ damaged").unwrap();

    let out = tempfile::tempdir().unwrap();
    let summary = run(fixture.path(), out.path(), &jsonl_only_options(), None).unwrap();
    assert_eq!(summary.total_entries, 1);
}

#[cfg(feature = "xlsx")]
#[test]
fn spreadsheet_export_writes_workbook() {
    let fixture = ExportFixture::new();
    fixture.followers(&[("ann", 100)]);
    let out = tempfile::tempdir().unwrap();
    let options = RunOptions {
        emit_jsonl: false,
        ..RunOptions::default()
    };
    let summary = run(fixture.path(), out.path(), &options, None).unwrap();
    assert_eq!(summary.output_files.len(), 1);
    assert!(summary.output_files[0].ends_with("followers_aggregated.xlsx"));
    assert!(summary.output_files[0].exists());
}
