//! Builds on-disk export fixtures for the end-to-end tests.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

/// A builder for a synthetic Instagram export tree.
pub struct ExportFixture {
    pub dir: TempDir,
}

impl ExportFixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("connections/followers_and_following")).unwrap();
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    fn connections(&self) -> std::path::PathBuf {
        self.path().join("connections/followers_and_following")
    }

    pub fn followers(&self, entries: &[(&str, i64)]) -> &Self {
        let items: Vec<String> = entries
            .iter()
            .map(|(name, ts)| {
                format!(
                    r#"{{"string_list_data":[{{"href":"https://www.instagram.com/{name}","value":"{name}","timestamp":{ts}}}]}}"#
                )
            })
            .collect();
        fs::write(
            self.connections().join("followers_1.json"),
            format!("[{}]", items.join(",")),
        )
        .unwrap();
        self
    }

    pub fn comments(&self, entries: &[(&str, i64)]) -> &Self {
        let items: Vec<String> = entries
            .iter()
            .map(|(text, ts)| {
                format!(
                    r#"{{"string_map_data":{{"Comment":{{"value":{}}},"Time":{{"timestamp":{ts}}}}}}}"#,
                    serde_json::to_string(text).unwrap()
                )
            })
            .collect();
        let dir = self.path().join("your_instagram_activity/comments");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("post_comments_1.json"), format!("[{}]", items.join(","))).unwrap();
        self
    }

    pub fn conversation(&self, area: &str, folder: &str, participant: &str, messages: &[(&str, i64)]) -> &Self {
        let msgs: Vec<String> = messages
            .iter()
            .map(|(sender, ts_ms)| {
                format!(r#"{{"sender_name":"{sender}","timestamp_ms":{ts_ms}}}"#)
            })
            .collect();
        let json = format!(
            r#"{{"participants":[{{"name":"{participant}"}},{{"name":"Photia Studio"}}],"messages":[{}]}}"#,
            msgs.join(",")
        );
        let dir = self
            .path()
            .join("your_instagram_activity/messages")
            .join(area)
            .join(folder);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("message_1.json"), json).unwrap();
        self
    }

    pub fn story_likes(&self, titles: &[(&str, i64)]) -> &Self {
        let items: Vec<String> = titles
            .iter()
            .map(|(title, ts)| {
                format!(r#"{{"title":"{title}","string_list_data":[{{"timestamp":{ts}}}]}}"#)
            })
            .collect();
        let dir = self.path().join("your_instagram_activity/story_interactions");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("story_likes.json"),
            format!(r#"{{"story_activities_story_likes":[{}]}}"#, items.join(",")),
        )
        .unwrap();
        self
    }

    fn string_list_file(&self, file: &str, key: &str, names: &[&str]) -> &Self {
        let items: Vec<String> = names
            .iter()
            .map(|name| format!(r#"{{"string_list_data":[{{"value":"{name}"}}]}}"#))
            .collect();
        fs::write(
            self.connections().join(file),
            format!(r#"{{"{key}":[{}]}}"#, items.join(",")),
        )
        .unwrap();
        self
    }

    pub fn pending_requests(&self, names: &[&str]) -> &Self {
        self.string_list_file(
            "pending_follow_requests.json",
            "relationships_permanent_follow_requests",
            names,
        )
    }

    pub fn recent_requests(&self, names: &[&str]) -> &Self {
        self.string_list_file(
            "recent_follow_requests.json",
            "relationships_permanent_follow_requests",
            names,
        )
    }

    pub fn unfollowed(&self, names: &[&str]) -> &Self {
        self.string_list_file(
            "recently_unfollowed_profiles.json",
            "relationships_unfollowed_users",
            names,
        )
    }
}
