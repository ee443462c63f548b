//! On-disk layout of an Instagram data export.
//!
//! All source paths are resolved in one place so the loaders never build
//! paths themselves. The export root is either the directory handed to the
//! pipeline or an `instagram-photia` child inside it; whichever variant,
//! it must contain a `connections` folder.

use std::path::{Path, PathBuf};

use crate::error::PipelineError;

/// Directory the archive extracts into when the export is nested.
const NESTED_EXPORT_DIR: &str = "instagram-photia";

/// Resolved export root with typed accessors for every source location.
#[derive(Debug, Clone)]
pub struct ExportLayout {
    root: PathBuf,
}

impl ExportLayout {
    /// Resolves the export root inside `data_dir`.
    ///
    /// Prefers an `instagram-photia` child; falls back to `data_dir` itself
    /// if it directly contains a `connections` folder.
    pub fn resolve(data_dir: &Path) -> Result<Self, PipelineError> {
        let nested = data_dir.join(NESTED_EXPORT_DIR);
        if nested.exists() {
            return Ok(Self { root: nested });
        }
        if data_dir.join("connections").exists() {
            return Ok(Self {
                root: data_dir.to_path_buf(),
            });
        }
        Err(PipelineError::Layout {
            path: data_dir.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `connections/followers_and_following`, home of the follower lists
    /// and the follow-request files.
    pub fn connections_dir(&self) -> PathBuf {
        self.root.join("connections").join("followers_and_following")
    }

    pub fn pending_requests_file(&self) -> PathBuf {
        self.connections_dir().join("pending_follow_requests.json")
    }

    pub fn recent_requests_file(&self) -> PathBuf {
        self.connections_dir().join("recent_follow_requests.json")
    }

    pub fn unfollowed_file(&self) -> PathBuf {
        self.connections_dir()
            .join("recently_unfollowed_profiles.json")
    }

    pub fn comments_file(&self) -> PathBuf {
        self.root
            .join("your_instagram_activity")
            .join("comments")
            .join("post_comments_1.json")
    }

    /// One subfolder per conversation, each holding `message_1.json`.
    pub fn inbox_dir(&self) -> PathBuf {
        self.root
            .join("your_instagram_activity")
            .join("messages")
            .join("inbox")
    }

    pub fn message_requests_dir(&self) -> PathBuf {
        self.root
            .join("your_instagram_activity")
            .join("messages")
            .join("message_requests")
    }

    pub fn story_dir(&self) -> PathBuf {
        self.root
            .join("your_instagram_activity")
            .join("story_interactions")
    }
}
