use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::Serialize;

const SHORT_SHA_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq)]
pub struct CommitRecord {
    pub sha: String,
    pub message: String,
    pub timestamp: DateTime<FixedOffset>,
    pub additions: usize,
    pub deletions: usize,
    pub author_key: String,
}

// Create
impl CommitRecord {
    pub fn new(
        sha: impl ToString,
        message: &str,
        timestamp: DateTime<FixedOffset>,
        additions: usize,
        deletions: usize,
        author_key: impl ToString,
    ) -> Self {
        Self {
            sha: sha.to_string(),
            message: message.lines().next().unwrap_or("").to_string(),
            timestamp,
            additions,
            deletions,
            author_key: author_key.to_string(),
        }
    }
}

/// Display form of a commit kept in the report. The full sha is not retained.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommitView {
    pub sha: String,
    pub message: String,
    pub date: String,
    pub additions: usize,
    pub deletions: usize,
}

impl From<&CommitRecord> for CommitView {
    fn from(commit: &CommitRecord) -> Self {
        Self {
            sha: commit.sha.chars().take(SHORT_SHA_LEN).collect(),
            message: commit.message.clone(),
            date: commit.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            additions: commit.additions,
            deletions: commit.deletions,
        }
    }
}
