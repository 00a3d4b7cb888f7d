//! Gitea REST payloads as printed by the forge CLI.

use crate::analyze::bucket::parse_timestamp;
use crate::model::{CommitRecord, PullRequestRecord, PullRequestState, RepositoryInfo};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct RawUser {
    #[serde(default)]
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPullRequest {
    pub number: u64,
    #[serde(default)]
    pub title: String,
    pub user: Option<RawUser>,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub created_at: String,
    pub closed_at: Option<String>,
    pub merged_at: Option<String>,
    pub additions: Option<usize>,
    pub deletions: Option<usize>,
    pub changed_files: Option<usize>,
}

impl From<RawPullRequest> for PullRequestRecord {
    fn from(raw: RawPullRequest) -> Self {
        let state = match raw.state.as_str() {
            "open" => PullRequestState::Open,
            "closed" => PullRequestState::Closed,
            _ if raw.closed_at.is_some() || raw.merged_at.is_some() => PullRequestState::Closed,
            _ => PullRequestState::Open,
        };
        Self {
            number: raw.number,
            title: raw.title,
            author_key: raw.user.map(|user| user.login).unwrap_or_default(),
            created_at: raw.created_at,
            closed_at: raw.closed_at,
            merged_at: raw.merged_at,
            state,
            additions: raw.additions.unwrap_or(0),
            deletions: raw.deletions.unwrap_or(0),
            changed_files: raw.changed_files.unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSignature {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub date: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCommitDetail {
    #[serde(default)]
    pub message: String,
    pub author: Option<RawSignature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCommitStats {
    #[serde(default)]
    pub additions: usize,
    #[serde(default)]
    pub deletions: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCommit {
    pub sha: String,
    pub commit: RawCommitDetail,
    pub author: Option<RawUser>,
    pub stats: Option<RawCommitStats>,
}

impl RawCommit {
    /// The forge login when the commit is linked to an account, the email otherwise.
    fn author_key(&self) -> String {
        match &self.author {
            Some(user) if !user.login.is_empty() => user.login.clone(),
            _ => self
                .commit
                .author
                .as_ref()
                .map(|signature| signature.email.clone())
                .unwrap_or_default(),
        }
    }

    /// `None` when the commit date cannot be read.
    pub fn into_record(self) -> Option<CommitRecord> {
        let date = self.commit.author.as_ref().map(|s| s.date.as_str()).unwrap_or("");
        let Some(timestamp) = parse_timestamp(date) else {
            log::warn!("Skipping remote commit {} with unparsable date '{}'", self.sha, date);
            return None;
        };
        let (additions, deletions) = self
            .stats
            .as_ref()
            .map_or((0, 0), |stats| (stats.additions, stats.deletions));
        Some(CommitRecord::new(
            &self.sha,
            &self.commit.message,
            timestamp,
            additions,
            deletions,
            self.author_key(),
        ))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawRepository {
    pub full_name: String,
    pub description: Option<String>,
    pub html_url: Option<String>,
    pub default_branch: Option<String>,
}

impl From<RawRepository> for RepositoryInfo {
    fn from(raw: RawRepository) -> Self {
        Self {
            full_name: raw.full_name,
            description: raw.description.filter(|d| !d.is_empty()),
            html_url: raw.html_url,
            default_branch: raw.default_branch,
        }
    }
}
