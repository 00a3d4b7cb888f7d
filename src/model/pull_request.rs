use crate::analyze::bucket::parse_timestamp;
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PullRequestState {
    Open,
    Closed,
}

/// Which pull requests a remote listing should return.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum PullRequestFilter {
    Open,
    Closed,
    All,
}

impl PullRequestFilter {
    pub fn as_query(&self) -> &'static str {
        match self {
            PullRequestFilter::Open => "open",
            PullRequestFilter::Closed => "closed",
            PullRequestFilter::All => "all",
        }
    }

    pub fn accepts(&self, state: PullRequestState) -> bool {
        match self {
            PullRequestFilter::Open => state == PullRequestState::Open,
            PullRequestFilter::Closed => state == PullRequestState::Closed,
            PullRequestFilter::All => true,
        }
    }
}

/// Pull request as reported by the forge. Timestamps are kept as the raw
/// strings the forge sent; they are parsed where a series needs them.
#[derive(Debug, Clone, PartialEq)]
pub struct PullRequestRecord {
    pub number: u64,
    pub title: String,
    pub author_key: String,
    pub created_at: String,
    pub closed_at: Option<String>,
    pub merged_at: Option<String>,
    pub state: PullRequestState,
    pub additions: usize,
    pub deletions: usize,
    pub changed_files: usize,
}

impl PullRequestRecord {
    /// A merge time wins over the reported state.
    pub fn is_merged(&self) -> bool {
        self.merged_at.is_some()
    }

    pub fn is_open(&self) -> bool {
        self.state == PullRequestState::Open
    }

    pub fn is_closed_unmerged(&self) -> bool {
        self.state == PullRequestState::Closed && !self.is_merged()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PullRequestView {
    pub number: u64,
    pub title: String,
    pub state: PullRequestState,
    pub created_at: String,
    pub closed_at: Option<String>,
    pub merged_at: Option<String>,
    pub additions: usize,
    pub deletions: usize,
    pub changed_files: usize,
}

impl From<&PullRequestRecord> for PullRequestView {
    fn from(pr: &PullRequestRecord) -> Self {
        Self {
            number: pr.number,
            title: pr.title.clone(),
            state: pr.state,
            created_at: iso8601(&pr.created_at),
            closed_at: pr.closed_at.as_deref().map(iso8601),
            merged_at: pr.merged_at.as_deref().map(iso8601),
            additions: pr.additions,
            deletions: pr.deletions,
            changed_files: pr.changed_files,
        }
    }
}

// Unparsable values pass through untouched so downstream series can drop them.
fn iso8601(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(datetime) => datetime.to_rfc3339_opts(SecondsFormat::Secs, true),
        None => raw.to_string(),
    }
}
