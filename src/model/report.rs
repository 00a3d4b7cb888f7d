use crate::model::{
    CommitView, ContributorSummary, PullRequestView, RepositoryInfo, VisualizationData,
};
use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub metadata: Metadata,
    pub commits: IndexMap<String, AuthorCommitSummary>,
    pub pull_requests: IndexMap<String, AuthorPullRequestSummary>,
    pub lines_of_code: IndexMap<String, usize>,
    pub commit_activity: CommitActivity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contributor_stats: Option<IndexMap<String, ContributorSummary>>,
    pub visualization: VisualizationData,
}

impl Report {
    pub fn new(analyzed_at: DateTime<Utc>) -> Self {
        Self {
            metadata: Metadata::new(analyzed_at),
            commits: IndexMap::new(),
            pull_requests: IndexMap::new(),
            lines_of_code: IndexMap::new(),
            commit_activity: CommitActivity::default(),
            contributor_stats: None,
            visualization: VisualizationData::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Metadata {
    pub analyzed_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<RepositoryInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub until: Option<String>,
    pub commit_source: CommitSource,
    pub activity_source: ActivitySource,
    pub capabilities: Capabilities,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub advisories: Vec<Advisory>,
}

impl Metadata {
    fn new(analyzed_at: DateTime<Utc>) -> Self {
        Self {
            analyzed_at,
            repository: None,
            since: None,
            until: None,
            commit_source: CommitSource::None,
            activity_source: ActivitySource::Daily,
            capabilities: Capabilities::default(),
            advisories: vec![],
        }
    }
}

/// Where the commit map of a report came from.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitSource {
    Local,
    Remote,
    None,
}

/// Which activity feed backs the commit activity map.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivitySource {
    Daily,
    Weekly,
}

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize)]
pub struct Capabilities {
    /// Pull request records carried merge timestamps.
    pub merge_times: bool,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryKind {
    SourceUnavailable,
    ConfigurationMismatch,
}

/// A degraded source the caller should know about. Never fatal.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Advisory {
    pub kind: AdvisoryKind,
    pub message: String,
}

impl Advisory {
    pub fn new(kind: AdvisoryKind, message: impl ToString) -> Self {
        Self {
            kind,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuthorCommitSummary {
    pub total_commits: usize,
    pub total_additions: usize,
    pub total_deletions: usize,
    pub commits: Vec<CommitView>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuthorPullRequestSummary {
    pub total_prs: usize,
    pub merged: usize,
    pub open: usize,
    pub closed: usize,
    pub total_additions: usize,
    pub total_deletions: usize,
    pub pull_requests: Vec<PullRequestView>,
}

/// Commits per day when read locally, per week when only the forge had data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CommitActivity {
    Daily(IndexMap<NaiveDate, usize>),
    Weekly(IndexMap<NaiveDate, WeeklyActivity>),
}

impl CommitActivity {
    pub fn counts(&self) -> Vec<(NaiveDate, usize)> {
        match self {
            CommitActivity::Daily(days) => days.iter().map(|(d, c)| (*d, *c)).collect(),
            CommitActivity::Weekly(weeks) => weeks.iter().map(|(d, w)| (*d, w.total)).collect(),
        }
    }
}

impl Default for CommitActivity {
    fn default() -> Self {
        CommitActivity::Daily(IndexMap::new())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyActivity {
    pub total: usize,
    pub days: [usize; 7],
}
