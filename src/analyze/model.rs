use crate::model::{
    ActivitySource, Advisory, CommitRecord, CommitSource, ContributorStats, PullRequestRecord,
    RepositoryInfo, WeeklyCommitActivity,
};
use chrono::NaiveDate;
use indexmap::IndexMap;

pub type AuthorCommits = IndexMap<String, Vec<CommitRecord>>;

/// Raw records gathered from every source of one run, before aggregation.
#[derive(Debug, Clone)]
pub struct SourceData {
    pub since: Option<String>,
    pub until: Option<String>,
    pub commit_source: CommitSource,
    pub commits: AuthorCommits,
    pub lines_of_code: IndexMap<String, usize>,
    pub daily_activity: IndexMap<NaiveDate, usize>,
    pub weekly_activity: Vec<WeeklyCommitActivity>,
    pub pull_requests: Vec<PullRequestRecord>,
    pub contributor_stats: Option<Vec<ContributorStats>>,
    pub repository: Option<RepositoryInfo>,
    pub advisories: Vec<Advisory>,
}

impl SourceData {
    pub fn new(since: Option<String>, until: Option<String>) -> Self {
        Self {
            since,
            until,
            commit_source: CommitSource::None,
            commits: IndexMap::new(),
            lines_of_code: IndexMap::new(),
            daily_activity: IndexMap::new(),
            weekly_activity: vec![],
            pull_requests: vec![],
            contributor_stats: None,
            repository: None,
            advisories: vec![],
        }
    }

    pub fn insert_commits(&mut self, source: CommitSource, commits: AuthorCommits) {
        self.commit_source = source;
        self.commits = commits;
    }

    pub fn insert_pull_requests(&mut self, pull_requests: Vec<PullRequestRecord>) {
        self.pull_requests = pull_requests;
    }

    pub fn advise(&mut self, advisory: Advisory) {
        log::warn!("{}", advisory.message);
        self.advisories.push(advisory);
    }
}

impl ActivitySource {
    /// Local daily counts win; weekly forge totals are only a fallback.
    pub fn choose(data: &SourceData) -> Self {
        if data.daily_activity.is_empty() && !data.weekly_activity.is_empty() {
            ActivitySource::Weekly
        } else {
            ActivitySource::Daily
        }
    }
}
