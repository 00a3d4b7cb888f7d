use crate::analyze::bucket::week_start;
use crate::analyze::{AuthorCommits, SourceData};
use crate::model::{
    ActivitySource, AuthorCommitSummary, AuthorPullRequestSummary, CommitActivity, CommitRecord,
    CommitView, ContributorStats, ContributorSummary, PullRequestRecord, PullRequestView, Report,
    WeeklyActivity, WeeklyCommitActivity,
};
use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexMap;
use itertools::Itertools;

pub trait Aggregator {
    fn aggregate(self, analyzed_at: DateTime<Utc>) -> Report;
}

impl Aggregator for SourceData {
    fn aggregate(self, analyzed_at: DateTime<Utc>) -> Report {
        let activity_source = ActivitySource::choose(&self);
        let mut report = Report::new(analyzed_at);

        report.commit_activity = commit_activity(&self, activity_source);
        report.commits = summarize_commits(&self.commits);
        report.pull_requests = summarize_pull_requests(&self.pull_requests);
        report.lines_of_code = self.lines_of_code;
        report.contributor_stats = self
            .contributor_stats
            .as_deref()
            .map(summarize_contributors)
            .filter(|stats| !stats.is_empty());

        let metadata = &mut report.metadata;
        metadata.since = self.since;
        metadata.until = self.until;
        metadata.repository = self.repository;
        metadata.commit_source = self.commit_source;
        metadata.activity_source = activity_source;
        metadata.capabilities.merge_times = has_merge_times(&self.pull_requests);
        metadata.advisories = self.advisories;
        report
    }
}

/// Groups commits by author key keeping first-seen author order and the
/// original order within each author.
pub fn group_commits(commits: Vec<CommitRecord>) -> AuthorCommits {
    let mut grouped = AuthorCommits::new();
    for commit in commits {
        grouped
            .entry(commit.author_key.clone())
            .or_default()
            .push(commit);
    }
    grouped
}

pub fn summarize_commits(grouped: &AuthorCommits) -> IndexMap<String, AuthorCommitSummary> {
    grouped
        .iter()
        .map(|(author, commits)| (author.clone(), AuthorCommitSummary::from_commits(commits)))
        .collect()
}

impl AuthorCommitSummary {
    pub fn from_commits(commits: &[CommitRecord]) -> Self {
        commits.iter().fold(Self::default(), |mut acc, c| {
            acc.total_commits += 1;
            acc.total_additions += c.additions;
            acc.total_deletions += c.deletions;
            acc.commits.push(CommitView::from(c));
            acc
        })
    }
}

pub fn summarize_pull_requests(
    pull_requests: &[PullRequestRecord],
) -> IndexMap<String, AuthorPullRequestSummary> {
    let mut summaries: IndexMap<String, AuthorPullRequestSummary> = IndexMap::new();
    for pr in pull_requests {
        let summary = summaries.entry(pr.author_key.clone()).or_default();
        summary.total_prs += 1;
        if pr.is_merged() {
            summary.merged += 1;
        }
        if pr.is_open() {
            summary.open += 1;
        }
        if pr.is_closed_unmerged() {
            summary.closed += 1;
        }
        summary.total_additions += pr.additions;
        summary.total_deletions += pr.deletions;
        summary.pull_requests.push(PullRequestView::from(pr));
    }
    summaries
}

/// Keeps only the weeks in which the contributor committed.
pub fn summarize_contributors(stats: &[ContributorStats]) -> IndexMap<String, ContributorSummary> {
    stats
        .iter()
        .map(|contributor| {
            let weeks = contributor
                .weeks
                .iter()
                .filter(|week| week.commits > 0)
                .cloned()
                .collect();
            let summary = ContributorSummary {
                total_commits: contributor.total_commits,
                weeks,
            };
            (contributor.author_key.clone(), summary)
        })
        .collect()
}

pub fn has_merge_times(pull_requests: &[PullRequestRecord]) -> bool {
    pull_requests.iter().any(PullRequestRecord::is_merged)
}

pub fn commit_activity(data: &SourceData, source: ActivitySource) -> CommitActivity {
    match source {
        ActivitySource::Daily => CommitActivity::Daily(
            data.daily_activity
                .iter()
                .map(|(date, count)| (*date, *count))
                .sorted_by_key(|(date, _)| *date)
                .collect(),
        ),
        ActivitySource::Weekly => CommitActivity::Weekly(weekly_activity(&data.weekly_activity)),
    }
}

// The forge reports whole weeks. Day-level detail is not trusted, so each
// week's total lands in the first slot and the other six stay zero.
fn weekly_activity(weeks: &[WeeklyCommitActivity]) -> IndexMap<NaiveDate, WeeklyActivity> {
    let mut totals: IndexMap<NaiveDate, usize> = IndexMap::new();
    for week in weeks {
        *totals.entry(week_start(week.week_start)).or_insert(0) += week.total;
    }
    totals
        .into_iter()
        .sorted_by_key(|(date, _)| *date)
        .map(|(date, total)| {
            let mut days = [0; 7];
            days[0] = total;
            (date, WeeklyActivity { total, days })
        })
        .collect()
}
