use crate::analyze::bucket::{month_start, parse_timestamp, percentile, round2, week_start};
use crate::model::{
    ActivityPoint, AgingBucket, AuthorCommitSummary, AuthorPullRequestSummary, CommitActivity,
    ContributorSummary, CycleTimePoint, Heatmap, LinesChanged, LinesOfCodePoint,
    PullRequestState, PullRequestView, Report, SizeMixPoint, SizeThresholds, TimelinePoint,
    VisualizationData,
};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Timelike, Utc};
use indexmap::IndexMap;
use itertools::Itertools;

const SECONDS_PER_DAY: f64 = 86_400.0;

pub const AGING_BUCKETS: [&str; 4] = ["0-3d", "4-7d", "8-14d", "15+d"];

#[derive(Debug, Clone, Copy)]
pub struct ChartOptions {
    pub thresholds: SizeThresholds,
    pub now: DateTime<Utc>,
}

pub trait Visualizer {
    fn build_visualization(&self, options: &ChartOptions) -> VisualizationData;
}

impl Visualizer for Report {
    fn build_visualization(&self, options: &ChartOptions) -> VisualizationData {
        let merge_times = self.metadata.capabilities.merge_times;
        if !merge_times && !self.pull_requests.is_empty() {
            log::debug!("Pull requests carry no merge times, skipping cycle time series");
        }
        VisualizationData {
            pull_requests_timeline: pull_requests_timeline(&self.pull_requests),
            lines_of_code_chart: lines_of_code_chart(&self.lines_of_code),
            commit_activity_chart: commit_activity_chart(&self.commit_activity),
            commits_timeline: commits_timeline(&self.commits),
            lines_changed_timeline: self
                .contributor_stats
                .as_ref()
                .and_then(lines_changed_timeline),
            pr_cycle_time_timeline: merge_times
                .then(|| pr_cycle_time_timeline(&self.pull_requests))
                .flatten(),
            pr_size_mix_timeline: pr_size_mix_timeline(&self.pull_requests, &options.thresholds),
            commit_activity_heatmap: commit_activity_heatmap(&self.commits),
            open_prs_aging: open_prs_aging(&self.pull_requests, options.now),
        }
    }
}

pub fn pull_requests_timeline(
    pull_requests: &IndexMap<String, AuthorPullRequestSummary>,
) -> Option<Vec<TimelinePoint<usize>>> {
    let mut months: IndexMap<NaiveDate, IndexMap<String, usize>> = IndexMap::new();
    for (author, pr) in pull_request_views(pull_requests) {
        let Some(created) = parsed(&pr.created_at, pr.number) else {
            continue;
        };
        let month = month_start(created.date_naive());
        *months.entry(month).or_default().entry(author.clone()).or_insert(0) += 1;
    }
    timeline(months)
}

pub fn lines_of_code_chart(lines_of_code: &IndexMap<String, usize>) -> Option<Vec<LinesOfCodePoint>> {
    let chart = lines_of_code
        .iter()
        .sorted_by(|(a_author, a_lines), (b_author, b_lines)| {
            b_lines.cmp(a_lines).then_with(|| a_author.cmp(b_author))
        })
        .map(|(author, lines)| LinesOfCodePoint {
            author: author.clone(),
            lines: *lines,
        })
        .collect::<Vec<_>>();
    non_empty(chart)
}

pub fn commit_activity_chart(activity: &CommitActivity) -> Option<Vec<ActivityPoint>> {
    let chart = activity
        .counts()
        .into_iter()
        .map(|(date, commits)| ActivityPoint { date, commits })
        .collect::<Vec<_>>();
    non_empty(chart)
}

pub fn commits_timeline(
    commits: &IndexMap<String, AuthorCommitSummary>,
) -> Option<Vec<TimelinePoint<usize>>> {
    let mut weeks: IndexMap<NaiveDate, IndexMap<String, usize>> = IndexMap::new();
    for (author, summary) in commits {
        for commit in &summary.commits {
            let Some(datetime) = parse_timestamp(&commit.date) else {
                log::debug!("Skipping commit {} with unparsable date '{}'", commit.sha, commit.date);
                continue;
            };
            let week = week_start(datetime.date_naive());
            *weeks.entry(week).or_default().entry(author.clone()).or_insert(0) += 1;
        }
    }
    timeline(weeks)
}

pub fn lines_changed_timeline(
    stats: &IndexMap<String, ContributorSummary>,
) -> Option<Vec<TimelinePoint<LinesChanged>>> {
    let mut weeks: IndexMap<NaiveDate, IndexMap<String, LinesChanged>> = IndexMap::new();
    for (author, summary) in stats {
        for week in &summary.weeks {
            let lines = weeks
                .entry(week_start(week.week_start))
                .or_default()
                .entry(author.clone())
                .or_default();
            lines.additions += week.additions;
            lines.deletions += week.deletions;
        }
    }
    timeline(weeks)
}

/// Days from creation to merge, bucketed by creation week.
pub fn pr_cycle_time_timeline(
    pull_requests: &IndexMap<String, AuthorPullRequestSummary>,
) -> Option<Vec<CycleTimePoint>> {
    let mut weeks: IndexMap<NaiveDate, Vec<f64>> = IndexMap::new();
    for (_, pr) in pull_request_views(pull_requests) {
        let Some(merged_at) = &pr.merged_at else {
            continue;
        };
        let created = parsed(&pr.created_at, pr.number);
        let merged = parsed(merged_at, pr.number);
        let (Some(created), Some(merged)) = (created, merged) else {
            continue;
        };
        let days = (merged - created).num_seconds() as f64 / SECONDS_PER_DAY;
        weeks
            .entry(week_start(created.date_naive()))
            .or_default()
            .push(days);
    }
    weeks.sort_keys();
    let points = weeks
        .into_iter()
        .map(|(date, mut days)| {
            days.sort_by(f64::total_cmp);
            CycleTimePoint {
                date,
                p50: round2(percentile(&days, 0.5)),
                p90: round2(percentile(&days, 0.9)),
                max: round2(days.last().copied().unwrap_or(0.0)),
                count: days.len(),
            }
        })
        .collect::<Vec<_>>();
    non_empty(points)
}

/// Every pull request lands in exactly one size bucket of its creation week.
pub fn pr_size_mix_timeline(
    pull_requests: &IndexMap<String, AuthorPullRequestSummary>,
    thresholds: &SizeThresholds,
) -> Option<Vec<SizeMixPoint>> {
    let mut weeks: IndexMap<NaiveDate, SizeMixPoint> = IndexMap::new();
    for (_, pr) in pull_request_views(pull_requests) {
        let Some(created) = parsed(&pr.created_at, pr.number) else {
            continue;
        };
        let date = week_start(created.date_naive());
        let point = weeks.entry(date).or_insert_with(|| SizeMixPoint {
            date,
            small: 0,
            medium: 0,
            large: 0,
        });
        let size = pr.additions + pr.deletions;
        if size <= thresholds.small {
            point.small += 1;
        } else if size <= thresholds.medium {
            point.medium += 1;
        } else {
            point.large += 1;
        }
    }
    weeks.sort_keys();
    non_empty(weeks.into_values().collect())
}

pub fn commit_activity_heatmap(commits: &IndexMap<String, AuthorCommitSummary>) -> Option<Heatmap> {
    if commits.is_empty() {
        return None;
    }
    let mut heatmap: Heatmap = [[0; 24]; 7];
    for commit in commits.values().flat_map(|summary| &summary.commits) {
        let Some(datetime) = parse_timestamp(&commit.date) else {
            continue;
        };
        let day = datetime.weekday().num_days_from_sunday() as usize;
        heatmap[day][datetime.hour() as usize] += 1;
    }
    Some(heatmap)
}

/// Open pull requests by age. The first matching bucket wins:
/// `[0,3]`, `(3,7)`, `[7,15)`, `[15,∞)`. `None` without a dated open PR.
pub fn open_prs_aging(
    pull_requests: &IndexMap<String, AuthorPullRequestSummary>,
    now: DateTime<Utc>,
) -> Option<Vec<AgingBucket>> {
    let mut counts = [0usize; 4];
    for (_, pr) in pull_request_views(pull_requests) {
        if pr.state != PullRequestState::Open {
            continue;
        }
        let Some(created) = parsed(&pr.created_at, pr.number) else {
            continue;
        };
        let age = (now.fixed_offset() - created).num_seconds() as f64 / SECONDS_PER_DAY;
        counts[aging_bucket(age)] += 1;
    }
    if counts.iter().all(|count| *count == 0) {
        return None;
    }
    let buckets = AGING_BUCKETS
        .iter()
        .zip(counts)
        .map(|(bucket, count)| AgingBucket {
            bucket: bucket.to_string(),
            count,
        })
        .collect();
    Some(buckets)
}

fn aging_bucket(age_days: f64) -> usize {
    if age_days <= 3.0 {
        0
    } else if age_days < 7.0 {
        1
    } else if age_days < 15.0 {
        2
    } else {
        3
    }
}

fn pull_request_views(
    pull_requests: &IndexMap<String, AuthorPullRequestSummary>,
) -> impl Iterator<Item = (&String, &PullRequestView)> {
    pull_requests
        .iter()
        .flat_map(|(author, summary)| summary.pull_requests.iter().map(move |pr| (author, pr)))
}

fn parsed(raw: &str, number: u64) -> Option<DateTime<FixedOffset>> {
    let datetime = parse_timestamp(raw);
    if datetime.is_none() {
        log::debug!("Skipping pull request #{} with unparsable timestamp '{}'", number, raw);
    }
    datetime
}

fn timeline<T>(mut buckets: IndexMap<NaiveDate, IndexMap<String, T>>) -> Option<Vec<TimelinePoint<T>>> {
    buckets.sort_keys();
    let points = buckets
        .into_iter()
        .map(|(date, authors)| TimelinePoint { date, authors })
        .collect();
    non_empty(points)
}

fn non_empty<T>(values: Vec<T>) -> Option<Vec<T>> {
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::aggregator::{group_commits, summarize_commits, summarize_pull_requests};
    use crate::model::{CommitRecord, PullRequestRecord, WeekStat};
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    fn pr(author: &str, created_at: &str, merged_at: Option<&str>, size: usize) -> PullRequestRecord {
        PullRequestRecord {
            number: 1,
            title: "Change".to_string(),
            author_key: author.to_string(),
            created_at: created_at.to_string(),
            closed_at: merged_at.map(String::from),
            merged_at: merged_at.map(String::from),
            state: if merged_at.is_some() {
                PullRequestState::Closed
            } else {
                PullRequestState::Open
            },
            additions: size,
            deletions: 0,
            changed_files: 1,
        }
    }

    fn commit(author: &str, at: &str) -> CommitRecord {
        let timestamp = DateTime::parse_from_rfc3339(at).unwrap();
        CommitRecord::new("abcdef0123", "work", timestamp, 1, 0, author)
    }

    #[test]
    fn cycle_time_percentiles_per_week() {
        let prs = summarize_pull_requests(&[
            pr("octo", "2024-03-04T00:00:00Z", Some("2024-03-05T00:00:00Z"), 1),
            pr("octo", "2024-03-05T00:00:00Z", Some("2024-03-08T00:00:00Z"), 1),
            pr("octo", "2024-03-06T00:00:00Z", Some("2024-03-11T00:00:00Z"), 1),
        ]);

        let points = pr_cycle_time_timeline(&prs).unwrap();

        assert_eq!(
            points,
            vec![CycleTimePoint { date: date("2024-03-04"), p50: 3.0, p90: 4.6, max: 5.0, count: 3 }]
        );
    }

    #[test]
    fn cycle_time_skipped_without_merge_times() {
        let mut report = Report::new(Utc::now());
        report.pull_requests = summarize_pull_requests(&[pr("octo", "2024-03-04T00:00:00Z", None, 1)]);
        let options = ChartOptions { thresholds: SizeThresholds::default(), now: Utc::now() };

        let data = report.build_visualization(&options);

        assert_eq!(data.pr_cycle_time_timeline, None);
        assert!(data.pr_size_mix_timeline.is_some());
        assert!(data.pull_requests_timeline.is_some());
    }

    #[test]
    fn size_mix_partitions_every_pull_request() {
        let thresholds = SizeThresholds::default();
        let prs = summarize_pull_requests(&[
            pr("a", "2024-03-04T00:00:00Z", None, 50),
            pr("a", "2024-03-05T00:00:00Z", Some("2024-03-06T00:00:00Z"), 51),
            pr("b", "2024-03-06T00:00:00Z", None, 250),
            pr("b", "2024-03-07T00:00:00Z", None, 251),
            pr("b", "2024-03-12T00:00:00Z", None, 0),
            pr("b", "garbage", None, 0),
        ]);

        let points = pr_size_mix_timeline(&prs, &thresholds).unwrap();

        assert_eq!(points.len(), 2);
        assert_eq!((points[0].small, points[0].medium, points[0].large), (1, 2, 1));
        assert_eq!(points[0].small + points[0].medium + points[0].large, 4);
        assert_eq!(points[1].date, date("2024-03-11"));
        assert_eq!(points[1].small, 1);
    }

    #[test]
    fn heatmap_counts_every_parsable_commit() {
        let commits = summarize_commits(&group_commits(vec![
            commit("a", "2024-03-03T09:15:00Z"),
            commit("a", "2024-03-03T09:45:00Z"),
            commit("b", "2024-03-09T23:00:00-05:00"),
            commit("b", "2024-03-04T00:00:00+02:00"),
        ]));

        let heatmap = commit_activity_heatmap(&commits).unwrap();

        assert_eq!(heatmap[0][9], 2);
        assert_eq!(heatmap[6][23], 1);
        assert_eq!(heatmap[1][0], 1);
        assert_eq!(heatmap.iter().flatten().sum::<usize>(), 4);
    }

    #[test]
    fn aging_buckets_respect_boundaries() {
        let now = DateTime::parse_from_rfc3339("2024-06-20T12:00:00Z").unwrap().with_timezone(&Utc);
        let ago = |days: i64| (now - Duration::days(days)).to_rfc3339();
        let prs = summarize_pull_requests(&[
            pr("a", &ago(0), None, 1),
            pr("a", &ago(3), None, 1),
            pr("a", &ago(4), None, 1),
            pr("a", &ago(7), None, 1),
            pr("a", &ago(10), None, 1),
            pr("a", &ago(15), None, 1),
            pr("a", &ago(40), Some("2024-06-01T00:00:00Z"), 1),
        ]);

        let buckets = open_prs_aging(&prs, now).unwrap();
        let counts = buckets.iter().map(|b| (b.bucket.as_str(), b.count)).collect::<Vec<_>>();

        assert_eq!(counts, vec![("0-3d", 2), ("4-7d", 1), ("8-14d", 2), ("15+d", 1)]);
        assert_eq!(buckets.iter().map(|b| b.count).sum::<usize>(), 6);
    }

    #[test]
    fn aging_is_absent_without_open_pull_requests() {
        let now = DateTime::parse_from_rfc3339("2024-06-20T12:00:00Z").unwrap().with_timezone(&Utc);
        let prs = summarize_pull_requests(&[
            pr("a", "2024-06-01T00:00:00Z", Some("2024-06-02T00:00:00Z"), 1),
            pr("b", "2024-06-03T00:00:00Z", Some("2024-06-05T00:00:00Z"), 1),
        ]);

        assert_eq!(open_prs_aging(&prs, now), None);
        assert_eq!(open_prs_aging(&IndexMap::new(), now), None);
    }

    #[test]
    fn timelines_are_chronological() {
        let prs = summarize_pull_requests(&[
            pr("a", "2024-05-20T00:00:00Z", None, 1),
            pr("b", "2024-04-02T00:00:00Z", None, 1),
            pr("a", "2024-04-30T00:00:00Z", None, 1),
        ]);
        let commits = summarize_commits(&group_commits(vec![
            commit("a", "2024-05-08T10:00:00Z"),
            commit("b", "2024-05-01T10:00:00Z"),
            commit("a", "2024-05-02T10:00:00Z"),
        ]));

        let months = pull_requests_timeline(&prs).unwrap();
        let weeks = commits_timeline(&commits).unwrap();

        assert_eq!(months.iter().map(|p| p.date).collect::<Vec<_>>(), vec![date("2024-04-01"), date("2024-05-01")]);
        assert_eq!(months[0].authors["a"], 1);
        assert_eq!(months[0].authors["b"], 1);
        assert_eq!(weeks.iter().map(|p| p.date).collect::<Vec<_>>(), vec![date("2024-04-29"), date("2024-05-06")]);
        assert_eq!(weeks[0].authors["a"], 1);
        assert_eq!(weeks[0].authors["b"], 1);
    }

    #[test]
    fn lines_of_code_sorted_descending() {
        let mut lines = IndexMap::new();
        lines.insert("small@x.com".to_string(), 10);
        lines.insert("big@x.com".to_string(), 900);
        lines.insert("mid@x.com".to_string(), 120);

        let chart = lines_of_code_chart(&lines).unwrap();

        assert_eq!(
            chart.iter().map(|p| p.author.as_str()).collect::<Vec<_>>(),
            vec!["big@x.com", "mid@x.com", "small@x.com"]
        );
    }

    #[test]
    fn lines_changed_grouped_by_week() {
        let mut stats = IndexMap::new();
        stats.insert(
            "octo".to_string(),
            ContributorSummary {
                total_commits: 3,
                weeks: vec![WeekStat { week_start: date("2024-01-07"), commits: 3, additions: 30, deletions: 5 }],
            },
        );

        let points = lines_changed_timeline(&stats).unwrap();

        assert_eq!(points[0].date, date("2024-01-01"));
        assert_eq!(points[0].authors["octo"], LinesChanged { additions: 30, deletions: 5 });
    }

    #[test]
    fn empty_report_has_no_series() {
        let report = Report::new(Utc::now());
        let options = ChartOptions { thresholds: SizeThresholds::default(), now: Utc::now() };

        assert_eq!(report.build_visualization(&options), VisualizationData::default());
    }
}
