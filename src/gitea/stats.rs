//! Weekly statistics derived from a commit listing, for forges that do not
//! publish them.

use crate::analyze::bucket::week_start;
use crate::model::{CommitRecord, ContributorStats, WeekStat, WeeklyCommitActivity};
use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;
use itertools::Itertools;

pub fn contributor_stats(commits: &[CommitRecord]) -> Vec<ContributorStats> {
    let mut authors: IndexMap<String, IndexMap<NaiveDate, WeekStat>> = IndexMap::new();
    for commit in commits {
        let week = week_start(commit.timestamp.date_naive());
        let stat = authors
            .entry(commit.author_key.clone())
            .or_default()
            .entry(week)
            .or_insert_with(|| WeekStat {
                week_start: week,
                commits: 0,
                additions: 0,
                deletions: 0,
            });
        stat.commits += 1;
        stat.additions += commit.additions;
        stat.deletions += commit.deletions;
    }
    authors
        .into_iter()
        .map(|(author_key, weeks)| {
            let weeks = weeks
                .into_values()
                .sorted_by_key(|week| week.week_start)
                .collect::<Vec<_>>();
            ContributorStats {
                author_key,
                total_commits: weeks.iter().map(|week| week.commits).sum(),
                weeks,
            }
        })
        .collect()
}

/// Day slots start with Monday, like the week keys.
pub fn weekly_activity(commits: &[CommitRecord]) -> Vec<WeeklyCommitActivity> {
    let mut weeks: IndexMap<NaiveDate, [usize; 7]> = IndexMap::new();
    for commit in commits {
        let date = commit.timestamp.date_naive();
        let days = weeks.entry(week_start(date)).or_insert([0; 7]);
        days[date.weekday().num_days_from_monday() as usize] += 1;
    }
    weeks
        .into_iter()
        .sorted_by_key(|(week, _)| *week)
        .map(|(week_start, days)| WeeklyCommitActivity {
            week_start,
            days,
            total: days.iter().sum(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use pretty_assertions::assert_eq;

    fn commit(author: &str, at: &str, additions: usize) -> CommitRecord {
        let timestamp = DateTime::parse_from_rfc3339(at).unwrap();
        CommitRecord::new("0000000000", "change", timestamp, additions, 1, author)
    }

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn sums_commits_per_author_week() {
        let commits = vec![
            commit("octo", "2024-01-10T10:00:00Z", 4),
            commit("octo", "2024-01-02T10:00:00Z", 3),
            commit("octo", "2024-01-03T10:00:00Z", 2),
            commit("mona", "2024-01-03T10:00:00Z", 9),
        ];

        let stats = contributor_stats(&commits);

        assert_eq!(stats[0].author_key, "octo");
        assert_eq!(stats[0].total_commits, 3);
        assert_eq!(
            stats[0].weeks,
            vec![
                WeekStat { week_start: date("2024-01-01"), commits: 2, additions: 5, deletions: 2 },
                WeekStat { week_start: date("2024-01-08"), commits: 1, additions: 4, deletions: 1 },
            ]
        );
        assert_eq!(stats[1].total_commits, 1);
    }

    #[test]
    fn activity_days_follow_the_monday_week() {
        let commits = vec![
            commit("octo", "2024-01-07T10:00:00Z", 1),
            commit("octo", "2024-01-01T10:00:00Z", 1),
            commit("octo", "2024-01-01T12:00:00Z", 1),
            commit("octo", "2024-01-03T12:00:00Z", 1),
        ];

        let activity = weekly_activity(&commits);

        assert_eq!(activity.len(), 1);
        assert_eq!(activity[0].week_start, date("2024-01-01"));
        assert_eq!(activity[0].days, [2, 0, 1, 0, 0, 0, 1]);
        assert_eq!(activity[0].total, 4);
    }
}
