use chrono::NaiveDate;
use serde::Serialize;

/// Weekly totals of one contributor as published by the forge.
#[derive(Debug, Clone, PartialEq)]
pub struct ContributorStats {
    pub author_key: String,
    pub total_commits: usize,
    pub weeks: Vec<WeekStat>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekStat {
    pub week_start: NaiveDate,
    pub commits: usize,
    pub additions: usize,
    pub deletions: usize,
}

/// Commits of one week. `days` starts with Monday.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyCommitActivity {
    pub week_start: NaiveDate,
    pub days: [usize; 7],
    pub total: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContributorSummary {
    pub total_commits: usize,
    pub weeks: Vec<WeekStat>,
}
