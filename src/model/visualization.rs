use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;

/// Rows are weekdays starting with Sunday, columns are hours of the day.
pub type Heatmap = [[usize; 24]; 7];

/// Derived chart series. A series is `None` when its input had no data.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VisualizationData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull_requests_timeline: Option<Vec<TimelinePoint<usize>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines_of_code_chart: Option<Vec<LinesOfCodePoint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_activity_chart: Option<Vec<ActivityPoint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commits_timeline: Option<Vec<TimelinePoint<usize>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines_changed_timeline: Option<Vec<TimelinePoint<LinesChanged>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pr_cycle_time_timeline: Option<Vec<CycleTimePoint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pr_size_mix_timeline: Option<Vec<SizeMixPoint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_activity_heatmap: Option<Heatmap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_prs_aging: Option<Vec<AgingBucket>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelinePoint<T> {
    pub date: NaiveDate,
    pub authors: IndexMap<String, T>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinesOfCodePoint {
    pub author: String,
    pub lines: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityPoint {
    pub date: NaiveDate,
    pub commits: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LinesChanged {
    pub additions: usize,
    pub deletions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleTimePoint {
    pub date: NaiveDate,
    pub p50: f64,
    pub p90: f64,
    pub max: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeMixPoint {
    pub date: NaiveDate,
    pub small: usize,
    pub medium: usize,
    pub large: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgingBucket {
    pub bucket: String,
    pub count: usize,
}
