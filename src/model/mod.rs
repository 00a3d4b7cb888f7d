mod commit;
mod contributor;
mod pull_request;
mod report;
mod repository;
mod settings;
mod visualization;

pub use commit::{CommitRecord, CommitView};
pub use contributor::{ContributorStats, ContributorSummary, WeekStat, WeeklyCommitActivity};
pub use pull_request::{PullRequestFilter, PullRequestRecord, PullRequestState, PullRequestView};
pub use report::{
    ActivitySource, Advisory, AdvisoryKind, AuthorCommitSummary, AuthorPullRequestSummary,
    CommitActivity, CommitSource, Report, WeeklyActivity,
};
pub use repository::RepositoryInfo;
pub use settings::{Settings, SizeThresholds, Window};
pub use visualization::{
    ActivityPoint, AgingBucket, CycleTimePoint, Heatmap, LinesChanged, LinesOfCodePoint,
    SizeMixPoint, TimelinePoint, VisualizationData,
};
