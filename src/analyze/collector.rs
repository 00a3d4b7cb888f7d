use crate::analyze::aggregator::group_commits;
use crate::analyze::resolver::SourcePlan;
use crate::analyze::SourceData;
use crate::git::LocalReader;
use crate::gitea::RemoteSource;
use crate::model::{Advisory, AdvisoryKind, CommitSource, PullRequestFilter, Window};
use indicatif::ProgressBar;

/// Progress reporting for the two fetch stages.
pub struct CollectProgress {
    pub local: ProgressBar,
    pub remote: ProgressBar,
}

impl CollectProgress {
    pub fn hidden() -> Self {
        Self {
            local: ProgressBar::hidden(),
            remote: ProgressBar::hidden(),
        }
    }
}

/// Reads every source the plan selected. Failures never abort the run:
/// each one is recorded as an advisory and the affected data stays empty.
pub async fn collect<L: LocalReader, R: RemoteSource>(
    plan: &SourcePlan,
    local: Option<&L>,
    remote: Option<&R>,
    window: &Window,
    mut data: SourceData,
    progress: &CollectProgress,
) -> SourceData {
    data.advisories.extend(plan.advisories.iter().cloned());

    match (plan.analyze_local, local) {
        (true, Some(local)) => local_fetch(local, window, &mut data, &progress.local),
        _ => progress.local.finish_with_message("Local checkout skipped"),
    }

    match (&plan.remote, remote) {
        (Some(remote_plan), Some(remote)) => {
            progress
                .remote
                .set_message(format!("Fetching {} ...", remote_plan.identifier));
            remote_fetch(remote, plan, window, &mut data).await;
            progress.remote.finish_with_message(format!(
                "✅ Completed fetch of {} (find {} pull requests)",
                remote_plan.identifier,
                data.pull_requests.len()
            ));
        }
        _ => progress.remote.finish_with_message("Remote repository skipped"),
    }
    data
}

fn local_fetch<L: LocalReader>(local: &L, window: &Window, data: &mut SourceData, pb: &ProgressBar) {
    pb.set_message("Read git history ...");
    match local.commits_since_until(window) {
        Ok(commits) => data.insert_commits(CommitSource::Local, commits),
        Err(e) => data.advise(unavailable("local commits", e)),
    }
    pb.set_message("Read commit activity ...");
    match local.commit_activity_by_day(window) {
        Ok(activity) => data.daily_activity = activity,
        Err(e) => data.advise(unavailable("local commit activity", e)),
    }
    pb.set_message("Blame files ...");
    match local.lines_of_code() {
        Ok(lines) => data.lines_of_code = lines,
        Err(e) => data.advise(unavailable("lines of code", e)),
    }
    pb.finish_with_message(format!(
        "✅ Completed read git history (find {} authors)",
        data.commits.len()
    ));
}

async fn remote_fetch<R: RemoteSource>(
    remote: &R,
    plan: &SourcePlan,
    window: &Window,
    data: &mut SourceData,
) {
    let (pull_requests, repository, contributor_stats) = futures::join!(
        remote.pull_requests(window, PullRequestFilter::All),
        remote.repository_info(),
        remote.contributor_stats(),
    );
    match pull_requests {
        Ok(pull_requests) => data.insert_pull_requests(pull_requests),
        Err(e) => data.advise(unavailable("pull requests", e)),
    }
    match repository {
        Ok(repository) => data.repository = repository,
        Err(e) => data.advise(unavailable("repository info", e)),
    }
    match contributor_stats {
        Ok(stats) => data.contributor_stats = Some(stats),
        Err(e) => data.advise(unavailable("contributor statistics", e)),
    }

    if plan.commits_from_remote() {
        match remote.commits(window).await {
            Ok(commits) => data.insert_commits(CommitSource::Remote, group_commits(commits)),
            Err(e) => data.advise(unavailable("remote commits", e)),
        }
    }
    if data.daily_activity.is_empty() {
        match remote.commit_activity().await {
            Ok(activity) => data.weekly_activity = activity,
            Err(e) => data.advise(unavailable("remote commit activity", e)),
        }
    }
}

fn unavailable(what: &str, e: impl std::fmt::Display) -> Advisory {
    Advisory::new(
        AdvisoryKind::SourceUnavailable,
        format!("Could not read {}: {}", what, e),
    )
}
