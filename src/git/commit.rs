use crate::analyze::aggregator::group_commits;
use crate::analyze::AuthorCommits;
use crate::error::Result;
use crate::model::{CommitRecord, Window};
use chrono::{DateTime, FixedOffset, NaiveDate};
use git2::{DiffFindOptions, DiffOptions, DiffStats, ErrorCode, Repository, Sort};
use indexmap::IndexMap;

pub trait GitCommitRepository {
    fn get_commits(&self, window: &Window) -> Result<AuthorCommits>;
    fn get_daily_activity(&self, window: &Window) -> Result<IndexMap<NaiveDate, usize>>;
}

impl GitCommitRepository for Repository {
    fn get_commits(&self, window: &Window) -> Result<AuthorCommits> {
        let git_commits = get_commits(self, window)?;
        let mut commits = Vec::with_capacity(git_commits.len());
        for (git_commit, datetime) in &git_commits {
            let git_diff = get_commit_stats_for_commit(self, git_commit)?;
            commits.push(git_commit_to_commit(git_commit, &git_diff, *datetime));
        }
        Ok(group_commits(commits))
    }

    fn get_daily_activity(&self, window: &Window) -> Result<IndexMap<NaiveDate, usize>> {
        let mut days: IndexMap<NaiveDate, usize> = IndexMap::new();
        for (_, datetime) in get_commits(self, window)? {
            *days.entry(datetime.date_naive()).or_insert(0) += 1;
        }
        days.sort_keys();
        Ok(days)
    }
}

/// Non-merge commits reachable from HEAD inside the window, newest first.
fn get_commits<'a>(
    repo: &'a Repository,
    window: &Window,
) -> Result<Vec<(git2::Commit<'a>, DateTime<FixedOffset>)>> {
    if repo.is_empty()? {
        log::debug!("Repository has no commits yet");
        return Ok(vec![]);
    }
    if let Err(e) = repo.head() {
        if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound {
            log::debug!("HEAD points at an unborn branch");
            return Ok(vec![]);
        }
        return Err(e.into());
    }
    let mut revwalk = repo.revwalk()?;
    revwalk.set_sorting(Sort::TIME)?;
    revwalk.push_head()?;
    let mut commits = vec![];
    for id in revwalk {
        let commit = repo.find_commit(id?)?;
        if commit.parent_count() > 1 {
            continue;
        }
        let Some(datetime) = commit_datetime(&commit) else {
            log::warn!("Skipping commit {} with an out of range time", commit.id());
            continue;
        };
        if window.contains(&datetime) {
            commits.push((commit, datetime));
        }
    }
    Ok(commits)
}

/// Commit time in the author's own offset.
pub fn commit_datetime(commit: &git2::Commit<'_>) -> Option<DateTime<FixedOffset>> {
    let time = commit.time();
    let offset = FixedOffset::east_opt(time.offset_minutes() * 60)?;
    Some(DateTime::from_timestamp(time.seconds(), 0)?.with_timezone(&offset))
}

fn get_commit_stats_for_commit<'a>(
    repo: &'a Repository,
    commit: &git2::Commit<'a>,
) -> Result<DiffStats> {
    let mut diff_options = DiffOptions::new();
    diff_options.patience(true);
    diff_options.include_typechange(true);
    let mut diff_find_options = DiffFindOptions::new();
    diff_find_options.renames(true);
    let old_tree = if commit.parent_count() > 0 {
        let parent = commit.parent(0)?;
        Some(parent.tree()?)
    } else {
        None
    };
    let mut diff = repo.diff_tree_to_tree(
        old_tree.as_ref(),
        Some(&commit.tree()?),
        Some(&mut diff_options),
    )?;
    diff.find_similar(Some(&mut diff_find_options))?;
    Ok(diff.stats()?)
}

fn git_commit_to_commit(
    git_commit: &git2::Commit<'_>,
    git_diff: &DiffStats,
    datetime: DateTime<FixedOffset>,
) -> CommitRecord {
    let author = git_commit.author();
    CommitRecord::new(
        git_commit.id(),
        git_commit.message().unwrap_or(""),
        datetime,
        git_diff.insertions(),
        git_diff.deletions(),
        author.email().unwrap_or(""),
    )
}
