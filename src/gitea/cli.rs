use crate::error::{Error, Result};
use crate::gitea::payload::{RawCommit, RawPullRequest, RawRepository};
use crate::gitea::{stats, within_window, RemoteSource};
use crate::model::{
    CommitRecord, ContributorStats, PullRequestFilter, PullRequestRecord, RepositoryInfo,
    WeeklyCommitActivity, Window,
};
use serde::de::DeserializeOwned;
use std::process::Stdio;
use tokio::process::Command;
use tokio::sync::OnceCell;

const PAGE_SIZE: usize = 50;

/// Talks to the forge through its command line client (`tea api ...`),
/// reusing whatever login the CLI already holds.
pub struct CliClient {
    program: String,
    owner: String,
    name: String,
    commits: OnceCell<Vec<CommitRecord>>,
}

// Create
impl CliClient {
    pub fn new(program: impl ToString, owner: impl ToString, name: impl ToString) -> Self {
        Self {
            program: program.to_string(),
            owner: owner.to_string(),
            name: name.to_string(),
            commits: OnceCell::new(),
        }
    }
}

impl CliClient {
    /// Installed and logged in to at least one forge.
    pub async fn is_available(program: &str) -> bool {
        let installed = Command::new(program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|status| status.success())
            .unwrap_or(false);
        if !installed {
            log::debug!("`{}` is not installed", program);
            return false;
        }
        let logins = Command::new(program)
            .args(["login", "list", "--output", "simple"])
            .stderr(Stdio::null())
            .output()
            .await;
        match logins {
            Ok(output) if output.status.success() => {
                let authenticated = !String::from_utf8_lossy(&output.stdout).trim().is_empty();
                if !authenticated {
                    log::debug!("`{}` has no logins", program);
                }
                authenticated
            }
            _ => false,
        }
    }

    async fn api<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        log::debug!("{} api {}", self.program, endpoint);
        let output = Command::new(&self.program)
            .args(["api", endpoint])
            .output()
            .await?;
        if !output.status.success() {
            return Err(Error::Remote(format!(
                "`{} api {}` failed: {}",
                self.program,
                endpoint,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(serde_json::from_slice(&output.stdout)?)
    }

    async fn paged<T: DeserializeOwned>(&self, endpoint: &str) -> Result<Vec<T>> {
        let separator = if endpoint.contains('?') { '&' } else { '?' };
        let mut items = vec![];
        let mut page = 1;
        loop {
            let path = format!("{}{}limit={}&page={}", endpoint, separator, PAGE_SIZE, page);
            let batch: Vec<T> = self.api(&path).await?;
            let last = batch.len() < PAGE_SIZE;
            items.extend(batch);
            if last {
                break;
            }
            page += 1;
        }
        Ok(items)
    }

    fn repo_path(&self) -> String {
        format!("repos/{}/{}", self.owner, self.name)
    }

    // Statistics and activity are derived from the same listing, fetched once.
    async fn all_commits(&self) -> Result<&Vec<CommitRecord>> {
        self.commits
            .get_or_try_init(|| async {
                let raw: Vec<RawCommit> = self
                    .paged(&format!("{}/commits?stat=true", self.repo_path()))
                    .await?;
                Ok::<_, Error>(raw.into_iter().filter_map(RawCommit::into_record).collect())
            })
            .await
    }
}

impl RemoteSource for CliClient {
    async fn pull_requests(
        &self,
        window: &Window,
        filter: PullRequestFilter,
    ) -> Result<Vec<PullRequestRecord>> {
        let endpoint = format!("{}/pulls?state={}", self.repo_path(), filter.as_query());
        let raw: Vec<RawPullRequest> = self.paged(&endpoint).await?;
        Ok(raw
            .into_iter()
            .map(PullRequestRecord::from)
            .filter(|pr| filter.accepts(pr.state) && within_window(pr, window))
            .collect())
    }

    async fn repository_info(&self) -> Result<Option<RepositoryInfo>> {
        let raw: RawRepository = self.api(&self.repo_path()).await?;
        Ok(Some(raw.into()))
    }

    async fn contributor_stats(&self) -> Result<Vec<ContributorStats>> {
        Ok(stats::contributor_stats(self.all_commits().await?))
    }

    async fn commit_activity(&self) -> Result<Vec<WeeklyCommitActivity>> {
        Ok(stats::weekly_activity(self.all_commits().await?))
    }

    async fn commits(&self, window: &Window) -> Result<Vec<CommitRecord>> {
        Ok(self
            .all_commits()
            .await?
            .iter()
            .filter(|commit| window.contains(&commit.timestamp))
            .cloned()
            .collect())
    }
}
