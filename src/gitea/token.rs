use crate::error::Result;
use crate::gitea::pull_request::GiteaPullRequester;
use crate::gitea::{remote_error, RemoteSource, RepoRef};
use crate::model::{
    CommitRecord, ContributorStats, PullRequestFilter, PullRequestRecord, RepositoryInfo,
    WeeklyCommitActivity, Window,
};
use gitea_sdk::{Auth, Client};

/// Token-authenticated access through the Gitea SDK.
pub struct TokenClient {
    client: Client,
    repo: RepoRef,
}

// Create
impl TokenClient {
    pub fn new(
        url: &str,
        token: &str,
        owner: impl ToString,
        name: impl ToString,
    ) -> Self {
        Self {
            client: Client::new(url, Auth::Token(token)),
            repo: RepoRef::new(owner, name),
        }
    }
}

impl RemoteSource for TokenClient {
    async fn pull_requests(
        &self,
        window: &Window,
        filter: PullRequestFilter,
    ) -> Result<Vec<PullRequestRecord>> {
        self.repo
            .fetch_pull_requests(&self.client, window, filter)
            .await
    }

    async fn repository_info(&self) -> Result<Option<RepositoryInfo>> {
        let repository = self
            .client
            .repos(&self.repo.owner, &self.repo.name)
            .get()
            .send(&self.client)
            .await
            .map_err(remote_error)?;
        Ok(Some(RepositoryInfo {
            full_name: repository.full_name.clone(),
            description: None,
            html_url: Some(repository.html_url.clone()),
            default_branch: Some(repository.default_branch.clone()),
        }))
    }

    async fn contributor_stats(&self) -> Result<Vec<ContributorStats>> {
        log::debug!("The SDK exposes no contributor statistics");
        Ok(vec![])
    }

    async fn commit_activity(&self) -> Result<Vec<WeeklyCommitActivity>> {
        log::debug!("The SDK exposes no commit activity");
        Ok(vec![])
    }

    async fn commits(&self, _window: &Window) -> Result<Vec<CommitRecord>> {
        log::debug!("The SDK exposes no commit listing");
        Ok(vec![])
    }
}
