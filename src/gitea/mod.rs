pub mod cli;
mod payload;
pub mod pull_request;
mod stats;
pub mod token;

pub use cli::CliClient;
pub use token::TokenClient;

use crate::analyze::bucket::parse_timestamp;
use crate::analyze::resolver::{Backend, RemotePlan};
use crate::error::{Error, Result};
use crate::git::split_identifier;
use crate::model::{
    CommitRecord, ContributorStats, PullRequestFilter, PullRequestRecord, RepositoryInfo,
    WeeklyCommitActivity, Window,
};

/// Operations every forge client offers. Results are final: retries and
/// pagination happen inside the client.
pub trait RemoteSource {
    async fn pull_requests(
        &self,
        window: &Window,
        filter: PullRequestFilter,
    ) -> Result<Vec<PullRequestRecord>>;
    async fn repository_info(&self) -> Result<Option<RepositoryInfo>>;
    async fn contributor_stats(&self) -> Result<Vec<ContributorStats>>;
    async fn commit_activity(&self) -> Result<Vec<WeeklyCommitActivity>>;
    async fn commits(&self, window: &Window) -> Result<Vec<CommitRecord>>;
}

#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl ToString, name: impl ToString) -> Self {
        Self {
            owner: owner.to_string(),
            name: name.to_string(),
        }
    }
}

pub enum RemoteClient {
    Cli(CliClient),
    Token(TokenClient),
}

// Create
impl RemoteClient {
    pub fn from_plan(plan: &RemotePlan, url: &str, token: Option<&str>, program: &str) -> Result<Self> {
        let Some((owner, name)) = split_identifier(&plan.identifier) else {
            return Err(Error::Config(format!(
                "'{}' is not an owner/name repository identifier",
                plan.identifier
            )));
        };
        let client = match (plan.backend, token) {
            (Backend::Token, Some(token)) => {
                RemoteClient::Token(TokenClient::new(url, token, owner, name))
            }
            (Backend::Token, None) => {
                return Err(Error::Config("token backend chosen without a token".to_string()))
            }
            (Backend::Cli, _) => RemoteClient::Cli(CliClient::new(program, owner, name)),
        };
        Ok(client)
    }
}

impl RemoteSource for RemoteClient {
    async fn pull_requests(
        &self,
        window: &Window,
        filter: PullRequestFilter,
    ) -> Result<Vec<PullRequestRecord>> {
        match self {
            RemoteClient::Cli(client) => client.pull_requests(window, filter).await,
            RemoteClient::Token(client) => client.pull_requests(window, filter).await,
        }
    }

    async fn repository_info(&self) -> Result<Option<RepositoryInfo>> {
        match self {
            RemoteClient::Cli(client) => client.repository_info().await,
            RemoteClient::Token(client) => client.repository_info().await,
        }
    }

    async fn contributor_stats(&self) -> Result<Vec<ContributorStats>> {
        match self {
            RemoteClient::Cli(client) => client.contributor_stats().await,
            RemoteClient::Token(client) => client.contributor_stats().await,
        }
    }

    async fn commit_activity(&self) -> Result<Vec<WeeklyCommitActivity>> {
        match self {
            RemoteClient::Cli(client) => client.commit_activity().await,
            RemoteClient::Token(client) => client.commit_activity().await,
        }
    }

    async fn commits(&self, window: &Window) -> Result<Vec<CommitRecord>> {
        match self {
            RemoteClient::Cli(client) => client.commits(window).await,
            RemoteClient::Token(client) => client.commits(window).await,
        }
    }
}

fn remote_error(e: impl std::fmt::Display) -> Error {
    Error::Remote(e.to_string())
}

/// Filters on creation time. Records whose creation time cannot be read are
/// kept here and dropped later by the series that need the time.
fn within_window(pull_request: &PullRequestRecord, window: &Window) -> bool {
    match parse_timestamp(&pull_request.created_at) {
        Some(created) => window.contains(&created),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PullRequestState;

    fn pr(created_at: &str) -> PullRequestRecord {
        PullRequestRecord {
            number: 1,
            title: "t".to_string(),
            author_key: "octo".to_string(),
            created_at: created_at.to_string(),
            closed_at: None,
            merged_at: None,
            state: PullRequestState::Open,
            additions: 0,
            deletions: 0,
            changed_files: 0,
        }
    }

    #[test]
    fn window_filters_on_creation_time() {
        let window = Window::parse(Some("2024-03-01"), Some("2024-03-31")).unwrap();

        assert!(within_window(&pr("2024-03-15T08:00:00Z"), &window));
        assert!(!within_window(&pr("2024-02-28T08:00:00Z"), &window));
        assert!(within_window(&pr("unknown"), &window));
    }

    #[test]
    fn token_plan_needs_a_token() {
        let plan = RemotePlan {
            identifier: "octo/pulse".to_string(),
            backend: Backend::Token,
        };

        assert!(RemoteClient::from_plan(&plan, "https://gitea.com", None, "tea").is_err());
        assert!(matches!(
            RemoteClient::from_plan(&plan, "https://gitea.com", Some("secret"), "tea"),
            Ok(RemoteClient::Token(_))
        ));
    }

    #[test]
    fn identifier_must_name_owner_and_repository() {
        let plan = RemotePlan {
            identifier: "pulse".to_string(),
            backend: Backend::Cli,
        };

        assert!(matches!(
            RemoteClient::from_plan(&plan, "https://gitea.com", None, "tea"),
            Err(Error::Config(_))
        ));
    }
}
