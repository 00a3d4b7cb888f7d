use crate::error::Result;
use crate::gitea::{remote_error, within_window, RepoRef};
use crate::model::{PullRequestFilter, PullRequestRecord, PullRequestState, Window};
use gitea_sdk::model::issues::State;
use gitea_sdk::Client;

pub type GiteaPullRequest = gitea_sdk::model::pulls::PullRequest;

// Matches the `limit` of each page request.
const PAGE_SIZE: usize = 20;

pub trait GiteaPullRequester {
    async fn fetch_pull_requests(
        &self,
        client: &Client,
        window: &Window,
        filter: PullRequestFilter,
    ) -> Result<Vec<PullRequestRecord>>;
}

impl GiteaPullRequester for RepoRef {
    async fn fetch_pull_requests(
        &self,
        client: &Client,
        window: &Window,
        filter: PullRequestFilter,
    ) -> Result<Vec<PullRequestRecord>> {
        let (owner, name) = (&self.owner, &self.name);

        let mut page: i64 = 1;
        let mut pull_requests = vec![];
        let pulls = client.pulls(owner, name);
        loop {
            log::debug!("Fetching pull requests of {}/{} (page {})", owner, name, page);
            let gitea_pull_requests = pulls
                .list()
                .limit(20)
                .page(page)
                .state(gitea_state(filter))
                .send(client)
                .await
                .map_err(remote_error)?;
            let last = gitea_pull_requests.len() < PAGE_SIZE;
            pull_requests.extend(
                gitea_pull_requests
                    .iter()
                    .map(gitea_pull_request_to_record)
                    .filter(|pr| within_window(pr, window)),
            );
            if last {
                break;
            }
            page += 1;
        }
        Ok(pull_requests)
    }
}

fn gitea_state(filter: PullRequestFilter) -> State {
    match filter {
        PullRequestFilter::Open => State::Open,
        PullRequestFilter::Closed => State::Closed,
        PullRequestFilter::All => State::All,
    }
}

// The SDK model carries no line counts, so those stay at zero.
fn gitea_pull_request_to_record(pull_request: &GiteaPullRequest) -> PullRequestRecord {
    let closed = pull_request.closed_at.is_some() || pull_request.merged_at.is_some();
    PullRequestRecord {
        number: pull_request.number as u64,
        title: pull_request.title.clone(),
        author_key: pull_request.user.login.clone(),
        created_at: pull_request.created_at.to_string(),
        closed_at: pull_request.closed_at.clone(),
        merged_at: pull_request.merged_at.clone(),
        state: if closed {
            PullRequestState::Closed
        } else {
            PullRequestState::Open
        },
        additions: 0,
        deletions: 0,
        changed_files: 0,
    }
}
