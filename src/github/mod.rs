pub mod pull_request;

pub use pull_request::{GithubPullRequester, PullRequestStep};

use crate::fetch::Transport;
use crate::model::Repository;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const PAGE_SIZE: u32 = 100;

pub struct GithubApi<T: Transport> {
    base_url: String,
    transport: T,
}

impl<T: Transport> GithubApi<T> {
    pub fn new(base_url: &str, transport: T) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn pulls_url(&self, repo: &Repository) -> String {
        format!(
            "{}/repos/{}/{}/pulls?state=all&per_page={PAGE_SIZE}",
            self.base_url, repo.owner, repo.name
        )
    }

    fn comments_url(&self, repo: &Repository, number: u64) -> String {
        format!(
            "{}/repos/{}/{}/issues/{number}/comments?per_page={PAGE_SIZE}",
            self.base_url, repo.owner, repo.name
        )
    }
}
