use crate::fetch::{fetch_all_pages, CallKind, FetchCache, FetchKey, Transport};
use crate::github::GithubApi;
use crate::model::{PullRequestRecord, Repository, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
struct GithubPullRequest {
    number: u64,
    title: String,
    state: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    merged_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
struct GithubComment {
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum PullRequestStep {
    Listing,
    Comments { done: usize, total: usize },
}

pub type StepProgress<'a> = Box<dyn FnMut(PullRequestStep) + 'a>;

pub trait GithubPullRequester {
    async fn fetch_pull_requests<'a, T: Transport>(
        &self,
        api: &GithubApi<T>,
        cache: &FetchCache,
        cb: StepProgress<'a>,
    ) -> Result<Vec<PullRequestRecord>>;
}

impl GithubPullRequester for Repository {
    async fn fetch_pull_requests<'a, T: Transport>(
        &self,
        api: &GithubApi<T>,
        cache: &FetchCache,
        mut cb: StepProgress<'a>,
    ) -> Result<Vec<PullRequestRecord>> {
        cb(PullRequestStep::Listing);
        let source = self.to_string();
        let pulls = fetch_all_pages(
            api.transport(),
            cache,
            FetchKey::new(&source, CallKind::PullRequests, "all"),
            api.pulls_url(self),
        )
        .await?;
        let pulls = decode::<GithubPullRequest>(pulls)?;
        tracing::info!(repository = %source, count = pulls.len(), "listed pull requests");

        let total = pulls.len();
        let mut records = Vec::with_capacity(total);
        for (index, pull) in pulls.into_iter().enumerate() {
            cb(PullRequestStep::Comments { done: index, total });
            let comments = fetch_all_pages(
                api.transport(),
                cache,
                FetchKey::new(&source, CallKind::IssueComments, pull.number),
                api.comments_url(self, pull.number),
            )
            .await?;
            let comments = decode::<GithubComment>(comments)?;
            let first_comment_at = comments.iter().map(|c| c.created_at).min();

            records.push(PullRequestRecord::new(
                pull.number,
                pull.title,
                &pull.state,
                pull.created_at,
                pull.updated_at,
                pull.merged_at,
                first_comment_at,
                comments.len(),
            ));
        }
        cb(PullRequestStep::Comments { done: total, total });
        Ok(records)
    }
}

fn decode<D: serde::de::DeserializeOwned>(items: Vec<Value>) -> Result<Vec<D>> {
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(Into::into))
        .collect()
}
