use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PullRequestState {
    Open,
    Closed,
    Merged,
}

impl PullRequestState {
    pub fn from_remote(state: &str, merged: bool) -> Self {
        match (merged, state) {
            (true, _) => Self::Merged,
            (false, "open") => Self::Open,
            _ => Self::Closed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Merged => "merged",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PullRequestRecord {
    pub number: u64,
    pub title: String,
    pub state: PullRequestState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
    pub first_comment_at: Option<DateTime<Utc>>,
    pub comment_count: usize,
    pub duration_hours: Option<f64>,
    pub comment_resolution_hours: Option<f64>,
}

impl PullRequestRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        number: u64,
        title: impl ToString,
        state: &str,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        merged_at: Option<DateTime<Utc>>,
        first_comment_at: Option<DateTime<Utc>>,
        comment_count: usize,
    ) -> Self {
        let duration_hours = merged_at.map(|merged| hours_between(created_at, merged));
        let comment_resolution_hours = merged_at
            .zip(first_comment_at)
            .map(|(merged, first_comment)| hours_between(first_comment, merged));
        Self {
            number,
            title: title.to_string(),
            state: PullRequestState::from_remote(state, merged_at.is_some()),
            created_at,
            updated_at,
            merged_at,
            first_comment_at,
            comment_count,
            duration_hours,
            comment_resolution_hours,
        }
    }
}

pub fn hours_between(since: DateTime<Utc>, until: DateTime<Utc>) -> f64 {
    (until - since).num_seconds() as f64 / 3600.0
}
