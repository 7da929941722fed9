mod pull_request;
mod repository;
mod result;
mod secrets;
mod spreadsheet;
mod sprint_task;

pub use pull_request::{hours_between, PullRequestRecord, PullRequestState};
pub use repository::Repository;
pub use result::{Error, Result};
pub use secrets::{GoogleSecrets, Secrets};
pub use spreadsheet::Spreadsheet;
pub use sprint_task::{RiskCategory, SprintTaskRecord};
