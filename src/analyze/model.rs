use crate::model::{PullRequestRecord, RiskCategory, SprintTaskRecord};
use crate::sheets::Worksheet;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Snapshot of both tables for one visualize action. Either side may be absent.
#[derive(Debug, Clone, Default)]
pub struct DataAnalysis {
    pub pull_requests: Option<Vec<PullRequestRecord>>,
    pub worksheet: Option<Worksheet>,
}

impl DataAnalysis {
    pub fn new(pull_requests: Option<Vec<PullRequestRecord>>, worksheet: Option<Worksheet>) -> Self {
        Self {
            pull_requests,
            worksheet,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardAnalyzed {
    pub sprint: Option<SprintAnalyzed>,
    pub pull_requests: Option<PullRequestsAnalyzed>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SprintAnalyzed {
    pub worksheet: String,
    pub worksheets: Vec<String>,
    pub velocity: VelocityAnalyzed,
    pub time_status: TimeStatus,
    pub assignees: Vec<AssigneeAnalyzed>,
    pub risks: Vec<RiskCount>,
    pub tasks: Vec<SprintTaskRecord>,
}

/// Totals over the rows that already carry an actual value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VelocityAnalyzed {
    pub total_estimate: f64,
    pub total_actual: f64,
    pub velocity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssigneeAnalyzed {
    pub assignee: String,
    /// Every row of the assignee, whether or not an actual is recorded.
    pub total_estimate: f64,
    /// Only rows with an actual; the denominator of `velocity`.
    pub measured_estimate: f64,
    pub total_actual: f64,
    pub velocity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskCount {
    pub category: RiskCategory,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PullRequestsAnalyzed {
    pub first_created_at: Option<DateTime<Utc>>,
    pub last_merged_at: Option<DateTime<Utc>>,
    pub total_duration_hours: Option<f64>,
    pub merged: usize,
    pub records: Vec<PullRequestRecord>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Schedule {
    AheadOfSchedule,
    BehindSchedule,
    OnTime,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct TimeStatus {
    pub schedule: Schedule,
    pub hours: u64,
    pub minutes: u64,
}

impl Display for TimeStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let delta = match (self.hours, self.minutes) {
            (0, minutes) => plural(minutes, "minute"),
            (hours, minutes) => format!("{} {}", plural(hours, "hour"), plural(minutes, "minute")),
        };
        match self.schedule {
            Schedule::AheadOfSchedule => write!(f, "Ahead of Time by {delta}"),
            Schedule::BehindSchedule => write!(f, "Behind Schedule by {delta}"),
            Schedule::OnTime => write!(f, "On Time"),
        }
    }
}

fn plural(count: u64, unit: &str) -> String {
    if count == 1 {
        format!("{count} {unit}")
    } else {
        format!("{count} {unit}s")
    }
}
