use crate::analyze::{
    AssigneeAnalyzed, DashboardAnalyzed, DataAnalysis, PullRequestsAnalyzed, RiskCount,
    Schedule, SprintAnalyzed, TimeStatus, VelocityAnalyzed,
};
use crate::model::{hours_between, PullRequestRecord, RiskCategory, SprintTaskRecord};
use crate::sheets::Worksheet;
use indexmap::IndexMap;
use itertools::Itertools;

pub trait Analyzer {
    fn analyze(&self) -> DashboardAnalyzed;
}

impl Analyzer for DataAnalysis {
    fn analyze(&self) -> DashboardAnalyzed {
        DashboardAnalyzed {
            sprint: self.worksheet.as_ref().map(analyze_worksheet),
            pull_requests: self.pull_requests.as_deref().map(analyze_pull_requests),
        }
    }
}

fn analyze_worksheet(worksheet: &Worksheet) -> SprintAnalyzed {
    let velocity = sprint_velocity(&worksheet.tasks);
    SprintAnalyzed {
        worksheet: worksheet.title.clone(),
        worksheets: worksheet.titles.clone(),
        velocity,
        time_status: time_status(velocity.total_estimate, velocity.total_actual),
        assignees: assignee_velocities(&worksheet.tasks),
        risks: risk_distribution(&worksheet.tasks),
        tasks: worksheet.tasks.clone(),
    }
}

fn analyze_pull_requests(records: &[PullRequestRecord]) -> PullRequestsAnalyzed {
    let first_created_at = records.iter().map(|pr| pr.created_at).min();
    let last_merged_at = records.iter().filter_map(|pr| pr.merged_at).max();
    PullRequestsAnalyzed {
        first_created_at,
        last_merged_at,
        total_duration_hours: first_created_at
            .zip(last_merged_at)
            .map(|(first, last)| hours_between(first, last)),
        merged: records.iter().filter(|pr| pr.merged_at.is_some()).count(),
        records: records.to_vec(),
    }
}

/// Σactual / Σestimate over rows whose actual is known.
pub fn sprint_velocity<'a>(tasks: impl IntoIterator<Item = &'a SprintTaskRecord>) -> VelocityAnalyzed {
    let (total_estimate, total_actual) = tasks
        .into_iter()
        .filter_map(|task| task.actual_hours.map(|actual| (task.estimate_hours.unwrap_or(0.0), actual)))
        .fold((0.0, 0.0), |(estimate, actual), (e, a)| (estimate + e, actual + a));
    VelocityAnalyzed {
        total_estimate,
        total_actual,
        velocity: ratio(total_actual, total_estimate),
    }
}

pub fn assignee_velocities(tasks: &[SprintTaskRecord]) -> Vec<AssigneeAnalyzed> {
    let mut groups: IndexMap<&str, Vec<&SprintTaskRecord>> = IndexMap::new();
    for task in tasks {
        groups.entry(task.assignee.as_str()).or_default().push(task);
    }
    groups
        .into_iter()
        .map(|(assignee, tasks)| {
            let velocity = sprint_velocity(tasks.iter().copied());
            AssigneeAnalyzed {
                assignee: assignee.to_string(),
                total_estimate: tasks.iter().filter_map(|task| task.estimate_hours).sum(),
                measured_estimate: velocity.total_estimate,
                total_actual: velocity.total_actual,
                velocity: velocity.velocity,
            }
        })
        .collect()
}

/// Compares the totals; the delta is whole hours plus truncated minutes.
pub fn time_status(total_estimate: f64, total_actual: f64) -> TimeStatus {
    let difference = total_estimate - total_actual;
    // Guards against 2.3 - 2.0 landing just under eighteen minutes.
    let total_minutes = (difference.abs() * 60.0 + 1e-9).floor() as u64;
    let schedule = match total_minutes {
        0 => Schedule::OnTime,
        _ if difference > 0.0 => Schedule::AheadOfSchedule,
        _ => Schedule::BehindSchedule,
    };
    TimeStatus {
        schedule,
        hours: total_minutes / 60,
        minutes: total_minutes % 60,
    }
}

/// Counts per category, most frequent first; ties keep first-seen order.
pub fn risk_distribution(tasks: &[SprintTaskRecord]) -> Vec<RiskCount> {
    let mut counts: IndexMap<&RiskCategory, usize> = IndexMap::new();
    for category in tasks.iter().filter_map(|task| task.risk_category.as_ref()) {
        *counts.entry(category).or_default() += 1;
    }
    counts
        .into_iter()
        .sorted_by(|(_, a), (_, b)| b.cmp(a))
        .map(|(category, count)| RiskCount {
            category: category.clone(),
            count,
        })
        .collect()
}

fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    (denominator != 0.0).then(|| numerator / denominator)
}
