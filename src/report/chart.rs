use crate::analyze::{DashboardAnalyzed, PullRequestsAnalyzed, SprintAnalyzed};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    GroupedBar,
    Pie,
    Donut,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub enum DataSource {
    #[serde(rename = "Google Sheet")]
    GoogleSheet,
    #[serde(rename = "GitHub API")]
    GithubApi,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GoogleSheet => "Google Sheet",
            Self::GithubApi => "GitHub API",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub label: String,
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub pulled: bool,
}

impl Point {
    pub fn new(label: impl ToString, value: Option<f64>) -> Self {
        Self {
            label: label.to_string(),
            value,
            hover: None,
            color: None,
            pulled: false,
        }
    }

    fn hover(mut self, hover: impl ToString) -> Self {
        self.hover = Some(hover.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<Point>,
}

impl Series {
    fn new(name: impl ToString, points: Vec<Point>) -> Self {
        Self {
            name: name.to_string(),
            points,
        }
    }
}

/// Declarative description of one dashboard widget, handed to the renderer as JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub id: &'static str,
    pub kind: ChartKind,
    pub title: String,
    pub source: DataSource,
    pub formula: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_tick_step: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub series: Vec<Series>,
}

impl ChartSpec {
    fn new(
        id: &'static str,
        kind: ChartKind,
        title: impl ToString,
        source: DataSource,
        formula: &'static str,
    ) -> Self {
        Self {
            id,
            kind,
            title: title.to_string(),
            source,
            formula,
            x_title: None,
            y_title: None,
            y_tick_step: None,
            annotation: None,
            caption: None,
            series: vec![],
        }
    }

    fn axes(mut self, x_title: impl ToString, y_title: impl ToString) -> Self {
        self.x_title = Some(x_title.to_string());
        self.y_title = Some(y_title.to_string());
        self
    }

    fn series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }
}

pub const VELOCITY_FORMULA: &str = "Sprint Velocity = Total Actual Time / Total Estimated Time";
pub const DEV_TIME_FORMULA: &str = "Dev Time = Total Actual Time";
pub const RISK_FORMULA: &str = "Risk Share = Tasks per Risk Category / Tasks with a Risk Category";
pub const TASK_FORMULA: &str = "Task Share = Task Estimate / Total Estimated Time";
pub const PR_DURATION_FORMULA: &str = "Time for PR = Last PR Merged At - First PR Created At";
pub const PR_RESOLUTION_FORMULA: &str = "Time for PR Comments Resolved = PR Merged Date - First Comment At";
pub const PR_COMMENTS_FORMULA: &str = "Number of PR Comments = Total Comments in PR";

pub trait ChartLayout {
    fn charts(&self) -> Vec<ChartSpec>;
}

impl ChartLayout for DashboardAnalyzed {
    fn charts(&self) -> Vec<ChartSpec> {
        let mut charts = vec![];
        if let Some(sprint) = &self.sprint {
            charts.extend(sprint.charts());
        }
        if let Some(pull_requests) = &self.pull_requests {
            charts.extend(pull_requests.charts());
        }
        charts
    }
}

impl ChartLayout for SprintAnalyzed {
    fn charts(&self) -> Vec<ChartSpec> {
        let velocity = ChartSpec::new(
            "velocity",
            ChartKind::Bar,
            format!("Team Sprint Velocity Sprint status: {}", self.time_status),
            DataSource::GoogleSheet,
            VELOCITY_FORMULA,
        )
        .axes("", "Effort (hours)")
        .series(Series::new(
            "Effort",
            vec![
                Point::new("Estimated", Some(self.velocity.total_estimate)),
                Point::new("Actual", Some(self.velocity.total_actual)),
            ],
        ));

        let developers = ChartSpec::new(
            "developer_velocity",
            ChartKind::GroupedBar,
            "Individual Developer Velocity",
            DataSource::GoogleSheet,
            VELOCITY_FORMULA,
        )
        .axes("Developer", "Effort (hours)")
        .series(Series::new(
            "total_estimate",
            self.assignees
                .iter()
                .map(|a| Point::new(&a.assignee, Some(a.total_estimate)))
                .collect(),
        ))
        .series(Series::new(
            "total_actual",
            self.assignees
                .iter()
                .map(|a| Point::new(&a.assignee, Some(a.total_actual)))
                .collect(),
        ));

        let dev_time = ChartSpec::new(
            "dev_time",
            ChartKind::Bar,
            "Dev Time",
            DataSource::GoogleSheet,
            DEV_TIME_FORMULA,
        )
        .axes("Task Name", "Dev Time (hours)")
        .series(Series::new(
            "Actual",
            self.tasks
                .iter()
                .map(|task| Point::new(task.short_name(), task.actual_hours).hover(&task.task_name))
                .collect(),
        ));

        let risks = ChartSpec::new(
            "risk_distribution",
            ChartKind::Pie,
            "Risk Distribution",
            DataSource::GoogleSheet,
            RISK_FORMULA,
        )
        .series(Series::new(
            "Count",
            self.risks
                .iter()
                .map(|risk| Point {
                    color: risk.category.color().map(String::from),
                    ..Point::new(&risk.category, Some(risk.count as f64))
                })
                .collect(),
        ));

        let mut tasks = ChartSpec::new(
            "task_distribution",
            ChartKind::Pie,
            "Task Distribution",
            DataSource::GoogleSheet,
            TASK_FORMULA,
        )
        .series(Series::new(
            "Estimate",
            self.tasks
                .iter()
                .map(|task| Point {
                    pulled: task.is_pulled(),
                    ..Point::new(task.short_name(), task.estimate_hours)
                        .hover(format!("{}<br>Estimate: {}hr", task.task_name, hours(task.estimate_hours)))
                })
                .collect(),
        ));
        tasks.caption = Some(
            "A task pulled out of the chart could not be completed in this sprint".to_string(),
        );

        vec![velocity, developers, dev_time, risks, tasks]
    }
}

impl ChartLayout for PullRequestsAnalyzed {
    fn charts(&self) -> Vec<ChartSpec> {
        let mut duration = ChartSpec::new(
            "pr_duration",
            ChartKind::Donut,
            "Time for PR (PR Duration)",
            DataSource::GithubApi,
            PR_DURATION_FORMULA,
        )
        .series(Series::new(
            "PR Duration",
            self.records
                .iter()
                .map(|pr| Point::new(&pr.title, pr.duration_hours))
                .collect(),
        ));
        duration.annotation = self
            .total_duration_hours
            .map(|total| format!("{total:.2} hours"));

        let resolution = ChartSpec::new(
            "pr_comment_resolution",
            ChartKind::Bar,
            "PR Comments Resolved Duration",
            DataSource::GithubApi,
            PR_RESOLUTION_FORMULA,
        )
        .axes("PR Title", "Resolution Time (hours)")
        .series(Series::new(
            "PR Comments Resolved Duration",
            self.records
                .iter()
                .map(|pr| Point::new(&pr.title, pr.comment_resolution_hours))
                .collect(),
        ));

        let mut comments = ChartSpec::new(
            "pr_comment_count",
            ChartKind::Bar,
            "PR Comments Count",
            DataSource::GithubApi,
            PR_COMMENTS_FORMULA,
        )
        .axes("PR Title", "Total comments in PR")
        .series(Series::new(
            "Comments",
            self.records
                .iter()
                .map(|pr| Point::new(&pr.title, Some(pr.comment_count as f64)))
                .collect(),
        ));
        comments.y_tick_step = Some(1.0);

        vec![duration, resolution, comments]
    }
}

pub fn hours(value: Option<f64>) -> String {
    match value {
        Some(value) if value.fract() == 0.0 => format!("{value:.0}"),
        Some(value) => format!("{value:.2}"),
        None => "-".to_string(),
    }
}
