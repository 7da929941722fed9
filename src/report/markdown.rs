use crate::analyze::{DashboardAnalyzed, PullRequestsAnalyzed, SprintAnalyzed};
use crate::model::{Error, Result};
use crate::report::chart::{
    hours, ChartLayout, ChartSpec, DataSource, DEV_TIME_FORMULA, PR_COMMENTS_FORMULA, PR_DURATION_FORMULA,
    PR_RESOLUTION_FORMULA, RISK_FORMULA, TASK_FORMULA, VELOCITY_FORMULA,
};
use itertools::Itertools;
use markdown_builder::{List, ListItem, Markdown};
use markdown_table::{Heading, HeadingAlignment, MarkdownTable};

pub trait MarkdownReport {
    fn report_render(&self) -> Result<String>;
}

impl MarkdownReport for DashboardAnalyzed {
    fn report_render(&self) -> Result<String> {
        let mut doc = Markdown::new();

        doc.header1("Data Visualisation Dashboard");
        match &self.sprint {
            Some(sprint) => {
                doc.add_sprint(sprint)?;
            }
            None => {
                doc.paragraph("*No Google Sheet was given; sprint charts are skipped.*");
            }
        }
        match &self.pull_requests {
            Some(pull_requests) => {
                doc.add_pull_requests(pull_requests)?;
            }
            None => {
                doc.paragraph("*No GitHub repository was given; PR charts are skipped.*");
            }
        }

        let charts = self.charts();
        if !charts.is_empty() {
            doc.header2("Charts");
            doc.list(chart_index(&charts));
        }

        Ok(doc.render())
    }
}

trait MarkdownExt {
    fn add_sprint(&mut self, sprint: &SprintAnalyzed) -> Result<&mut Self>;
    fn add_pull_requests(&mut self, pull_requests: &PullRequestsAnalyzed) -> Result<&mut Self>;
    fn add_source(&mut self, source: DataSource, formula: &str) -> &mut Self;
    fn add_line(&mut self, line: String) -> &mut Self;
    fn add_table(&mut self, header: Vec<Heading>, rows: Vec<Vec<String>>) -> Result<&mut Self>;
}

impl MarkdownExt for Markdown {
    fn add_sprint(&mut self, sprint: &SprintAnalyzed) -> Result<&mut Self> {
        self.add_line(format!(
            "Worksheet **{}** (available: {})",
            sprint.worksheet,
            sprint.worksheets.iter().join(", ")
        ));

        self.header2("Velocity");
        self.add_source(DataSource::GoogleSheet, VELOCITY_FORMULA);
        self.add_line(format!(
            "Estimated **{}** h, actual **{}** h, velocity **{}**. Sprint status: **{}**",
            hours(Some(sprint.velocity.total_estimate)),
            hours(Some(sprint.velocity.total_actual)),
            hours(sprint.velocity.velocity),
            sprint.time_status,
        ));
        let rows = sprint
            .assignees
            .iter()
            .map(|a| {
                vec![
                    cell(&a.assignee),
                    hours(Some(a.total_estimate)),
                    hours(Some(a.measured_estimate)),
                    hours(Some(a.total_actual)),
                    hours(a.velocity),
                ]
            })
            .collect();
        self.add_table(
            headings(&[
                "Developer",
                "Estimate, all tasks (h)",
                "Estimate, with actual (h)",
                "Actual (h)",
                "Velocity",
            ]),
            rows,
        )?;

        self.header2("Dev Time (Actual)");
        self.add_source(DataSource::GoogleSheet, DEV_TIME_FORMULA);
        let rows = sprint
            .tasks
            .iter()
            .map(|task| {
                vec![
                    cell(&task.task_name),
                    cell(&task.assignee),
                    hours(task.estimate_hours),
                    hours(task.actual_hours),
                    hours(task.dev_time_difference),
                ]
            })
            .collect();
        self.add_table(
            headings(&["Task", "Assignee", "Estimate (h)", "Actual (h)", "Difference (h)"]),
            rows,
        )?;

        self.header2("Risk Distribution");
        self.add_source(DataSource::GoogleSheet, RISK_FORMULA);
        let rows = sprint
            .risks
            .iter()
            .map(|risk| vec![cell(&risk.category.to_string()), risk.count.to_string()])
            .collect();
        self.add_table(headings(&["Risk Type", "Count"]), rows)?;

        self.header2("Task Distribution");
        self.add_source(DataSource::GoogleSheet, TASK_FORMULA);
        let pulled = sprint
            .tasks
            .iter()
            .filter(|task| task.is_pulled())
            .map(|task| format!("`{}`", task.task_name))
            .join(", ");
        self.add_line(if pulled.is_empty() {
            "Every task was completed in this sprint.".to_string()
        } else {
            format!("Not completed in this sprint: {pulled}")
        });

        Ok(self)
    }

    fn add_pull_requests(&mut self, pull_requests: &PullRequestsAnalyzed) -> Result<&mut Self> {
        self.header2("Time for PR (PR Duration)");
        self.add_source(DataSource::GithubApi, PR_DURATION_FORMULA);
        let total = match pull_requests.total_duration_hours {
            Some(total) => format!(
                "Total time taken for merging all PRs: **{total:.2} hours** ({} of {} merged)",
                pull_requests.merged,
                pull_requests.records.len()
            ),
            None => "No pull request has been merged yet.".to_string(),
        };
        self.add_line(total);

        self.header2("Time for PR Comments Resolved");
        self.add_source(DataSource::GithubApi, PR_RESOLUTION_FORMULA);
        self.header2("Number of PR Comments");
        self.add_source(DataSource::GithubApi, PR_COMMENTS_FORMULA);

        let rows = pull_requests
            .records
            .iter()
            .map(|pr| {
                vec![
                    format!("#{}", pr.number),
                    cell(&pr.title),
                    pr.state.as_str().to_string(),
                    hours(pr.duration_hours),
                    hours(pr.comment_resolution_hours),
                    pr.comment_count.to_string(),
                ]
            })
            .collect();
        self.add_table(
            headings(&[
                "PR",
                "Title",
                "State",
                "Duration (h)",
                "Comments resolved (h)",
                "Comments",
            ]),
            rows,
        )?;

        Ok(self)
    }

    fn add_source(&mut self, source: DataSource, formula: &str) -> &mut Self {
        self.add_line(format!(
            "**Data Source**: {} · **Formula**: `{formula}`",
            source.as_str()
        ))
    }

    /// Pushed as-is; `paragraph` would wrap it at 80 columns.
    fn add_line(&mut self, line: String) -> &mut Self {
        self.elements.push(format!("{line}\n").into());
        self
    }

    fn add_table(&mut self, header: Vec<Heading>, rows: Vec<Vec<String>>) -> Result<&mut Self> {
        if rows.is_empty() {
            self.paragraph("*No rows.*");
            return Ok(self);
        }
        let mut md_table = MarkdownTable::new(rows);
        md_table.with_headings(header);
        let table = md_table
            .as_markdown()
            .map_err(|e| Error::Io(format!("cannot render table: {e:?}")))?;
        self.elements.push(table.into());
        Ok(self)
    }
}

fn headings(names: &[&str]) -> Vec<Heading> {
    names
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let alignment = if index == 0 {
                HeadingAlignment::Left
            } else {
                HeadingAlignment::Center
            };
            Heading::new(name.to_string(), Some(alignment))
        })
        .collect()
}

/// Keeps free text inside its table column.
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

/// Ids match the entries of `charts.json`.
fn chart_index(charts: &[ChartSpec]) -> List {
    let items = charts
        .iter()
        .map(|chart| Box::new(format!("`{}`: {}", chart.id, chart.title)) as ListItem)
        .collect();
    List::unordered_with(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::{Analyzer, DataAnalysis};
    use crate::model::{PullRequestRecord, SprintTaskRecord};
    use crate::sheets::Worksheet;
    use chrono::{TimeZone, Utc};

    #[test]
    fn renders_both_sections() {
        let at = |hour: u32| Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap();
        let dashboard = DataAnalysis::new(
            Some(vec![PullRequestRecord::new(
                7, "Fix | pipe", "closed", at(1), at(4), Some(at(4)), Some(at(2)), 2,
            )]),
            Some(Worksheet {
                title: "Sprint 1".into(),
                titles: vec!["Sprint 1".into(), "Sprint 2".into()],
                tasks: vec![
                    SprintTaskRecord::new("Login", "ann", "4", "4", "risk"),
                    SprintTaskRecord::new("Signup", "bob", "2", "", "RISK"),
                ],
            }),
        )
        .analyze();

        let markdown = dashboard.report_render().unwrap();

        assert!(markdown.contains("Data Visualisation Dashboard"));
        assert!(markdown.contains("Worksheet **Sprint 1** (available: Sprint 1, Sprint 2)"));
        assert!(markdown.contains("Sprint status: **On Time**"));
        assert!(markdown.contains("Not completed in this sprint: `Signup`"));
        assert!(markdown.contains("**3.00 hours**"));
        assert!(markdown.contains("Fix \\| pipe"));
        assert!(markdown.contains(VELOCITY_FORMULA));
        assert!(markdown.contains("- `pr_comment_count`: PR Comments Count"));
    }

    #[test]
    fn wide_tables_and_formulas_are_not_wrapped() {
        let at = |hour: u32| Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap();
        let title = "Move the worksheet loader onto the shared fetch cache and drop the old retry loop";
        let dashboard = DataAnalysis::new(
            Some(vec![PullRequestRecord::new(
                12, title, "closed", at(1), at(5), Some(at(5)), None, 0,
            )]),
            None,
        )
        .analyze();

        let markdown = dashboard.report_render().unwrap();
        let table = markdown
            .lines()
            .filter(|line| line.starts_with('|'))
            .collect::<Vec<_>>();

        assert_eq!(table.len(), 3);
        assert!(table[1].contains(":--"));
        assert!(table.iter().all(|line| line.ends_with('|') && line.matches('|').count() == 7));
        assert!(table[2].contains(title));
        assert!(markdown.contains(&format!("`{PR_DURATION_FORMULA}`")));
    }

    #[test]
    fn free_text_cells_keep_their_column() {
        let dashboard = DataAnalysis::new(
            None,
            Some(Worksheet {
                title: "Sprint 1".into(),
                titles: vec!["Sprint 1".into()],
                tasks: vec![SprintTaskRecord::new("Login | SSO", "ann|bob", "4", "2", "a | b")],
            }),
        )
        .analyze();

        let markdown = dashboard.report_render().unwrap();
        let unescaped = |line: &str| line.replace("\\|", "").matches('|').count();

        let task_row = markdown
            .lines()
            .find(|line| line.contains("Login \\| SSO"))
            .unwrap();
        assert_eq!(unescaped(task_row), 6);
        assert!(task_row.contains("ann\\|bob"));
        let risk_row = markdown
            .lines()
            .find(|line| line.contains("a \\| b"))
            .unwrap();
        assert_eq!(unescaped(risk_row), 3);
    }

    #[test]
    fn developer_table_shows_both_estimates() {
        let dashboard = DataAnalysis::new(
            None,
            Some(Worksheet {
                title: "Sprint 1".into(),
                titles: vec!["Sprint 1".into()],
                tasks: vec![
                    SprintTaskRecord::new("Login", "ann", "4", "4", ""),
                    SprintTaskRecord::new("Signup", "ann", "6", "", ""),
                ],
            }),
        )
        .analyze();

        let markdown = dashboard.report_render().unwrap();
        let row = markdown
            .lines()
            .find(|line| line.starts_with("| ann"))
            .unwrap();
        let cells = row.split('|').map(str::trim).collect::<Vec<_>>();

        assert!(markdown.contains("Estimate, all tasks (h)"));
        assert_eq!(&cells[1..6], &["ann", "10", "4", "4", "1"]);
    }

    #[test]
    fn missing_sources_are_explained() {
        let markdown = DataAnalysis::default().analyze().report_render().unwrap();
        assert!(markdown.contains("No Google Sheet was given"));
        assert!(markdown.contains("No GitHub repository was given"));
    }
}
