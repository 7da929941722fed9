pub mod chart;
pub mod markdown;

pub use chart::ChartLayout;
pub use markdown::MarkdownReport;

use crate::analyze::DashboardAnalyzed;
use crate::model::Result;
use std::fs;
use std::path::{Path, PathBuf};

pub const MARKDOWN_FILE: &str = "dashboard.md";
pub const CHARTS_FILE: &str = "charts.json";

#[derive(Debug, Clone)]
pub struct DashboardFiles {
    pub markdown: PathBuf,
    pub charts: PathBuf,
    pub chart_count: usize,
}

/// Nothing is written unless both renditions succeed.
pub fn write_dashboard(out_dir: &Path, dashboard: &DashboardAnalyzed) -> Result<DashboardFiles> {
    let markdown = dashboard.report_render()?;
    let charts = dashboard.charts();
    let json = serde_json::to_string_pretty(&charts)?;

    fs::create_dir_all(out_dir)?;
    let files = DashboardFiles {
        markdown: out_dir.join(MARKDOWN_FILE),
        charts: out_dir.join(CHARTS_FILE),
        chart_count: charts.len(),
    };
    fs::write(&files.markdown, markdown)?;
    fs::write(&files.charts, json)?;
    Ok(files)
}
