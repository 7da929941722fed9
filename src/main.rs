mod analyze;
mod fetch;
mod github;
mod model;
mod report;
mod sheets;
mod utils;

use crate::analyze::{Analyzer, DashboardAnalyzed, DataAnalysis};
use crate::fetch::{FetchCache, HttpTransport};
use crate::github::{GithubApi, GithubPullRequester, PullRequestStep};
use crate::report::DashboardFiles;
use crate::sheets::{auth, SheetReader, SheetsApi, Worksheet};
use crate::utils::{MultiProgressNew, ProgressBarExt, ProgressStyleTemplate};
use clap::Parser;
use indicatif::{MultiProgress, ProgressBar};
use model::{Error, PullRequestRecord, Repository, Result, Secrets, Spreadsheet};
use reqwest::Client;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Sprint velocity and pull request dashboard")]
struct Args {
    /// GitHub repository URL, `owner/name`, or a name owned by the credential user
    #[arg(long = "repo")]
    repo: Option<String>,
    /// Google Sheet URL or spreadsheet id
    #[arg(long = "sheet")]
    sheet: Option<String>,
    /// Worksheet to visualize; the first one when omitted
    #[arg(long = "worksheet")]
    worksheet: Option<String>,
    #[arg(long = "secrets", default_value = "secrets.toml")]
    secrets_path: String,
    #[arg(long = "out", default_value = "dashboard")]
    out_dir: PathBuf,
    #[arg(long = "github_url", default_value = github::DEFAULT_API_URL)]
    github_url: String,
    #[arg(long = "sheets_url", default_value = sheets::DEFAULT_API_URL)]
    sheets_url: String,
    #[arg(long = "log_json")]
    log_json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.log_json);
    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "visualize failed");
            eprintln!("An error occurred: {error}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(error) = result {
        eprintln!("Logging is disabled: {error}");
    }
}

async fn run(args: &Args) -> Result<()> {
    let repo_ref = non_blank(&args.repo);
    let sheet_ref = non_blank(&args.sheet);
    if repo_ref.is_none() && sheet_ref.is_none() {
        return Err(Error::Input(
            "enter a GitHub repository (--repo) and/or a Google Sheet (--sheet)".into(),
        ));
    }

    let secrets = Secrets::from_config(&args.secrets_path)?;
    let repo = repo_ref
        .map(|r| Repository::parse(r, &secrets.google.username))
        .transpose()?;
    let sheet = sheet_ref.map(Spreadsheet::parse).transpose()?;

    let client = Client::new();
    let cache = FetchCache::default();
    let multi_progress = utils::multi_progress(std::io::stderr().is_terminal());

    let (pull_requests, worksheet) = futures::try_join!(
        github_fetch(repo.as_ref(), &client, &secrets, args, &cache, &multi_progress),
        sheet_fetch(sheet.as_ref(), &client, &secrets, args, &cache, &multi_progress),
    )?;
    tracing::debug!(entries = cache.len().await, "fetch cache populated");

    let dashboard = DataAnalysis::new(pull_requests, worksheet).analyze();
    let files = report::write_dashboard(&args.out_dir, &dashboard)?;
    print_summary(&dashboard, &files);
    Ok(())
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

async fn github_fetch(
    repo: Option<&Repository>,
    client: &Client,
    secrets: &Secrets,
    args: &Args,
    cache: &FetchCache,
    multi_progress: &MultiProgress,
) -> Result<Option<Vec<PullRequestRecord>>> {
    let Some(repo) = repo else {
        return Ok(None);
    };
    let pb = multi_progress.add_spinner("GitHub", &format!("Waiting for {repo}"));
    let transport = HttpTransport::basic(
        client.clone(),
        &secrets.google.username,
        &secrets.google.token,
    );
    let api = GithubApi::new(&args.github_url, transport);

    let progress_pb = pb.clone();
    let progress = move |step: PullRequestStep| match step {
        PullRequestStep::Listing => progress_pb.set_message("Fetch pull requests ..."),
        PullRequestStep::Comments { done, total } => {
            progress_pb.show_count("Fetch comment threads", done, total)
        }
    };
    let result = repo.fetch_pull_requests(&api, cache, Box::new(progress)).await;
    finish(&pb, result.as_ref().map(|records| {
        format!(
            "✅ Completed fetch pull requests (find {} pull requests)",
            records.len()
        )
    }));
    result.map(Some)
}

async fn sheet_fetch(
    sheet: Option<&Spreadsheet>,
    client: &Client,
    secrets: &Secrets,
    args: &Args,
    cache: &FetchCache,
    multi_progress: &MultiProgress,
) -> Result<Option<Worksheet>> {
    let Some(sheet) = sheet else {
        return Ok(None);
    };
    let pb = multi_progress.add_spinner("Sheets", "Authorizing service account ...");
    let result: Result<Worksheet> = async {
        let token = auth::access_token(client, &secrets.google).await?;
        let transport = HttpTransport::bearer(client.clone(), token);
        let api = SheetsApi::new(&args.sheets_url, transport, &secrets.google.client_email);
        let progress_pb = pb.clone();
        let progress = move |message: String| progress_pb.set_message(message);
        sheet
            .read_worksheet(&api, cache, args.worksheet.as_deref(), Box::new(progress))
            .await
    }
    .await;
    finish(&pb, result.as_ref().map(|worksheet| {
        format!(
            "✅ Completed read worksheet `{}` (find {} tasks)",
            worksheet.title,
            worksheet.tasks.len()
        )
    }));
    result.map(Some)
}

fn finish(pb: &ProgressBar, outcome: std::result::Result<String, &Error>) {
    pb.set_style(ProgressStyleTemplate::spinner());
    match outcome {
        Ok(message) => pb.finish_with_message(message),
        Err(error) => pb.abandon_with_message(format!("❌ {error}")),
    }
}

fn print_summary(dashboard: &DashboardAnalyzed, files: &DashboardFiles) {
    if let Some(sprint) = &dashboard.sprint {
        match sprint.velocity.velocity {
            Some(velocity) => println!(
                "Sprint `{}`: velocity {velocity:.2}, {}",
                sprint.worksheet, sprint.time_status
            ),
            None => println!(
                "Sprint `{}`: no estimated work with recorded actuals, {}",
                sprint.worksheet, sprint.time_status
            ),
        }
    }
    if let Some(pull_requests) = &dashboard.pull_requests {
        let total = pull_requests
            .total_duration_hours
            .map(|hours| format!("{hours:.2} hours from first opened to last merged"))
            .unwrap_or_else(|| "nothing merged yet".to_string());
        println!(
            "Pull requests: {} ({} merged), {total}",
            pull_requests.records.len(),
            pull_requests.merged
        );
    }
    println!(
        "Dashboard written to {} and {} ({} charts)",
        files.markdown.display(),
        files.charts.display(),
        files.chart_count
    );
}
