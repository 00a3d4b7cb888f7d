mod analyze;
mod error;
mod git;
mod gitea;
mod model;
mod report;
mod utils;

use crate::analyze::aggregator::Aggregator;
use crate::analyze::collector::{collect, CollectProgress};
use crate::analyze::resolver::{resolve, SourcePlan, SourceRequest};
use crate::analyze::visualization::{ChartOptions, Visualizer};
use crate::analyze::SourceData;
use crate::error::Result;
use crate::git::{LocalReader, LocalRepository};
use crate::gitea::{CliClient, RemoteClient};
use crate::model::{Report, Settings, SizeThresholds, Window};
use crate::report::Format;
use crate::utils::{stderr_multi_progress, MultiProgressNew};
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Commit, pull request and activity report for a git repository")]
struct Args {
    /// Local checkout to analyze.
    #[arg(long, default_value = ".")]
    path: PathBuf,
    /// Remote repository as `owner/name`; derived from the checkout's origin when omitted.
    #[arg(long)]
    repo: Option<String>,
    #[arg(long, env = "GITEA_TOKEN", hide_env_values = true)]
    token: Option<String>,
    #[arg(long = "gitea-url", default_value = "https://gitea.com")]
    gitea_url: String,
    /// Forge command line client used when no token is given.
    #[arg(long, default_value = "tea")]
    cli: String,
    #[arg(long)]
    since: Option<String>,
    #[arg(long)]
    until: Option<String>,
    #[arg(long = "small-threshold")]
    small_threshold: Option<usize>,
    #[arg(long = "medium-threshold")]
    medium_threshold: Option<usize>,
    /// Fail instead of falling back to the forge when the checkout cannot be used.
    #[arg(long = "require-local")]
    require_local: bool,
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,
    #[arg(long)]
    output: Option<PathBuf>,
    /// JSON file with `since`, `until`, `smallThreshold` and `mediumThreshold`.
    #[arg(long)]
    settings: Option<String>,
    /// Hide progress spinners.
    #[arg(long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> Result<()> {
    let settings = match &args.settings {
        Some(path) => Settings::from_config(path)?,
        None => Settings::default(),
    };
    let since = args.since.clone().or(settings.since);
    let until = args.until.clone().or(settings.until);
    let window = Window::parse(since.as_deref(), until.as_deref())?;
    let defaults = SizeThresholds::default();
    let thresholds = SizeThresholds::new(
        args.small_threshold.or(settings.small_threshold).unwrap_or(defaults.small),
        args.medium_threshold.or(settings.medium_threshold).unwrap_or(defaults.medium),
    )?;

    let local = LocalRepository::discover(&args.path)?;
    let local_remote = local.as_ref().and_then(|local| local.remote_identifier());
    let request = SourceRequest {
        path: &args.path,
        explicit_remote: args.repo.as_deref(),
        local_remote: local_remote.as_deref(),
        has_checkout: local.is_some(),
        require_local: args.require_local,
        token: args.token.as_deref(),
    };
    let plan = resolve(&request, CliClient::is_available(&args.cli)).await?;
    log::info!(
        "Analyzing local checkout: {}, remote: {:?}",
        plan.analyze_local,
        plan.remote
    );

    let mut report = analyze(args, &plan, local.as_ref(), &window, since, until).await?;
    let options = ChartOptions { thresholds, now: Utc::now() };
    report.visualization = report.build_visualization(&options);

    let content = report::render(&report, args.format)?;
    report::write(&content, args.output.as_deref())
}

async fn analyze(
    args: &Args,
    plan: &SourcePlan,
    local: Option<&LocalRepository>,
    window: &Window,
    since: Option<String>,
    until: Option<String>,
) -> Result<Report> {
    let remote = plan
        .remote
        .as_ref()
        .map(|remote| RemoteClient::from_plan(remote, &args.gitea_url, args.token.as_deref(), &args.cli))
        .transpose()?;

    let multi_progress = stderr_multi_progress(args.quiet);
    let progress = CollectProgress {
        local: multi_progress.add_spinner("Waiting git history"),
        remote: multi_progress.add_spinner("Waiting Gitea"),
    };
    let data = collect(
        plan,
        local,
        remote.as_ref(),
        window,
        SourceData::new(since, until),
        &progress,
    )
    .await;

    Ok(data.aggregate(Utc::now()))
}
