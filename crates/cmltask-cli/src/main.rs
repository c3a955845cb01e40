use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use cmltask_core::impls::LocalTracker;
use cmltask_core::ports::Tracker;
use cmltask_core::{CmlTask, cml_task};
use tokio::time::{Duration, sleep};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cmltask")]
#[command(about = "Run a function as a tracked task", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the demo function once through the task wrapper
    Run(RunArgs),
}

#[derive(clap::Args)]
struct RunArgs {
    /// YAML file with project_name / task_name / tags / artifacts
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    project: Option<String>,

    #[arg(long)]
    task_name: Option<String>,

    /// Repeatable
    #[arg(long = "tag")]
    tags: Vec<String>,

    /// NAME=JSON (plain text is stored as a string), repeatable
    #[arg(long = "artifact", value_parser = parse_artifact)]
    artifacts: Vec<(String, serde_json::Value)>,

    /// Where the local tracker writes task records
    #[arg(long, default_value = cmltask_core::impls::local_tracker::DEFAULT_ROOT)]
    output_dir: PathBuf,

    /// Make the demo function fail
    #[arg(long)]
    fail: bool,
}

fn parse_artifact(raw: &str) -> Result<(String, serde_json::Value), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    if name.is_empty() {
        return Err(format!("artifact name is empty in '{raw}'"));
    }
    let value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
    Ok((name.to_string(), value))
}

/// demo 用の関数：Task の中で実行される本体
async fn example_function(fail: bool) -> Result<(), String> {
    println!("Task is running...");
    sleep(Duration::from_millis(10)).await;
    if fail {
        return Err("demo failure requested with --fail".to_string());
    }
    Ok(())
}

fn decorator(args: &RunArgs, tracker: Arc<dyn Tracker>) -> CmlTask {
    let mut task = cml_task().tracker(tracker);
    if let Some(path) = &args.config {
        task = task.yaml_file(path);
    }
    if let Some(project) = &args.project {
        task = task.project_name(project);
    }
    if let Some(name) = &args.task_name {
        task = task.task_name(name);
    }
    if !args.tags.is_empty() {
        task = task.tags(args.tags.iter().cloned());
    }
    for (name, value) in &args.artifacts {
        task = task.artifact(name.clone(), value.clone());
    }
    task
}

async fn run(args: RunArgs) -> anyhow::Result<()> {
    let tracker = Arc::new(LocalTracker::new(&args.output_dir));
    let task = cml_task!(decorator(&args, tracker), example_function);

    let effective = task.effective_config();
    tracing::info!(
        task_name = %effective.task_name,
        project = ?effective.project_name,
        tags = ?effective.tags,
        artifacts = effective.artifacts.len(),
        "running task"
    );

    match task.call_async(args.fail).await {
        Ok(()) => {
            println!("task records written under {}", args.output_dir.display());
            Ok(())
        }
        Err(err) if err.is_function_error() => bail!("task failed: {err}"),
        Err(err) => Err(err).context("task could not be started"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_json_and_plain_artifacts() {
        assert_eq!(
            parse_artifact("config={\"lr\":0.1}").unwrap(),
            ("config".to_string(), serde_json::json!({"lr": 0.1}))
        );
        assert_eq!(
            parse_artifact("notes=first run").unwrap(),
            ("notes".to_string(), serde_json::json!("first run"))
        );
        assert!(parse_artifact("novalue").is_err());
        assert!(parse_artifact("=1").is_err());
    }

    #[test]
    fn cli_flags_build_the_decorator() {
        let cli = Cli::parse_from([
            "cmltask", "run", "--project", "vision", "--tag", "a", "--tag", "b",
            "--artifact", "model=1",
        ]);
        let Commands::Run(args) = cli.command;
        let tracker = Arc::new(cmltask_core::impls::InMemoryTracker::new());

        let task = decorator(&args, tracker);

        let config = task.config();
        assert_eq!(config.project_name.as_deref(), Some("vision"));
        assert_eq!(config.tags, Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(config.artifacts.as_ref().map(|a| a.len()), Some(1));
        assert!(config.yaml_file.is_none());
    }
}
