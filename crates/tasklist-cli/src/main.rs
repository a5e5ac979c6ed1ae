use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use tasklist_core::app::{Applied, TaskListClient, TodoRow};
use tasklist_core::config::ClientConfig;
use tasklist_core::domain::{ClientError, ErrorKind, TodoId};
use tasklist_core::fetch::{HealthCheck, greet};
use tasklist_core::impls::HttpTodoBackend;

mod console;
mod shell;

use console::ConsoleNotifier;

#[derive(Parser)]
#[command(name = "tasklist", version, about = "Task list client for a /api/todos REST backend")]
struct Cli {
    /// TOML config file (base_url, timeout_ms)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL, e.g. http://127.0.0.1:5000
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Request timeout in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show all todos
    List,
    /// Create a todo
    Add {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Flip (or set with --done) the completion flag of a todo
    Toggle {
        id: TodoId,
        #[arg(long)]
        done: Option<bool>,
    },
    /// Delete a todo
    Delete { id: TodoId },
    /// Interactive session
    Shell,
    /// GET {base_url}/api/todos once and report the result
    Ping,
    /// Say hello
    Hello,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// デフォルト → ファイル → 環境変数 → フラグ の順に上書き
fn resolve_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let config = match &cli.config {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::default(),
    };
    let mut config = config.with_env()?;
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
    Ok(config.validate()?)
}

fn connect(config: &ClientConfig) -> anyhow::Result<TaskListClient> {
    let backend = HttpTodoBackend::new(config)
        .with_context(|| format!("cannot use backend at {}", config.base_url()))?;
    Ok(TaskListClient::new(Arc::new(backend)))
}

/// 通信まわりの失敗に添える一言
fn hint(error: &ClientError) -> Option<&'static str> {
    match error.kind() {
        ErrorKind::Timeout => Some("the backend did not answer in time; try a larger --timeout-ms"),
        ErrorKind::Transport => Some("is the backend running at --base-url?"),
        ErrorKind::Validation | ErrorKind::Rejected | ErrorKind::Decode => None,
    }
}

/// アラートを標準エラーに出す。失敗が無ければ true。
fn report(applied: &[Applied]) -> bool {
    let mut ok = true;
    for outcome in applied {
        if let Applied::Failed(alert) = outcome {
            eprintln!("error: {alert}");
            if let Some(hint) = hint(&alert.error) {
                eprintln!("hint: {hint}");
            }
            ok = false;
        }
    }
    ok
}

/// 一覧を取ってから 1 操作だけ発行し、全部終わったら描画する
async fn one_shot<F>(config: &ClientConfig, issue: F) -> anyhow::Result<ExitCode>
where
    F: FnOnce(&mut TaskListClient) -> Result<(), ClientError>,
{
    let mut client = connect(config)?;
    client.refresh();
    if !report(&client.settle().await) {
        return Ok(ExitCode::FAILURE);
    }

    issue(&mut client)?;
    let ok = report(&client.settle().await);
    println!("{}", client.view());
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn checked(client: &TaskListClient, id: &TodoId) -> Result<bool, ClientError> {
    client
        .state()
        .get(id)
        .map(TodoRow::checked)
        .ok_or_else(|| ClientError::NotDisplayed(id.clone()))
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_logging();
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    debug!(base_url = config.base_url(), timeout_ms = config.timeout_ms, "config resolved");
    let notifier = ConsoleNotifier;

    match cli.command {
        Commands::List => one_shot(&config, |_| Ok(())).await,
        Commands::Add { text } => {
            let text = text.join(" ");
            one_shot(&config, |client| client.create(&text)).await
        }
        Commands::Toggle { id, done } => {
            one_shot(&config, |client| {
                let done = match done {
                    Some(done) => done,
                    None => !checked(client, &id)?,
                };
                client.toggle(&id, done)
            })
            .await
        }
        Commands::Delete { id } => one_shot(&config, |client| client.delete(&id)).await,
        Commands::Shell => {
            shell::run(connect(&config)?).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Ping => {
            let check = HealthCheck::new(&config)?;
            let report = check.run_and_notify(&notifier).await;
            Ok(if report.is_healthy() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Hello => {
            greet(&notifier);
            Ok(ExitCode::SUCCESS)
        }
    }
}
