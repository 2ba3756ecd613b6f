/*
[INPUT]:  CLI arguments, YAML configuration file, OS shutdown signals
[OUTPUT]: Task results rendered to stdout; errors on stderr with non-zero exit
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, subcommands, or shutdown handling
*/

use airdesk_client::{
    BookingDesk, FlightQuery, HttpMethod, PollOptions, TaskClient, TaskHandle, TaskHook,
    TaskSubmission,
};
use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use airdesk_cli::{DeskConfig, OutputFormat, render};

#[derive(Parser, Debug)]
#[command(name = "airdesk", version, about = "Airline booking desk over the task service")]
struct Cli {
    #[arg(long = "config", value_name = "PATH", global = true)]
    config_path: Option<PathBuf>,
    #[arg(long = "base-url", value_name = "URL", global = true)]
    base_url: Option<String>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info", global = true)]
    log_level: String,
    #[arg(long = "output", value_enum, default_value_t = OutputFormat::Json, global = true)]
    output: OutputFormat,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit a task and wait for its result
    Exec {
        service: String,
        route: String,
        /// JSON parameters forwarded to the backend route
        #[arg(long, default_value = "{}")]
        params: String,
        #[arg(long, default_value = "POST")]
        method: HttpMethod,
    },
    /// Fetch the current status of a task once
    Status { task_id: String },
    /// Poll a task until it finishes
    Wait {
        task_id: String,
        #[arg(long = "interval-ms")]
        interval_ms: Option<u64>,
        #[arg(long = "max-attempts")]
        max_attempts: Option<u32>,
    },
    /// Search flights
    Flights {
        #[arg(long)]
        origin: Option<String>,
        #[arg(long)]
        destination: Option<String>,
    },
    /// List airline companies
    Companies,
    /// List registered users
    Users,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    let mut config = DeskConfig::load(args.config_path.as_deref())?;
    if let Some(base_url) = args.base_url.clone() {
        config.base_url = Some(base_url);
    }

    let client = TaskClient::with_config(config.client_config()).context("build task client")?;
    info!(base_url = %client.base_url(), "task service configured");

    let shutdown = CancellationToken::new();
    setup_signal_handlers(shutdown.clone());

    let value = run(args.command, client, &shutdown).await?;
    println!("{}", render(&value, args.output)?);
    Ok(())
}

async fn run(command: Command, client: TaskClient, shutdown: &CancellationToken) -> Result<Value> {
    match command {
        Command::Exec {
            service,
            route,
            params,
            method,
        } => {
            let params: Value = serde_json::from_str(&params).context("--params must be JSON")?;
            let submission = TaskSubmission::new(service, route, params, method);
            let hook = TaskHook::from_client(client);
            hook.execute_with_cancel(&submission, shutdown)
                .await
                .map_err(|err| anyhow!(hook.error().unwrap_or_else(|| err.to_string())))
        }
        Command::Status { task_id } => {
            let handle = parse_handle(&task_id)?;
            let status = client.fetch_status(&handle).await?;
            Ok(serde_json::to_value(status)?)
        }
        Command::Wait {
            task_id,
            interval_ms,
            max_attempts,
        } => {
            let handle = parse_handle(&task_id)?;
            let defaults = client.poll_options();
            let options = PollOptions::new(
                interval_ms.map(Duration::from_millis).unwrap_or(defaults.interval),
                max_attempts.unwrap_or(defaults.max_attempts),
            );
            let status = client.poll_with(&handle, options, shutdown).await?;
            Ok(serde_json::to_value(status)?)
        }
        Command::Flights {
            origin,
            destination,
        } => {
            let desk = BookingDesk::new(TaskHook::from_client(client));
            let query = FlightQuery {
                origin,
                destination,
            };
            let flights = until_shutdown(shutdown, desk.search_flights(&query)).await?;
            Ok(serde_json::to_value(flights)?)
        }
        Command::Companies => {
            let desk = BookingDesk::new(TaskHook::from_client(client));
            let companies = until_shutdown(shutdown, desk.list_companies()).await?;
            Ok(serde_json::to_value(companies)?)
        }
        Command::Users => {
            let desk = BookingDesk::new(TaskHook::from_client(client));
            let users = until_shutdown(shutdown, desk.list_users()).await?;
            Ok(serde_json::to_value(users)?)
        }
    }
}

async fn until_shutdown<T, F>(shutdown: &CancellationToken, operation: F) -> Result<T>
where
    F: Future<Output = airdesk_client::Result<T>>,
{
    tokio::select! {
        result = operation => Ok(result?),
        _ = shutdown.cancelled() => Err(anyhow!(airdesk_client::TaskError::Cancelled)),
    }
}

fn parse_handle(task_id: &str) -> Result<TaskHandle> {
    TaskHandle::new(task_id).context("task id must not be empty")
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

fn setup_signal_handlers(shutdown: CancellationToken) {
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install SIGINT handler");
            return;
        }
        info!("received SIGINT");
        shutdown_clone.cancel();
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let shutdown_clone = shutdown.clone();
        tokio::spawn(async move {
            match signal(SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                    info!("received SIGTERM");
                    shutdown_clone.cancel();
                }
                Err(err) => {
                    warn!(error = %err, "failed to install SIGTERM handler");
                }
            }
        });
    }
}
