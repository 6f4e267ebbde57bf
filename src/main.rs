use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use triggerdeck::config::{Config, LogFormat, LoggingConfig};
use triggerdeck::controller::TriggerError;
use triggerdeck::{Console, WorkflowKind};

#[derive(Parser)]
#[command(
    name = "triggerdeck",
    about = "Operator console for triggering webhook automation workflows",
    version,
    long_about = None
)]
struct Cli {
    /// Path to a TOML config file (default: $TRIGGERDECK_CONFIG, then ./triggerdeck.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the daemon (operator API over the trigger console)
    Serve {
        /// Bind address (overrides [server].bind)
        #[arg(long)]
        bind: Option<String>,
    },

    /// Trigger one workflow once and print the execution record
    Trigger {
        /// Workflow to trigger: main or google_sheets
        workflow: WorkflowKind,

        /// Webhook URL (overrides the configured endpoint)
        #[arg(long)]
        url: Option<String>,

        /// JSON output for machine parsing
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::resolve(cli.config.as_deref())?;
    init_tracing(&config.logging);

    match cli.command {
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            tracing::info!(%bind, "Starting TriggerDeck daemon");
            triggerdeck::serve(&bind, &config).await?;
        }
        Commands::Trigger {
            workflow,
            url,
            json,
        } => {
            let console = Console::from_config(&config.workflows).await?;
            if let Some(url) = url {
                console.set_endpoint(workflow, &url).await;
            }

            let record = match console.trigger(workflow).await {
                Ok(r) => r,
                Err(e @ TriggerError::EndpointNotConfigured { .. }) => {
                    anyhow::bail!("{} (pass --url or set it in the config file)", e)
                }
                Err(e) => return Err(e.into()),
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                println!("\n=== {} ===", workflow.display_name());
                println!("Status:   {}", record.status);
                println!("Started:  {}", record.started_at.format("%b %-d, %H:%M:%S"));
                println!("Duration: {}s", record.duration_secs);
                let summary = record.summary();
                if !summary.is_empty() {
                    println!("Details:  {}", summary);
                }
                println!();
            }

            if !record.is_success() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
