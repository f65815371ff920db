use std::path::PathBuf;

use clap::{Parser, Subcommand};

use vigil::cli;
use vigil::config::Config;

#[derive(Parser, Debug)]
#[command(name = "vigil", version, about = "Headless-browser UI verification harness")]
struct Cli {
    /// Path to configuration file (default: ./vigil.yaml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the base URL of the application under test
    #[arg(long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one verification scenario
    Run {
        /// Scenario name (see `vigil list`)
        scenario: String,
        /// Show the browser window instead of running headless
        #[arg(long)]
        headed: bool,
        /// Identity file for the diary scenario (`username,diary_id`)
        #[arg(long)]
        identity: Option<PathBuf>,
    },
    /// List available scenarios
    List,
    /// Wait for the application under test to answer
    Probe {
        /// Seconds to keep retrying
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    {
        use tracing_subscriber::layer::SubscriberExt;
        use tracing_subscriber::util::SubscriberInitExt;

        let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer();

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .init();
    }

    let cli = Cli::parse();
    let mut cfg = Config::resolve(cli.config.as_deref(), cli.base_url.as_deref()).await?;

    match cli.command {
        Command::Run {
            scenario,
            headed,
            identity,
        } => {
            if headed {
                cfg.headless = false;
            }
            cli::run_scenario(cfg, &scenario, identity).await
        }
        Command::List => {
            cli::list_scenarios();
            Ok(())
        }
        Command::Probe { timeout_secs } => cli::probe_server(&cfg, timeout_secs).await,
    }
}
