//! CLI command implementations.

use std::path::PathBuf;
use std::time::Duration;

use crate::config::Config;
use crate::scenario::{self, Kind};

/// Run one scenario by name. Unknown names list what is available.
pub async fn run_scenario(
    cfg: Config,
    name: &str,
    identity: Option<PathBuf>,
) -> anyhow::Result<()> {
    let Some(kind) = Kind::from_name(name) else {
        let known = Kind::ALL
            .iter()
            .map(|k| k.name())
            .collect::<Vec<_>>()
            .join(", ");
        anyhow::bail!("unknown scenario '{name}'. Available: {known}");
    };
    scenario::run(kind, &cfg, identity.as_deref()).await?;
    println!("scenario '{}' passed", kind.name());
    Ok(())
}

/// Print the scenario table.
pub fn list_scenarios() {
    for kind in Kind::ALL {
        println!("{:<14} {}", kind.name(), kind.description());
    }
}

/// Wait for the application under test to answer.
pub async fn probe_server(cfg: &Config, timeout_secs: u64) -> anyhow::Result<()> {
    crate::probe::wait_for_server(&cfg.base_url, Duration::from_secs(timeout_secs)).await?;
    println!("server at {} is up", cfg.base_url);
    Ok(())
}
