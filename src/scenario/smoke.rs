//! Smoke scenario: the server answers and the public pages render.

use std::time::Duration;

use tracing::info;

use crate::config::Config;
use crate::error::HarnessResult;
use crate::session::Context;
use crate::{check, nav, probe};

pub async fn run(ctx: &Context, cfg: &Config) -> HarnessResult<()> {
    probe::wait_for_server(&cfg.base_url, Duration::from_secs(cfg.timeouts.probe_secs)).await?;

    let wait = Duration::from_secs(cfg.timeouts.wait_secs);

    nav::goto(ctx, &cfg.home_url()).await?;
    nav::wait_network_idle(ctx, wait).await?;
    check::capture(ctx, &cfg.artifact_dir, "home").await?;
    info!("home page rendered");

    nav::goto(ctx, &cfg.login_url()).await?;
    nav::wait_network_idle(ctx, wait).await?;
    check::capture(ctx, &cfg.artifact_dir, "login").await?;
    info!("login page rendered");

    Ok(())
}
