//! Feed scenario: the home feed grid renders (in a dark-mode context).

use std::time::Duration;

use tracing::info;

use crate::config::Config;
use crate::error::HarnessResult;
use crate::locator::Locator;
use crate::session::Context;
use crate::{check, nav};

pub async fn run(ctx: &Context, cfg: &Config) -> HarnessResult<()> {
    let wait = Duration::from_secs(cfg.timeouts.wait_secs);

    nav::goto(ctx, &cfg.home_url()).await?;
    info!("waiting for the feed grid");
    nav::wait_visible(ctx, &Locator::css(&cfg.ui.feed_grid), wait).await?;
    check::capture(ctx, &cfg.artifact_dir, "feed_render").await?;
    info!("feed rendered");

    Ok(())
}
