//! Edit-profile dialog in dark mode: enable the app's dark theme from
//! settings, then open the profile editor and record how it renders.

use std::time::Duration;

use tracing::info;

use crate::auth::{self, Credentials};
use crate::config::Config;
use crate::error::HarnessResult;
use crate::locator::{Locator, Role};
use crate::session::Context;
use crate::{action, check, nav};

/// Theme switches apply via a class toggle; give the repaint a moment.
const THEME_SETTLE: Duration = Duration::from_secs(1);

pub async fn run(ctx: &Context, cfg: &Config) -> HarnessResult<()> {
    let wait = Duration::from_secs(cfg.timeouts.wait_secs);

    let creds = Credentials::generate(&cfg.auth);
    auth::ensure_authenticated(ctx, cfg, &creds).await?;

    info!("enabling dark mode");
    nav::goto(ctx, &cfg.url(&cfg.routes.settings)).await?;
    action::click(
        ctx,
        &Locator::role(Role::Button, &cfg.ui.dark_mode_label),
        wait,
    )
    .await?;
    tokio::time::sleep(THEME_SETTLE).await;

    info!("opening the profile editor");
    nav::goto(ctx, &cfg.url(&cfg.routes.profile)).await?;
    action::click(ctx, &Locator::text(&cfg.ui.edit_profile_label), wait).await?;

    nav::wait_visible(
        ctx,
        &Locator::css("h2").has_text(&cfg.ui.edit_profile_label),
        wait,
    )
    .await?;
    check::capture(ctx, &cfg.artifact_dir, "edit_profile_dark_after").await?;
    info!("profile editor rendered in dark mode");

    Ok(())
}
