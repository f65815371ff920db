//! Guest restrictions: a view-only guest must be kept out of settings,
//! must not see profile editing, and must not be able to follow.
//!
//! These checks are reported as pass/fail lines rather than raised, so
//! one missing restriction does not hide the state of the others.

use std::time::Duration;

use tracing::{info, warn};

use crate::action;
use crate::auth;
use crate::check::{self, Visibility};
use crate::config::Config;
use crate::error::{HarnessError, HarnessResult};
use crate::locator::{Locator, Role};
use crate::nav::{self, UrlPattern};
use crate::session::Context;

/// Grace period for the settings redirect to land.
const REDIRECT_WAIT: Duration = Duration::from_secs(5);
/// Lazy thumbnails load as the feed scrolls.
const SCROLL_SETTLE: Duration = Duration::from_secs(3);

pub async fn run(ctx: &Context, cfg: &Config) -> HarnessResult<()> {
    let wait = Duration::from_secs(cfg.timeouts.wait_secs);

    auth::guest_login(ctx, cfg).await?;

    action::scroll_to_bottom(ctx).await?;
    tokio::time::sleep(SCROLL_SETTLE).await;
    check::capture(ctx, &cfg.artifact_dir, "guest_feed_thumbnails").await?;

    // Settings must redirect back home.
    info!("checking the settings route");
    nav::goto(ctx, &cfg.url(&cfg.routes.settings)).await?;
    match nav::wait_for_url(ctx, &UrlPattern::Is(cfg.home_url()), REDIRECT_WAIT).await {
        Ok(()) => info!("pass: settings redirected home"),
        Err(HarnessError::WaitTimeout { .. }) => {
            warn!(url = %ctx.url().await?, "fail: guest reached settings")
        }
        Err(e) => return Err(e),
    }

    // The profile page must not offer editing.
    info!("checking the profile route");
    nav::goto(ctx, &cfg.url(&cfg.routes.profile)).await?;
    nav::wait_network_idle(ctx, wait).await?;
    let edit = Locator::text(&cfg.ui.edit_profile_label);
    match check::visibility(ctx, &edit).await? {
        Visibility::Visible => warn!("fail: edit-profile control visible to guest"),
        _ => info!("pass: edit-profile control hidden"),
    }

    // A follow control, if rendered at all, must be disabled.
    info!("checking follow controls");
    nav::goto(ctx, &cfg.home_url()).await?;
    nav::wait_network_idle(ctx, wait).await?;
    let user_link = Locator::css(&cfg.ui.user_link);
    match check::visibility(ctx, &user_link).await? {
        Visibility::Visible => {
            action::click(ctx, &user_link, wait).await?;
            nav::wait_network_idle(ctx, wait).await?;
            let follow = Locator::role(Role::Button, &cfg.ui.follow_label);
            match check::visibility(ctx, &follow).await? {
                Visibility::Visible => {
                    if check::is_disabled(ctx, &follow).await? {
                        info!("pass: follow control disabled");
                    } else {
                        warn!("fail: follow control enabled for guest");
                    }
                }
                _ => info!("follow control not present (already following or own profile)"),
            }
        }
        _ => info!("no user links in the feed; skipping the follow check"),
    }

    Ok(())
}
