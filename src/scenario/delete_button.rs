//! Delete-control ownership: hovering a comment you authored reveals
//! its delete control; hovering someone else's does not.

use std::time::Duration;

use tracing::info;

use crate::config::Config;
use crate::error::HarnessResult;
use crate::locator::{Locator, Role};
use crate::session::Context;
use crate::{action, check, nav};

pub async fn run(ctx: &Context, cfg: &Config) -> HarnessResult<()> {
    let wait = Duration::from_secs(cfg.timeouts.wait_secs);

    nav::goto(ctx, &cfg.url(&cfg.routes.verify_delete)).await?;
    nav::wait_visible(ctx, &Locator::text(&cfg.ui.verify_delete_heading), wait).await?;

    let own = Locator::css(&cfg.ui.comment_group).has_text(&cfg.ui.own_comment_text);
    let own_delete =
        Locator::role(Role::Button, &cfg.ui.delete_comment_label).within(own.clone());

    check::expect_visible(ctx, &own).await?;
    action::hover(ctx, &own, wait).await?;
    check::expect_visible(ctx, &own_delete).await?;
    info!("own comment reveals its delete control on hover");
    check::capture(ctx, &cfg.artifact_dir, "verification").await?;

    let other = Locator::css(&cfg.ui.comment_group).has_text(&cfg.ui.other_comment_text);
    let other_delete =
        Locator::role(Role::Button, &cfg.ui.delete_comment_label).within(other.clone());

    check::expect_visible(ctx, &other).await?;
    action::hover(ctx, &other, wait).await?;
    check::expect_hidden(ctx, &other_delete).await?;
    info!("foreign comment keeps its delete control hidden");

    Ok(())
}
