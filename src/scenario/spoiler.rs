//! Spoiler flow: upload an image flagged as a spoiler, share it, and
//! verify the feed warns before revealing the content.

use std::time::Duration;

use tracing::{info, warn};

use crate::auth::{self, Credentials};
use crate::config::Config;
use crate::error::HarnessResult;
use crate::fixtures::{self, RED_SQUARE_PNG};
use crate::locator::{Locator, Role};
use crate::nav::UrlPattern;
use crate::session::Context;
use crate::{action, check, nav};

pub async fn run(ctx: &Context, cfg: &Config) -> HarnessResult<()> {
    let wait = Duration::from_secs(cfg.timeouts.wait_secs);

    let creds = Credentials::generate(&cfg.auth);
    auth::ensure_authenticated(ctx, cfg, &creds).await?;

    nav::goto(ctx, &cfg.url(&cfg.routes.upload)).await?;
    let spoiler_toggle = Locator::css(&cfg.ui.spoiler_checkbox);
    check::expect_visible(ctx, &spoiler_toggle).await?;
    info!("spoiler toggle present on the upload form");
    check::capture(ctx, &cfg.artifact_dir, "upload_page").await?;

    let image = fixtures::write_png(&cfg.artifact_dir, "test.png", RED_SQUARE_PNG).await?;
    action::set_file_input(ctx, &Locator::css(&cfg.ui.file_input), &image, wait).await?;

    let crop_slider = Locator::css(&cfg.ui.crop_slider);
    nav::wait_visible(ctx, &crop_slider, wait).await?;
    info!("crop interface opened");
    action::click(
        ctx,
        &Locator::role(Role::Button, &cfg.ui.crop_confirm_label),
        wait,
    )
    .await?;
    nav::wait_hidden(ctx, &crop_slider, wait).await?;

    action::set_checked(ctx, &spoiler_toggle, true, wait).await?;
    action::fill(
        ctx,
        &Locator::css(&cfg.ui.comment_field),
        "This is a spoiler post",
        wait,
    )
    .await?;

    info!("sharing the spoiler post");
    action::click(ctx, &Locator::role(Role::Button, &cfg.ui.share_label), wait).await?;
    nav::wait_for_url(ctx, &UrlPattern::Is(cfg.home_url()), wait).await?;

    nav::wait_visible(ctx, &Locator::css(&cfg.ui.feed_grid), wait).await?;
    check::expect_visible(ctx, &Locator::css(&cfg.ui.spoiler_indicator)).await?;
    info!("spoiler warning indicator visible in the feed");
    check::capture(ctx, &cfg.artifact_dir, "feed_spoiler").await?;

    info!("opening the spoiler entry");
    action::click(
        ctx,
        &Locator::css(format!("{} > div", cfg.ui.feed_grid)),
        wait,
    )
    .await?;
    nav::wait_visible(ctx, &Locator::css(&cfg.ui.modal_overlay), wait).await?;
    info!("entry modal opened");

    let dialogs = ctx.dialog_messages();
    match dialogs.first() {
        Some(message) => info!(%message, "confirmation dialog captured"),
        None => warn!("confirmation dialog was not captured"),
    }
    check::capture(ctx, &cfg.artifact_dir, "modal_revealed").await?;

    Ok(())
}
