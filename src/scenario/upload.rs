//! Upload flow: selecting an image opens the crop interface, sharing
//! shows the processing state.

use std::time::Duration;

use tracing::info;

use crate::auth::{self, Credentials};
use crate::config::Config;
use crate::error::HarnessResult;
use crate::fixtures::{self, WHITE_PIXEL_PNG};
use crate::locator::{Locator, Role};
use crate::session::Context;
use crate::{action, check, nav};

pub async fn run(ctx: &Context, cfg: &Config) -> HarnessResult<()> {
    let wait = Duration::from_secs(cfg.timeouts.wait_secs);

    let creds = Credentials::generate(&cfg.auth);
    auth::ensure_authenticated(ctx, cfg, &creds).await?;

    let image = fixtures::write_png(&cfg.artifact_dir, "dummy.png", WHITE_PIXEL_PNG).await?;

    nav::goto(ctx, &cfg.url(&cfg.routes.upload)).await?;
    action::set_file_input(ctx, &Locator::css(&cfg.ui.file_input), &image, wait).await?;
    info!("image selected");

    action::click(
        ctx,
        &Locator::role(Role::Button, &cfg.ui.crop_confirm_label),
        wait,
    )
    .await?;
    info!("crop confirmed");

    nav::wait_visible(ctx, &Locator::attr("alt", "Preview 0"), wait).await?;
    info!("preview rendered");

    action::fill(ctx, &Locator::css(&cfg.ui.comment_field), "Test post", wait).await?;
    action::click(ctx, &Locator::role(Role::Button, &cfg.ui.share_label), wait).await?;

    nav::wait_visible(ctx, &Locator::text(&cfg.ui.processing_text), wait).await?;
    info!("share entered the processing state");
    check::capture(ctx, &cfg.artifact_dir, "upload_loading_state").await?;

    Ok(())
}
