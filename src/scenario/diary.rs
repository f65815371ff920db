//! Diary scenario: log in as a seeded user, open one of their diary
//! entries, and verify comment avatars load with anonymous crossorigin.

use std::path::Path;
use std::time::Duration;

use anyhow::anyhow;
use serde::Deserialize;
use tracing::{info, warn};

use crate::auth::{self, Credentials};
use crate::config::Config;
use crate::error::HarnessResult;
use crate::fixtures::Identity;
use crate::locator::Locator;
use crate::session::Context;
use crate::{check, nav};

const DEFAULT_IDENTITY_FILE: &str = "user_info.txt";

#[derive(Debug, Deserialize)]
struct ImageInfo {
    src: String,
    alt: String,
    crossorigin: Option<String>,
}

pub async fn run(ctx: &Context, cfg: &Config, identity_path: Option<&Path>) -> HarnessResult<()> {
    let wait = Duration::from_secs(cfg.timeouts.wait_secs);

    let path = identity_path.unwrap_or_else(|| Path::new(DEFAULT_IDENTITY_FILE));
    let identity = Identity::load(path).await?;
    info!(username = %identity.username, diary_id = %identity.diary_id, "identity loaded");

    let creds = Credentials {
        username: identity.username.clone(),
        password: cfg.auth.password.clone(),
    };
    auth::login(ctx, cfg, &creds).await?;

    let diary_url = cfg.diary_url(&identity.diary_id);
    info!(url = %diary_url, "opening diary entry");
    nav::goto(ctx, &diary_url).await?;
    check::expect_visible(ctx, &Locator::css("h1")).await?;

    // Comment avatars load asynchronously.
    nav::wait_visible(ctx, &Locator::attr("crossorigin", "anonymous"), wait).await?;
    check::capture(ctx, &cfg.artifact_dir, "diary_full").await?;

    const IMAGES_JS: &str = "JSON.stringify(Array.from(document.images).map((img) => \
                             ({src: img.src, alt: img.alt, crossorigin: img.getAttribute('crossorigin')})))";
    let value = ctx.eval_json(IMAGES_JS).await?;
    let images: Vec<ImageInfo> =
        serde_json::from_value(value).map_err(|e| anyhow!("image enumeration: {e}"))?;

    let mut anonymous = 0usize;
    for img in &images {
        info!(
            src = %img.src,
            alt = %img.alt,
            crossorigin = img.crossorigin.as_deref().unwrap_or("-"),
            "image"
        );
        if img.crossorigin.as_deref() == Some("anonymous") {
            anonymous += 1;
        }
    }
    if anonymous > 0 {
        info!(count = anonymous, "anonymous crossorigin present on images");
    } else {
        warn!("no image carries crossorigin=anonymous");
    }

    Ok(())
}
