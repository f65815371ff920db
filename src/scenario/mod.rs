//! Scenario registry and runner.
//!
//! Each scenario is a flat, ordered sequence of helper calls with no
//! branching beyond the explicitly modeled alternatives (signup
//! auto-login vs. explicit login; guest features present vs. absent).
//! The runner owns the session lifecycle: acquire, run, capture a
//! diagnostic screenshot on any failure, close exactly once, re-raise.
//! There is no scenario-level retry.

pub mod delete_button;
pub mod diary;
pub mod feed;
pub mod guest;
pub mod profile_dark;
pub mod smoke;
pub mod spoiler;
pub mod upload;

use std::path::Path;

use tracing::{info, warn};

use crate::check;
use crate::config::{ColorScheme, Config, Viewport};
use crate::error::HarnessResult;
use crate::session::{Context, Session, SessionOptions};

/// The feature scenarios the harness can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Smoke,
    Feed,
    DeleteButton,
    Spoiler,
    Upload,
    Guest,
    ProfileDark,
    Diary,
}

impl Kind {
    pub const ALL: [Kind; 8] = [
        Kind::Smoke,
        Kind::Feed,
        Kind::DeleteButton,
        Kind::Spoiler,
        Kind::Upload,
        Kind::Guest,
        Kind::ProfileDark,
        Kind::Diary,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Kind::Smoke => "smoke",
            Kind::Feed => "feed",
            Kind::DeleteButton => "delete-button",
            Kind::Spoiler => "spoiler",
            Kind::Upload => "upload",
            Kind::Guest => "guest",
            Kind::ProfileDark => "profile-dark",
            Kind::Diary => "diary",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Kind::Smoke => "server reachable, public pages render",
            Kind::Feed => "feed grid renders in dark mode",
            Kind::DeleteButton => "hover reveals the delete control only on own comments",
            Kind::Spoiler => "spoiler upload warns in the feed and confirms before reveal",
            Kind::Upload => "image upload reaches the processing state",
            Kind::Guest => "guest sessions are view-only",
            Kind::ProfileDark => "edit-profile dialog renders in dark mode",
            Kind::Diary => "diary comments load avatars with anonymous crossorigin",
        }
    }

    pub fn from_name(name: &str) -> Option<Kind> {
        Kind::ALL.iter().copied().find(|k| k.name() == name)
    }

    /// Session settings for this scenario. Most inherit the config;
    /// the dark-mode scenarios emulate a dark color scheme and the
    /// diary scenario uses a taller viewport so comments are on screen.
    fn options(&self, cfg: &Config) -> SessionOptions {
        let base = SessionOptions::from_config(cfg);
        match self {
            Kind::Feed | Kind::Guest => base.with_color_scheme(ColorScheme::Dark),
            Kind::Diary => base.with_viewport(Viewport {
                width: 1280,
                height: 800,
            }),
            _ => base,
        }
    }

    fn failure_artifact(&self) -> String {
        format!("{}_failure", self.name().replace('-', "_"))
    }
}

/// Run one scenario end to end.
///
/// The session is released exactly once on every exit path; any error
/// first triggers a best-effort diagnostic screenshot, then propagates
/// so the process exits nonzero.
pub async fn run(kind: Kind, cfg: &Config, identity_path: Option<&Path>) -> HarnessResult<()> {
    info!(scenario = kind.name(), "starting scenario");
    let session = Session::acquire(kind.options(cfg)).await?;
    let ctx = match session.context().await {
        Ok(ctx) => ctx,
        Err(e) => {
            session.close().await;
            return Err(e);
        }
    };

    let result = dispatch(kind, &ctx, cfg, identity_path).await;
    match &result {
        Ok(()) => info!(scenario = kind.name(), "scenario passed"),
        Err(err) => {
            warn!(scenario = kind.name(), error = %err, "scenario failed");
            if let Err(capture_err) =
                check::capture(&ctx, &cfg.artifact_dir, &kind.failure_artifact()).await
            {
                warn!(error = %capture_err, "diagnostic screenshot failed");
            }
        }
    }

    session.close().await;
    result
}

async fn dispatch(
    kind: Kind,
    ctx: &Context,
    cfg: &Config,
    identity_path: Option<&Path>,
) -> HarnessResult<()> {
    match kind {
        Kind::Smoke => smoke::run(ctx, cfg).await,
        Kind::Feed => feed::run(ctx, cfg).await,
        Kind::DeleteButton => delete_button::run(ctx, cfg).await,
        Kind::Spoiler => spoiler::run(ctx, cfg).await,
        Kind::Upload => upload::run(ctx, cfg).await,
        Kind::Guest => guest::run(ctx, cfg).await,
        Kind::ProfileDark => profile_dark::run(ctx, cfg).await,
        Kind::Diary => diary::run(ctx, cfg, identity_path).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for kind in Kind::ALL {
            assert_eq!(Kind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(Kind::from_name("nope"), None);
    }

    #[test]
    fn failure_artifacts_are_distinct_and_filename_safe() {
        let mut names: Vec<String> = Kind::ALL.iter().map(|k| k.failure_artifact()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), Kind::ALL.len());
        assert!(names.iter().all(|n| !n.contains('-')));
    }

    #[test]
    fn dark_scenarios_override_color_scheme() {
        let cfg = Config::default();
        assert_eq!(
            Kind::Feed.options(&cfg).color_scheme,
            ColorScheme::Dark
        );
        assert_eq!(
            Kind::Smoke.options(&cfg).color_scheme,
            ColorScheme::Light
        );
        assert_eq!(Kind::Diary.options(&cfg).viewport.height, 800);
    }
}
