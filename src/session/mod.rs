//! Browser session lifecycle.
//!
//! A [`Session`] owns one headless Chromium process launched with a
//! throwaway profile directory, plus the CDP handler task that pumps
//! protocol messages. [`Context`]s are isolated pages inside the session
//! with viewport and color-scheme emulation applied and a dialog watcher
//! attached. Closing the session terminates the browser exactly once;
//! dropping an unclosed session still kills the child process via the
//! driver, so a panicking scenario cannot leak a browser.

pub mod dialog;

use std::path::PathBuf;

use anyhow::anyhow;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::{
    MediaFeature, SetDeviceMetricsOverrideParams, SetEmulatedMediaParams,
};
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::{ColorScheme, Config, Viewport};
use crate::error::{HarnessError, HarnessResult};
use crate::session::dialog::DialogWatch;

/// Recognized session settings.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub headless: bool,
    pub viewport: Viewport,
    pub color_scheme: ColorScheme,
}

impl SessionOptions {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            headless: cfg.headless,
            viewport: cfg.viewport,
            color_scheme: cfg.color_scheme,
        }
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn with_color_scheme(mut self, scheme: ColorScheme) -> Self {
        self.color_scheme = scheme;
        self
    }
}

/// A running browser process.
pub struct Session {
    browser: Browser,
    handler_task: JoinHandle<()>,
    profile_dir: PathBuf,
    options: SessionOptions,
}

impl Session {
    /// Launch the browser. Failure here is fatal for the scenario — no
    /// retry is attempted.
    pub async fn acquire(options: SessionOptions) -> HarnessResult<Session> {
        let profile_dir =
            std::env::temp_dir().join(format!("vigil-profile-{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&profile_dir)
            .await
            .map_err(|e| HarnessError::Launch(format!("profile dir: {e}")))?;

        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .window_size(options.viewport.width, options.viewport.height)
            .user_data_dir(&profile_dir);
        if !options.headless {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(HarnessError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| HarnessError::Launch(e.to_string()))?;

        // Pump CDP messages until the connection closes.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    debug!("cdp handler loop ended");
                    break;
                }
            }
        });

        debug!(profile = %profile_dir.display(), "browser launched");
        Ok(Session {
            browser,
            handler_task,
            profile_dir,
            options,
        })
    }

    /// Create an isolated browsing context: a fresh page with the
    /// session's viewport and color scheme emulated and a dialog watcher
    /// attached. Cookie/storage isolation comes from the session's
    /// throwaway profile.
    pub async fn context(&self) -> HarnessResult<Context> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| anyhow!("failed to create page: {e}"))?;

        let vp = self.options.viewport;
        page.execute(
            SetDeviceMetricsOverrideParams::builder()
                .width(vp.width as i64)
                .height(vp.height as i64)
                .device_scale_factor(1.0)
                .mobile(false)
                .build()
                .map_err(|e| anyhow!("viewport override: {e}"))?,
        )
        .await
        .map_err(|e| anyhow!("viewport override: {e}"))?;

        if self.options.color_scheme == ColorScheme::Dark {
            let feature = MediaFeature::builder()
                .name("prefers-color-scheme")
                .value(self.options.color_scheme.as_str())
                .build()
                .map_err(|e| anyhow!("media feature: {e}"))?;
            page.execute(SetEmulatedMediaParams::builder().features(vec![feature]).build())
                .await
                .map_err(|e| anyhow!("color scheme emulation: {e}"))?;
        }

        let dialogs = DialogWatch::attach(&page).await?;
        Ok(Context { page, dialogs })
    }

    /// Terminate the browser. Consuming `self` makes release-once a
    /// compile-time property; errors are logged, not propagated, so the
    /// scenario's own outcome survives teardown.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!(error = %e, "browser close failed");
        }
        self.handler_task.abort();
        if let Err(e) = tokio::fs::remove_dir_all(&self.profile_dir).await {
            debug!(error = %e, "profile dir cleanup failed");
        }
    }
}

/// An isolated cookie/storage scope within a [`Session`].
pub struct Context {
    page: Page,
    dialogs: DialogWatch,
}

impl Context {
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Current page URL (empty string while nothing is loaded).
    pub async fn url(&self) -> HarnessResult<String> {
        let url = self
            .page
            .url()
            .await
            .map_err(|e| anyhow!("reading page url: {e}"))?;
        Ok(url.unwrap_or_default())
    }

    /// Evaluate a JS expression that returns `JSON.stringify(...)` and
    /// parse the payload.
    pub async fn eval_json(&self, js: &str) -> HarnessResult<serde_json::Value> {
        let raw: String = self
            .page
            .evaluate(js)
            .await
            .map_err(|e| anyhow!("page eval failed: {e}"))?
            .into_value()
            .map_err(|e| anyhow!("page eval returned a non-string: {e}"))?;
        let value = serde_json::from_str(&raw)
            .map_err(|e| anyhow!("page eval returned invalid JSON ({raw}): {e}"))?;
        Ok(value)
    }

    /// Fire-and-forget JS (scrolling, cleanup).
    pub async fn eval(&self, js: &str) -> HarnessResult<()> {
        self.page
            .evaluate(js)
            .await
            .map_err(|e| anyhow!("page eval failed: {e}"))?;
        Ok(())
    }

    /// Messages from native dialogs captured (and auto-accepted) so far.
    pub fn dialog_messages(&self) -> Vec<String> {
        self.dialogs.messages()
    }
}
