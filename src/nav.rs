//! Navigation and wait strategies.
//!
//! Three wait strategies are available, chosen per scenario step: a URL
//! pattern, an element becoming visible, or network idle. Each polls at
//! a fixed interval against an explicit deadline; exhausting the
//! deadline yields [`HarnessError::WaitTimeout`] carrying the condition
//! that was never satisfied.

use std::fmt;
use std::time::Duration;

use anyhow::anyhow;
use serde::Deserialize;
use tokio::time::Instant;
use tracing::debug;

use crate::check::{self, Visibility};
use crate::error::{HarnessError, HarnessResult};
use crate::locator::Locator;
use crate::session::Context;

const POLL_INTERVAL: Duration = Duration::from_millis(100);
/// How long the resource count must stay flat to call the network idle.
const NETWORK_QUIET: Duration = Duration::from_millis(500);

/// Pattern a page URL is waited against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlPattern {
    /// Equality, insensitive to a trailing slash.
    Is(String),
    Prefix(String),
    Contains(String),
}

impl UrlPattern {
    pub fn matches(&self, url: &str) -> bool {
        match self {
            UrlPattern::Is(want) => url.trim_end_matches('/') == want.trim_end_matches('/'),
            UrlPattern::Prefix(prefix) => url.starts_with(prefix.as_str()),
            UrlPattern::Contains(needle) => url.contains(needle.as_str()),
        }
    }
}

impl fmt::Display for UrlPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrlPattern::Is(want) => write!(f, "url is \"{want}\""),
            UrlPattern::Prefix(prefix) => write!(f, "url starts with \"{prefix}\""),
            UrlPattern::Contains(needle) => write!(f, "url contains \"{needle}\""),
        }
    }
}

/// Navigate the context to `url`.
pub async fn goto(ctx: &Context, url: &str) -> HarnessResult<()> {
    debug!(%url, "navigating");
    ctx.page()
        .goto(url)
        .await
        .map_err(|e| anyhow!("navigation to {url} failed: {e}"))?;
    Ok(())
}

/// Wait until the page URL matches `pattern`.
pub async fn wait_for_url(
    ctx: &Context,
    pattern: &UrlPattern,
    timeout: Duration,
) -> HarnessResult<()> {
    wait_for_any_url(ctx, std::slice::from_ref(pattern), timeout)
        .await
        .map(|_| ())
}

/// Wait until the page URL matches one of `patterns`; returns the index
/// of the first pattern that matched. This is the race the auth helper
/// runs between the home and login routes.
pub async fn wait_for_any_url(
    ctx: &Context,
    patterns: &[UrlPattern],
    timeout: Duration,
) -> HarnessResult<usize> {
    let deadline = Instant::now() + timeout;
    loop {
        let url = ctx.url().await?;
        if let Some(idx) = patterns.iter().position(|p| p.matches(&url)) {
            return Ok(idx);
        }
        if Instant::now() >= deadline {
            let condition = patterns
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(" or ");
            return Err(HarnessError::WaitTimeout { condition });
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

/// Wait until at least one match of `locator` is visible.
pub async fn wait_visible(
    ctx: &Context,
    locator: &Locator,
    timeout: Duration,
) -> HarnessResult<()> {
    let deadline = Instant::now() + timeout;
    loop {
        if check::visibility(ctx, locator).await? == Visibility::Visible {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(HarnessError::WaitTimeout {
                condition: format!("{locator} to become visible"),
            });
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

/// Wait until no match of `locator` is visible (gone or invisible).
pub async fn wait_hidden(
    ctx: &Context,
    locator: &Locator,
    timeout: Duration,
) -> HarnessResult<()> {
    let deadline = Instant::now() + timeout;
    loop {
        if check::visibility(ctx, locator).await?.is_hidden() {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(HarnessError::WaitTimeout {
                condition: format!("{locator} to disappear"),
            });
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

/// Wait until `locator` has at least one match in the DOM, visible or
/// not. File inputs are commonly rendered invisible, so interactions on
/// them wait for presence rather than visibility.
pub async fn wait_present(
    ctx: &Context,
    locator: &Locator,
    timeout: Duration,
) -> HarnessResult<()> {
    let deadline = Instant::now() + timeout;
    loop {
        if check::visibility(ctx, locator).await? != Visibility::Absent {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(HarnessError::WaitTimeout {
                condition: format!("{locator} to be present"),
            });
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

/// Wait until the document has loaded and the resource count has been
/// flat for a quiet period.
pub async fn wait_network_idle(ctx: &Context, timeout: Duration) -> HarnessResult<()> {
    #[derive(Deserialize)]
    struct NetState {
        ready: bool,
        resources: u64,
    }

    const STATE_JS: &str = "JSON.stringify({ready: document.readyState === 'complete', \
                            resources: performance.getEntriesByType('resource').length})";

    let deadline = Instant::now() + timeout;
    let mut last_count: Option<u64> = None;
    let mut last_change = Instant::now();
    loop {
        let value = ctx.eval_json(STATE_JS).await?;
        let state: NetState =
            serde_json::from_value(value).map_err(|e| anyhow!("network idle probe: {e}"))?;

        if last_count != Some(state.resources) {
            last_count = Some(state.resources);
            last_change = Instant::now();
        }
        if state.ready && last_change.elapsed() >= NETWORK_QUIET {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(HarnessError::WaitTimeout {
                condition: "network idle".into(),
            });
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_pattern_ignores_trailing_slash() {
        let p = UrlPattern::Is("http://localhost:3000/".into());
        assert!(p.matches("http://localhost:3000"));
        assert!(p.matches("http://localhost:3000/"));
        assert!(!p.matches("http://localhost:3000/login"));
    }

    #[test]
    fn contains_pattern_matches_login_redirect() {
        let p = UrlPattern::Contains("/login".into());
        assert!(p.matches("http://localhost:3000/login"));
        assert!(p.matches("http://localhost:3000/login?next=%2F"));
        assert!(!p.matches("http://localhost:3000/"));
    }

    #[test]
    fn prefix_pattern() {
        let p = UrlPattern::Prefix("http://localhost:3000/diary/".into());
        assert!(p.matches("http://localhost:3000/diary/42"));
        assert!(!p.matches("http://localhost:3000/upload"));
    }

    #[test]
    fn display_names_the_condition() {
        assert_eq!(
            UrlPattern::Contains("/login".into()).to_string(),
            "url contains \"/login\""
        );
    }
}
