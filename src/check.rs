//! Assertions and screenshot capture.
//!
//! Expectations evaluate a locator probe inside the page and either
//! return normally or produce [`HarnessError::Assertion`] naming the
//! locator and the expected vs. observed state. "Hidden" deliberately
//! covers both an element that is absent from the DOM and one that is
//! present but invisible; [`Visibility`] keeps the distinction
//! observable for diagnostics.

use std::path::{Path, PathBuf};

use anyhow::anyhow;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use serde::Deserialize;
use tracing::info;

use crate::error::{HarnessError, HarnessResult};
use crate::locator::Locator;
use crate::session::Context;

/// Tri-state visibility of a locator's match set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// At least one match is rendered and has a non-empty box.
    Visible,
    /// Matches exist in the DOM but none is visible.
    Hidden,
    /// No match in the DOM at all.
    Absent,
}

impl Visibility {
    /// Both [`Visibility::Hidden`] and [`Visibility::Absent`] satisfy
    /// "hidden" for assertion purposes.
    pub fn is_hidden(&self) -> bool {
        !matches!(self, Visibility::Visible)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Probe {
    pub found: usize,
    pub visible: usize,
    pub disabled: Option<bool>,
    pub checked: Option<bool>,
}

pub(crate) async fn probe(ctx: &Context, locator: &Locator) -> HarnessResult<Probe> {
    let value = ctx.eval_json(&locator.probe_js()).await?;
    let probe: Probe = serde_json::from_value(value)
        .map_err(|e| anyhow!("malformed locator probe for {locator}: {e}"))?;
    Ok(probe)
}

/// Observe the visibility state of `locator`.
pub async fn visibility(ctx: &Context, locator: &Locator) -> HarnessResult<Visibility> {
    let probe = probe(ctx, locator).await?;
    Ok(if probe.visible > 0 {
        Visibility::Visible
    } else if probe.found > 0 {
        Visibility::Hidden
    } else {
        Visibility::Absent
    })
}

fn observed_str(vis: Visibility) -> &'static str {
    match vis {
        Visibility::Visible => "visible",
        Visibility::Hidden => "hidden (present in DOM)",
        Visibility::Absent => "absent from DOM",
    }
}

/// Assert that at least one match of `locator` is visible.
pub async fn expect_visible(ctx: &Context, locator: &Locator) -> HarnessResult<()> {
    let vis = visibility(ctx, locator).await?;
    if vis == Visibility::Visible {
        return Ok(());
    }
    Err(HarnessError::Assertion {
        locator: locator.to_string(),
        expected: "visible".into(),
        observed: observed_str(vis).into(),
    })
}

/// Assert that no match of `locator` is visible. Passes when the
/// element is missing entirely as well as when it is rendered invisible.
pub async fn expect_hidden(ctx: &Context, locator: &Locator) -> HarnessResult<()> {
    let vis = visibility(ctx, locator).await?;
    if vis.is_hidden() {
        return Ok(());
    }
    Err(HarnessError::Assertion {
        locator: locator.to_string(),
        expected: "hidden".into(),
        observed: "visible".into(),
    })
}

/// Assert an attribute value on the preferred match of `locator`.
pub async fn expect_attribute(
    ctx: &Context,
    locator: &Locator,
    name: &str,
    value: &str,
) -> HarnessResult<()> {
    #[derive(Deserialize)]
    struct AttrProbe {
        found: usize,
        value: Option<String>,
    }
    let raw = ctx.eval_json(&locator.attribute_js(name)).await?;
    let probe: AttrProbe = serde_json::from_value(raw)
        .map_err(|e| anyhow!("malformed attribute probe for {locator}: {e}"))?;

    let expected = format!("{name}=\"{value}\"");
    if probe.found == 0 {
        return Err(HarnessError::Assertion {
            locator: locator.to_string(),
            expected,
            observed: "absent from DOM".into(),
        });
    }
    match probe.value {
        Some(actual) if actual == value => Ok(()),
        Some(actual) => Err(HarnessError::Assertion {
            locator: locator.to_string(),
            expected,
            observed: format!("{name}=\"{actual}\""),
        }),
        None => Err(HarnessError::Assertion {
            locator: locator.to_string(),
            expected,
            observed: format!("attribute {name} missing"),
        }),
    }
}

/// Whether the preferred match is disabled (property or `aria-disabled`).
pub async fn is_disabled(ctx: &Context, locator: &Locator) -> HarnessResult<bool> {
    let probe = probe(ctx, locator).await?;
    if probe.found == 0 {
        return Err(HarnessError::Assertion {
            locator: locator.to_string(),
            expected: "present".into(),
            observed: "absent from DOM".into(),
        });
    }
    Ok(probe.disabled.unwrap_or(false))
}

/// Whether the preferred match is a checked checkbox.
pub async fn is_checked(ctx: &Context, locator: &Locator) -> HarnessResult<bool> {
    let probe = probe(ctx, locator).await?;
    if probe.found == 0 {
        return Err(HarnessError::Assertion {
            locator: locator.to_string(),
            expected: "present".into(),
            observed: "absent from DOM".into(),
        });
    }
    Ok(probe.checked.unwrap_or(false))
}

/// Write a viewport screenshot to `<dir>/<name>.png`, creating the
/// directory if needed. Artifacts are unversioned; an existing file at
/// the same path is overwritten.
pub async fn capture(ctx: &Context, dir: &Path, name: &str) -> HarnessResult<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| anyhow!("creating artifact dir {}: {e}", dir.display()))?;
    let bytes = ctx
        .page()
        .screenshot(
            ScreenshotParams::builder()
                .format(CaptureScreenshotFormat::Png)
                .full_page(false)
                .build(),
        )
        .await
        .map_err(|e| anyhow!("screenshot failed: {e}"))?;
    let path = dir.join(format!("{name}.png"));
    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|e| anyhow!("writing artifact {}: {e}", path.display()))?;
    info!(artifact = %path.display(), bytes = bytes.len(), "screenshot captured");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_covers_absent_and_invisible() {
        assert!(Visibility::Hidden.is_hidden());
        assert!(Visibility::Absent.is_hidden());
        assert!(!Visibility::Visible.is_hidden());
    }

    #[test]
    fn probe_deserializes_null_fields() {
        let probe: Probe = serde_json::from_str(
            r#"{"found": 0, "visible": 0, "disabled": null, "checked": null}"#,
        )
        .unwrap();
        assert_eq!(probe.found, 0);
        assert!(probe.disabled.is_none());
    }
}
