//! Element interactions.
//!
//! Interactions resolve a [`Locator`] to a live element handle by
//! tagging the match inside the page, then act through real CDP input
//! where it matters (hover must trigger `:hover` styling, so it is a
//! dispatched mouse move, not a synthetic JS event).

use std::path::Path;
use std::time::Duration;

use anyhow::anyhow;
use chromiumoxide::cdp::browser_protocol::dom::SetFileInputFilesParams;
use chromiumoxide::cdp::browser_protocol::input::{
    DispatchMouseEventParams, DispatchMouseEventType,
};
use chromiumoxide::element::Element;
use serde::Deserialize;
use tracing::debug;

use crate::error::{HarnessError, HarnessResult};
use crate::locator::{js_str, Locator, HIT_ATTR};
use crate::nav;
use crate::session::Context;

/// Settle pause after an interaction that may trigger rendering.
const SETTLE: Duration = Duration::from_millis(100);

/// Tag the preferred match of `locator` and return its element handle.
async fn resolve(ctx: &Context, locator: &Locator) -> HarnessResult<Element> {
    let nonce = uuid::Uuid::new_v4().simple().to_string();
    let tagged = ctx.eval_json(&locator.tag_js(&nonce)).await?;
    let found = tagged
        .get("found")
        .and_then(|v| v.as_u64())
        .unwrap_or(0);
    if found == 0 {
        return Err(HarnessError::Assertion {
            locator: locator.to_string(),
            expected: "at least one match".into(),
            observed: "absent from DOM".into(),
        });
    }
    let element = ctx
        .page()
        .find_element(Locator::hit_selector(&nonce))
        .await
        .map_err(|e| anyhow!("resolving tagged element for {locator}: {e}"))?;
    // Drop the tag so later selector checks see a pristine DOM.
    let cleanup = format!(
        "(() => {{ const el = document.querySelector({sel}); if (el) el.removeAttribute('{HIT_ATTR}'); }})()",
        sel = js_str(&Locator::hit_selector(&nonce)),
    );
    ctx.eval(&cleanup).await?;
    Ok(element)
}

/// Click the first visible match of `locator`.
pub async fn click(ctx: &Context, locator: &Locator, timeout: Duration) -> HarnessResult<()> {
    nav::wait_visible(ctx, locator, timeout).await?;
    let element = resolve(ctx, locator).await?;
    element
        .click()
        .await
        .map_err(|e| anyhow!("click on {locator} failed: {e}"))?;
    debug!(%locator, "clicked");
    tokio::time::sleep(SETTLE).await;
    Ok(())
}

/// Focus the first visible match of `locator` and type `text` into it.
pub async fn fill(
    ctx: &Context,
    locator: &Locator,
    text: &str,
    timeout: Duration,
) -> HarnessResult<()> {
    nav::wait_visible(ctx, locator, timeout).await?;
    let element = resolve(ctx, locator).await?;
    element
        .click()
        .await
        .map_err(|e| anyhow!("focusing {locator} failed: {e}"))?;
    element
        .type_str(text)
        .await
        .map_err(|e| anyhow!("typing into {locator} failed: {e}"))?;
    debug!(%locator, chars = text.len(), "filled");
    Ok(())
}

/// Move the mouse over the first visible match of `locator`.
///
/// Dispatched as a CDP mouse move so `:hover` styling applies — the
/// delete-button scenario depends on hover-revealed controls.
pub async fn hover(ctx: &Context, locator: &Locator, timeout: Duration) -> HarnessResult<()> {
    nav::wait_visible(ctx, locator, timeout).await?;

    #[derive(Deserialize)]
    struct HoverPoint {
        ok: bool,
        x: Option<f64>,
        y: Option<f64>,
    }

    let nonce = uuid::Uuid::new_v4().simple().to_string();
    let tagged = ctx.eval_json(&locator.tag_js(&nonce)).await?;
    if tagged.get("found").and_then(|v| v.as_u64()).unwrap_or(0) == 0 {
        return Err(HarnessError::Assertion {
            locator: locator.to_string(),
            expected: "at least one match".into(),
            observed: "absent from DOM".into(),
        });
    }

    let center_js = format!(
        r#"(() => {{
  const el = document.querySelector({sel});
  if (!el) return JSON.stringify({{ok: false}});
  el.scrollIntoView({{block: 'center', inline: 'center'}});
  const rect = el.getBoundingClientRect();
  el.removeAttribute('{HIT_ATTR}');
  return JSON.stringify({{ok: true, x: rect.x + rect.width / 2, y: rect.y + rect.height / 2}});
}})()"#,
        sel = js_str(&Locator::hit_selector(&nonce)),
    );
    let point: HoverPoint = serde_json::from_value(ctx.eval_json(&center_js).await?)
        .map_err(|e| anyhow!("hover point probe for {locator}: {e}"))?;
    let (Some(x), Some(y)) = (point.x, point.y) else {
        return Err(HarnessError::Assertion {
            locator: locator.to_string(),
            expected: "a hoverable box".into(),
            observed: if point.ok { "no box".into() } else { "absent from DOM".into() },
        });
    };

    let params = DispatchMouseEventParams::builder()
        .r#type(DispatchMouseEventType::MouseMoved)
        .x(x)
        .y(y)
        .build()
        .map_err(|e| anyhow!("mouse move params: {e}"))?;
    ctx.page()
        .execute(params)
        .await
        .map_err(|e| anyhow!("hover over {locator} failed: {e}"))?;
    debug!(%locator, x, y, "hovering");
    tokio::time::sleep(SETTLE).await;
    Ok(())
}

/// Ensure a checkbox matched by `locator` is in the wanted state.
pub async fn set_checked(
    ctx: &Context,
    locator: &Locator,
    checked: bool,
    timeout: Duration,
) -> HarnessResult<()> {
    nav::wait_visible(ctx, locator, timeout).await?;
    if crate::check::is_checked(ctx, locator).await? != checked {
        let element = resolve(ctx, locator).await?;
        element
            .click()
            .await
            .map_err(|e| anyhow!("toggling {locator} failed: {e}"))?;
    }
    Ok(())
}

/// Attach a file to an `<input type="file">` matched by `locator`.
///
/// Waits for presence, not visibility — file inputs are routinely
/// rendered invisible behind styled labels.
pub async fn set_file_input(
    ctx: &Context,
    locator: &Locator,
    path: &Path,
    timeout: Duration,
) -> HarnessResult<()> {
    nav::wait_present(ctx, locator, timeout).await?;
    let element = resolve(ctx, locator).await?;
    let abs = tokio::fs::canonicalize(path)
        .await
        .map_err(|e| anyhow!("resolving fixture path {}: {e}", path.display()))?;
    let params = SetFileInputFilesParams::builder()
        .files(vec![abs.to_string_lossy().to_string()])
        .backend_node_id(element.backend_node_id)
        .build()
        .map_err(|e| anyhow!("set file input params: {e}"))?;
    ctx.page()
        .execute(params)
        .await
        .map_err(|e| anyhow!("setting files on {locator} failed: {e}"))?;
    debug!(%locator, file = %abs.display(), "file attached");
    Ok(())
}

/// Scroll the page to the bottom (used to force lazy feed content).
pub async fn scroll_to_bottom(ctx: &Context) -> HarnessResult<()> {
    ctx.eval("window.scrollTo(0, document.body.scrollHeight)").await
}
