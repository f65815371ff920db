//! Opt-in browser integration tests.
//!
//! These exercise the real headless Chromium through the session,
//! locator, wait, and assertion layers, using `data:` URLs so no
//! application server is needed. They are **not** run by default — a
//! Chromium install is required:
//!
//!   VIGIL_INTEGRATION=1 cargo test --test integration_browser
//!
//! The env-var guard keeps CI green on machines without a browser.

use std::time::Duration;

use vigil::action;
use vigil::check::{self, Visibility};
use vigil::config::{ColorScheme, Viewport};
use vigil::locator::{Locator, Role};
use vigil::nav;
use vigil::session::{Session, SessionOptions};

fn enabled() -> bool {
    std::env::var("VIGIL_INTEGRATION").as_deref() == Ok("1")
}

fn options() -> SessionOptions {
    SessionOptions {
        headless: true,
        viewport: Viewport::default(),
        color_scheme: ColorScheme::Light,
    }
}

fn data_url(html: &str) -> String {
    format!(
        "data:text/html,{}",
        html.replace('#', "%23").replace(' ', "%20")
    )
}

const WAIT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn hidden_covers_absent_and_invisible() {
    if !enabled() {
        eprintln!("skipping browser integration test");
        return;
    }
    let session = Session::acquire(options()).await.expect("launch");
    let ctx = session.context().await.expect("context");

    let page = data_url(
        "<button id=shown>Shown</button><button id=gone style=display:none>Gone</button>",
    );
    nav::goto(&ctx, &page).await.unwrap();
    nav::wait_visible(&ctx, &Locator::css("#shown"), WAIT).await.unwrap();

    check::expect_visible(&ctx, &Locator::css("#shown")).await.unwrap();

    // present-but-invisible satisfies "hidden"...
    assert_eq!(
        check::visibility(&ctx, &Locator::css("#gone")).await.unwrap(),
        Visibility::Hidden
    );
    check::expect_hidden(&ctx, &Locator::css("#gone")).await.unwrap();

    // ...and so does absent-from-DOM.
    assert_eq!(
        check::visibility(&ctx, &Locator::css("#missing")).await.unwrap(),
        Visibility::Absent
    );
    check::expect_hidden(&ctx, &Locator::css("#missing")).await.unwrap();

    // a visible control must fail expect_hidden
    let err = check::expect_hidden(&ctx, &Locator::css("#shown")).await;
    assert!(matches!(err, Err(vigil::HarnessError::Assertion { .. })));

    session.close().await;
}

#[tokio::test]
async fn hover_reveals_css_hover_controls() {
    if !enabled() {
        eprintln!("skipping browser integration test");
        return;
    }
    let session = Session::acquire(options()).await.expect("launch");
    let ctx = session.context().await.expect("context");

    let page = data_url(
        "<style>.secret{visibility:hidden}.zone:hover .secret{visibility:visible}</style>\
         <div class=zone><span>Mine</span><button class=secret aria-label=Remove>x</button></div>",
    );
    nav::goto(&ctx, &page).await.unwrap();
    nav::wait_visible(&ctx, &Locator::css(".zone"), WAIT).await.unwrap();

    let remove = Locator::role(Role::Button, "Remove")
        .within(Locator::css(".zone").has_text("Mine"));
    assert_eq!(
        check::visibility(&ctx, &remove).await.unwrap(),
        Visibility::Hidden
    );

    action::hover(&ctx, &Locator::css(".zone"), WAIT).await.unwrap();
    nav::wait_visible(&ctx, &remove, WAIT).await.unwrap();

    session.close().await;
}

#[tokio::test]
async fn dialogs_are_captured_and_accepted() {
    if !enabled() {
        eprintln!("skipping browser integration test");
        return;
    }
    let session = Session::acquire(options()).await.expect("launch");
    let ctx = session.context().await.expect("context");

    let page = data_url(
        "<button id=go onclick=\"window.__r=confirm('reveal-spoiler')\">Go</button>",
    );
    nav::goto(&ctx, &page).await.unwrap();
    action::click(&ctx, &Locator::css("#go"), WAIT).await.unwrap();

    // the watcher records and accepts asynchronously
    let deadline = tokio::time::Instant::now() + WAIT;
    loop {
        if !ctx.dialog_messages().is_empty() {
            break;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "dialog message never captured"
        );
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert_eq!(ctx.dialog_messages(), vec!["reveal-spoiler".to_string()]);

    let accepted = ctx
        .eval_json("JSON.stringify({accepted: window.__r === true})")
        .await
        .unwrap();
    assert_eq!(accepted["accepted"], serde_json::Value::Bool(true));

    session.close().await;
}

#[tokio::test]
async fn fill_and_attribute_expectations() {
    if !enabled() {
        eprintln!("skipping browser integration test");
        return;
    }
    let session = Session::acquire(options()).await.expect("launch");
    let ctx = session.context().await.expect("context");

    let page = data_url(
        "<form><input placeholder=User name=u><input placeholder=Pass name=p type=password></form>",
    );
    nav::goto(&ctx, &page).await.unwrap();

    action::fill(&ctx, &Locator::placeholder("User"), "alice", WAIT)
        .await
        .unwrap();
    let value = ctx
        .eval_json("JSON.stringify({v: document.querySelector('[name=u]').value})")
        .await
        .unwrap();
    assert_eq!(value["v"], serde_json::Value::String("alice".into()));

    check::expect_attribute(&ctx, &Locator::placeholder("User"), "name", "u")
        .await
        .unwrap();
    let err = check::expect_attribute(&ctx, &Locator::placeholder("User"), "name", "wrong").await;
    assert!(matches!(err, Err(vigil::HarnessError::Assertion { .. })));

    session.close().await;
}

#[tokio::test]
async fn capture_writes_overwritable_artifacts() {
    if !enabled() {
        eprintln!("skipping browser integration test");
        return;
    }
    let session = Session::acquire(options()).await.expect("launch");
    let ctx = session.context().await.expect("context");
    let dir = tempfile::tempdir().unwrap();

    nav::goto(&ctx, &data_url("<h1>Artifact</h1>")).await.unwrap();
    let first = check::capture(&ctx, dir.path(), "shot").await.unwrap();
    assert!(first.exists());
    let bytes = std::fs::read(&first).unwrap();
    assert_eq!(&bytes[0..4], &[0x89, 0x50, 0x4E, 0x47]);

    // same name again: overwritten in place, no versioned copies
    let second = check::capture(&ctx, dir.path(), "shot").await.unwrap();
    assert_eq!(first, second);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);

    session.close().await;
}
