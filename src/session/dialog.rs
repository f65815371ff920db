//! Native-dialog capture.
//!
//! The application under test raises `confirm()` before revealing
//! spoiler content. A [`DialogWatch`] is attached per context: it
//! records each dialog message into a caller-visible list and accepts
//! the dialog so the scenario can keep moving. An explicit watcher per
//! context replaces the implicit global listener the old scripts used.

use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use chromiumoxide::cdp::browser_protocol::page::{
    EventJavascriptDialogOpening, HandleJavaScriptDialogParams,
};
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::HarnessResult;

/// Watches one page for JavaScript dialogs, auto-accepting each one.
pub struct DialogWatch {
    messages: Arc<Mutex<Vec<String>>>,
    task: JoinHandle<()>,
}

impl DialogWatch {
    pub async fn attach(page: &Page) -> HarnessResult<Self> {
        let mut events = page
            .event_listener::<EventJavascriptDialogOpening>()
            .await
            .map_err(|e| anyhow!("dialog listener: {e}"))?;

        let messages = Arc::new(Mutex::new(Vec::new()));
        let store = messages.clone();
        let page = page.clone();
        let task = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                debug!(message = %event.message, "dialog opened");
                if let Ok(mut list) = store.lock() {
                    list.push(event.message.clone());
                }
                let accept = match HandleJavaScriptDialogParams::builder().accept(true).build() {
                    Ok(params) => params,
                    Err(_) => continue,
                };
                let _ = page.execute(accept).await;
            }
        });

        Ok(Self { messages, task })
    }

    /// Snapshot of the captured dialog messages.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().map(|list| list.clone()).unwrap_or_default()
    }
}

impl Drop for DialogWatch {
    fn drop(&mut self) {
        self.task.abort();
    }
}
