//! # Icon Resolution
//!
//! Links get an icon after they are created, never during. [`IconResolver`]
//! runs one background task per new link; each task asks an [`IconLookup`]
//! for the link's url and sends back an [`IconResolution`] message. The tasks
//! never touch the store. Whoever owns the store drains the messages and
//! folds them in with [`apply`], which checks the item is still there first.
//!
//! ## Failure Model
//!
//! The lookup service is optional and unreliable. Transport errors, non-2xx
//! responses, malformed bodies, timeouts and panicking lookups all end the
//! same way: a log entry and a resolution with `icon: None`, which [`apply`]
//! ignores.
//! There is no retry; the link simply keeps rendering its placeholder.
//!
//! ## Cancellation
//!
//! Deleting an item calls [`IconResolver::cancel`], which aborts the pending
//! task. A result that slips through anyway targets an id that is no longer
//! in the store and is dropped by [`apply`].

use async_trait::async_trait;
use futures_util::FutureExt;
use serde::Deserialize;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{Result, StartmarksError};
use crate::model::{ItemId, ItemPatch};
use crate::store::{ItemStore, StorageBackend};

/// Something that can find an icon for a url.
#[async_trait]
pub trait IconLookup: Send + Sync {
    /// `Ok(None)` means the service answered but has no icon.
    async fn lookup(&self, url: &str) -> Result<Option<String>>;
}

/// Favicon service reached over HTTP: `GET <endpoint>?url=<url>` answering
/// `{"icon": "<data uri or image url>"}`.
pub struct HttpIconLookup {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct IconResponse {
    #[serde(default)]
    icon: Option<String>,
}

impl HttpIconLookup {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StartmarksError::IconLookup(format!("failed to build http client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl IconLookup for HttpIconLookup {
    async fn lookup(&self, url: &str) -> Result<Option<String>> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("url", url)])
            .send()
            .await
            .map_err(|e| StartmarksError::IconLookup(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), url, "icon service has no icon");
            return Ok(None);
        }

        let body = response
            .text()
            .await
            .map_err(|e| StartmarksError::IconLookup(format!("failed to read body: {e}")))?;
        parse_icon_body(&body)
    }
}

/// Extracts the icon reference from a service response body.
///
/// A missing, null or blank `icon` is "no icon"; a body that is not the
/// expected JSON object is an error.
pub fn parse_icon_body(body: &str) -> Result<Option<String>> {
    let parsed: IconResponse = serde_json::from_str(body)
        .map_err(|e| StartmarksError::IconLookup(format!("malformed response: {e}")))?;
    Ok(parsed.icon.filter(|icon| !icon.trim().is_empty()))
}

/// Outcome of one background lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconResolution {
    pub id: ItemId,
    pub icon: Option<String>,
}

/// Runs icon lookups in the background, one task per item id.
///
/// Must be driven from inside a tokio runtime: [`spawn`](Self::spawn) calls
/// `tokio::spawn`.
pub struct IconResolver {
    lookup: Arc<dyn IconLookup>,
    timeout: Duration,
    tx: mpsc::UnboundedSender<IconResolution>,
    rx: mpsc::UnboundedReceiver<IconResolution>,
    pending: HashMap<ItemId, JoinHandle<()>>,
}

impl IconResolver {
    pub fn new(lookup: Arc<dyn IconLookup>, timeout: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            lookup,
            timeout,
            tx,
            rx,
            pending: HashMap::new(),
        }
    }

    /// Start resolving the icon for `url` on behalf of item `id`.
    pub fn spawn(&mut self, id: ItemId, url: String) {
        let lookup = Arc::clone(&self.lookup);
        let tx = self.tx.clone();
        let timeout = self.timeout;
        let task_id = id.clone();

        let handle = tokio::spawn(async move {
            let attempt = AssertUnwindSafe(tokio::time::timeout(timeout, lookup.lookup(&url)));
            let icon = match attempt.catch_unwind().await {
                Ok(Ok(Ok(icon))) => icon,
                Ok(Ok(Err(e))) => {
                    tracing::warn!(id = %task_id, url = %url, "icon lookup failed: {e}");
                    None
                }
                Ok(Err(_)) => {
                    tracing::warn!(id = %task_id, url = %url, "icon lookup timed out");
                    None
                }
                Err(_) => {
                    tracing::error!(id = %task_id, url = %url, "icon lookup panicked");
                    None
                }
            };
            // The receiver only goes away with the resolver itself.
            let _ = tx.send(IconResolution { id: task_id, icon });
        });

        if let Some(previous) = self.pending.insert(id, handle) {
            previous.abort();
        }
    }

    /// Abort the pending lookup for `id`, if any.
    pub fn cancel(&mut self, id: &ItemId) -> bool {
        match self.pending.remove(id) {
            Some(handle) => {
                handle.abort();
                tracing::debug!(id = %id, "icon lookup cancelled");
                true
            }
            None => false,
        }
    }

    /// Number of lookups that have not delivered a result yet.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// A finished resolution if one is waiting, without blocking.
    pub fn try_next(&mut self) -> Option<IconResolution> {
        let resolution = self.rx.try_recv().ok()?;
        self.pending.remove(&resolution.id);
        Some(resolution)
    }

    /// Wait for the next resolution. Returns `None` once nothing is pending.
    pub async fn next(&mut self) -> Option<IconResolution> {
        if let Some(resolution) = self.try_next() {
            return Some(resolution);
        }
        if self.pending.is_empty() {
            return None;
        }
        let resolution = self.rx.recv().await?;
        self.pending.remove(&resolution.id);
        Some(resolution)
    }
}

impl Drop for IconResolver {
    fn drop(&mut self) {
        for (_, handle) in self.pending.drain() {
            handle.abort();
        }
    }
}

/// Fold a resolution into the store.
///
/// Skips items that were deleted meanwhile and lookups that found nothing.
/// Returns whether the item's icon changed.
pub fn apply<B: StorageBackend>(
    store: &mut ItemStore<B>,
    resolution: IconResolution,
) -> Result<bool> {
    if !store.contains(&resolution.id) {
        tracing::debug!(id = %resolution.id, "dropping icon for deleted item");
        return Ok(false);
    }
    match resolution.icon {
        Some(icon) => store.patch(&resolution.id, &ItemPatch::icon(icon)),
        None => Ok(false),
    }
}
