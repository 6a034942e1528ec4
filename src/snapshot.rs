//! One-shot bulk read of the authority's item list.

use std::sync::Arc;

use anyhow::Result;
use futures::future::BoxFuture;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::engine::EngineEvent;
use crate::model::Item;

/// Where the baseline comes from. The HTTP client is the production source.
pub trait SnapshotSource: Send + Sync {
    fn fetch(&self) -> BoxFuture<'static, Result<Vec<Item>>>;
}

/// Fetches the list, substituting an empty one on failure. Never retries.
pub async fn load(source: &dyn SnapshotSource) -> Vec<Item> {
    match source.fetch().await {
        Ok(items) => {
            tracing::debug!("snapshot loaded: {} items", items.len());
            items
        }
        Err(err) => {
            tracing::warn!("snapshot fetch failed, showing an empty list: {:#}", err);
            Vec::new()
        }
    }
}

#[derive(Clone)]
pub struct SnapshotLoader {
    source: Arc<dyn SnapshotSource>,
}

impl SnapshotLoader {
    pub fn new(source: Arc<dyn SnapshotSource>) -> Self {
        Self { source }
    }

    /// Runs [`load`] in the background and posts the result to the engine inbox, tagged with
    /// the connection epoch that asked for it.
    pub fn spawn(&self, epoch: u64, inbox: mpsc::UnboundedSender<EngineEvent>) -> JoinHandle<()> {
        let source = self.source.clone();
        tokio::spawn(async move {
            let items = load(source.as_ref()).await;
            let _ = inbox.send(EngineEvent::Snapshot { epoch, items });
        })
    }
}

#[cfg(test)]
#[path = "tests/snapshot_tests.rs"]
mod tests;
