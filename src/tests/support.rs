//! Fixtures shared by the unit tests.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use futures::future::BoxFuture;
use time::OffsetDateTime;
use tokio::sync::mpsc;

use crate::channel::{ChannelHandle, ChannelRequest, ClientFrame, Connector, EventSink};
use crate::config::ClientConfig;
use crate::model::{Item, ItemId};
use crate::snapshot::SnapshotSource;

pub fn item(id: &str, name: &str) -> Item {
    Item {
        id: ItemId::from(id),
        name: name.to_string(),
        description: format!("{} description", name),
        count: 1,
        color: "#3498db".to_string(),
        image: None,
        is_deleted: false,
        deleted_at: None,
    }
}

pub fn trashed(id: &str, name: &str, at: OffsetDateTime) -> Item {
    let mut it = item(id, name);
    it.tombstone(at);
    it
}

pub fn at(unix_secs: i64) -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(unix_secs).unwrap_or(OffsetDateTime::UNIX_EPOCH)
}

pub fn config() -> ClientConfig {
    let mut cfg = ClientConfig::new("list.example.test", std::env::temp_dir());
    cfg.insecure = true;
    cfg
}

#[derive(Default)]
struct Opened {
    requests: Vec<ChannelRequest>,
    sinks: Vec<EventSink>,
    outbound: Vec<mpsc::UnboundedReceiver<ClientFrame>>,
}

/// Connector that records what it was asked to open and lets the test drive the sink.
#[derive(Clone, Default)]
pub struct FakeConnector {
    opened: Arc<Mutex<Opened>>,
}

impl FakeConnector {
    pub fn open_count(&self) -> usize {
        self.opened.lock().map(|o| o.requests.len()).unwrap_or(0)
    }

    pub fn last_request(&self) -> Option<ChannelRequest> {
        self.opened.lock().ok()?.requests.last().cloned()
    }

    pub fn last_sink(&self) -> Option<EventSink> {
        self.opened.lock().ok()?.sinks.last().cloned()
    }

    /// Frames written to the most recently opened channel since the last call.
    pub fn take_sent(&self) -> Vec<ClientFrame> {
        let mut out = Vec::new();
        if let Ok(mut opened) = self.opened.lock()
            && let Some(rx) = opened.outbound.last_mut()
        {
            while let Ok(frame) = rx.try_recv() {
                out.push(frame);
            }
        }
        out
    }
}

impl Connector for FakeConnector {
    fn spawn(&self, request: ChannelRequest, sink: EventSink) -> ChannelHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        if let Ok(mut opened) = self.opened.lock() {
            opened.requests.push(request);
            opened.sinks.push(sink);
            opened.outbound.push(rx);
        }
        ChannelHandle::new(tx, None)
    }
}

/// Snapshot source with a canned answer.
pub struct StaticSource {
    answer: std::result::Result<Vec<Item>, String>,
}

impl StaticSource {
    pub fn ok(items: Vec<Item>) -> Arc<dyn SnapshotSource> {
        Arc::new(Self { answer: Ok(items) })
    }

    pub fn failing(msg: &str) -> Arc<dyn SnapshotSource> {
        Arc::new(Self {
            answer: Err(msg.to_string()),
        })
    }
}

impl SnapshotSource for StaticSource {
    fn fetch(&self) -> BoxFuture<'static, Result<Vec<Item>>> {
        let answer = self.answer.clone().map_err(|msg| anyhow::anyhow!(msg));
        Box::pin(async move { answer })
    }
}
