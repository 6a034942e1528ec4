//! The single owner of session, channel and item state.
//!
//! Producers (the websocket task, the snapshot task) only ever post [`EngineEvent`]s to one
//! ordered inbox. The host awaits [`Engine::next_event`] and feeds each event to
//! [`Engine::apply`]; user intents are `&mut self` methods. Nothing else mutates state.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;

use crate::channel::{
    ChannelEvent, ChannelRequest, ConnectionManager, ConnectionState, Connector, WsConnector,
};
use crate::config::{ClientConfig, EventOrdering};
use crate::items::ItemStore;
use crate::model::Item;
use crate::reconcile::Reconciler;
use crate::remote::RemoteClient;
use crate::session::{AuthState, SessionGate, Theme};
use crate::snapshot::{SnapshotLoader, SnapshotSource};
use crate::store::LocalStore;

mod auth;
mod intents;

#[derive(Debug)]
pub enum EngineEvent {
    Channel { epoch: u64, event: ChannelEvent },
    Snapshot { epoch: u64, items: Vec<Item> },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    NotStarted,
    Loading,
    Loaded,
}

/// What the list view should show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListStatus {
    Loading,
    LoadedEmpty,
    Loaded(usize),
}

pub struct Engine {
    config: ClientConfig,
    channel_url: String,
    session: SessionGate,
    items: ItemStore,
    load: LoadState,
    /// Item events held back until the snapshot lands (`BufferUntilSnapshot`).
    held: Vec<ChannelEvent>,
    reconciler: Reconciler,
    connection: ConnectionManager,
    snapshots: SnapshotLoader,
    inbox: mpsc::UnboundedReceiver<EngineEvent>,
    inbox_tx: mpsc::UnboundedSender<EngineEvent>,
    remote: Option<RemoteClient>,
    store: Option<LocalStore>,
    last_error: Option<String>,
    /// Bumped whenever the item list changes.
    revision: u64,
}

impl Engine {
    /// Production wiring: HTTP client with cookie jar, websocket transport, on-disk state.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let endpoints = config.endpoints()?;
        let remote = RemoteClient::new(endpoints)?;
        let store = LocalStore::open(&config.state_dir)?;
        let source: Arc<dyn SnapshotSource> = Arc::new(remote.clone());
        Self::assemble(
            config,
            Box::new(WsConnector),
            source,
            Some(remote),
            Some(store),
        )
    }

    /// Wiring with a custom transport and snapshot source, and no HTTP or on-disk state.
    pub fn with_transport(
        config: ClientConfig,
        connector: Box<dyn Connector>,
        source: Arc<dyn SnapshotSource>,
    ) -> Result<Self> {
        Self::assemble(config, connector, source, None, None)
    }

    fn assemble(
        config: ClientConfig,
        connector: Box<dyn Connector>,
        source: Arc<dyn SnapshotSource>,
        remote: Option<RemoteClient>,
        store: Option<LocalStore>,
    ) -> Result<Self> {
        let channel_url = config.endpoints()?.channel_url;
        let (inbox_tx, inbox) = mpsc::unbounded_channel();
        Ok(Self {
            reconciler: Reconciler::new(config.dedupe_created),
            connection: ConnectionManager::new(connector, inbox_tx.clone()),
            snapshots: SnapshotLoader::new(source),
            config,
            channel_url,
            session: SessionGate::new(),
            items: ItemStore::new(),
            load: LoadState::NotStarted,
            held: Vec::new(),
            inbox,
            inbox_tx,
            remote,
            store,
            last_error: None,
            revision: 0,
        })
    }

    /// Reads the persisted theme. Does not touch the network.
    pub fn restore_preferences(&mut self) -> Theme {
        match &self.store {
            Some(store) => self.session.restore_preferences(store),
            None => self.session.theme(),
        }
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.session.set_theme(theme);
        if let Some(store) = &self.store {
            store.set_theme(theme)?;
        }
        Ok(())
    }

    // ---- event loop ----

    /// Waits for the next event from the channel or the snapshot task.
    pub async fn next_event(&mut self) -> Option<EngineEvent> {
        self.inbox.recv().await
    }

    pub fn try_next_event(&mut self) -> Option<EngineEvent> {
        self.inbox.try_recv().ok()
    }

    /// Applies events until `done` holds or `limit` elapses. Returns whether `done` held.
    pub async fn pump_until<F>(&mut self, limit: Duration, mut done: F) -> bool
    where
        F: FnMut(&Engine) -> bool,
    {
        if done(self) {
            return true;
        }
        let deadline = tokio::time::Instant::now() + limit;
        loop {
            let next = tokio::time::timeout_at(deadline, self.inbox.recv()).await;
            match next {
                Ok(Some(event)) => {
                    self.apply(event);
                    if done(self) {
                        return true;
                    }
                }
                Ok(None) | Err(_) => return false,
            }
        }
    }

    pub fn apply(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Channel { epoch, event } => {
                if epoch != self.connection.epoch() {
                    tracing::debug!(epoch, "dropping {} from a closed channel", event.name());
                    return;
                }
                self.on_channel_event(epoch, event);
            }
            EngineEvent::Snapshot { epoch, items } => {
                if epoch != self.connection.epoch() {
                    tracing::debug!(epoch, "dropping snapshot from a closed channel");
                    return;
                }
                self.on_snapshot(items);
            }
        }
    }

    fn on_channel_event(&mut self, epoch: u64, event: ChannelEvent) {
        tracing::debug!(epoch, "<- {}", event.name());
        match event {
            ChannelEvent::Connect => {
                self.connection.on_connected();
                self.session.mark_pending();
                self.load = LoadState::Loading;
                self.snapshots.spawn(epoch, self.inbox_tx.clone());
            }
            ChannelEvent::Disconnect => {
                tracing::info!("channel disconnected; keeping {} items", self.items.len());
                self.connection.on_disconnected();
            }
            ChannelEvent::Authorized => self.mark_authorized(),
            ChannelEvent::Error(msg) => {
                tracing::warn!("channel error: {}", msg);
                self.last_error = Some(msg);
                self.mark_unauthorized();
            }
            item_event => self.on_item_event(item_event),
        }
    }

    fn on_item_event(&mut self, event: ChannelEvent) {
        if self.load == LoadState::Loaded {
            self.reconcile(event);
            return;
        }
        match self.config.ordering {
            EventOrdering::BufferUntilSnapshot => self.held.push(event),
            EventOrdering::DropUntilSnapshot => {
                tracing::debug!("no list yet; dropping {}", event.name());
            }
            EventOrdering::Passthrough => self.reconcile(event),
        }
    }

    fn on_snapshot(&mut self, items: Vec<Item>) {
        self.items.replace_all(items);
        self.load = LoadState::Loaded;
        let held = std::mem::take(&mut self.held);
        if !held.is_empty() {
            tracing::debug!("replaying {} events held during load", held.len());
        }
        for event in held {
            self.reconciler.apply(&mut self.items, event);
        }
        self.revision += 1;
    }

    fn reconcile(&mut self, event: ChannelEvent) {
        if self.reconciler.apply(&mut self.items, event) {
            self.revision += 1;
        }
    }

    // ---- gate ----

    /// The only path that opens the channel: mark the session authorized, then connect if
    /// no channel exists yet.
    pub fn mark_authorized(&mut self) {
        self.session.mark_authorized();
        if !self.session.allows_connect() || self.connection.has_channel() {
            return;
        }
        let cookie = self.remote.as_ref().and_then(|r| r.session_cookie());
        self.connection.open(ChannelRequest {
            url: self.channel_url.clone(),
            cookie,
        });
    }

    /// Back to unauthenticated; any channel is torn down and late events from it ignored.
    pub fn mark_unauthorized(&mut self) {
        self.session.mark_unauthorized();
        self.connection.close();
        self.held.clear();
    }

    // ---- views ----

    pub fn items(&self) -> &ItemStore {
        &self.items
    }

    pub fn active_items(&self) -> Vec<&Item> {
        self.items.active_items()
    }

    pub fn trashed_items(&self) -> Vec<&Item> {
        self.items.trashed_items()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn load_state(&self) -> LoadState {
        self.load
    }

    pub fn list_status(&self) -> ListStatus {
        match self.load {
            LoadState::NotStarted | LoadState::Loading => ListStatus::Loading,
            LoadState::Loaded => match self.items.active_items().len() {
                0 => ListStatus::LoadedEmpty,
                n => ListStatus::Loaded(n),
            },
        }
    }

    pub fn auth_state(&self) -> AuthState {
        self.session.auth_state()
    }

    pub fn is_authorized(&self) -> bool {
        self.session.is_authorized()
    }

    pub fn theme(&self) -> Theme {
        self.session.theme()
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    pub fn has_channel(&self) -> bool {
        self.connection.has_channel()
    }

    /// Most recent channel error, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[cfg(test)]
#[path = "tests/engine_tests.rs"]
mod tests;
