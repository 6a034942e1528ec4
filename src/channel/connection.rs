use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::{ClientFrame, EventSink};
use crate::engine::EngineEvent;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    Idle,
    Connecting,
    Connected,
    Disconnected,
}

/// What a connector needs to open the channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelRequest {
    pub url: String,
    /// Forwarded as a `Cookie` header during the handshake.
    pub cookie: Option<String>,
}

/// Opens a channel in the background. Must return immediately; the outcome is reported
/// through `sink` (`Connect`, then frames, then `Disconnect` or `Error`).
pub trait Connector: Send + Sync {
    fn spawn(&self, request: ChannelRequest, sink: EventSink) -> ChannelHandle;
}

/// Write side of an open (or opening) channel. Dropping it closes the outbound queue, which
/// makes the transport task close the socket once it is done with what was already queued.
#[derive(Debug)]
pub struct ChannelHandle {
    outbound: mpsc::UnboundedSender<ClientFrame>,
    task: Option<JoinHandle<()>>,
}

impl ChannelHandle {
    pub fn new(outbound: mpsc::UnboundedSender<ClientFrame>, task: Option<JoinHandle<()>>) -> Self {
        Self { outbound, task }
    }

    /// Queues a frame for the transport. False if the transport has already gone away.
    pub fn send(&self, frame: ClientFrame) -> bool {
        self.outbound.send(frame).is_ok()
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_some_and(|t| t.is_finished())
    }
}

/// Owns the one channel a session may have.
///
/// `Idle -> Connecting -> Connected -> Disconnected`, with `close` returning to `Idle` from
/// any state. Every `open` and `close` starts a new epoch so the engine can tell late events
/// of a torn-down channel from current ones.
pub struct ConnectionManager {
    connector: Box<dyn Connector>,
    inbox: mpsc::UnboundedSender<EngineEvent>,
    state: ConnectionState,
    channel: Option<ChannelHandle>,
    epoch: u64,
}

impl ConnectionManager {
    pub fn new(connector: Box<dyn Connector>, inbox: mpsc::UnboundedSender<EngineEvent>) -> Self {
        Self {
            connector,
            inbox,
            state: ConnectionState::Idle,
            channel: None,
            epoch: 0,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// A handle whose transport task has already ended does not count.
    pub fn has_channel(&self) -> bool {
        self.channel.as_ref().is_some_and(|ch| !ch.is_finished())
    }

    /// Starts connecting. A no-op (returning false) while a channel already exists.
    pub fn open(&mut self, request: ChannelRequest) -> bool {
        if self.has_channel() {
            tracing::debug!("channel already open; ignoring connect");
            return false;
        }
        self.epoch += 1;
        tracing::info!(epoch = self.epoch, "connecting to {}", request.url);
        let sink = EventSink::new(self.epoch, self.inbox.clone());
        self.channel = Some(self.connector.spawn(request, sink));
        self.state = ConnectionState::Connecting;
        true
    }

    pub fn on_connected(&mut self) {
        if self.channel.is_some() {
            self.state = ConnectionState::Connected;
        }
    }

    /// Transport went away. The handle is released; reconnecting is up to the caller.
    pub fn on_disconnected(&mut self) {
        self.channel = None;
        self.state = ConnectionState::Disconnected;
    }

    /// Explicit teardown (logoff, channel error, rejected session).
    pub fn close(&mut self) {
        if self.channel.take().is_some() {
            tracing::info!(epoch = self.epoch, "channel closed");
        }
        self.epoch += 1;
        self.state = ConnectionState::Idle;
    }

    /// Hands a frame to the open channel. Without one the frame is dropped.
    pub fn send(&self, frame: ClientFrame) -> bool {
        match &self.channel {
            Some(ch) => ch.send(frame),
            None => {
                tracing::debug!("no channel; dropping {}", frame.name());
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/channel/connection_tests.rs"]
mod tests;
