//! Live channel to the authority: event types, framing, and connection lifecycle.

use tokio::sync::mpsc;

use crate::engine::EngineEvent;
use crate::model::{Item, ItemRef};

mod connection;
pub mod wire;
mod ws;

pub use self::connection::{ChannelHandle, ChannelRequest, ConnectionManager, ConnectionState, Connector};
pub use self::wire::ClientFrame;
pub use self::ws::WsConnector;

/// Everything the channel can report, in the order the transport delivered it.
///
/// `Connect`, `Disconnect` and transport failures are synthesized from the socket lifecycle;
/// the rest arrive as frames from the authority.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChannelEvent {
    Connect,
    Disconnect,
    Authorized,
    Error(String),
    NewItem(Item),
    UpdateItem(Item),
    RemoveItem(ItemRef),
}

impl ChannelEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ChannelEvent::Connect => "connect",
            ChannelEvent::Disconnect => "disconnect",
            ChannelEvent::Authorized => "authorized",
            ChannelEvent::Error(_) => "error",
            ChannelEvent::NewItem(_) => "new-item",
            ChannelEvent::UpdateItem(_) => "update-item",
            ChannelEvent::RemoveItem(_) => "remove-item",
        }
    }
}

/// Producer end of the engine inbox, stamped with the connection epoch it belongs to.
#[derive(Clone, Debug)]
pub struct EventSink {
    epoch: u64,
    tx: mpsc::UnboundedSender<EngineEvent>,
}

impl EventSink {
    pub fn new(epoch: u64, tx: mpsc::UnboundedSender<EngineEvent>) -> Self {
        Self { epoch, tx }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Returns false once the engine is gone.
    pub fn emit(&self, event: ChannelEvent) -> bool {
        self.tx
            .send(EngineEvent::Channel {
                epoch: self.epoch,
                event,
            })
            .is_ok()
    }
}
