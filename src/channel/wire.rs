//! JSON framing: `{"event": "<name>", "data": <payload>}`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::ChannelEvent;
use crate::model::{Item, ItemDraft};

/// Outbound intents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientFrame {
    ItemAdd(ItemDraft),
    ItemUpdate(Item),
    ItemDel(Item),
}

impl ClientFrame {
    pub fn name(&self) -> &'static str {
        match self {
            ClientFrame::ItemAdd(_) => "item-add",
            ClientFrame::ItemUpdate(_) => "item-update",
            ClientFrame::ItemDel(_) => "item-del",
        }
    }
}

#[derive(Deserialize)]
struct RawFrame {
    event: String,
    #[serde(default)]
    data: serde_json::Value,
}

pub fn encode(frame: &ClientFrame) -> Result<String> {
    serde_json::to_string(frame).with_context(|| format!("encode {} frame", frame.name()))
}

/// Decodes one inbound frame. `Ok(None)` for event names this client does not know.
pub fn decode(text: &str) -> Result<Option<ChannelEvent>> {
    let raw: RawFrame = serde_json::from_str(text).context("parse channel frame")?;
    let event = match raw.event.as_str() {
        "authorized" => ChannelEvent::Authorized,
        "error" => ChannelEvent::Error(error_text(raw.data)),
        "new-item" => ChannelEvent::NewItem(
            serde_json::from_value(raw.data).context("parse new-item payload")?,
        ),
        "update-item" => ChannelEvent::UpdateItem(
            serde_json::from_value(raw.data).context("parse update-item payload")?,
        ),
        "remove-item" => ChannelEvent::RemoveItem(
            serde_json::from_value(raw.data).context("parse remove-item payload")?,
        ),
        // Lifecycle names come from the socket itself, never from a frame.
        _ => return Ok(None),
    };
    Ok(Some(event))
}

fn error_text(data: serde_json::Value) -> String {
    match data {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => "unspecified channel error".to_string(),
        other => crate::remote::extract_error_message(&other).unwrap_or_else(|| other.to_string()),
    }
}

#[cfg(test)]
#[path = "../tests/channel/wire_tests.rs"]
mod tests;
