use anyhow::{Context, Result};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::http::header::COOKIE;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use super::connection::{ChannelHandle, ChannelRequest, Connector};
use super::{ChannelEvent, ClientFrame, EventSink, wire};

/// Websocket transport over tokio-tungstenite. Must be used inside a tokio runtime.
#[derive(Clone, Copy, Debug, Default)]
pub struct WsConnector;

impl Connector for WsConnector {
    fn spawn(&self, request: ChannelRequest, sink: EventSink) -> ChannelHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_channel(request, sink, rx));
        ChannelHandle::new(tx, Some(task))
    }
}

fn build_request(request: &ChannelRequest) -> Result<Request> {
    let mut req = request
        .url
        .as_str()
        .into_client_request()
        .with_context(|| format!("build channel request for {}", request.url))?;
    if let Some(cookie) = &request.cookie {
        let value = HeaderValue::from_str(cookie).context("session cookie is not a valid header")?;
        req.headers_mut().insert(COOKIE, value);
    }
    Ok(req)
}

async fn run_channel(
    request: ChannelRequest,
    sink: EventSink,
    mut outbound: mpsc::UnboundedReceiver<ClientFrame>,
) {
    let req = match build_request(&request) {
        Ok(req) => req,
        Err(err) => {
            sink.emit(ChannelEvent::Error(format!("{:#}", err)));
            return;
        }
    };

    let (socket, _resp) = match connect_async(req).await {
        Ok(pair) => pair,
        Err(err) => {
            tracing::warn!("channel handshake failed: {}", err);
            sink.emit(ChannelEvent::Error(err.to_string()));
            return;
        }
    };
    if !sink.emit(ChannelEvent::Connect) {
        return;
    }

    let (mut write, mut read) = socket.split();
    loop {
        tokio::select! {
            frame = outbound.recv() => {
                let Some(frame) = frame else {
                    // Handle dropped: orderly close.
                    let _ = write.close().await;
                    return;
                };
                let text = match wire::encode(&frame) {
                    Ok(text) => text,
                    Err(err) => {
                        tracing::error!("{:#}", err);
                        continue;
                    }
                };
                tracing::debug!("-> {}", frame.name());
                if let Err(err) = write.send(Message::Text(text)).await {
                    sink.emit(ChannelEvent::Error(err.to_string()));
                    return;
                }
            }
            msg = read.next() => {
                let text = match msg {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes) {
                        Ok(text) => text,
                        Err(_) => {
                            tracing::warn!("ignoring non-utf8 binary frame");
                            continue;
                        }
                    },
                    Some(Ok(Message::Close(_))) | None => {
                        sink.emit(ChannelEvent::Disconnect);
                        return;
                    }
                    Some(Ok(_)) => continue,
                    Some(Err(err)) => {
                        sink.emit(ChannelEvent::Error(err.to_string()));
                        return;
                    }
                };
                match wire::decode(&text) {
                    Ok(Some(event)) => {
                        if !sink.emit(event) {
                            return;
                        }
                    }
                    Ok(None) => tracing::debug!("ignoring unknown frame: {}", text),
                    Err(err) => tracing::warn!("{:#}", err),
                }
            }
        }
    }
}
