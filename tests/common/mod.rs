//! In-process list authority for the integration tests: the HTTP auth and list routes plus
//! the websocket channel, all on one ephemeral port.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use shoplist::config::ClientConfig;
use shoplist::engine::{Engine, LoadState};
use shoplist::session::AuthState;

pub const EMAIL: &str = "ada@example.test";
pub const PASSWORD: &str = "secret";
pub const TAKEN_EMAIL: &str = "taken@example.test";
const SESSION_COOKIE: &str = "sid=abc";

pub const WAIT: Duration = Duration::from_secs(5);

#[derive(Clone)]
struct Authority {
    items: Arc<Mutex<Vec<Value>>>,
    next_id: Arc<AtomicU64>,
    events: broadcast::Sender<String>,
}

pub struct AuthorityGuard {
    pub addr: SocketAddr,
    items: Arc<Mutex<Vec<Value>>>,
    task: JoinHandle<()>,
}

impl AuthorityGuard {
    /// Host and port, without a scheme.
    pub fn server_addr(&self) -> String {
        self.addr.to_string()
    }

    pub fn items(&self) -> Vec<Value> {
        self.items.lock().map(|i| i.clone()).unwrap_or_default()
    }

    pub fn client_config(&self, state_dir: &Path) -> ClientConfig {
        let mut cfg = ClientConfig::new(self.server_addr(), state_dir.to_path_buf());
        cfg.insecure = true;
        cfg
    }
}

impl Drop for AuthorityGuard {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub async fn spawn_authority(seed: Vec<Value>) -> Result<AuthorityGuard> {
    let (events, _) = broadcast::channel(64);
    let state = Authority {
        items: Arc::new(Mutex::new(seed)),
        next_id: Arc::new(AtomicU64::new(1)),
        events,
    };
    let items = state.items.clone();

    let app = Router::new()
        .route("/v1/auth", post(login))
        .route("/v1/auth/create", post(create_account))
        .route("/v1/auth/logoff", post(logoff))
        .route("/v1/items/list", get(list_items))
        .route("/ws", get(channel))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("bind authority")?;
    let addr = listener.local_addr().context("authority addr")?;
    let task = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(AuthorityGuard { addr, items, task })
}

pub fn seed_item(id: &str, name: &str) -> Value {
    json!({
        "_id": id,
        "name": name,
        "description": format!("{} description", name),
        "count": 1,
        "color": "#3498db",
        "isDeleted": false,
    })
}

/// Logs in with the known-good password and waits for the first list.
pub async fn logged_in(authority: &AuthorityGuard, state_dir: &Path) -> Result<Engine> {
    let mut engine = Engine::new(authority.client_config(state_dir))?;
    engine
        .login(EMAIL, PASSWORD)
        .await
        .map_err(|err| anyhow::anyhow!(err.user_message("login failed")))?;
    let ready = engine
        .pump_until(WAIT, |e| {
            e.load_state() == LoadState::Loaded && e.auth_state() == AuthState::Authorized
        })
        .await;
    anyhow::ensure!(ready, "list did not load (last error {:?})", engine.last_error());
    Ok(engine)
}

fn has_session(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.split(';').any(|c| c.trim() == SESSION_COOKIE))
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] == PASSWORD {
        (
            [(header::SET_COOKIE, format!("{}; Path=/", SESSION_COOKIE))],
            Json(json!({ "message": "ok" })),
        )
            .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": ["Invalid credentials"] })),
        )
            .into_response()
    }
}

async fn create_account(Json(body): Json<Value>) -> Response {
    if body["email"] == TAKEN_EMAIL {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "message": "Email already registered" })),
        )
            .into_response();
    }
    Json(json!({ "message": "Account created successfuly" })).into_response()
}

/// Answers without expiring the cookie, so the client has to drop it on its own.
async fn logoff() -> Response {
    StatusCode::OK.into_response()
}

async fn list_items(State(state): State<Authority>, headers: HeaderMap) -> Response {
    if !has_session(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": ["Unauthorized"] })),
        )
            .into_response();
    }
    let items = state.items.lock().map(|i| i.clone()).unwrap_or_default();
    Json(Value::Array(items)).into_response()
}

async fn channel(
    ws: WebSocketUpgrade,
    State(state): State<Authority>,
    headers: HeaderMap,
) -> Response {
    let authed = has_session(&headers);
    ws.on_upgrade(move |socket| serve_channel(socket, state, authed))
}

fn frame(event: &str, data: Value) -> String {
    json!({ "event": event, "data": data }).to_string()
}

async fn serve_channel(socket: WebSocket, state: Authority, authed: bool) {
    let (mut tx, mut rx) = socket.split();
    if !authed {
        let _ = tx
            .send(Message::Text(frame("error", json!({ "error": ["Unauthorized"] }))))
            .await;
        let _ = tx.send(Message::Close(None)).await;
        return;
    }

    let mut events = state.events.subscribe();
    if tx
        .send(Message::Text(frame("authorized", Value::Null)))
        .await
        .is_err()
    {
        return;
    }

    loop {
        tokio::select! {
            out = events.recv() => {
                let Ok(text) = out else { return };
                if tx.send(Message::Text(text)).await.is_err() {
                    return;
                }
            }
            inbound = rx.next() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => handle_frame(&state, &text),
                    Some(Ok(_)) => {}
                    Some(Err(_)) | None => return,
                }
            }
        }
    }
}

fn handle_frame(state: &Authority, text: &str) {
    let Ok(msg) = serde_json::from_str::<Value>(text) else {
        return;
    };
    let data = msg["data"].clone();
    let Ok(mut items) = state.items.lock() else {
        return;
    };
    let out = match msg["event"].as_str() {
        Some("item-add") => {
            let mut created = data;
            let n = state.next_id.fetch_add(1, Ordering::SeqCst);
            created["_id"] = json!(format!("srv-{}", n));
            created["isDeleted"] = json!(false);
            items.push(created.clone());
            frame("new-item", created)
        }
        Some("item-update") => {
            let Some(slot) = items.iter_mut().find(|i| i["_id"] == data["_id"]) else {
                return;
            };
            *slot = data.clone();
            frame("update-item", data)
        }
        Some("item-del") => {
            items.retain(|i| i["_id"] != data["_id"]);
            frame("remove-item", json!({ "_id": data["_id"] }))
        }
        _ => return,
    };
    let _ = state.events.send(out);
}
