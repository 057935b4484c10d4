//! Scripted local gateway
//!
//! Speaks the server side of the gateway protocol closely enough to drive a
//! real `GatewaySession`: Hello, READY after a valid Identify, RESUMED after
//! a Resume, heartbeat ACKs, and one member page per member request. A script
//! can also break a session once it is established, or refuse reconnects.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket},
        State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::sync::mpsc;

use crate::fixtures::{member_json, user_json, TEST_TOKEN};

/// Path the gateway is served on
pub const GATEWAY_PATH: &str = "/gateway";

/// Session id handed out in READY
pub const SESSION_ID: &str = "wire-session";

/// What the gateway does right after READY or RESUMED on a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Disruption {
    #[default]
    None,
    /// Close the socket with this code
    Close(u16),
    /// Send op 7
    Reconnect,
    /// Send op 9 with this resumable flag
    InvalidSession(bool),
}

/// Answer to a Resume for the known session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResumeReply {
    #[default]
    Resumed,
    /// Op 9 with `d: false`
    Reject,
}

/// What the gateway answers with
#[derive(Debug, Clone)]
pub struct GatewayScript {
    pub token: String,
    pub heartbeat_interval: u64,
    pub guilds: Vec<u64>,
    /// Member user records per guild, sent as one page
    pub members: HashMap<u64, Vec<Value>>,
    /// Per accepted connection, in order; later connections are left alone
    pub disruptions: Vec<Disruption>,
    pub resume_reply: ResumeReply,
    /// Upgrades beyond this many accepted connections get a 503
    pub max_connections: Option<usize>,
}

impl Default for GatewayScript {
    fn default() -> Self {
        Self {
            token: TEST_TOKEN.to_string(),
            heartbeat_interval: 45_000,
            guilds: Vec::new(),
            members: HashMap::new(),
            disruptions: Vec::new(),
            resume_reply: ResumeReply::default(),
            max_connections: None,
        }
    }
}

impl GatewayScript {
    #[must_use]
    pub fn with_guilds(mut self, guilds: &[u64]) -> Self {
        self.guilds = guilds.to_vec();
        self
    }

    #[must_use]
    pub fn with_members(mut self, guild: u64, users: Vec<Value>) -> Self {
        self.members.insert(guild, users);
        self
    }

    #[must_use]
    pub fn with_heartbeat_interval(mut self, ms: u64) -> Self {
        self.heartbeat_interval = ms;
        self
    }

    /// Disrupt the established session on successive connections
    #[must_use]
    pub fn with_disruptions(mut self, disruptions: &[Disruption]) -> Self {
        self.disruptions = disruptions.to_vec();
        self
    }

    #[must_use]
    pub fn with_resume_reply(mut self, reply: ResumeReply) -> Self {
        self.resume_reply = reply;
        self
    }

    #[must_use]
    pub fn with_max_connections(mut self, max: usize) -> Self {
        self.max_connections = Some(max);
        self
    }
}

#[derive(Debug, Default)]
struct Counters {
    attempts: usize,
    connections: usize,
}

/// Shared gateway stub state
#[derive(Clone)]
pub struct GatewayStubState {
    script: Arc<GatewayScript>,
    received: Arc<Mutex<Vec<Value>>>,
    counters: Arc<Mutex<Counters>>,
    client_closes: Arc<Mutex<Vec<Option<u16>>>>,
}

impl GatewayStubState {
    pub fn new(script: GatewayScript) -> Self {
        Self {
            script: Arc::new(script),
            received: Arc::new(Mutex::new(Vec::new())),
            counters: Arc::new(Mutex::new(Counters::default())),
            client_closes: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every client frame received, in order
    pub fn received(&self) -> Vec<Value> {
        self.received.lock().clone()
    }

    /// Client frames with opcode `op`
    pub fn received_op(&self, op: u64) -> Vec<Value> {
        self.received()
            .into_iter()
            .filter(|frame| frame["op"] == op)
            .collect()
    }

    /// Number of WebSocket connections accepted
    pub fn connections(&self) -> usize {
        self.counters.lock().connections
    }

    /// Upgrade requests seen, refused ones included
    pub fn attempts(&self) -> usize {
        self.counters.lock().attempts
    }

    /// Close codes the client sent, one entry per client close frame
    pub fn client_closes(&self) -> Vec<Option<u16>> {
        self.client_closes.lock().clone()
    }

    /// Reserve a connection slot, or `None` when the script refuses it
    fn admit(&self) -> Option<usize> {
        let mut counters = self.counters.lock();
        counters.attempts += 1;
        if self
            .script
            .max_connections
            .is_some_and(|max| counters.connections >= max)
        {
            return None;
        }
        counters.connections += 1;
        Some(counters.connections - 1)
    }
}

/// Build the gateway router
pub fn gateway_router(state: GatewayStubState) -> Router {
    Router::new()
        .route(GATEWAY_PATH, get(gateway_handler))
        .with_state(state)
}

async fn gateway_handler(
    State(state): State<GatewayStubState>,
    ws: WebSocketUpgrade,
) -> Response {
    let Some(index) = state.admit() else {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    };
    let disruption = state
        .script
        .disruptions
        .get(index)
        .copied()
        .unwrap_or_default();
    ws.on_upgrade(move |socket| handle_socket(state, socket, disruption))
}

fn dispatch(seq: &mut u64, t: &str, d: Value) -> Message {
    *seq += 1;
    Message::Text(json!({"op": 0, "t": t, "s": *seq, "d": d}).to_string())
}

fn ready(script: &GatewayScript) -> Value {
    let guilds: Vec<Value> = script
        .guilds
        .iter()
        .map(|id| json!({"id": id.to_string(), "unavailable": true}))
        .collect();
    json!({
        "v": 10,
        "user": user_json(1, "tester", "0001"),
        "guilds": guilds,
        "session_id": SESSION_ID,
        "resume_gateway_url": null
    })
}

fn member_page(script: &GatewayScript, request: &Value) -> Value {
    let guild = request["guild_id"]
        .as_str()
        .and_then(|id| id.parse::<u64>().ok())
        .unwrap_or_default();
    let members: Vec<Value> = script
        .members
        .get(&guild)
        .into_iter()
        .flatten()
        .map(member_json)
        .collect();
    json!({
        "guild_id": guild.to_string(),
        "members": members,
        "chunk_index": 0,
        "chunk_count": 1,
        "nonce": request["nonce"]
    })
}

/// Apply the connection's disruption; true when the socket is done
fn disrupt(tx: &mpsc::UnboundedSender<Message>, disruption: Disruption) -> bool {
    match disruption {
        Disruption::None => false,
        Disruption::Close(code) => {
            let _ = tx.send(close(code, "Scripted close."));
            true
        }
        Disruption::Reconnect => {
            let _ = tx.send(Message::Text(json!({"op": 7, "d": null}).to_string()));
            false
        }
        Disruption::InvalidSession(resumable) => {
            let _ = tx.send(Message::Text(json!({"op": 9, "d": resumable}).to_string()));
            false
        }
    }
}

async fn handle_socket(state: GatewayStubState, socket: WebSocket, disruption: Disruption) {
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();

    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let closing = matches!(msg, Message::Close(_));
            if sink.send(msg).await.is_err() || closing {
                break;
            }
        }
        let _ = sink.close().await;
    });

    let hello = json!({"op": 10, "d": {"heartbeat_interval": state.script.heartbeat_interval}});
    let _ = tx.send(Message::Text(hello.to_string()));

    let mut seq = 0_u64;

    while let Some(Ok(msg)) = stream.next().await {
        let text = match msg {
            Message::Text(text) => text,
            Message::Close(frame) => {
                state
                    .client_closes
                    .lock()
                    .push(frame.map(|frame| frame.code));
                break;
            }
            _ => continue,
        };
        let Ok(frame) = serde_json::from_str::<Value>(&text) else {
            let _ = tx.send(close(4002, "Error while decoding payload."));
            break;
        };
        state.received.lock().push(frame.clone());

        match frame["op"].as_u64() {
            Some(1) => {
                let _ = tx.send(Message::Text(json!({"op": 11}).to_string()));
            }
            Some(2) => {
                if frame["d"]["token"] != state.script.token.as_str() {
                    let _ = tx.send(close(4004, "Authentication failed."));
                    break;
                }
                let _ = tx.send(dispatch(&mut seq, "READY", ready(&state.script)));
                if disrupt(&tx, disruption) {
                    break;
                }
            }
            Some(6) => {
                let known = frame["d"]["session_id"] == SESSION_ID
                    && frame["d"]["token"] == state.script.token.as_str();
                if !known || state.script.resume_reply == ResumeReply::Reject {
                    let _ = tx.send(Message::Text(json!({"op": 9, "d": false}).to_string()));
                    continue;
                }
                // Replay continues from the client's last sequence
                seq = frame["d"]["seq"].as_u64().unwrap_or_default();
                let _ = tx.send(dispatch(&mut seq, "RESUMED", json!({})));
                if disrupt(&tx, disruption) {
                    break;
                }
            }
            Some(8) => {
                let page = member_page(&state.script, &frame["d"]);
                let _ = tx.send(dispatch(&mut seq, "GUILD_MEMBERS_CHUNK", page));
            }
            _ => {}
        }
    }

    drop(tx);
    let _ = send_task.await;
}

fn close(code: u16, reason: &'static str) -> Message {
    Message::Close(Some(CloseFrame {
        code,
        reason: reason.into(),
    }))
}
