//! Client-side gateway link state
//!
//! Shared between the session handle and its driver task. Outlives
//! individual sockets so resume data survives a reconnect.

use crate::error::{GatewayError, GatewayResult};
use crate::protocol::GatewayMessage;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Connection state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionState {
    /// Socket opening or waiting for READY / RESUMED
    Connecting,
    /// READY or RESUMED received
    Connected,
    /// Close requested, driver shutting down
    Disconnecting,
    /// No socket
    #[default]
    Disconnected,
}

/// Data needed to resume a dropped session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeInfo {
    /// Session id from READY
    pub session_id: String,
    /// Gateway URL to resume against, if READY supplied one
    pub resume_url: Option<String>,
}

/// State of the client's gateway link
pub struct Connection {
    /// Current connection state
    state: RwLock<ConnectionState>,

    /// Last dispatch sequence number received
    sequence: Mutex<Option<u64>>,

    /// Resume data from the last READY
    resume: Mutex<Option<ResumeInfo>>,

    /// Outbound queue of the live socket
    sender: Mutex<Option<mpsc::Sender<GatewayMessage>>>,

    /// When the last heartbeat was sent
    last_heartbeat: Mutex<Option<Instant>>,

    /// Round trip of the last acknowledged heartbeat
    latency: Mutex<Option<Duration>>,

    /// Whether we've received a heartbeat ACK for the last heartbeat
    heartbeat_acked: AtomicBool,
}

impl Connection {
    /// Create a disconnected link
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(ConnectionState::Disconnected),
            sequence: Mutex::new(None),
            resume: Mutex::new(None),
            sender: Mutex::new(None),
            last_heartbeat: Mutex::new(None),
            latency: Mutex::new(None),
            heartbeat_acked: AtomicBool::new(true),
        }
    }

    /// Get the current state
    pub fn state(&self) -> ConnectionState {
        *self.state.read()
    }

    /// Set the connection state
    pub fn set_state(&self, state: ConnectionState) {
        let previous = std::mem::replace(&mut *self.state.write(), state);
        if previous != state {
            tracing::debug!(from = ?previous, to = ?state, "Gateway state changed");
        }
    }

    /// Check if READY (or RESUMED) has been received on the live socket
    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Get the last sequence number received
    pub fn sequence(&self) -> Option<u64> {
        *self.sequence.lock()
    }

    /// Record a sequence number from a dispatch
    pub fn set_sequence(&self, seq: u64) {
        *self.sequence.lock() = Some(seq);
    }

    /// Get resume data, if a session was established
    pub fn resume_info(&self) -> Option<ResumeInfo> {
        self.resume.lock().clone()
    }

    /// Store resume data from READY
    pub fn set_resume_info(&self, info: ResumeInfo) {
        *self.resume.lock() = Some(info);
    }

    /// Forget the session so the next connect identifies afresh
    pub fn clear_resume(&self) {
        *self.resume.lock() = None;
        *self.sequence.lock() = None;
    }

    /// Attach the outbound queue of a new socket
    pub fn attach_sender(&self, sender: mpsc::Sender<GatewayMessage>) {
        *self.sender.lock() = Some(sender);
    }

    /// Drop the outbound queue when the socket goes away
    pub fn detach_sender(&self) {
        *self.sender.lock() = None;
    }

    /// Queue a message on the live socket
    pub async fn send(&self, message: GatewayMessage) -> GatewayResult<()> {
        let sender = self.sender.lock().clone().ok_or(GatewayError::NotConnected)?;
        sender
            .send(message)
            .await
            .map_err(|_| GatewayError::NotConnected)
    }

    /// Record a heartbeat sent, now awaiting its ACK
    pub fn record_heartbeat(&self) {
        *self.last_heartbeat.lock() = Some(Instant::now());
        self.heartbeat_acked.store(false, Ordering::SeqCst);
    }

    /// Mark heartbeat as acknowledged
    pub fn ack_heartbeat(&self) {
        self.heartbeat_acked.store(true, Ordering::SeqCst);
        if let Some(sent) = *self.last_heartbeat.lock() {
            *self.latency.lock() = Some(sent.elapsed());
        }
    }

    /// Check if heartbeat was acknowledged
    pub fn is_heartbeat_acked(&self) -> bool {
        self.heartbeat_acked.load(Ordering::SeqCst)
    }

    /// Reset heartbeat bookkeeping for a fresh socket
    pub fn reset_heartbeat(&self) {
        *self.last_heartbeat.lock() = None;
        self.heartbeat_acked.store(true, Ordering::SeqCst);
    }

    /// Round trip of the last acknowledged heartbeat
    pub fn latency(&self) -> Option<Duration> {
        *self.latency.lock()
    }
}

impl Default for Connection {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("state", &self.state())
            .field("sequence", &self.sequence())
            .field("resumable", &self.resume.lock().is_some())
            .finish()
    }
}
