//! Gateway session
//!
//! The WebSocket-backed [`GatewayTransport`].

use super::driver::{Driver, RunningDriver};
use super::SessionConfig;
use crate::connection::{connect, Connection, ConnectionState};
use crate::dispatch::EventDispatcher;
use crate::error::{GatewayError, GatewayResult};
use crate::protocol::{GatewayMessage, PresenceUpdatePayload, RequestGuildMembersPayload};
use crate::transport::GatewayTransport;
use async_trait::async_trait;
use chat_core::Snowflake;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// How long `close` waits for the driver to finish
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// A gateway session over a real WebSocket
pub struct GatewaySession {
    config: Arc<SessionConfig>,
    connection: Arc<Connection>,
    dispatcher: Arc<EventDispatcher>,
    running: Mutex<Option<RunningDriver>>,
}

impl GatewaySession {
    /// Create a closed session
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config: Arc::new(config),
            connection: Arc::new(Connection::new()),
            dispatcher: Arc::new(EventDispatcher::new()),
            running: Mutex::new(None),
        }
    }

    /// Session settings
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Link state shared with the driver
    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    fn ensure_connected(&self) -> GatewayResult<()> {
        if self.connection.is_connected() {
            Ok(())
        } else {
            Err(GatewayError::NotConnected)
        }
    }
}

#[async_trait]
impl GatewayTransport for GatewaySession {
    fn dispatcher(&self) -> &EventDispatcher {
        &self.dispatcher
    }

    fn state(&self) -> ConnectionState {
        self.connection.state()
    }

    async fn open(&self) -> GatewayResult<()> {
        if self.connection.state() != ConnectionState::Disconnected {
            return Err(GatewayError::AlreadyOpen);
        }
        self.connection.clear_resume();
        self.connection.set_state(ConnectionState::Connecting);

        let (socket, hello) = match connect(&self.config.url).await {
            Ok(pair) => pair,
            Err(e) => {
                self.connection.set_state(ConnectionState::Disconnected);
                return Err(e);
            }
        };

        let (ready_tx, ready_rx) = oneshot::channel();
        let shutdown = CancellationToken::new();
        let driver = Driver {
            config: Arc::clone(&self.config),
            connection: Arc::clone(&self.connection),
            dispatcher: Arc::clone(&self.dispatcher),
            shutdown: shutdown.clone(),
        };
        let task = tokio::spawn(driver.run(socket, hello, ready_tx));

        let result = match tokio::time::timeout(self.config.ready_timeout, ready_rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(GatewayError::ConnectionLost(
                "session ended before READY".to_string(),
            )),
            Err(_) => Err(GatewayError::ReadyTimeout(self.config.ready_timeout)),
        };

        match result {
            Ok(()) => {
                *self.running.lock() = Some(RunningDriver { shutdown, task });
                Ok(())
            }
            Err(e) => {
                shutdown.cancel();
                let _ = task.await;
                Err(e)
            }
        }
    }

    async fn close(&self) -> GatewayResult<()> {
        let Some(RunningDriver { shutdown, mut task }) = self.running.lock().take() else {
            return Err(GatewayError::NotConnected);
        };

        self.connection.set_state(ConnectionState::Disconnecting);
        shutdown.cancel();

        match tokio::time::timeout(CLOSE_TIMEOUT, &mut task).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(error = %e, "Gateway driver panicked"),
            Err(_) => {
                tracing::warn!("Gateway driver did not stop in time");
                task.abort();
            }
        }

        self.connection.set_state(ConnectionState::Disconnected);
        tracing::info!("Gateway session closed");
        Ok(())
    }

    async fn request_guild_members(
        &self,
        guild_id: Snowflake,
        query: &str,
        limit: u32,
    ) -> GatewayResult<()> {
        self.ensure_connected()?;

        let payload = RequestGuildMembersPayload::new(guild_id, query, limit)
            .with_nonce(Uuid::new_v4().simple().to_string());
        tracing::debug!(guild_id = %guild_id, nonce = ?payload.nonce, "Requesting guild members");

        self.connection
            .send(GatewayMessage::request_guild_members(&payload)?)
            .await
    }

    async fn update_presence(&self, presence: PresenceUpdatePayload) -> GatewayResult<()> {
        self.ensure_connected()?;

        tracing::debug!(status = %presence.status, activities = presence.activities.len(), "Updating presence");
        self.connection
            .send(GatewayMessage::presence_update(&presence)?)
            .await
    }
}

impl Drop for GatewaySession {
    fn drop(&mut self) {
        if let Some(running) = self.running.get_mut().take() {
            running.shutdown.cancel();
        }
    }
}

impl std::fmt::Debug for GatewaySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewaySession")
            .field("url", &self.config.url)
            .field("connection", &self.connection)
            .finish_non_exhaustive()
    }
}
