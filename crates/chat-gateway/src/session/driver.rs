//! Session driver
//!
//! Owns the socket for the lifetime of a session. Each socket gets a writer
//! task and a heartbeat task; the driver itself reads frames and runs the
//! event handlers, so handlers see events one at a time in arrival order.

use super::SessionConfig;
use crate::connection::{connect, Connection, ConnectionState, GatewaySocket, ResumeInfo};
use crate::dispatch::EventDispatcher;
use crate::error::{GatewayError, GatewayResult};
use crate::events::{EventPayload, GatewayEvent, GatewayEventType};
use crate::protocol::{
    CloseCode, GatewayMessage, HelloPayload, IdentifyPayload, OpCode, ResumePayload,
};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode as WsCloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

/// Channel buffer size for outgoing messages
const MESSAGE_BUFFER_SIZE: usize = 100;

/// Lower bound on the heartbeat period
const MIN_HEARTBEAT_INTERVAL: Duration = Duration::from_millis(10);

/// How long the writer gets to flush its close frame
const WRITER_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

/// Close code for a deliberate shutdown; ends the session
const CLOSE_NORMAL: u16 = 1000;

/// Close code for a reconnect; keeps the session resumable
const CLOSE_RECONNECT: u16 = 4000;

/// Resolves `open` once READY has been handled, or with the failure
pub(crate) type ReadySender = oneshot::Sender<GatewayResult<()>>;

/// How a socket ended
#[derive(Debug)]
enum SocketOutcome {
    /// Close was requested
    Shutdown,
    /// Socket dropped; try again
    Reconnect { resume: bool, reason: String },
    /// Gateway refused the session
    Fatal(GatewayError),
}

pub(crate) struct Driver {
    pub(crate) config: Arc<SessionConfig>,
    pub(crate) connection: Arc<Connection>,
    pub(crate) dispatcher: Arc<EventDispatcher>,
    pub(crate) shutdown: CancellationToken,
}

impl Driver {
    /// Drive the session until shutdown, a fatal close, or reconnects run out
    pub(crate) async fn run(self, socket: GatewaySocket, hello: HelloPayload, ready: ReadySender) {
        let mut ready = Some(ready);
        let mut current = (socket, hello);

        loop {
            let (socket, hello) = current;
            let (resume, reason) = match self.run_socket(socket, &hello, &mut ready).await {
                SocketOutcome::Shutdown => break,
                SocketOutcome::Fatal(err) => {
                    self.fail(&mut ready, err);
                    break;
                }
                SocketOutcome::Reconnect { reason, .. } if ready.is_some() => {
                    self.fail(&mut ready, GatewayError::ConnectionLost(reason));
                    break;
                }
                SocketOutcome::Reconnect { resume, reason } => (resume, reason),
            };

            if !resume {
                self.connection.clear_resume();
            }
            self.connection.set_state(ConnectionState::Connecting);

            match self.reconnect(&reason).await {
                Some(next) => current = next,
                None => break,
            }
        }

        self.connection.detach_sender();
        self.connection.set_state(ConnectionState::Disconnected);
        tracing::debug!("Gateway driver stopped");
    }

    async fn run_socket(
        &self,
        socket: GatewaySocket,
        hello: &HelloPayload,
        ready: &mut Option<ReadySender>,
    ) -> SocketOutcome {
        let (sink, mut stream) = socket.split();
        let (tx, rx) = mpsc::channel::<GatewayMessage>(MESSAGE_BUFFER_SIZE);
        let (close_tx, close_rx) = oneshot::channel::<u16>();

        self.connection.reset_heartbeat();
        self.connection.attach_sender(tx);

        let handshake = match self.handshake() {
            Ok(message) => message,
            Err(e) => return SocketOutcome::Fatal(e),
        };
        if let Err(e) = self.connection.send(handshake).await {
            return SocketOutcome::Fatal(e);
        }

        let writer = tokio::spawn(write_loop(sink, rx, close_rx));
        let mut heartbeat = tokio::spawn(heartbeat_loop(
            Arc::clone(&self.connection),
            Duration::from_millis(hello.heartbeat_interval),
        ));

        let outcome = loop {
            tokio::select! {
                () = self.shutdown.cancelled() => break SocketOutcome::Shutdown,
                reason = &mut heartbeat => {
                    let reason = reason.unwrap_or_else(|e| format!("heartbeat task failed: {e}"));
                    break SocketOutcome::Reconnect { resume: true, reason };
                }
                frame = stream.next() => match frame {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(outcome) = self.handle_text(&text, ready).await {
                            break outcome;
                        }
                    }
                    Some(Ok(Message::Close(frame))) => break classify_close(frame),
                    Some(Ok(Message::Binary(_))) => {
                        tracing::debug!("Ignoring binary gateway frame");
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        break SocketOutcome::Reconnect { resume: true, reason: e.to_string() };
                    }
                    None => {
                        break SocketOutcome::Reconnect {
                            resume: true,
                            reason: "connection closed".to_string(),
                        };
                    }
                }
            }
        };

        heartbeat.abort();
        self.connection.detach_sender();

        let close_code = match outcome {
            SocketOutcome::Shutdown => CLOSE_NORMAL,
            _ => CLOSE_RECONNECT,
        };
        let _ = close_tx.send(close_code);
        if tokio::time::timeout(WRITER_SHUTDOWN_TIMEOUT, writer).await.is_err() {
            tracing::warn!("Gateway writer did not finish closing");
        }

        outcome
    }

    fn handshake(&self) -> GatewayResult<GatewayMessage> {
        let token = self.config.token.expose();

        match (self.connection.resume_info(), self.connection.sequence()) {
            (Some(info), Some(seq)) => {
                tracing::debug!(session_id = %info.session_id, seq, "Resuming gateway session");
                Ok(GatewayMessage::resume(&ResumePayload {
                    token: token.to_string(),
                    session_id: info.session_id,
                    seq,
                })?)
            }
            _ => {
                tracing::debug!(intents = self.config.intents, "Identifying");
                Ok(GatewayMessage::identify(&IdentifyPayload::new(
                    token,
                    self.config.intents,
                    self.config.large_threshold,
                ))?)
            }
        }
    }

    async fn handle_text(
        &self,
        text: &str,
        ready: &mut Option<ReadySender>,
    ) -> Option<SocketOutcome> {
        let message = match GatewayMessage::from_json(text) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring undecodable gateway frame");
                return None;
            }
        };
        if !message.is_valid_server_message() {
            tracing::debug!(op = %message.op, "Ignoring client-only op from gateway");
            return None;
        }

        if let Some(seq) = message.s {
            self.connection.set_sequence(seq);
        }

        match message.op {
            OpCode::Dispatch => self.handle_dispatch(message, ready),
            OpCode::Heartbeat => {
                // Gateway asked for an immediate beat
                self.connection.record_heartbeat();
                let beat = GatewayMessage::heartbeat(self.connection.sequence());
                self.connection
                    .send(beat)
                    .await
                    .err()
                    .map(|e| SocketOutcome::Reconnect {
                        resume: true,
                        reason: e.to_string(),
                    })
            }
            OpCode::HeartbeatAck => {
                self.connection.ack_heartbeat();
                tracing::trace!(latency = ?self.connection.latency(), "Heartbeat acknowledged");
                None
            }
            OpCode::Reconnect => Some(SocketOutcome::Reconnect {
                resume: true,
                reason: "gateway requested reconnect".to_string(),
            }),
            OpCode::InvalidSession => {
                let resumable = message.as_invalid_session().unwrap_or(false);
                tracing::warn!(resumable, "Gateway invalidated the session");
                if ready.is_some() {
                    Some(SocketOutcome::Fatal(GatewayError::InvalidSession))
                } else {
                    Some(SocketOutcome::Reconnect {
                        resume: resumable,
                        reason: "invalid session".to_string(),
                    })
                }
            }
            op => {
                tracing::debug!(op = %op, "Ignoring unexpected gateway op");
                None
            }
        }
    }

    fn handle_dispatch(
        &self,
        message: GatewayMessage,
        ready: &mut Option<ReadySender>,
    ) -> Option<SocketOutcome> {
        let Some(name) = message.t else {
            tracing::warn!("Dispatch without event name");
            return None;
        };
        let data = message.d.unwrap_or_default();

        let event = match GatewayEvent::decode(&name, data.clone()) {
            Ok(event) => event,
            Err(e) if name == GatewayEventType::Ready.as_str() => {
                return Some(SocketOutcome::Fatal(GatewayError::Payload(e)));
            }
            Err(e) => {
                tracing::warn!(event = %name, error = %e, "Malformed dispatch payload");
                GatewayEvent::untyped(name, data)
            }
        };

        let established = match event.payload() {
            EventPayload::Ready(ready_event) => {
                self.connection.set_resume_info(ResumeInfo {
                    session_id: ready_event.session_id.clone(),
                    resume_url: ready_event.resume_gateway_url.clone(),
                });
                self.connection.set_state(ConnectionState::Connected);
                tracing::info!(
                    user = %ready_event.user.tag(),
                    guilds = ready_event.guilds.len(),
                    "Gateway session ready"
                );
                true
            }
            EventPayload::Resumed(_) => {
                self.connection.set_state(ConnectionState::Connected);
                tracing::info!("Gateway session resumed");
                true
            }
            _ => false,
        };

        self.dispatcher.dispatch(&event);

        if established {
            if let Some(tx) = ready.take() {
                let _ = tx.send(Ok(()));
            }
        }

        None
    }

    async fn reconnect(&self, reason: &str) -> Option<(GatewaySocket, HelloPayload)> {
        for attempt in 1..=self.config.reconnect_attempts {
            tracing::warn!(attempt, reason, "Reconnecting to gateway");

            tokio::select! {
                () = self.shutdown.cancelled() => return None,
                () = tokio::time::sleep(self.config.reconnect_delay) => {}
            }

            let url = match self.connection.resume_info() {
                Some(ResumeInfo {
                    resume_url: Some(resume_url),
                    ..
                }) => self.config.resume_endpoint(&resume_url),
                _ => self.config.url.clone(),
            };

            match connect(&url).await {
                Ok(next) => return Some(next),
                Err(e) => tracing::warn!(attempt, error = %e, "Reconnect attempt failed"),
            }
        }

        tracing::error!(
            attempts = self.config.reconnect_attempts,
            "Giving up on gateway reconnect"
        );
        None
    }

    fn fail(&self, ready: &mut Option<ReadySender>, err: GatewayError) {
        match ready.take() {
            Some(tx) => {
                let _ = tx.send(Err(err));
            }
            None => tracing::error!(error = %err, "Gateway session terminated"),
        }
    }
}

fn classify_close(frame: Option<CloseFrame<'static>>) -> SocketOutcome {
    let Some(frame) = frame else {
        return SocketOutcome::Reconnect {
            resume: true,
            reason: "closed without a code".to_string(),
        };
    };

    let code = u16::from(frame.code);
    match CloseCode::from_u16(code) {
        Some(known) if known.should_reconnect() => SocketOutcome::Reconnect {
            resume: known.can_resume(),
            reason: known.to_string(),
        },
        Some(_) => SocketOutcome::Fatal(GatewayError::from_close(code, &frame.reason)),
        None => SocketOutcome::Reconnect {
            resume: !matches!(code, 1000 | 1001),
            reason: format!("closed with code {code}"),
        },
    }
}

async fn write_loop(
    mut sink: SplitSink<GatewaySocket, Message>,
    mut rx: mpsc::Receiver<GatewayMessage>,
    mut close_rx: oneshot::Receiver<u16>,
) {
    loop {
        tokio::select! {
            biased;
            code = &mut close_rx => {
                if let Ok(code) = code {
                    let frame = CloseFrame {
                        code: WsCloseCode::from(code),
                        reason: Cow::Borrowed(""),
                    };
                    let _ = sink.send(Message::Close(Some(frame))).await;
                }
                break;
            }
            message = rx.recv() => {
                let Some(message) = message else { break };
                match message.to_json() {
                    Ok(json) => {
                        if let Err(e) = sink.send(Message::Text(json)).await {
                            tracing::warn!(error = %e, "Failed to send gateway frame");
                            break;
                        }
                        tracing::trace!(op = %message.op, "Sent gateway frame");
                    }
                    Err(e) => tracing::warn!(error = %e, "Failed to encode gateway frame"),
                }
            }
        }
    }

    let _ = sink.close().await;
}

/// Beat every `interval`, first after a random fraction of it.
///
/// Returns the reason the link is considered dead.
async fn heartbeat_loop(connection: Arc<Connection>, interval: Duration) -> String {
    let interval = interval.max(MIN_HEARTBEAT_INTERVAL);
    let jitter = interval.mul_f64(rand::random::<f64>());

    let mut ticker = interval_at(Instant::now() + jitter, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        if !connection.is_heartbeat_acked() {
            tracing::warn!("Connection zombied (heartbeat not ACKed)");
            return "heartbeat not acknowledged".to_string();
        }

        connection.record_heartbeat();
        if let Err(e) = connection.send(GatewayMessage::heartbeat(connection.sequence())).await {
            return e.to_string();
        }
        tracing::trace!(seq = ?connection.sequence(), "Heartbeat sent");
    }
}

/// Handle returned by `spawn`
pub(crate) struct RunningDriver {
    pub(crate) shutdown: CancellationToken,
    pub(crate) task: JoinHandle<()>,
}
