//! Gateway session tests against the scripted local gateway
//!
//! Run with: cargo test -p integration-tests --test gateway_wire_tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chat_cli::Backend;
use chat_common::Token;
use chat_core::Snowflake;
use chat_gateway::{
    ConnectionState, GatewayError, GatewaySession, GatewayTransport, PresenceUpdatePayload,
    SessionConfig,
};
use integration_tests::gateway_server::{
    gateway_router, Disruption, GatewayScript, GatewayStubState, ResumeReply, GATEWAY_PATH,
    SESSION_ID,
};
use integration_tests::rest_server::{rest_router, RestStubState};
use integration_tests::{run_cli_within, test_config, test_env, user_json, TestServer, TEST_TOKEN};
use parking_lot::Mutex;

const LIMIT: Duration = Duration::from_secs(10);

async fn start(script: GatewayScript) -> (TestServer, GatewayStubState) {
    let state = GatewayStubState::new(script);
    let server = TestServer::start(gateway_router(state.clone()))
        .await
        .expect("Failed to start gateway stub");
    (server, state)
}

fn session(server: &TestServer, token: &str) -> GatewaySession {
    let config = test_config("http://unused", &server.ws_url(GATEWAY_PATH)).unwrap();
    GatewaySession::new(SessionConfig::new(Token::from(token), &config.gateway))
}

/// Session that retries a dropped socket `attempts` times
fn retrying_session(server: &TestServer, attempts: u32) -> GatewaySession {
    let config = test_config("http://unused", &server.ws_url(GATEWAY_PATH)).unwrap();
    let mut session_config = SessionConfig::new(Token::from(TEST_TOKEN), &config.gateway);
    session_config.reconnect_attempts = attempts;
    GatewaySession::new(session_config)
}

/// Names of every dispatched event, in delivery order
fn record_events(session: &GatewaySession) -> Arc<Mutex<Vec<String>>> {
    let names = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&names);
    session
        .dispatcher()
        .on_any(move |event| sink.lock().push(event.name().to_string()));
    names
}

/// Poll until `check` holds or the limit passes
async fn eventually(check: impl Fn() -> bool) -> bool {
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    check()
}

// ============================================================================
// Session lifecycle
// ============================================================================

#[tokio::test]
async fn test_open_identifies_and_dispatches_ready() {
    let (server, state) = start(GatewayScript::default().with_guilds(&[11, 12])).await;
    let session = session(&server, TEST_TOKEN);

    let guilds = Arc::new(Mutex::new(Vec::new()));
    {
        let guilds = Arc::clone(&guilds);
        session
            .dispatcher()
            .on_ready(move |ready| *guilds.lock() = ready.guild_ids());
    }

    session.open().await.unwrap();

    // READY was handled before open returned
    assert_eq!(
        *guilds.lock(),
        [Snowflake::new(11), Snowflake::new(12)]
    );
    assert_eq!(session.state(), ConnectionState::Connected);

    let identify = state.received_op(2);
    assert_eq!(identify.len(), 1);
    assert_eq!(identify[0]["d"]["token"], TEST_TOKEN);
    assert_eq!(identify[0]["d"]["intents"], session.config().intents);
    assert_eq!(state.connections(), 1);

    session.close().await.unwrap();
    assert_eq!(session.state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn test_wrong_token_fails_open() {
    let (server, state) = start(GatewayScript::default()).await;
    let session = session(&server, "not-the-token");

    let err = session.open().await.unwrap_err();

    assert!(matches!(err, GatewayError::AuthenticationFailed(_)));
    assert_eq!(session.state(), ConnectionState::Disconnected);
    // Fatal close codes are not retried
    assert_eq!(state.connections(), 1);
}

#[tokio::test]
async fn test_open_twice_is_rejected() {
    let (server, _) = start(GatewayScript::default()).await;
    let session = session(&server, TEST_TOKEN);

    session.open().await.unwrap();
    assert!(matches!(session.open().await, Err(GatewayError::AlreadyOpen)));

    session.close().await.unwrap();
}

#[tokio::test]
async fn test_heartbeats_are_acknowledged() {
    let (server, state) = start(GatewayScript::default().with_heartbeat_interval(50)).await;
    let session = session(&server, TEST_TOKEN);

    session.open().await.unwrap();

    assert!(eventually(|| state.received_op(1).len() >= 3).await);
    assert_eq!(session.state(), ConnectionState::Connected);
    assert_eq!(state.connections(), 1);

    session.close().await.unwrap();
}

// ============================================================================
// Reconnect and resume
// ============================================================================

#[tokio::test]
async fn test_dropped_socket_resumes_session() {
    let script = GatewayScript::default()
        .with_guilds(&[11])
        .with_disruptions(&[Disruption::Close(4000)]);
    let (server, state) = start(script).await;
    let session = retrying_session(&server, 3);
    let events = record_events(&session);

    session.open().await.unwrap();

    assert!(eventually(|| events.lock().len() == 2).await);
    assert_eq!(*events.lock(), ["READY", "RESUMED"]);
    assert!(eventually(|| session.state() == ConnectionState::Connected).await);

    let resume = state.received_op(6);
    assert_eq!(resume.len(), 1);
    assert_eq!(resume[0]["d"]["session_id"], SESSION_ID);
    assert_eq!(resume[0]["d"]["seq"], 1);
    assert_eq!(resume[0]["d"]["token"], TEST_TOKEN);
    // No second Identify
    assert_eq!(state.received_op(2).len(), 1);
    assert_eq!(state.connections(), 2);

    session.close().await.unwrap();
}

#[tokio::test]
async fn test_reconnect_request_resumes_session() {
    let script = GatewayScript::default().with_disruptions(&[Disruption::Reconnect]);
    let (server, state) = start(script).await;
    let session = retrying_session(&server, 3);
    let events = record_events(&session);

    session.open().await.unwrap();

    assert!(eventually(|| events.lock().len() == 2).await);
    assert_eq!(*events.lock(), ["READY", "RESUMED"]);
    // The old socket was closed in a resumable way
    assert!(eventually(|| state.client_closes() == [Some(4000)]).await);
    assert_eq!(state.received_op(6).len(), 1);
    assert_eq!(state.received_op(2).len(), 1);

    // The resumed session keeps working
    session
        .request_guild_members(Snowflake::new(5), "", 0)
        .await
        .unwrap();
    assert!(eventually(|| events.lock().len() == 3).await);
    assert_eq!(events.lock()[2], "GUILD_MEMBERS_CHUNK");

    session.close().await.unwrap();
}

#[tokio::test]
async fn test_invalid_session_identifies_again() {
    let script = GatewayScript::default()
        .with_guilds(&[11])
        .with_disruptions(&[Disruption::InvalidSession(false)]);
    let (server, state) = start(script).await;
    let session = retrying_session(&server, 3);
    let events = record_events(&session);

    session.open().await.unwrap();

    assert!(eventually(|| state.received_op(2).len() == 2).await);
    assert!(eventually(|| events.lock().len() == 2).await);
    assert_eq!(*events.lock(), ["READY", "READY"]);
    assert!(state.received_op(6).is_empty());
    assert_eq!(state.connections(), 2);
    assert!(eventually(|| session.state() == ConnectionState::Connected).await);

    session.close().await.unwrap();
}

#[tokio::test]
async fn test_resumable_invalid_session_resumes() {
    let script = GatewayScript::default().with_disruptions(&[Disruption::InvalidSession(true)]);
    let (server, state) = start(script).await;
    let session = retrying_session(&server, 3);
    let events = record_events(&session);

    session.open().await.unwrap();

    assert!(eventually(|| events.lock().len() == 2).await);
    assert_eq!(*events.lock(), ["READY", "RESUMED"]);
    assert_eq!(state.received_op(6).len(), 1);

    session.close().await.unwrap();
}

#[tokio::test]
async fn test_rejected_resume_falls_back_to_identify() {
    let script = GatewayScript::default()
        .with_disruptions(&[Disruption::Close(4000)])
        .with_resume_reply(ResumeReply::Reject);
    let (server, state) = start(script).await;
    let session = retrying_session(&server, 3);
    let events = record_events(&session);

    session.open().await.unwrap();

    assert!(eventually(|| events.lock().len() == 2).await);
    assert_eq!(*events.lock(), ["READY", "READY"]);
    assert_eq!(state.received_op(6).len(), 1);
    assert_eq!(state.received_op(2).len(), 2);
    assert_eq!(state.connections(), 3);

    session.close().await.unwrap();
}

#[tokio::test]
async fn test_reconnect_gives_up_after_attempts() {
    let script = GatewayScript::default()
        .with_disruptions(&[Disruption::Close(4000)])
        .with_max_connections(1);
    let (server, state) = start(script).await;
    let session = retrying_session(&server, 3);

    session.open().await.unwrap();

    assert!(eventually(|| session.state() == ConnectionState::Disconnected).await);
    // One accepted connection, then exactly three refused retries
    assert_eq!(state.attempts(), 4);
    assert_eq!(state.connections(), 1);
    assert!(matches!(
        session.request_guild_members(Snowflake::new(5), "", 0).await,
        Err(GatewayError::NotConnected)
    ));

    // Nothing else is tried afterwards
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(state.attempts(), 4);
}

// ============================================================================
// Client operations
// ============================================================================

#[tokio::test]
async fn test_member_request_delivers_chunk() {
    let script = GatewayScript::default().with_guilds(&[21]).with_members(
        21,
        vec![user_json(501, "alpha", "0001"), user_json(502, "beta", "0002")],
    );
    let (server, state) = start(script).await;
    let session = session(&server, TEST_TOKEN);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let chunks = Arc::new(AtomicUsize::new(0));
    {
        let seen = Arc::clone(&seen);
        let chunks = Arc::clone(&chunks);
        session.dispatcher().on_guild_members_chunk(move |chunk| {
            chunks.fetch_add(1, Ordering::SeqCst);
            seen.lock()
                .extend(chunk.members.iter().map(|m| m.user.username.clone()));
        });
    }

    session.open().await.unwrap();
    session
        .request_guild_members(Snowflake::new(21), "", 0)
        .await
        .unwrap();

    assert!(eventually(|| chunks.load(Ordering::SeqCst) == 1).await);
    assert_eq!(*seen.lock(), ["alpha", "beta"]);

    let request = &state.received_op(8)[0];
    assert_eq!(request["d"]["guild_id"], "21");
    assert_eq!(request["d"]["query"], "");
    assert_eq!(request["d"]["limit"], 0);
    assert!(request["d"]["nonce"].is_string());

    session.close().await.unwrap();
}

#[tokio::test]
async fn test_update_presence_sends_frame() {
    let (server, state) = start(GatewayScript::default()).await;
    let session = session(&server, TEST_TOKEN);

    session.open().await.unwrap();
    session
        .update_presence(PresenceUpdatePayload::playing("chess"))
        .await
        .unwrap();

    assert!(eventually(|| state.received_op(3).len() == 1).await);
    let presence = &state.received_op(3)[0]["d"];
    assert_eq!(presence["status"], "online");
    assert_eq!(presence["activities"][0]["name"], "chess");
    assert_eq!(presence["afk"], false);

    session.close().await.unwrap();
}

// ============================================================================
// CLI over the wire
// ============================================================================

#[tokio::test]
async fn test_cli_gateway_action() {
    let (server, _) = start(GatewayScript::default().with_guilds(&[1])).await;
    let mut env = test_env("http://unused", &server.ws_url(GATEWAY_PATH));
    env.insert("DG_TOKEN".to_string(), TEST_TOKEN.to_string());

    let run = run_cli_within(LIMIT, &["gateway"], &env, Backend::connect)
        .await
        .unwrap();

    assert_eq!(run.code, 0, "stderr: {}", run.stderr);
    assert_eq!(
        run.stdout,
        "Ready received! Successfully connected to gateway, exiting...\n"
    );
    assert_eq!(run.stderr, "Success.\n");
}

#[tokio::test]
async fn test_cli_gateway_bad_token() {
    let (server, _) = start(GatewayScript::default()).await;
    let env = test_env("http://unused", &server.ws_url(GATEWAY_PATH));

    let run = run_cli_within(LIMIT, &["gateway", "-t", "bogus"], &env, Backend::connect)
        .await
        .unwrap();

    assert_eq!(run.code, 1);
    assert!(run.stderr.starts_with("An error occurred: Authentication failed"));
    assert!(run.stdout.is_empty());
}

#[tokio::test]
async fn test_cli_discrim_search() {
    let script = GatewayScript::default()
        .with_guilds(&[31, 32])
        .with_members(
            31,
            vec![user_json(601, "needle", "0042"), user_json(602, "hay", "1234")],
        )
        .with_members(32, vec![user_json(603, "straw", "0041")]);
    let (server, state) = start(script).await;
    let mut env = test_env("http://unused", &server.ws_url(GATEWAY_PATH));
    env.insert("DG_TOKEN".to_string(), TEST_TOKEN.to_string());

    let run = run_cli_within(LIMIT, &["discrimsearch", "-d", "0042"], &env, Backend::connect)
        .await
        .unwrap();

    assert_eq!(run.code, 0, "stderr: {}", run.stderr);
    assert_eq!(run.stdout, "\"needle\"#0042 (601)\n");

    let guilds: Vec<String> = state
        .received_op(8)
        .iter()
        .map(|frame| frame["d"]["guild_id"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(guilds, ["31", "32"]);
}

#[tokio::test]
async fn test_cli_rest_actions_over_http() {
    let rest_state = RestStubState::default();
    let rest = TestServer::start(rest_router(rest_state.clone())).await.unwrap();
    let mut env = test_env(&rest.base_url(), "ws://unused");
    env.insert("DG_TOKEN".to_string(), TEST_TOKEN.to_string());

    let run = run_cli_within(LIMIT, &["guildroles", "-g", "40"], &env, Backend::connect)
        .await
        .unwrap();
    assert_eq!(run.code, 0, "stderr: {}", run.stderr);
    assert!(run.stdout.contains("Role Moderators, ID: 41, Position: 1, Perms: 8"));
    assert!(run.stdout.ends_with("2 Guild roles\n"));

    let run = run_cli_within(LIMIT, &["guild", "-g", "404"], &env, Backend::connect)
        .await
        .unwrap();
    assert_eq!(run.code, 1);
    assert_eq!(run.stderr, "An error occurred: guild: Not found: Unknown Guild\n");

    let run = run_cli_within(LIMIT, &["sendmessage", "-c", "77", "-m", "over http"], &env, Backend::connect)
        .await
        .unwrap();
    assert_eq!(run.code, 0);

    let last = rest_state.requests().pop().unwrap();
    assert_eq!(last.path, "/channels/77/messages");
    assert_eq!(last.body.unwrap()["content"], "over http");
}
