//! In-memory collaborators for unit tests

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chat_core::{
    Channel, Guild, Message, RestClient, RestError, RestResult, Role, Snowflake, User,
    UserTarget,
};
use chat_gateway::{
    ConnectionState, EventDispatcher, GatewayError, GatewayEvent, GatewayResult,
    GatewayTransport, PresenceUpdatePayload,
};
use parking_lot::Mutex;
use serde_json::json;
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    Open,
    Close,
    RequestMembers(Snowflake),
    UpdatePresence(PresenceUpdatePayload),
}

/// Gateway that dispatches scripted events synchronously inside its calls
#[derive(Default)]
pub struct FakeGateway {
    dispatcher: EventDispatcher,
    state: Mutex<ConnectionState>,
    ready_guilds: Option<Vec<Snowflake>>,
    open_error: Mutex<Option<GatewayError>>,
    pages: HashMap<Snowflake, Vec<GatewayEvent>>,
    failing: HashSet<Snowflake>,
    calls: Mutex<Vec<(GatewayCall, Instant)>>,
}

impl FakeGateway {
    /// Gateway that fires READY listing `guilds` during `open`
    pub fn ready_with(guilds: &[u64]) -> Self {
        Self {
            ready_guilds: Some(guilds.iter().copied().map(Snowflake::new).collect()),
            ..Self::default()
        }
    }

    /// Gateway whose `open` fails
    pub fn failing_open(err: GatewayError) -> Self {
        Self {
            open_error: Mutex::new(Some(err)),
            ..Self::default()
        }
    }

    /// Answer a member request for `guild` with one page of `users`
    pub fn with_page(mut self, guild: u64, users: Vec<User>) -> Self {
        let guild_id = Snowflake::new(guild);
        let members: Vec<_> = users.iter().map(|user| json!({"user": user})).collect();
        let page = GatewayEvent::decode(
            "GUILD_MEMBERS_CHUNK",
            json!({"guild_id": guild_id, "members": members, "chunk_index": 0, "chunk_count": 1}),
        )
        .expect("valid member page");
        self.pages.entry(guild_id).or_default().push(page);
        self
    }

    /// Fail member requests for `guild`
    pub fn with_failing_guild(mut self, guild: u64) -> Self {
        self.failing.insert(Snowflake::new(guild));
        self
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().iter().map(|(call, _)| call.clone()).collect()
    }

    pub fn timed_calls(&self) -> Vec<(GatewayCall, Instant)> {
        self.calls.lock().clone()
    }

    pub fn count(&self, call: &GatewayCall) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    fn record(&self, call: GatewayCall) {
        self.calls.lock().push((call, Instant::now()));
    }
}

pub fn ready_event(guilds: &[Snowflake]) -> GatewayEvent {
    let guilds: Vec<_> = guilds.iter().map(|id| json!({"id": id, "unavailable": true})).collect();
    let data = json!({
        "v": 10,
        "user": {"id": "1", "username": "me", "discriminator": "0001"},
        "guilds": guilds,
        "session_id": "fake-session"
    });
    GatewayEvent::decode("READY", data).expect("valid READY")
}

#[async_trait]
impl GatewayTransport for FakeGateway {
    fn dispatcher(&self) -> &EventDispatcher {
        &self.dispatcher
    }

    fn state(&self) -> ConnectionState {
        *self.state.lock()
    }

    async fn open(&self) -> GatewayResult<()> {
        self.record(GatewayCall::Open);
        if let Some(err) = self.open_error.lock().take() {
            return Err(err);
        }
        *self.state.lock() = ConnectionState::Connected;
        if let Some(guilds) = &self.ready_guilds {
            self.dispatcher.dispatch(&ready_event(guilds));
        }
        Ok(())
    }

    async fn close(&self) -> GatewayResult<()> {
        self.record(GatewayCall::Close);
        *self.state.lock() = ConnectionState::Disconnected;
        Ok(())
    }

    async fn request_guild_members(
        &self,
        guild_id: Snowflake,
        _query: &str,
        _limit: u32,
    ) -> GatewayResult<()> {
        self.record(GatewayCall::RequestMembers(guild_id));
        if self.failing.contains(&guild_id) {
            return Err(GatewayError::NotConnected);
        }
        for page in self.pages.get(&guild_id).into_iter().flatten() {
            self.dispatcher.dispatch(page);
        }
        Ok(())
    }

    async fn update_presence(&self, presence: PresenceUpdatePayload) -> GatewayResult<()> {
        self.record(GatewayCall::UpdatePresence(presence));
        Ok(())
    }
}

/// REST client backed by fixed records
#[derive(Default)]
pub struct FakeRest {
    pub guilds: HashMap<Snowflake, Guild>,
    pub roles: HashMap<Snowflake, Vec<Role>>,
    pub channels: HashMap<Snowflake, Vec<Channel>>,
    pub users: HashMap<UserTarget, User>,
    pub sent: Mutex<Vec<(Snowflake, String)>>,
    pub reject_messages: bool,
}

#[async_trait]
impl RestClient for FakeRest {
    async fn send_channel_message(&self, channel_id: Snowflake, content: &str) -> RestResult<Message> {
        if self.reject_messages {
            return Err(RestError::Forbidden("Missing Access".into()));
        }
        self.sent.lock().push((channel_id, content.to_string()));
        serde_json::from_value(json!({
            "id": "900",
            "channel_id": channel_id,
            "content": content,
            "author": {"id": "1", "username": "me", "discriminator": "0001"}
        }))
        .map_err(|e| RestError::Decode(e.to_string()))
    }

    async fn guild(&self, guild_id: Snowflake) -> RestResult<Guild> {
        self.guilds
            .get(&guild_id)
            .cloned()
            .ok_or_else(|| RestError::NotFound("Unknown Guild".into()))
    }

    async fn guild_roles(&self, guild_id: Snowflake) -> RestResult<Vec<Role>> {
        self.roles
            .get(&guild_id)
            .cloned()
            .ok_or_else(|| RestError::NotFound("Unknown Guild".into()))
    }

    async fn guild_channels(&self, guild_id: Snowflake) -> RestResult<Vec<Channel>> {
        self.channels
            .get(&guild_id)
            .cloned()
            .ok_or_else(|| RestError::NotFound("Unknown Guild".into()))
    }

    async fn user(&self, target: UserTarget) -> RestResult<User> {
        self.users
            .get(&target)
            .cloned()
            .ok_or_else(|| RestError::NotFound("Unknown User".into()))
    }
}

pub fn user(id: u64, username: &str, discriminator: &str) -> User {
    User::new(Snowflake::new(id), username, discriminator)
}
