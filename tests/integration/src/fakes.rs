//! In-memory collaborators
//!
//! `FakeGateway` dispatches its scripted events synchronously inside the
//! call that triggers them, the tightest ordering a real session can produce.

use std::collections::HashMap;

use async_trait::async_trait;
use chat_core::{
    Channel, Guild, Message, RestClient, RestError, RestResult, Role, Snowflake, User, UserTarget,
};
use chat_gateway::{
    ConnectionState, EventDispatcher, GatewayEvent, GatewayResult, GatewayTransport,
    PresenceUpdatePayload,
};
use parking_lot::Mutex;
use serde_json::json;

/// Calls observed by a fake
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Open,
    Close,
    RequestMembers(Snowflake),
    UpdatePresence(PresenceUpdatePayload),
    SendMessage(Snowflake, String),
    Guild(Snowflake),
    GuildRoles(Snowflake),
    GuildChannels(Snowflake),
    User(UserTarget),
}

/// Shared call log
#[derive(Debug, Default)]
pub struct CallLog(Mutex<Vec<Call>>);

impl CallLog {
    pub fn push(&self, call: Call) {
        self.0.lock().push(call);
    }

    pub fn all(&self) -> Vec<Call> {
        self.0.lock().clone()
    }

    pub fn count_where(&self, f: impl Fn(&Call) -> bool) -> usize {
        self.0.lock().iter().filter(|c| f(c)).count()
    }
}

/// Gateway fake with a READY guild list and per-guild member pages
#[derive(Default)]
pub struct FakeGateway {
    dispatcher: EventDispatcher,
    state: Mutex<ConnectionState>,
    guilds: Vec<Snowflake>,
    members: HashMap<Snowflake, Vec<User>>,
    pub log: CallLog,
}

impl FakeGateway {
    pub fn new(guilds: &[u64]) -> Self {
        Self {
            guilds: guilds.iter().copied().map(Snowflake::new).collect(),
            ..Self::default()
        }
    }

    /// Members returned for `guild`, delivered as one page
    #[must_use]
    pub fn with_members(mut self, guild: u64, users: Vec<User>) -> Self {
        self.members.insert(Snowflake::new(guild), users);
        self
    }

    /// READY as the gateway sends it, unavailable guilds and all
    fn ready(&self) -> GatewayEvent {
        let guilds: Vec<_> = self
            .guilds
            .iter()
            .map(|id| json!({"id": id, "unavailable": true}))
            .collect();
        let data = json!({
            "v": 10,
            "user": {"id": "1", "username": "tester", "discriminator": "0001"},
            "guilds": guilds,
            "session_id": "fake"
        });
        GatewayEvent::decode("READY", data).expect("READY fixture")
    }

    /// One member page, with a field the client has no model for
    fn page(&self, guild_id: Snowflake) -> GatewayEvent {
        let members: Vec<_> = self
            .members
            .get(&guild_id)
            .into_iter()
            .flatten()
            .map(|user| json!({"user": user, "roles": []}))
            .collect();
        let data = json!({
            "guild_id": guild_id,
            "members": members,
            "chunk_index": 0,
            "chunk_count": 1,
            "not_found": []
        });
        GatewayEvent::decode("GUILD_MEMBERS_CHUNK", data).expect("member page fixture")
    }
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
        self.log.push(Call::Open);
        *self.state.lock() = ConnectionState::Connected;
        self.dispatcher.dispatch(&self.ready());
        Ok(())
    }

    async fn close(&self) -> GatewayResult<()> {
        self.log.push(Call::Close);
        *self.state.lock() = ConnectionState::Disconnected;
        Ok(())
    }

    async fn request_guild_members(
        &self,
        guild_id: Snowflake,
        _query: &str,
        _limit: u32,
    ) -> GatewayResult<()> {
        self.log.push(Call::RequestMembers(guild_id));
        self.dispatcher.dispatch(&self.page(guild_id));
        Ok(())
    }

    async fn update_presence(&self, presence: PresenceUpdatePayload) -> GatewayResult<()> {
        self.log.push(Call::UpdatePresence(presence));
        Ok(())
    }
}

/// REST fake that accepts messages and serves fixed records
#[derive(Default)]
pub struct FakeRest {
    pub guilds: HashMap<Snowflake, Guild>,
    pub roles: HashMap<Snowflake, Vec<Role>>,
    pub channels: HashMap<Snowflake, Vec<Channel>>,
    pub users: HashMap<UserTarget, User>,
    pub log: CallLog,
}

fn unknown(what: &str) -> RestError {
    RestError::NotFound(format!("Unknown {what}"))
}

#[async_trait]
impl RestClient for FakeRest {
    async fn send_channel_message(&self, channel_id: Snowflake, content: &str) -> RestResult<Message> {
        self.log
            .push(Call::SendMessage(channel_id, content.to_string()));
        serde_json::from_value(json!({
            "id": "1000",
            "channel_id": channel_id,
            "content": content
        }))
        .map_err(|e| RestError::Decode(e.to_string()))
    }

    async fn guild(&self, guild_id: Snowflake) -> RestResult<Guild> {
        self.log.push(Call::Guild(guild_id));
        self.guilds.get(&guild_id).cloned().ok_or_else(|| unknown("Guild"))
    }

    async fn guild_roles(&self, guild_id: Snowflake) -> RestResult<Vec<Role>> {
        self.log.push(Call::GuildRoles(guild_id));
        self.roles.get(&guild_id).cloned().ok_or_else(|| unknown("Guild"))
    }

    async fn guild_channels(&self, guild_id: Snowflake) -> RestResult<Vec<Channel>> {
        self.log.push(Call::GuildChannels(guild_id));
        self.channels.get(&guild_id).cloned().ok_or_else(|| unknown("Guild"))
    }

    async fn user(&self, target: UserTarget) -> RestResult<User> {
        self.log.push(Call::User(target));
        self.users.get(&target).cloned().ok_or_else(|| unknown("User"))
    }
}
