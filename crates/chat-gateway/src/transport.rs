//! Gateway transport abstraction
//!
//! Actions talk to the gateway through this trait so they can be driven by
//! the real WebSocket session or by an in-process fake.

use crate::connection::ConnectionState;
use crate::dispatch::EventDispatcher;
use crate::error::GatewayResult;
use crate::protocol::PresenceUpdatePayload;
use async_trait::async_trait;
use chat_core::Snowflake;

/// A live gateway connection
#[async_trait]
pub trait GatewayTransport: Send + Sync {
    /// Handler registry; register before `open` to see READY
    fn dispatcher(&self) -> &EventDispatcher;

    /// Current connection state
    fn state(&self) -> ConnectionState;

    /// Connect, identify, and wait until READY has been dispatched
    async fn open(&self) -> GatewayResult<()>;

    /// Close the connection
    async fn close(&self) -> GatewayResult<()>;

    /// Ask for the members of a guild, answered by GUILD_MEMBERS_CHUNK events.
    ///
    /// An empty `query` with `limit` 0 requests every member.
    async fn request_guild_members(
        &self,
        guild_id: Snowflake,
        query: &str,
        limit: u32,
    ) -> GatewayResult<()>;

    /// Update the account's presence
    async fn update_presence(&self, presence: PresenceUpdatePayload) -> GatewayResult<()>;
}
