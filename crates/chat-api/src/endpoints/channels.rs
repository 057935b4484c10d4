//! Channel endpoints

use crate::client::HttpRestClient;
use crate::routes::Route;
use chat_core::{Channel, RestResult, Snowflake};

impl HttpRestClient {
    /// Get all channels in a guild
    ///
    /// GET /guilds/{guild_id}/channels
    pub async fn get_guild_channels(&self, guild_id: Snowflake) -> RestResult<Vec<Channel>> {
        self.get(Route::GuildChannels { guild_id }).await
    }
}
