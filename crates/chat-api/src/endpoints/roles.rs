//! Role endpoints

use crate::client::HttpRestClient;
use crate::routes::Route;
use chat_core::{RestResult, Role, Snowflake};

impl HttpRestClient {
    /// Get all roles in a guild
    ///
    /// GET /guilds/{guild_id}/roles
    pub async fn get_guild_roles(&self, guild_id: Snowflake) -> RestResult<Vec<Role>> {
        self.get(Route::GuildRoles { guild_id }).await
    }
}
