//! Guild endpoints

use crate::client::HttpRestClient;
use crate::routes::Route;
use chat_core::{Guild, RestResult, Snowflake};

impl HttpRestClient {
    /// Get guild by ID
    ///
    /// GET /guilds/{guild_id}
    pub async fn get_guild(&self, guild_id: Snowflake) -> RestResult<Guild> {
        self.get(Route::Guild { guild_id }).await
    }
}
