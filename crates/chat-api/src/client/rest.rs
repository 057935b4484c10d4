//! [`RestClient`] implementation for the HTTP client

use super::HttpRestClient;
use async_trait::async_trait;
use chat_core::{
    Channel, CreateMessage, Guild, Message, RestClient, RestResult, Role, Snowflake, User,
    UserTarget,
};

#[async_trait]
impl RestClient for HttpRestClient {
    async fn send_channel_message(&self, channel_id: Snowflake, content: &str) -> RestResult<Message> {
        self.create_message(channel_id, &CreateMessage::text(content)).await
    }

    async fn guild(&self, guild_id: Snowflake) -> RestResult<Guild> {
        self.get_guild(guild_id).await
    }

    async fn guild_roles(&self, guild_id: Snowflake) -> RestResult<Vec<Role>> {
        self.get_guild_roles(guild_id).await
    }

    async fn guild_channels(&self, guild_id: Snowflake) -> RestResult<Vec<Channel>> {
        self.get_guild_channels(guild_id).await
    }

    async fn user(&self, target: UserTarget) -> RestResult<User> {
        self.get_user(target).await
    }
}
