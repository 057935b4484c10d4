//! Message endpoints

use crate::client::HttpRestClient;
use crate::routes::Route;
use chat_core::{CreateMessage, Message, RestResult, Snowflake};

impl HttpRestClient {
    /// Post a message to a channel
    ///
    /// POST /channels/{channel_id}/messages
    pub async fn create_message(
        &self,
        channel_id: Snowflake,
        body: &CreateMessage,
    ) -> RestResult<Message> {
        self.send_json(Route::CreateMessage { channel_id }, body).await
    }
}
