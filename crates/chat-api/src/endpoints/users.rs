//! User endpoints

use crate::client::HttpRestClient;
use crate::routes::Route;
use chat_core::{RestResult, User, UserTarget};

impl HttpRestClient {
    /// Get a user, or the authenticated user
    ///
    /// GET /users/{user_id} or GET /users/@me
    pub async fn get_user(&self, target: UserTarget) -> RestResult<User> {
        self.get(Route::User { target }).await
    }
}
