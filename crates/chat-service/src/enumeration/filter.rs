//! Discriminator match predicate

use chat_core::{Snowflake, User};

/// Selects users by discriminator, optionally excluding one user id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscriminatorFilter {
    discriminator: String,
    skip: Option<Snowflake>,
}

impl DiscriminatorFilter {
    pub fn new(discriminator: impl Into<String>, skip: Option<Snowflake>) -> Self {
        Self {
            discriminator: discriminator.into(),
            skip,
        }
    }

    #[must_use]
    pub fn discriminator(&self) -> &str {
        &self.discriminator
    }

    #[must_use]
    pub fn skip(&self) -> Option<Snowflake> {
        self.skip
    }

    #[must_use]
    pub fn matches(&self, user: &User) -> bool {
        user.discriminator == self.discriminator && self.skip != Some(user.id)
    }

    /// Output line for a matched user: quoted username, discriminator, id
    #[must_use]
    pub fn format_match(user: &User) -> String {
        format!("{:?}#{} ({})", user.username, user.discriminator, user.id)
    }
}
