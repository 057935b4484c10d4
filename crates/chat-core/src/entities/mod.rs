//! Records returned by the platform's REST API and gateway

mod channel;
mod guild;
mod member;
mod message;
mod role;
mod user;

pub use channel::Channel;
pub use guild::Guild;
pub use member::GuildMember;
pub use message::{CreateMessage, Message};
pub use role::Role;
pub use user::User;
