//! Command line arguments

use chat_common::TracingConfig;
use chat_service::{ActionKind, ActionParams};
use clap::Parser;
use tracing::Level;

/// Command-line client for the chat platform's REST API and event gateway
#[derive(Parser, Debug, Clone)]
#[command(name = "chat-cli", author, version, about, after_help = ActionKind::table())]
pub struct Cli {
    /// Action to run, case-insensitive
    pub action: Option<String>,

    /// Token to use (falls back to DG_TOKEN)
    #[arg(short = 't', long)]
    pub token: Option<String>,

    /// Select a channel
    #[arg(short = 'c', long)]
    pub channel: Option<String>,

    /// Select a guild/server
    #[arg(short = 'g', long)]
    pub guild: Option<String>,

    /// Select a user
    #[arg(short = 'u', long)]
    pub user: Option<String>,

    /// Message to send
    #[arg(short = 'm', long)]
    pub message: Option<String>,

    /// Discriminator to search for
    #[arg(short = 'd', long = "discrim")]
    pub discriminator: Option<String>,

    /// User id to leave out of search results
    #[arg(short = 's', long)]
    pub skip: Option<String>,

    /// Presence to set
    #[arg(short = 'p', long)]
    pub presence: Option<String>,

    /// Log level when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    pub log_level: Level,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,
}

impl Cli {
    /// Raw parameters for action validation
    pub fn params(&self) -> ActionParams {
        ActionParams {
            channel: self.channel.clone(),
            guild: self.guild.clone(),
            user: self.user.clone(),
            message: self.message.clone(),
            discriminator: self.discriminator.clone(),
            skip: self.skip.clone(),
            presence: self.presence.clone(),
        }
    }

    /// Requested action, if the name is known
    pub fn action_kind(&self) -> Option<ActionKind> {
        self.action.as_deref().and_then(ActionKind::from_name)
    }

    /// Logging setup for this invocation
    pub fn tracing_config(&self) -> TracingConfig {
        let config = TracingConfig::default()
            .with_level(self.log_level)
            .with_json(self.json_logs);

        // Event dumps are easier to follow alongside the session's own logs
        if self.action_kind() == Some(ActionKind::DumpAll) {
            config.with_directive("chat_gateway=debug")
        } else {
            config
        }
    }
}
