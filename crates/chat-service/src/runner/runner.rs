//! Action runner
//!
//! Wires handlers, opens the gateway, waits for completion, and closes it.
//! REST actions make a single call and print the result.

use std::fmt::Display;
use std::sync::Arc;

use chat_core::{Snowflake, UserTarget};
use chat_gateway::PresenceUpdatePayload;
use tracing::{debug, info, instrument, warn};

use super::format::{role_line, to_indented_json};
use super::RunnerContext;
use crate::actions::Action;
use crate::enumeration::{DiscriminatorFilter, MemberEnumeration};
use crate::error::{ActionError, ActionResult};
use crate::signal::CompletionSignal;

/// Runs one [`Action`] against the collaborators in a [`RunnerContext`]
#[derive(Debug, Clone)]
pub struct ActionRunner {
    ctx: RunnerContext,
}

impl ActionRunner {
    pub fn new(ctx: RunnerContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &RunnerContext {
        &self.ctx
    }

    /// Run `action` to completion
    #[instrument(skip(self, action), fields(action = action.name()))]
    pub async fn run(&self, action: Action) -> ActionResult<()> {
        debug!(?action, "Running action");
        match action {
            Action::SendMessage { channel, message } => self.send_message(channel, &message).await,
            Action::Gateway => self.check_gateway().await,
            Action::DumpAll => self.dump_all().await,
            Action::GuildRoles { guild } => self.guild_roles(guild).await,
            Action::Guild { guild } => self.guild(guild).await,
            Action::DiscrimSearch {
                discriminator,
                skip,
            } => self.discrim_search(discriminator, skip).await,
            Action::DumpUser { user } => self.dump_user(user).await,
            Action::Channels { guild } => self.channels(guild).await,
            Action::SetPresence { presence } => self.set_presence(&presence).await,
        }
    }

    // === REST actions ===

    async fn send_message(&self, channel: Snowflake, message: &str) -> ActionResult<()> {
        let sent = self
            .ctx
            .rest()
            .send_channel_message(channel, message)
            .await
            .map_err(ActionError::rest("sendmessage"))?;
        info!(channel_id = %channel, message_id = %sent.id, "Message sent");
        Ok(())
    }

    async fn guild_roles(&self, guild: Snowflake) -> ActionResult<()> {
        let roles = self
            .ctx
            .rest()
            .guild_roles(guild)
            .await
            .map_err(ActionError::rest("guildroles"))?;

        let mut lines: Vec<String> = roles.iter().map(role_line).collect();
        lines.push(format!("{} Guild roles", roles.len()));
        self.print(lines.join("\n"))
    }

    async fn guild(&self, guild: Snowflake) -> ActionResult<()> {
        let guild = self
            .ctx
            .rest()
            .guild(guild)
            .await
            .map_err(ActionError::rest("guild"))?;
        self.print(to_indented_json(&guild)?)
    }

    async fn channels(&self, guild: Snowflake) -> ActionResult<()> {
        let channels = self
            .ctx
            .rest()
            .guild_channels(guild)
            .await
            .map_err(ActionError::rest("channels"))?;
        self.print(to_indented_json(&channels)?)
    }

    async fn dump_user(&self, user: Option<UserTarget>) -> ActionResult<()> {
        let target = match user {
            Some(target) => target,
            None => {
                self.ctx
                    .console()
                    .eprintln("No user specified, dumping '@me'")?;
                UserTarget::Me
            }
        };

        let user = self
            .ctx
            .rest()
            .user(target)
            .await
            .map_err(ActionError::rest("dumpuser"))?;
        self.print(to_indented_json(&user)?)
    }

    // === Handler-driven actions ===

    async fn check_gateway(&self) -> ActionResult<()> {
        let ready = Arc::new(CompletionSignal::<()>::new());
        {
            let ready = Arc::clone(&ready);
            let console = Arc::clone(self.ctx.console());
            self.ctx.gateway().dispatcher().on_ready(move |_| {
                report(console.println(
                    "Ready received! Successfully connected to gateway, exiting...",
                ));
                ready.complete();
            });
        }

        self.ctx.gateway().open().await?;
        ready.wait().await;
        self.ctx.gateway().close().await?;
        Ok(())
    }

    async fn discrim_search(
        &self,
        discriminator: String,
        skip: Option<Snowflake>,
    ) -> ActionResult<()> {
        let enumeration = MemberEnumeration::new(
            DiscriminatorFilter::new(discriminator, skip),
            self.ctx.member_request_interval(),
        );
        enumeration.register(self.ctx.gateway().dispatcher(), Arc::clone(self.ctx.console()));

        self.ctx.gateway().open().await?;
        enumeration.run(self.ctx.gateway()).await;
        self.ctx.console().eprintln("Done")?;
        self.ctx.gateway().close().await?;
        Ok(())
    }

    // === Hold-open actions ===

    async fn dump_all(&self) -> ActionResult<()> {
        let console = Arc::clone(self.ctx.console());
        self.ctx.gateway().dispatcher().on_any(move |event| {
            match serde_json::to_string(event.data()) {
                Ok(json) => report(console.println(format_args!("{} {json}", event.name()))),
                Err(e) => warn!(event = event.name(), error = %e, "Failed to encode event"),
            }
        });

        self.ctx.gateway().open().await?;
        self.ctx.console().println("Running. ctrl-c to exit.")?;
        self.hold_open().await
    }

    async fn set_presence(&self, presence: &str) -> ActionResult<()> {
        let payload = PresenceUpdatePayload::playing(presence);
        let gateway = Arc::downgrade(self.ctx.gateway_handle());
        let console = Arc::clone(self.ctx.console());

        self.ctx.gateway().dispatcher().on_ready(move |_| {
            report(console.eprintln("Ready received! Setting presence..."));
            let Some(gateway) = gateway.upgrade() else {
                return;
            };
            let payload = payload.clone();
            // Handlers must not block the delivery context
            tokio::spawn(async move {
                if let Err(e) = gateway.update_presence(payload).await {
                    warn!(error = %e, "Failed to set presence");
                }
            });
        });

        self.ctx.gateway().open().await?;
        self.ctx.console().eprintln(
            "Opened connection, if nothing happens in a while, verify that your token is correct.",
        )?;
        self.hold_open().await
    }

    async fn hold_open(&self) -> ActionResult<()> {
        self.ctx.shutdown().cancelled().await;
        info!("Shutdown requested, closing gateway");
        self.ctx.gateway().close().await?;
        Ok(())
    }

    fn print(&self, output: impl Display) -> ActionResult<()> {
        self.ctx.console().println(output)?;
        Ok(())
    }
}

fn report(result: std::io::Result<()>) {
    if let Err(e) = result {
        warn!(error = %e, "Failed to write output");
    }
}
