//! Invocation flow: resolve configuration, build collaborators, run the action

use std::sync::Arc;

use chat_api::HttpRestClient;
use chat_common::{AppConfig, ConfigError, Token};
use chat_core::{RestClient, RestError};
use chat_gateway::{GatewaySession, GatewayTransport, SessionConfig};
use chat_service::{
    Action, ActionKind, ActionMode, ActionRunner, Console, RunnerContext, ValidationError,
};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::args::Cli;

/// Failure before the action starts
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Collaborator construction failed
    #[error(transparent)]
    Setup(#[from] RestError),
}

/// Everything one invocation needs, resolved once from flags and environment
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub token: Token,
    pub action: Action,
    pub app: AppConfig,
}

impl CliConfig {
    /// Resolve the credential, then the action, then the environment settings.
    ///
    /// `lookup` reads environment variables.
    pub fn resolve<F>(cli: &Cli, lookup: F) -> Result<Self, CliError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = Token::resolve(cli.token.as_deref(), &lookup)?;

        let name = cli.action.clone().unwrap_or_default();
        let kind = ActionKind::from_name(&name).ok_or(CliError::UnknownAction(name))?;
        let action = Action::from_params(kind, &cli.params())?;

        let app = AppConfig::from_lookup(lookup)?;
        Ok(Self { token, action, app })
    }
}

/// REST and gateway collaborators for one invocation
pub struct Backend {
    pub rest: Arc<dyn RestClient>,
    pub gateway: Arc<dyn GatewayTransport>,
}

impl Backend {
    /// Real HTTP client and WebSocket session. Nothing connects until used.
    pub fn connect(config: &CliConfig) -> Result<Self, CliError> {
        let rest = HttpRestClient::new(&config.app.api, &config.token)?;
        let session = GatewaySession::new(SessionConfig::new(
            config.token.clone(),
            &config.app.gateway,
        ));
        debug!(api = rest.base_url(), gateway = %config.app.gateway.url, "Collaborators ready");

        Ok(Self {
            rest: Arc::new(rest),
            gateway: Arc::new(session),
        })
    }
}

/// Run one invocation and return the process exit status.
///
/// Every failure prints a single line on stderr and yields 1. Hold-open
/// actions treat `shutdown` as their normal end; any other action is
/// abandoned when it fires.
pub async fn run<F, B>(
    cli: &Cli,
    lookup: F,
    backend: B,
    console: Arc<Console>,
    shutdown: CancellationToken,
) -> u8
where
    F: Fn(&str) -> Option<String>,
    B: FnOnce(&CliConfig) -> Result<Backend, CliError>,
{
    let config = match CliConfig::resolve(cli, lookup) {
        Ok(config) => config,
        Err(e) => {
            let _ = console.eprintln(&e);
            if matches!(e, CliError::UnknownAction(_)) {
                let _ = console.eprintln(ActionKind::table().trim_end());
            }
            return 1;
        }
    };

    let Backend { rest, gateway } = match backend(&config) {
        Ok(backend) => backend,
        Err(e) => {
            let _ = console.eprintln(format_args!("An error occurred: {e}"));
            return 1;
        }
    };

    let holds_open = config.action.kind().mode() == ActionMode::HoldOpen;
    let ctx = RunnerContext::new(rest, gateway, Arc::clone(&console))
        .with_shutdown(shutdown.clone())
        .with_member_requests(&config.app.members);

    let action = config.action.name();
    let runner = ActionRunner::new(ctx);
    let result = if holds_open {
        runner.run(config.action).await
    } else {
        tokio::select! {
            result = runner.run(config.action) => result,
            () = shutdown.cancelled() => {
                warn!(action, "Interrupted before completion");
                let _ = console.eprintln("Interrupted.");
                return 1;
            }
        }
    };

    match result {
        Ok(()) => {
            info!(action, "Action completed");
            let _ = console.eprintln("Success.");
            0
        }
        Err(e) => {
            let _ = console.eprintln(format_args!("An error occurred: {e}"));
            1
        }
    }
}
