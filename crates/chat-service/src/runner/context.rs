//! Runner context - the collaborators an action runs against

use std::sync::Arc;
use std::time::Duration;

use chat_common::config::MemberRequestConfig;
use chat_core::RestClient;
use chat_gateway::GatewayTransport;
use tokio_util::sync::CancellationToken;

use super::Console;

/// Dependency container handed to [`ActionRunner`](super::ActionRunner)
///
/// Built once per process. Cloning shares the same collaborators and
/// shutdown token.
#[derive(Clone)]
pub struct RunnerContext {
    rest: Arc<dyn RestClient>,
    gateway: Arc<dyn GatewayTransport>,
    console: Arc<Console>,
    shutdown: CancellationToken,
    member_request_interval: Duration,
}

impl RunnerContext {
    pub fn new(
        rest: Arc<dyn RestClient>,
        gateway: Arc<dyn GatewayTransport>,
        console: Arc<Console>,
    ) -> Self {
        Self {
            rest,
            gateway,
            console,
            shutdown: CancellationToken::new(),
            member_request_interval: MemberRequestConfig::default().request_interval(),
        }
    }

    /// Use an externally owned shutdown token
    #[must_use]
    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    #[must_use]
    pub fn with_member_requests(mut self, config: &MemberRequestConfig) -> Self {
        self.member_request_interval = config.request_interval();
        self
    }

    pub fn rest(&self) -> &dyn RestClient {
        self.rest.as_ref()
    }

    pub fn gateway(&self) -> &dyn GatewayTransport {
        self.gateway.as_ref()
    }

    /// Shared handle to the gateway, for handlers that outlive a borrow
    pub fn gateway_handle(&self) -> &Arc<dyn GatewayTransport> {
        &self.gateway
    }

    pub fn console(&self) -> &Arc<Console> {
        &self.console
    }

    /// Token that ends hold-open actions
    pub fn shutdown(&self) -> &CancellationToken {
        &self.shutdown
    }

    pub fn member_request_interval(&self) -> Duration {
        self.member_request_interval
    }
}

impl std::fmt::Debug for RunnerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunnerContext")
            .field("gateway_state", &self.gateway.state())
            .field("shutdown", &self.shutdown.is_cancelled())
            .field("member_request_interval", &self.member_request_interval)
            .finish_non_exhaustive()
    }
}
