//! Member enumeration coordinator
//!
//! Waits for READY, requests the members of every listed guild one at a
//! time, and filters member pages as they arrive on the delivery context.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chat_core::Snowflake;
use chat_gateway::{EventDispatcher, GatewayTransport};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::DiscriminatorFilter;
use crate::runner::Console;
use crate::signal::CompletionSignal;

/// Coordinator progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumerationState {
    /// Waiting for the guild list from READY
    AwaitingReady,
    /// Issuing member requests
    Paging,
    /// Last request sent, giving late pages one interval to arrive
    Draining,
    Done,
}

/// Outcome of one enumeration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnumerationReport {
    /// Guilds listed in READY
    pub guilds: usize,
    /// Member requests sent successfully
    pub requested: usize,
    /// Member requests that failed
    pub failed: usize,
    /// Matching users printed
    pub matches: usize,
}

/// Drives a discriminator search across every guild the account is in
///
/// Pages that arrive after [`run`](Self::run) returns are still filtered
/// until the transport is closed; pages arriving after close are lost.
#[derive(Debug)]
pub struct MemberEnumeration {
    filter: Arc<DiscriminatorFilter>,
    interval: Duration,
    state: Mutex<EnumerationState>,
    ready: Arc<CompletionSignal<Vec<Snowflake>>>,
    matches: Arc<AtomicUsize>,
}

impl MemberEnumeration {
    /// `interval` is the pause after each member request
    pub fn new(filter: DiscriminatorFilter, interval: Duration) -> Self {
        Self {
            filter: Arc::new(filter),
            interval,
            state: Mutex::new(EnumerationState::AwaitingReady),
            ready: Arc::new(CompletionSignal::new()),
            matches: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn state(&self) -> EnumerationState {
        *self.state.lock()
    }

    /// Matches printed so far
    pub fn matches(&self) -> usize {
        self.matches.load(Ordering::Relaxed)
    }

    /// Register the READY and member page handlers. Call before `open`.
    pub fn register(&self, dispatcher: &EventDispatcher, console: Arc<Console>) {
        let ready = Arc::clone(&self.ready);
        dispatcher.on_ready(move |event| {
            if !ready.signal(event.guild_ids()) {
                debug!("Ignoring repeated READY");
            }
        });

        let filter = Arc::clone(&self.filter);
        let matches = Arc::clone(&self.matches);
        dispatcher.on_guild_members_chunk(move |page| {
            debug!(
                guild_id = %page.guild_id,
                chunk = page.chunk_index,
                chunks = page.chunk_count,
                last = page.is_last(),
                members = page.members.len(),
                "Member page"
            );
            for member in &page.members {
                if !filter.matches(&member.user) {
                    continue;
                }
                matches.fetch_add(1, Ordering::Relaxed);
                if let Err(e) = console.println(DiscriminatorFilter::format_match(&member.user)) {
                    warn!(error = %e, "Failed to print match");
                }
            }
        });
    }

    /// Wait for READY, then request each guild's members in turn
    pub async fn run(&self, transport: &dyn GatewayTransport) -> EnumerationReport {
        let guilds = self.ready.wait().await;
        self.set_state(EnumerationState::Paging);
        info!(guilds = guilds.len(), "Requesting guild members");

        let mut report = EnumerationReport {
            guilds: guilds.len(),
            ..EnumerationReport::default()
        };

        for (i, guild_id) in guilds.iter().enumerate() {
            match transport.request_guild_members(*guild_id, "", 0).await {
                Ok(()) => {
                    report.requested += 1;
                    debug!(guild_id = %guild_id, "Requested members");
                }
                Err(e) => {
                    report.failed += 1;
                    warn!(guild_id = %guild_id, error = %e, "Failed requesting guild members");
                }
            }

            if i + 1 == guilds.len() {
                self.set_state(EnumerationState::Draining);
            }
            tokio::time::sleep(self.interval).await;
        }

        self.set_state(EnumerationState::Done);
        report.matches = self.matches();
        info!(
            requested = report.requested,
            failed = report.failed,
            matches = report.matches,
            "Member enumeration finished"
        );
        report
    }

    fn set_state(&self, state: EnumerationState) {
        *self.state.lock() = state;
    }
}
