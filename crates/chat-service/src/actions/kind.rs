//! Action names and the action table

use std::fmt;

/// How an action drives its collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionMode {
    /// One REST call, no gateway connection
    Rest,
    /// Opens the gateway and waits for a handler to signal completion
    HandlerDriven,
    /// Opens the gateway and stays connected until cancelled
    HoldOpen,
}

/// Named action selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    SendMessage,
    Gateway,
    DumpAll,
    GuildRoles,
    Guild,
    DiscrimSearch,
    DumpUser,
    Channels,
    SetPresence,
}

impl ActionKind {
    /// Every action, in table order
    pub const ALL: [ActionKind; 9] = [
        ActionKind::SendMessage,
        ActionKind::Gateway,
        ActionKind::DumpAll,
        ActionKind::GuildRoles,
        ActionKind::Guild,
        ActionKind::DiscrimSearch,
        ActionKind::DumpUser,
        ActionKind::Channels,
        ActionKind::SetPresence,
    ];

    /// Command line name
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ActionKind::SendMessage => "sendmessage",
            ActionKind::Gateway => "gateway",
            ActionKind::DumpAll => "dumpall",
            ActionKind::GuildRoles => "guildroles",
            ActionKind::Guild => "guild",
            ActionKind::DiscrimSearch => "discrimsearch",
            ActionKind::DumpUser => "dumpuser",
            ActionKind::Channels => "channels",
            ActionKind::SetPresence => "setpresence",
        }
    }

    /// One-line help text
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            ActionKind::SendMessage => {
                "Sends a message in a channel, token, channel and message is required"
            }
            ActionKind::Gateway => {
                "Connects to the gateway, waits for ready and then quits. Token is required"
            }
            ActionKind::DumpAll => {
                "Connects to the gateway and dumps all incoming events to stdout. Token is required"
            }
            ActionKind::GuildRoles => {
                "Dumps guild roles from the REST endpoint, consider using guild instead. Token and guild is required"
            }
            ActionKind::Guild => "Dumps guild from the REST endpoint, token and guild is required",
            ActionKind::DiscrimSearch => {
                "Connects to the gateway, then requests all members from all servers and dumps users with the provided discrim, optionally skipping one user, requires token and discrim"
            }
            ActionKind::DumpUser => {
                "Dump a specific user, defaults to @me if none provided, requires token"
            }
            ActionKind::Channels => "Dumps channels to stdout, requires token and guild",
            ActionKind::SetPresence => "Sets your presence, and keeps it. Requires token",
        }
    }

    #[must_use]
    pub fn mode(self) -> ActionMode {
        match self {
            ActionKind::SendMessage
            | ActionKind::GuildRoles
            | ActionKind::Guild
            | ActionKind::DumpUser
            | ActionKind::Channels => ActionMode::Rest,
            ActionKind::Gateway | ActionKind::DiscrimSearch => ActionMode::HandlerDriven,
            ActionKind::DumpAll | ActionKind::SetPresence => ActionMode::HoldOpen,
        }
    }

    /// Look up an action by name, ignoring case
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }

    /// Render the help table listing every action
    #[must_use]
    pub fn table() -> String {
        let mut out = String::from("Available actions:\n\n");
        for kind in Self::ALL {
            out.push_str(&format!("{:<15}: {}\n", kind.name(), kind.description()));
        }
        out
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
