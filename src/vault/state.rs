//! Vault lifecycle states.
//!
//! ```text
//!   load ──► Closed ──open──► Opened ◄──save── Modified
//!              ▲                │  └──mutation──►  │
//!              └────close───────┴───────close──────┘
//!   create ──► Opened
//! ```
//!
//! Each state carries only the data that is valid in it: a closed vault
//! has at most a cached graph, an open vault owns the store connection,
//! the master key and the live graph.

use std::fmt;

use rusqlite::Connection;

use crate::crypto::MasterKey;

use super::group::Group;

/// Externally visible vault status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Closed,
    Opened,
    Modified,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Closed => "Closed",
            Status::Opened => "Opened",
            Status::Modified => "Modified",
        })
    }
}

/// Data held while the vault is unlocked.
pub(crate) struct Session {
    pub conn: Connection,
    pub master_key: MasterKey,
    pub groups: Vec<Group>,
}

impl Session {
    /// True if any group or item changed since the flags were last cleared.
    pub fn has_changes(&self) -> bool {
        self.groups.iter().any(|g| g.signal().is_raised())
    }

    pub fn clear_changes(&self) {
        for group in &self.groups {
            group.signal().clear();
        }
    }
}

/// Data held while the vault is locked.
#[derive(Default)]
pub(crate) struct Closed {
    /// The graph of a cleanly closed session, reused by the next open.
    pub cache: Option<Vec<Group>>,
}

pub(crate) enum State {
    Closed(Closed),
    Opened(Session),
    Modified(Session),
}

impl State {
    pub fn status(&self) -> Status {
        match self {
            State::Closed(_) => Status::Closed,
            State::Opened(s) if s.has_changes() => Status::Modified,
            State::Opened(_) => Status::Opened,
            State::Modified(_) => Status::Modified,
        }
    }

    /// Take the current state out, leaving an empty `Closed` behind.
    pub fn take(&mut self) -> State {
        std::mem::replace(self, State::Closed(Closed::default()))
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            State::Closed(_) => None,
            State::Opened(s) | State::Modified(s) => Some(s),
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        match self {
            State::Closed(_) => None,
            State::Opened(s) | State::Modified(s) => Some(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::{Item, ItemKind};

    fn session() -> Session {
        Session {
            conn: Connection::open_in_memory().unwrap(),
            master_key: MasterKey::new("k"),
            groups: vec![Group::new("A", ItemKind::Password)],
        }
    }

    #[test]
    fn status_display() {
        assert_eq!(Status::Closed.to_string(), "Closed");
        assert_eq!(Status::Modified.to_string(), "Modified");
    }

    #[test]
    fn opened_with_raised_signal_reports_modified() {
        let mut state = State::Opened(session());
        assert_eq!(state.status(), Status::Opened);

        let group = &mut state.session_mut().unwrap().groups[0];
        group
            .add_item(Item::password("https://a.io", "me", "pw").unwrap())
            .unwrap();
        assert_eq!(state.status(), Status::Modified);

        state.session().unwrap().clear_changes();
        assert_eq!(state.status(), Status::Opened);
    }

    #[test]
    fn take_leaves_closed_behind() {
        let mut state = State::Modified(session());
        let taken = state.take();
        assert_eq!(taken.status(), Status::Modified);
        assert_eq!(state.status(), Status::Closed);
        assert!(state.session().is_none());
    }
}
