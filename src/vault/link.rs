//! Non-owning back-references between vaults, groups and items.
//!
//! A `Vault` owns its groups and each `Group` owns its items, so the
//! child-to-parent direction is expressed with plain identifiers plus a
//! shared change flag instead of pointers.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

fn next_handle() -> u64 {
    NEXT_HANDLE.fetch_add(1, Ordering::Relaxed)
}

/// Identifies one in-memory vault handle (not the file on disk).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VaultId(u64);

impl VaultId {
    pub(crate) fn next() -> Self {
        Self(next_handle())
    }
}

/// Identifies one in-memory group, stable across renames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(u64);

impl GroupId {
    pub(crate) fn next() -> Self {
        Self(next_handle())
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group#{}", self.0)
    }
}

/// Flag raised by a group (or one of its items) whenever it changes.
///
/// The owning vault polls the flags of its groups and turns a raised
/// flag into the `Modified` status.
#[derive(Debug, Clone, Default)]
pub(crate) struct ChangeSignal(Arc<AtomicBool>);

impl ChangeSignal {
    pub(crate) fn raise(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub(crate) fn is_raised(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub(crate) fn clear(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}
