//! Vault module: the encrypted credential store.
//!
//! This module provides:
//! - Typed secret records and their field validators (`item`, `validate`)
//! - Named, kind-homogeneous item collections (`group`)
//! - Ids and change signals linking children to parents (`link`)
//! - The SQLite layout and row helpers (`format`)
//! - Lifecycle states (`state`)
//! - The `Vault` engine tying it all together (`store`)

pub mod format;
pub mod group;
pub mod item;
pub mod link;
pub mod state;
pub mod store;
pub mod validate;

// Re-export the most commonly used items.
pub use group::{Group, GroupMut};
pub use item::{FieldSpec, Item, ItemId, ItemKind};
pub use link::{GroupId, VaultId};
pub use state::Status;
pub use store::{Strategies, Vault};
