//! Named, kind-homogeneous collections of items.

use std::ops::Deref;

use crate::errors::{KeeError, Result};

use super::item::{Item, ItemId, ItemKind};
use super::link::{ChangeSignal, GroupId, VaultId};

/// A named collection of items that all share one `ItemKind`.
///
/// Items keep their insertion order, which is also the display order.
#[derive(Debug)]
pub struct Group {
    id: GroupId,
    name: String,
    kind: ItemKind,
    items: Vec<Item>,
    owner: Option<VaultId>,
    signal: ChangeSignal,
}

impl Group {
    /// Create an empty, detached group.
    pub fn new(name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id: GroupId::next(),
            name: name.into(),
            kind,
            items: Vec::new(),
            owner: None,
            signal: ChangeSignal::default(),
        }
    }

    /// Create a detached group pre-filled with `items`.
    pub fn with_items(
        name: impl Into<String>,
        kind: ItemKind,
        items: impl IntoIterator<Item = Item>,
    ) -> Result<Self> {
        let mut group = Self::new(name, kind);
        for item in items {
            group.add_item(item)?;
        }
        Ok(group)
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename a detached group.
    ///
    /// Attached groups must be renamed through `Vault::rename_group` so the
    /// vault can keep names unique.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        if self.owner.is_some() {
            return Err(KeeError::IdentityViolation(format!(
                "group '{}' belongs to a vault; rename it through the vault",
                self.name
            )));
        }
        self.rename(name.into());
        Ok(())
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    /// The vault this group was attached to, if any.
    pub fn vault(&self) -> Option<VaultId> {
        self.owner
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn item(&self, pos: usize) -> Result<&Item> {
        self.items.get(pos).ok_or_else(|| self.missing(pos))
    }

    /// Validate and write one field of the item at `pos`.
    ///
    /// Items are only edited in place through this method, so an item
    /// can never be swapped for one of another kind.
    pub fn set_entry(&mut self, pos: usize, key: &str, value: impl Into<String>) -> Result<()> {
        match self.items.get_mut(pos) {
            Some(item) => item.set_entry(key, value),
            None => Err(self.missing(pos)),
        }
    }

    /// Position of the item with the given row id.
    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == Some(id))
    }

    /// Append `item`, linking it to this group.
    ///
    /// Fails with `TypeMismatch` if the item's kind differs from the
    /// group's, and with `IdentityViolation` if the item already belongs
    /// to another group.
    pub fn add_item(&mut self, mut item: Item) -> Result<()> {
        if item.kind() != self.kind {
            return Err(KeeError::TypeMismatch {
                expected: self.kind,
                found: item.kind(),
            });
        }
        item.attach(self.id, self.signal.clone())?;
        self.items.push(item);
        self.signal.raise();
        Ok(())
    }

    /// Remove and return the item at `pos`.
    ///
    /// The removed item stops reporting changes to this group but can
    /// only ever be added back to it.
    pub fn remove_item(&mut self, pos: usize) -> Result<Item> {
        if pos >= self.items.len() {
            return Err(self.missing(pos));
        }
        let mut item = self.items.remove(pos);
        item.detach();
        self.signal.raise();
        Ok(item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn missing(&self, pos: usize) -> KeeError {
        KeeError::NotFound(format!("item #{pos} in group '{}'", self.name))
    }

    pub(crate) fn rename(&mut self, name: String) {
        if name != self.name {
            self.name = name;
            self.signal.raise();
        }
    }

    /// Record the owning vault.  A group never moves between vaults.
    pub(crate) fn attach(&mut self, vault: VaultId) -> Result<()> {
        match self.owner {
            Some(owner) if owner != vault => Err(KeeError::IdentityViolation(format!(
                "group '{}' already belongs to another vault",
                self.name
            ))),
            _ => {
                self.owner = Some(vault);
                Ok(())
            }
        }
    }

    pub(crate) fn signal(&self) -> &ChangeSignal {
        &self.signal
    }

    pub(crate) fn items_mut(&mut self) -> &mut [Item] {
        &mut self.items
    }

    /// Drop the row ids of every item after their rows were deleted.
    pub(crate) fn clear_ids(&mut self) {
        for item in &mut self.items {
            item.clear_id();
        }
    }
}

/// Mutable view of a group that belongs to a vault.
///
/// Only item-level edits go through; the group itself cannot be replaced
/// or renamed behind the vault's back.
#[derive(Debug)]
pub struct GroupMut<'a> {
    group: &'a mut Group,
}

impl<'a> GroupMut<'a> {
    pub(crate) fn new(group: &'a mut Group) -> Self {
        Self { group }
    }

    pub fn add_item(&mut self, item: Item) -> Result<()> {
        self.group.add_item(item)
    }

    pub fn remove_item(&mut self, pos: usize) -> Result<Item> {
        self.group.remove_item(pos)
    }

    pub fn set_entry(&mut self, pos: usize, key: &str, value: impl Into<String>) -> Result<()> {
        self.group.set_entry(pos, key, value)
    }
}

impl Deref for GroupMut<'_> {
    type Target = Group;

    fn deref(&self) -> &Group {
        &*self.group
    }
}

/// Structural equality: name, kind and items.
impl PartialEq for Group {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.kind == other.kind && self.items == other.items
    }
}

impl Eq for Group {}
