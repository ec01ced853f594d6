//! The vault engine.
//!
//! `Vault` owns one SQLite store, the master key while unlocked, and the
//! whole group/item graph.  Every public operation is gated on the
//! lifecycle state described in `vault::state`.
//!
//! Item payloads go through the configured strategies:
//!
//! ```text
//! save: json(fields) ─► cipher.encrypt ─► encoder.encode ─► item.data
//! open: item.data    ─► encoder.decode ─► cipher.decrypt ─► json(fields)
//! ```

use std::fmt;
use std::hash::Hash;
use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::crypto::{
    cipher, encoder, fingerprint, generate_salt, hasher, verify_fingerprint, Cipher, Encoder,
    Hasher, MasterKey,
};
use crate::errors::{KeeError, Result};

use super::format::{self, StoredGroup, StoredItem, StoredMeta};
use super::group::{Group, GroupMut};
use super::item::{Item, ItemId, ItemKind};
use super::link::VaultId;
use super::state::{Closed, Session, State, Status};

/// The hasher, cipher and encoder a vault uses.
#[derive(Debug, Clone, Copy)]
pub struct Strategies {
    pub hasher: &'static dyn Hasher,
    pub cipher: &'static dyn Cipher,
    pub encoder: &'static dyn Encoder,
}

impl Strategies {
    /// Resolve strategy ids as persisted in vault metadata.
    pub fn from_ids(hasher_id: &str, cipher_id: &str, encoder_id: &str) -> Result<Self> {
        Ok(Self {
            hasher: hasher::from_id(hasher_id).ok_or_else(|| unknown("hasher", hasher_id))?,
            cipher: cipher::from_id(cipher_id).ok_or_else(|| unknown("cipher", cipher_id))?,
            encoder: encoder::from_id(encoder_id).ok_or_else(|| unknown("encoder", encoder_id))?,
        })
    }
}

impl Default for Strategies {
    fn default() -> Self {
        Self {
            hasher: &hasher::Sha256,
            cipher: &cipher::AesCbc,
            encoder: &encoder::Base64,
        }
    }
}

fn unknown(family: &'static str, id: &str) -> KeeError {
    KeeError::UnknownStrategy {
        family,
        id: id.to_string(),
    }
}

/// In-memory copy of the `meta` row with resolved strategies.
struct Meta {
    name: String,
    master_key_hash: Vec<u8>,
    hash_salt: Vec<u8>,
    cipher_salt: Vec<u8>,
    strategies: Strategies,
}

impl Meta {
    fn from_stored(stored: StoredMeta) -> Result<Self> {
        let strategies =
            Strategies::from_ids(&stored.hasher_id, &stored.cipher_id, &stored.encoder_id)?;
        Ok(Self {
            name: stored.name,
            master_key_hash: stored.master_key_hash,
            hash_salt: stored.hash_salt,
            cipher_salt: stored.cipher_salt,
            strategies,
        })
    }

    fn to_stored(&self) -> StoredMeta {
        StoredMeta {
            name: self.name.clone(),
            master_key_hash: self.master_key_hash.clone(),
            hash_salt: self.hash_salt.clone(),
            cipher_salt: self.cipher_salt.clone(),
            hasher_id: self.strategies.hasher.id().to_string(),
            cipher_id: self.strategies.cipher.id().to_string(),
            encoder_id: self.strategies.encoder.id().to_string(),
        }
    }

    fn refresh_fingerprint(&mut self, master_key: &MasterKey) {
        self.master_key_hash = fingerprint(
            master_key.as_bytes(),
            &self.hash_salt,
            self.strategies.hasher,
            self.strategies.encoder,
        );
    }

    fn seal(&self, item: &Item, master_key: &MasterKey) -> Result<Vec<u8>> {
        let json = Zeroizing::new(item.to_json()?);
        let encrypted =
            self.strategies
                .cipher
                .encrypt(&json, master_key.as_bytes(), &self.cipher_salt)?;
        Ok(self.strategies.encoder.encode(&encrypted))
    }

    fn unseal(&self, kind: ItemKind, row: StoredItem, master_key: &MasterKey) -> Result<Item> {
        let encrypted = self.strategies.encoder.decode(&row.data)?;
        let json = Zeroizing::new(self.strategies.cipher.decrypt(
            &encrypted,
            master_key.as_bytes(),
            &self.cipher_salt,
        )?);
        Item::from_json(kind, ItemId::new(row.id), &json)
    }
}

fn refuse_legacy(hasher: &dyn Hasher) -> Result<()> {
    if hasher.is_legacy() {
        return Err(KeeError::InsecureStrategy(hasher.id().to_string()));
    }
    Ok(())
}

/// One encrypted vault file.
///
/// Two handles are equal when they point at the same location.
pub struct Vault {
    location: PathBuf,
    id: VaultId,
    meta: Meta,
    state: State,
}

impl Vault {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Load an existing vault in the `Closed` state.
    ///
    /// Only the metadata is read; groups and items are decrypted by the
    /// first successful `open`.
    pub fn load(location: impl AsRef<Path>) -> Result<Self> {
        let location = location.as_ref().to_path_buf();
        let conn = format::open_existing(&location)?;
        let meta = Meta::from_stored(format::read_meta(&conn)?)?;
        drop(conn);

        debug!(location = %location.display(), "vault loaded");
        Ok(Self {
            location,
            id: VaultId::next(),
            meta,
            state: State::Closed(Closed::default()),
        })
    }

    /// Create a new vault file and return it `Opened`.
    ///
    /// Generates fresh hash and cipher salts.  Refuses an existing
    /// location and legacy hashers.
    pub fn create(
        location: impl AsRef<Path>,
        name: impl Into<String>,
        master_key: impl Into<MasterKey>,
        strategies: Strategies,
    ) -> Result<Self> {
        refuse_legacy(strategies.hasher)?;
        let location = location.as_ref().to_path_buf();
        let master_key = master_key.into();

        let mut meta = Meta {
            name: name.into(),
            master_key_hash: Vec::new(),
            hash_salt: generate_salt(),
            cipher_salt: generate_salt(),
            strategies,
        };
        meta.refresh_fingerprint(&master_key);

        let conn = format::create(&location, &meta.to_stored())?;
        info!(location = %location.display(), "vault created");

        Ok(Self {
            location,
            id: VaultId::next(),
            meta,
            state: State::Opened(Session {
                conn,
                master_key,
                groups: Vec::new(),
            }),
        })
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    pub fn status(&self) -> Status {
        self.state.status()
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Handle id stamped on every group this vault owns.
    pub fn id(&self) -> VaultId {
        self.id
    }

    /// Verify `master_key` and unlock the vault.
    pub fn open(&mut self, master_key: impl Into<MasterKey>) -> Result<()> {
        if !matches!(self.state, State::Closed(_)) {
            return Err(KeeError::IllegalTransition {
                from: self.status(),
                to: Status::Opened,
            });
        }

        let master_key = master_key.into();
        let verified = verify_fingerprint(
            master_key.as_bytes(),
            &self.meta.hash_salt,
            self.meta.strategies.hasher,
            self.meta.strategies.encoder,
            &self.meta.master_key_hash,
        );
        if !verified {
            warn!(location = %self.location.display(), "master key rejected");
            return Err(KeeError::AuthenticationFailure);
        }

        let conn = format::open_existing(&self.location)?;
        let cached = match &mut self.state {
            State::Closed(closed) => closed.cache.take(),
            _ => None,
        };
        let groups = match cached {
            Some(groups) => groups,
            None => self.read_graph(&conn, &master_key)?,
        };

        info!(location = %self.location.display(), groups = groups.len(), "vault opened");
        self.state = State::Opened(Session {
            conn,
            master_key,
            groups,
        });
        Ok(())
    }

    /// Lock the vault, releasing the connection and the master key.
    ///
    /// Unsaved changes are discarded and the metadata is re-read from the
    /// store.
    pub fn close(&mut self) -> Result<()> {
        match self.state.take() {
            State::Closed(closed) => {
                self.state = State::Closed(closed);
            }
            State::Opened(session) if !session.has_changes() => {
                let Session { conn, groups, .. } = session;
                drop(conn);
                self.state = State::Closed(Closed {
                    cache: Some(groups),
                });
                info!(location = %self.location.display(), "vault closed");
            }
            State::Opened(session) | State::Modified(session) => {
                warn!(location = %self.location.display(), "discarding unsaved changes");
                let stored = format::read_meta(&session.conn)?;
                drop(session);
                self.meta = Meta::from_stored(stored)?;
                info!(location = %self.location.display(), "vault closed");
            }
        }
        Ok(())
    }

    /// Persist metadata and the whole graph in one transaction.
    pub fn save(&mut self) -> Result<()> {
        self.absorb_changes();
        let session = match &mut self.state {
            State::Closed(_) => return Err(KeeError::ClosedVault),
            State::Opened(_) => {
                debug!("save skipped, nothing changed");
                return Ok(());
            }
            State::Modified(session) => session,
        };

        write_graph(&self.meta, session)?;

        if let State::Modified(session) = self.state.take() {
            session.clear_changes();
            self.state = State::Opened(session);
        }
        info!(location = %self.location.display(), "vault saved");
        Ok(())
    }

    /// Move an open vault to `Modified` without changing anything.
    pub fn mark_modified(&mut self) -> Result<()> {
        if let State::Closed(_) = self.state {
            return Err(KeeError::IllegalTransition {
                from: Status::Closed,
                to: Status::Modified,
            });
        }
        self.touch();
        Ok(())
    }

    /// Delete the vault file.  The handle is consumed.
    pub fn remove(mut self) -> Result<()> {
        match self.state.take() {
            State::Closed(_) => return Err(KeeError::ClosedVault),
            State::Opened(session) | State::Modified(session) => drop(session),
        }

        std::fs::remove_file(&self.location)?;
        for suffix in ["-journal", "-wal", "-shm"] {
            let mut side = self.location.clone().into_os_string();
            side.push(suffix);
            let side = PathBuf::from(side);
            if side.exists() {
                std::fs::remove_file(&side)?;
            }
        }
        info!(location = %self.location.display(), "vault removed");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Metadata
    // ------------------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.meta.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        self.session()?;
        let name = name.into();
        if name != self.meta.name {
            self.meta.name = name;
            self.touch();
        }
        Ok(())
    }

    pub fn master_key(&self) -> Result<&MasterKey> {
        Ok(&self.session()?.master_key)
    }

    /// Replace the master key.  Takes effect on disk at the next `save`.
    pub fn set_master_key(&mut self, master_key: impl Into<MasterKey>) -> Result<()> {
        let master_key = master_key.into();
        let session = self.state.session_mut().ok_or(KeeError::ClosedVault)?;
        if session.master_key == *master_key.as_str() {
            return Ok(());
        }
        session.master_key = master_key;
        self.meta.refresh_fingerprint(&session.master_key);
        self.touch();
        Ok(())
    }

    pub fn hasher(&self) -> Result<&'static dyn Hasher> {
        self.session()?;
        Ok(self.meta.strategies.hasher)
    }

    pub fn set_hasher(&mut self, hasher: &'static dyn Hasher) -> Result<()> {
        let session = self.state.session().ok_or(KeeError::ClosedVault)?;
        refuse_legacy(hasher)?;
        if hasher.id() == self.meta.strategies.hasher.id() {
            return Ok(());
        }
        self.meta.strategies.hasher = hasher;
        self.meta.refresh_fingerprint(&session.master_key);
        self.touch();
        Ok(())
    }

    pub fn cipher(&self) -> Result<&'static dyn Cipher> {
        self.session()?;
        Ok(self.meta.strategies.cipher)
    }

    pub fn set_cipher(&mut self, cipher: &'static dyn Cipher) -> Result<()> {
        self.session()?;
        if cipher.id() == self.meta.strategies.cipher.id() {
            return Ok(());
        }
        self.meta.strategies.cipher = cipher;
        self.touch();
        Ok(())
    }

    pub fn encoder(&self) -> Result<&'static dyn Encoder> {
        self.session()?;
        Ok(self.meta.strategies.encoder)
    }

    pub fn set_encoder(&mut self, encoder: &'static dyn Encoder) -> Result<()> {
        let session = self.state.session().ok_or(KeeError::ClosedVault)?;
        if encoder.id() == self.meta.strategies.encoder.id() {
            return Ok(());
        }
        self.meta.strategies.encoder = encoder;
        self.meta.refresh_fingerprint(&session.master_key);
        self.touch();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Groups and items
    // ------------------------------------------------------------------

    pub fn groups(&self) -> Result<&[Group]> {
        Ok(&self.session()?.groups)
    }

    pub fn group(&self, name: &str) -> Result<&Group> {
        self.session()?
            .groups
            .iter()
            .find(|g| g.name() == name)
            .ok_or_else(|| missing_group(name))
    }

    /// Item-level write access to a group.  Changes made through it mark
    /// the vault `Modified`.
    pub fn group_mut(&mut self, name: &str) -> Result<GroupMut<'_>> {
        self.session_mut()?
            .groups
            .iter_mut()
            .find(|g| g.name() == name)
            .map(GroupMut::new)
            .ok_or_else(|| missing_group(name))
    }

    /// Attach `group` to this vault.
    pub fn add_group(&mut self, mut group: Group) -> Result<()> {
        let vault_id = self.id;
        let session = self.session_mut()?;
        if group.name().is_empty() {
            return Err(KeeError::ValidationFailure {
                key: "name".into(),
                reason: "group names cannot be empty".into(),
            });
        }
        if session.groups.iter().any(|g| g.name() == group.name()) {
            return Err(KeeError::DuplicateName(group.name().to_string()));
        }
        group.attach(vault_id)?;
        debug!(group = group.name(), kind = %group.kind(), "group added");
        session.groups.push(group);
        self.touch();
        Ok(())
    }

    /// Detach and return the group called `name`.  Its rows disappear at
    /// the next `save`.
    pub fn remove_group(&mut self, name: &str) -> Result<Group> {
        let session = self.session_mut()?;
        let pos = group_position(&session.groups, name)?;
        let group = session.groups.remove(pos);
        debug!(group = name, "group removed");
        self.touch();
        Ok(group)
    }

    pub fn rename_group(&mut self, old: &str, new: &str) -> Result<()> {
        let session = self.session_mut()?;
        let pos = group_position(&session.groups, old)?;
        if old == new {
            return Ok(());
        }
        if new.is_empty() {
            return Err(KeeError::ValidationFailure {
                key: "name".into(),
                reason: "group names cannot be empty".into(),
            });
        }
        if session.groups.iter().any(|g| g.name() == new) {
            return Err(KeeError::DuplicateName(new.to_string()));
        }
        session.groups[pos].rename(new.to_string());
        debug!(from = old, to = new, "group renamed");
        self.touch();
        Ok(())
    }

    /// Delete the group's row (and its items) from the store right away
    /// and detach it.
    pub fn delete_group(&mut self, name: &str) -> Result<Group> {
        let session = self.session_mut()?;
        let pos = group_position(&session.groups, name)?;
        format::delete_group(&session.conn, name)?;
        let mut group = session.groups.remove(pos);
        group.clear_ids();
        info!(group = name, "group deleted");
        self.touch();
        Ok(group)
    }

    /// Delete one saved item's row right away and remove it from its group.
    pub fn delete_item(&mut self, group: &str, pos: usize) -> Result<Item> {
        let session = self.session_mut()?;
        let gpos = group_position(&session.groups, group)?;
        let id = session.groups[gpos]
            .item(pos)?
            .id()
            .ok_or_else(|| KeeError::Unpersisted(format!("item #{pos} in group '{group}'")))?;

        format::delete_item(&session.conn, id.get())?;
        let mut item = session.groups[gpos].remove_item(pos)?;
        item.clear_id();
        info!(group, item = %id, "item deleted");
        self.touch();
        Ok(item)
    }

    // ------------------------------------------------------------------
    // Internal
    // ------------------------------------------------------------------

    fn session(&self) -> Result<&Session> {
        self.state.session().ok_or(KeeError::ClosedVault)
    }

    fn session_mut(&mut self) -> Result<&mut Session> {
        self.state.session_mut().ok_or(KeeError::ClosedVault)
    }

    /// Turn raised group signals into the `Modified` state.
    fn absorb_changes(&mut self) {
        if matches!(&self.state, State::Opened(s) if s.has_changes()) {
            self.touch();
        }
    }

    fn touch(&mut self) {
        if let State::Opened(_) = self.state {
            if let State::Opened(session) = self.state.take() {
                self.state = State::Modified(session);
            }
        }
    }

    fn read_graph(&self, conn: &Connection, master_key: &MasterKey) -> Result<Vec<Group>> {
        let mut groups = Vec::new();
        for stored in format::read_groups(conn)? {
            let kind = ItemKind::from_stored(&stored.kind).ok_or_else(|| {
                KeeError::InvalidVaultFormat(format!(
                    "group '{}' has unknown type '{}'",
                    stored.name, stored.kind
                ))
            })?;

            let mut group = Group::new(stored.name, kind);
            group.attach(self.id)?;
            for row in format::read_items(conn, group.name())? {
                let item = self.meta.unseal(kind, row, master_key)?;
                group.add_item(item)?;
            }
            group.signal().clear();
            debug!(group = group.name(), items = group.len(), "group decrypted");
            groups.push(group);
        }
        Ok(groups)
    }
}

fn missing_group(name: &str) -> KeeError {
    KeeError::NotFound(format!("group '{name}'"))
}

fn group_position(groups: &[Group], name: &str) -> Result<usize> {
    groups
        .iter()
        .position(|g| g.name() == name)
        .ok_or_else(|| missing_group(name))
}

/// Rewrite the store from the in-memory graph.
///
/// Every item is re-encrypted under the current strategies, so a strategy
/// change never leaves rows sealed the old way.  An item whose row was
/// pruned by an earlier save (it left the graph and came back) gets a
/// fresh row.  New ids are assigned only after the transaction commits.
fn write_graph(meta: &Meta, session: &mut Session) -> Result<()> {
    let tx = session.conn.transaction()?;
    format::write_meta(&tx, &meta.to_stored())?;

    let mut kept_groups = Vec::with_capacity(session.groups.len());
    let mut kept_items = Vec::new();
    let mut new_ids = Vec::new();

    for (gpos, group) in session.groups.iter().enumerate() {
        format::upsert_group(
            &tx,
            &StoredGroup {
                name: group.name().to_string(),
                kind: group.kind().as_str().to_string(),
            },
        )?;
        kept_groups.push(group.name());

        for (ipos, item) in group.items().iter().enumerate() {
            let data = meta.seal(item, &session.master_key)?;
            if let Some(id) = item.id() {
                if format::update_item(&tx, id.get(), group.name(), &data)? {
                    kept_items.push(id.get());
                    continue;
                }
                debug!(item = %id, "row was pruned, inserting again");
            }
            let id = format::insert_item(&tx, group.name(), &data)?;
            kept_items.push(id);
            new_ids.push((gpos, ipos, id));
        }
    }

    let stale_items = format::delete_items_except(&tx, &kept_items)?;
    let stale_groups = format::delete_groups_except(&tx, &kept_groups)?;
    tx.commit()?;
    debug!(
        items = kept_items.len(),
        stale_items, stale_groups, "graph written"
    );

    for (gpos, ipos, id) in new_ids {
        let item = &mut session.groups[gpos].items_mut()[ipos];
        item.clear_id();
        item.assign_id(ItemId::new(id))?;
    }
    Ok(())
}

impl fmt::Debug for Vault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vault")
            .field("location", &self.location)
            .field("name", &self.meta.name)
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

impl PartialEq for Vault {
    fn eq(&self, other: &Self) -> bool {
        self.location == other.location
    }
}

impl Eq for Vault {}

impl Hash for Vault {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.location.hash(state);
    }
}
