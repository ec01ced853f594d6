//! Typed secret records.
//!
//! An `Item` is a key/value bag whose keys are restricted to the schema
//! of its `ItemKind`.  Required keys must be present at construction and
//! every write goes through the field's validator first.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::errors::{KeeError, Result};

use super::link::{ChangeSignal, GroupId};
use super::validate::{self, Validator};

/// One field in an item schema.
#[derive(Clone, Copy)]
pub struct FieldSpec {
    pub key: &'static str,
    pub required: bool,
    /// Masked by front-ends unless explicitly revealed.
    pub secret: bool,
    validator: Validator,
}

impl FieldSpec {
    const fn new(key: &'static str, required: bool, secret: bool, validator: Validator) -> Self {
        Self {
            key,
            required,
            secret,
            validator,
        }
    }

    /// Run this field's validator against `value`.
    pub fn check(&self, value: &str) -> Result<()> {
        (self.validator)(value).map_err(|reason| KeeError::ValidationFailure {
            key: self.key.to_string(),
            reason: reason.to_string(),
        })
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("key", &self.key)
            .field("required", &self.required)
            .field("secret", &self.secret)
            .finish_non_exhaustive()
    }
}

const PASSWORD_SCHEMA: &[FieldSpec] = &[
    FieldSpec::new("title", false, false, validate::any),
    FieldSpec::new("url", true, false, validate::url),
    FieldSpec::new("login", true, false, validate::non_empty),
    FieldSpec::new("email", false, false, validate::optional_email),
    FieldSpec::new("password", true, true, validate::non_empty),
    FieldSpec::new("notes", false, false, validate::any),
];

const CARD_SCHEMA: &[FieldSpec] = &[
    FieldSpec::new("title", false, false, validate::any),
    FieldSpec::new("number", true, true, validate::card_number),
    FieldSpec::new("cvv", true, true, validate::cvv),
    FieldSpec::new("expiration", false, false, validate::optional_expiration),
    FieldSpec::new("holder", false, false, validate::any),
    FieldSpec::new("notes", false, false, validate::any),
];

const IDENTITY_SCHEMA: &[FieldSpec] = &[
    FieldSpec::new("title", false, false, validate::any),
    FieldSpec::new("full_name", true, false, validate::non_empty),
    FieldSpec::new("phone", false, false, validate::optional_phone),
    FieldSpec::new("email", false, false, validate::optional_basic_email),
    FieldSpec::new("notes", false, false, validate::any),
];

/// The three kinds of secret a vault can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Password,
    Card,
    Identity,
}

impl ItemKind {
    pub const ALL: [ItemKind; 3] = [ItemKind::Password, ItemKind::Card, ItemKind::Identity];

    /// The name persisted in the `group.type` column.
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Password => "Password",
            ItemKind::Card => "Card",
            ItemKind::Identity => "Identity",
        }
    }

    /// Parse the persisted name exactly (case-sensitive).
    pub fn from_stored(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }

    /// All fields of this kind, in display order.
    pub fn schema(self) -> &'static [FieldSpec] {
        match self {
            ItemKind::Password => PASSWORD_SCHEMA,
            ItemKind::Card => CARD_SCHEMA,
            ItemKind::Identity => IDENTITY_SCHEMA,
        }
    }

    pub fn field(self, key: &str) -> Option<&'static FieldSpec> {
        self.schema().iter().find(|f| f.key == key)
    }

    pub fn required_keys(self) -> impl Iterator<Item = &'static str> {
        self.schema().iter().filter(|f| f.required).map(|f| f.key)
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = KeeError;

    /// Lenient parse for user input: `password`, `Passwords`, `CARD`, ...
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        let singular = match lower.as_str() {
            "identities" => "identity",
            other => other.strip_suffix('s').unwrap_or(other),
        };
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(singular))
            .ok_or_else(|| {
                KeeError::CommandFailed(format!(
                    "unknown item kind '{s}'; expected password, card or identity"
                ))
            })
    }
}

/// Row id assigned to an item the first time it is saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(i64);

impl ItemId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// `signal` is `None` while the item sits outside its group.
#[derive(Debug, Clone)]
struct GroupLink {
    group: GroupId,
    signal: Option<ChangeSignal>,
}

/// A single typed secret record.
#[derive(Debug)]
pub struct Item {
    kind: ItemKind,
    id: Option<ItemId>,
    data: BTreeMap<String, String>,
    link: Option<GroupLink>,
}

impl Item {
    /// Build an item from field/value pairs.
    ///
    /// Fails with `ValidationFailure` if a required key is missing or a
    /// value is rejected, and with `UnknownField` for keys outside the
    /// kind's schema.
    pub fn new<I, K, V>(kind: ItemKind, fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let fields: Vec<(String, String)> = fields
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        if let Some(missing) = kind
            .required_keys()
            .find(|req| !fields.iter().any(|(k, _)| k == *req))
        {
            return Err(KeeError::ValidationFailure {
                key: missing.to_string(),
                reason: format!("required for {kind} items"),
            });
        }

        let mut item = Self {
            kind,
            id: None,
            data: BTreeMap::new(),
            link: None,
        };
        for (key, value) in fields {
            item.set_entry(&key, value)?;
        }
        Ok(item)
    }

    pub fn password(
        url: impl Into<String>,
        login: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        Self::new(
            ItemKind::Password,
            [
                ("url", url.into()),
                ("login", login.into()),
                ("password", password.into()),
            ],
        )
    }

    pub fn card(number: impl Into<String>, cvv: impl Into<String>) -> Result<Self> {
        Self::new(
            ItemKind::Card,
            [("number", number.into()), ("cvv", cvv.into())],
        )
    }

    pub fn identity(full_name: impl Into<String>) -> Result<Self> {
        Self::new(ItemKind::Identity, [("full_name", full_name.into())])
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    /// `None` until the item has been saved once.
    pub fn id(&self) -> Option<ItemId> {
        self.id
    }

    /// The group this item was first attached to, if any.
    pub fn group(&self) -> Option<GroupId> {
        self.link.as_ref().map(|l| l.group)
    }

    /// All fields that have been set.
    pub fn data(&self) -> &BTreeMap<String, String> {
        &self.data
    }

    /// Read one field.  Optional fields that were never set read as "".
    pub fn entry(&self, key: &str) -> Result<&str> {
        self.spec(key)?;
        Ok(self.data.get(key).map_or("", String::as_str))
    }

    /// Validate and write one field.  A rejected value leaves the
    /// previous one in place.
    pub fn set_entry(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        self.spec(key)?.check(&value)?;

        if self.data.get(key) == Some(&value) {
            return Ok(());
        }
        self.data.insert(key.to_string(), value);
        self.touch();
        Ok(())
    }

    fn spec(&self, key: &str) -> Result<&'static FieldSpec> {
        self.kind.field(key).ok_or_else(|| KeeError::UnknownField {
            kind: self.kind,
            key: key.to_string(),
        })
    }

    fn touch(&self) {
        if let Some(signal) = self.link.as_ref().and_then(|l| l.signal.as_ref()) {
            signal.raise();
        }
    }

    /// Set the owning group.  An item belongs to one group for life.
    pub(crate) fn attach(&mut self, group: GroupId, signal: ChangeSignal) -> Result<()> {
        match &self.link {
            Some(link) if link.group != group => Err(KeeError::IdentityViolation(format!(
                "item already belongs to {}",
                link.group
            ))),
            _ => {
                self.link = Some(GroupLink {
                    group,
                    signal: Some(signal),
                });
                Ok(())
            }
        }
    }

    /// Stop reporting changes, keeping the group for the attach-once rule.
    pub(crate) fn detach(&mut self) {
        if let Some(link) = &mut self.link {
            link.signal = None;
        }
    }

    /// Forget a row id whose row no longer exists.
    pub(crate) fn clear_id(&mut self) {
        self.id = None;
    }

    /// Record the row id assigned by the store.  Ids never change.
    pub(crate) fn assign_id(&mut self, id: ItemId) -> Result<()> {
        if let Some(existing) = self.id {
            return Err(KeeError::IdentityViolation(format!(
                "item already has id {existing}"
            )));
        }
        self.id = Some(id);
        Ok(())
    }

    pub(crate) fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(&self.data)
            .map_err(|e| KeeError::SerializationError(format!("item fields: {e}")))
    }

    /// Rebuild a stored item, re-validating every field.
    pub(crate) fn from_json(kind: ItemKind, id: ItemId, json: &[u8]) -> Result<Self> {
        let fields: BTreeMap<String, String> = serde_json::from_slice(json)
            .map_err(|e| KeeError::InvalidVaultFormat(format!("item {id} fields: {e}")))?;
        let mut item = Self::new(kind, fields)?;
        item.assign_id(id)?;
        Ok(item)
    }
}

/// Structural equality: kind, id and field values (not the group link).
impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.id == other.id && self.data == other.data
    }
}

impl Eq for Item {}

#[cfg(test)]
mod tests {
    use super::*;

    fn login() -> Item {
        Item::password("https://site.com", "login", "password").unwrap()
    }

    #[test]
    fn new_item_is_unassigned_and_detached() {
        let item = login();
        assert_eq!(item.id(), None);
        assert_eq!(item.group(), None);
        assert_eq!(item.kind(), ItemKind::Password);
    }

    #[test]
    fn missing_required_key_fails() {
        let err = Item::new(ItemKind::Password, [("url", "https://a.io"), ("login", "me")])
            .unwrap_err();
        assert!(matches!(err, KeeError::ValidationFailure { ref key, .. } if key == "password"));
    }

    #[test]
    fn unknown_key_fails() {
        let mut item = login();
        assert!(matches!(
            item.set_entry("cvv", "123"),
            Err(KeeError::UnknownField { .. })
        ));
        assert!(matches!(item.entry("cvv"), Err(KeeError::UnknownField { .. })));
    }

    #[test]
    fn unset_optional_reads_empty() {
        assert_eq!(login().entry("notes").unwrap(), "");
    }

    #[test]
    fn rejected_write_keeps_previous_value() {
        let mut item = login();
        assert!(item.set_entry("url", "not-a-url").is_err());
        assert_eq!(item.entry("url").unwrap(), "https://site.com");
    }

    #[test]
    fn attached_item_raises_signal_on_write() {
        let mut item = login();
        let signal = ChangeSignal::default();
        item.attach(GroupId::next(), signal.clone()).unwrap();

        item.set_entry("notes", "hello").unwrap();
        assert!(signal.is_raised());
    }

    #[test]
    fn unchanged_write_does_not_raise_signal() {
        let mut item = login();
        let signal = ChangeSignal::default();
        item.attach(GroupId::next(), signal.clone()).unwrap();

        item.set_entry("login", "login").unwrap();
        assert!(!signal.is_raised());
    }

    #[test]
    fn attach_to_second_group_fails() {
        let mut item = login();
        let first = GroupId::next();
        item.attach(first, ChangeSignal::default()).unwrap();
        item.attach(first, ChangeSignal::default()).unwrap();

        assert!(matches!(
            item.attach(GroupId::next(), ChangeSignal::default()),
            Err(KeeError::IdentityViolation(_))
        ));
        assert_eq!(item.group(), Some(first));
    }

    #[test]
    fn id_is_assigned_once() {
        let mut item = login();
        item.assign_id(ItemId::new(7)).unwrap();
        assert!(matches!(
            item.assign_id(ItemId::new(8)),
            Err(KeeError::IdentityViolation(_))
        ));
        assert_eq!(item.id(), Some(ItemId::new(7)));
    }

    #[test]
    fn json_roundtrip_restores_fields_and_id() {
        let mut item = login();
        item.set_entry("email", "me@example.com").unwrap();
        let json = item.to_json().unwrap();

        let restored = Item::from_json(ItemKind::Password, ItemId::new(3), &json).unwrap();
        assert_eq!(restored.data(), item.data());
        assert_eq!(restored.id(), Some(ItemId::new(3)));
    }

    #[test]
    fn kind_parsing() {
        assert_eq!("password".parse::<ItemKind>().unwrap(), ItemKind::Password);
        assert_eq!("Cards".parse::<ItemKind>().unwrap(), ItemKind::Card);
        assert_eq!("identities".parse::<ItemKind>().unwrap(), ItemKind::Identity);
        assert!("wallet".parse::<ItemKind>().is_err());

        assert_eq!(ItemKind::from_stored("Card"), Some(ItemKind::Card));
        assert_eq!(ItemKind::from_stored("card"), None);
    }

    #[test]
    fn required_keys_per_kind() {
        let keys: Vec<_> = ItemKind::Card.required_keys().collect();
        assert_eq!(keys, ["number", "cvv"]);
        let keys: Vec<_> = ItemKind::Identity.required_keys().collect();
        assert_eq!(keys, ["full_name"]);
    }
}
