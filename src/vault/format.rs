//! On-disk vault layout.
//!
//! A vault is a single SQLite database with three tables:
//!
//! ```text
//! meta    (name, master_key_hash, hash_salt, cipher_salt,
//!          hasher_id, cipher_id, encoder_id)                 -- one row
//! "group" (name PRIMARY KEY, type)                           -- "Password" | "Card" | "Identity"
//! item    (id AUTOINCREMENT, group_name → "group".name ON DELETE CASCADE, data)
//! ```
//!
//! `item.data` is `encoder.encode(cipher.encrypt(json(fields)))`.  This
//! module only moves rows in and out; it knows nothing about crypto.

use std::path::Path;

use rusqlite::{params, Connection, OpenFlags, OptionalExtension};

use crate::errors::{KeeError, Result};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS meta (
    name            TEXT NOT NULL,
    master_key_hash BLOB NOT NULL,
    hash_salt       BLOB NOT NULL,
    cipher_salt     BLOB NOT NULL,
    hasher_id       TEXT NOT NULL,
    cipher_id       TEXT NOT NULL,
    encoder_id      TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS "group" (
    name TEXT PRIMARY KEY,
    type TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS item (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    group_name TEXT NOT NULL,
    data       BLOB NOT NULL,
    FOREIGN KEY(group_name) REFERENCES "group"(name) ON DELETE CASCADE
);
"#;

/// The `meta` row exactly as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMeta {
    pub name: String,
    pub master_key_hash: Vec<u8>,
    pub hash_salt: Vec<u8>,
    pub cipher_salt: Vec<u8>,
    pub hasher_id: String,
    pub cipher_id: String,
    pub encoder_id: String,
}

/// A `"group"` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredGroup {
    pub name: String,
    pub kind: String,
}

/// An `item` row; `data` is still encoded and encrypted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredItem {
    pub id: i64,
    pub data: Vec<u8>,
}

/// Open an existing vault file.  Never creates one.
pub fn open_existing(path: &Path) -> Result<Connection> {
    if !path.is_file() {
        return Err(KeeError::VaultNotFound(path.to_path_buf()));
    }
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    Ok(conn)
}

/// Create a new vault file with the schema and its single `meta` row.
pub fn create(path: &Path, meta: &StoredMeta) -> Result<Connection> {
    if path.exists() {
        return Err(KeeError::VaultAlreadyExists(path.to_path_buf()));
    }

    // Owner-only from the first byte; SQLite accepts an empty file.
    let mut file = std::fs::OpenOptions::new();
    file.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        file.mode(0o600);
    }
    file.open(path)?;

    let mut conn = Connection::open(path)?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    let tx = conn.transaction()?;
    tx.execute_batch(SCHEMA)?;
    write_meta(&tx, meta)?;
    tx.commit()?;
    Ok(conn)
}

pub fn read_meta(conn: &Connection) -> Result<StoredMeta> {
    conn.query_row(
        "SELECT name, master_key_hash, hash_salt, cipher_salt, hasher_id, cipher_id, encoder_id
         FROM meta",
        [],
        |row| {
            Ok(StoredMeta {
                name: row.get(0)?,
                master_key_hash: row.get(1)?,
                hash_salt: row.get(2)?,
                cipher_salt: row.get(3)?,
                hasher_id: row.get(4)?,
                cipher_id: row.get(5)?,
                encoder_id: row.get(6)?,
            })
        },
    )
    .optional()
    .map_err(|e| KeeError::InvalidVaultFormat(format!("meta table: {e}")))?
    .ok_or_else(|| KeeError::InvalidVaultFormat("missing meta row".into()))
}

/// Replace the `meta` row.
pub fn write_meta(conn: &Connection, meta: &StoredMeta) -> Result<()> {
    conn.execute("DELETE FROM meta", [])?;
    conn.execute(
        "INSERT INTO meta (name, master_key_hash, hash_salt, cipher_salt, hasher_id, cipher_id, encoder_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            meta.name,
            meta.master_key_hash,
            meta.hash_salt,
            meta.cipher_salt,
            meta.hasher_id,
            meta.cipher_id,
            meta.encoder_id,
        ],
    )?;
    Ok(())
}

pub fn read_groups(conn: &Connection) -> Result<Vec<StoredGroup>> {
    let mut stmt = conn.prepare(r#"SELECT name, type FROM "group" ORDER BY rowid"#)?;
    let rows = stmt.query_map([], |row| {
        Ok(StoredGroup {
            name: row.get(0)?,
            kind: row.get(1)?,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn read_items(conn: &Connection, group_name: &str) -> Result<Vec<StoredItem>> {
    let mut stmt = conn.prepare("SELECT id, data FROM item WHERE group_name = ?1 ORDER BY id")?;
    let rows = stmt.query_map([group_name], |row| {
        Ok(StoredItem {
            id: row.get(0)?,
            data: row.get(1)?,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Insert a group row, or update its type if the name already exists.
pub fn upsert_group(conn: &Connection, group: &StoredGroup) -> Result<()> {
    conn.execute(
        r#"INSERT INTO "group" (name, type) VALUES (?1, ?2)
           ON CONFLICT(name) DO UPDATE SET type = excluded.type"#,
        params![group.name, group.kind],
    )?;
    Ok(())
}

/// Insert a new item row and return its assigned id.
pub fn insert_item(conn: &Connection, group_name: &str, data: &[u8]) -> Result<i64> {
    conn.execute(
        "INSERT INTO item (group_name, data) VALUES (?1, ?2)",
        params![group_name, data],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Rewrite an existing item row.  Returns `false` if no row has `id`.
pub fn update_item(conn: &Connection, id: i64, group_name: &str, data: &[u8]) -> Result<bool> {
    let changed = conn.execute(
        "UPDATE item SET group_name = ?1, data = ?2 WHERE id = ?3",
        params![group_name, data, id],
    )?;
    Ok(changed == 1)
}

/// Delete a group row; its items go with it.
pub fn delete_group(conn: &Connection, name: &str) -> Result<()> {
    conn.execute(r#"DELETE FROM "group" WHERE name = ?1"#, [name])?;
    Ok(())
}

pub fn delete_item(conn: &Connection, id: i64) -> Result<()> {
    conn.execute("DELETE FROM item WHERE id = ?1", [id])?;
    Ok(())
}

/// Delete every group whose name is not in `keep`.
pub fn delete_groups_except(conn: &Connection, keep: &[&str]) -> Result<usize> {
    let mut removed = 0;
    for stored in read_groups(conn)? {
        if !keep.contains(&stored.name.as_str()) {
            delete_group(conn, &stored.name)?;
            removed += 1;
        }
    }
    Ok(removed)
}

/// Delete every item whose id is not in `keep`.
pub fn delete_items_except(conn: &Connection, keep: &[i64]) -> Result<usize> {
    let ids: Vec<i64> = {
        let mut stmt = conn.prepare("SELECT id FROM item")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()?
    };

    let mut removed = 0;
    for id in ids.into_iter().filter(|id| !keep.contains(id)) {
        delete_item(conn, id)?;
        removed += 1;
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn meta() -> StoredMeta {
        StoredMeta {
            name: "Personal".into(),
            master_key_hash: b"hash".to_vec(),
            hash_salt: vec![1; 32],
            cipher_salt: vec![2; 32],
            hasher_id: "SHA256".into(),
            cipher_id: "AES-CBC".into(),
            encoder_id: "Base64".into(),
        }
    }

    fn group(name: &str) -> StoredGroup {
        StoredGroup {
            name: name.into(),
            kind: "Password".into(),
        }
    }

    #[cfg(unix)]
    #[test]
    fn created_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("v.kee");
        create(&path, &meta()).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn create_then_read_meta() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("v.kee");
        let conn = create(&path, &meta()).unwrap();
        assert_eq!(read_meta(&conn).unwrap(), meta());
    }

    #[test]
    fn create_refuses_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("v.kee");
        std::fs::write(&path, b"x").unwrap();
        assert!(matches!(
            create(&path, &meta()),
            Err(KeeError::VaultAlreadyExists(_))
        ));
    }

    #[test]
    fn open_existing_never_creates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.kee");
        assert!(matches!(
            open_existing(&path),
            Err(KeeError::VaultNotFound(_))
        ));
        assert!(!path.exists());
    }

    #[test]
    fn write_meta_replaces_the_single_row() {
        let dir = TempDir::new().unwrap();
        let conn = create(&dir.path().join("v.kee"), &meta()).unwrap();

        let mut updated = meta();
        updated.name = "Work".into();
        write_meta(&conn, &updated).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM meta", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(read_meta(&conn).unwrap().name, "Work");
    }

    #[test]
    fn deleting_a_group_cascades_to_items() {
        let dir = TempDir::new().unwrap();
        let conn = create(&dir.path().join("v.kee"), &meta()).unwrap();
        upsert_group(&conn, &group("Web")).unwrap();
        insert_item(&conn, "Web", b"blob-1").unwrap();
        insert_item(&conn, "Web", b"blob-2").unwrap();

        delete_group(&conn, "Web").unwrap();
        assert!(read_items(&conn, "Web").unwrap().is_empty());
    }

    #[test]
    fn update_item_moves_rows_between_groups() {
        let dir = TempDir::new().unwrap();
        let conn = create(&dir.path().join("v.kee"), &meta()).unwrap();
        upsert_group(&conn, &group("Old")).unwrap();
        upsert_group(&conn, &group("New")).unwrap();
        let id = insert_item(&conn, "Old", b"blob").unwrap();

        assert!(update_item(&conn, id, "New", b"blob-2").unwrap());
        assert!(read_items(&conn, "Old").unwrap().is_empty());
        assert_eq!(
            read_items(&conn, "New").unwrap(),
            vec![StoredItem {
                id,
                data: b"blob-2".to_vec()
            }]
        );
        assert!(!update_item(&conn, id + 100, "New", b"x").unwrap());
    }

    #[test]
    fn prune_helpers_keep_only_listed_rows() {
        let dir = TempDir::new().unwrap();
        let conn = create(&dir.path().join("v.kee"), &meta()).unwrap();
        upsert_group(&conn, &group("Keep")).unwrap();
        upsert_group(&conn, &group("Drop")).unwrap();
        let kept = insert_item(&conn, "Keep", b"a").unwrap();
        insert_item(&conn, "Keep", b"b").unwrap();
        insert_item(&conn, "Drop", b"c").unwrap();

        assert_eq!(delete_groups_except(&conn, &["Keep"]).unwrap(), 1);
        assert_eq!(delete_items_except(&conn, &[kept]).unwrap(), 1);

        assert_eq!(read_groups(&conn).unwrap(), vec![group("Keep")]);
        assert_eq!(read_items(&conn, "Keep").unwrap().len(), 1);
    }

    #[test]
    fn upsert_group_updates_type() {
        let dir = TempDir::new().unwrap();
        let conn = create(&dir.path().join("v.kee"), &meta()).unwrap();
        upsert_group(&conn, &group("G")).unwrap();
        upsert_group(
            &conn,
            &StoredGroup {
                name: "G".into(),
                kind: "Card".into(),
            },
        )
        .unwrap();
        assert_eq!(read_groups(&conn).unwrap()[0].kind, "Card");
    }
}
