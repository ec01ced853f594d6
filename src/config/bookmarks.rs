//! Known vault locations.
//!
//! The list is an ordinary value: load it, change it, save it.  Entries
//! are keyed by location, so adding a vault twice keeps one entry.
//!
//! ```toml
//! [[bookmark]]
//! location = "/home/me/personal.kee"
//! added_at = "2026-01-02T03:04:05Z"
//! ```

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{KeeError, Result};

/// One remembered vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub location: PathBuf,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct BookmarkFile {
    #[serde(default, rename = "bookmark")]
    bookmarks: Vec<Bookmark>,
}

/// The bookmark list backed by a TOML file.
#[derive(Debug)]
pub struct Bookmarks {
    path: PathBuf,
    entries: Vec<Bookmark>,
}

impl Bookmarks {
    /// Load bookmarks from `path`.  A missing file is an empty list.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Ok(Self {
                path,
                entries: Vec::new(),
            });
        }

        let contents = std::fs::read_to_string(&path)?;
        let file: BookmarkFile = toml::from_str(&contents).map_err(|e| {
            KeeError::ConfigError(format!("Failed to parse {}: {e}", path.display()))
        })?;

        Ok(Self {
            path,
            entries: file.bookmarks,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[Bookmark] {
        &self.entries
    }

    pub fn locations(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(|b| b.location.as_path())
    }

    pub fn contains(&self, location: &Path) -> bool {
        self.entries.iter().any(|b| b.location == location)
    }

    /// Remember `location`.  Returns `false` if it was already known.
    pub fn add(&mut self, location: impl Into<PathBuf>) -> bool {
        let location = location.into();
        if self.contains(&location) {
            return false;
        }
        debug!(location = %location.display(), "bookmark added");
        self.entries.push(Bookmark {
            location,
            added_at: Utc::now(),
        });
        true
    }

    pub fn remove(&mut self, location: &Path) -> Result<Bookmark> {
        let pos = self
            .entries
            .iter()
            .position(|b| b.location == location)
            .ok_or_else(|| KeeError::NotFound(format!("bookmark '{}'", location.display())))?;
        Ok(self.entries.remove(pos))
    }

    /// Write the list back to its file, creating parent directories.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = BookmarkFile {
            bookmarks: self.entries.clone(),
        };
        let contents = toml::to_string_pretty(&file)
            .map_err(|e| KeeError::SerializationError(format!("bookmarks: {e}")))?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}
