use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{KeeError, Result};
use crate::vault::Strategies;

/// User-level configuration, loaded from `<config_dir>/kee.toml`.
///
/// Every field has a sensible default so Kee works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Hasher id for new vaults (e.g. "SHA256").
    #[serde(default = "default_hasher")]
    pub hasher: String,

    /// Cipher id for new vaults (e.g. "AES-CBC").
    #[serde(default = "default_cipher")]
    pub cipher: String,

    /// Encoder id for new vaults (e.g. "Base64").
    #[serde(default = "default_encoder")]
    pub encoder: String,

    /// Length of passwords produced by `kee generate`.
    #[serde(default = "default_password_length")]
    pub password_length: usize,

    /// Bookmark file name, relative to the config directory.
    #[serde(default = "default_bookmarks_file")]
    pub bookmarks_file: String,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_hasher() -> String {
    "SHA256".to_string()
}

fn default_cipher() -> String {
    "AES-CBC".to_string()
}

fn default_encoder() -> String {
    "Base64".to_string()
}

fn default_password_length() -> usize {
    20
}

fn default_bookmarks_file() -> String {
    "bookmarks.toml".to_string()
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            hasher: default_hasher(),
            cipher: default_cipher(),
            encoder: default_encoder(),
            password_length: default_password_length(),
            bookmarks_file: default_bookmarks_file(),
        }
    }
}

impl Settings {
    /// Name of the config file inside the config directory.
    const FILE_NAME: &'static str = "kee.toml";

    /// The per-user config directory, e.g. `~/.config/kee`.
    pub fn default_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("kee"))
            .ok_or_else(|| KeeError::ConfigError("cannot determine the config directory".into()))
    }

    /// Load settings from `<config_dir>/kee.toml`.
    ///
    /// If the file does not exist, defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(config_dir: &Path) -> Result<Self> {
        let config_path = config_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            KeeError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        if settings.password_length == 0 {
            return Err(KeeError::ConfigError(format!(
                "{}: password_length must be at least 1",
                config_path.display()
            )));
        }

        Ok(settings)
    }

    /// Resolve the configured strategy ids.
    pub fn strategies(&self) -> Result<Strategies> {
        Strategies::from_ids(&self.hasher, &self.cipher, &self.encoder)
    }

    /// Full path of the bookmark file.
    pub fn bookmarks_path(&self, config_dir: &Path) -> PathBuf {
        config_dir.join(&self.bookmarks_file)
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings_are_sensible() {
        let s = Settings::default();
        assert_eq!(s.hasher, "SHA256");
        assert_eq!(s.cipher, "AES-CBC");
        assert_eq!(s.encoder, "Base64");
        assert_eq!(s.password_length, 20);
        assert_eq!(s.bookmarks_file, "bookmarks.toml");
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let config = r#"
hasher = "SHA512"
encoder = "Base32"
password_length = 32
bookmarks_file = "known.toml"
"#;
        fs::write(tmp.path().join("kee.toml"), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.hasher, "SHA512");
        assert_eq!(settings.encoder, "Base32");
        assert_eq!(settings.password_length, 32);
        // Unset fields keep their defaults.
        assert_eq!(settings.cipher, "AES-CBC");
        assert_eq!(
            settings.bookmarks_path(tmp.path()),
            tmp.path().join("known.toml")
        );
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("kee.toml"), "not valid {{toml").unwrap();

        let result = Settings::load(tmp.path());
        assert!(matches!(result, Err(KeeError::ConfigError(_))));
    }

    #[test]
    fn zero_password_length_is_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("kee.toml"), "password_length = 0\n").unwrap();
        assert!(matches!(
            Settings::load(tmp.path()),
            Err(KeeError::ConfigError(_))
        ));
    }

    #[test]
    fn strategies_resolve_configured_ids() {
        let settings = Settings {
            hasher: "SHA512".into(),
            encoder: "Base32".into(),
            ..Settings::default()
        };
        let strategies = settings.strategies().unwrap();
        assert_eq!(strategies.hasher.id(), "SHA512");
        assert_eq!(strategies.cipher.id(), "AES-CBC");
        assert_eq!(strategies.encoder.id(), "Base32");
    }

    #[test]
    fn unknown_strategy_id_is_reported() {
        let settings = Settings {
            cipher: "ROT13".into(),
            ..Settings::default()
        };
        assert!(matches!(
            settings.strategies(),
            Err(KeeError::UnknownStrategy { family: "cipher", .. })
        ));
    }
}
