//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use dialoguer::Confirm;
use zeroize::Zeroizing;

use crate::config::{Bookmarks, Settings};
use crate::errors::{KeeError, Result};
use crate::vault::Vault;

/// Environment variable holding the master key (scripts/CI).
pub const MASTER_KEY_ENV: &str = "KEE_MASTER_KEY";

/// Environment variable holding the replacement key for `rotate-key`.
pub const NEW_MASTER_KEY_ENV: &str = "KEE_NEW_MASTER_KEY";

/// Minimum master key length for new keys.
const MIN_MASTER_KEY_LEN: usize = 8;

/// Kee CLI: local encrypted credential vault.
#[derive(Parser)]
#[command(name = "kee", about = "Local encrypted credential vault", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault file to operate on
    #[arg(long, env = "KEE_VAULT", global = true)]
    pub vault: Option<PathBuf>,

    /// Configuration directory (default: the user config dir + /kee)
    #[arg(long, env = "KEE_CONFIG_DIR", global = true)]
    pub config_dir: Option<PathBuf>,

    /// Log debug events to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new vault
    Create {
        /// Display name (default: the file name)
        name: Option<String>,
        /// Hasher id (default from settings)
        #[arg(long)]
        hasher: Option<String>,
        /// Cipher id (default from settings)
        #[arg(long)]
        cipher: Option<String>,
        /// Encoder id (default from settings)
        #[arg(long)]
        encoder: Option<String>,
    },

    /// Show vault metadata
    Info,

    /// List groups
    Groups,

    /// Manage groups
    Group {
        #[command(subcommand)]
        action: GroupAction,
    },

    /// List the items of a group
    Items {
        /// Group name
        group: String,
        /// Show secret fields in clear
        #[arg(long)]
        reveal: bool,
    },

    /// Manage items
    Item {
        #[command(subcommand)]
        action: ItemAction,
    },

    /// Change the vault's display name
    Rename {
        /// New display name
        name: String,
    },

    /// Change the vault's master key
    RotateKey,

    /// Show or change the vault's hasher, cipher and encoder
    Strategy {
        #[arg(long)]
        hasher: Option<String>,
        #[arg(long)]
        cipher: Option<String>,
        #[arg(long)]
        encoder: Option<String>,
    },

    /// Print a random password
    Generate {
        /// Password length (default from settings)
        #[arg(short, long)]
        length: Option<usize>,
        /// Letters and digits only
        #[arg(long)]
        alphanumeric: bool,
    },

    /// Manage the list of known vaults
    Bookmarks {
        #[command(subcommand)]
        action: BookmarkAction,
    },

    /// Delete the vault file
    Destroy {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Group subcommands.
#[derive(clap::Subcommand)]
pub enum GroupAction {
    /// Add an empty group
    Add {
        name: String,
        /// Item kind: password, card or identity
        kind: String,
    },

    /// Detach a group; its rows are dropped when the vault is saved
    Remove { name: String },

    /// Rename a group
    Rename { old: String, new: String },

    /// Delete a group and its items from the store
    Delete {
        name: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// Item subcommands.  Items are addressed by their 1-based position.
#[derive(clap::Subcommand)]
pub enum ItemAction {
    /// Add an item to a group
    Add {
        group: String,
        /// Field as key=value (repeatable)
        #[arg(short, long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
        /// Fill the password field with a generated password
        #[arg(long)]
        generate: bool,
    },

    /// Set one field of an item
    Set {
        group: String,
        index: usize,
        key: String,
        /// New value (omit for interactive prompt)
        value: Option<String>,
    },

    /// Show one item
    Show {
        group: String,
        index: usize,
        /// Show secret fields in clear
        #[arg(long)]
        reveal: bool,
    },

    /// Delete a saved item from the store
    Delete {
        group: String,
        index: usize,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// Bookmark subcommands.
#[derive(clap::Subcommand)]
pub enum BookmarkAction {
    /// List known vaults
    List,
    /// Remember a vault (default: --vault)
    Add { path: Option<PathBuf> },
    /// Forget a vault
    Remove { path: PathBuf },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Get the master key, trying in order:
/// 1. `KEE_MASTER_KEY` env var
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the key is wiped from memory on drop.
pub fn prompt_master_key() -> Result<Zeroizing<String>> {
    if let Some(key) = master_key_from_env(MASTER_KEY_ENV) {
        return Ok(key);
    }

    let key = dialoguer::Password::new()
        .with_prompt("Enter master key")
        .interact()
        .map_err(|e| KeeError::CommandFailed(format!("master key prompt: {e}")))?;
    Ok(Zeroizing::new(key))
}

/// Prompt for a new master key with confirmation.
///
/// A non-empty `env_var` takes precedence over the prompt.  Enforces a
/// minimum length either way.
pub fn prompt_new_master_key(env_var: &str) -> Result<Zeroizing<String>> {
    if let Some(key) = master_key_from_env(env_var) {
        if key.len() < MIN_MASTER_KEY_LEN {
            return Err(KeeError::CommandFailed(format!(
                "master key must be at least {MIN_MASTER_KEY_LEN} characters"
            )));
        }
        return Ok(key);
    }

    loop {
        let key = dialoguer::Password::new()
            .with_prompt("Choose master key")
            .with_confirmation("Confirm master key", "Keys do not match, try again")
            .interact()
            .map_err(|e| KeeError::CommandFailed(format!("master key prompt: {e}")))?;

        if key.len() < MIN_MASTER_KEY_LEN {
            output::warning(&format!(
                "Master key must be at least {MIN_MASTER_KEY_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(Zeroizing::new(key));
    }
}

fn master_key_from_env(var: &str) -> Option<Zeroizing<String>> {
    std::env::var(var)
        .ok()
        .filter(|key| !key.is_empty())
        .map(Zeroizing::new)
}

/// Ask a yes/no question, defaulting to no.
pub fn confirm(prompt: &str) -> Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| KeeError::CommandFailed(format!("confirm prompt: {e}")))
}

/// The vault path from `--vault` / `KEE_VAULT`.
pub fn vault_path(cli: &Cli) -> Result<PathBuf> {
    cli.vault.clone().ok_or_else(|| {
        KeeError::CommandFailed("no vault selected; pass --vault <PATH> or set KEE_VAULT".into())
    })
}

/// The configuration directory from `--config-dir` or the platform default.
pub fn config_dir(cli: &Cli) -> Result<PathBuf> {
    match &cli.config_dir {
        Some(dir) => Ok(dir.clone()),
        None => Settings::default_dir(),
    }
}

pub fn load_settings(cli: &Cli) -> Result<Settings> {
    Settings::load(&config_dir(cli)?)
}

pub fn load_bookmarks(cli: &Cli, settings: &Settings) -> Result<Bookmarks> {
    Bookmarks::load(settings.bookmarks_path(&config_dir(cli)?))
}

/// Load the selected vault and unlock it with the master key.
pub fn open_vault(cli: &Cli) -> Result<Vault> {
    let path = vault_path(cli)?;
    let mut vault = Vault::load(&path)?;
    let key = prompt_master_key()?;
    vault.open(key.as_str())?;
    Ok(vault)
}

/// Convert a 1-based item index from the command line.
pub fn item_position(index: usize) -> Result<usize> {
    index
        .checked_sub(1)
        .ok_or_else(|| KeeError::CommandFailed("item numbers start at 1".into()))
}

/// Clap value parser for `key=value` pairs.
pub fn parse_field(raw: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing field name in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}
