//! `kee item`: add, edit, show and delete items.

use std::io::{self, IsTerminal, Read};

use crate::cli::output;
use crate::cli::{confirm, item_position, load_settings, open_vault, Cli};
use crate::crypto::generate::{self, DEFAULT_ALPHABET};
use crate::errors::{KeeError, Result};
use crate::vault::{Item, ItemKind};

/// Execute `item add`.
pub fn execute_add(
    cli: &Cli,
    group: &str,
    fields: &[(String, String)],
    generate_password: bool,
) -> Result<()> {
    let mut vault = open_vault(cli)?;
    let kind = vault.group(group)?.kind();

    let mut fields = fields.to_vec();
    if generate_password {
        if kind != ItemKind::Password {
            return Err(KeeError::CommandFailed(format!(
                "--generate only applies to password groups, '{group}' holds {kind} items"
            )));
        }
        let settings = load_settings(cli)?;
        let password = generate::password(settings.password_length, DEFAULT_ALPHABET)?;
        fields.retain(|(key, _)| key != "password");
        fields.push(("password".to_string(), password));
    }

    let item = Item::new(kind, fields)?;
    let mut target = vault.group_mut(group)?;
    target.add_item(item)?;
    let count = target.len();
    vault.save()?;

    output::success(&format!("Added item #{count} to '{group}'"));
    if generate_password {
        output::tip(&format!("Show it: kee item show {group} {count} --reveal"));
    }
    Ok(())
}

/// Execute `item set`.
pub fn execute_set(
    cli: &Cli,
    group: &str,
    index: usize,
    key: &str,
    value: Option<&str>,
) -> Result<()> {
    let pos = item_position(index)?;
    let mut vault = open_vault(cli)?;

    let kind = vault.group(group)?.kind();
    let spec = kind.field(key).ok_or_else(|| KeeError::UnknownField {
        kind,
        key: key.to_string(),
    })?;

    // Determine the value from one of three sources.
    let value = if let Some(v) = value {
        if spec.secret {
            output::warning("Value provided on command line; it may appear in shell history.");
        }
        v.to_string()
    } else if !io::stdin().is_terminal() {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf.trim_end().to_string()
    } else if spec.secret {
        dialoguer::Password::new()
            .with_prompt(format!("Enter {key}"))
            .interact()
            .map_err(|e| KeeError::CommandFailed(format!("input prompt: {e}")))?
    } else {
        dialoguer::Input::<String>::new()
            .with_prompt(format!("Enter {key}"))
            .allow_empty(true)
            .interact_text()
            .map_err(|e| KeeError::CommandFailed(format!("input prompt: {e}")))?
    };

    vault.group_mut(group)?.set_entry(pos, key, value)?;
    vault.save()?;

    output::success(&format!("Updated '{key}' of item #{index} in '{group}'"));
    Ok(())
}

/// Execute `item show`.
pub fn execute_show(cli: &Cli, group: &str, index: usize, reveal: bool) -> Result<()> {
    let pos = item_position(index)?;
    let vault = open_vault(cli)?;
    output::print_item(vault.group(group)?.item(pos)?, reveal);
    Ok(())
}

/// Execute `item delete`.
pub fn execute_delete(cli: &Cli, group: &str, index: usize, force: bool) -> Result<()> {
    let pos = item_position(index)?;

    if !force && !confirm(&format!("Delete item #{index} from '{group}'?"))? {
        output::info("Cancelled.");
        return Ok(());
    }

    let mut vault = open_vault(cli)?;
    vault.delete_item(group, pos)?;
    vault.save()?;

    output::success(&format!("Deleted item #{index} from '{group}'"));
    Ok(())
}
