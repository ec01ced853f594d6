//! `kee info`: show vault metadata.

use comfy_table::{ContentArrangement, Table};

use crate::cli::{open_vault, Cli};
use crate::errors::Result;

/// Execute the `info` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let vault = open_vault(cli)?;
    let groups = vault.groups()?;
    let items: usize = groups.iter().map(|g| g.len()).sum();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Property", "Value"]);
    table.add_row(vec!["Name".to_string(), vault.name().to_string()]);
    table.add_row(vec![
        "Location".to_string(),
        vault.location().display().to_string(),
    ]);
    table.add_row(vec!["Hasher".to_string(), vault.hasher()?.id().to_string()]);
    table.add_row(vec!["Cipher".to_string(), vault.cipher()?.id().to_string()]);
    table.add_row(vec!["Encoder".to_string(), vault.encoder()?.id().to_string()]);
    table.add_row(vec!["Groups".to_string(), groups.len().to_string()]);
    table.add_row(vec!["Items".to_string(), items.to_string()]);

    println!("{table}");
    Ok(())
}
