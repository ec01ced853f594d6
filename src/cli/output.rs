//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::{Group, Item};

/// What a secret field shows unless `--reveal` is passed.
const MASK: &str = "********";

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// The text shown for one field value.
pub fn display_value(item: &Item, key: &str, value: &str, reveal: bool) -> String {
    let secret = item.kind().field(key).is_some_and(|f| f.secret);
    if secret && !reveal && !value.is_empty() {
        MASK.to_string()
    } else {
        value.to_string()
    }
}

/// Print a table of groups (Name, Kind, Items).
pub fn print_groups_table(groups: &[Group]) {
    if groups.is_empty() {
        info("No groups in this vault yet.");
        tip("Run `kee group add <NAME> <KIND>` to add your first group.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Kind", "Items"]);

    for g in groups {
        table.add_row(vec![
            g.name().to_string(),
            g.kind().to_string(),
            g.len().to_string(),
        ]);
    }

    println!("{table}");
}

/// Print every item of a group, one row per item, one column per field.
pub fn print_items_table(group: &Group, reveal: bool) {
    if group.is_empty() {
        info(&format!("Group '{}' is empty.", group.name()));
        tip(&format!(
            "Run `kee item add {} -f key=value ...` to add an item.",
            group.name()
        ));
        return;
    }

    let schema = group.kind().schema();
    let mut header = vec!["#".to_string()];
    header.extend(schema.iter().map(|f| f.key.to_string()));

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);

    for (pos, item) in group.items().iter().enumerate() {
        let mut row = vec![(pos + 1).to_string()];
        for field in schema {
            let value = item.data().get(field.key).map_or("", String::as_str);
            row.push(display_value(item, field.key, value, reveal));
        }
        table.add_row(row);
    }

    println!("{table}");
}

/// Print a single item as a two-column Field/Value table.
pub fn print_item(item: &Item, reveal: bool) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Field", "Value"]);

    for field in item.kind().schema() {
        let value = item.data().get(field.key).map_or("", String::as_str);
        table.add_row(vec![
            field.key.to_string(),
            display_value(item, field.key, value, reveal),
        ]);
    }

    println!("{table}");
}
