//! One module per subcommand.  Each exposes `execute` (or `execute_*`
//! for subcommands with actions) taking the parsed `Cli`.

pub mod bookmarks;
pub mod completions;
pub mod create;
pub mod destroy;
pub mod generate;
pub mod group;
pub mod groups;
pub mod info;
pub mod item;
pub mod items;
pub mod rename;
pub mod rotate;
pub mod strategy;
