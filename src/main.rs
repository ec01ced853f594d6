use clap::Parser;
use kee::cli::commands;
use kee::cli::{BookmarkAction, Cli, Commands, GroupAction, ItemAction};
use tracing_subscriber::EnvFilter;

/// Environment variable with a `tracing` filter, e.g. `KEE_LOG=kee=debug`.
const LOG_ENV: &str = "KEE_LOG";

fn main() {
    let cli = Cli::parse();
    init_tracing(if cli.verbose { "debug" } else { "warn" });

    let result = match cli.command {
        Commands::Create {
            ref name,
            ref hasher,
            ref cipher,
            ref encoder,
        } => commands::create::execute(
            &cli,
            name.as_deref(),
            hasher.as_deref(),
            cipher.as_deref(),
            encoder.as_deref(),
        ),
        Commands::Info => commands::info::execute(&cli),
        Commands::Groups => commands::groups::execute(&cli),
        Commands::Group { ref action } => match action {
            GroupAction::Add { name, kind } => commands::group::execute_add(&cli, name, kind),
            GroupAction::Remove { name } => commands::group::execute_remove(&cli, name),
            GroupAction::Rename { old, new } => commands::group::execute_rename(&cli, old, new),
            GroupAction::Delete { name, force } => {
                commands::group::execute_delete(&cli, name, *force)
            }
        },
        Commands::Items { ref group, reveal } => commands::items::execute(&cli, group, reveal),
        Commands::Item { ref action } => match action {
            ItemAction::Add {
                group,
                fields,
                generate,
            } => commands::item::execute_add(&cli, group, fields, *generate),
            ItemAction::Set {
                group,
                index,
                key,
                value,
            } => commands::item::execute_set(&cli, group, *index, key, value.as_deref()),
            ItemAction::Show {
                group,
                index,
                reveal,
            } => commands::item::execute_show(&cli, group, *index, *reveal),
            ItemAction::Delete {
                group,
                index,
                force,
            } => commands::item::execute_delete(&cli, group, *index, *force),
        },
        Commands::Rename { ref name } => commands::rename::execute(&cli, name),
        Commands::RotateKey => commands::rotate::execute(&cli),
        Commands::Strategy {
            ref hasher,
            ref cipher,
            ref encoder,
        } => commands::strategy::execute(
            &cli,
            hasher.as_deref(),
            cipher.as_deref(),
            encoder.as_deref(),
        ),
        Commands::Generate {
            length,
            alphanumeric,
        } => commands::generate::execute(&cli, length, alphanumeric),
        Commands::Bookmarks { ref action } => match action {
            BookmarkAction::List => commands::bookmarks::execute_list(&cli),
            BookmarkAction::Add { path } => commands::bookmarks::execute_add(&cli, path.as_deref()),
            BookmarkAction::Remove { path } => commands::bookmarks::execute_remove(&cli, path),
        },
        Commands::Destroy { force } => commands::destroy::execute(&cli, force),
        Commands::Completions { shell } => commands::completions::execute(shell),
    };

    if let Err(e) = result {
        kee::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}

/// Install the stderr subscriber.  `KEE_LOG` overrides `default_level`.
fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
