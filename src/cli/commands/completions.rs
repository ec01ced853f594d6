//! `kee completions`: print a completion script for the `kee` binary.
//!
//! The script covers every subcommand, including nested `group`, `item`
//! and `bookmarks` actions:
//!
//!   kee completions bash > ~/.local/share/bash-completion/completions/kee
//!   kee completions zsh > "${fpath[1]}/_kee"

use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::errors::Result;

const BIN_NAME: &str = "kee";

pub fn execute(shell: Shell) -> Result<()> {
    let mut stdout = io::stdout().lock();
    write_script(shell, &mut stdout)?;
    stdout.flush()?;
    Ok(())
}

/// Render the completion script for `shell` into `out`.
fn write_script(shell: Shell, out: &mut dyn Write) -> Result<()> {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, BIN_NAME, out);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(shell: Shell) -> String {
        let mut buf = Vec::new();
        write_script(shell, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn bash_script_knows_vault_subcommands() {
        let bash = script(Shell::Bash);
        for word in ["rotate-key", "bookmarks", "strategy", "destroy"] {
            assert!(bash.contains(word), "missing {word}");
        }
    }

    #[test]
    fn zsh_script_includes_nested_flags() {
        let zsh = script(Shell::Zsh);
        assert!(zsh.contains("#compdef kee"));
        assert!(zsh.contains("--reveal"));
    }

    #[test]
    fn every_shell_produces_output() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell, Shell::Elvish] {
            assert!(!script(shell).is_empty(), "{shell}");
        }
    }
}
