//! `mault completions` — generate shell completion scripts.
//!
//! Usage:
//!   mault completions bash > ~/.local/share/bash-completion/completions/mault
//!   mault completions zsh
//!   mault completions fish
//!   mault completions powershell

use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::errors::{MaultError, Result};

/// Execute the `completions` command.
pub fn execute(shell: &str) -> Result<()> {
    let shell = parse_shell(shell)?;
    let mut stdout = io::stdout().lock();
    write_completions(shell, &mut stdout);
    stdout.flush()?;
    Ok(())
}

/// Write the completion script for `shell` to `out`.
fn write_completions(shell: Shell, out: &mut impl Write) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "mault", out);
}

/// Parse a shell name string into a `Shell` enum.
fn parse_shell(name: &str) -> Result<Shell> {
    match name.to_lowercase().as_str() {
        "bash" => Ok(Shell::Bash),
        "zsh" => Ok(Shell::Zsh),
        "fish" => Ok(Shell::Fish),
        "powershell" | "ps" => Ok(Shell::PowerShell),
        "elvish" => Ok(Shell::Elvish),
        other => Err(MaultError::CommandFailed(format!(
            "unknown shell '{other}', supported: bash, zsh, fish, powershell, elvish"
        ))),
    }
}
