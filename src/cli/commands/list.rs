//! `mault list` — display all secret names in a table.

use crate::cli::output;
use crate::cli::Session;
use crate::errors::{MaultError, Result};

/// Execute the `list` command. Needs no credential.
pub fn execute(session: &Session) -> Result<()> {
    if !session.master().is_initialized() {
        output::warning(&MaultError::NotInitialized.to_string());
    }

    let keys = session.secrets().list(session.context())?;

    if !keys.is_empty() {
        output::info(&format!("{} secret(s)", keys.len()));
    }
    output::print_keys_table(&keys);

    Ok(())
}
