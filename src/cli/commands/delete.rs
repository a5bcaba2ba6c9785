//! `mault delete` — remove a secret from the vault.

use crate::cli::output;
use crate::cli::terminal::confirm;
use crate::cli::Session;
use crate::errors::Result;
use crate::vault::PasswordReader;

/// Execute the `delete` command.
pub fn execute<P>(session: &Session, reader: &P, key: &str, force: bool) -> Result<()>
where
    P: PasswordReader + ?Sized,
{
    // Unless --force is set, ask for confirmation before deleting.
    if !force && !confirm(session.context(), &format!("Delete secret '{key}'?"))? {
        output::info("Cancelled.");
        return Ok(());
    }

    let _auth = session.authenticate(reader)?;
    session.secrets().delete(session.context(), key)?;

    session.audit("delete", Some(key), None);
    output::success(&format!("Deleted secret '{key}'"));

    Ok(())
}
