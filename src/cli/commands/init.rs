//! `mault init` — enroll the master password.

use crate::cli::output;
use crate::cli::{prompt_new_password, Session};
use crate::errors::{MaultError, Result};
use crate::vault::PasswordReader;

/// Execute the `init` command.
pub fn execute<P>(session: &Session, reader: &P) -> Result<()>
where
    P: PasswordReader + ?Sized,
{
    let master = session.master();

    // 1. Refuse to touch an existing vault before asking for anything.
    if master.is_initialized() {
        output::tip("Use `mault create <KEY>` to add secrets to the existing vault.");
        return Err(MaultError::AlreadyInitialized);
    }

    // 2. Master password, entered twice.
    let password = prompt_new_password(session.context(), reader)?;

    // 3. Policy check, salt, derivation and the single master record.
    master.enroll_password(session.context(), &password)?;

    session.audit("init", None, Some("vault initialized"));

    match session.database().path() {
        Some(path) => output::success(&format!("Vault initialized at {}", path.display())),
        None => output::success("Vault initialized"),
    }
    output::tip("Run `mault create <KEY>` to add a secret.");
    output::tip("Run `mault list` to see all secrets.");

    Ok(())
}
