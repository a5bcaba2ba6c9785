//! `mault get` — decrypt and print a single secret's value.

use std::io::{self, Write};

use crate::cli::Session;
use crate::errors::Result;
use crate::vault::PasswordReader;

/// Execute the `get` command.
pub fn execute<P>(session: &Session, reader: &P, key: &str) -> Result<()>
where
    P: PasswordReader + ?Sized,
{
    let plaintext = reveal(session, reader, key)?;

    // Print the raw value to stdout so it can be piped.
    let mut stdout = io::stdout().lock();
    stdout.write_all(&plaintext)?;
    stdout.write_all(b"\n")?;
    stdout.flush()?;

    Ok(())
}

/// Authenticate and decrypt `key` without printing it.
pub fn reveal<P>(session: &Session, reader: &P, key: &str) -> Result<zeroize::Zeroizing<Vec<u8>>>
where
    P: PasswordReader + ?Sized,
{
    let auth = session.authenticate(reader)?;
    session
        .secrets()
        .reveal(session.context(), key, &auth, session.kdf_params())
}
