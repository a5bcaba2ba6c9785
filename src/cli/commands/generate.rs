//! `mault generate` — print a random password.

use crate::crypto::generate_password;
use crate::errors::Result;

/// Execute the `generate` command.
pub fn execute(length: usize) -> Result<()> {
    let password = generate_password(length)?;
    println!("{}", password.as_str());
    Ok(())
}
