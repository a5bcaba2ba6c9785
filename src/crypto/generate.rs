//! Random password generation for new secrets.

use rand::Rng;
use zeroize::Zeroizing;

use crate::errors::{MaultError, Result};

/// Characters a generated password is drawn from.
const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!#%&*-_?";

pub const DEFAULT_LENGTH: usize = 20;
pub const MIN_LENGTH: usize = 8;
pub const MAX_LENGTH: usize = 128;

/// Generate a random password of `length` characters from `CHARSET`.
///
/// Each character is sampled uniformly with the thread-local CSPRNG.
pub fn generate_password(length: usize) -> Result<Zeroizing<String>> {
    if !(MIN_LENGTH..=MAX_LENGTH).contains(&length) {
        return Err(MaultError::CommandFailed(format!(
            "password length must be between {MIN_LENGTH} and {MAX_LENGTH} (got {length})"
        )));
    }

    let mut rng = rand::rng();
    let password: String = (0..length)
        .map(|_| char::from(CHARSET[rng.random_range(0..CHARSET.len())]))
        .collect();

    Ok(Zeroizing::new(password))
}
