//! Password-based key derivation using Argon2id.
//!
//! Argon2id is a memory-hard KDF that protects against brute-force and
//! GPU-based attacks.  The reference parameters are t=1, m=64 MiB, p=4
//! with a 32-byte output; they are fixed for a vault's lifetime because
//! the stored verifier only matches keys derived with the same params.

use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use zeroize::Zeroizing;

use crate::errors::{MaultError, Result};

/// Length of the salt generated at enrollment (128 bits).
pub const SALT_LEN: usize = 16;

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// Minimum safe memory cost in KiB (8 MB).
const MIN_MEMORY_KIB: u32 = 8_192;

/// A derived key that is wiped from memory on drop.
pub type DerivedKey = Zeroizing<[u8; KEY_LEN]>;

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Memory cost in KiB (default: 65 536 = 64 MB).
    pub memory_kib: u32,
    /// Number of iterations (default: 1).
    pub iterations: u32,
    /// Parallelism lanes (default: 4).
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_kib: 65_536,
            iterations: 1,
            parallelism: 4,
        }
    }
}

impl KdfParams {
    /// The cheapest parameters `derive_key_with_params` accepts.
    ///
    /// Only meant for tests, where the full 64 MB cost makes every
    /// authentication noticeably slow.
    pub fn minimum() -> Self {
        Self {
            memory_kib: MIN_MEMORY_KIB,
            iterations: 1,
            parallelism: 1,
        }
    }
}

/// Derive a 32-byte key from a password and salt with the reference params.
pub fn derive_key(password: &[u8], salt: &[u8]) -> Result<DerivedKey> {
    derive_key_with_params(password, salt, &KdfParams::default())
}

/// Derive a 32-byte key with explicit Argon2id parameters.
///
/// The same password + salt + params will always produce the same key.
pub fn derive_key_with_params(
    password: &[u8],
    salt: &[u8],
    kdf_params: &KdfParams,
) -> Result<DerivedKey> {
    if kdf_params.memory_kib < MIN_MEMORY_KIB {
        return Err(MaultError::KeyDerivationFailed(format!(
            "Argon2 memory_kib must be at least {MIN_MEMORY_KIB} (got {})",
            kdf_params.memory_kib
        )));
    }
    if kdf_params.iterations < 1 {
        return Err(MaultError::KeyDerivationFailed(
            "Argon2 iterations must be at least 1".into(),
        ));
    }
    if kdf_params.parallelism < 1 {
        return Err(MaultError::KeyDerivationFailed(
            "Argon2 parallelism must be at least 1".into(),
        ));
    }

    let params = Params::new(
        kdf_params.memory_kib,
        kdf_params.iterations,
        kdf_params.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| MaultError::KeyDerivationFailed(format!("invalid Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    argon2
        .hash_password_into(password, salt, key.as_mut_slice())
        .map_err(|e| MaultError::KeyDerivationFailed(format!("Argon2id hashing failed: {e}")))?;

    Ok(key)
}

/// Generate `len` cryptographically random bytes for use as a salt.
///
/// Call sites use `SALT_LEN`.
pub fn generate_salt(len: usize) -> Vec<u8> {
    let mut salt = vec![0u8; len];
    rand::rng().fill_bytes(&mut salt);
    salt
}
