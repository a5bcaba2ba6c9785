//! Record shapes persisted by the repositories.

use crate::crypto::Sealed;

/// The singleton record whose presence means the vault is initialized.
///
/// `verifier_hash` is SHA-256 over the derived key, never the password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterRecord {
    pub verifier_hash: Vec<u8>,
    pub salt: Vec<u8>,
}

/// One named secret, sealed under the vault's derived key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretRecord {
    /// Unique, user-facing name of the secret.
    pub key: String,
    pub nonce: Vec<u8>,
    /// AES-GCM output: plaintext length + 16-byte tag.
    pub cipher_text: Vec<u8>,
}

impl SecretRecord {
    pub fn new(key: impl Into<String>, sealed: Sealed) -> Self {
        Self {
            key: key.into(),
            nonce: sealed.nonce,
            cipher_text: sealed.cipher_text,
        }
    }
}
