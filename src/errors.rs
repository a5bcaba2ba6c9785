use thiserror::Error;

use crate::crypto::policy::PolicyError;

/// All errors that can occur in Mault.
#[derive(Debug, Error)]
pub enum MaultError {
    // --- Credential errors ---
    #[error("{0}")]
    WeakPassword(#[from] PolicyError),

    #[error("Mault has not been initialized yet — run `mault init` first")]
    NotInitialized,

    #[error("Mault has already been initialized")]
    AlreadyInitialized,

    #[error("Authentication failed")]
    AuthFailed,

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Invalid salt: {0}")]
    InvalidSalt(&'static str),

    // --- Secret errors ---
    #[error("Secret '{0}' already exists")]
    DuplicateKey(String),

    #[error("Secret '{0}' not found")]
    SecretNotFound(String),

    #[error("Invalid secret key: {0}")]
    InvalidSecretKey(String),

    // --- Crypto errors ---
    /// Seal or open failure. Deliberately carries no detail so callers
    /// cannot tell a wrong key from corrupted data.
    #[error("Cipher operation failed")]
    Cipher,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Storage errors ---
    #[error("Storage error while trying to {operation}")]
    Store {
        operation: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Password mismatch — passwords do not match")]
    PasswordMismatch,
}

impl MaultError {
    /// Build a closure that wraps a backend error for the named operation.
    ///
    /// Intended for `map_err(MaultError::store("create secret"))`.
    pub fn store(operation: &'static str) -> impl FnOnce(rusqlite::Error) -> Self {
        move |source| Self::Store { operation, source }
    }
}

/// Convenience type alias for Mault results.
pub type Result<T> = std::result::Result<T, MaultError>;

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn store_error_is_opaque_but_keeps_cause() {
        let err = MaultError::store("list secrets")(rusqlite::Error::InvalidQuery);
        assert_eq!(err.to_string(), "Storage error while trying to list secrets");
        assert!(err.source().is_some());
    }

    #[test]
    fn cipher_error_carries_no_detail() {
        assert_eq!(MaultError::Cipher.to_string(), "Cipher operation failed");
    }
}
