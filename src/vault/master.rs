//! Master credential manager — enrollment and authentication.
//!
//! The vault is `Uninitialized` until `enroll` stores the single master
//! record (SHA-256 verifier of the derived key + salt) and `Initialized`
//! forever after.  `authenticate` is the gate every secret operation
//! passes through.

use std::fmt;

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::context::Context;
use crate::crypto::kdf::{self, DerivedKey, KdfParams, SALT_LEN};
use crate::crypto::policy;
use crate::errors::{MaultError, Result};
use crate::storage::{MasterRecord, MasterRepository};

use super::reader::PasswordReader;

/// Prompt shown when asking for the master password.
pub const MASTER_PROMPT: &str = "Enter the master password";

/// The product of one successful authentication.
///
/// Lives for a single command and is never cached. The master password
/// and derived key are wiped on drop; the salt is not secret and is kept
/// as a plain `Vec`.
pub struct AuthResult {
    pub master_password: Zeroizing<Vec<u8>>,
    pub salt: Vec<u8>,
    pub derived_key: DerivedKey,
}

impl AuthResult {
    /// Derive the key again from the master password and salt.
    ///
    /// Decryption uses this instead of `derived_key` so the key that
    /// opens a secret is always freshly computed.
    pub fn rederive_key(&self, params: &KdfParams) -> Result<DerivedKey> {
        kdf::derive_key_with_params(&self.master_password, &self.salt, params)
    }
}

impl fmt::Debug for AuthResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthResult")
            .field("master_password", &"<redacted>")
            .field("salt", &self.salt)
            .field("derived_key", &"<redacted>")
            .finish()
    }
}

/// One-way verifier stored in place of the key.
fn verifier(key: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(key));
    out
}

/// Owns the master record through a `MasterRepository`.
pub struct MasterManager<R> {
    repository: R,
    kdf_params: KdfParams,
}

impl<R: MasterRepository> MasterManager<R> {
    /// Manager using the reference Argon2id parameters.
    pub fn new(repository: R) -> Self {
        Self::with_params(repository, KdfParams::default())
    }

    pub fn with_params(repository: R, kdf_params: KdfParams) -> Self {
        Self {
            repository,
            kdf_params,
        }
    }

    pub fn kdf_params(&self) -> &KdfParams {
        &self.kdf_params
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// `true` iff a master record with a non-empty salt exists.
    ///
    /// Lookup failures read as "not initialized".
    pub fn is_initialized(&self) -> bool {
        match self.repository.get_first() {
            Ok(Some(record)) => !record.salt.is_empty(),
            Ok(None) => false,
            Err(e) => {
                log::warn!("could not read master record: {e}");
                false
            }
        }
    }

    /// The stored salt. Fails with `NotInitialized` if there is none.
    pub fn salt(&self) -> Result<Vec<u8>> {
        match self.repository.get_first()? {
            Some(record) if !record.salt.is_empty() => Ok(record.salt),
            _ => Err(MaultError::NotInitialized),
        }
    }

    /// Derive a key with this manager's parameters.
    pub fn derive_key(&self, password: &[u8], salt: &[u8]) -> Result<DerivedKey> {
        kdf::derive_key_with_params(password, salt, &self.kdf_params)
    }

    /// Store the verifier of `derived_key` together with `salt`.
    ///
    /// Never overwrites: a second enrollment fails with
    /// `AlreadyInitialized` and leaves the first record in place.
    pub fn enroll(&self, derived_key: &[u8], salt: &[u8]) -> Result<()> {
        if salt.is_empty() {
            return Err(MaultError::InvalidSalt("salt cannot be empty"));
        }
        if self.repository.get_first()?.is_some() {
            return Err(MaultError::AlreadyInitialized);
        }

        let record = MasterRecord {
            verifier_hash: verifier(derived_key).to_vec(),
            salt: salt.to_vec(),
        };
        self.repository.create(&record)?;
        log::debug!("master record enrolled");
        Ok(())
    }

    /// Check strength, generate a salt, derive and enroll in one go.
    pub fn enroll_password(&self, ctx: &Context, password: &[u8]) -> Result<()> {
        policy::check_strength(password)?;
        if self.is_initialized() {
            return Err(MaultError::AlreadyInitialized);
        }

        ctx.check()?;
        let salt = kdf::generate_salt(SALT_LEN);
        let key = self.derive_key(password, &salt)?;
        ctx.check()?;

        self.enroll(key.as_slice(), &salt)
    }

    /// Compare the verifier of `candidate_key` with the stored one in
    /// constant time.  Any lookup error counts as a mismatch.
    pub fn verifier_matches(&self, candidate_key: &[u8]) -> bool {
        let record = match self.repository.get_first() {
            Ok(Some(record)) => record,
            Ok(None) => return false,
            Err(e) => {
                log::warn!("could not read master record: {e}");
                return false;
            }
        };

        let candidate = verifier(candidate_key);
        candidate.as_slice().ct_eq(&record.verifier_hash).into()
    }

    /// Prompt for the master password and verify it.
    ///
    /// Cancellation is observed before the prompt and again after it,
    /// so an aborted session never spends time on key derivation.
    pub fn authenticate<P>(&self, ctx: &Context, reader: &P) -> Result<AuthResult>
    where
        P: PasswordReader + ?Sized,
    {
        let salt = self.salt()?;

        ctx.check()?;
        let master_password = reader.read_password(ctx, MASTER_PROMPT)?;
        ctx.check()?;

        let derived_key = self.derive_key(&master_password, &salt)?;
        if !self.verifier_matches(derived_key.as_slice()) {
            log::debug!("derived key does not match the stored verifier");
            return Err(MaultError::AuthFailed);
        }

        Ok(AuthResult {
            master_password,
            salt,
            derived_key,
        })
    }
}
