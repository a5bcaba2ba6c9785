//! Secret manager — CRUD over named secret records.
//!
//! Every operation takes the command `Context` and checks it before
//! touching the repository.  Records are immutable once created;
//! `update` is reserved and does nothing.

use zeroize::Zeroizing;

use crate::context::Context;
use crate::crypto::{cipher, KdfParams};
use crate::errors::{MaultError, Result};
use crate::storage::{SecretRecord, SecretRepository};

use super::master::AuthResult;

/// Maximum secret key length in bytes.
pub const MAX_KEY_LEN: usize = 100;

/// Names that collide with CLI subcommands.
const RESERVED_KEYS: [&str; 7] = ["help", "version", "init", "list", "delete", "update", "create"];

/// Validate that a secret key is safe and sensible.
///
/// Allowed: ASCII letters, digits, underscores, hyphens.  Must start
/// with a letter or underscore, be at most 100 characters, and not be
/// one of the reserved command names.
pub fn validate_secret_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(MaultError::InvalidSecretKey("key cannot be empty".into()));
    }

    if key.len() > MAX_KEY_LEN {
        return Err(MaultError::InvalidSecretKey(format!(
            "key cannot exceed {MAX_KEY_LEN} characters"
        )));
    }

    if !key
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
    {
        return Err(MaultError::InvalidSecretKey(format!(
            "'{key}' can only contain letters, numbers, underscores, and hyphens"
        )));
    }

    if !key.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        return Err(MaultError::InvalidSecretKey(format!(
            "'{key}' must start with a letter or underscore"
        )));
    }

    if RESERVED_KEYS
        .iter()
        .any(|reserved| key.eq_ignore_ascii_case(reserved))
    {
        return Err(MaultError::InvalidSecretKey(format!(
            "'{key}' is a reserved key name"
        )));
    }

    Ok(())
}

/// Orchestrates secret records through a `SecretRepository`.
pub struct SecretManager<R> {
    repository: R,
}

impl<R: SecretRepository> SecretManager<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Persist a new record. Fails with `DuplicateKey` if the key exists.
    pub fn create(&self, ctx: &Context, record: &SecretRecord) -> Result<()> {
        validate_secret_key(&record.key)?;
        ctx.check()?;
        self.repository.create(record)?;
        log::debug!("secret '{}' created", record.key);
        Ok(())
    }

    /// All secret keys; never nonces or ciphertexts.
    pub fn list(&self, ctx: &Context) -> Result<Vec<String>> {
        ctx.check()?;
        self.repository.list()
    }

    pub fn get(&self, ctx: &Context, key: &str) -> Result<SecretRecord> {
        ctx.check()?;
        self.repository.get(key)
    }

    /// Remove a record. Deleting a missing key is `SecretNotFound`.
    pub fn delete(&self, ctx: &Context, key: &str) -> Result<()> {
        ctx.check()?;
        self.repository.delete(key)?;
        log::debug!("secret '{key}' deleted");
        Ok(())
    }

    /// Reserved. Always succeeds and never changes stored state.
    // TODO: decide between re-sealing under a fresh nonce and renaming
    // the key before giving this a body.
    pub fn update(&self, _ctx: &Context, key: &str) -> Result<()> {
        self.repository.update(key)
    }

    /// Encrypt `plaintext` under `derived_key` and store it as `key`.
    pub fn seal(
        &self,
        ctx: &Context,
        key: &str,
        plaintext: &[u8],
        derived_key: &[u8],
    ) -> Result<()> {
        validate_secret_key(key)?;
        let sealed = cipher::encrypt(plaintext, derived_key)?;
        self.create(ctx, &SecretRecord::new(key, sealed))
    }

    /// Fetch `key` and decrypt it with a key re-derived from `auth`.
    pub fn reveal(
        &self,
        ctx: &Context,
        key: &str,
        auth: &AuthResult,
        params: &KdfParams,
    ) -> Result<Zeroizing<Vec<u8>>> {
        let record = self.get(ctx, key)?;
        let derived_key = auth.rederive_key(params)?;
        ctx.check()?;
        cipher::decrypt(&record.nonce, &record.cipher_text, derived_key.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::encrypt;
    use crate::storage::MemorySecretRepository;

    fn manager() -> SecretManager<MemorySecretRepository> {
        SecretManager::new(MemorySecretRepository::new())
    }

    fn record(key: &str) -> SecretRecord {
        SecretRecord::new(key, encrypt(b"value", &[7u8; 32]).unwrap())
    }

    #[test]
    fn valid_keys() {
        assert!(validate_secret_key("api").is_ok());
        assert!(validate_secret_key("db-pass").is_ok());
        assert!(validate_secret_key("_private").is_ok());
        assert!(validate_secret_key("AWS_SECRET_2").is_ok());
    }

    #[test]
    fn rejects_bad_keys() {
        assert!(validate_secret_key("").is_err());
        assert!(validate_secret_key("1password").is_err());
        assert!(validate_secret_key("-dash").is_err());
        assert!(validate_secret_key("has space").is_err());
        assert!(validate_secret_key("dot.ted").is_err());
        assert!(validate_secret_key(&"a".repeat(MAX_KEY_LEN + 1)).is_err());
        assert!(validate_secret_key(&"a".repeat(MAX_KEY_LEN)).is_ok());
    }

    #[test]
    fn rejects_reserved_keys_case_insensitively() {
        assert!(validate_secret_key("list").is_err());
        assert!(validate_secret_key("Create").is_err());
        assert!(validate_secret_key("HELP").is_err());
        assert!(validate_secret_key("listing").is_ok());
    }

    #[test]
    fn duplicate_create_leaves_original() {
        let m = manager();
        let ctx = Context::new();
        let original = record("db-pass");
        m.create(&ctx, &original).unwrap();

        let err = m.create(&ctx, &record("db-pass")).unwrap_err();
        assert!(matches!(err, MaultError::DuplicateKey(_)));
        assert_eq!(m.get(&ctx, "db-pass").unwrap(), original);
    }

    #[test]
    fn list_returns_only_keys() {
        let m = manager();
        let ctx = Context::new();
        assert!(m.list(&ctx).unwrap().is_empty());

        m.create(&ctx, &record("b")).unwrap();
        m.create(&ctx, &record("a")).unwrap();
        assert_eq!(m.list(&ctx).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn delete_missing_is_not_found() {
        let m = manager();
        assert!(matches!(
            m.delete(&Context::new(), "ghost"),
            Err(MaultError::SecretNotFound(ref k)) if k == "ghost"
        ));
    }

    #[test]
    fn update_is_a_no_op() {
        let m = manager();
        let ctx = Context::new();
        m.create(&ctx, &record("api")).unwrap();
        let before = m.repository().snapshot();

        m.update(&ctx, "api").unwrap();
        m.update(&ctx, "ghost").unwrap();
        assert_eq!(m.repository().snapshot(), before);
    }

    #[test]
    fn cancelled_context_blocks_every_operation() {
        let m = manager();
        let ctx = Context::new();
        m.create(&ctx, &record("api")).unwrap();
        ctx.cancel();

        assert!(matches!(m.create(&ctx, &record("b")), Err(MaultError::Cancelled)));
        assert!(matches!(m.list(&ctx), Err(MaultError::Cancelled)));
        assert!(matches!(m.get(&ctx, "api"), Err(MaultError::Cancelled)));
        assert!(matches!(m.delete(&ctx, "api"), Err(MaultError::Cancelled)));
        assert_eq!(m.repository().len(), 1);
    }

    #[test]
    fn seal_stores_decryptable_record() {
        let m = manager();
        let ctx = Context::new();
        let key = [3u8; 32];
        m.seal(&ctx, "api", b"sk-123", &key).unwrap();

        let rec = m.get(&ctx, "api").unwrap();
        let plain = cipher::decrypt(&rec.nonce, &rec.cipher_text, &key).unwrap();
        assert_eq!(plain.as_slice(), b"sk-123");
    }

    #[test]
    fn seal_with_invalid_key_stores_nothing() {
        let m = manager();
        assert!(m.seal(&Context::new(), "1bad", b"x", &[3u8; 32]).is_err());
        assert!(m.repository().is_empty());
    }
}
