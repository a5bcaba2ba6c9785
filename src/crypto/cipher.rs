//! AES-256-GCM authenticated encryption of a single secret.
//!
//! Each call to `encrypt` generates a fresh random 12-byte nonce and
//! returns it alongside the ciphertext (plaintext + 16-byte auth tag).
//! No associated data is used.  Every failure in `decrypt` collapses
//! into `MaultError::Cipher` so a wrong key is indistinguishable from
//! tampered or truncated data.

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use zeroize::Zeroizing;

use crate::errors::{MaultError, Result};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// A nonce and the ciphertext it sealed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    pub nonce: Vec<u8>,
    pub cipher_text: Vec<u8>,
}

/// Encrypt `plaintext` with a 32-byte `key`.
pub fn encrypt(plaintext: &[u8], key: &[u8]) -> Result<Sealed> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|e| {
        log::debug!("seal rejected key: {e}");
        MaultError::Cipher
    })?;

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let cipher_text = cipher.encrypt(&nonce, plaintext).map_err(|e| {
        log::debug!("seal failed: {e}");
        MaultError::Cipher
    })?;

    Ok(Sealed {
        nonce: nonce.to_vec(),
        cipher_text,
    })
}

/// Decrypt and authenticate `cipher_text` sealed under `nonce` and `key`.
///
/// The plaintext is wiped from memory when the returned buffer drops.
pub fn decrypt(nonce: &[u8], cipher_text: &[u8], key: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    if nonce.len() != NONCE_LEN {
        log::debug!("open rejected nonce of {} bytes", nonce.len());
        return Err(MaultError::Cipher);
    }
    if cipher_text.len() < TAG_LEN {
        log::debug!("open rejected truncated ciphertext");
        return Err(MaultError::Cipher);
    }

    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| {
        log::debug!("open rejected key of {} bytes", key.len());
        MaultError::Cipher
    })?;

    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce), cipher_text)
        .map_err(|_| {
            log::debug!("open failed tag verification");
            MaultError::Cipher
        })?;

    Ok(Zeroizing::new(plaintext))
}
