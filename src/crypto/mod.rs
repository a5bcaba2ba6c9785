//! Cryptographic primitives for Mault.
//!
//! This module provides:
//! - Argon2id password-based key derivation (`kdf`)
//! - Master password strength policy (`policy`)
//! - AES-256-GCM encryption and decryption (`cipher`)
//! - Random password generation (`generate`)

pub mod cipher;
pub mod generate;
pub mod kdf;
pub mod policy;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, derive_key, ...};
pub use cipher::{decrypt, encrypt, Sealed};
pub use generate::generate_password;
pub use kdf::{
    derive_key, derive_key_with_params, generate_salt, DerivedKey, KdfParams, KEY_LEN, SALT_LEN,
};
pub use policy::{check_strength, PasswordRule, PolicyError};
