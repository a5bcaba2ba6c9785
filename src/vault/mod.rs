//! Vault module — the managers that gate and orchestrate secret access.
//!
//! This module provides:
//! - `MasterManager` and `AuthResult` for enrollment and authentication (`master`)
//! - `SecretManager` and secret-key validation (`secrets`)
//! - The `PasswordReader` capability and a scripted reader for tests (`reader`)

pub mod master;
pub mod reader;
pub mod secrets;

// Re-export the most commonly used items.
pub use master::{AuthResult, MasterManager};
pub use reader::{PasswordReader, ScriptedPasswordReader};
pub use secrets::{validate_secret_key, SecretManager};
