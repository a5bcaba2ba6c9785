//! Configuration — vault home resolution and `config.toml` settings.

pub mod settings;

pub use settings::{resolve_home, Settings};
