//! CLI module — Clap argument parser, per-command session, terminal I/O,
//! output helpers, and command implementations.

pub mod commands;
pub mod logger;
pub mod output;
pub mod signal;
pub mod terminal;

use std::path::{Path, PathBuf};

use clap::Parser;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::audit::AuditLog;
use crate::config::Settings;
use crate::context::Context;
use crate::crypto::{generate, KdfParams};
use crate::errors::{MaultError, Result};
use crate::storage::{Database, SqliteMasterRepository, SqliteSecretRepository};
use crate::vault::{AuthResult, MasterManager, PasswordReader, SecretManager};

/// Mault CLI: a local, single-user secret vault.
#[derive(Parser)]
#[command(
    name = "mault",
    about = "Local secret vault guarded by a single master password",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault home directory (default: <config dir>/mault)
    #[arg(long, env = "MAULT_HOME", global = true)]
    pub home: Option<PathBuf>,

    /// Show debug diagnostics
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Initialize the vault with a new master password
    Init,

    /// Create a new secret
    Create {
        /// Secret name (e.g. db-pass)
        key: String,
        /// Store a randomly generated password instead of prompting
        #[arg(short, long)]
        generate: bool,
        /// Length of the generated password
        #[arg(short, long, requires = "generate")]
        length: Option<usize>,
    },

    /// Decrypt and print a secret
    Get {
        /// Secret name
        key: String,
    },

    /// Delete a secret
    #[command(visible_alias = "del")]
    Delete {
        /// Secret name
        key: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// List all secret names
    #[command(visible_aliases = ["l", "ls"])]
    List,

    /// Print a random password
    Generate {
        /// Number of characters
        #[arg(short, long, default_value_t = generate::DEFAULT_LENGTH)]
        length: usize,
    },

    /// View the history of vault operations
    History {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
        /// Show entries since a duration ago (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        shell: String,
    },
}

// ---------------------------------------------------------------------------
// Per-command session
// ---------------------------------------------------------------------------

/// Everything one command invocation works with.
///
/// Built once in `main`, handed to the command by reference, and closed
/// when the command returns.  Managers borrow the database from here;
/// nothing is kept in process-wide state.
pub struct Session {
    ctx: Context,
    db: Database,
    settings: Settings,
    kdf_params: KdfParams,
}

impl Session {
    pub fn new(ctx: Context, db: Database, settings: Settings) -> Self {
        Self {
            ctx,
            db,
            settings,
            kdf_params: KdfParams::default(),
        }
    }

    /// Open the vault database under `home` and check that it answers.
    pub fn open(home: &Path, settings: Settings, ctx: Context) -> Result<Self> {
        let db = Database::open(
            &settings.database_path(home),
            &settings.database_options(),
        )?;
        db.health_check()?;
        Ok(Self::new(ctx, db, settings))
    }

    /// Override the key-derivation parameters (tests use cheap ones).
    pub fn with_kdf_params(mut self, kdf_params: KdfParams) -> Self {
        self.kdf_params = kdf_params;
        self
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn kdf_params(&self) -> &KdfParams {
        &self.kdf_params
    }

    pub fn master(&self) -> MasterManager<SqliteMasterRepository<'_>> {
        MasterManager::with_params(SqliteMasterRepository::new(&self.db), self.kdf_params)
    }

    pub fn secrets(&self) -> SecretManager<SqliteSecretRepository<'_>> {
        SecretManager::new(SqliteSecretRepository::new(&self.db))
    }

    /// Append to the operation history unless disabled in settings.
    pub fn audit(&self, operation: &str, key: Option<&str>, details: Option<&str>) {
        if self.settings.audit_log {
            AuditLog::new(&self.db).log(operation, key, details);
        }
    }

    /// Authenticate against the master record, recording failures.
    pub fn authenticate<P>(&self, reader: &P) -> Result<AuthResult>
    where
        P: PasswordReader + ?Sized,
    {
        let result = self.master().authenticate(&self.ctx, reader);
        if let Err(MaultError::AuthFailed) = result {
            self.audit("auth-failed", None, None);
        }
        result
    }

    /// Release the database connection.
    pub fn close(self) -> Result<()> {
        self.db.close()
    }
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Prompt for a new master password twice (used during `init`).
///
/// The two entries are compared in constant time; a mismatch is
/// `PasswordMismatch`.  Strength is checked later, at enrollment.
pub fn prompt_new_password<P>(ctx: &Context, reader: &P) -> Result<Zeroizing<Vec<u8>>>
where
    P: PasswordReader + ?Sized,
{
    let password = reader.read_password(ctx, "Choose a master password")?;
    let confirmation = reader.read_password(ctx, "Confirm the master password")?;

    if !bool::from(password.as_slice().ct_eq(confirmation.as_slice())) {
        return Err(MaultError::PasswordMismatch);
    }
    Ok(password)
}
