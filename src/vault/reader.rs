//! The password-reading capability the managers depend on.
//!
//! The interactive implementation lives in `crate::cli::terminal`; the
//! scripted reader here feeds fixed byte strings for tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use zeroize::Zeroizing;

use crate::context::Context;
use crate::errors::{MaultError, Result};

/// Reads one password as raw bytes.
///
/// Implementations must return `MaultError::Cancelled` when `ctx` trips
/// while they wait, and restore any terminal state they changed.
pub trait PasswordReader {
    fn read_password(&self, ctx: &Context, prompt: &str) -> Result<Zeroizing<Vec<u8>>>;
}

impl<T: PasswordReader + ?Sized> PasswordReader for &T {
    fn read_password(&self, ctx: &Context, prompt: &str) -> Result<Zeroizing<Vec<u8>>> {
        (**self).read_password(ctx, prompt)
    }
}

/// Returns queued passwords in order, one per read.
#[derive(Debug, Default)]
pub struct ScriptedPasswordReader {
    passwords: RefCell<VecDeque<Zeroizing<Vec<u8>>>>,
    cancel_on_read: Option<Context>,
    reads: Cell<usize>,
}

impl ScriptedPasswordReader {
    pub fn new<I, P>(passwords: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[u8]>,
    {
        Self {
            passwords: RefCell::new(
                passwords
                    .into_iter()
                    .map(|p| Zeroizing::new(p.as_ref().to_vec()))
                    .collect(),
            ),
            cancel_on_read: None,
            reads: Cell::new(0),
        }
    }

    /// Cancel `ctx` as each password is handed out, simulating an abort
    /// that lands while the user is typing.
    pub fn cancel_on_read(mut self, ctx: Context) -> Self {
        self.cancel_on_read = Some(ctx);
        self
    }

    /// How many reads were attempted.
    pub fn reads(&self) -> usize {
        self.reads.get()
    }
}

impl PasswordReader for ScriptedPasswordReader {
    fn read_password(&self, ctx: &Context, prompt: &str) -> Result<Zeroizing<Vec<u8>>> {
        self.reads.set(self.reads.get() + 1);
        ctx.check()?;

        let password = self.passwords.borrow_mut().pop_front().ok_or_else(|| {
            MaultError::CommandFailed(format!("no scripted input left for '{prompt}'"))
        })?;

        if let Some(target) = &self.cancel_on_read {
            target.cancel();
        }
        Ok(password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_passwords_in_order_then_errors() {
        let reader = ScriptedPasswordReader::new(["first", "second"]);
        let ctx = Context::new();

        assert_eq!(reader.read_password(&ctx, "pw").unwrap().as_slice(), b"first");
        assert_eq!(reader.read_password(&ctx, "pw").unwrap().as_slice(), b"second");
        assert!(reader.read_password(&ctx, "pw").is_err());
        assert_eq!(reader.reads(), 3);
    }

    #[test]
    fn cancelled_context_short_circuits() {
        let reader = ScriptedPasswordReader::new(["pw"]);
        let ctx = Context::new();
        ctx.cancel();
        assert!(matches!(
            reader.read_password(&ctx, "pw"),
            Err(MaultError::Cancelled)
        ));
    }

    #[test]
    fn cancel_on_read_trips_the_context() {
        let ctx = Context::new();
        let reader = ScriptedPasswordReader::new(["pw"]).cancel_on_read(ctx.clone());
        reader.read_password(&ctx, "pw").unwrap();
        assert!(ctx.is_cancelled());
    }
}
