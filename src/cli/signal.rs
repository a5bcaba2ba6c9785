//! Forward SIGINT / SIGTERM into the command `Context`.
//!
//! The handler only stores into the context's cancel flag; everything
//! else (restoring the terminal, printing `Aborted.`) happens on the
//! normal return path once a blocked call notices the flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use crate::context::Context;

static CANCEL_FLAG: OnceLock<Arc<AtomicBool>> = OnceLock::new();

#[cfg(unix)]
extern "C" fn on_signal(_signum: libc::c_int) {
    if let Some(flag) = CANCEL_FLAG.get() {
        flag.store(true, Ordering::SeqCst);
    }
}

/// Install the handlers for `ctx`.
///
/// Only the first context ever passed is wired up; returns `false` if
/// handlers were already installed or could not be installed.
pub fn forward_interrupts(ctx: &Context) -> bool {
    if CANCEL_FLAG.set(ctx.cancel_flag()).is_err() {
        return false;
    }
    install()
}

#[cfg(unix)]
fn install() -> bool {
    let handler = on_signal as extern "C" fn(libc::c_int) as libc::sighandler_t;
    [libc::SIGINT, libc::SIGTERM]
        .into_iter()
        .all(|signum| unsafe { libc::signal(signum, handler) != libc::SIG_ERR })
}

#[cfg(not(unix))]
fn install() -> bool {
    false
}
