//! Interactive, cancellable terminal input.
//!
//! `dialoguer` blocks until the user presses Enter, so the prompt runs on
//! its own thread while the calling thread polls the command `Context`.
//! When the context trips first, the terminal attributes captured before
//! the prompt are put back and `Cancelled` is returned; the abandoned
//! prompt thread dies with the process.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use dialoguer::{Confirm, Password};
use zeroize::Zeroizing;

use crate::context::Context;
use crate::errors::{MaultError, Result};
use crate::vault::PasswordReader;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Masked password prompt on the controlling terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPasswordReader;

impl TerminalPasswordReader {
    pub fn new() -> Self {
        Self
    }
}

impl PasswordReader for TerminalPasswordReader {
    fn read_password(&self, ctx: &Context, prompt: &str) -> Result<Zeroizing<Vec<u8>>> {
        ctx.check()?;

        let saved = SavedTerminal::capture();
        let (tx, rx) = mpsc::channel();
        let prompt = prompt.to_string();

        thread::Builder::new()
            .name("password-prompt".into())
            .spawn(move || {
                let answer = Password::new()
                    .with_prompt(prompt)
                    .allow_empty_password(true)
                    .interact()
                    .map(|pw| Zeroizing::new(pw.into_bytes()));
                let _ = tx.send(answer);
            })?;

        loop {
            match rx.recv_timeout(POLL_INTERVAL) {
                Ok(Ok(password)) => return Ok(password),
                Ok(Err(_)) | Err(RecvTimeoutError::Timeout) if ctx.is_cancelled() => {
                    saved.restore();
                    eprintln!();
                    return Err(MaultError::Cancelled);
                }
                Ok(Err(e)) => {
                    return Err(MaultError::CommandFailed(format!("password prompt: {e}")));
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(MaultError::CommandFailed(
                        "password prompt ended unexpectedly".into(),
                    ));
                }
            }
        }
    }
}

/// Ask a yes/no question, defaulting to "no".
///
/// Ctrl-C at the prompt reads as `Cancelled`, like everywhere else.
pub fn confirm(ctx: &Context, prompt: &str) -> Result<bool> {
    ctx.check()?;
    let saved = SavedTerminal::capture();

    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| {
            let interrupted = matches!(
                &e,
                dialoguer::Error::IO(io) if io.kind() == std::io::ErrorKind::Interrupted
            );
            if interrupted || ctx.is_cancelled() {
                saved.restore();
                MaultError::Cancelled
            } else {
                MaultError::CommandFailed(format!("confirm prompt: {e}"))
            }
        })
}

/// Path of the controlling terminal, used when stdin is redirected.
#[cfg(unix)]
const CONTROLLING_TTY: &str = "/dev/tty";

/// Which descriptor the prompt reads from.
///
/// `console` reads from stdin when it is a terminal and from the
/// controlling terminal otherwise (e.g. `echo v | mault create api`), so
/// attributes have to be saved and restored on that same device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(not(unix), allow(dead_code))]
enum PromptDevice {
    Stdin,
    ControllingTerminal,
}

#[cfg_attr(not(unix), allow(dead_code))]
fn prompt_device(stdin_is_terminal: bool) -> PromptDevice {
    if stdin_is_terminal {
        PromptDevice::Stdin
    } else {
        PromptDevice::ControllingTerminal
    }
}

/// An open handle on the prompt's terminal.
#[cfg(unix)]
enum TerminalHandle {
    Stdin,
    Tty(std::fs::File),
}

#[cfg(unix)]
impl TerminalHandle {
    fn open(device: PromptDevice) -> Option<Self> {
        match device {
            PromptDevice::Stdin => Some(Self::Stdin),
            PromptDevice::ControllingTerminal => std::fs::OpenOptions::new()
                .read(true)
                .write(true)
                .open(CONTROLLING_TTY)
                .map(Self::Tty)
                .map_err(|e| log::debug!("could not open {CONTROLLING_TTY}: {e}"))
                .ok(),
        }
    }

    fn fd(&self) -> std::os::unix::io::RawFd {
        use std::os::unix::io::AsRawFd;
        match self {
            Self::Stdin => libc::STDIN_FILENO,
            Self::Tty(file) => file.as_raw_fd(),
        }
    }
}

/// Terminal attributes of the prompt's device, captured so they can be
/// put back.
struct SavedTerminal {
    #[cfg(unix)]
    saved: Option<(TerminalHandle, libc::termios)>,
}

impl SavedTerminal {
    #[cfg(unix)]
    fn capture() -> Self {
        use std::io::IsTerminal;

        let device = prompt_device(std::io::stdin().is_terminal());
        let saved = TerminalHandle::open(device).and_then(|handle| {
            let mut termios = std::mem::MaybeUninit::<libc::termios>::uninit();
            let ok = unsafe { libc::tcgetattr(handle.fd(), termios.as_mut_ptr()) == 0 };
            ok.then(|| (handle, unsafe { termios.assume_init() }))
        });
        Self { saved }
    }

    #[cfg(not(unix))]
    fn capture() -> Self {
        Self {}
    }

    #[cfg(unix)]
    fn restore(&self) {
        if let Some((handle, termios)) = &self.saved {
            if unsafe { libc::tcsetattr(handle.fd(), libc::TCSANOW, termios) } != 0 {
                log::warn!("could not restore terminal attributes");
            }
        }
    }

    #[cfg(not(unix))]
    fn restore(&self) {}
}
