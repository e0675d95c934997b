// src/signals.rs

//! SIGINT/SIGTERM handling for orderly shutdown.
//!
//! The handler only flips a process-wide atomic flag; the render loop polls
//! it at tick boundaries and unwinds normally, so Drop cleanup (unmapping the
//! device) runs on the signal path too.

use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};

static SHUTDOWN: AtomicBool = AtomicBool::new(false);

extern "C" fn handle_signal(_signal: libc::c_int) {
    SHUTDOWN.store(true, Ordering::SeqCst);
}

/// Installs the shutdown handlers for SIGINT and SIGTERM.
///
/// Call once at startup, before the render loop.
pub fn install() -> Result<()> {
    let action = SigAction::new(
        SigHandler::Handler(handle_signal),
        SaFlags::empty(),
        SigSet::empty(),
    );
    // SAFETY: the handler only stores to an atomic, which is
    // async-signal-safe.
    unsafe {
        signal::sigaction(Signal::SIGINT, &action)
            .context("Failed to install SIGINT handler")?;
        signal::sigaction(Signal::SIGTERM, &action)
            .context("Failed to install SIGTERM handler")?;
    }
    Ok(())
}

/// True once any shutdown signal has been received.
pub fn shutdown_requested() -> bool {
    SHUTDOWN.load(Ordering::SeqCst)
}
