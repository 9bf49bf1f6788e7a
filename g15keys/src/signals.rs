//! Signal flags polled by the event loop

use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{anyhow, Result};

/// Set by SIGUSR1
static RELOAD_REQUESTED: AtomicBool = AtomicBool::new(false);
/// Set by SIGINT, SIGTERM, SIGHUP and SIGQUIT
static SHUTDOWN_REQUESTED: AtomicBool = AtomicBool::new(false);

const SHUTDOWN_SIGNALS: [libc::c_int; 4] =
    [libc::SIGINT, libc::SIGTERM, libc::SIGHUP, libc::SIGQUIT];

extern "C" fn handle_reload(_: libc::c_int) {
    RELOAD_REQUESTED.store(true, Ordering::SeqCst);
}

extern "C" fn handle_shutdown(_: libc::c_int) {
    SHUTDOWN_REQUESTED.store(true, Ordering::SeqCst);
}

fn install(signal: libc::c_int, handler: extern "C" fn(libc::c_int)) -> Result<()> {
    unsafe {
        // SAFETY: the handlers only store to atomics, which is async-signal-safe.
        // `sigemptyset` and `sigaction` get initialized pointers and their
        // return values are checked.
        let mut action: libc::sigaction = std::mem::zeroed();
        action.sa_flags = libc::SA_RESTART;
        action.sa_sigaction = handler as *const () as usize;
        if libc::sigemptyset(&mut action.sa_mask) != 0 {
            return Err(anyhow!("failed to clear mask for signal {}", signal));
        }
        if libc::sigaction(signal, &action, std::ptr::null_mut()) != 0 {
            return Err(anyhow!(
                "failed to install handler for signal {}: {}",
                signal,
                std::io::Error::last_os_error()
            ));
        }
    }
    Ok(())
}

pub fn install_handlers() -> Result<()> {
    install(libc::SIGUSR1, handle_reload)?;
    for signal in SHUTDOWN_SIGNALS {
        install(signal, handle_shutdown)?;
    }
    Ok(())
}

/// Whether a reload was requested since the last call
pub fn take_reload() -> bool {
    RELOAD_REQUESTED.swap(false, Ordering::SeqCst)
}

pub fn shutdown_requested() -> bool {
    SHUTDOWN_REQUESTED.load(Ordering::SeqCst)
}
