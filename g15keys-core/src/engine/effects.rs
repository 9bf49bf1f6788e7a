//! Side-effect seams of the engine
//!
//! The engine decides *what* happens; implementations of these traits make it
//! happen on the host (uinput, child processes, the g15daemon socket, the
//! configuration file).

use std::path::Path;

use crate::error::{EmitError, LaunchError, SinkError};
use crate::types::{Action, InputToken, Key, LedMask, PressState};

/// Produces OS-level key and button events.
///
/// Calls arrive in the order the tokens must be seen by applications and
/// must not wait on whoever consumes the events.
pub trait InputEmitter {
    fn emit(&mut self, token: InputToken) -> Result<(), EmitError>;
}

/// Starts external programs without waiting for them
pub trait ProcessLauncher {
    fn launch(&self, program: &Path, args: &[String]) -> Result<(), LaunchError>;
}

/// Drives the M-key LEDs
pub trait LedController {
    fn set_leds(&mut self, leds: LedMask) -> Result<(), SinkError>;
}

/// Receives recorded macros so they survive a restart
pub trait MacroSink {
    fn persist(
        &mut self,
        mode: &str,
        key: Key,
        state: PressState,
        actions: &[Action],
    ) -> Result<(), SinkError>;
}
