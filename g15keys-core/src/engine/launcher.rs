//! Fire-and-forget program launching

use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;

use tracing::debug;

use super::effects::ProcessLauncher;
use crate::error::LaunchError;

/// Spawns each program detached from the engine.
///
/// The child gets null stdio and its own process group, so terminal signals
/// aimed at the daemon do not reach it. A named reaper thread waits on the
/// child so it does not linger as a zombie; nothing observes its result
/// besides a debug log line.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedLauncher;

impl DetachedLauncher {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessLauncher for DetachedLauncher {
    fn launch(&self, program: &Path, args: &[String]) -> Result<(), LaunchError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .process_group(0)
            .spawn()
            .map_err(|source| LaunchError {
                program: program.to_path_buf(),
                source,
            })?;

        let pid = child.id();
        let name = program.display().to_string();
        let reaper = thread::Builder::new()
            .name(format!("reap-{}", pid))
            .spawn(move || match child.wait() {
                Ok(status) => debug!(pid, program = %name, %status, "program exited"),
                Err(err) => debug!(pid, program = %name, "failed to wait on program: {}", err),
            });
        if let Err(err) = reaper {
            // The child still runs; it is reaped when the daemon exits
            debug!(pid, "could not start reaper thread: {}", err);
        }

        debug!(pid, program = %program.display(), "launched");
        Ok(())
    }
}
