//! Active mode tracking

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::Configuration;
use crate::types::ModeId;

/// Tracks which mode is active and whether a macro is being recorded.
///
/// Recording is a flag layered over the active mode; it never changes which
/// mode is current.
#[derive(Debug)]
pub struct ModeManager {
    active: ModeId,
    previous: Option<ModeId>,
    recording: Arc<AtomicBool>,
    /// Snapshot the active id was last validated against
    basis: Arc<Configuration>,
}

impl ModeManager {
    pub fn new(config: Arc<Configuration>) -> Self {
        Self {
            active: config.default_mode(),
            previous: None,
            recording: Arc::new(AtomicBool::new(false)),
            basis: config,
        }
    }

    pub fn active(&self) -> ModeId {
        self.active
    }

    pub fn active_name(&self) -> &str {
        self.basis.mode_name(self.active)
    }

    /// Mode saved when recording started
    pub fn previous(&self) -> Option<ModeId> {
        self.previous
    }

    /// Make `mode` the active one. Returns false if it already was.
    pub fn switch_to(&mut self, mode: ModeId) -> bool {
        if self.active == mode {
            debug!(mode = self.basis.mode_name(mode), "mode already active");
            return false;
        }
        self.active = mode;
        info!(mode = self.basis.mode_name(mode), "switched mode");
        true
    }

    pub fn enter_recording(&mut self) {
        self.previous = Some(self.active);
        self.recording.store(true, Ordering::SeqCst);
    }

    pub fn exit_recording(&mut self) {
        self.recording.store(false, Ordering::SeqCst);
        self.previous = None;
    }

    pub fn is_recording(&self) -> bool {
        self.recording.load(Ordering::SeqCst)
    }

    /// Shared view of the recording flag for threads outside the engine
    /// (e.g. an input tap that only forwards while recording)
    pub fn recording_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.recording)
    }

    /// Re-anchor the active mode on a newly published snapshot.
    ///
    /// The mode is looked up by name; if the new snapshot no longer has it,
    /// its default mode becomes active.
    pub fn sync(&mut self, config: &Arc<Configuration>) {
        if Arc::ptr_eq(&self.basis, config) {
            return;
        }

        let name = self.basis.mode_name(self.active);
        let next = match config.mode_id(name) {
            Some(id) => id,
            None => {
                info!(
                    missing = name,
                    fallback = config.mode_name(config.default_mode()),
                    "active mode gone after reload"
                );
                config.default_mode()
            }
        };
        self.previous = self
            .previous
            .and_then(|prev| config.mode_id(self.basis.mode_name(prev)));
        self.active = next;
        self.basis = Arc::clone(config);
    }
}
