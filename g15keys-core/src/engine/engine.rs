use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::effects::{InputEmitter, LedController, MacroSink, ProcessLauncher};
use super::mode::ModeManager;
use super::recorder::MacroRecorder;
use crate::config::{ConfigStore, Configuration};
use crate::types::{Action, EngineEvent, InputToken, Key, KeyEvent, ModeId, PressState};

/// What the engine did with one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// No binding for the event; nothing happened
    Miss,
    /// A binding ran with this many actions
    Executed { actions: usize },
    /// The event was appended to the open recording
    Captured,
    /// The event was dropped without lookup (stray release, raw input while
    /// not recording)
    Ignored,
    /// A recording ended and was bound to `key`
    MacroAssigned { key: Key, tokens: usize },
    /// A recording ended with nothing captured; no binding changed
    RecordingCancelled,
}

/// The action resolver and executor.
///
/// Feeds every event through a single router: the recording flag is checked
/// first, and only when no recording is open does the configuration get
/// consulted. Events are handled one at a time on the caller's thread.
pub struct Engine {
    store: Arc<ConfigStore>,
    modes: ModeManager,
    recorder: MacroRecorder,
    emitter: Box<dyn InputEmitter>,
    launcher: Box<dyn ProcessLauncher>,
    leds: Option<Box<dyn LedController>>,
    sink: Option<Box<dyn MacroSink>>,
    /// Release of the key that just received a macro; swallowed once so the
    /// new binding does not fire on the same keystroke
    swallow_release: Option<Key>,
}

impl Engine {
    pub fn new(
        store: Arc<ConfigStore>,
        emitter: Box<dyn InputEmitter>,
        launcher: Box<dyn ProcessLauncher>,
    ) -> Self {
        let modes = ModeManager::new(store.load());
        Self {
            store,
            modes,
            recorder: MacroRecorder::new(),
            emitter,
            launcher,
            leds: None,
            sink: None,
            swallow_release: None,
        }
    }

    pub fn with_leds(mut self, leds: Box<dyn LedController>) -> Self {
        self.leds = Some(leds);
        self
    }

    pub fn with_macro_sink(mut self, sink: Box<dyn MacroSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn store(&self) -> &Arc<ConfigStore> {
        &self.store
    }

    pub fn active_mode(&self) -> ModeId {
        self.modes.active()
    }

    pub fn active_mode_name(&self) -> &str {
        self.modes.active_name()
    }

    pub fn is_recording(&self) -> bool {
        self.modes.is_recording()
    }

    /// See [`ModeManager::recording_flag`]
    pub fn recording_flag(&self) -> Arc<AtomicBool> {
        self.modes.recording_flag()
    }

    /// Route one event
    pub fn handle(&mut self, event: impl Into<EngineEvent>) -> Dispatch {
        let config = self.store.load();
        self.modes.sync(&config);

        match event.into() {
            EngineEvent::Captured(token) => self.handle_captured(token),
            EngineEvent::Key(event) if self.modes.is_recording() => {
                self.handle_key_while_recording(event)
            }
            EngineEvent::Key(event) => self.handle_key(&config, event),
        }
    }

    fn handle_captured(&mut self, token: InputToken) -> Dispatch {
        if self.modes.is_recording() && self.recorder.capture(token) {
            Dispatch::Captured
        } else {
            Dispatch::Ignored
        }
    }

    fn handle_key_while_recording(&mut self, event: KeyEvent) -> Dispatch {
        match event.state {
            PressState::Pressed if event.key.accepts_recording() => {
                self.finish_recording(event.key)
            }
            PressState::Pressed => {
                debug!(%event, "key cannot hold a macro, still recording");
                Dispatch::Ignored
            }
            PressState::Released => {
                debug!(%event, "release swallowed while recording");
                Dispatch::Ignored
            }
        }
    }

    fn handle_key(&mut self, config: &Configuration, event: KeyEvent) -> Dispatch {
        if event.state == PressState::Released && self.swallow_release == Some(event.key) {
            self.swallow_release = None;
            debug!(%event, "release of macro target swallowed");
            return Dispatch::Ignored;
        }

        let mode = self.modes.active();
        match config.resolve(mode, event.key, event.state) {
            Some(actions) => {
                debug!(
                    %event,
                    mode = config.mode_name(mode),
                    actions = actions.len(),
                    "dispatching"
                );
                self.execute(actions);
                Dispatch::Executed {
                    actions: actions.len(),
                }
            }
            None => {
                debug!(%event, mode = config.mode_name(mode), "no binding");
                Dispatch::Miss
            }
        }
    }

    /// Run an action list in order.
    ///
    /// Failures are reported and the list keeps going. Emit failures are
    /// logged once per list; later ones only at debug level.
    fn execute(&mut self, actions: &[Action]) {
        let mut emit_failures = 0usize;

        for action in actions {
            match action {
                Action::RunProgram { path, args } => {
                    if let Err(err) = self.launcher.launch(path, args) {
                        warn!("{}", err);
                    }
                }
                Action::EmitInput(token) => {
                    if let Err(err) = self.emitter.emit(*token) {
                        if emit_failures == 0 {
                            warn!("{}", err);
                        } else {
                            debug!("{}", err);
                        }
                        emit_failures += 1;
                    }
                }
                Action::SwitchMode(target) => {
                    self.modes.switch_to(*target);
                }
                Action::StartRecording => self.start_recording(),
                Action::SetLeds(mask) => match self.leds.as_mut() {
                    Some(leds) => {
                        if let Err(err) = leds.set_leds(*mask) {
                            warn!("failed to set LEDs: {}", err);
                        }
                    }
                    None => debug!(leds = %mask, "no LED controller attached"),
                },
            }
        }

        if emit_failures > 1 {
            debug!(failures = emit_failures, "synthetic input failed repeatedly");
        }
    }

    fn start_recording(&mut self) {
        if !self.recorder.start() {
            debug!("recording already in progress");
            return;
        }
        self.modes.enter_recording();
        info!(
            mode = self.modes.active_name(),
            "recording macro, press a key to assign it"
        );
    }

    fn finish_recording(&mut self, target: Key) -> Dispatch {
        self.modes.exit_recording();
        let Some(recorded) = self.recorder.finish() else {
            return Dispatch::Ignored;
        };
        self.swallow_release = Some(target);

        if recorded.is_empty() {
            info!(key = %target, "nothing recorded, macro discarded");
            return Dispatch::RecordingCancelled;
        }

        // Resolved by name again under the store lock: a reload may have
        // published a snapshot with a different mode table meanwhile
        let wanted = self.modes.active_name().to_string();
        let actions = recorded.to_actions();
        let replay = actions.clone();
        let published = self.store.update(|current| {
            let mode = current
                .mode_id(&wanted)
                .unwrap_or_else(|| current.default_mode());
            current.with_binding(mode, target, PressState::Released, replay)
        });
        self.modes.sync(&published);
        let mode_name = self.modes.active_name().to_string();

        info!(
            mode = %mode_name,
            key = %target,
            tokens = recorded.len(),
            "macro assigned"
        );

        if let Some(sink) = self.sink.as_mut() {
            if let Err(err) = sink.persist(&mode_name, target, PressState::Released, &actions) {
                warn!("failed to persist macro: {}", err);
            }
        }

        Dispatch::MacroAssigned {
            key: target,
            tokens: recorded.len(),
        }
    }
}
