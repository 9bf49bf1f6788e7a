//! Fakes and builders shared by the engine integration tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use g15keys_core::{
    Action, ActionSpec, ConfigBuilder, ConfigStore, Configuration, EmitError, Engine,
    InputEmitter, InputToken, Key, LaunchError, LedController, LedMask, MacroSink, PressState,
    ProcessLauncher, SinkError,
};

/// One observable side effect, in the order the engine produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Emit(InputToken),
    Launch(PathBuf, Vec<String>),
    Leds(LedMask),
    Persist(String, Key, PressState, Vec<Action>),
}

pub type EffectLog = Arc<Mutex<Vec<Effect>>>;

pub struct FakeEmitter {
    log: EffectLog,
    /// Codes the fake refuses, like a device without that key
    reject: Vec<u32>,
}

impl InputEmitter for FakeEmitter {
    fn emit(&mut self, token: InputToken) -> Result<(), EmitError> {
        if self.reject.contains(&token.code()) {
            return Err(EmitError {
                token,
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "rejected"),
            });
        }
        self.log.lock().unwrap().push(Effect::Emit(token));
        Ok(())
    }
}

pub struct FakeLauncher {
    log: EffectLog,
}

impl ProcessLauncher for FakeLauncher {
    fn launch(&self, program: &Path, args: &[String]) -> Result<(), LaunchError> {
        if !program.starts_with("/usr") && !program.starts_with("/bin") {
            return Err(LaunchError {
                program: program.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such program"),
            });
        }
        self.log
            .lock()
            .unwrap()
            .push(Effect::Launch(program.to_path_buf(), args.to_vec()));
        Ok(())
    }
}

pub struct FakeLeds {
    log: EffectLog,
}

impl LedController for FakeLeds {
    fn set_leds(&mut self, leds: LedMask) -> Result<(), SinkError> {
        self.log.lock().unwrap().push(Effect::Leds(leds));
        Ok(())
    }
}

pub struct FakeSink {
    log: EffectLog,
}

impl MacroSink for FakeSink {
    fn persist(
        &mut self,
        mode: &str,
        key: Key,
        state: PressState,
        actions: &[Action],
    ) -> Result<(), SinkError> {
        self.log.lock().unwrap().push(Effect::Persist(
            mode.to_string(),
            key,
            state,
            actions.to_vec(),
        ));
        Ok(())
    }
}

/// An engine wired to fakes, plus the log they write into
pub struct Harness {
    pub engine: Engine,
    pub log: EffectLog,
    pub store: Arc<ConfigStore>,
}

impl Harness {
    pub fn new(config: Configuration) -> Self {
        Self::with_rejected_codes(config, Vec::new())
    }

    pub fn with_rejected_codes(config: Configuration, reject: Vec<u32>) -> Self {
        let log: EffectLog = Arc::new(Mutex::new(Vec::new()));
        let store = Arc::new(ConfigStore::new(config));
        let engine = Engine::new(
            Arc::clone(&store),
            Box::new(FakeEmitter {
                log: Arc::clone(&log),
                reject,
            }),
            Box::new(FakeLauncher {
                log: Arc::clone(&log),
            }),
        )
        .with_leds(Box::new(FakeLeds {
            log: Arc::clone(&log),
        }))
        .with_macro_sink(Box::new(FakeSink {
            log: Arc::clone(&log),
        }));
        Self { engine, log, store }
    }

    /// Drain and return everything recorded so far
    pub fn take(&self) -> Vec<Effect> {
        std::mem::take(&mut *self.log.lock().unwrap())
    }
}

/// Builder with `Mode1`, `Mode2`, `Mode3` declared
pub fn three_modes() -> ConfigBuilder {
    let mut builder = Configuration::builder();
    for mode in ["Mode1", "Mode2", "Mode3"] {
        builder.add_mode(mode).unwrap();
    }
    builder
}

pub fn program(path: &str) -> ActionSpec {
    ActionSpec::program(path)
}

pub fn emit(token: InputToken) -> ActionSpec {
    ActionSpec::EmitInput(token)
}
