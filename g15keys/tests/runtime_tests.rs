use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crossbeam_channel::unbounded;
use g15keys::decoder::key_bit;
use g15keys::runtime::event_loop;
use g15keys::{KeyStateDecoder, Message, Settings};
use g15keys_config::parse_config;
use g15keys_core::{
    ConfigStore, EmitError, Engine, InputEmitter, InputToken, Key, LaunchError, ProcessLauncher,
};
use pretty_assertions::assert_eq;

#[derive(Clone, Default)]
struct Recorder {
    emitted: Arc<Mutex<Vec<InputToken>>>,
    launched: Arc<Mutex<Vec<PathBuf>>>,
}

impl InputEmitter for Recorder {
    fn emit(&mut self, token: InputToken) -> Result<(), EmitError> {
        self.emitted.lock().unwrap().push(token);
        Ok(())
    }
}

impl ProcessLauncher for Recorder {
    fn launch(&self, program: &Path, _args: &[String]) -> Result<(), LaunchError> {
        self.launched.lock().unwrap().push(program.to_path_buf());
        Ok(())
    }
}

fn settings() -> Settings {
    Settings {
        config_path: PathBuf::from("/nonexistent/g15keys/config"),
        host: "localhost".to_string(),
        port: 15550,
        capture: false,
        persist: false,
    }
}

#[test]
fn test_key_states_drive_bindings_until_disconnect() {
    let config = parse_config(
        r#"{
            "Mode1": {
                "G1": "/usr/bin/xterm",
                "M2": "switch-profile Mode2"
            },
            "Mode2": {
                "G1": { "pressed": "emit k+38", "released": "emit k-38" }
            }
        }"#,
    )
    .unwrap();
    let recorder = Recorder::default();
    let mut engine = Engine::new(
        Arc::new(ConfigStore::new(config)),
        Box::new(recorder.clone()),
        Box::new(recorder.clone()),
    );

    let (tx, rx) = unbounded();
    let mut decoder = KeyStateDecoder::new();
    for state in [
        key_bit(Key::G1),
        0,
        key_bit(Key::M2),
        0,
        key_bit(Key::G1),
        0,
    ] {
        for event in decoder.decode(state) {
            tx.send(Message::Event(event.into())).unwrap();
        }
    }
    tx.send(Message::Disconnected("test over".to_string())).unwrap();

    let err = event_loop(&mut engine, &rx, &settings()).unwrap_err();

    assert!(err.to_string().contains("test over"));
    assert_eq!(engine.active_mode_name(), "Mode2");
    assert_eq!(
        *recorder.launched.lock().unwrap(),
        vec![PathBuf::from("/usr/bin/xterm")]
    );
    assert_eq!(
        *recorder.emitted.lock().unwrap(),
        vec![InputToken::KeyPress(38), InputToken::KeyRelease(38)]
    );
}

#[test]
fn test_captured_tokens_reach_the_recorder() {
    let config = parse_config(r#"{ "Mode1": { "MR": "record" } }"#).unwrap();
    let recorder = Recorder::default();
    let store = Arc::new(ConfigStore::new(config));
    let mut engine = Engine::new(
        Arc::clone(&store),
        Box::new(recorder.clone()),
        Box::new(recorder.clone()),
    );

    let (tx, rx) = unbounded();
    tx.send(Message::Event(g15keys_core::KeyEvent::released(Key::MR).into()))
        .unwrap();
    tx.send(Message::Event(InputToken::KeyPress(24).into()))
        .unwrap();
    tx.send(Message::Event(InputToken::KeyRelease(24).into()))
        .unwrap();
    tx.send(Message::Event(g15keys_core::KeyEvent::pressed(Key::G4).into()))
        .unwrap();
    drop(tx);

    assert!(event_loop(&mut engine, &rx, &settings()).is_err());

    let config = store.load();
    assert_eq!(
        config
            .resolve(config.default_mode(), Key::G4, g15keys_core::PressState::Released)
            .map(<[_]>::len),
        Some(2)
    );
}
