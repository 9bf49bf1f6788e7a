use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use g15keys_config::{load_config_file, JsonMacroSink};
use g15keys_core::{ConfigStore, DetachedLauncher, Dispatch, Engine, EngineEvent, LedMask};
use tracing::{debug, info, warn};

use crate::capture;
use crate::decoder::KeyStateDecoder;
use crate::emitter::UinputEmitter;
use crate::protocol::{DaemonConnection, ProtocolError};
use crate::signals;

/// How often the event loop looks at the signal flags when idle
const SIGNAL_POLL: Duration = Duration::from_millis(200);

/// What the reader threads send to the event loop
#[derive(Debug)]
pub enum Message {
    Event(EngineEvent),
    /// The g15daemon connection ended; carries the reason
    Disconnected(String),
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub config_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub capture: bool,
    pub persist: bool,
}

/// Forward decoded key events from g15daemon until the connection ends
pub fn spawn_key_reader(
    mut connection: DaemonConnection,
    tx: Sender<Message>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("g15daemon-reader".to_string())
        .spawn(move || {
            let mut decoder = KeyStateDecoder::new();
            loop {
                let state = match connection.read_key_state() {
                    Ok(state) => state,
                    Err(err) => {
                        let _ = tx.send(err.into());
                        return;
                    }
                };
                debug!("key state {:#010x}", state);
                for event in decoder.decode(state) {
                    if tx.send(Message::Event(event.into())).is_err() {
                        return;
                    }
                }
            }
        })
}

/// Feed messages to the engine until shutdown is requested or the
/// g15daemon connection goes away
pub fn event_loop(engine: &mut Engine, rx: &Receiver<Message>, settings: &Settings) -> Result<()> {
    loop {
        if signals::shutdown_requested() {
            info!("graceful shutdown");
            return Ok(());
        }
        if signals::take_reload() {
            info!(path = %settings.config_path.display(), "reloading configuration");
            // Errors are logged by the store; the old snapshot stays active
            let _ = engine
                .store()
                .reload(|| load_config_file(&settings.config_path));
        }

        match rx.recv_timeout(SIGNAL_POLL) {
            Ok(Message::Event(event)) => match engine.handle(event) {
                Dispatch::MacroAssigned { key, tokens } => {
                    debug!(%key, tokens, "macro ready");
                }
                outcome => debug!(?outcome, "event handled"),
            },
            Ok(Message::Disconnected(reason)) => bail!("lost connection to g15daemon: {}", reason),
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => bail!("all input readers stopped"),
        }
    }
}

/// Connect everything and run until shutdown
pub fn run(settings: Settings) -> Result<()> {
    let config = load_config_file(&settings.config_path)
        .with_context(|| format!("cannot load {}", settings.config_path.display()))?;
    info!(
        path = %settings.config_path.display(),
        profiles = config.mode_count(),
        bindings = config.binding_count(),
        "configuration loaded"
    );
    let store = Arc::new(ConfigStore::new(config));

    signals::install_handlers()?;

    let mut connection = DaemonConnection::connect(&settings.host, settings.port)?;
    connection.enable_key_handler()?;
    // The first profile is active, light its LED
    if let Err(err) = connection.set_leds(LedMask::M1) {
        warn!("failed to set initial LEDs: {}", err);
    }
    let leds = connection.led_controller()?;
    let closer = connection.closer()?;

    let emitter = UinputEmitter::new().context("cannot create uinput device")?;
    let mut engine = Engine::new(
        Arc::clone(&store),
        Box::new(emitter),
        Box::new(DetachedLauncher::new()),
    )
    .with_leds(Box::new(leds));
    if settings.persist {
        engine = engine.with_macro_sink(Box::new(JsonMacroSink::new(&settings.config_path)));
    }

    let (tx, rx) = unbounded();
    if settings.capture {
        capture::spawn(tx.clone(), engine.recording_flag());
    } else {
        info!("input tap disabled, recorded macros will be empty");
    }
    spawn_key_reader(connection, tx).context("cannot start g15daemon reader")?;
    info!(host = %settings.host, port = settings.port, "connected to g15daemon");

    let result = event_loop(&mut engine, &rx, &settings);
    closer.close();
    result
}

impl From<ProtocolError> for Message {
    fn from(err: ProtocolError) -> Self {
        Message::Disconnected(err.to_string())
    }
}
