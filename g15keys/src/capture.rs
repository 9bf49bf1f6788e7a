//! Keyboard and mouse tap feeding macro recording.
//!
//! One reader thread per input device. Events are translated to input tokens
//! and forwarded only while the recording flag is raised; otherwise they are
//! read and dropped.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::Sender;
use evdev::{Device, EventType, InputEvent, Key, RelativeAxisType};
use g15keys_core::InputToken;
use tracing::{debug, info, warn};

use crate::emitter::{button_number, VIRTUAL_DEVICE_NAME, X_KEYCODE_OFFSET};
use crate::runtime::Message;

const KEY_VALUE_RELEASE: i32 = 0;
const KEY_VALUE_PRESS: i32 = 1;

/// Tokens for one device event; key repeats and motion produce none
pub fn tokens_for(event: &InputEvent) -> Vec<InputToken> {
    let kind = event.event_type();
    if kind == EventType::KEY {
        key_tokens(Key::new(event.code()), event.value())
    } else if kind == EventType::RELATIVE {
        wheel_tokens(RelativeAxisType(event.code()), event.value())
    } else {
        Vec::new()
    }
}

fn key_tokens(key: Key, value: i32) -> Vec<InputToken> {
    let pressed = match value {
        KEY_VALUE_PRESS => true,
        KEY_VALUE_RELEASE => false,
        _ => return Vec::new(),
    };

    if let Some(button) = button_number(key) {
        return vec![if pressed {
            InputToken::ButtonPress(button)
        } else {
            InputToken::ButtonRelease(button)
        }];
    }

    let code = u32::from(key.code()) + X_KEYCODE_OFFSET;
    if !InputToken::KEY_CODES.contains(&code) {
        return Vec::new();
    }
    vec![if pressed {
        InputToken::KeyPress(code)
    } else {
        InputToken::KeyRelease(code)
    }]
}

/// A wheel step is a click of the matching X button
fn wheel_tokens(axis: RelativeAxisType, value: i32) -> Vec<InputToken> {
    let (up, down) = if axis == RelativeAxisType::REL_WHEEL {
        (4, 5)
    } else if axis == RelativeAxisType::REL_HWHEEL {
        (7, 6)
    } else {
        return Vec::new();
    };
    let button = match value.signum() {
        1 => up,
        -1 => down,
        _ => return Vec::new(),
    };
    let clicks = value.unsigned_abs() as usize;
    [InputToken::ButtonPress(button), InputToken::ButtonRelease(button)]
        .repeat(clicks)
}

fn is_capturable(device: &Device) -> bool {
    if device.name() == Some(VIRTUAL_DEVICE_NAME) {
        return false;
    }
    device.supported_keys().map_or(false, |keys| {
        keys.contains(Key::KEY_A) || keys.contains(Key::BTN_LEFT)
    })
}

/// Start a reader thread for every keyboard and mouse that can be opened.
///
/// Returns how many devices are being watched.
pub fn spawn(tx: Sender<Message>, recording: Arc<AtomicBool>) -> usize {
    let mut watched = 0;
    for (path, device) in evdev::enumerate() {
        if !is_capturable(&device) {
            continue;
        }
        let name = device.name().unwrap_or("unnamed").to_string();
        let tx = tx.clone();
        let recording = Arc::clone(&recording);
        let spawned = thread::Builder::new()
            .name(format!("tap-{}", path.display()))
            .spawn(move || read_device(path, device, tx, recording));
        match spawned {
            Ok(_) => {
                debug!(device = %name, "watching for macro input");
                watched += 1;
            }
            Err(err) => warn!(device = %name, "failed to start input reader: {}", err),
        }
    }

    if watched == 0 {
        warn!("no readable keyboards or mice, macro recording will capture nothing");
    } else {
        info!(devices = watched, "input tap ready");
    }
    watched
}

fn read_device(path: PathBuf, mut device: Device, tx: Sender<Message>, recording: Arc<AtomicBool>) {
    loop {
        let events = match device.fetch_events() {
            Ok(events) => events,
            Err(err) => {
                debug!(device = %path.display(), "input reader stopped: {}", err);
                return;
            }
        };
        for event in events {
            if !recording.load(Ordering::SeqCst) {
                continue;
            }
            for token in tokens_for(&event) {
                if tx.send(Message::Event(token.into())).is_err() {
                    return;
                }
            }
        }
    }
}
