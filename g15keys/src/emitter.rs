//! Synthetic input through a uinput virtual device

use std::io;

use evdev::uinput::{VirtualDevice, VirtualDeviceBuilder};
use evdev::{AttributeSet, EventType, InputEvent, Key, RelativeAxisType};
use g15keys_core::{EmitError, InputEmitter, InputToken};
use tracing::debug;

/// Name of the virtual device, also used to keep the keyboard tap from
/// capturing our own output
pub const VIRTUAL_DEVICE_NAME: &str = "g15keys virtual input";

/// X keycodes are evdev codes shifted by the minimum X keycode
pub const X_KEYCODE_OFFSET: u32 = 8;

const KEY_VALUE_RELEASE: i32 = 0;
const KEY_VALUE_PRESS: i32 = 1;

/// Pointer buttons that map to real buttons, by X button number
const BUTTONS: [(u32, Key); 5] = [
    (1, Key::BTN_LEFT),
    (2, Key::BTN_MIDDLE),
    (3, Key::BTN_RIGHT),
    (8, Key::BTN_SIDE),
    (9, Key::BTN_EXTRA),
];

/// X buttons 4..=7 are wheel steps: up, down, left, right
fn wheel_step(button: u32) -> Option<(RelativeAxisType, i32)> {
    match button {
        4 => Some((RelativeAxisType::REL_WHEEL, 1)),
        5 => Some((RelativeAxisType::REL_WHEEL, -1)),
        6 => Some((RelativeAxisType::REL_HWHEEL, -1)),
        7 => Some((RelativeAxisType::REL_HWHEEL, 1)),
        _ => None,
    }
}

pub fn button_key(button: u32) -> Option<Key> {
    BUTTONS
        .iter()
        .find(|(number, _)| *number == button)
        .map(|(_, key)| *key)
}

pub fn button_number(key: Key) -> Option<u32> {
    BUTTONS
        .iter()
        .find(|(_, candidate)| *candidate == key)
        .map(|(number, _)| *number)
}

/// Device events for one token.
///
/// Wheel buttons produce a single step on press and nothing on release.
pub fn device_events(token: InputToken) -> io::Result<Vec<InputEvent>> {
    let value = if token.is_press() {
        KEY_VALUE_PRESS
    } else {
        KEY_VALUE_RELEASE
    };

    let code = token.code();
    if !token.is_button() {
        if !InputToken::KEY_CODES.contains(&code) {
            return Err(unsupported(token));
        }
        let key = (code - X_KEYCODE_OFFSET) as u16;
        return Ok(vec![InputEvent::new(EventType::KEY, key, value)]);
    }

    if let Some(key) = button_key(code) {
        return Ok(vec![InputEvent::new(EventType::KEY, key.code(), value)]);
    }
    match wheel_step(code) {
        Some((axis, step)) if token.is_press() => {
            Ok(vec![InputEvent::new(EventType::RELATIVE, axis.0, step)])
        }
        Some(_) => Ok(Vec::new()),
        None => Err(unsupported(token)),
    }
}

fn unsupported(token: InputToken) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("{token} has no device equivalent"),
    )
}

/// Emits tokens through a dedicated uinput keyboard and pointer
pub struct UinputEmitter {
    device: VirtualDevice,
}

impl UinputEmitter {
    pub fn new() -> io::Result<Self> {
        let mut keys = AttributeSet::<Key>::new();
        let first = *InputToken::KEY_CODES.start() - X_KEYCODE_OFFSET;
        let last = *InputToken::KEY_CODES.end() - X_KEYCODE_OFFSET;
        for code in first.max(1)..=last {
            keys.insert(Key::new(code as u16));
        }
        for (_, button) in BUTTONS {
            keys.insert(button);
        }

        let mut axes = AttributeSet::<RelativeAxisType>::new();
        for axis in [
            RelativeAxisType::REL_X,
            RelativeAxisType::REL_Y,
            RelativeAxisType::REL_WHEEL,
            RelativeAxisType::REL_HWHEEL,
        ] {
            axes.insert(axis);
        }

        let device = VirtualDeviceBuilder::new()?
            .name(VIRTUAL_DEVICE_NAME)
            .with_keys(&keys)?
            .with_relative_axes(&axes)?
            .build()?;
        debug!("uinput device created");
        Ok(Self { device })
    }
}

impl InputEmitter for UinputEmitter {
    fn emit(&mut self, token: InputToken) -> Result<(), EmitError> {
        let events = device_events(token).map_err(|source| EmitError { token, source })?;
        if events.is_empty() {
            return Ok(());
        }
        self.device
            .emit(&events)
            .map_err(|source| EmitError { token, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn summary(events: &[InputEvent]) -> Vec<(EventType, u16, i32)> {
        events
            .iter()
            .map(|event| (event.event_type(), event.code(), event.value()))
            .collect()
    }

    #[test]
    fn test_keycodes_are_shifted() {
        // X keycode 38 is `a`
        assert_eq!(
            summary(&device_events(InputToken::KeyPress(38)).unwrap()),
            vec![(EventType::KEY, Key::KEY_A.code(), 1)]
        );
        assert_eq!(
            summary(&device_events(InputToken::KeyRelease(133)).unwrap()),
            vec![(EventType::KEY, Key::KEY_LEFTMETA.code(), 0)]
        );
    }

    #[test]
    fn test_buttons() {
        assert_eq!(
            summary(&device_events(InputToken::ButtonPress(1)).unwrap()),
            vec![(EventType::KEY, Key::BTN_LEFT.code(), 1)]
        );
        assert_eq!(
            summary(&device_events(InputToken::ButtonRelease(3)).unwrap()),
            vec![(EventType::KEY, Key::BTN_RIGHT.code(), 0)]
        );
        assert_eq!(button_number(Key::BTN_EXTRA), Some(9));
    }

    #[test]
    fn test_wheel_steps_on_press_only() {
        assert_eq!(
            summary(&device_events(InputToken::ButtonPress(5)).unwrap()),
            vec![(EventType::RELATIVE, RelativeAxisType::REL_WHEEL.0, -1)]
        );
        assert!(device_events(InputToken::ButtonRelease(5)).unwrap().is_empty());
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        assert!(device_events(InputToken::KeyPress(7)).is_err());
        assert!(device_events(InputToken::ButtonPress(12)).is_err());
    }
}
