//! Turns g15daemon key-state words into per-key press/release events

use g15keys_core::{Key, KeyEvent, PressState};

/// Backlight button; handled by g15daemon itself
pub const LIGHT_BIT: u32 = 1 << 27;

/// Bit carrying `key` in a key-state word
pub fn key_bit(key: Key) -> u32 {
    let shift = match key {
        Key::G1 => 0,
        Key::G2 => 1,
        Key::G3 => 2,
        Key::G4 => 3,
        Key::G5 => 4,
        Key::G6 => 5,
        Key::G7 => 6,
        Key::G8 => 7,
        Key::G9 => 8,
        Key::G10 => 9,
        Key::G11 => 10,
        Key::G12 => 11,
        Key::G13 => 12,
        Key::G14 => 13,
        Key::G15 => 14,
        Key::G16 => 15,
        Key::G17 => 16,
        Key::G18 => 17,
        Key::M1 => 18,
        Key::M2 => 19,
        Key::M3 => 20,
        Key::MR => 21,
        Key::L1 => 22,
        Key::L2 => 23,
        Key::L3 => 24,
        Key::L4 => 25,
        Key::L5 => 26,
        Key::G19 => 28,
        Key::G20 => 29,
        Key::G21 => 30,
        Key::G22 => 31,
    };
    1 << shift
}

/// Diffs successive key-state words.
///
/// Starts from "nothing held", so keys already down when the client
/// connects are reported as pressed by the first word.
#[derive(Debug, Default)]
pub struct KeyStateDecoder {
    previous: u32,
}

impl KeyStateDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events for every key whose bit changed, G keys first, then M and L keys
    pub fn decode(&mut self, state: u32) -> Vec<KeyEvent> {
        let changed = (self.previous ^ state) & !LIGHT_BIT;
        self.previous = state;
        if changed == 0 {
            return Vec::new();
        }

        Key::ALL
            .iter()
            .copied()
            .filter(|key| changed & key_bit(*key) != 0)
            .map(|key| {
                let state = if state & key_bit(key) != 0 {
                    PressState::Pressed
                } else {
                    PressState::Released
                };
                KeyEvent::new(key, state)
            })
            .collect()
    }
}
