use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A physical programmable key on the keyboard.
///
/// The set is fixed: 22 G-keys, the three mode selectors, the macro-record
/// key and the five LCD buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    G1,
    G2,
    G3,
    G4,
    G5,
    G6,
    G7,
    G8,
    G9,
    G10,
    G11,
    G12,
    G13,
    G14,
    G15,
    G16,
    G17,
    G18,
    G19,
    G20,
    G21,
    G22,
    M1,
    M2,
    M3,
    MR,
    L1,
    L2,
    L3,
    L4,
    L5,
}

impl Key {
    /// All keys in canonical order.
    pub const ALL: [Key; 31] = [
        Key::G1,
        Key::G2,
        Key::G3,
        Key::G4,
        Key::G5,
        Key::G6,
        Key::G7,
        Key::G8,
        Key::G9,
        Key::G10,
        Key::G11,
        Key::G12,
        Key::G13,
        Key::G14,
        Key::G15,
        Key::G16,
        Key::G17,
        Key::G18,
        Key::G19,
        Key::G20,
        Key::G21,
        Key::G22,
        Key::M1,
        Key::M2,
        Key::M3,
        Key::MR,
        Key::L1,
        Key::L2,
        Key::L3,
        Key::L4,
        Key::L5,
    ];

    /// Stable name used in configuration files and logs
    pub fn name(self) -> &'static str {
        match self {
            Key::G1 => "G1",
            Key::G2 => "G2",
            Key::G3 => "G3",
            Key::G4 => "G4",
            Key::G5 => "G5",
            Key::G6 => "G6",
            Key::G7 => "G7",
            Key::G8 => "G8",
            Key::G9 => "G9",
            Key::G10 => "G10",
            Key::G11 => "G11",
            Key::G12 => "G12",
            Key::G13 => "G13",
            Key::G14 => "G14",
            Key::G15 => "G15",
            Key::G16 => "G16",
            Key::G17 => "G17",
            Key::G18 => "G18",
            Key::G19 => "G19",
            Key::G20 => "G20",
            Key::G21 => "G21",
            Key::G22 => "G22",
            Key::M1 => "M1",
            Key::M2 => "M2",
            Key::M3 => "M3",
            Key::MR => "MR",
            Key::L1 => "L1",
            Key::L2 => "L2",
            Key::L3 => "L3",
            Key::L4 => "L4",
            Key::L5 => "L5",
        }
    }

    /// Look up a key by its configuration name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        let upper = name.trim().to_ascii_uppercase();
        Self::ALL.iter().copied().find(|key| key.name() == upper)
    }

    pub fn is_g_key(self) -> bool {
        (self as u8) <= (Key::G22 as u8)
    }

    /// M1-M3 and MR
    pub fn is_mode_key(self) -> bool {
        matches!(self, Key::M1 | Key::M2 | Key::M3 | Key::MR)
    }

    /// Keys a recorded macro can be assigned to. The LCD buttons are not.
    pub fn accepts_recording(self) -> bool {
        self.is_g_key() || self.is_mode_key()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a key name is not part of the fixed key set
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown key: {0}")]
pub struct UnknownKey(pub String);

impl FromStr for Key {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Key::from_name(s).ok_or_else(|| UnknownKey(s.to_string()))
    }
}

/// Whether a key went down or came up.
///
/// `Released` is the slot a binding lands in when the configuration does not
/// say otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum PressState {
    Pressed,
    #[default]
    Released,
}

impl PressState {
    pub fn name(self) -> &'static str {
        match self {
            PressState::Pressed => "pressed",
            PressState::Released => "released",
        }
    }
}

impl fmt::Display for PressState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single event from the keyboard daemon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub key: Key,
    pub state: PressState,
}

impl KeyEvent {
    pub fn new(key: Key, state: PressState) -> Self {
        Self { key, state }
    }

    pub fn pressed(key: Key) -> Self {
        Self::new(key, PressState::Pressed)
    }

    pub fn released(key: Key) -> Self {
        Self::new(key, PressState::Released)
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.key, self.state)
    }
}
