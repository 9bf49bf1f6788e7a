use std::fmt;
use std::ops::RangeInclusive;
use std::path::PathBuf;

use super::ModeId;

/// An abstract synthetic input event.
///
/// Key codes are X keycodes, button codes are X pointer buttons. The textual
/// form (`k+133`, `m-1`, ...) is the one used in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputToken {
    KeyPress(u32),
    KeyRelease(u32),
    ButtonPress(u32),
    ButtonRelease(u32),
}

impl InputToken {
    /// X keycodes a key token may carry
    pub const KEY_CODES: RangeInclusive<u32> = 8..=255;
    /// X pointer buttons a button token may carry
    pub const BUTTON_CODES: RangeInclusive<u32> = 1..=9;

    pub fn code(self) -> u32 {
        match self {
            InputToken::KeyPress(code)
            | InputToken::KeyRelease(code)
            | InputToken::ButtonPress(code)
            | InputToken::ButtonRelease(code) => code,
        }
    }

    pub fn is_press(self) -> bool {
        matches!(self, InputToken::KeyPress(_) | InputToken::ButtonPress(_))
    }

    pub fn is_button(self) -> bool {
        matches!(self, InputToken::ButtonPress(_) | InputToken::ButtonRelease(_))
    }
}

impl fmt::Display for InputToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let device = if self.is_button() { 'm' } else { 'k' };
        let direction = if self.is_press() { '+' } else { '-' };
        write!(f, "{}{}{}", device, direction, self.code())
    }
}

/// Mask of lit M-key LEDs, in g15daemon bit order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LedMask(u8);

impl LedMask {
    pub const M1: LedMask = LedMask(1 << 0);
    pub const M2: LedMask = LedMask(1 << 1);
    pub const M3: LedMask = LedMask(1 << 2);
    pub const MR: LedMask = LedMask(1 << 3);

    pub const fn empty() -> Self {
        LedMask(0)
    }

    pub fn from_bits(bits: u8) -> Self {
        LedMask(bits & 0x0f)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, other: LedMask) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for LedMask {
    type Output = LedMask;

    fn bitor(self, rhs: LedMask) -> LedMask {
        LedMask(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for LedMask {
    fn bitor_assign(&mut self, rhs: LedMask) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for LedMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (LedMask::M1, "m1"),
            (LedMask::M2, "m2"),
            (LedMask::M3, "m3"),
            (LedMask::MR, "mr"),
        ];
        let lit: Vec<&str> = names
            .iter()
            .filter(|(led, _)| self.contains(*led))
            .map(|(_, name)| *name)
            .collect();
        f.write_str(&lit.join(","))
    }
}

/// A resolved action, ready to execute.
///
/// Mode targets are already validated against the configuration that owns
/// the action, and program paths are absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    RunProgram { path: PathBuf, args: Vec<String> },
    EmitInput(InputToken),
    SwitchMode(ModeId),
    StartRecording,
    SetLeds(LedMask),
}

/// An action as described by a configuration source, before validation.
///
/// Identical to [`Action`] except that mode targets are still names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionSpec {
    RunProgram { path: PathBuf, args: Vec<String> },
    EmitInput(InputToken),
    SwitchMode(String),
    StartRecording,
    SetLeds(LedMask),
}

impl ActionSpec {
    pub fn program(path: impl Into<PathBuf>) -> Self {
        ActionSpec::RunProgram {
            path: path.into(),
            args: Vec::new(),
        }
    }

    pub fn switch_mode(target: impl Into<String>) -> Self {
        ActionSpec::SwitchMode(target.into())
    }
}

/// A compiled recording: the captured tokens, replayed back-to-back
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Macro {
    tokens: Vec<InputToken>,
}

impl Macro {
    pub fn new(tokens: Vec<InputToken>) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &[InputToken] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The action list that replays this macro
    pub fn to_actions(&self) -> Vec<Action> {
        self.tokens.iter().copied().map(Action::EmitInput).collect()
    }
}

impl fmt::Display for Macro {
    /// Renders as the `emit` descriptor understood by configuration files
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("emit ")?;
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}
