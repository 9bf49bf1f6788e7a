pub mod action;
pub mod keys;

pub use action::{Action, ActionSpec, InputToken, LedMask, Macro};
pub use keys::{Key, KeyEvent, PressState, UnknownKey};

/// Index of a mode inside the configuration that defined it.
///
/// Only a [`crate::Configuration`] hands these out, so a `ModeId` always names
/// a mode that exists in the snapshot it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModeId(pub(crate) usize);

/// Everything that can arrive on the engine's event stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    /// A G/M/MR/L key changed state on the device
    Key(KeyEvent),
    /// A raw input event seen on the system keyboard or mouse, only
    /// consumed while a macro is being recorded
    Captured(InputToken),
}

impl From<KeyEvent> for EngineEvent {
    fn from(event: KeyEvent) -> Self {
        EngineEvent::Key(event)
    }
}

impl From<InputToken> for EngineEvent {
    fn from(token: InputToken) -> Self {
        EngineEvent::Captured(token)
    }
}
