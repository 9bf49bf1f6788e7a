//! g15keys engine - routes key events to actions
//!
//! The [`Engine`] receives device key events and captured input one at a
//! time, consults the active [`Configuration`](crate::Configuration) through
//! the [`ModeManager`], and executes the resolved actions through the effect
//! traits in [`effects`].

mod engine;
pub mod effects;
mod launcher;
mod mode;
mod recorder;

pub use effects::{InputEmitter, LedController, MacroSink, ProcessLauncher};
pub use engine::{Dispatch, Engine};
pub use launcher::DetachedLauncher;
pub use mode::ModeManager;
pub use recorder::MacroRecorder;
