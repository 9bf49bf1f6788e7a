pub mod config;
pub mod engine;
pub mod error;
pub mod types;

pub use types::*;

// Re-export commonly used types
pub use config::{ConfigBuilder, ConfigStore, Configuration};
pub use engine::{
    DetachedLauncher, Dispatch, Engine, InputEmitter, LedController, MacroRecorder, MacroSink,
    ModeManager, ProcessLauncher,
};
pub use error::{ConfigError, EmitError, LaunchError, SinkError};
