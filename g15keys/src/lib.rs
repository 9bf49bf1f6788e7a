//! The g15keys daemon: talks to g15daemon, decodes the extra keys and runs
//! their bindings through the engine.

pub mod capture;
pub mod decoder;
pub mod emitter;
pub mod logging;
pub mod protocol;
pub mod runtime;
pub mod signals;

pub use decoder::KeyStateDecoder;
pub use protocol::{DaemonConnection, ProtocolError};
pub use runtime::{Message, Settings};
