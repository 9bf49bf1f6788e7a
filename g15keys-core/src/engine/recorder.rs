//! Macro recording

use tracing::debug;

use crate::types::{InputToken, Macro};

/// Captured tokens of one recording, in arrival order
#[derive(Debug, Default)]
struct RecordingSession {
    tokens: Vec<InputToken>,
}

/// Captures input while recording and compiles it into a [`Macro`].
///
/// There is no timeout: a started session stays open until [`finish`] is
/// called.
///
/// [`finish`]: MacroRecorder::finish
#[derive(Debug, Default)]
pub struct MacroRecorder {
    session: Option<RecordingSession>,
}

impl MacroRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session. Returns false if one is already open; the existing
    /// session is kept as is.
    pub fn start(&mut self) -> bool {
        if self.session.is_some() {
            return false;
        }
        self.session = Some(RecordingSession::default());
        true
    }

    pub fn is_recording(&self) -> bool {
        self.session.is_some()
    }

    /// Append a token verbatim, repeats included. Ignored when idle.
    pub fn capture(&mut self, token: InputToken) -> bool {
        match self.session.as_mut() {
            Some(session) => {
                debug!(%token, "captured");
                session.tokens.push(token);
                true
            }
            None => false,
        }
    }

    /// Close the session and compile what was captured
    pub fn finish(&mut self) -> Option<Macro> {
        self.session.take().map(|session| Macro::new(session.tokens))
    }
}
