use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use g15keys_core::{Action, Key, MacroSink, PressState, SinkError};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{ConfigFileError, Result};
use crate::render::describe_actions;

/// Writes recorded macros back into the configuration file.
///
/// Only the targeted slot of the targeted key changes; every other entry,
/// and the order of profiles and keys, is kept as it was on disk. The file
/// is replaced through a temporary sibling and a rename, keeping its
/// permissions. A symlinked path updates the file the link points at.
#[derive(Debug, Clone)]
pub struct JsonMacroSink {
    path: PathBuf,
}

impl JsonMacroSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn write_binding(
        &self,
        mode: &str,
        key: Key,
        state: PressState,
        actions: &[Action],
    ) -> Result<()> {
        let text = fs::read_to_string(&self.path).map_err(|source| ConfigFileError::Read {
            path: self.path.clone(),
            source,
        })?;
        let mut root: Value = serde_json::from_str(&text)?;

        let profile = root
            .as_object_mut()
            .and_then(|profiles| profiles.get_mut(mode))
            .and_then(Value::as_object_mut)
            .ok_or_else(|| {
                ConfigFileError::document(format!("profile '{mode}'"), "not found in file")
            })?;

        let descriptor = match describe_actions(actions, None)?.as_slice() {
            [one] => Value::String(one.clone()),
            many => Value::Array(many.iter().cloned().map(Value::String).collect()),
        };
        set_slot(profile, key, state, descriptor);

        self.replace_file(&root)?;
        debug!(path = %self.path.display(), %mode, %key, %state, "binding written");
        Ok(())
    }

    fn replace_file(&self, root: &Value) -> Result<()> {
        let mut buf = Vec::new();
        let mut ser =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        root.serialize(&mut ser)?;
        buf.push(b'\n');

        let write_err = |source| ConfigFileError::Write {
            path: self.path.clone(),
            source,
        };
        // Write through a symlink to the file it points at
        let target = fs::canonicalize(&self.path).map_err(write_err)?;
        let permissions = fs::metadata(&target).map_err(write_err)?.permissions();

        let tmp = temp_path(&target);
        let mut file = fs::File::create(&tmp).map_err(write_err)?;
        file.set_permissions(permissions).map_err(write_err)?;
        file.write_all(&buf).map_err(write_err)?;
        file.sync_all().map_err(write_err)?;
        fs::rename(&tmp, &target).map_err(write_err)
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "config".to_string());
    path.with_file_name(format!(".{name}.tmp"))
}

impl MacroSink for JsonMacroSink {
    fn persist(
        &mut self,
        mode: &str,
        key: Key,
        state: PressState,
        actions: &[Action],
    ) -> std::result::Result<(), SinkError> {
        self.write_binding(mode, key, state, actions)
            .map_err(|err| SinkError::new(format!("updating {}", self.path.display()), err))
    }
}

/// Replace one slot of a key entry, reshaping the entry as needed
fn set_slot(profile: &mut Map<String, Value>, key: Key, state: PressState, descriptor: Value) {
    // Key names match case-insensitively, keep whatever spelling the file
    // uses. The loader lets the last spelling win, so write to that one.
    let name = profile
        .keys()
        .rev()
        .find(|name| Key::from_name(name) == Some(key))
        .cloned()
        .unwrap_or_else(|| key.name().to_string());

    match profile.get_mut(&name) {
        Some(Value::Object(split)) => {
            split.insert(state.name().to_string(), descriptor);
        }
        Some(entry) if state == PressState::Released => *entry = descriptor,
        Some(entry) => {
            let released = entry.take();
            let mut split = Map::new();
            split.insert(PressState::Pressed.name().to_string(), descriptor);
            split.insert(PressState::Released.name().to_string(), released);
            *entry = Value::Object(split);
        }
        None if state == PressState::Released => {
            profile.insert(name, descriptor);
        }
        None => {
            let mut split = Map::new();
            split.insert(state.name().to_string(), descriptor);
            profile.insert(name, Value::Object(split));
        }
    }
}
