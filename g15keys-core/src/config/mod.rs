//! Configuration model: an immutable table of bindings
//!
//! A [`Configuration`] maps `(mode, key, press state)` to an ordered action
//! list. It is produced by [`ConfigBuilder`], which validates every mode
//! target and program path, and is never mutated afterwards. Changes (reload,
//! macro assignment) build a new snapshot and publish it through
//! [`ConfigStore`].

mod store;

use std::collections::HashMap;

use crate::error::ConfigError;
use crate::types::{Action, ActionSpec, Key, ModeId, PressState};

pub use store::ConfigStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct Slot {
    mode: ModeId,
    key: Key,
    state: PressState,
}

/// A validated, read-only binding table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    modes: Vec<String>,
    bindings: HashMap<Slot, Vec<Action>>,
}

impl Configuration {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// The mode that is active after startup: the first one declared
    pub fn default_mode(&self) -> ModeId {
        ModeId(0)
    }

    pub fn mode_count(&self) -> usize {
        self.modes.len()
    }

    /// Mode names in declaration order
    pub fn modes(&self) -> impl Iterator<Item = (ModeId, &str)> + '_ {
        self.modes
            .iter()
            .enumerate()
            .map(|(i, name)| (ModeId(i), name.as_str()))
    }

    pub fn mode_id(&self, name: &str) -> Option<ModeId> {
        self.modes.iter().position(|m| m == name).map(ModeId)
    }

    /// Name of a mode. Ids from another snapshot that are out of range yield
    /// an empty string rather than panicking.
    pub fn mode_name(&self, mode: ModeId) -> &str {
        self.modes.get(mode.0).map(String::as_str).unwrap_or("")
    }

    /// Look up the action list bound to a slot.
    ///
    /// `Pressed` and `Released` are independent: a key bound only on release
    /// does nothing on press.
    pub fn resolve(&self, mode: ModeId, key: Key, state: PressState) -> Option<&[Action]> {
        self.bindings
            .get(&Slot { mode, key, state })
            .map(Vec::as_slice)
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// All bindings of one mode, ordered by key then press state
    pub fn bindings_for(&self, mode: ModeId) -> Vec<(Key, PressState, &[Action])> {
        let mut out: Vec<_> = self
            .bindings
            .iter()
            .filter(|(slot, _)| slot.mode == mode)
            .map(|(slot, actions)| (slot.key, slot.state, actions.as_slice()))
            .collect();
        out.sort_by_key(|(key, state, _)| (*key, *state));
        out
    }

    /// A copy of this snapshot with one slot replaced.
    ///
    /// The previous list for that slot is dropped entirely, never merged.
    pub fn with_binding(
        &self,
        mode: ModeId,
        key: Key,
        state: PressState,
        actions: Vec<Action>,
    ) -> Configuration {
        let mut next = self.clone();
        next.bindings.insert(Slot { mode, key, state }, actions);
        next
    }
}

/// Collects bindings from a configuration source and validates them.
///
/// Modes must be declared before anything is bound in them. Binding the same
/// slot twice keeps only the later list.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    modes: Vec<String>,
    bindings: HashMap<(usize, Key, PressState), Vec<ActionSpec>>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(mut self, name: impl Into<String>) -> Result<Self, ConfigError> {
        self.add_mode(name)?;
        Ok(self)
    }

    pub fn add_mode(&mut self, name: impl Into<String>) -> Result<(), ConfigError> {
        let name = name.into();
        if self.modes.contains(&name) {
            return Err(ConfigError::DuplicateMode(name));
        }
        self.modes.push(name);
        Ok(())
    }

    pub fn bind(
        mut self,
        mode: &str,
        key: Key,
        state: PressState,
        actions: Vec<ActionSpec>,
    ) -> Result<Self, ConfigError> {
        self.add_binding(mode, key, state, actions)?;
        Ok(self)
    }

    pub fn add_binding(
        &mut self,
        mode: &str,
        key: Key,
        state: PressState,
        actions: Vec<ActionSpec>,
    ) -> Result<(), ConfigError> {
        let index = self
            .modes
            .iter()
            .position(|m| m == mode)
            .ok_or_else(|| ConfigError::UnknownMode(mode.to_string()))?;
        self.bindings.insert((index, key, state), actions);
        Ok(())
    }

    /// Validate everything and produce the snapshot
    pub fn build(self) -> Result<Configuration, ConfigError> {
        if self.modes.is_empty() {
            return Err(ConfigError::NoModes);
        }

        // Sorted so the first reported error does not depend on hash order
        let mut entries: Vec<_> = self.bindings.into_iter().collect();
        entries.sort_by_key(|(slot, _)| *slot);

        let mut bindings = HashMap::with_capacity(entries.len());
        for ((mode, key, state), specs) in entries {
            let mode_name = &self.modes[mode];
            let actions = specs
                .into_iter()
                .map(|spec| resolve_spec(&self.modes, mode_name, key, state, spec))
                .collect::<Result<Vec<_>, _>>()?;
            bindings.insert(
                Slot {
                    mode: ModeId(mode),
                    key,
                    state,
                },
                actions,
            );
        }

        Ok(Configuration {
            modes: self.modes,
            bindings,
        })
    }
}

fn resolve_spec(
    modes: &[String],
    mode: &str,
    key: Key,
    state: PressState,
    spec: ActionSpec,
) -> Result<Action, ConfigError> {
    match spec {
        ActionSpec::RunProgram { path, args } => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::EmptyProgramPath {
                    mode: mode.to_string(),
                    key,
                    state,
                });
            }
            if !path.is_absolute() {
                return Err(ConfigError::RelativeProgramPath {
                    mode: mode.to_string(),
                    key,
                    state,
                    path,
                });
            }
            Ok(Action::RunProgram { path, args })
        }
        ActionSpec::SwitchMode(target) => modes
            .iter()
            .position(|m| *m == target)
            .map(|i| Action::SwitchMode(ModeId(i)))
            .ok_or_else(|| ConfigError::UnknownSwitchTarget {
                mode: mode.to_string(),
                key,
                state,
                target,
            }),
        ActionSpec::EmitInput(token) => Ok(Action::EmitInput(token)),
        ActionSpec::StartRecording => Ok(Action::StartRecording),
        ActionSpec::SetLeds(mask) => Ok(Action::SetLeds(mask)),
    }
}
