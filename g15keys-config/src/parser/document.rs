//! The JSON configuration document.
//!
//! The top level maps profile names to profiles, in file order; the first
//! profile is the default. A profile maps key names to descriptors:
//!
//! ```json
//! {
//!     "Mode1": {
//!         "G1": "/usr/bin/xterm",
//!         "G2": ["/usr/bin/a", "/usr/bin/b"],
//!         "G3": { "pressed": "k+50", "released": "k-50" },
//!         "MR": "record"
//!     }
//! }
//! ```
//!
//! A plain string or list binds the release of the key.

use std::collections::HashMap;

use g15keys_core::{ActionSpec, ConfigBuilder, Configuration, Key, PressState, UnknownKey};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::descriptor::parse_descriptor;
use crate::error::{ConfigFileError, Result};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Descriptors {
    One(String),
    Many(Vec<String>),
}

impl Descriptors {
    fn as_slice(&self) -> &[String] {
        match self {
            Descriptors::One(text) => std::slice::from_ref(text),
            Descriptors::Many(list) => list,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SplitEntry {
    pressed: Option<Descriptors>,
    released: Option<Descriptors>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Entry {
    Plain(Descriptors),
    Split(SplitEntry),
}

impl Entry {
    fn slots(&self) -> Vec<(PressState, &Descriptors)> {
        match self {
            Entry::Plain(descriptors) => vec![(PressState::Released, descriptors)],
            Entry::Split(split) => {
                let mut slots = Vec::new();
                if let Some(pressed) = &split.pressed {
                    slots.push((PressState::Pressed, pressed));
                }
                if let Some(released) = &split.released {
                    slots.push((PressState::Released, released));
                }
                slots
            }
        }
    }
}

/// Parse a whole configuration document
pub fn parse_config(text: &str) -> Result<Configuration> {
    let root: Value = serde_json::from_str(text)?;
    let Value::Object(profiles) = root else {
        return Err(ConfigFileError::document(
            "top level",
            "expected an object mapping profile names to profiles",
        ));
    };

    let mut builder = ConfigBuilder::new();
    for name in profiles.keys() {
        builder.add_mode(name.as_str())?;
    }

    for (mode, profile) in &profiles {
        let Value::Object(profile) = profile else {
            return Err(ConfigFileError::document(
                format!("profile '{mode}'"),
                "expected an object mapping key names to actions",
            ));
        };
        add_profile(&mut builder, mode, profile)?;
    }

    let config = builder.build()?;
    debug!(
        profiles = config.mode_count(),
        bindings = config.binding_count(),
        "configuration parsed"
    );
    Ok(config)
}

fn add_profile(builder: &mut ConfigBuilder, mode: &str, profile: &Map<String, Value>) -> Result<()> {
    // Key names are case-insensitive, so "g1" and "G1" would fight over one key
    let mut spellings: HashMap<Key, &str> = HashMap::new();
    for (key_name, value) in profile {
        let key = key_name
            .parse::<Key>()
            .map_err(|UnknownKey(key)| ConfigFileError::UnknownKey {
                mode: mode.to_string(),
                key,
            })?;
        if let Some(first) = spellings.insert(key, key_name) {
            return Err(ConfigFileError::document(
                format!("profile '{mode}'"),
                format!("key {key} is listed twice, as '{first}' and '{key_name}'"),
            ));
        }

        let entry = Entry::deserialize(value).map_err(|_| {
            ConfigFileError::document(
                format!("profile '{mode}', key {key}"),
                "expected a string, a list of strings, or an object with 'pressed' and/or 'released'",
            )
        })?;

        for (state, descriptors) in entry.slots() {
            let actions = parse_slot(mode, key, state, descriptors)?;
            builder.add_binding(mode, key, state, actions)?;
        }
    }
    Ok(())
}

fn parse_slot(
    mode: &str,
    key: Key,
    state: PressState,
    descriptors: &Descriptors,
) -> Result<Vec<ActionSpec>> {
    let mut actions = Vec::new();
    for text in descriptors.as_slice() {
        let parsed = parse_descriptor(text).map_err(|source| ConfigFileError::Descriptor {
            mode: mode.to_string(),
            key,
            state,
            source,
        })?;
        actions.extend(parsed);
    }
    Ok(actions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use g15keys_core::{Action, ConfigError, InputToken};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn test_profiles_keep_file_order() {
        let config = parse_config(r#"{ "Zeta": {}, "Alpha": {}, "Mid": {} }"#).unwrap();
        let names: Vec<&str> = config.modes().map(|(_, name)| name).collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
        assert_eq!(config.mode_name(config.default_mode()), "Zeta");
    }

    #[test]
    fn test_entry_shapes() {
        let config = parse_config(
            r#"{
                "Mode1": {
                    "G1": "/usr/bin/xterm",
                    "g2": ["/usr/bin/a", "/usr/bin/b --flag"],
                    "G3": { "pressed": "k+50" },
                    "G4": { "pressed": "emit m+1", "released": ["emit m-1", "set-leds m2"] }
                }
            }"#,
        )
        .unwrap();
        let mode = config.default_mode();

        assert_eq!(
            config.resolve(mode, Key::G1, PressState::Released).unwrap(),
            &[Action::RunProgram {
                path: PathBuf::from("/usr/bin/xterm"),
                args: vec![],
            }]
        );
        assert_eq!(
            config.resolve(mode, Key::G2, PressState::Released).unwrap().len(),
            2
        );
        assert_eq!(
            config.resolve(mode, Key::G3, PressState::Pressed).unwrap(),
            &[Action::EmitInput(InputToken::KeyPress(50))]
        );
        assert!(config.resolve(mode, Key::G3, PressState::Released).is_none());
        assert_eq!(
            config.resolve(mode, Key::G4, PressState::Released).unwrap().len(),
            2
        );
    }

    #[test]
    fn test_switch_targets_resolve_across_profiles() {
        let config = parse_config(
            r#"{
                "Mode1": { "M2": "switch-profile Mode2" },
                "Mode2": { "M1": "switch-profile Mode1" }
            }"#,
        )
        .unwrap();
        let mode2 = config.mode_id("Mode2").unwrap();
        assert_eq!(
            config
                .resolve(config.default_mode(), Key::M2, PressState::Released)
                .unwrap(),
            &[Action::SwitchMode(mode2)]
        );
    }

    #[test]
    fn test_document_errors() {
        assert!(matches!(parse_config("[]"), Err(ConfigFileError::Document { .. })));
        assert!(matches!(
            parse_config(r#"{ "Mode1": "G1" }"#),
            Err(ConfigFileError::Document { .. })
        ));
        assert!(matches!(parse_config("{ not json"), Err(ConfigFileError::Json(_))));
        assert!(matches!(
            parse_config("{}"),
            Err(ConfigFileError::Config(ConfigError::NoModes))
        ));
        assert!(matches!(
            parse_config(r#"{ "Mode1": { "G23": "record" } }"#),
            Err(ConfigFileError::UnknownKey { ref key, .. }) if key == "G23"
        ));
        assert!(matches!(
            parse_config(r#"{ "Mode1": { "G1": { "held": "record" } } }"#),
            Err(ConfigFileError::Document { .. })
        ));
        assert!(matches!(
            parse_config(r#"{ "Mode1": { "G1": 5 } }"#),
            Err(ConfigFileError::Document { .. })
        ));
    }

    #[test]
    fn test_key_spelled_twice_is_rejected() {
        let err = parse_config(r#"{ "Mode1": { "g1": "/usr/bin/a", "G1": "/usr/bin/b" } }"#)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "profile 'Mode1': key G1 is listed twice, as 'g1' and 'G1'"
        );
    }

    #[test]
    fn test_bad_descriptor_names_its_slot() {
        let err = parse_config(r#"{ "Mode1": { "G5": { "pressed": "emit k+1000" } } }"#)
            .unwrap_err();
        match err {
            ConfigFileError::Descriptor { mode, key, state, .. } => {
                assert_eq!(mode, "Mode1");
                assert_eq!(key, Key::G5);
                assert_eq!(state, PressState::Pressed);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_semantic_errors_come_from_the_builder() {
        assert!(matches!(
            parse_config(r#"{ "Mode1": { "G1": "switch-profile Nowhere" } }"#),
            Err(ConfigFileError::Config(ConfigError::UnknownSwitchTarget { .. }))
        ));
        assert!(matches!(
            parse_config(r#"{ "Mode1": { "G1": "xterm" } }"#),
            Err(ConfigFileError::Config(ConfigError::RelativeProgramPath { .. }))
        ));
    }
}
