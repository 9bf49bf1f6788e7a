#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

/// A configuration file in its own temporary directory
pub struct ConfigFile {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl ConfigFile {
    pub fn new(contents: &str) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config");
        fs::write(&path, contents).expect("Failed to write config");
        Self { dir, path }
    }

    pub fn read(&self) -> String {
        fs::read_to_string(&self.path).expect("Failed to read config")
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.read()).expect("Config is not JSON")
    }

    /// Names of everything in the directory besides the config itself
    pub fn strays(&self) -> Vec<String> {
        fs::read_dir(self.dir.path())
            .expect("Failed to list temp dir")
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| name != "config")
            .collect()
    }
}

/// The layout the daemon ships with
pub const SAMPLE: &str = r#"{
    "Mode1": {
        "G1": "/usr/bin/xterm",
        "G2": { "pressed": "emit k+133,k+10,k-10,k-133" },
        "M1": ["switch-profile Mode1", "set-leds m1"],
        "M2": ["switch-profile Mode2", "set-leds m2"],
        "M3": ["switch-profile Mode3", "set-leds m3"],
        "MR": "record"
    },
    "Mode2": {
        "G1": "/usr/bin/firefox --new-window",
        "M1": ["switch-profile Mode1", "set-leds m1"],
        "MR": "record"
    },
    "Mode3": {
        "L1": { "pressed": "m+1", "released": "m-1" },
        "M1": ["switch-profile Mode1", "set-leds m1"]
    }
}
"#;
