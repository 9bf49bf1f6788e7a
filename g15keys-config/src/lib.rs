pub mod error;
pub mod lexer;
pub mod parser;
pub mod render;
pub mod writer;

use std::fs;
use std::path::{Path, PathBuf};

pub use error::{ConfigFileError, DescriptorError, Result};
pub use parser::{parse_config, parse_descriptor};
pub use render::describe_actions;
pub use writer::JsonMacroSink;

use g15keys_core::Configuration;

/// `$HOME/.g15keys/config`, when a home directory is known
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".g15keys").join("config"))
}

/// Read and validate a configuration file
pub fn load_config_file(path: &Path) -> Result<Configuration> {
    let text = fs::read_to_string(path).map_err(|source| ConfigFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&text)
}
