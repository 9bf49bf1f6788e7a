mod descriptor;
mod document;

pub use descriptor::{parse_descriptor, parse_tokens};
pub use document::parse_config;
