use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use g15keys_config::{default_config_path, describe_actions, load_config_file};

#[derive(Parser, Debug)]
#[command(name = "g15keys-check")]
#[command(about = "Validate a g15keys configuration file and list its bindings", long_about = None)]
struct Args {
    /// Configuration file (defaults to ~/.g15keys/config)
    config: Option<PathBuf>,

    /// Only validate, print nothing on success
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let path = match args.config {
        Some(path) => path,
        None => default_config_path().context("cannot determine home directory")?,
    };

    let config = load_config_file(&path)
        .with_context(|| format!("invalid configuration {}", path.display()))?;

    if args.quiet {
        return Ok(());
    }

    println!(
        "{}: {} profiles, {} bindings",
        path.display(),
        config.mode_count(),
        config.binding_count()
    );

    for (mode, name) in config.modes() {
        let marker = if mode == config.default_mode() {
            " (default)"
        } else {
            ""
        };
        println!("\n[{}]{}", name, marker);

        for (key, state, actions) in config.bindings_for(mode) {
            let descriptors = describe_actions(actions, Some(&config))?;
            println!("  {:<4} {:<8} {}", key.name(), state.name(), descriptors.join(" ; "));
        }
    }

    Ok(())
}
