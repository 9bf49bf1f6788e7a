use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use g15keys::protocol::{DEFAULT_HOST, DEFAULT_PORT};
use g15keys::{logging, runtime, Settings};
use g15keys_config::default_config_path;
use tracing::error;

#[derive(Parser, Debug)]
#[command(author, version, about = "Logitech G15 extra key daemon", long_about = None)]
struct Args {
    /// Configuration file (defaults to ~/.g15keys/config)
    #[arg(short, long, env = "G15KEYS_CONFIG")]
    config: Option<PathBuf>,

    /// g15daemon host
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// g15daemon port
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Log at debug level
    #[arg(short, long)]
    debug: bool,

    /// Fork into the background
    #[arg(short, long)]
    background: bool,

    /// Do not read keyboards and mice; recorded macros stay empty
    #[arg(long)]
    no_capture: bool,

    /// Keep recorded macros in memory only
    #[arg(long)]
    no_persist: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.background {
        daemonize().context("cannot fork into the background")?;
    }
    logging::init(args.debug);

    let config_path = match args.config {
        Some(path) => path,
        None => default_config_path().context("cannot determine home directory")?,
    };
    let settings = Settings {
        config_path,
        host: args.host,
        port: args.port,
        capture: !args.no_capture,
        persist: !args.no_persist,
    };

    if let Err(err) = runtime::run(settings) {
        error!("{:#}", err);
        std::process::exit(1);
    }
    Ok(())
}

/// Fork, let the parent exit, and start a new session in the child.
///
/// Must run before any thread is spawned.
fn daemonize() -> std::io::Result<()> {
    // SAFETY: single-threaded at this point; the child only returns into
    // ordinary Rust code.
    match unsafe { libc::fork() } {
        -1 => Err(std::io::Error::last_os_error()),
        0 => {
            if unsafe { libc::setsid() } == -1 {
                return Err(std::io::Error::last_os_error());
            }
            Ok(())
        }
        _ => std::process::exit(0),
    }
}
