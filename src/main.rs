//! Entry point for the **homegrid** request loop.
//!
//! Reads newline-delimited JSON requests on stdin and answers each one on
//! stdout.  Logging goes to stderr and is controlled with `RUST_LOG`.
//!
//! ```text
//! homegrid [--config <path>]
//! ```

use homegrid::config::Config;
use homegrid::ipc::session;
use homegrid::PlacementEngine;
use log::{error, info};
use std::path::PathBuf;

/// Resolve the config directory (`$XDG_CONFIG_HOME/homegrid`).
fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    PathBuf::from(base).join("homegrid")
}

/// Value following `--config`, if given.
fn config_arg() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
        if let Some(path) = arg.strip_prefix("--config=") {
            return Some(PathBuf::from(path));
        }
    }
    None
}

/// Load the explicitly requested config (fatal on error), or try
/// `$XDG_CONFIG_HOME/homegrid/config.json` and fall back to defaults.
fn load_config() -> Config {
    if let Some(path) = config_arg() {
        return match Config::load(&path) {
            Ok(cfg) => {
                info!("loaded config from {}", path.display());
                cfg
            }
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        };
    }

    let path = config_dir().join("config.json");
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            info!("no config file ({}), using defaults", e);
            Config::default()
        }
    }
}

fn main() {
    env_logger::init();

    let config = load_config();
    info!(
        "grid {}x{} over {} page(s), move {}/{}/{}, resize {}/{}/{}",
        config.grid.rows,
        config.grid.columns,
        config.grid.pages,
        config.on_move.strategy,
        config.on_move.heuristic,
        config.on_move.on_relocation_failure,
        config.on_resize.strategy,
        config.on_resize.heuristic,
        config.on_resize.on_relocation_failure,
    );

    let engine = PlacementEngine::new(config);
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    if let Err(e) = session::serve(&engine, stdin.lock(), stdout.lock()) {
        error!("session error: {}", e);
        std::process::exit(1);
    }
}
