//! Slipbox - stdio host
//!
//! Plays the platform wrapper's part: reads bridge requests as JSON lines
//! on stdin and writes bridge events as JSON lines on stdout. Logs go to
//! stderr so stdout stays a clean channel.
//!
//! Usage: `slipbox [FILE]` where FILE is the initial document.

use log::{info, warn};
use slipbox::bridge::{BridgeEvent, SurfaceHandle};
use slipbox::config::{get_config_file_path, load_config, save_config_silent};
use slipbox::editor::EditorSurface;
use slipbox::{Error, Result};
use std::fs;
use std::io::{self, BufRead, Write};

/// Application name constant.
const APP_NAME: &str = "Slipbox";

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting {} stdio host", APP_NAME);

    let settings = load_config();
    // First run: write the defaults so there is a file to edit
    if get_config_file_path().is_ok_and(|path| !path.exists()) {
        save_config_silent(&settings);
    }
    let mut surface = EditorSurface::new(settings);
    surface.subscribe(|event| send(&BridgeEvent::from(event)));

    match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading initial document from {}", path);
            surface.load(|| fs::read_to_string(&path).map_err(Error::from));
        }
        None => {
            surface.load(|| Ok(String::new()));
        }
    }
    if let Some(err) = surface.load_error() {
        send(&BridgeEvent::from(err));
    }

    let handle = SurfaceHandle::new(surface);
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        for event in handle.handle_line(&line) {
            send(&event);
        }
    }

    info!("stdin closed, shutting down");
    Ok(())
}

/// Write one event as a JSON line on stdout.
fn send(event: &BridgeEvent) {
    let result = event.to_json().and_then(|json| {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", json)?;
        stdout.flush()?;
        Ok(())
    });
    if let Err(e) = result {
        warn!("Failed to write bridge event: {}", e);
    }
}
