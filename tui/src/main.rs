use std::{env, fs::File};

use anyhow::Result;

mod app;
mod state;
mod ui;

const DEFAULT_LOG_FILE: &str = "envelope-tui.log";

fn main() -> Result<()> {
    init_logging()?;
    app::run::run()
}

/// Sends the logs to a file, the terminal belongs to the UI.
fn init_logging() -> Result<()> {
    let path = env::var("LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
    let file = File::create(path)?;

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();

    Ok(())
}
