use std::{env, io, sync::Arc, time::Duration};

use anyhow::{anyhow, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use datagen::{generate_training_data, GeneratorConfig};
use log::info;
use machine_learning::{config::TrainingConfig, training::TrainerBuilder};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use super::training;
use crate::{
    state::session::SessionState,
    ui::{draw, plots::PlotSource},
};

const EVENTS_CAPACITY: usize = 256;

struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

fn load_configs() -> Result<(TrainingConfig, GeneratorConfig)> {
    let training = match env::var("TRAINING_CONFIG") {
        Ok(path) => TrainingConfig::load(path)?,
        Err(_) => TrainingConfig::default(),
    };

    let generator = match env::var("GENERATOR_CONFIG") {
        Ok(path) => GeneratorConfig::load(path)?,
        Err(_) => GeneratorConfig::default(),
    };

    Ok((training, generator))
}

/// Runs the TUI application.
///
/// Training runs on a background thread while the UI draws the live network, the user
/// tunes the learning rate with the arrow keys and quits with `q` or `Esc`.
///
/// # Errors
/// Returns an error if the configuration, the training data, terminal setup or rendering
/// fails.
pub fn run() -> Result<()> {
    let (training_config, generator_config) = load_configs()?;

    let dataset = Arc::new(generate_training_data(&generator_config)?);
    let trainer = TrainerBuilder::new().build(&training_config)?;
    let run = Arc::clone(trainer.run());

    let (tx, rx) = mpsc::channel(EVENTS_CAPACITY);
    let handle = training::spawn(trainer, Arc::clone(&dataset), training_config.epochs, tx)?;

    let mut session = SessionState::new(Arc::clone(&run), rx, dataset.len());
    let source = PlotSource::new(dataset, generator_config);

    {
        let _guard = TerminalGuard::enter()?;

        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        loop {
            session.tick();
            terminal.draw(|f| draw::draw(f, session.view(), run.network(), &source))?;

            if event::poll(Duration::from_millis(120))? {
                if let Event::Key(k) = event::read()? {
                    if k.kind != KeyEventKind::Press {
                        continue;
                    }
                    match k.code {
                        KeyCode::Up => session.raise_learning_rate(),
                        KeyCode::Down => session.lower_learning_rate(),
                        KeyCode::Char('q') | KeyCode::Esc => {
                            session.stop();
                            break;
                        }
                        _ => {}
                    }
                }
            }
        }

        terminal.show_cursor()?;
    }

    // The trainer's last event must not block on a channel nobody drains anymore.
    drop(session);

    info!("waiting for the trainer to wrap up");
    handle
        .join()
        .map_err(|_| anyhow!("the training thread panicked"))?;

    Ok(())
}
