use std::{
    io,
    sync::Arc,
    thread::{self, JoinHandle},
};

use log::error;
use machine_learning::{
    dataset::Dataset,
    training::{EpochReport, EpochTrainer, TrainSummary},
};
use tokio::sync::mpsc;

/// What the training thread reports to the UI.
#[derive(Debug, Clone)]
pub enum TrainingEvent {
    Epoch(EpochReport),
    Finished(TrainSummary),
    Error(String),
}

/// Runs the trainer on its own thread, reporting every epoch through `events`.
///
/// Epoch events are dropped when the channel is full, the UI reads the live counters
/// from the training run anyway.
///
/// # Errors
/// If the thread can't be spawned.
pub fn spawn(
    mut trainer: EpochTrainer,
    dataset: Arc<Dataset>,
    epochs: usize,
    events: mpsc::Sender<TrainingEvent>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("trainer".into())
        .spawn(move || {
            let result = trainer.train(&dataset, epochs, |report| {
                let _ = events.try_send(TrainingEvent::Epoch(*report));
            });

            let event = match result {
                Ok(summary) => TrainingEvent::Finished(summary),
                Err(e) => {
                    error!("training failed: {e}");
                    TrainingEvent::Error(e.to_string())
                }
            };

            let _ = events.blocking_send(event);
        })
}
