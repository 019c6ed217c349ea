use std::{sync::Arc, time::Instant};

use machine_learning::training::{Outcome, TrainingRun};
use tokio::sync::mpsc;

use super::model::{LogLine, SessionPhase, SessionView};
use crate::app::training::TrainingEvent;

const MAX_LOGS: usize = 200;

/// Improvements are only logged every this many epochs.
const LOG_EVERY: usize = 100;

const LR_UP: f32 = 1.1;
const LR_DOWN: f32 = 0.9;

/// Drives the TUI state from the training run and its stream of [`TrainingEvent`]s.
pub struct SessionState {
    run: Arc<TrainingRun>,
    view: SessionView,
    events: mpsc::Receiver<TrainingEvent>,
}

impl SessionState {
    /// Creates a new `SessionState`.
    ///
    /// # Args
    /// * `run` - The shared state of the training run.
    /// * `events` - The receiver end of the training events channel.
    /// * `samples` - The size of the training set, used to average the loss.
    pub fn new(
        run: Arc<TrainingRun>,
        events: mpsc::Receiver<TrainingEvent>,
        samples: usize,
    ) -> Self {
        let view = SessionView {
            phase: SessionPhase::Training,
            started_at: Instant::now(),
            elapsed: Default::default(),
            epoch: run.epoch(),
            max_epochs: run.max_epochs(),
            samples,
            avg_loss: None,
            learning_rate: run.learning_rate().get(),
            rollbacks: run.rollbacks(),
            decays: run.decays(),
            logs: vec![LogLine {
                level: "INFO",
                message: format!("training on {samples} samples..."),
            }],
        };

        Self { run, view, events }
    }

    /// Returns the current snapshot for rendering.
    pub fn view(&self) -> &SessionView {
        &self.view
    }

    #[cfg(test)]
    pub fn run(&self) -> &TrainingRun {
        &self.run
    }

    /// Drains all pending events and refreshes the live counters. Non-blocking.
    ///
    /// Should be called once per TUI frame tick.
    pub fn tick(&mut self) {
        self.view.elapsed = self.view.started_at.elapsed();

        while let Ok(event) = self.events.try_recv() {
            self.apply(event);
        }

        self.view.epoch = self.run.epoch();
        self.view.learning_rate = self.run.learning_rate().get();
        self.view.rollbacks = self.run.rollbacks();
        self.view.decays = self.run.decays();
        self.view.avg_loss = self
            .run
            .last_loss()
            .map(|loss| loss / self.view.samples.max(1) as f32);
    }

    pub fn raise_learning_rate(&mut self) {
        let lr = self.run.learning_rate().scale(LR_UP);
        self.push_log("INFO", format!("learning rate raised to {lr:.6}"));
    }

    pub fn lower_learning_rate(&mut self) {
        let lr = self.run.learning_rate().scale(LR_DOWN);
        self.push_log("INFO", format!("learning rate lowered to {lr:.6}"));
    }

    /// Asks the trainer to stop after its current epoch.
    pub fn stop(&mut self) {
        self.run.request_stop();
        if self.view.phase == SessionPhase::Training {
            self.view.phase = SessionPhase::Stopping;
        }
    }

    fn apply(&mut self, event: TrainingEvent) {
        match event {
            TrainingEvent::Epoch(report) => match report.outcome {
                Outcome::Diverged => {
                    self.push_log(
                        "WARN",
                        format!(
                            "epoch {}: loss diverged, rolled back, lr={:.6}",
                            report.epoch, report.learning_rate
                        ),
                    );
                }
                Outcome::Worsened => {
                    self.push_log(
                        "INFO",
                        format!(
                            "epoch {}: loss={:.4} got worse, lr={:.6}",
                            report.epoch, report.loss, report.learning_rate
                        ),
                    );
                }
                Outcome::Improved if report.epoch % LOG_EVERY == 0 => {
                    self.push_log(
                        "INFO",
                        format!("epoch {}: loss={:.4}", report.epoch, report.loss),
                    );
                }
                Outcome::Improved => {}
            },

            TrainingEvent::Finished(summary) => {
                self.view.phase = SessionPhase::Finished;
                let best = summary
                    .best_loss
                    .map(|l| format!("{l:.4}"))
                    .unwrap_or_else(|| "-".into());
                self.push_log(
                    "INFO",
                    format!(
                        "training finished after {} epochs, best loss {best}",
                        summary.epochs
                    ),
                );
            }

            TrainingEvent::Error(msg) => {
                self.view.phase = SessionPhase::Error;
                self.push_log("ERROR", msg);
            }
        }
    }

    fn push_log(&mut self, level: &'static str, message: String) {
        self.view.logs.push(LogLine { level, message });
        if self.view.logs.len() > MAX_LOGS {
            let drain = self.view.logs.len() - MAX_LOGS;
            self.view.logs.drain(0..drain);
        }
    }
}

#[cfg(test)]
mod tests {
    use machine_learning::{
        arch::{Dense, Network, NetworkParameters},
        config::TrainingConfig,
        dataset::Dataset,
        training::{EpochReport, TrainSummary, TrainerBuilder},
    };
    use ndarray::array;

    use super::*;

    fn session() -> (SessionState, mpsc::Sender<TrainingEvent>) {
        let hidden = Dense::zeros(1, 1);
        let output = Dense::zeros(1, 1);
        let params = NetworkParameters::new(hidden, output).unwrap();
        let run = Arc::new(TrainingRun::new(Network::new(params), 0.1, 10));
        let (tx, rx) = mpsc::channel(16);

        (SessionState::new(run, rx, 4), tx)
    }

    fn report(epoch: usize, outcome: Outcome) -> TrainingEvent {
        TrainingEvent::Epoch(EpochReport {
            epoch,
            loss: 2.,
            learning_rate: 0.1,
            outcome,
        })
    }

    #[test]
    fn logs_rollbacks_and_decays() {
        let (mut session, tx) = session();

        tx.try_send(report(1, Outcome::Diverged)).unwrap();
        tx.try_send(report(2, Outcome::Worsened)).unwrap();
        tx.try_send(report(3, Outcome::Improved)).unwrap();
        session.tick();

        assert_eq!(session.view().logs.len(), 3);
        assert!(session.view().logs[1].message.contains("rolled back"));
        assert!(session.view().logs[2].message.contains("got worse"));
    }

    #[test]
    fn counters_survive_dropped_events() {
        let hidden = Dense::new(array![[1.]], array![0.]).unwrap();
        let output = Dense::new(array![[1.]], array![0.]).unwrap();
        let params = NetworkParameters::new(hidden, output).unwrap();

        let mut config = TrainingConfig::default();
        config.learning_rate = 10.;
        let mut trainer = TrainerBuilder::new().build_with(params, &config).unwrap();

        let dataset = Dataset::from_rows((1..=8).map(|i| (vec![i as f32], 10.))).unwrap();
        let (tx, rx) = mpsc::channel(1);
        let mut session = SessionState::new(Arc::clone(trainer.run()), rx, dataset.len());

        let summary = trainer
            .train(&dataset, 6, |report| {
                let _ = tx.try_send(TrainingEvent::Epoch(*report));
            })
            .unwrap();
        session.tick();

        assert!(summary.rollbacks > 0);
        assert_eq!(session.view().rollbacks, summary.rollbacks);
        assert_eq!(session.view().decays, summary.decays);
        assert_eq!(session.view().epoch, 6);
    }

    #[test]
    fn keys_scale_the_learning_rate() {
        let (mut session, _tx) = session();

        session.raise_learning_rate();
        session.tick();
        assert!((session.view().learning_rate - 0.11).abs() < 1e-6);

        session.lower_learning_rate();
        session.tick();
        assert!((session.view().learning_rate - 0.099).abs() < 1e-6);
    }

    #[test]
    fn stop_and_finish() {
        let (mut session, tx) = session();

        session.stop();
        assert!(session.run().is_stopped());
        assert_eq!(session.view().phase, SessionPhase::Stopping);

        tx.try_send(TrainingEvent::Finished(TrainSummary::default()))
            .unwrap();
        session.tick();
        assert_eq!(session.view().phase, SessionPhase::Finished);
    }
}
