use std::sync::Arc;

use log::{debug, info};
use rayon::{ThreadPool, ThreadPoolBuilder, prelude::*};

use super::{
    EpochLoss, GradientWorker, Outcome, SHARDS, StabilityController, TrainingRun, shard_ranges,
};
use crate::{
    config::StabilityConfig,
    dataset::Dataset,
    error::{MlErr, Result},
};

/// What a finished epoch looked like.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EpochReport {
    /// The epoch counter after this epoch, starting at `1`.
    pub epoch: usize,
    /// The aggregated loss of every sample.
    pub loss: f32,
    /// The learning rate once the stability decision was taken.
    pub learning_rate: f32,
    pub outcome: Outcome,
}

/// The result of a call to `EpochTrainer::train`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TrainSummary {
    /// Epochs run by this call.
    pub epochs: usize,
    pub last_loss: Option<f32>,
    /// The lowest loss accepted as an improvement so far in the run.
    pub best_loss: Option<f32>,
    pub rollbacks: usize,
    pub decays: usize,
    /// Whether the run went past its epoch ceiling.
    pub exhausted: bool,
}

/// Trains a network by fanning every epoch out to `SHARDS` gradient workers.
pub struct EpochTrainer {
    run: Arc<TrainingRun>,
    controller: StabilityController,
    epoch_loss: EpochLoss,
    pool: ThreadPool,
}

impl EpochTrainer {
    /// Creates a new `EpochTrainer` with its own pool of `SHARDS` threads.
    ///
    /// # Arguments
    /// * `run` - The shared state of the training run.
    /// * `stability` - The configuration of the per epoch stability decision.
    ///
    /// # Errors
    /// A `ThreadPool` error if the worker threads can't be spawned.
    pub fn new(run: Arc<TrainingRun>, stability: StabilityConfig) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(SHARDS)
            .thread_name(|i| format!("gradient-worker-{i}"))
            .build()?;

        Ok(Self {
            run,
            controller: StabilityController::new(stability),
            epoch_loss: EpochLoss::new(),
            pool,
        })
    }

    /// The shared state of the run this trainer drives.
    pub fn run(&self) -> &Arc<TrainingRun> {
        &self.run
    }

    pub fn controller(&self) -> &StabilityController {
        &self.controller
    }

    /// Runs up to `epochs` epochs over `dataset`.
    ///
    /// Training ends early if a stop was requested or the run's epoch ceiling was exceeded,
    /// both are checked before every epoch.
    ///
    /// # Arguments
    /// * `dataset` - The training set.
    /// * `epochs` - The budget of this call.
    /// * `on_epoch` - Called with the report of every finished epoch.
    ///
    /// # Errors
    /// A `SizeMismatch` if the dataset's features don't fit the network's input layer.
    pub fn train<F>(
        &mut self,
        dataset: &Dataset,
        epochs: usize,
        mut on_epoch: F,
    ) -> Result<TrainSummary>
    where
        F: FnMut(&EpochReport),
    {
        let expected = self.run.network().dims().input;
        if dataset.x_size() != expected {
            return Err(MlErr::SizeMismatch {
                a: "dataset features",
                b: "network inputs",
                got: dataset.x_size(),
                expected,
            });
        }

        info!(
            samples = dataset.len(),
            epochs = epochs,
            lr = self.run.learning_rate().get();
            "training started"
        );

        let mut summary = TrainSummary::default();
        for _ in 0..epochs {
            if self.run.should_halt() {
                break;
            }

            let report = self.run_epoch(dataset)?;
            summary.epochs += 1;
            summary.last_loss = Some(report.loss);

            match report.outcome {
                Outcome::Diverged => summary.rollbacks += 1,
                Outcome::Worsened => summary.decays += 1,
                Outcome::Improved => {}
            }

            on_epoch(&report);
        }

        summary.best_loss = self.controller.best_loss();

        summary.exhausted = self.run.is_exhausted();
        if summary.exhausted {
            info!(max_epochs = self.run.max_epochs(); "epoch ceiling reached, the run is over");
        }

        info!(
            epochs = summary.epochs,
            total = self.run.epoch(),
            rollbacks = summary.rollbacks,
            decays = summary.decays;
            "training finished"
        );

        Ok(summary)
    }

    /// Runs a single epoch and the stability decision that follows it.
    ///
    /// The call returns once every worker joined and the decision was taken.
    ///
    /// # Errors
    /// A `SizeMismatch` from the workers if the dataset's features don't fit the network.
    pub fn run_epoch(&mut self, dataset: &Dataset) -> Result<EpochReport> {
        self.epoch_loss.reset();

        let run = &*self.run;
        let worker = GradientWorker::new(run.network(), run.learning_rate(), &self.epoch_loss);
        let shards = shard_ranges(dataset.len());

        self.pool.install(|| {
            shards
                .par_iter()
                .try_for_each(|range| worker.run(dataset, range.clone()).map(|_| ()))
        })?;

        let loss = self.epoch_loss.total();
        let outcome = self
            .controller
            .evaluate(loss, run.network(), run.learning_rate());
        let epoch = run.finish_epoch(loss, outcome);
        let learning_rate = run.learning_rate().get();

        debug!(epoch = epoch, loss = loss, lr = learning_rate; "epoch finished");

        Ok(EpochReport {
            epoch,
            loss,
            learning_rate,
            outcome,
        })
    }
}
