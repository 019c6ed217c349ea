use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};

use super::{LearningRate, Outcome};
use crate::arch::Network;

/// The shared state of one training run.
///
/// It is handed out behind an `Arc` so observers can read the progress, evaluate the network
/// or tune the learning rate while the trainer is busy.
#[derive(Debug)]
pub struct TrainingRun {
    network: Network,
    learning_rate: LearningRate,
    epoch: AtomicUsize,
    last_loss: AtomicU32,
    max_epochs: usize,
    stopped: AtomicBool,
    rollbacks: AtomicUsize,
    decays: AtomicUsize,
}

impl TrainingRun {
    /// Creates a new `TrainingRun`.
    ///
    /// # Arguments
    /// * `network` - The network to train.
    /// * `learning_rate` - The initial learning rate.
    /// * `max_epochs` - Once the epoch counter exceeds this the run halts for good.
    pub fn new(network: Network, learning_rate: f32, max_epochs: usize) -> Self {
        Self {
            network,
            learning_rate: LearningRate::new(learning_rate),
            epoch: AtomicUsize::new(0),
            last_loss: AtomicU32::new(0f32.to_bits()),
            max_epochs,
            stopped: AtomicBool::new(false),
            rollbacks: AtomicUsize::new(0),
            decays: AtomicUsize::new(0),
        }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn learning_rate(&self) -> &LearningRate {
        &self.learning_rate
    }

    /// The amount of epochs finished so far.
    pub fn epoch(&self) -> usize {
        self.epoch.load(Ordering::Acquire)
    }

    pub fn max_epochs(&self) -> usize {
        self.max_epochs
    }

    /// The aggregated loss of the last finished epoch, `None` before the first one.
    pub fn last_loss(&self) -> Option<f32> {
        if self.epoch() == 0 {
            return None;
        }

        Some(f32::from_bits(self.last_loss.load(Ordering::Acquire)))
    }

    /// Epochs that diverged and were rolled back, over the whole run.
    pub fn rollbacks(&self) -> usize {
        self.rollbacks.load(Ordering::Acquire)
    }

    /// Epochs that got worse and decayed the learning rate, over the whole run.
    pub fn decays(&self) -> usize {
        self.decays.load(Ordering::Acquire)
    }

    /// Asks the trainer to stop before its next epoch.
    pub fn request_stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Whether the epoch counter went past the ceiling.
    pub fn is_exhausted(&self) -> bool {
        self.epoch() > self.max_epochs
    }

    pub fn should_halt(&self) -> bool {
        self.is_stopped() || self.is_exhausted()
    }

    /// Publishes a finished epoch's loss and outcome and bumps the counters.
    ///
    /// # Returns
    /// The updated epoch counter.
    pub(crate) fn finish_epoch(&self, loss: f32, outcome: Outcome) -> usize {
        self.last_loss.store(loss.to_bits(), Ordering::Release);

        let counter = match outcome {
            Outcome::Diverged => Some(&self.rollbacks),
            Outcome::Worsened => Some(&self.decays),
            Outcome::Improved => None,
        };
        if let Some(counter) = counter {
            counter.fetch_add(1, Ordering::AcqRel);
        }

        self.epoch.fetch_add(1, Ordering::AcqRel) + 1
    }
}
