mod builder;
mod epoch_loss;
mod learning_rate;
mod run;
mod shard;
mod stability;
mod trainer;
mod worker;

pub use builder::TrainerBuilder;
pub use epoch_loss::EpochLoss;
pub use learning_rate::LearningRate;
pub use run::TrainingRun;
pub use shard::{SHARDS, shard_ranges};
pub use stability::{Outcome, StabilityController};
pub use trainer::{EpochReport, EpochTrainer, TrainSummary};
pub use worker::GradientWorker;
