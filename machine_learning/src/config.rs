use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    arch::Dims,
    error::{MlErr, Result},
};

/// The shape and initialization of the network.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub input_size: usize,
    pub hidden_size: usize,
    pub output_size: usize,
    /// Initial parameters are drawn from `[-init_range, init_range)`.
    pub init_range: f32,
    pub seed: Option<u64>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            input_size: 4,
            hidden_size: 15,
            output_size: 1,
            init_range: 0.5,
            seed: None,
        }
    }
}

impl NetworkConfig {
    pub fn dims(&self) -> Dims {
        Dims::new(self.input_size, self.hidden_size, self.output_size)
    }
}

/// The knobs of the per-epoch stability decision.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilityConfig {
    /// Epoch losses above this are treated as a diverged run.
    pub divergence_threshold: f32,
    /// Learning rate factor applied when rolling back.
    pub rollback_decay: f32,
    /// Learning rate factor applied when the loss gets worse.
    pub worsen_decay: f32,
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            divergence_threshold: 1e10,
            rollback_decay: 0.9,
            worsen_decay: 0.95,
        }
    }
}

/// The full configuration of a training run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub network: NetworkConfig,
    pub learning_rate: f32,
    /// Epochs run by a single call to the trainer.
    pub epochs: usize,
    /// Global ceiling, once the epoch counter exceeds it the run halts for good.
    pub max_epochs: usize,
    pub stability: StabilityConfig,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            learning_rate: 0.001,
            epochs: 10_000,
            max_epochs: 10_000,
            stability: StabilityConfig::default(),
        }
    }
}

impl TrainingConfig {
    /// Reads a configuration from a json file, missing fields take their default value.
    ///
    /// # Errors
    /// An io error if the file can't be read, a parse error if it isn't valid json and an
    /// `InvalidConfig` if the values don't pass `TrainingConfig::validate`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Parses and validates a configuration from a json string.
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every value is usable.
    pub fn validate(&self) -> Result<()> {
        let net = &self.network;
        if net.input_size == 0 || net.hidden_size == 0 || net.output_size == 0 {
            return invalid("every layer needs at least one unit");
        }

        if !positive(net.init_range) {
            return invalid("init_range must be positive and finite");
        }

        if !positive(self.learning_rate) {
            return invalid("learning_rate must be positive and finite");
        }

        if self.epochs == 0 || self.max_epochs == 0 {
            return invalid("epochs and max_epochs must be at least 1");
        }

        let stability = &self.stability;
        if !positive(stability.divergence_threshold) {
            return invalid("divergence_threshold must be positive and finite");
        }

        for (name, decay) in [
            ("rollback_decay", stability.rollback_decay),
            ("worsen_decay", stability.worsen_decay),
        ] {
            if !(decay > 0. && decay <= 1.) {
                return Err(MlErr::InvalidConfig(format!("{name} must be in (0, 1]")));
            }
        }

        Ok(())
    }
}

fn positive(v: f32) -> bool {
    v.is_finite() && v > 0.
}

fn invalid(reason: &str) -> Result<()> {
    Err(MlErr::InvalidConfig(reason.to_string()))
}
