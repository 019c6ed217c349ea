use std::{f32::consts::PI, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    error::{DataErr, Result},
    scale::LinearScale,
};

/// The shape of the damped oscillations the network learns from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Amplitudes range over the integers in `[-amplitude_limit, amplitude_limit]`.
    pub amplitude_limit: i32,
    pub damping: f32,
    pub frequency: f32,
    /// Distance between two consecutive training samples of the same oscillation.
    pub step: f32,
    /// Length of every sampled oscillation, also the span of the horizon scale.
    pub x_max: f32,
    /// The envelope value at which an oscillation counts as faded out.
    pub threshold: f32,
    /// Distance between two consecutive probe points.
    pub probe_step: f32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            amplitude_limit: 5,
            damping: 0.5,
            frequency: 10.,
            step: 0.05,
            x_max: 4. * PI,
            threshold: 1.,
            probe_step: 0.1,
        }
    }
}

impl GeneratorConfig {
    /// Reads a configuration from a json file, missing fields take their default value.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every value is usable.
    pub fn validate(&self) -> Result<()> {
        if self.amplitude_limit <= 0 {
            return Err(DataErr::InvalidConfig(
                "amplitude_limit must be at least 1".into(),
            ));
        }

        for (name, value) in [
            ("damping", self.damping),
            ("step", self.step),
            ("x_max", self.x_max),
            ("threshold", self.threshold),
            ("probe_step", self.probe_step),
        ] {
            if !(value.is_finite() && value > 0.) {
                return Err(DataErr::InvalidConfig(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }

        if !self.frequency.is_finite() {
            return Err(DataErr::InvalidConfig("frequency must be finite".into()));
        }

        Ok(())
    }

    /// The scale of the `A` and `B` features.
    pub fn amplitude_scale(&self) -> LinearScale {
        LinearScale::new(self.amplitude_limit as f32)
    }

    /// The scale of the targets and predictions.
    pub fn horizon_scale(&self) -> LinearScale {
        LinearScale::new(self.x_max)
    }

    /// The amount of samples generated for each amplitude pair.
    pub fn samples_per_pair(&self) -> usize {
        (self.x_max / self.step) as usize + 1
    }

    /// The amount of amplitude pairs, `(0, 0)` excluded.
    pub fn pair_count(&self) -> usize {
        let side = 2 * self.amplitude_limit.max(0) as usize + 1;
        side * side - 1
    }
}
