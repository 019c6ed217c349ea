use log::debug;
use machine_learning::{dataset::Dataset, inference::Normalization};
use ndarray::{Array1, Array2, ArrayView1};

use crate::{
    config::GeneratorConfig,
    error::{DataErr, Result},
};

/// The width of every generated feature vector, `[A, sin, B, cos]`.
pub const FEATURES: usize = 4;

/// The position at which an oscillation of the given magnitude fades below the threshold,
/// `-2 / damping · ln(threshold / magnitude)`.
pub fn fade_out_horizon(config: &GeneratorConfig, magnitude: f32) -> f32 {
    -2. / config.damping * (config.threshold / magnitude).ln()
}

/// Samples the damped oscillations of every integer amplitude pair on the grid.
///
/// Pairs are visited with `A` as the outer loop and `B` as the inner one, `(0, 0)` is
/// skipped. Every pair contributes `config.samples_per_pair()` consecutive samples whose
/// features are `[A, e^(-d·x)·sin(f·x), B, e^(-d·x)·cos(f·x)]` and whose target is the
/// pair's fade out horizon. Amplitudes and targets are normalized.
///
/// # Errors
/// An `InvalidConfig` if `config` doesn't validate.
pub fn generate_training_data(config: &GeneratorConfig) -> Result<Dataset> {
    config.validate()?;

    let amplitude = config.amplitude_scale();
    let horizon = config.horizon_scale();
    let limit = config.amplitude_limit;
    let steps = config.samples_per_pair();

    let capacity = config.pair_count() * steps;
    let mut x = Vec::with_capacity(capacity * FEATURES);
    let mut y = Vec::with_capacity(capacity);

    for a in -limit..=limit {
        for b in -limit..=limit {
            let magnitude = ((a * a + b * b) as f32).sqrt();
            if magnitude == 0. {
                continue;
            }

            let target = horizon.normalize(fade_out_horizon(config, magnitude));
            let norm_a = amplitude.normalize(a as f32);
            let norm_b = amplitude.normalize(b as f32);

            for i in 0..steps {
                let t = i as f32 * config.step;
                let decay = (-config.damping * t).exp();
                let phase = config.frequency * t;

                x.extend([norm_a, decay * phase.sin(), norm_b, decay * phase.cos()]);
                y.push(target);
            }
        }
    }

    let x = Array2::from_shape_vec((y.len(), FEATURES), x)
        .map_err(|e| DataErr::InvalidConfig(e.to_string()))?;

    debug!(samples = y.len(), pairs = config.pair_count(); "generated training data");
    Ok(Dataset::new(x, Array1::from_vec(y))?)
}

/// Builds the probe points of an undamped oscillation with the given amplitudes.
///
/// # Arguments
/// * `a` - The first amplitude, in physical units.
/// * `b` - The second amplitude, in physical units.
/// * `config` - The generator configuration.
///
/// # Returns
/// One `[A, sin x, B, cos x]` row per `x = i · probe_step` up to `x_max`.
///
/// # Errors
/// An `InvalidAmplitude` if `a` or `b` isn't finite.
pub fn probe_points(a: f32, b: f32, config: &GeneratorConfig) -> Result<Array2<f32>> {
    for v in [a, b] {
        if !v.is_finite() {
            return Err(DataErr::InvalidAmplitude(v));
        }
    }

    config.validate()?;

    let amplitude = config.amplitude_scale();
    let (norm_a, norm_b) = (amplitude.normalize(a), amplitude.normalize(b));
    let count = (config.x_max / config.probe_step) as usize + 1;

    Ok(Array2::from_shape_fn((count, FEATURES), |(i, j)| {
        let x = i as f32 * config.probe_step;
        match j {
            0 => norm_a,
            1 => x.sin(),
            2 => norm_b,
            _ => x.cos(),
        }
    }))
}

/// The input of the heatmap cell at normalized amplitudes `(a, b)`.
pub fn grid_point(a: f32, b: f32) -> [f32; FEATURES] {
    let norm = (a * a + b * b).sqrt();
    [a, norm.sin(), b, norm.cos()]
}

/// The plotted signal of a feature row, `A·sin + B·cos`.
pub fn envelope_signal(features: ArrayView1<f32>) -> f32 {
    features[0] * features[1] + features[2] * features[3]
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn horizon_of_a_unit_magnitude_is_zero() {
        let config = GeneratorConfig::default();
        assert_eq!(fade_out_horizon(&config, 1.), 0.);

        let h = fade_out_horizon(&config, 50f32.sqrt());
        assert!((h - 4. * 50f32.sqrt().ln()).abs() < 1e-4);
    }

    #[test]
    fn probe_points_follow_the_unit_circle() {
        let config = GeneratorConfig::default();
        let probes = probe_points(2.5, -5., &config).unwrap();

        assert_eq!(probes.dim(), (126, FEATURES));
        assert_eq!(probes.row(0), array![0.5, 0., -1., 1.]);

        let x = 10. * 0.1f32;
        assert!((probes[[10, 1]] - x.sin()).abs() < 1e-6);
        assert!((probes[[10, 3]] - x.cos()).abs() < 1e-6);
    }

    #[test]
    fn rejects_non_finite_amplitudes() {
        let config = GeneratorConfig::default();

        assert!(matches!(
            probe_points(f32::NAN, 1., &config),
            Err(DataErr::InvalidAmplitude(_))
        ));
        assert!(probe_points(1., f32::INFINITY, &config).is_err());
    }

    #[test]
    fn envelope_signal_mixes_both_components() {
        let signal = envelope_signal(array![0.5, 0.2, -1., 0.4].view());
        assert!((signal + 0.3).abs() < 1e-6);
    }

    #[test]
    fn grid_origin() {
        assert_eq!(grid_point(0., 0.), [0., 0., 0., 1.]);
    }
}
