use ndarray::ArrayView2;

use crate::{
    arch::Network,
    error::{MlErr, Result},
};

/// A pair of inverse mappings between physical units and the network's representation.
pub trait Normalization {
    fn normalize(&self, value: f32) -> f32;

    fn denormalize(&self, value: f32) -> f32;
}

/// Averages the first output unit of the network over a batch of probe points.
///
/// # Arguments
/// * `network` - The network to evaluate, it may be training at the same time.
/// * `probes` - One probe point per row.
///
/// # Errors
/// An `EmptyInput` if there are no probe points and a `SizeMismatch` if their width doesn't
/// match the network's input layer.
pub fn mean_output(network: &Network, probes: ArrayView2<f32>) -> Result<f32> {
    if probes.nrows() == 0 {
        return Err(MlErr::EmptyInput("probe set"));
    }

    let mut total = 0.;
    for probe in probes.rows() {
        let forward = network.forward(probe)?;
        total += forward.output[0];
    }

    Ok(total / probes.nrows() as f32)
}

/// Predicts a value in physical units, the mean output over `probes` mapped through
/// `normalization.denormalize`.
pub fn predict<N>(network: &Network, probes: ArrayView2<f32>, normalization: &N) -> Result<f32>
where
    N: Normalization + ?Sized,
{
    let mean = mean_output(network, probes)?;
    Ok(normalization.denormalize(mean))
}

#[cfg(test)]
mod tests {
    use ndarray::{Array2, array};

    use super::*;
    use crate::arch::{Dense, NetworkParameters};

    struct Scale(f32);

    impl Normalization for Scale {
        fn normalize(&self, value: f32) -> f32 {
            value / self.0
        }

        fn denormalize(&self, value: f32) -> f32 {
            value * self.0
        }
    }

    /// `output = relu(x0) + 1`
    fn network() -> Network {
        let hidden = Dense::new(array![[1., 0.]], array![0.]).unwrap();
        let output = Dense::new(array![[1.]], array![1.]).unwrap();
        Network::new(NetworkParameters::new(hidden, output).unwrap())
    }

    #[test]
    fn averages_the_outputs() {
        let probes = array![[1., 9.], [2., 9.], [3., 9.], [-4., 9.]];

        // outputs: 2, 3, 4, 1
        assert_eq!(mean_output(&network(), probes.view()).unwrap(), 2.5);
    }

    #[test]
    fn denormalizes_the_mean() {
        let probes = array![[1., 0.], [3., 0.]];
        let prediction = predict(&network(), probes.view(), &Scale(10.)).unwrap();

        assert_eq!(prediction, 30.);
    }

    #[test]
    fn empty_probe_set_is_an_error() {
        let probes = Array2::<f32>::zeros((0, 2));
        let err = mean_output(&network(), probes.view()).unwrap_err();

        assert!(matches!(err, MlErr::EmptyInput(_)));
    }

    #[test]
    fn mismatched_probe_width_is_an_error() {
        let probes = Array2::<f32>::zeros((3, 5));
        let err = predict(&network(), probes.view(), &Scale(1.)).unwrap_err();

        assert!(matches!(err, MlErr::SizeMismatch { got: 5, expected: 2, .. }));
    }
}
