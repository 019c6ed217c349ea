use std::ops::Range;

use super::{EpochLoss, LearningRate};
use crate::{
    arch::Network,
    dataset::Dataset,
    error::{MlErr, Result},
};

/// Runs online gradient descent over one shard of the training set.
pub struct GradientWorker<'a> {
    network: &'a Network,
    learning_rate: &'a LearningRate,
    epoch_loss: &'a EpochLoss,
}

impl<'a> GradientWorker<'a> {
    /// Creates a new `GradientWorker`.
    ///
    /// # Arguments
    /// * `network` - The network whose parameters get updated.
    /// * `learning_rate` - The step size, read again for every sample.
    /// * `epoch_loss` - Where the shard's total loss gets added once it's done.
    pub fn new(
        network: &'a Network,
        learning_rate: &'a LearningRate,
        epoch_loss: &'a EpochLoss,
    ) -> Self {
        Self {
            network,
            learning_rate,
            epoch_loss,
        }
    }

    /// Updates the network once per sample in `range`, in order.
    ///
    /// # Arguments
    /// * `dataset` - The full training set.
    /// * `range` - The shard of `dataset` this worker owns.
    ///
    /// # Returns
    /// The sum of the shard's per sample losses, also added into the epoch loss.
    ///
    /// # Errors
    /// A `SizeMismatch` if `range` goes beyond the dataset or its features don't fit the network.
    pub fn run(&self, dataset: &Dataset, range: Range<usize>) -> Result<f32> {
        if range.end > dataset.len() {
            return Err(MlErr::SizeMismatch {
                a: "shard end",
                b: "dataset length",
                got: range.end,
                expected: dataset.len(),
            });
        }

        let mut loss = 0.;
        for i in range {
            let (x, y) = dataset.sample(i);
            let bp = self.network.backprop(x, y)?;
            self.network.descend(&bp.grads, self.learning_rate.get());
            loss += bp.loss;
        }

        self.epoch_loss.add(loss);
        Ok(loss)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;
    use crate::arch::{Dense, NetworkParameters};

    fn single_unit() -> Network {
        let hidden = Dense::new(array![[2.]], array![0.]).unwrap();
        let output = Dense::new(array![[1.]], array![0.]).unwrap();
        Network::new(NetworkParameters::new(hidden, output).unwrap())
    }

    fn assert_close(got: f32, expected: f32) {
        assert!((got - expected).abs() < 1e-5, "got {got}, expected {expected}");
    }

    #[test]
    fn updates_after_every_sample() {
        let network = single_unit();
        let lr = LearningRate::new(0.1);
        let epoch_loss = EpochLoss::new();
        let dataset = Dataset::from_rows(vec![(vec![1.], 0.)]).unwrap();

        let worker = GradientWorker::new(&network, &lr, &epoch_loss);
        let loss = worker.run(&dataset, 0..1).unwrap();

        assert_eq!(loss, 4.);
        assert_eq!(epoch_loss.total(), 4.);

        let params = network.params();
        assert_close(params.output.weights()[[0, 0]], 0.6);
        assert_close(params.output.biases()[0], -0.2);
        assert_close(params.hidden.weights()[[0, 0]], 1.8);
        assert_close(params.hidden.biases()[0], -0.2);
    }

    #[test]
    fn second_sample_sees_the_first_update() {
        let network = single_unit();
        let lr = LearningRate::new(0.1);
        let epoch_loss = EpochLoss::new();
        let dataset = Dataset::from_rows(vec![(vec![1.], 0.), (vec![1.], 0.)]).unwrap();

        let loss = GradientWorker::new(&network, &lr, &epoch_loss)
            .run(&dataset, 0..2)
            .unwrap();

        // second output: 0.6 * (1.8 - 0.2) - 0.2 = 0.76
        assert_close(loss, 4. + 0.76 * 0.76);
    }

    #[test]
    fn empty_shard_adds_nothing() {
        let network = single_unit();
        let lr = LearningRate::new(0.1);
        let epoch_loss = EpochLoss::new();
        let dataset = Dataset::from_rows(vec![(vec![1.], 0.)]).unwrap();

        let loss = GradientWorker::new(&network, &lr, &epoch_loss)
            .run(&dataset, 0..0)
            .unwrap();

        assert_eq!(loss, 0.);
        assert_eq!(network.params(), network.snapshot());
    }

    #[test]
    fn rejects_out_of_bounds_shards() {
        let network = single_unit();
        let lr = LearningRate::new(0.1);
        let epoch_loss = EpochLoss::new();
        let dataset = Dataset::from_rows(vec![(vec![1.], 0.)]).unwrap();

        let worker = GradientWorker::new(&network, &lr, &epoch_loss);
        assert!(worker.run(&dataset, 0..2).is_err());
    }
}
