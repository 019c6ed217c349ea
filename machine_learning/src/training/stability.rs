use log::{debug, warn};

use super::LearningRate;
use crate::{arch::Network, config::StabilityConfig};

/// The decision taken after an epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The loss blew up, parameters were rolled back and the learning rate decayed.
    Diverged,
    /// The loss didn't get worse, the parameters became the new snapshot.
    Improved,
    /// The loss got worse but stayed finite, only the learning rate decayed.
    Worsened,
}

/// Watches the epoch loss and keeps the run numerically stable.
#[derive(Debug)]
pub struct StabilityController {
    config: StabilityConfig,
    previous_loss: f32,
    best_loss: Option<f32>,
}

impl StabilityController {
    /// Creates a new `StabilityController`, any first finite loss counts as an improvement.
    pub fn new(config: StabilityConfig) -> Self {
        Self {
            config,
            previous_loss: f32::MAX,
            best_loss: None,
        }
    }

    /// The last loss that wasn't a divergence.
    pub fn previous_loss(&self) -> f32 {
        self.previous_loss
    }

    /// The lowest loss accepted as an improvement, `None` until one is.
    pub fn best_loss(&self) -> Option<f32> {
        self.best_loss
    }

    /// Classifies `loss` against the previous epoch without acting on it.
    pub fn classify(&self, loss: f32) -> Outcome {
        if loss.is_nan() || loss > self.config.divergence_threshold {
            Outcome::Diverged
        } else if loss <= self.previous_loss {
            Outcome::Improved
        } else {
            Outcome::Worsened
        }
    }

    /// Acts on an epoch's aggregated loss.
    ///
    /// # Arguments
    /// * `loss` - The epoch loss, evaluated once every worker joined.
    /// * `network` - The network to snapshot or roll back.
    /// * `learning_rate` - The learning rate to decay.
    ///
    /// # Returns
    /// The decision that was taken.
    pub fn evaluate(
        &mut self,
        loss: f32,
        network: &Network,
        learning_rate: &LearningRate,
    ) -> Outcome {
        let outcome = self.classify(loss);

        match outcome {
            Outcome::Diverged => {
                network.restore_snapshot();
                let lr = learning_rate.scale(self.config.rollback_decay);
                warn!(loss = loss, lr = lr; "loss diverged, rolled back to the last snapshot");
            }
            Outcome::Improved => {
                network.store_snapshot();
                self.previous_loss = loss;
                self.best_loss = Some(self.best_loss.map_or(loss, |best| best.min(loss)));
            }
            Outcome::Worsened => {
                let lr = learning_rate.scale(self.config.worsen_decay);
                debug!(
                    loss = loss,
                    previous = self.previous_loss,
                    lr = lr;
                    "loss got worse, decaying learning rate"
                );
                self.previous_loss = loss;
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;
    use crate::arch::{Dense, NetworkParameters};

    fn params(w: f32) -> NetworkParameters {
        let hidden = Dense::new(array![[w]], array![0.]).unwrap();
        let output = Dense::new(array![[1.]], array![0.]).unwrap();
        NetworkParameters::new(hidden, output).unwrap()
    }

    fn controller() -> StabilityController {
        StabilityController::new(StabilityConfig::default())
    }

    #[test]
    fn first_finite_loss_improves() {
        let controller = controller();

        assert_eq!(controller.previous_loss(), f32::MAX);
        assert_eq!(controller.classify(1e9), Outcome::Improved);
    }

    #[test]
    fn classification() {
        let mut controller = controller();
        controller.previous_loss = 10.;

        assert_eq!(controller.classify(f32::NAN), Outcome::Diverged);
        assert_eq!(controller.classify(f32::INFINITY), Outcome::Diverged);
        assert_eq!(controller.classify(1e11), Outcome::Diverged);
        assert_eq!(controller.classify(10.), Outcome::Improved);
        assert_eq!(controller.classify(9.), Outcome::Improved);
        assert_eq!(controller.classify(10.5), Outcome::Worsened);
    }

    #[test]
    fn divergence_rolls_back_and_decays() {
        let mut controller = controller();
        let network = Network::new(params(1.));
        let lr = LearningRate::new(0.1);

        network.set_params(params(f32::NAN)).unwrap();
        let outcome = controller.evaluate(f32::NAN, &network, &lr);

        assert_eq!(outcome, Outcome::Diverged);
        assert_eq!(network.params(), params(1.));
        assert_eq!(network.snapshot(), params(1.));
        assert_eq!(lr.get(), 0.1 * 0.9);
        assert_eq!(controller.previous_loss(), f32::MAX);
    }

    #[test]
    fn improvement_takes_a_snapshot() {
        let mut controller = controller();
        let network = Network::new(params(1.));
        let lr = LearningRate::new(0.1);

        network.set_params(params(2.)).unwrap();
        let outcome = controller.evaluate(5., &network, &lr);

        assert_eq!(outcome, Outcome::Improved);
        assert_eq!(network.snapshot(), params(2.));
        assert_eq!(lr.get(), 0.1);
        assert_eq!(controller.previous_loss(), 5.);
    }

    #[test]
    fn worsening_only_decays() {
        let mut controller = controller();
        let network = Network::new(params(1.));
        let lr = LearningRate::new(0.1);
        controller.evaluate(5., &network, &lr);

        network.set_params(params(3.)).unwrap();
        let outcome = controller.evaluate(6., &network, &lr);

        assert_eq!(outcome, Outcome::Worsened);
        assert_eq!(network.params(), params(3.));
        assert_eq!(network.snapshot(), params(1.));
        assert_eq!(lr.get(), 0.1 * 0.95);
        assert_eq!(controller.previous_loss(), 6.);
        assert_eq!(controller.best_loss(), Some(5.));
    }

    #[test]
    fn best_loss_only_follows_improvements() {
        let mut controller = controller();
        let network = Network::new(params(1.));
        let lr = LearningRate::new(0.1);
        assert_eq!(controller.best_loss(), None);

        controller.evaluate(f32::NAN, &network, &lr);
        assert_eq!(controller.best_loss(), None);

        controller.evaluate(5., &network, &lr);
        controller.evaluate(8., &network, &lr);
        controller.evaluate(7., &network, &lr);
        assert_eq!(controller.best_loss(), Some(5.));

        controller.evaluate(3., &network, &lr);
        assert_eq!(controller.best_loss(), Some(3.));
    }

    #[test]
    fn equal_loss_counts_as_improvement() {
        let mut controller = controller();
        let network = Network::new(params(1.));
        let lr = LearningRate::new(0.1);
        controller.evaluate(5., &network, &lr);

        network.set_params(params(4.)).unwrap();
        assert_eq!(controller.evaluate(5., &network, &lr), Outcome::Improved);
        assert_eq!(network.snapshot(), params(4.));
    }
}
