use std::sync::Arc;

use log::info;
use rand::{SeedableRng, rngs::StdRng};

use super::{EpochTrainer, TrainingRun};
use crate::{
    arch::{Network, NetworkParameters},
    config::TrainingConfig,
    error::Result,
    initialization::RandParamGen,
};

/// Builds `EpochTrainer`s given a configuration.
#[derive(Default)]
pub struct TrainerBuilder;

impl TrainerBuilder {
    /// Creates a new `TrainerBuilder`.
    pub fn new() -> Self {
        Self
    }

    /// Builds a new `EpochTrainer` over freshly initialized parameters.
    ///
    /// # Arguments
    /// * `config` - The configuration of the run.
    ///
    /// # Errors
    /// An `InvalidConfig` if the configuration doesn't validate, an `InvalidInit` if the
    /// parameters can't be sampled and a `ThreadPool` error if the workers can't be spawned.
    pub fn build(&self, config: &TrainingConfig) -> Result<EpochTrainer> {
        config.validate()?;

        let params = self.generate_params(config)?;
        self.build_with(params, config)
    }

    /// Builds a new `EpochTrainer` starting from the given parameters.
    ///
    /// # Arguments
    /// * `params` - The initial parameters, also the initial snapshot.
    /// * `config` - The configuration of the run, its network section is ignored.
    pub fn build_with(
        &self,
        params: NetworkParameters,
        config: &TrainingConfig,
    ) -> Result<EpochTrainer> {
        let dims = params.dims();
        info!(
            input = dims.input,
            hidden = dims.hidden,
            output = dims.output,
            lr = config.learning_rate,
            max_epochs = config.max_epochs;
            "building trainer"
        );

        let network = Network::new(params);
        let run = TrainingRun::new(network, config.learning_rate, config.max_epochs);
        EpochTrainer::new(Arc::new(run), config.stability.clone())
    }

    /// Samples the initial parameters uniformly from `[-init_range, init_range)`.
    pub fn generate_params(&self, config: &TrainingConfig) -> Result<NetworkParameters> {
        let net = &config.network;
        let dims = net.dims();
        let rng = self.generate_rng(net.seed);

        let mut param_gen = RandParamGen::symmetric(rng, dims.param_count(), net.init_range)?;
        NetworkParameters::generate(dims, &mut param_gen)
    }

    fn generate_rng(&self, seed: Option<u64>) -> StdRng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::Dims;

    fn seeded(seed: u64) -> TrainingConfig {
        let mut config = TrainingConfig::default();
        config.network.seed = Some(seed);
        config
    }

    #[test]
    fn initial_parameters_stay_in_range() {
        let params = TrainerBuilder::new().generate_params(&seeded(1)).unwrap();

        assert_eq!(params.dims(), Dims::new(4, 15, 1));
        let values = params
            .hidden
            .weights()
            .iter()
            .chain(params.hidden.biases())
            .chain(params.output.weights())
            .chain(params.output.biases())
            .copied()
            .collect::<Vec<_>>();

        assert_eq!(values.len(), Dims::new(4, 15, 1).param_count());
        assert!(values.iter().all(|v| (-0.5..0.5).contains(v)));
    }

    #[test]
    fn same_seed_same_parameters() {
        let builder = TrainerBuilder::new();

        let a = builder.generate_params(&seeded(7)).unwrap();
        let b = builder.generate_params(&seeded(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn snapshot_starts_as_the_initial_parameters() {
        let trainer = TrainerBuilder::new().build(&seeded(3)).unwrap();
        let network = trainer.run().network();

        assert_eq!(network.params(), network.snapshot());
        assert_eq!(trainer.run().learning_rate().get(), 0.001);
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let mut config = seeded(3);
        config.learning_rate = 0.;

        assert!(TrainerBuilder::new().build(&config).is_err());
    }
}
