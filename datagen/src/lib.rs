pub mod config;
pub mod error;
pub mod generator;
pub mod scale;

pub use config::GeneratorConfig;
pub use error::{DataErr, Result};
pub use generator::{envelope_signal, generate_training_data, probe_points};
pub use scale::LinearScale;
