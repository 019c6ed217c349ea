pub mod arch;
pub mod config;
pub mod dataset;
pub mod error;
pub mod inference;
pub mod initialization;
pub mod training;

pub use error::{MlErr, Result};
