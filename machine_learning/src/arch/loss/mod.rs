mod mse;

pub use mse::Mse;
