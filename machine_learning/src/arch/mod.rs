pub mod activations;
mod backprop;
mod dense;
pub mod loss;
mod network;

pub use backprop::{Backprop, Gradients, backprop};
pub use dense::Dense;
pub use network::{Dims, Forward, Network, NetworkParameters};
