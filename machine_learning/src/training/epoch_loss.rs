use parking_lot::Mutex;

/// The sum of every sample's loss during one epoch, written by all the gradient workers.
#[derive(Debug, Default)]
pub struct EpochLoss(Mutex<f32>);

impl EpochLoss {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&self) {
        *self.0.lock() = 0.;
    }

    /// Adds a worker's partial loss into the total.
    pub fn add(&self, loss: f32) {
        *self.0.lock() += loss;
    }

    pub fn total(&self) -> f32 {
        *self.0.lock()
    }
}
