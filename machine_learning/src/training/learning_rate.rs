use std::sync::atomic::{AtomicU32, Ordering};

/// A learning rate shared between the trainer and whoever tunes it while training runs.
///
/// The value lives in an atomic as the raw bits of an `f32`, so multiplicative updates from
/// different threads compose without losing any of them.
#[derive(Debug)]
pub struct LearningRate(AtomicU32);

impl LearningRate {
    pub fn new(learning_rate: f32) -> Self {
        Self(AtomicU32::new(learning_rate.to_bits()))
    }

    pub fn get(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Acquire))
    }

    pub fn set(&self, learning_rate: f32) {
        self.0.store(learning_rate.to_bits(), Ordering::Release);
    }

    /// Atomically multiplies the learning rate by `factor`.
    ///
    /// # Returns
    /// The updated learning rate.
    pub fn scale(&self, factor: f32) -> f32 {
        let scaled = |bits| (f32::from_bits(bits) * factor).to_bits();

        let prev = self
            .0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| Some(scaled(bits)))
            .unwrap_or_else(|bits| bits);

        f32::from_bits(scaled(prev))
    }
}
