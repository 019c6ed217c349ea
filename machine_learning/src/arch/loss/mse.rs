use ndarray::{Array1, ArrayView1};

/// Mean squared error loss function for a single sample against a scalar target.
#[derive(Default, Clone, Copy)]
pub struct Mse;

impl Mse {
    /// Returns a new `Mse`.
    pub fn new() -> Self {
        Self
    }

    /// Computes `Σ (y_pred - y)² / len`, the loss of one sample.
    pub fn loss(&self, y_pred: ArrayView1<f32>, y: f32) -> f32 {
        y_pred
            .mapv(|p| (p - y).powi(2))
            .mean()
            .unwrap_or_default()
    }

    /// Computes the output error `y_pred - y` that seeds backpropagation.
    pub fn error(&self, y_pred: ArrayView1<f32>, y: f32) -> Array1<f32> {
        y_pred.mapv(|p| p - y)
    }
}
