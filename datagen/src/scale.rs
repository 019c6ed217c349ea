use machine_learning::inference::Normalization;

/// Maps `[-span, span]` onto `[-1, 1]` and back.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    span: f32,
}

impl LinearScale {
    /// Creates a new `LinearScale`, `span` must be a positive finite number.
    pub fn new(span: f32) -> Self {
        Self { span }
    }

    pub fn span(&self) -> f32 {
        self.span
    }
}

impl Normalization for LinearScale {
    fn normalize(&self, value: f32) -> f32 {
        value / self.span
    }

    fn denormalize(&self, value: f32) -> f32 {
        value * self.span
    }
}
