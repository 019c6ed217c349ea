use ndarray::prelude::*;

use crate::{
    error::{MlErr, Result},
    initialization::ParamGen,
};

/// A fully connected block of parameters, `y = W·x + b`.
///
/// The weights have shape `(outputs, inputs)`, the biases have `outputs` entries.
/// The same type carries the gradient of a block, so the update is a plain scaled add.
#[derive(Clone, Debug, PartialEq)]
pub struct Dense {
    weights: Array2<f32>,
    biases: Array1<f32>,
}

impl Dense {
    /// Creates a new `Dense` from its raw weights and biases.
    ///
    /// # Arguments
    /// * `weights` - The `(outputs, inputs)` weight matrix.
    /// * `biases` - The bias vector, one per output.
    ///
    /// # Errors
    /// A `SizeMismatch` if the amount of biases doesn't match the rows of `weights`.
    pub fn new(weights: Array2<f32>, biases: Array1<f32>) -> Result<Self> {
        if biases.len() != weights.nrows() {
            return Err(MlErr::SizeMismatch {
                a: "biases",
                b: "weight rows",
                got: biases.len(),
                expected: weights.nrows(),
            });
        }

        Ok(Self { weights, biases })
    }

    /// Creates a new `Dense` filled with zeros.
    pub fn zeros(inputs: usize, outputs: usize) -> Self {
        Self {
            weights: Array2::zeros((outputs, inputs)),
            biases: Array1::zeros(outputs),
        }
    }

    /// Creates a new `Dense` sampling its weights first and its biases after.
    ///
    /// # Arguments
    /// * `inputs` - The width of the input vector.
    /// * `outputs` - The width of the output vector.
    /// * `param_gen` - The generator of the initial values.
    ///
    /// # Errors
    /// An `InvalidInit` if the generator runs out of values.
    pub fn generate<G: ParamGen + ?Sized>(
        inputs: usize,
        outputs: usize,
        param_gen: &mut G,
    ) -> Result<Self> {
        let weights = Self::draw(param_gen, inputs * outputs)?;
        let biases = Self::draw(param_gen, outputs)?;

        let weights = Array2::from_shape_vec((outputs, inputs), weights)
            .map_err(|e| MlErr::InvalidInit(e.to_string()))?;

        Ok(Self {
            weights,
            biases: Array1::from_vec(biases),
        })
    }

    fn draw<G: ParamGen + ?Sized>(param_gen: &mut G, n: usize) -> Result<Vec<f32>> {
        if n == 0 {
            return Ok(Vec::new());
        }

        match param_gen.sample(n) {
            Some(values) if values.len() == n => Ok(values),
            Some(values) => Err(MlErr::InvalidInit(format!(
                "the generator produced {} of the {n} requested values",
                values.len()
            ))),
            None => Err(MlErr::InvalidInit("the generator is exhausted".into())),
        }
    }

    pub fn inputs(&self) -> usize {
        self.weights.ncols()
    }

    pub fn outputs(&self) -> usize {
        self.weights.nrows()
    }

    pub fn weights(&self) -> ArrayView2<'_, f32> {
        self.weights.view()
    }

    pub fn biases(&self) -> ArrayView1<'_, f32> {
        self.biases.view()
    }

    /// Computes `W·x + b`.
    ///
    /// `x` must have `self.inputs()` entries, callers validate it.
    pub fn forward(&self, x: ArrayView1<f32>) -> Array1<f32> {
        self.weights.dot(&x) + &self.biases
    }

    /// Carries an output delta back to the input side, `Wᵀ·d`.
    pub fn propagate(&self, d: ArrayView1<f32>) -> Array1<f32> {
        self.weights.t().dot(&d)
    }

    /// Builds the gradient of this block given its input and output delta.
    ///
    /// # Arguments
    /// * `x` - The input the block was evaluated with.
    /// * `d` - The delta at the block's output.
    ///
    /// # Returns
    /// A `Dense` shaped like `self` holding `d ⊗ x` and `d`.
    pub fn gradient(x: ArrayView1<f32>, d: ArrayView1<f32>) -> Self {
        let weights = d.insert_axis(Axis(1)).dot(&x.insert_axis(Axis(0)));

        Self {
            weights,
            biases: d.to_owned(),
        }
    }

    /// Takes a gradient descent step, `p -= lr * g` for every parameter.
    pub fn descend(&mut self, grad: &Dense, learning_rate: f32) {
        self.weights.scaled_add(-learning_rate, &grad.weights);
        self.biases.scaled_add(-learning_rate, &grad.biases);
    }

    /// Whether every weight and bias is a finite number.
    pub fn is_finite(&self) -> bool {
        self.weights.iter().chain(self.biases.iter()).all(|p| p.is_finite())
    }
}
