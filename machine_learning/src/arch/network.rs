use ndarray::{Array1, ArrayView1};
use parking_lot::{Mutex, RwLock};

use super::{Backprop, Dense, Gradients, activations::Relu, backprop};
use crate::{
    error::{MlErr, Result},
    initialization::ParamGen,
};

/// The widths of the three layers of the network.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dims {
    pub input: usize,
    pub hidden: usize,
    pub output: usize,
}

impl Dims {
    pub fn new(input: usize, hidden: usize, output: usize) -> Self {
        Self {
            input,
            hidden,
            output,
        }
    }

    /// The total amount of weights and biases of a network with these dimensions.
    pub fn param_count(&self) -> usize {
        (self.input + 1) * self.hidden + (self.hidden + 1) * self.output
    }
}

/// The values produced by a forward pass.
#[derive(Clone, Debug, PartialEq)]
pub struct Forward {
    pub hidden: Array1<f32>,
    pub output: Array1<f32>,
}

/// A full copy of the network's weights and biases.
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkParameters {
    pub hidden: Dense,
    pub output: Dense,
}

impl NetworkParameters {
    /// Creates a new `NetworkParameters` from its two blocks.
    ///
    /// # Errors
    /// A `SizeMismatch` if the output block doesn't consume the hidden block's width.
    pub fn new(hidden: Dense, output: Dense) -> Result<Self> {
        if output.inputs() != hidden.outputs() {
            return Err(MlErr::SizeMismatch {
                a: "output block inputs",
                b: "hidden block outputs",
                got: output.inputs(),
                expected: hidden.outputs(),
            });
        }

        Ok(Self { hidden, output })
    }

    /// Samples a new set of parameters, hidden block first.
    ///
    /// # Arguments
    /// * `dims` - The layer widths.
    /// * `param_gen` - The generator of the initial values.
    pub fn generate<G: ParamGen + ?Sized>(dims: Dims, param_gen: &mut G) -> Result<Self> {
        let hidden = Dense::generate(dims.input, dims.hidden, param_gen)?;
        let output = Dense::generate(dims.hidden, dims.output, param_gen)?;
        Ok(Self { hidden, output })
    }

    pub fn dims(&self) -> Dims {
        Dims::new(
            self.hidden.inputs(),
            self.hidden.outputs(),
            self.output.outputs(),
        )
    }

    /// Evaluates the network, `output = W2·ReLU(W1·x + b1) + b2`.
    ///
    /// # Errors
    /// A `SizeMismatch` if `x` isn't as wide as the input layer.
    pub fn forward(&self, x: ArrayView1<f32>) -> Result<Forward> {
        forward(&self.hidden, &self.output, x)
    }

    pub fn is_finite(&self) -> bool {
        self.hidden.is_finite() && self.output.is_finite()
    }
}

fn check_input(hidden: &Dense, x: ArrayView1<f32>) -> Result<()> {
    if x.len() != hidden.inputs() {
        return Err(MlErr::SizeMismatch {
            a: "input",
            b: "input layer",
            got: x.len(),
            expected: hidden.inputs(),
        });
    }

    Ok(())
}

pub(super) fn forward(hidden: &Dense, output: &Dense, x: ArrayView1<f32>) -> Result<Forward> {
    check_input(hidden, x)?;

    let relu = Relu::new();
    let hidden = hidden.forward(x).mapv_into(|z| relu.f(z));
    let output = output.forward(hidden.view());

    Ok(Forward { hidden, output })
}

/// The live state of a training run's network.
///
/// The hidden and output blocks sit behind their own reader/writer lock. Whenever both are
/// needed they are acquired hidden first, then output, and writers never hold one block's
/// lock while waiting for the other one.
#[derive(Debug)]
pub struct Network {
    dims: Dims,
    hidden: RwLock<Dense>,
    output: RwLock<Dense>,
    snapshot: Mutex<NetworkParameters>,
}

impl Network {
    /// Creates a new `Network`, its snapshot starts as a copy of `params`.
    pub fn new(params: NetworkParameters) -> Self {
        let dims = params.dims();

        Self {
            dims,
            hidden: RwLock::new(params.hidden.clone()),
            output: RwLock::new(params.output.clone()),
            snapshot: Mutex::new(params),
        }
    }

    pub fn dims(&self) -> Dims {
        self.dims
    }

    /// Evaluates the network on the current parameters, callable while training runs.
    ///
    /// # Errors
    /// A `SizeMismatch` if `x` isn't as wide as the input layer.
    pub fn forward(&self, x: ArrayView1<f32>) -> Result<Forward> {
        let hidden = self.hidden.read();
        let output = self.output.read();
        forward(&hidden, &output, x)
    }

    /// Computes the forward pass, loss and gradients of one sample on the current parameters.
    pub fn backprop(&self, x: ArrayView1<f32>, target: f32) -> Result<Backprop> {
        let hidden = self.hidden.read();
        let output = self.output.read();
        backprop(&hidden, &output, x, target)
    }

    /// Applies one gradient descent step, output block first.
    pub fn descend(&self, grads: &Gradients, learning_rate: f32) {
        self.output.write().descend(&grads.output, learning_rate);
        self.hidden.write().descend(&grads.hidden, learning_rate);
    }

    /// Copies the current parameters.
    pub fn params(&self) -> NetworkParameters {
        let hidden = self.hidden.read();
        let output = self.output.read();

        NetworkParameters {
            hidden: hidden.clone(),
            output: output.clone(),
        }
    }

    /// Overwrites the current parameters.
    ///
    /// # Errors
    /// A `SizeMismatch` if `params` has different dimensions than this network.
    pub fn set_params(&self, params: NetworkParameters) -> Result<()> {
        let dims = params.dims();
        if dims != self.dims {
            return Err(MlErr::SizeMismatch {
                a: "parameters",
                b: "network",
                got: dims.param_count(),
                expected: self.dims.param_count(),
            });
        }

        let mut hidden = self.hidden.write();
        let mut output = self.output.write();
        *hidden = params.hidden;
        *output = params.output;
        Ok(())
    }

    /// Saves the current parameters as the last known good state.
    pub fn store_snapshot(&self) {
        let params = self.params();
        *self.snapshot.lock() = params;
    }

    /// Replaces the current parameters with the last known good state.
    pub fn restore_snapshot(&self) {
        let snapshot = self.snapshot.lock().clone();
        let mut hidden = self.hidden.write();
        let mut output = self.output.write();
        *hidden = snapshot.hidden;
        *output = snapshot.output;
    }

    /// Copies the last known good state.
    pub fn snapshot(&self) -> NetworkParameters {
        self.snapshot.lock().clone()
    }
}
