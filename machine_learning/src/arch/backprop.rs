use ndarray::{Array1, ArrayView1};

use super::{
    Dense, Forward,
    activations::Relu,
    loss::Mse,
    network::forward,
};
use crate::error::Result;

/// The gradients of both parameter blocks for one sample.
#[derive(Clone, Debug, PartialEq)]
pub struct Gradients {
    pub hidden: Dense,
    pub output: Dense,
}

/// Everything one backward pass produces.
#[derive(Clone, Debug)]
pub struct Backprop {
    pub forward: Forward,
    /// `output - target`, per output unit.
    pub error: Array1<f32>,
    /// `Σ error² / output_size`.
    pub loss: f32,
    pub grads: Gradients,
}

/// Runs the forward and backward pass of one sample.
///
/// # Arguments
/// * `hidden` - The hidden block's parameters.
/// * `output` - The output block's parameters.
/// * `x` - The sample's features.
/// * `target` - The sample's target, compared against every output unit.
///
/// # Errors
/// A `SizeMismatch` if `x` isn't as wide as the input layer.
pub fn backprop(
    hidden: &Dense,
    output: &Dense,
    x: ArrayView1<f32>,
    target: f32,
) -> Result<Backprop> {
    let fwd = forward(hidden, output, x)?;
    let mse = Mse::new();
    let error = mse.error(fwd.output.view(), target);
    let loss = mse.loss(fwd.output.view(), target);

    let output_grad = Dense::gradient(fwd.hidden.view(), error.view());

    let relu = Relu::new();
    let mut delta = output.propagate(error.view());
    delta.zip_mut_with(&fwd.hidden, |d, &h| *d *= relu.df(h));
    let hidden_grad = Dense::gradient(x, delta.view());

    Ok(Backprop {
        forward: fwd,
        error,
        loss,
        grads: Gradients {
            hidden: hidden_grad,
            output: output_grad,
        },
    })
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    fn assert_close(got: f32, expected: f32) {
        assert!((got - expected).abs() < 1e-6, "got {got}, expected {expected}");
    }

    #[test]
    fn single_unit_gradients() {
        let hidden = Dense::new(array![[2.]], array![0.]).unwrap();
        let output = Dense::new(array![[1.]], array![0.]).unwrap();

        let bp = backprop(&hidden, &output, array![1.].view(), 0.).unwrap();

        assert_eq!(bp.forward.hidden, array![2.]);
        assert_eq!(bp.forward.output, array![2.]);
        assert_eq!(bp.error, array![2.]);
        assert_eq!(bp.loss, 4.);
        assert_eq!(bp.grads.output.weights(), array![[4.]]);
        assert_eq!(bp.grads.output.biases(), array![2.]);
        assert_eq!(bp.grads.hidden.weights(), array![[2.]]);
        assert_eq!(bp.grads.hidden.biases(), array![2.]);
    }

    #[test]
    fn single_unit_update() {
        let mut hidden = Dense::new(array![[2.]], array![0.]).unwrap();
        let mut output = Dense::new(array![[1.]], array![0.]).unwrap();

        let bp = backprop(&hidden, &output, array![1.].view(), 0.).unwrap();
        output.descend(&bp.grads.output, 0.1);
        hidden.descend(&bp.grads.hidden, 0.1);

        assert_close(output.weights()[[0, 0]], 0.6);
        assert_close(output.biases()[0], -0.2);
        assert_close(hidden.weights()[[0, 0]], 1.8);
        assert_close(hidden.biases()[0], -0.2);
    }

    #[test]
    fn inactive_hidden_units_get_no_gradient() {
        let hidden = Dense::new(array![[1.], [-1.]], array![0., 0.]).unwrap();
        let output = Dense::new(array![[1., 1.]], array![0.]).unwrap();

        let bp = backprop(&hidden, &output, array![1.].view(), 0.).unwrap();

        assert_eq!(bp.forward.hidden, array![1., 0.]);
        assert_eq!(bp.grads.hidden.weights(), array![[1.], [0.]]);
        assert_eq!(bp.grads.hidden.biases(), array![1., 0.]);
    }

    #[test]
    fn loss_averages_over_outputs() {
        let hidden = Dense::new(array![[1.]], array![0.]).unwrap();
        let output = Dense::new(array![[1.], [3.]], array![0., 0.]).unwrap();

        let bp = backprop(&hidden, &output, array![1.].view(), 1.).unwrap();

        // errors [0, 2]
        assert_close(bp.loss, 2.);
        assert_eq!(bp.grads.hidden.biases(), array![6.]);
    }
}
