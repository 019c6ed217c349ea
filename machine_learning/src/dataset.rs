use std::ops::Range;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, s};

use crate::error::{MlErr, Result};

/// An ordered set of training samples, one row of features per scalar target.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    x: Array2<f32>,
    y: Array1<f32>,
}

impl Dataset {
    /// Creates a new `Dataset`.
    ///
    /// # Arguments
    /// * `x` - The `(samples, features)` matrix.
    /// * `y` - The targets, one per row of `x`.
    ///
    /// # Errors
    /// An `EmptyInput` if there are no samples or features and a `SizeMismatch` if the
    /// amount of targets differs from the amount of rows.
    pub fn new(x: Array2<f32>, y: Array1<f32>) -> Result<Self> {
        if x.nrows() == 0 {
            return Err(MlErr::EmptyInput("training set"));
        }

        if x.ncols() == 0 {
            return Err(MlErr::EmptyInput("feature vector"));
        }

        if x.nrows() != y.len() {
            return Err(MlErr::SizeMismatch {
                a: "targets",
                b: "samples",
                got: y.len(),
                expected: x.nrows(),
            });
        }

        Ok(Self { x, y })
    }

    /// Creates a new `Dataset` from a list of `(features, target)` pairs.
    ///
    /// # Errors
    /// The same as `Dataset::new` plus a `SizeMismatch` if the rows have different widths.
    pub fn from_rows<I>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Vec<f32>, f32)>,
    {
        let mut width = None;
        let mut data = Vec::new();
        let mut y = Vec::new();

        for (features, target) in rows {
            let expected = *width.get_or_insert(features.len());
            if features.len() != expected {
                return Err(MlErr::SizeMismatch {
                    a: "sample features",
                    b: "first sample features",
                    got: features.len(),
                    expected,
                });
            }

            data.extend(features);
            y.push(target);
        }

        let shape = (y.len(), width.unwrap_or_default());
        let got = data.len();
        let x = Array2::from_shape_vec(shape, data).map_err(|_| MlErr::SizeMismatch {
            a: "features",
            b: "samples",
            got,
            expected: shape.0 * shape.1,
        })?;

        Self::new(x, Array1::from_vec(y))
    }

    /// The amount of samples.
    pub fn len(&self) -> usize {
        self.y.len()
    }

    /// Always `false`, an empty `Dataset` can't be built.
    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// The width of every feature vector.
    pub fn x_size(&self) -> usize {
        self.x.ncols()
    }

    /// Gives the `i`-th sample.
    ///
    /// # Panics
    /// If `i` is out of bounds.
    pub fn sample(&self, i: usize) -> (ArrayView1<'_, f32>, f32) {
        (self.x.row(i), self.y[i])
    }

    /// Gives a contiguous block of samples.
    pub fn slice(&self, rows: Range<usize>) -> (ArrayView2<'_, f32>, ArrayView1<'_, f32>) {
        (self.x.slice(s![rows.clone(), ..]), self.y.slice(s![rows]))
    }

    pub fn x(&self) -> ArrayView2<'_, f32> {
        self.x.view()
    }

    pub fn y(&self) -> ArrayView1<'_, f32> {
        self.y.view()
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn rejects_an_empty_training_set() {
        let err = Dataset::new(Array2::zeros((0, 4)), Array1::zeros(0)).unwrap_err();
        assert!(matches!(err, MlErr::EmptyInput(_)));

        let err = Dataset::from_rows(Vec::new()).unwrap_err();
        assert!(matches!(err, MlErr::EmptyInput(_)));
    }

    #[test]
    fn rejects_mismatched_targets() {
        let err = Dataset::new(Array2::zeros((3, 2)), Array1::zeros(2)).unwrap_err();
        assert!(matches!(err, MlErr::SizeMismatch { got: 2, expected: 3, .. }));
    }

    #[test]
    fn rejects_ragged_rows() {
        let rows = vec![(vec![1., 2.], 0.), (vec![1.], 1.)];
        assert!(Dataset::from_rows(rows).is_err());
    }

    #[test]
    fn keeps_sample_order() {
        let rows = vec![(vec![1., 2.], 0.5), (vec![3., 4.], 1.5), (vec![5., 6.], 2.5)];
        let dataset = Dataset::from_rows(rows).unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.x_size(), 2);

        let (x, y) = dataset.sample(1);
        assert_eq!(x, array![3., 4.]);
        assert_eq!(y, 1.5);

        let (x, y) = dataset.slice(1..3);
        assert_eq!(x, array![[3., 4.], [5., 6.]]);
        assert_eq!(y, array![1.5, 2.5]);
    }
}
