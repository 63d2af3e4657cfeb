//! # Least angle regression a.k.a. LAR
//!
//! This crate traces the full piecewise-linear regularization path of a
//! sparse linear model. At each step the solver activates the feature most
//! correlated with the residual and moves along the direction equiangular
//! between all active features, so every breakpoint of the path is visited
//! exactly once.
//!
//! Two modifications of the plain algorithm are available:
//!
//! * the **LASSO** modification drops a variable from the active set when
//!   its coefficient would cross zero and stops exactly at a caller-chosen
//!   regularization strength (the final step is interpolated);
//! * the **elastic net** variant additionally adds a ridge term to the
//!   covariance, which keeps near-collinear designs well conditioned.
//!
//! The per-step linear systems are solved against an incrementally
//! maintained Cholesky factor of the sign-scaled covariance of the active
//! features; a slower variant that re-solves against the cached gram
//! matrix each step can be selected for cross-checking.
//!
//! ```rust
//! use linfa::prelude::*;
//! use linfa::Dataset;
//! use linfa_lars::Lars;
//! use ndarray::array;
//!
//! let dataset = Dataset::new(array![[1.0, 0.0], [0.0, 1.0]], array![3.0, 2.0]);
//! let model = Lars::params().fit_intercept(false).fit(&dataset)?;
//! let prediction = model.predict(&dataset);
//! # Result::<(), linfa_lars::LarsError>::Ok(())
//! ```
//!
//! ## References
//!
//! * ["Least Angle Regression", Efron et al.](https://web.stanford.edu/~hastie/Papers/LARS/LeastAngle_2002.pdf)
//! * [Wikipedia entry on the Least-angle regression](https://en.wikipedia.org/wiki/Least-angle_regression)
//! * [Scikit-Learn User Guide](https://scikit-learn.org/stable/modules/linear_model.html#least-angle-regression)

use linfa::{traits::PredictInplace, Float};
use ndarray::{Array1, Array2, ArrayBase, Data, Ix2};

pub use error::{LarsError, Result};
pub use hyperparams::{LarsParams, LarsValidParams};
pub use solver::LarsSolver;

mod active_set;
mod algorithm;
mod cholesky;
mod design;
mod error;
mod hyperparams;
mod path;
mod solver;

/// A fitted LARS model. This includes the separating hyperplane,
/// (optionally) an intercept, the alphas (maximum of covariances in
/// absolute value at each iteration) and the indices of the variables
/// active at the end of the path.
#[derive(Debug, Clone, PartialEq)]
pub struct Lars<F> {
    hyperplane: Array1<F>,
    intercept: F,
    alphas: Array1<F>,
    n_iter: usize,
    active: Vec<usize>,
    coef_path: Array2<F>,
}

impl<F: Float> Lars<F> {
    /// Create default Lars hyper parameters
    ///
    /// By default, an intercept will be fitted. To disable fitting an
    /// intercept, call `.fit_intercept(false)` before calling `.fit()`.
    ///
    /// The feature matrix will not be normalized by default.
    pub fn params() -> LarsParams<F> {
        LarsParams::new()
    }

    /// Get the varying values of the coefficients along the path, one
    /// column per recorded breakpoint.
    pub fn coef_path(&self) -> &Array2<F> {
        &self.coef_path
    }

    /// Get the fitted hyperplane
    pub fn hyperplane(&self) -> &Array1<F> {
        &self.hyperplane
    }

    /// Maximum of covariances (in absolute value) at each iteration
    pub fn alphas(&self) -> &Array1<F> {
        &self.alphas
    }

    /// The number of path steps taken by the algorithm
    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    /// Indices of active variables at the end of the path
    pub fn active(&self) -> &Vec<usize> {
        &self.active
    }

    /// Get the fitted intercept, 0. if no intercept was fitted
    pub fn intercept(&self) -> F {
        self.intercept
    }
}

impl<F: Float, D: Data<Elem = F>> PredictInplace<ArrayBase<D, Ix2>, Array1<F>> for Lars<F> {
    /// Given an input matrix `X`, with shape `(n_samples, n_features)`,
    /// `predict` returns the target variable according to the fitted
    /// hyperplane and intercept.
    fn predict_inplace(&self, x: &ArrayBase<D, Ix2>, y: &mut Array1<F>) {
        assert_eq!(
            x.nrows(),
            y.len(),
            "The number of data points must match the number of output targets."
        );

        *y = x.dot(&self.hyperplane) + self.intercept;
    }

    fn default_target(&self, x: &ArrayBase<D, Ix2>) -> Array1<F> {
        Array1::zeros(x.nrows())
    }
}
