use linfa::dataset::{AsSingleTargets, Records};
use linfa::traits::Fit;
use linfa::{DatasetBase, Float};
use ndarray::{Array1, Array2, ArrayBase, ArrayView1, CowArray, Data, Ix1, Ix2};

use crate::{error::LarsError, solver::LarsSolver, Lars, LarsValidParams};

impl<F, D, T> Fit<ArrayBase<D, Ix2>, T, LarsError> for LarsValidParams<F>
where
    T: AsSingleTargets<Elem = F>,
    D: Data<Elem = F>,
    F: Float,
{
    type Object = Lars<F>;

    /// Fit a LARS model given a feature matrix `x` and a target variable `y`.
    ///
    /// The feature matrix `x` must have shape `(n_samples, n_features)`,
    /// the target variable `y` shape `(n_samples)`.
    ///
    /// Traces the complete regularization path (or, in LASSO mode, the
    /// path down to the target lambda) and returns a fitted [`Lars`]
    /// model exposing the final hyperplane together with the recorded
    /// path.
    fn fit(
        &self,
        dataset: &DatasetBase<ArrayBase<D, Ix2>, T>,
    ) -> Result<Self::Object, LarsError> {
        let targets = dataset.as_single_targets();
        let (intercept, y) = compute_intercept(self.fit_intercept(), targets);

        let mut solver = LarsSolver::new(self, dataset.records().view(), y.view());
        solver.run()?;

        let n_features = dataset.records().nfeatures();
        let betas = solver.beta_path();
        let mut coef_path = Array2::zeros((n_features, betas.len()));
        for (step, beta) in betas.iter().enumerate() {
            coef_path.column_mut(step).assign(beta);
        }
        let hyperplane = match betas.last() {
            Some(beta) => beta.clone(),
            None => Array1::zeros(n_features),
        };
        let alphas = Array1::from(solver.lambda_path().to_vec());
        let n_iter = solver.lambda_path().len().saturating_sub(1);
        let active = solver.active().to_vec();

        Ok(Lars {
            hyperplane,
            intercept,
            alphas,
            n_iter,
            active,
            coef_path,
        })
    }
}

/// Compute the intercept as the mean of `y` and center `y` if an intercept
/// should be used, use 0 as intercept and leave `y` unchanged otherwise.
fn compute_intercept<'a, F: Float>(
    with_intercept: bool,
    y: ArrayView1<'a, F>,
) -> (F, CowArray<'a, F, Ix1>) {
    if with_intercept {
        let y_mean = y.mean().unwrap_or_else(F::zero);
        let y_centered = y.mapv(|v| v - y_mean);
        (y_mean, y_centered.into())
    } else {
        (F::zero(), y.into())
    }
}
