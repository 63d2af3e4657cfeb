use linfa::{Float, ParamGuard};

use crate::error::{as_f64, LarsError};

/// A verified hyper-parameter set ready for the estimation of a LARS,
/// LASSO or elastic net regression path.
///
/// See [`LarsParams`](crate::LarsParams) for more information.
#[derive(Clone, Debug, PartialEq)]
pub struct LarsValidParams<F> {
    fit_intercept: bool,
    with_cholesky: bool,
    lasso: bool,
    target_lambda: F,
    elastic_net: bool,
    ridge: F,
    eps: F,
    verbose: usize,
}

impl<F: Float> LarsValidParams<F> {
    pub fn fit_intercept(&self) -> bool {
        self.fit_intercept
    }

    pub fn with_cholesky(&self) -> bool {
        self.with_cholesky
    }

    pub fn lasso(&self) -> bool {
        self.lasso
    }

    pub fn target_lambda(&self) -> F {
        self.target_lambda
    }

    pub fn elastic_net(&self) -> bool {
        self.elastic_net
    }

    pub fn ridge(&self) -> F {
        self.ridge
    }

    pub fn eps(&self) -> F {
        self.eps
    }

    pub fn verbose(&self) -> usize {
        self.verbose
    }
}

/// A hyper-parameter set for the LARS family of path solvers.
///
/// The plain algorithm traces the full least angle regression path. The
/// [LASSO modification](Self::lasso) additionally drops variables whose
/// coefficient would cross zero and stops exactly at a target
/// regularization strength; the [elastic net](Self::elastic_net) variant
/// adds a ridge term to the covariance on top of that.
///
/// # Parameters
/// | Name | Default | Purpose |
/// | :--- | :--- | :--- |
/// | [fit_intercept](Self::fit_intercept) | `true` | Center targets and fit an intercept |
/// | [with_cholesky](Self::with_cholesky) | `true` | Maintain an incremental Cholesky factor instead of re-solving against the gram matrix |
/// | [lasso](Self::lasso) | off | LASSO mode with a target lambda |
/// | [elastic_net](Self::elastic_net) | off | Ridge weight added to the covariance (implies LASSO mode) |
/// | [eps](Self::eps) | `F::epsilon()` | Noise floor below which the maximum correlation counts as zero |
/// | [verbose](Self::verbose) | `0` | Per-step trace table on stdout when `> 1` |
#[derive(Clone, Debug, PartialEq)]
pub struct LarsParams<F>(LarsValidParams<F>);

impl<F: Float> Default for LarsParams<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> LarsParams<F> {
    /// Create default LARS hyper parameters.
    ///
    /// By default, an intercept will be fitted, the incremental Cholesky
    /// path is used and neither the LASSO nor the elastic net modification
    /// is enabled.
    pub fn new() -> Self {
        Self(LarsValidParams {
            fit_intercept: true,
            with_cholesky: true,
            lasso: false,
            target_lambda: F::zero(),
            elastic_net: false,
            ridge: F::zero(),
            eps: F::epsilon(),
            verbose: 0,
        })
    }

    /// Whether to calculate the intercept for this model. If set to false,
    /// no intercept will be used in calculations.
    pub fn fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.0.fit_intercept = fit_intercept;
        self
    }

    /// Choose between the incrementally maintained Cholesky factor
    /// (default) and re-solving against the cached gram matrix each
    /// iteration. Both produce the same path.
    pub fn with_cholesky(mut self, with_cholesky: bool) -> Self {
        self.0.with_cholesky = with_cholesky;
        self
    }

    /// Enable the LASSO modification and stop the path exactly at
    /// `target_lambda`, interpolating the final step. A target of zero
    /// traces the complete path.
    pub fn lasso(mut self, target_lambda: F) -> Self {
        self.0.lasso = true;
        self.0.target_lambda = target_lambda;
        self
    }

    /// Enable the elastic net variant with the given ridge weight, added
    /// to the diagonal of the covariance. Implies LASSO mode; combine with
    /// [`lasso`](Self::lasso) to also set a target lambda.
    pub fn elastic_net(mut self, ridge: F) -> Self {
        self.0.elastic_net = true;
        self.0.lasso = true;
        self.0.ridge = ridge;
        self
    }

    /// Set the numerical noise floor: the path ends once the maximum
    /// absolute correlation falls to this value. This is a
    /// machine-precision guard, not an optimization tolerance.
    pub fn eps(mut self, eps: F) -> Self {
        self.0.eps = eps;
        self
    }

    /// Set the verbosity amount. `2` and above prints a per-step table.
    pub fn verbose(mut self, verbose: usize) -> Self {
        self.0.verbose = verbose;
        self
    }
}

impl<F: Float> ParamGuard for LarsParams<F> {
    type Checked = LarsValidParams<F>;
    type Error = LarsError;

    /// Validate the hyper parameters
    fn check_ref(&self) -> Result<&Self::Checked, Self::Error> {
        if self.0.eps.is_negative() {
            Err(LarsError::InvalidEpsilon)
        } else if self.0.ridge.is_negative() {
            Err(LarsError::InvalidRidge(as_f64(self.0.ridge)))
        } else if self.0.target_lambda.is_negative() {
            Err(LarsError::InvalidTargetLambda(as_f64(self.0.target_lambda)))
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked, Self::Error> {
        self.check_ref()?;
        Ok(self.0)
    }
}
