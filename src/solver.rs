use linfa::Float;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use ndarray_stats::QuantileExt;

use crate::active_set::ActiveSet;
use crate::cholesky::CholeskyFactor;
use crate::design::DesignCache;
use crate::error::{LarsError, Result};
use crate::hyperparams::LarsValidParams;
use crate::path::SolutionPath;

/// The structural event carried over into the next iteration: either a
/// candidate variable entering the active set or, after a LASSO sign
/// violation, the ordinal position of the variable that has to leave.
enum StepEvent {
    Activate(usize),
    Drop(usize),
}

/// Incremental LARS/LASSO/elastic net path solver.
///
/// Owns a copy of the design matrix and response and traces the
/// piecewise-linear coefficient path by growing (and, in LASSO mode,
/// shrinking) the active set one variable per iteration. All state is
/// exclusively owned; independent solves need independent solvers.
///
/// ```
/// use linfa::ParamGuard;
/// use linfa_lars::{Lars, LarsSolver};
/// use ndarray::array;
///
/// let x = array![[1.0, 0.0], [0.0, 1.0], [0.0, 0.0]];
/// let y = array![3.0, 2.0, 0.0];
/// let params = Lars::params().fit_intercept(false).check().unwrap();
/// let mut solver = LarsSolver::new(&params, x.view(), y.view());
/// solver.run().unwrap();
/// assert_eq!(solver.lambda_path().len(), solver.beta_path().len());
/// ```
pub struct LarsSolver<F> {
    design: DesignCache<F>,
    active: ActiveSet,
    factor: CholeskyFactor<F>,
    path: SolutionPath<F>,
    beta: Array1<F>,
    y_hat: Array1<F>,
    with_cholesky: bool,
    lasso: bool,
    target_lambda: F,
    ridge: F,
    eps: F,
    verbose: usize,
}

impl<F: Float> LarsSolver<F> {
    /// Copy `x` and `y` and set up the derived caches according to the
    /// hyper parameters. The gram matrix is only kept when the Cholesky
    /// path is disabled.
    pub fn new(params: &LarsValidParams<F>, x: ArrayView2<F>, y: ArrayView1<F>) -> Self {
        let ridge = if params.elastic_net() {
            params.ridge()
        } else {
            F::zero()
        };
        let design = DesignCache::new(x, y, !params.with_cholesky(), ridge);
        let (n, p) = (design.nsamples(), design.nfeatures());

        LarsSolver {
            design,
            active: ActiveSet::new(p),
            factor: CholeskyFactor::new(p),
            path: SolutionPath::new(),
            beta: Array1::zeros(p),
            y_hat: Array1::zeros(n),
            with_cholesky: params.with_cholesky(),
            lasso: params.lasso(),
            target_lambda: params.target_lambda(),
            ridge,
            eps: params.eps(),
            verbose: params.verbose(),
        }
    }

    /// Replace design-matrix columns and refresh the derived caches; see
    /// [`DesignCache::update_columns`]. Intended for streaming variable
    /// replacement between solves: the next [`run`](Self::run) starts from
    /// a clean slate against the updated design.
    pub fn update_columns(&mut self, indices: &[usize], new_cols: ArrayView2<F>) -> Result<()> {
        self.design.update_columns(indices, new_cols)
    }

    /// Replace the response vector.
    pub fn set_y(&mut self, y: ArrayView1<F>) {
        self.design.set_y(y);
    }

    /// Adjust the LASSO target for a subsequent [`run`](Self::run). Has no
    /// effect unless LASSO mode was enabled.
    pub fn set_target_lambda(&mut self, target_lambda: F) {
        self.target_lambda = target_lambda;
    }

    pub fn run_with_target(&mut self, target_lambda: F) -> Result<()> {
        self.set_target_lambda(target_lambda);
        self.run()
    }

    /// Trace the full path.
    ///
    /// Iterates until either every variable is active and the maximum
    /// absolute correlation has decayed to numerical noise, or (LASSO
    /// mode) the regularization has reached the requested target, in which
    /// case the final path entry is interpolated to hit it exactly.
    pub fn run(&mut self) -> Result<()> {
        let p = self.design.nfeatures();
        let n = self.design.nsamples();

        // start from a clean slate so the solver can be re-run after
        // column updates
        self.active = ActiveSet::new(p);
        self.factor = CholeskyFactor::new(p);
        self.path = SolutionPath::new();
        self.beta = Array1::zeros(p);
        self.y_hat = Array1::zeros(n);

        let mut corr = self.design.xty().to_owned();
        let first = match corr.mapv(|c| c.abs()).argmax() {
            Ok(ind) => ind,
            Err(_) => {
                self.path.record(&self.beta, F::zero());
                return Ok(());
            }
        };
        let mut max_corr = corr[first].abs();
        self.path.record(&self.beta, max_corr);

        if self.verbose > 1 {
            println!("Step\t\tAdded\t\tDropped\t\tActive set size\t\tC");
        }

        let mut next_event = Some(StepEvent::Activate(first));
        let mut n_iter = 0;

        while self.active.len() < p && max_corr > self.eps {
            let event = match next_event.take() {
                Some(event) => event,
                None => break,
            };
            let (added, dropped) = match event {
                StepEvent::Drop(ordinal) => {
                    if self.with_cholesky {
                        self.factor.delete(ordinal);
                    }
                    (None, Some(self.active.deactivate(ordinal)))
                }
                StepEvent::Activate(var) => {
                    if self.with_cholesky {
                        let design = &self.design;
                        let active_cols: Vec<_> = self
                            .active
                            .ordered()
                            .iter()
                            .map(|&active_var| design.column(active_var))
                            .collect();
                        self.factor
                            .insert_column(design.column(var), &active_cols, self.ridge)?;
                    }
                    self.active.activate(var);
                    (Some(var), None)
                }
            };

            let k = self.active.len();
            let mut signs = Array1::zeros(k);
            for (i, &var) in self.active.ordered().iter().enumerate() {
                signs[i] = corr[var].signum();
            }

            let (beta_direction, normalization) = if self.with_cholesky {
                self.factor_direction(&signs)?
            } else {
                self.gram_direction(&signs)?
            };

            // project the direction into output space
            let mut y_hat_direction = Array1::zeros(n);
            for (i, &var) in self.active.ordered().iter().enumerate() {
                y_hat_direction.scaled_add(beta_direction[i], &self.design.column(var));
            }

            let mut gamma = max_corr / normalization;
            next_event = None;

            if k < p {
                for ind in 0..p {
                    if self.active.is_active(ind) {
                        continue;
                    }
                    let dir_corr = self.design.column(ind).dot(&y_hat_direction);
                    // step sizes at which `ind` would reach the shrinking
                    // correlation bound, one per sign hypothesis
                    let denom = normalization - dir_corr;
                    if denom != F::zero() {
                        let val = (max_corr - corr[ind]) / denom;
                        if val > F::zero() && val < gamma {
                            gamma = val;
                            next_event = Some(StepEvent::Activate(ind));
                        }
                    }
                    let denom = normalization + dir_corr;
                    if denom != F::zero() {
                        let val = (max_corr + corr[ind]) / denom;
                        if val > F::zero() && val < gamma {
                            gamma = val;
                            next_event = Some(StepEvent::Activate(ind));
                        }
                    }
                }
            }

            // bound gamma where an active coefficient would cross zero
            if self.lasso {
                let mut bound = F::infinity();
                let mut leaving = None;
                for (i, &var) in self.active.ordered().iter().enumerate() {
                    if beta_direction[i] == F::zero() {
                        continue;
                    }
                    let val = -self.beta[var] / beta_direction[i];
                    if val > F::zero() && val < bound {
                        bound = val;
                        leaving = Some(i);
                    }
                }
                if let Some(ordinal) = leaving {
                    if bound < gamma {
                        gamma = bound;
                        next_event = Some(StepEvent::Drop(ordinal));
                    }
                }
            }

            self.y_hat.scaled_add(gamma, &y_hat_direction);
            for (i, &var) in self.active.ordered().iter().enumerate() {
                self.beta[var] += gamma * beta_direction[i];
            }

            corr = self.design.xty() - &self.design.x().t().dot(&self.y_hat);
            max_corr -= gamma * normalization;
            self.path.record(&self.beta, max_corr);
            n_iter += 1;

            if self.verbose > 1 {
                println!(
                    "{}\t\t{}\t\t{}\t\t{}\t\t{}",
                    n_iter,
                    added.map(|v| v.to_string()).unwrap_or_default(),
                    dropped.map(|v| v.to_string()).unwrap_or_default(),
                    k,
                    max_corr
                );
            }

            if self.lasso && max_corr <= self.target_lambda {
                self.path.interpolate_final(self.target_lambda)?;
                break;
            }
        }

        Ok(())
    }

    /// Equiangular direction via the maintained factor: solve
    /// `R^T R u = s`, normalize by `1 / sqrt(s^T u)`.
    fn factor_direction(&self, signs: &Array1<F>) -> Result<(Array1<F>, F)> {
        let mut unnormalized = signs.clone();
        self.factor.solve_in_place(&mut unnormalized)?;
        let denom = signs.dot(&unnormalized);
        if denom <= F::zero() {
            return Err(LarsError::NumericalInstability);
        }
        let normalization = F::one() / denom.sqrt();
        Ok((unnormalized * normalization, normalization))
    }

    /// Equiangular direction via the cached gram matrix: factorize the
    /// sign-scaled covariance from scratch, solve against the ones vector
    /// and fold the signs back in.
    fn gram_direction(&self, signs: &Array1<F>) -> Result<(Array1<F>, F)> {
        let scaled = self.sign_scaled_covariance(signs);
        let k = scaled.nrows();

        let mut factor = CholeskyFactor::new(k);
        for j in 0..k {
            let cross = scaled.slice(ndarray::s![..j, j]).to_owned();
            factor.insert(scaled[[j, j]], &cross)?;
        }

        let mut unnormalized = Array1::ones(k);
        factor.solve_in_place(&mut unnormalized)?;
        let total = unnormalized.sum();
        if total <= F::zero() {
            return Err(LarsError::NumericalInstability);
        }
        let normalization = F::one() / total.sqrt();
        let direction = (0..k)
            .map(|i| normalization * unnormalized[i] * signs[i])
            .collect();
        Ok((direction, normalization))
    }

    /// Sign-scaled covariance of the active variables.
    ///
    /// With `D = diag(s)` and active covariance `C`, the equiangular
    /// system `C u = s` rewrites as `(D C D) (D^-1 u) = 1` because
    /// `D^-1 = D` for a sign vector; elementwise that is
    /// `A[i][j] = s[i] * s[j] * C[i][j]`. Solving `A v = 1` and mapping
    /// back through `u = D v` avoids carrying the signs through the
    /// factorization. The ridge term is already present on the cached
    /// gram diagonal and therefore applies here exactly as it does on the
    /// factor path.
    fn sign_scaled_covariance(&self, signs: &Array1<F>) -> Array2<F> {
        let gram = self
            .design
            .gram()
            .expect("gram cache is maintained whenever the factor path is disabled");
        let k = self.active.len();
        let mut scaled = Array2::zeros((k, k));
        for (i, &vi) in self.active.ordered().iter().enumerate() {
            for (j, &vj) in self.active.ordered().iter().enumerate() {
                scaled[[i, j]] = signs[i] * signs[j] * gram[[vi, vj]];
            }
        }
        scaled
    }

    /// Active variables in activation order.
    pub fn active(&self) -> &[usize] {
        self.active.ordered()
    }

    /// Current coefficients; non-zero only at active indices.
    pub fn beta(&self) -> &Array1<F> {
        &self.beta
    }

    /// Recorded coefficient snapshots, index-aligned with
    /// [`lambda_path`](Self::lambda_path).
    pub fn beta_path(&self) -> &[Array1<F>] {
        self.path.betas()
    }

    /// Recorded regularization values, non-increasing.
    pub fn lambda_path(&self) -> &[F] {
        self.path.lambdas()
    }
}
