use linfa::Float;
use linfa_linalg::triangular::{SolveTriangularInplace, UPLO};
use ndarray::{s, Array1, ArrayView1, ArrayView2, Axis};

use crate::error::{LarsError, Result};

/// Incrementally maintained upper-triangular factor `R` with
/// `R^T R = C`, where `C` is the (ridge-adjusted) covariance of the active
/// variables. Storage is preallocated at full capacity; the factor occupies
/// the top-left `len() x len()` block and is never recomputed from scratch
/// after initialization.
#[derive(Debug, Clone)]
pub struct CholeskyFactor<F> {
    r: ndarray::Array2<F>,
    k: usize,
}

impl<F: Float> CholeskyFactor<F> {
    pub fn new(capacity: usize) -> Self {
        CholeskyFactor {
            r: ndarray::Array2::zeros((capacity, capacity)),
            k: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.k
    }

    pub fn is_empty(&self) -> bool {
        self.k == 0
    }

    /// The current `len() x len()` factor.
    pub fn view(&self) -> ArrayView2<F> {
        self.r.slice(s![..self.k, ..self.k])
    }

    /// Append one row/column for a variable entering the active set.
    ///
    /// `sq_norm` is the new column's inner product with itself (plus the
    /// ridge term when one is in effect) and `cross` its inner products
    /// with the columns already covered by the factor, in ordinal order.
    ///
    /// The new off-diagonal row `r_k` solves `R^T r_k = cross`; the new
    /// diagonal entry is `sqrt(sq_norm - r_k^T r_k)`. A non-positive
    /// radicand means the extended covariance is not positive definite and
    /// the factor must not be used further.
    pub fn insert(&mut self, sq_norm: F, cross: &Array1<F>) -> Result<()> {
        debug_assert_eq!(cross.len(), self.k);
        debug_assert!(self.k < self.r.nrows(), "factor is at capacity");

        if self.k == 0 {
            if sq_norm <= F::zero() {
                return Err(LarsError::NumericalInstability);
            }
            self.r[[0, 0]] = sq_norm.sqrt();
            self.k = 1;
            return Ok(());
        }

        let k = self.k;
        let mut rhs = cross.view().insert_axis(Axis(1)).to_owned();
        self.r
            .slice(s![..k, ..k])
            .t()
            .solve_triangular_inplace(&mut rhs, UPLO::Lower)?;
        let r_k = rhs.remove_axis(Axis(1));

        let radicand = sq_norm - r_k.dot(&r_k);
        if radicand <= F::zero() {
            return Err(LarsError::NumericalInstability);
        }

        self.r.slice_mut(s![..k, k]).assign(&r_k);
        // stale entries may linger below the diagonal after earlier deletes
        self.r.slice_mut(s![k, ..k]).fill(F::zero());
        self.r[[k, k]] = radicand.sqrt();
        self.k += 1;
        Ok(())
    }

    /// Append a row/column from the raw entering column itself, computing
    /// the inner products against the already-active columns before
    /// delegating to [`insert`](Self::insert). `ridge` is added to the
    /// column's self inner product.
    pub fn insert_column(
        &mut self,
        new_col: ArrayView1<F>,
        active_cols: &[ArrayView1<F>],
        ridge: F,
    ) -> Result<()> {
        let cross: Array1<F> = active_cols.iter().map(|col| col.dot(&new_col)).collect();
        self.insert(new_col.dot(&new_col) + ridge, &cross)
    }

    /// Remove the row/column at `ordinal`, restoring triangularity.
    ///
    /// Dropping an interior column leaves one sub-diagonal entry per
    /// remaining column; a sweep of 2x2 Givens rotations zeroes each one,
    /// propagating rightward, after which the last row is redundant.
    pub fn delete(&mut self, ordinal: usize) {
        debug_assert!(ordinal < self.k);
        let k = self.k;

        if ordinal == k - 1 {
            self.k -= 1;
            return;
        }

        for col in ordinal..k - 1 {
            let src = self.r.slice(s![..k, col + 1]).to_owned();
            self.r.slice_mut(s![..k, col]).assign(&src);
        }

        let new_k = k - 1;
        for j in ordinal..new_k {
            let (c, s_) = givens(self.r[[j, j]], self.r[[j + 1, j]]);
            for col in j..new_k {
                let upper = self.r[[j, col]];
                let lower = self.r[[j + 1, col]];
                self.r[[j, col]] = c * upper + s_ * lower;
                self.r[[j + 1, col]] = c * lower - s_ * upper;
            }
        }
        self.k = new_k;
    }

    /// Solve `R^T R w = rhs` in place via a forward and a backward
    /// triangular solve against the maintained factor.
    pub fn solve_in_place(&self, rhs: &mut Array1<F>) -> Result<()> {
        debug_assert_eq!(rhs.len(), self.k);
        let r = self.r.slice(s![..self.k, ..self.k]);
        let mut b = rhs.view_mut().insert_axis(Axis(1));
        r.t().solve_triangular_inplace(&mut b, UPLO::Lower)?;
        r.solve_triangular_inplace(&mut b, UPLO::Upper)?;
        Ok(())
    }
}

/// Cosine/sine pair rotating `(a, b)` onto `(hypot(a, b), 0)`. The identity
/// when `b` is already zero.
fn givens<F: Float>(a: F, b: F) -> (F, F) {
    if b == F::zero() {
        (F::one(), F::zero())
    } else {
        let r = (a * a + b * b).sqrt();
        (a / r, b / r)
    }
}

#[cfg(test)]
mod tests {
    use super::CholeskyFactor;
    use crate::error::LarsError;
    use approx::assert_abs_diff_eq;
    use ndarray::{s, Array, Array2};
    use ndarray_rand::rand::SeedableRng;
    use ndarray_rand::rand_distr::Uniform;
    use ndarray_rand::RandomExt;
    use rand_xoshiro::Xoshiro256Plus;

    fn factor_of(gram: &Array2<f64>) -> CholeskyFactor<f64> {
        let k = gram.nrows();
        let mut factor = CholeskyFactor::new(k);
        for j in 0..k {
            let cross = gram.slice(s![..j, j]).to_owned();
            factor.insert(gram[[j, j]], &cross).unwrap();
        }
        factor
    }

    fn random_gram(n: usize, p: usize, seed: u64) -> Array2<f64> {
        let mut rng = Xoshiro256Plus::seed_from_u64(seed);
        let x = Array::random_using((n, p), Uniform::new(0.1, 2.0), &mut rng);
        x.t().dot(&x)
    }

    #[test]
    fn insert_reconstructs_the_covariance() {
        let gram = random_gram(8, 4, 7);
        let factor = factor_of(&gram);
        let r = factor.view();
        assert_abs_diff_eq!(r.t().dot(&r), gram, epsilon = 1e-10);
        for i in 0..4 {
            for j in 0..i {
                assert_eq!(r[[i, j]], 0.0);
            }
            assert!(r[[i, i]] > 0.0);
        }
    }

    #[test]
    fn insert_then_delete_restores_the_factor() {
        let gram = random_gram(9, 4, 11);
        let mut factor = CholeskyFactor::new(4);
        for j in 0..3 {
            let cross = gram.slice(s![..j, j]).to_owned();
            factor.insert(gram[[j, j]], &cross).unwrap();
        }
        let before = factor.view().to_owned();

        // append then shrink off the last column
        let cross = gram.slice(s![..3, 3]).to_owned();
        factor.insert(gram[[3, 3]], &cross).unwrap();
        factor.delete(3);
        assert_eq!(factor.len(), 3);
        assert_abs_diff_eq!(factor.view(), before, epsilon = 1e-14);

        // drop an interior column and bring the variable back in at the
        // end; the rotated factor must match factoring the reordered
        // covariance directly
        factor.delete(1);
        let cross = ndarray::arr1(&[gram[[0, 1]], gram[[2, 1]]]);
        factor.insert(gram[[1, 1]], &cross).unwrap();

        let order = [0usize, 2, 1];
        let mut reordered = Array2::zeros((3, 3));
        for (i, &a) in order.iter().enumerate() {
            for (j, &b) in order.iter().enumerate() {
                reordered[[i, j]] = gram[[a, b]];
            }
        }
        let fresh = factor_of(&reordered);
        assert_abs_diff_eq!(factor.view(), fresh.view(), epsilon = 1e-10);
    }

    #[test]
    fn delete_interior_column_matches_fresh_factorization() {
        let gram = random_gram(10, 5, 3);
        let mut factor = factor_of(&gram);
        factor.delete(1);

        // covariance with variable 1 removed
        let keep = [0usize, 2, 3, 4];
        let mut reduced = Array2::zeros((4, 4));
        for (i, &a) in keep.iter().enumerate() {
            for (j, &b) in keep.iter().enumerate() {
                reduced[[i, j]] = gram[[a, b]];
            }
        }
        let fresh = factor_of(&reduced);
        assert_abs_diff_eq!(factor.view(), fresh.view(), epsilon = 1e-10);
    }

    #[test]
    fn insert_column_matches_precomputed_products() {
        let mut rng = Xoshiro256Plus::seed_from_u64(29);
        let x = Array::random_using((6, 3), Uniform::new(-1.0, 1.0), &mut rng);

        let mut from_columns = CholeskyFactor::new(3);
        for j in 0..3 {
            let active: Vec<_> = (0..j).map(|i| x.column(i)).collect();
            from_columns
                .insert_column(x.column(j), &active, 0.0)
                .unwrap();
        }

        let from_products = factor_of(&x.t().dot(&x));
        assert_abs_diff_eq!(from_columns.view(), from_products.view(), epsilon = 1e-12);
    }

    #[test]
    fn near_singular_insert_is_rejected() {
        // two identical unit-norm columns
        let mut factor = CholeskyFactor::new(2);
        factor.insert(1.0, &ndarray::Array1::zeros(0)).unwrap();
        let res = factor.insert(1.0, &ndarray::arr1(&[1.0]));
        assert!(matches!(res, Err(LarsError::NumericalInstability)));
    }

    #[test]
    fn solve_matches_direct_solution() {
        let gram = random_gram(12, 4, 19);
        let factor = factor_of(&gram);
        let rhs = ndarray::arr1(&[1.0, -1.0, 0.5, 2.0]);
        let mut w = rhs.clone();
        factor.solve_in_place(&mut w).unwrap();
        assert_abs_diff_eq!(gram.dot(&w), rhs, epsilon = 1e-8);
    }
}
