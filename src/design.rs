use linfa::Float;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::error::{LarsError, Result};

/// Owns the design matrix and response together with their derived
/// products: the cross-product vector `X^T y` and, when the gram
/// computation path is selected, the full covariance `X^T X + ridge * I`.
///
/// Both products are computed once at construction and afterwards only
/// refreshed for explicitly replaced columns.
#[derive(Debug, Clone)]
pub struct DesignCache<F> {
    x: Array2<F>,
    y: Array1<F>,
    xty: Array1<F>,
    gram: Option<Array2<F>>,
    ridge: F,
}

impl<F: Float> DesignCache<F> {
    pub fn new(x: ArrayView2<F>, y: ArrayView1<F>, keep_gram: bool, ridge: F) -> Self {
        let x = x.to_owned();
        let y = y.to_owned();
        let xty = x.t().dot(&y);
        let gram = if keep_gram {
            let mut gram = x.t().dot(&x);
            for i in 0..gram.nrows() {
                gram[[i, i]] += ridge;
            }
            Some(gram)
        } else {
            None
        };

        DesignCache {
            x,
            y,
            xty,
            gram,
            ridge,
        }
    }

    pub fn nsamples(&self) -> usize {
        self.x.nrows()
    }

    pub fn nfeatures(&self) -> usize {
        self.x.ncols()
    }

    pub fn x(&self) -> &Array2<F> {
        &self.x
    }

    pub fn y(&self) -> &Array1<F> {
        &self.y
    }

    pub fn xty(&self) -> &Array1<F> {
        &self.xty
    }

    pub fn gram(&self) -> Option<&Array2<F>> {
        self.gram.as_ref()
    }

    pub fn column(&self, var: usize) -> ArrayView1<F> {
        self.x.column(var)
    }

    /// Overwrite the given design columns, then refresh only the affected
    /// entries of `X^T y` and the affected rows/columns of the covariance,
    /// restoring the ridge term on every touched diagonal entry.
    pub fn update_columns(&mut self, indices: &[usize], new_cols: ArrayView2<F>) -> Result<()> {
        let p = self.nfeatures();
        for &index in indices {
            if index >= p {
                return Err(LarsError::IndexOutOfRange { index, bound: p });
            }
        }
        assert_eq!(
            new_cols.nrows(),
            self.nsamples(),
            "replacement columns must match the number of samples"
        );
        assert_eq!(
            new_cols.ncols(),
            indices.len(),
            "one replacement column per index is required"
        );

        for (j, &index) in indices.iter().enumerate() {
            self.x.column_mut(index).assign(&new_cols.column(j));
        }

        if let Some(gram) = &mut self.gram {
            for &i in indices {
                for j in 0..p {
                    let dot = self.x.column(i).dot(&self.x.column(j));
                    gram[[i, j]] = dot;
                    gram[[j, i]] = dot;
                }
                gram[[i, i]] += self.ridge;
            }
        }

        for &i in indices {
            self.xty[i] = self.x.column(i).dot(&self.y);
        }
        Ok(())
    }

    /// Replace the response vector and recompute the cross-product.
    pub fn set_y(&mut self, y: ArrayView1<F>) {
        self.y = y.to_owned();
        self.xty = self.x.t().dot(&self.y);
    }
}
