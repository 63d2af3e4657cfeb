use linfa::Float;
use ndarray::Array1;

use crate::error::{as_f64, LarsError, Result};

/// Append-only record of the piecewise-linear solution path: one
/// coefficient snapshot per recorded regularization value, with the
/// lambdas forming a non-increasing sequence.
#[derive(Debug, Clone, Default)]
pub struct SolutionPath<F> {
    betas: Vec<Array1<F>>,
    lambdas: Vec<F>,
}

impl<F: Float> SolutionPath<F> {
    pub fn new() -> Self {
        SolutionPath {
            betas: Vec::new(),
            lambdas: Vec::new(),
        }
    }

    pub fn record(&mut self, beta: &Array1<F>, lambda: F) {
        debug_assert!(
            self.lambdas.last().map_or(true, |&prev| lambda <= prev),
            "lambda path must be non-increasing"
        );
        self.betas.push(beta.to_owned());
        self.lambdas.push(lambda);
    }

    /// Overwrite the final entry with the exact solution at `target`,
    /// linearly interpolated between the last two recorded entries. The
    /// target has to be bracketed by those two lambdas.
    pub fn interpolate_final(&mut self, target: F) -> Result<()> {
        let len = self.lambdas.len();
        if len < 2 {
            return Err(LarsError::InvalidTargetLambda(as_f64(target)));
        }
        let penultimate = self.lambdas[len - 2];
        let ultimate = self.lambdas[len - 1];
        if target > penultimate || target < ultimate {
            return Err(LarsError::InvalidTargetLambda(as_f64(target)));
        }

        let span = penultimate - ultimate;
        if span > F::zero() {
            let t = (penultimate - target) / span;
            let beta = &self.betas[len - 2] * (F::one() - t) + &self.betas[len - 1] * t;
            self.betas[len - 1] = beta;
        }
        self.lambdas[len - 1] = target;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.lambdas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lambdas.is_empty()
    }

    pub fn betas(&self) -> &[Array1<F>] {
        &self.betas
    }

    pub fn lambdas(&self) -> &[F] {
        &self.lambdas
    }

    pub fn last_beta(&self) -> Option<&Array1<F>> {
        self.betas.last()
    }
}

#[cfg(test)]
mod tests {
    use super::SolutionPath;
    use crate::error::LarsError;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn interpolation_is_a_convex_combination() {
        let mut path = SolutionPath::new();
        path.record(&array![0.0, 0.0], 3.0);
        path.record(&array![1.0, 0.0], 2.0);
        path.record(&array![3.0, 2.0], 0.0);

        path.interpolate_final(1.0).unwrap();
        assert_eq!(path.lambdas().last(), Some(&1.0));
        assert_abs_diff_eq!(path.last_beta().unwrap(), &array![2.0, 1.0], epsilon = 1e-12);
    }

    #[test]
    fn unbracketed_target_is_rejected() {
        let mut path = SolutionPath::new();
        path.record(&array![0.0], 3.0);
        path.record(&array![1.0], 2.0);
        assert!(matches!(
            path.interpolate_final(3.5),
            Err(LarsError::InvalidTargetLambda(t)) if t == 3.5
        ));
        assert!(matches!(
            path.interpolate_final(1.5),
            Err(LarsError::InvalidTargetLambda(t)) if t == 1.5
        ));
    }

    #[test]
    fn interpolation_needs_two_entries() {
        let mut path = SolutionPath::new();
        path.record(&array![0.0], 3.0);
        assert!(matches!(
            path.interpolate_final(2.0),
            Err(LarsError::InvalidTargetLambda(_))
        ));
    }
}
