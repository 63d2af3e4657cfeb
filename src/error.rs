use thiserror::Error;

pub type Result<T> = std::result::Result<T, LarsError>;

#[derive(Error, Debug)]
pub enum LarsError {
    /// A Cholesky update hit a non-positive pivot, i.e. the proposed active
    /// set is linearly dependent or close to it. Increasing the ridge
    /// penalty regularizes the covariance and usually resolves this.
    #[error("cholesky update is not positive definite; the active set is near-singular (consider a larger ridge penalty)")]
    NumericalInstability,
    #[error("target lambda {0} is not bracketed by the computed path")]
    InvalidTargetLambda(f64),
    #[error("column index {index} is out of range for {bound} features")]
    IndexOutOfRange { index: usize, bound: usize },
    #[error("invalid epsilon")]
    InvalidEpsilon,
    #[error("invalid ridge penalty {0}")]
    InvalidRidge(f64),
    #[error(transparent)]
    BaseCrate(#[from] linfa::Error),
    #[error(transparent)]
    Linalg(#[from] linfa_linalg::LinalgError),
}

/// Widen a float generic to the f64 error payload.
pub(crate) fn as_f64<F: linfa::Float>(value: F) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}
