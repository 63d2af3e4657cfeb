/// Ordered set of the variables currently contributing non-zero
/// coefficients.
///
/// The insertion order defines the ordinal positions `0..len()` that the
/// Cholesky factor rows/columns are keyed by. Ordinals are only stable
/// between structural mutations; anything caching an ordinal across a
/// [`deactivate`](ActiveSet::deactivate) has to re-derive it.
#[derive(Debug, Clone)]
pub struct ActiveSet {
    order: Vec<usize>,
    membership: Vec<bool>,
}

impl ActiveSet {
    pub fn new(n_features: usize) -> Self {
        ActiveSet {
            order: Vec::new(),
            membership: vec![false; n_features],
        }
    }

    /// Append `var` to the active set. O(1).
    pub fn activate(&mut self, var: usize) {
        debug_assert!(!self.membership[var], "variable {} already active", var);
        self.membership[var] = true;
        self.order.push(var);
    }

    /// Remove the entry at `ordinal`, shifting subsequent entries down.
    /// Returns the variable that left. O(len).
    pub fn deactivate(&mut self, ordinal: usize) -> usize {
        let var = self.order.remove(ordinal);
        self.membership[var] = false;
        var
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn is_active(&self, var: usize) -> bool {
        self.membership[var]
    }

    /// Active variables in activation order.
    pub fn ordered(&self) -> &[usize] {
        &self.order
    }
}
