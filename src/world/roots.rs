/// Precomputed square roots of integer squared grid distances.
///
/// Covers `0..=(width-1)^2 + (height-1)^2`, the largest squared offset between
/// two patch centers. Wrapped offsets are never larger than unwrapped ones, so
/// the neighbor queries always stay inside the table.
#[derive(Clone, Debug)]
pub struct RootTable {
    roots: Vec<f64>,
}

impl RootTable {
    pub fn new(width: i32, height: i32) -> Self {
        let max_dx = (width.max(1) - 1) as usize;
        let max_dy = (height.max(1) - 1) as usize;
        let len = max_dx * max_dx + max_dy * max_dy + 1;
        Self {
            roots: (0..len).map(|d| (d as f64).sqrt()).collect(),
        }
    }

    /// `sqrt(d)`; computed directly for squared distances outside the table.
    pub fn grid_root(&self, d: usize) -> f64 {
        match self.roots.get(d) {
            Some(root) => *root,
            None => (d as f64).sqrt(),
        }
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}
