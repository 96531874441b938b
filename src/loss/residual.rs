/// Running mean absolute and mean squared error over signed residuals
/// (`target - output`). Diagnostics only; training itself consumes the raw
/// residuals.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResidualStats {
    count: usize,
    abs_sum: f64,
    sq_sum: f64,
}

impl ResidualStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, residuals: &[f64]) {
        for r in residuals {
            self.abs_sum += r.abs();
            self.sq_sum += r * r;
        }
        self.count += residuals.len();
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// 0.0 when nothing has been recorded.
    pub fn mean_abs(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.abs_sum / self.count as f64 }
    }

    pub fn mean_squared(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.sq_sum / self.count as f64 }
    }
}
