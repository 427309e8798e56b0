//! Per-cycle performance and fill history.
//!
//! Two append-only series back the engine's adaptive risk values:
//! realized trade returns (inventory risk aversion) and fill-shortfall
//! ratios (book risk coefficient). Both grow for the life of the
//! session and are scanned in full when a statistic is needed.

/// Append-only record of per-cycle fractional wealth changes.
///
/// The mean is maintained incrementally on every push and is never
/// recomputed from the full series.
#[derive(Debug, Clone, Default)]
pub struct ReturnHistory {
    returns: Vec<f64>,
    mean: f64,
}

impl ReturnHistory {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a trade return and fold it into the running mean.
    pub fn push(&mut self, trade_return: f64) {
        let n = self.returns.len() as f64;
        self.mean = (self.mean * n + trade_return) / (n + 1.0);
        self.returns.push(trade_return);
    }

    /// Number of recorded returns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.returns.len()
    }

    /// Whether any returns have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.returns.is_empty()
    }

    /// Running mean of all recorded returns. 0.0 while empty.
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Dispersion of recorded returns around the running mean:
    /// `sqrt(sum((mean - r)^2) / n - 1.0)`.
    ///
    /// Note the `- 1.0` is applied after the division, so this is not
    /// the usual n-1 sample deviation and goes NaN when the squared
    /// deviations average below one. Almost certainly a defect, but the
    /// adaptive risk calibration downstream was tuned against this
    /// output; do not change it without re-tuning.
    #[must_use]
    pub fn deviation(&self) -> f64 {
        let n = self.returns.len() as f64;
        let sum_sq: f64 = self
            .returns
            .iter()
            .map(|r| (self.mean - r).powi(2))
            .sum();
        (sum_sq / n - 1.0).sqrt()
    }
}

/// Append-only record of fill-shortfall ratios, one per settled cycle.
///
/// A ratio of 0.0 means the whole quoted size filled; 1.0 means none
/// of it did.
#[derive(Debug, Clone, Default)]
pub struct FillHistory {
    ratios: Vec<f64>,
}

impl FillHistory {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the unfilled ratio for a settled cycle.
    pub fn push(&mut self, unfilled_ratio: f64) {
        self.ratios.push(unfilled_ratio);
    }

    /// Number of recorded cycles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ratios.len()
    }

    /// Whether any cycles have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ratios.is_empty()
    }

    /// Arithmetic mean of all recorded ratios. 0.0 while empty.
    #[must_use]
    pub fn mean(&self) -> f64 {
        if self.ratios.is_empty() {
            return 0.0;
        }
        self.ratios.iter().sum::<f64>() / self.ratios.len() as f64
    }
}
