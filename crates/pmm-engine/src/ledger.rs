//! Capital ledger and mark-to-market valuation.

/// Capital and open positions for one instrument.
///
/// `cash` and `perp_value` are overwritten from venue feedback at each
/// settlement; `perp_position` from each snapshot. The opening oracle
/// price is fixed at construction and anchors short-hedge valuation.
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    /// Free cash.
    pub cash: f64,
    /// Mark value of the perp position.
    pub perp_value: f64,
    /// Perp position size (positive = long).
    pub perp_position: f64,
    /// Hedge position size (positive = long).
    pub hedge_position: f64,
    /// Oracle price at session open. Immutable reference level.
    pub opening_oracle_price: f64,
}

impl Ledger {
    /// Mark-to-market wealth at the given oracle price.
    ///
    /// A long hedge is valued outright at the oracle price. A short
    /// hedge is valued as the move against the opening oracle price:
    /// the short leg is carried as a basis trade against its entry
    /// level, not as an outright position. The asymmetry is the
    /// intended convention; keep both branches in sync with the
    /// strategy's accounting before changing either.
    #[must_use]
    pub fn wealth(&self, oracle_price: f64) -> f64 {
        let hedge_value = if self.hedge_position > 0.0 {
            oracle_price * self.hedge_position
        } else {
            -self.hedge_position * (oracle_price - self.opening_oracle_price)
        };
        self.cash + self.perp_value + hedge_value
    }
}
