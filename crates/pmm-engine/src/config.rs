//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Seconds per hour, for funding-rate normalization.
pub const SECONDS_PER_HOUR: f64 = 3_600.0;

/// Seconds per (non-leap) year, for annualizing per-cycle returns.
pub const SECONDS_PER_YEAR: f64 = 31_536_000.0;

/// Lower edge of the target fill-shortfall band. A mean unfilled ratio
/// below this means quotes fill too easily and the book risk
/// coefficient is stepped down.
pub const MIN_UNFILLED_RATIO: f64 = 0.01;

/// Upper edge of the target fill-shortfall band. A mean unfilled ratio
/// above this steps the book risk coefficient up.
pub const MAX_UNFILLED_RATIO: f64 = 0.03;

/// Step applied to the book risk coefficient per adaptation, at most
/// once per quote cycle.
pub const BOOK_RISK_STEP: f64 = 0.01;

/// Configuration for one engine instance.
///
/// Immutable after construction; the adaptive state seeded from it
/// (`book_risk_coefficient`) lives on the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maker fee per order. Quoting as a maker is only worthwhile when
    /// the spread exceeds this.
    #[serde(default = "default_maker_fee")]
    pub maker_fee: f64,

    /// Number of settled cycles required before adaptive risk values
    /// replace the warmup defaults.
    #[serde(default = "default_warmup_cycles")]
    pub warmup_cycles: usize,

    /// Inventory risk aversion used while warming up, as a fraction of
    /// cash the strategy is willing to risk per cycle.
    #[serde(default = "default_warmup_risk_aversion")]
    pub warmup_risk_aversion: f64,

    /// Seconds between trading cycles. The external scheduler paces
    /// quote/settlement calls at this cadence.
    #[serde(default = "default_cycle_duration_secs")]
    pub cycle_duration_secs: u64,

    /// Initial book risk coefficient. Drifts by [`BOOK_RISK_STEP`] per
    /// cycle once fill history leaves warmup.
    #[serde(default = "default_book_risk_coefficient")]
    pub book_risk_coefficient: f64,
}

impl EngineConfig {
    /// Trading cycles per year at the configured cadence.
    #[must_use]
    pub fn cycles_per_year(&self) -> f64 {
        SECONDS_PER_YEAR / self.cycle_duration_secs as f64
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            maker_fee: default_maker_fee(),
            warmup_cycles: default_warmup_cycles(),
            warmup_risk_aversion: default_warmup_risk_aversion(),
            cycle_duration_secs: default_cycle_duration_secs(),
            book_risk_coefficient: default_book_risk_coefficient(),
        }
    }
}

fn default_maker_fee() -> f64 {
    0.0002 // 2 bps
}
fn default_warmup_cycles() -> usize {
    100
}
fn default_warmup_risk_aversion() -> f64 {
    0.1
}
fn default_cycle_duration_secs() -> u64 {
    60
}
fn default_book_risk_coefficient() -> f64 {
    1.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.maker_fee, 0.0002);
        assert_eq!(config.warmup_cycles, 100);
        assert_eq!(config.warmup_risk_aversion, 0.1);
        assert_eq!(config.cycle_duration_secs, 60);
        assert_eq!(config.book_risk_coefficient, 1.5);
    }

    #[test]
    fn test_cycles_per_year() {
        let config = EngineConfig {
            cycle_duration_secs: 60,
            ..Default::default()
        };
        // 31,536,000 seconds per year / 60 = 525,600 cycles
        assert_eq!(config.cycles_per_year(), 525_600.0);
    }

    #[test]
    fn test_config_serde_defaults() {
        let toml_str = r#"
maker_fee = 0.0005
cycle_duration_secs = 30
"#;
        let config: EngineConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.maker_fee, 0.0005);
        assert_eq!(config.cycle_duration_secs, 30);
        assert_eq!(config.warmup_cycles, 100);
        assert_eq!(config.book_risk_coefficient, 1.5);
    }
}
