//! Multi-cycle drive of the engine through warmup into the adaptive
//! risk regime.
//!
//! Uses a one-cycle-per-year cadence so the annualized return equals
//! `1 + mean` and the adaptive inventory risk aversion has a
//! closed-form value.

use pmm_core::{Phase, TradeType};
use pmm_engine::{Engine, EngineConfig, Ledger};

fn snapshot() -> pmm_core::MarketSnapshot {
    pmm_core::MarketSnapshot {
        oracle_price: 100.0,
        ask_price: 101.0,
        bid_price: 99.0,
        num_bids: 10.0,
        num_asks: 10.0,
        perp_position: 0.0,
        volatility: 0.1,
        negative_funding_rate: 0.0,
        positive_funding_rate: 0.0,
    }
}

#[test]
fn warmup_to_adaptive_transition() {
    let config = EngineConfig {
        warmup_cycles: 1,
        cycle_duration_secs: 31_536_000, // one cycle per year
        ..EngineConfig::default()
    };
    assert_eq!(config.cycles_per_year(), 1.0);

    let ledger = Ledger {
        cash: 1_000.0,
        perp_value: 0.0,
        perp_position: 0.0,
        hedge_position: 0.0,
        opening_oracle_price: 100.0,
    };
    let mut engine = Engine::new(config, ledger);
    assert_eq!(engine.phase(), Phase::Quote);

    // Cycle 1: warmup risk values, everything fills (unfilled = 0).
    let pair = engine.quote(&snapshot()).unwrap();
    assert_eq!(engine.inventory_risk_aversion(), 0.1);
    assert_eq!(pair.bid.trade_type, TradeType::Limit);
    engine.settle(0.0, 0.0, 4_000.0).unwrap();
    // wealth 1000 → 4000: return = 3.0
    assert_eq!(engine.settled_cycles(), 1);
    assert!((engine.current_wealth() - 4_000.0).abs() < 1e-12);

    // Cycle 2: one settled cycle is not past warmup (strict >).
    engine.quote(&snapshot()).unwrap();
    assert_eq!(engine.inventory_risk_aversion(), 0.1);
    assert_eq!(engine.book_risk_coefficient(), 1.5);
    engine.settle(0.0, 0.0, 400.0).unwrap();
    // wealth 4000 → 400: return = -0.9; mean = (3.0 - 0.9) / 2 = 1.05

    // Cycle 3: history is past warmup on both axes.
    let pair = engine.quote(&snapshot()).unwrap();

    // Returns [3.0, -0.9] around mean 1.05: squared deviations are
    // 1.95^2 = 3.8025 each, so the dispersion term is
    // sqrt(3.8025 - 1.0)^2 = 2.8025 and
    // aversion = (1 + 1.05)^1 / (2 * 2.8025).
    let expected_aversion = 2.05 / (2.0 * 2.8025);
    assert!((engine.inventory_risk_aversion() - expected_aversion).abs() < 1e-9);

    // Mean unfilled ratio is 0.0, below the band: one step down.
    assert!((engine.book_risk_coefficient() - 1.49).abs() < 1e-12);

    // Adaptive aversion flows into sizing: total volume is
    // aversion * min(cash, depth * reservation) = aversion * 400.
    let expected_total = expected_aversion * 400.0;
    assert!((pair.bid.volume + pair.ask.volume - expected_total).abs() < 1e-6);
    assert_eq!(pair.bid.trade_type, TradeType::Limit);

    engine.settle(0.0, 0.0, 500.0).unwrap();
    assert_eq!(engine.settled_cycles(), 3);
    assert_eq!(engine.phase(), Phase::Quote);
}

#[test]
fn scheduler_paces_by_cycle_duration() {
    let config = EngineConfig {
        cycle_duration_secs: 15,
        ..EngineConfig::default()
    };
    let ledger = Ledger {
        cash: 100.0,
        perp_value: 0.0,
        perp_position: 0.0,
        hedge_position: 0.0,
        opening_oracle_price: 100.0,
    };
    let engine = Engine::new(config, ledger);
    assert_eq!(engine.cycle_duration_secs(), 15);
}
