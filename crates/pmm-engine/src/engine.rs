//! Two-phase quoting and settlement engine.
//!
//! One [`Engine`] instance owns all mutable state for a single
//! instrument. A trading cycle is two calls:
//!
//! 1. [`Engine::quote`] — consumes a market snapshot, recomputes the
//!    risk posture, and returns bid/ask proposals.
//! 2. [`Engine::settle`] — consumes fill feedback from the venue and
//!    updates wealth and history.
//!
//! Calls must alternate; out-of-order calls are rejected with
//! [`EngineError::SequencingViolation`] rather than trusted to caller
//! discipline.

use tracing::{debug, trace};

use pmm_core::{
    Direction, EngineError, MarketSnapshot, Phase, Proposal, ProposalPair, Result, TradeType,
};

use crate::config::{
    EngineConfig, BOOK_RISK_STEP, MAX_UNFILLED_RATIO, MIN_UNFILLED_RATIO, SECONDS_PER_HOUR,
};
use crate::history::{FillHistory, ReturnHistory};
use crate::ledger::Ledger;

/// Stateful decision engine for one instrument.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    ledger: Ledger,

    /// Oracle price from the most recent snapshot. Settlement marks
    /// wealth at this level.
    oracle_price: f64,

    /// Liquidity-risk control variable, nudged by fill-rate history.
    book_risk_coefficient: f64,
    /// Scalar weighting inventory exposure into prices and sizes.
    inventory_risk_aversion: f64,
    /// Target hedge adjustment from basis and funding drift.
    optimal_perp_delta: f64,

    returns: ReturnHistory,
    fills: FillHistory,

    /// Mark-to-market wealth after the last settlement.
    current_wealth: f64,
    /// Size basis of the most recent quote, consumed by the next
    /// settlement. `None` until the first quote.
    total_order_size: Option<f64>,

    phase: Phase,
}

impl Engine {
    /// Create an engine for one instrument/session.
    ///
    /// Initial wealth is marked at the ledger's opening oracle price.
    #[must_use]
    pub fn new(config: EngineConfig, ledger: Ledger) -> Self {
        let current_wealth = ledger.wealth(ledger.opening_oracle_price);
        let oracle_price = ledger.opening_oracle_price;
        let book_risk_coefficient = config.book_risk_coefficient;
        let inventory_risk_aversion = config.warmup_risk_aversion;

        Self {
            config,
            ledger,
            oracle_price,
            book_risk_coefficient,
            inventory_risk_aversion,
            optimal_perp_delta: 0.0,
            returns: ReturnHistory::new(),
            fills: FillHistory::new(),
            current_wealth,
            total_order_size: None,
            phase: Phase::Quote,
        }
    }

    /// Quote phase: produce bid/ask proposals for one cycle.
    ///
    /// Mutates the risk posture (inventory risk aversion, book risk
    /// coefficient, optimal perp delta) and records the total quoted
    /// size for the matching [`Engine::settle`] call.
    ///
    /// # Errors
    ///
    /// - [`EngineError::SequencingViolation`] if the previous quote has
    ///   not been settled.
    /// - [`EngineError::DivisionByZero`] if the book has no resting
    ///   orders on either side.
    /// - [`EngineError::InvalidRiskState`] if the spread formula would
    ///   be fed a non-positive book risk coefficient or a zero
    ///   inventory risk aversion.
    pub fn quote(&mut self, snapshot: &MarketSnapshot) -> Result<ProposalPair> {
        if self.phase != Phase::Quote {
            return Err(EngineError::SequencingViolation(Phase::Settlement));
        }
        let depth = snapshot.book_depth();
        if depth == 0.0 {
            return Err(EngineError::DivisionByZero(
                "order book has no resting orders",
            ));
        }

        self.oracle_price = snapshot.oracle_price;
        self.ledger.perp_position = snapshot.perp_position;

        let mid_price =
            (snapshot.num_bids * snapshot.bid_price + snapshot.num_asks * snapshot.ask_price)
                / depth;

        self.optimal_perp_delta = self.compute_optimal_perp_delta(snapshot);
        self.inventory_risk_aversion = self.compute_inventory_risk_aversion();

        let reservation_price = mid_price
            - self.optimal_perp_delta * self.inventory_risk_aversion * snapshot.volatility;

        self.adapt_book_risk();
        let spread = self.spread(snapshot.volatility)?;

        let bid_offer_price = reservation_price - spread / 2.0;
        let ask_offer_price = reservation_price + spread / 2.0;

        // Risk budget capped by free cash and by book depth on the
        // thinner side, all valued at the reservation price.
        let total_offer_volume = self.inventory_risk_aversion
            * self
                .ledger
                .cash
                .min(snapshot.num_asks * reservation_price)
                .min(snapshot.num_bids * reservation_price);

        let (trade_type, bid_size, ask_size) =
            self.classify(total_offer_volume, bid_offer_price, ask_offer_price);

        // NoTrade leaves the symmetric default sizes on the proposals
        // but contributes nothing to the settlement size basis.
        self.total_order_size = Some(if trade_type == TradeType::NoTrade {
            0.0
        } else {
            ask_size + bid_size
        });
        self.phase = Phase::Settlement;

        debug!(
            trade_type = %trade_type,
            reservation_price,
            spread,
            bid_size,
            ask_size,
            delta = self.optimal_perp_delta,
            aversion = self.inventory_risk_aversion,
            "Quote cycle computed"
        );

        Ok(ProposalPair {
            ask: Proposal {
                trade_type,
                volume: ask_size,
                price: ask_offer_price,
                direction: Direction::Short,
            },
            bid: Proposal {
                trade_type,
                volume: bid_size,
                price: bid_offer_price,
                direction: Direction::Long,
            },
        })
    }

    /// Settlement phase: fold fill feedback into wealth and history.
    ///
    /// `unfilled_perp_size` is the quoted quantity that did not fill;
    /// `perp_value` and `cash` are the venue's post-cycle figures and
    /// overwrite the ledger.
    ///
    /// # Errors
    ///
    /// - [`EngineError::UninitializedState`] if no quote has ever been
    ///   produced.
    /// - [`EngineError::SequencingViolation`] if the last cycle was
    ///   already settled.
    /// - [`EngineError::DivisionByZero`] if the last quote was a
    ///   `NoTrade` (zero size basis) or current wealth is zero.
    ///
    /// All preconditions are checked before any state is mutated.
    pub fn settle(&mut self, unfilled_perp_size: f64, perp_value: f64, cash: f64) -> Result<()> {
        let total_order_size = match self.total_order_size {
            None => {
                return Err(EngineError::UninitializedState(
                    "settlement requested before the first quote",
                ))
            }
            Some(size) => size,
        };
        if self.phase != Phase::Settlement {
            return Err(EngineError::SequencingViolation(Phase::Quote));
        }
        if total_order_size == 0.0 {
            return Err(EngineError::DivisionByZero(
                "no order size outstanding for this cycle",
            ));
        }
        if self.current_wealth == 0.0 {
            return Err(EngineError::DivisionByZero("current wealth is zero"));
        }

        self.ledger.perp_value = perp_value;
        self.ledger.cash = cash;

        let pct_unfilled = unfilled_perp_size / total_order_size;
        self.fills.push(pct_unfilled);

        let new_wealth = self.ledger.wealth(self.oracle_price);
        let trade_return = (new_wealth - self.current_wealth) / self.current_wealth;
        self.returns.push(trade_return);
        self.current_wealth = new_wealth;
        self.phase = Phase::Quote;

        debug!(
            trade_return,
            pct_unfilled,
            wealth = new_wealth,
            cycles = self.returns.len(),
            "Cycle settled"
        );

        Ok(())
    }

    /// Configured seconds between cycles, for the external scheduler.
    #[must_use]
    pub fn cycle_duration_secs(&self) -> u64 {
        self.config.cycle_duration_secs
    }

    /// Which call the engine is waiting for.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Mark-to-market wealth after the last settlement.
    #[must_use]
    pub fn current_wealth(&self) -> f64 {
        self.current_wealth
    }

    /// Current book risk coefficient.
    #[must_use]
    pub fn book_risk_coefficient(&self) -> f64 {
        self.book_risk_coefficient
    }

    /// Inventory risk aversion used by the most recent quote.
    #[must_use]
    pub fn inventory_risk_aversion(&self) -> f64 {
        self.inventory_risk_aversion
    }

    /// Optimal perp delta computed by the most recent quote.
    #[must_use]
    pub fn optimal_perp_delta(&self) -> f64 {
        self.optimal_perp_delta
    }

    /// Number of settled cycles this session.
    #[must_use]
    pub fn settled_cycles(&self) -> usize {
        self.returns.len()
    }

    /// Target hedge adjustment from the book-vs-oracle basis, with
    /// funding drift for the cycle added in the direction of the basis.
    fn compute_optimal_perp_delta(&self, snapshot: &MarketSnapshot) -> f64 {
        let basis = 1.0 - (snapshot.ask_price + snapshot.bid_price) / (2.0 * snapshot.oracle_price);
        let cycle_secs = self.config.cycle_duration_secs as f64;

        if basis < 0.0 {
            self.ledger.hedge_position
                * (basis - snapshot.negative_funding_rate * cycle_secs / SECONDS_PER_HOUR)
        } else if basis > 0.0 {
            self.ledger.hedge_position
                * (basis + snapshot.positive_funding_rate * cycle_secs / SECONDS_PER_HOUR)
        } else {
            0.0
        }
    }

    /// Annualized-return-over-dispersion risk aversion once return
    /// history clears warmup; the configured warmup value before that.
    fn compute_inventory_risk_aversion(&self) -> f64 {
        if self.returns.len() > self.config.warmup_cycles {
            let annualized = (1.0 + self.returns.mean()).powf(self.config.cycles_per_year());
            let deviation = self.returns.deviation();
            annualized / (2.0 * deviation.powi(2))
        } else {
            self.config.warmup_risk_aversion
        }
    }

    /// Hysteresis loop keeping the mean unfilled ratio inside the
    /// target band by stepping the book risk coefficient.
    fn adapt_book_risk(&mut self) {
        if self.fills.len() > self.config.warmup_cycles {
            let mean_unfilled = self.fills.mean();
            if mean_unfilled > MAX_UNFILLED_RATIO {
                self.book_risk_coefficient += BOOK_RISK_STEP;
            } else if mean_unfilled < MIN_UNFILLED_RATIO {
                self.book_risk_coefficient -= BOOK_RISK_STEP;
            }
            trace!(
                mean_unfilled,
                coefficient = self.book_risk_coefficient,
                "Book risk adaptation"
            );
        }
    }

    /// Optimal half-spread-pair width around the reservation price.
    fn spread(&self, volatility: f64) -> Result<f64> {
        if self.book_risk_coefficient <= 0.0 {
            return Err(EngineError::InvalidRiskState(
                "book risk coefficient must be positive",
            ));
        }
        if self.inventory_risk_aversion == 0.0 {
            return Err(EngineError::InvalidRiskState(
                "inventory risk aversion must be nonzero",
            ));
        }

        let aversion = self.inventory_risk_aversion;
        Ok(aversion * volatility.powi(2)
            + (2.0 / aversion) * (1.0 + aversion / self.book_risk_coefficient).ln())
    }

    /// Three-way sizing decision, in priority order: hedge demand too
    /// large for the risk budget → market order on the delta's side;
    /// spread clears the maker fee → symmetric limit quotes skewed by
    /// the delta; nonzero delta with an uneconomic spread → one-sided
    /// limit; otherwise no trade.
    fn classify(
        &self,
        total_offer_volume: f64,
        bid_offer_price: f64,
        ask_offer_price: f64,
    ) -> (TradeType, f64, f64) {
        let delta = self.optimal_perp_delta;
        let mut bid_size = total_offer_volume / 2.0 + delta;
        let mut ask_size = total_offer_volume / 2.0 - delta;

        if delta.abs() > total_offer_volume {
            return if delta > 0.0 {
                (TradeType::Market, delta, 0.0)
            } else {
                (TradeType::Market, 0.0, delta.abs())
            };
        }

        if ask_offer_price - bid_offer_price > self.config.maker_fee {
            return (TradeType::Limit, bid_size, ask_size);
        }

        if delta != 0.0 {
            if delta > 0.0 {
                ask_size = 0.0;
            } else {
                bid_size = 0.0;
            }
            return (TradeType::Limit, bid_size, ask_size);
        }

        (TradeType::NoTrade, bid_size, ask_size)
    }
}
