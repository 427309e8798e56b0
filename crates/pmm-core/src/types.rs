//! Data types shared between the engine and its driver.
//!
//! Contains the per-cycle market snapshot, the quote proposals handed
//! back to the execution layer, and the phase enum used to enforce
//! quote/settlement alternation.

use serde::{Deserialize, Serialize};

/// Execution style of a quote proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeType {
    /// Cross the book immediately to rebalance the hedge.
    Market,
    /// Rest at the offer price as a maker order.
    Limit,
    /// No order should be placed this cycle.
    ///
    /// Sizes on a `NoTrade` proposal are the symmetric defaults and can
    /// be nonzero; callers must check `trade_type` before acting on
    /// `volume`.
    NoTrade,
}

impl std::fmt::Display for TradeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Market => write!(f, "market"),
            Self::Limit => write!(f, "limit"),
            Self::NoTrade => write!(f, "no_trade"),
        }
    }
}

/// Side of a quote proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Bid side (buying the perp).
    Long,
    /// Ask side (selling the perp).
    Short,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Long => write!(f, "long"),
            Self::Short => write!(f, "short"),
        }
    }
}

/// One side of the quoting decision for a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    /// How the order should be executed.
    pub trade_type: TradeType,
    /// Order size. Non-negative for every classification.
    pub volume: f64,
    /// Offer price for this side.
    pub price: f64,
    /// Which side of the book this proposal belongs to.
    pub direction: Direction,
}

/// Both sides of the quoting decision for a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProposalPair {
    /// Ask (short) side.
    pub ask: Proposal,
    /// Bid (long) side.
    pub bid: Proposal,
}

/// Market observation consumed by one quote phase.
///
/// All fields are overwritten each cycle; none carry state between
/// cycles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Reference fair-value price, independent of the local book.
    pub oracle_price: f64,
    /// Best ask price.
    pub ask_price: f64,
    /// Best bid price.
    pub bid_price: f64,
    /// Resting depth on the bid side.
    pub num_bids: f64,
    /// Resting depth on the ask side.
    pub num_asks: f64,
    /// Current perp position as reported by the venue.
    pub perp_position: f64,
    /// Volatility estimate for the instrument.
    pub volatility: f64,
    /// Funding rate applied when the book trades above oracle.
    pub negative_funding_rate: f64,
    /// Funding rate applied when the book trades below oracle.
    pub positive_funding_rate: f64,
}

impl MarketSnapshot {
    /// Total resting depth across both sides.
    ///
    /// The mid price is undefined when this is zero.
    #[must_use]
    pub fn book_depth(&self) -> f64 {
        self.num_bids + self.num_asks
    }
}

/// Which call the engine is waiting for.
///
/// The engine alternates strictly: quote, settle, quote, settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Waiting for a market snapshot (`Engine::quote`).
    Quote,
    /// Waiting for fill feedback (`Engine::settle`).
    Settlement,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Quote => write!(f, "quote"),
            Self::Settlement => write!(f, "settlement"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trade_type_display() {
        assert_eq!(TradeType::Market.to_string(), "market");
        assert_eq!(TradeType::Limit.to_string(), "limit");
        assert_eq!(TradeType::NoTrade.to_string(), "no_trade");
    }

    #[test]
    fn test_direction_display() {
        assert_eq!(Direction::Long.to_string(), "long");
        assert_eq!(Direction::Short.to_string(), "short");
    }

    #[test]
    fn test_proposal_serde_labels() {
        let proposal = Proposal {
            trade_type: TradeType::NoTrade,
            volume: 1.5,
            price: 100.25,
            direction: Direction::Short,
        };
        let json = serde_json::to_string(&proposal).unwrap();
        assert!(json.contains("\"no_trade\""));
        assert!(json.contains("\"short\""));

        let back: Proposal = serde_json::from_str(&json).unwrap();
        assert_eq!(back, proposal);
    }

    #[test]
    fn test_book_depth() {
        let snapshot = MarketSnapshot {
            oracle_price: 100.0,
            ask_price: 101.0,
            bid_price: 99.0,
            num_bids: 3.0,
            num_asks: 1.0,
            perp_position: 0.0,
            volatility: 0.1,
            negative_funding_rate: 0.0,
            positive_funding_rate: 0.0,
        };
        assert_eq!(snapshot.book_depth(), 4.0);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Quote.to_string(), "quote");
        assert_eq!(Phase::Settlement.to_string(), "settlement");
    }
}
