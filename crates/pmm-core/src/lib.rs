//! Contract types for the per-instrument quoting engine.
//!
//! This crate defines the call boundary between the decision engine and
//! the control loop that drives it:
//! - `MarketSnapshot`: per-cycle market observation fed to the quote phase
//! - `Proposal`, `ProposalPair`: bid/ask quote decisions returned to the driver
//! - `Phase`: which half of the cycle the engine is waiting for
//! - `EngineError`: precondition failures surfaced instead of NaN results

pub mod error;
pub mod types;

pub use error::{EngineError, Result};
pub use types::{Direction, MarketSnapshot, Phase, Proposal, ProposalPair, TradeType};
