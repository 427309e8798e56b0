//! Per-instrument market-making and delta-hedging decision engine.
//!
//! Given a stream of market snapshots and fill feedback from the
//! previous cycle, the engine produces bid/ask quote proposals and
//! recalibrates its risk posture from realized returns and historical
//! fill rates. It performs pure computation: no I/O, no threads, no
//! clocks. One instance per instrument; concurrent use of a single
//! instance must be serialized by the caller.
//!
//! # Architecture
//!
//! ```text
//! snapshot → Engine::quote()
//!             ├─ Ledger: capital + mark-to-market wealth
//!             ├─ ReturnHistory: adaptive inventory risk aversion
//!             ├─ FillHistory: book risk coefficient drift
//!             └─ ProposalPair (bid + ask) → venue
//!                   ↓ fills / unfilled size
//! feedback → Engine::settle()
//!             └─ wealth, trade return, fill-shortfall bookkeeping
//! ```

pub mod config;
pub mod engine;
pub mod history;
pub mod ledger;

pub use config::EngineConfig;
pub use engine::Engine;
pub use history::{FillHistory, ReturnHistory};
pub use ledger::Ledger;
