//! Settlement Engine
//!
//! Settles shared debts after a series of games: turns each participant's
//! net result into a short list of point-to-point payments.
//!
//! # Architecture
//!
//! A settlement run is a single synchronous pass:
//!
//! 1. **Aggregation**: Sum per-game results of the open games into balances
//! 2. **Consolidation**: Fold proxied participants into their stand-ins
//! 3. **Netting**: Match largest creditors with largest debtors
//! 4. **Reporting**: Render balances and payment requests
//!
//! # Netting Algorithm
//!
//! Greedy matching over two priority queues:
//! - Never pays more than either side has outstanding
//! - At most one payment fewer than there are participants
//! - Output sorted by (payee, payer, amount), independent of input order
//!
//! # Example
//!
//! ```no_run
//! use settlement::{Config, SettlementEngine};
//! use ledger_core::GameResults;
//!
//! fn main() -> settlement::Result<()> {
//!     let config = Config::from_env()?;
//!     let engine = SettlementEngine::new(config)?;
//!
//!     let results = GameResults::from_file("results.json")?;
//!     let report = engine.run(&results)?;
//!     println!("{}", engine.render(&report));
//!
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod config;
pub mod engine;
pub mod error;
pub mod netting;
pub mod proxy;
pub mod report;
pub mod types;

// Re-exports
pub use config::{Config, ReportConfig};
pub use engine::SettlementEngine;
pub use error::{Error, Result};
pub use netting::NettingEngine;
pub use proxy::{parse_proxy_spec, Consolidation, ProxyConsolidator};
pub use report::ReportRenderer;
pub use types::*;
