//! Settle-Up Ledger Core
//!
//! Balance primitives shared by the settlement pipeline.
//!
//! # Architecture
//!
//! - **Balance sheet**: net position per participant, held in cents
//! - **Contacts**: payment handles carried through for reporting
//! - **Results**: game-by-game profit/loss reduced to balances
//!
//! # Invariants
//!
//! - Exact arithmetic: every amount is a `Decimal` rounded to cents
//! - Closed ledger: a settleable sheet sums to exactly zero
//! - Deterministic: iteration is ordered by participant name

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod error;
pub mod results;
pub mod types;

// Re-exports
pub use error::{Error, Result};
pub use results::{AggregatedResults, GameEntry, GameResults, PlayerRow};
pub use types::{
    checked_sum, round_cents, BalanceSheet, ContactHandle, Contacts, GameId, ParticipantId,
};
