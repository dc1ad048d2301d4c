//! Game results and their aggregation into balances
//!
//! A results document mirrors the shared results sheet: one column per game
//! (with a flag telling whether it was already paid out) and one row per
//! player holding their profit or loss for each game they played.
//!
//! ```text
//! {
//!   "games":   [ { "id": "2024-03-01", "settled": false } ],
//!   "players": [ { "name": "alice", "handle": "@alice",
//!                  "results": { "2024-03-01": "12.50" } } ]
//! }
//! ```

use crate::{
    types::{
        checked_sum, round_cents, BalanceSheet, ContactHandle, Contacts, GameId, ParticipantId,
    },
    Error, Result,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// A game column of the results sheet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameEntry {
    /// Game ID
    pub id: GameId,

    /// Whether the game has already been paid out
    #[serde(default)]
    pub settled: bool,
}

/// A player row of the results sheet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRow {
    /// Player name
    pub name: ParticipantId,

    /// Payment handle
    pub handle: ContactHandle,

    /// Profit or loss per game; blank cells are `null` or absent
    #[serde(default)]
    pub results: BTreeMap<GameId, Option<Decimal>>,
}

/// Raw results document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameResults {
    /// Game columns, in sheet order
    #[serde(default)]
    pub games: Vec<GameEntry>,

    /// Player rows, in sheet order
    #[serde(default)]
    pub players: Vec<PlayerRow>,
}

/// Results reduced to what a settlement run consumes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedResults {
    /// Net balance per participant over the open games
    pub balances: BalanceSheet,

    /// Handles of the participants in `balances`
    pub contacts: Contacts,

    /// Games covered by this settlement
    pub games: Vec<GameId>,
}

impl GameResults {
    /// Parse a results document from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a results document from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Games not yet paid out, in sheet order
    pub fn open_games(&self) -> Result<Vec<GameId>> {
        let mut seen = HashSet::new();
        let mut open = Vec::new();

        for game in self.games.iter().filter(|g| !g.settled) {
            if !seen.insert(&game.id) {
                return Err(Error::DuplicateGame(game.id.to_string()));
            }
            open.push(game.id.clone());
        }

        Ok(open)
    }

    /// Sum each player's results over the open games.
    ///
    /// Rows without an addressable handle are skipped, as are players with
    /// nothing recorded in any open game.
    pub fn aggregate(&self) -> Result<AggregatedResults> {
        let games = self.open_games()?;

        let mut balances = BalanceSheet::new();
        let mut contacts = Contacts::new();
        let mut seen = HashSet::new();

        for row in &self.players {
            if !row.handle.is_addressable() {
                tracing::debug!("Skipping row {} without payment handle", row.name);
                continue;
            }

            if !seen.insert(&row.name) {
                return Err(Error::DuplicateParticipant(row.name.to_string()));
            }

            let played: Vec<Decimal> = games
                .iter()
                .filter_map(|game| row.results.get(game).copied().flatten())
                .filter(|amount| !amount.is_zero())
                .collect();

            if played.is_empty() {
                continue;
            }

            let net = checked_sum(played)
                .map(round_cents)
                .ok_or_else(|| Error::Overflow(format!("summing results of {}", row.name)))?;
            balances.insert(row.name.clone(), net);
            contacts.insert(row.name.clone(), row.handle.clone());
        }

        tracing::info!(
            "Aggregated {} participants over {} open games",
            balances.len(),
            games.len()
        );

        Ok(AggregatedResults {
            balances,
            contacts,
            games,
        })
    }
}
