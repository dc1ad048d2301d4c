//! Core types for the ledger
//!
//! All types are designed for:
//! - Deterministic iteration (ordered by participant name)
//! - Exact arithmetic (Decimal for money, held at cent precision)

use crate::{Error, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

/// Number of fraction digits carried by every amount
pub const CENT_SCALE: u32 = 2;

/// Round an amount to whole cents.
///
/// Halves go to the even cent, and the result always carries exactly two
/// fraction digits so `10` and `10.00` display the same way.
pub fn round_cents(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(CENT_SCALE, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(CENT_SCALE);
    rounded
}

/// Add up amounts, or `None` if the sum does not fit in a `Decimal`
pub fn checked_sum(amounts: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(amount))
}

/// Participant identifier (the name used in the results sheet)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Create new participant ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for ParticipantId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ParticipantId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Payment contact handle (e.g. `@alice`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactHandle(String);

impl ContactHandle {
    /// Create new contact handle
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the handle can receive payment requests.
    ///
    /// Rows without an `@` handle in the results sheet are headers or
    /// summaries, not players.
    pub fn is_addressable(&self) -> bool {
        self.0.starts_with('@')
    }
}

impl fmt::Display for ContactHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Game identifier (a column of the results sheet)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(String);

impl GameId {
    /// Create new game ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Net balance per participant.
///
/// Positive amounts are owed to the participant, negative amounts are owed
/// by them. Every stored amount is rounded to cents on the way in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<ParticipantId, Decimal>",
    into = "BTreeMap<ParticipantId, Decimal>"
)]
pub struct BalanceSheet {
    entries: BTreeMap<ParticipantId, Decimal>,
}

impl BalanceSheet {
    /// Create an empty balance sheet
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a participant's balance, returning the previous one
    pub fn insert(
        &mut self,
        participant: impl Into<ParticipantId>,
        amount: Decimal,
    ) -> Option<Decimal> {
        self.entries.insert(participant.into(), round_cents(amount))
    }

    /// Balance of a participant, if present
    pub fn get(&self, participant: &str) -> Option<Decimal> {
        self.entries.get(participant).copied()
    }

    /// Whether the participant has an entry
    pub fn contains(&self, participant: &str) -> bool {
        self.entries.contains_key(participant)
    }

    /// Remove a participant, returning their balance
    pub fn remove(&mut self, participant: &str) -> Option<Decimal> {
        self.entries.remove(participant)
    }

    /// Add `amount` to an existing participant's balance.
    ///
    /// Returns the new balance, or `None` if the participant is absent. On
    /// [`Error::Overflow`] the balance is left unchanged.
    pub fn credit(&mut self, participant: &str, amount: Decimal) -> Result<Option<Decimal>> {
        let balance = match self.entries.get_mut(participant) {
            Some(balance) => balance,
            None => return Ok(None),
        };
        let credited = balance
            .checked_add(amount)
            .ok_or_else(|| Error::Overflow(format!("crediting {} to {}", amount, participant)))?;
        *balance = round_cents(credited);
        Ok(Some(*balance))
    }

    /// Number of participants
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the sheet has no participants
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate participants in name order
    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantId, Decimal)> + '_ {
        self.entries.iter().map(|(id, amount)| (id, *amount))
    }

    /// Sum of all balances, rounded to cents
    pub fn total(&self) -> Result<Decimal> {
        checked_sum(self.entries.values().copied())
            .map(round_cents)
            .ok_or_else(|| Error::Overflow("summing balances".to_string()))
    }

    /// Sum of the positive balances (money owed to creditors)
    pub fn total_owed(&self) -> Result<Decimal> {
        checked_sum(self.entries.values().copied().filter(|a| *a > Decimal::ZERO))
            .ok_or_else(|| Error::Overflow("summing amounts owed".to_string()))
    }

    /// Whether the sheet describes a closed ledger (sums to zero)
    pub fn is_balanced(&self) -> bool {
        matches!(self.total(), Ok(total) if total.is_zero())
    }
}

impl From<BTreeMap<ParticipantId, Decimal>> for BalanceSheet {
    fn from(entries: BTreeMap<ParticipantId, Decimal>) -> Self {
        entries.into_iter().collect()
    }
}

impl From<BalanceSheet> for BTreeMap<ParticipantId, Decimal> {
    fn from(sheet: BalanceSheet) -> Self {
        sheet.entries
    }
}

impl<P: Into<ParticipantId>> FromIterator<(P, Decimal)> for BalanceSheet {
    fn from_iter<I: IntoIterator<Item = (P, Decimal)>>(iter: I) -> Self {
        let mut sheet = BalanceSheet::new();
        for (participant, amount) in iter {
            sheet.insert(participant, amount);
        }
        sheet
    }
}

/// Contact handle per participant, carried through for display only
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Contacts {
    entries: BTreeMap<ParticipantId, ContactHandle>,
}

impl Contacts {
    /// Create an empty contact book
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a participant's handle
    pub fn insert(&mut self, participant: impl Into<ParticipantId>, handle: ContactHandle) {
        self.entries.insert(participant.into(), handle);
    }

    /// Handle for a participant
    pub fn get(&self, participant: &str) -> Option<&ContactHandle> {
        self.entries.get(participant)
    }

    /// Number of known handles
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no handles are known
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate handles in participant order
    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantId, &ContactHandle)> + '_ {
        self.entries.iter()
    }
}

impl<P: Into<ParticipantId>> FromIterator<(P, ContactHandle)> for Contacts {
    fn from_iter<I: IntoIterator<Item = (P, ContactHandle)>>(iter: I) -> Self {
        let mut contacts = Contacts::new();
        for (participant, handle) in iter {
            contacts.insert(participant, handle);
        }
        contacts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_cents_uses_bankers_rounding() {
        assert_eq!(round_cents(Decimal::new(1005, 3)), Decimal::new(100, 2));
        assert_eq!(round_cents(Decimal::new(1015, 3)), Decimal::new(102, 2));
        assert_eq!(round_cents(Decimal::new(-1005, 3)), Decimal::new(-100, 2));
    }

    #[test]
    fn test_round_cents_pads_scale() {
        assert_eq!(round_cents(Decimal::from(10)).to_string(), "10.00");
        assert_eq!(round_cents(Decimal::new(75, 1)).to_string(), "7.50");
    }

    #[test]
    fn test_balance_sheet_rounds_on_insert() {
        let mut sheet = BalanceSheet::new();
        sheet.insert("alice", Decimal::new(123456, 4));
        assert_eq!(sheet.get("alice"), Some(Decimal::new(1235, 2)));
    }

    #[test]
    fn test_balance_sheet_total_and_balance() {
        let sheet: BalanceSheet = [
            ("alice", Decimal::new(750, 2)),
            ("bob", Decimal::new(-325, 2)),
            ("carol", Decimal::new(-425, 2)),
        ]
        .into_iter()
        .collect();

        assert_eq!(sheet.total().unwrap(), Decimal::ZERO);
        assert!(sheet.is_balanced());

        let mut unbalanced = sheet.clone();
        unbalanced.insert("dave", Decimal::new(1, 2));
        assert_eq!(unbalanced.total().unwrap(), Decimal::new(1, 2));
        assert!(!unbalanced.is_balanced());
    }

    #[test]
    fn test_balance_sheet_credit() {
        let mut sheet: BalanceSheet = [("alice", Decimal::new(-200, 2))].into_iter().collect();

        assert_eq!(
            sheet.credit("alice", Decimal::new(1000, 2)).unwrap(),
            Some(Decimal::new(800, 2))
        );
        assert_eq!(sheet.credit("bob", Decimal::ONE).unwrap(), None);
        assert!(!sheet.contains("bob"));
    }

    #[test]
    fn test_balance_sheet_overflow_is_an_error() {
        let mut sheet: BalanceSheet = [
            ("alice", Decimal::MAX),
            ("bob", Decimal::MAX),
            ("carol", Decimal::NEGATIVE_ONE),
        ]
        .into_iter()
        .collect();

        assert!(matches!(sheet.total(), Err(Error::Overflow(_))));
        assert!(matches!(sheet.total_owed(), Err(Error::Overflow(_))));
        assert!(!sheet.is_balanced());
        assert!(matches!(
            sheet.credit("alice", Decimal::ONE),
            Err(Error::Overflow(_))
        ));
        assert_eq!(sheet.get("alice"), Some(Decimal::MAX));
    }

    #[test]
    fn test_total_owed() {
        let sheet: BalanceSheet = [
            ("alice", Decimal::new(750, 2)),
            ("bob", Decimal::new(-325, 2)),
            ("carol", Decimal::new(-425, 2)),
        ]
        .into_iter()
        .collect();
        assert_eq!(sheet.total_owed().unwrap(), Decimal::new(750, 2));
    }

    #[test]
    fn test_checked_sum() {
        assert_eq!(
            checked_sum([Decimal::ONE, Decimal::new(-250, 2)]),
            Some(Decimal::new(-150, 2))
        );
        assert_eq!(checked_sum([Decimal::MAX, Decimal::ONE]), None);
    }

    #[test]
    fn test_balance_sheet_iterates_in_name_order() {
        let sheet: BalanceSheet = [
            ("carol", Decimal::ONE),
            ("alice", Decimal::ONE),
            ("bob", Decimal::NEGATIVE_ONE),
        ]
        .into_iter()
        .collect();

        let names: Vec<&str> = sheet.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(names, vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn test_balance_sheet_json_rounds_on_deserialize() {
        let sheet: BalanceSheet =
            serde_json::from_str(r#"{"alice": "1.005", "bob": "-1.00"}"#).unwrap();
        assert_eq!(sheet.get("alice"), Some(Decimal::new(100, 2)));
        assert!(sheet.is_balanced());
    }

    #[test]
    fn test_contact_handle_addressable() {
        assert!(ContactHandle::new("@alice").is_addressable());
        assert!(!ContactHandle::new("venmo_handle").is_addressable());
        assert!(!ContactHandle::new("").is_addressable());
    }
}
