//! Core types for settlement engine

use chrono::{DateTime, Utc};
use ledger_core::{BalanceSheet, Contacts, GameId, ParticipantId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Payment that settles part of the ledger.
///
/// Field order matters: transactions sort by payee, then payer, then amount.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Transaction {
    /// Participant receiving the payment
    pub payee: ParticipantId,

    /// Participant making the payment
    pub payer: ParticipantId,

    /// Amount owed by payer to payee (always positive)
    pub amount: Decimal,
}

impl Transaction {
    /// Create new transaction
    pub fn new(
        payee: impl Into<ParticipantId>,
        payer: impl Into<ParticipantId>,
        amount: Decimal,
    ) -> Self {
        Self {
            payee: payee.into(),
            payer: payer.into(),
            amount,
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} pays {} {:.2}", self.payer, self.payee, self.amount)
    }
}

/// Instruction to fold one participant's balance into another's
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProxyGroup {
    /// Participant folded away
    pub source: ParticipantId,

    /// Participant taking over the balance
    pub target: ParticipantId,
}

impl ProxyGroup {
    /// Create new proxy group
    pub fn new(source: impl Into<ParticipantId>, target: impl Into<ParticipantId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Transfer implied by a proxy consolidation.
///
/// `amount` is the negated balance the source held when it was folded:
/// negative when the target took over money owed to the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyTransaction {
    /// Participant that absorbed the balance
    pub target: ParticipantId,

    /// Participant removed from the ledger
    pub source: ParticipantId,

    /// Signed amount
    pub amount: Decimal,
}

/// Settlement statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementStats {
    /// Participants with a balance entry after consolidation
    pub participant_count: usize,

    /// Transactions needed to settle
    pub transaction_count: usize,

    /// Total amount moved by the transactions
    pub total_transferred: Decimal,
}

impl SettlementStats {
    /// Compute statistics for a settled ledger
    pub fn compute(balances: &BalanceSheet, transactions: &[Transaction]) -> Self {
        Self {
            participant_count: balances.len(),
            transaction_count: transactions.len(),
            total_transferred: transactions.iter().map(|t| t.amount).sum(),
        }
    }
}

/// Settlement result handed to reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementReport {
    /// Report ID
    pub report_id: Uuid,

    /// Generation timestamp
    pub generated_at: DateTime<Utc>,

    /// Balances before any proxy consolidation
    pub balances: BalanceSheet,

    /// Payment handles
    pub contacts: Contacts,

    /// Games covered by this settlement
    pub games: Vec<GameId>,

    /// Transfers implied by proxy consolidation
    pub proxies: Vec<ProxyTransaction>,

    /// Transactions that settle the consolidated ledger
    pub transactions: Vec<Transaction>,

    /// Statistics
    pub stats: SettlementStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_ordering() {
        let mut transactions = vec![
            Transaction::new("bob", "carol", Decimal::new(500, 2)),
            Transaction::new("alice", "dave", Decimal::new(100, 2)),
            Transaction::new("alice", "carol", Decimal::new(900, 2)),
            Transaction::new("alice", "carol", Decimal::new(200, 2)),
        ];
        transactions.sort();

        assert_eq!(
            transactions,
            vec![
                Transaction::new("alice", "carol", Decimal::new(200, 2)),
                Transaction::new("alice", "carol", Decimal::new(900, 2)),
                Transaction::new("alice", "dave", Decimal::new(100, 2)),
                Transaction::new("bob", "carol", Decimal::new(500, 2)),
            ]
        );
    }

    #[test]
    fn test_stats() {
        let balances: BalanceSheet = [
            ("alice", Decimal::new(500, 2)),
            ("bob", Decimal::new(500, 2)),
            ("carol", Decimal::new(-1000, 2)),
        ]
        .into_iter()
        .collect();
        let transactions = vec![
            Transaction::new("alice", "carol", Decimal::new(500, 2)),
            Transaction::new("bob", "carol", Decimal::new(500, 2)),
        ];

        let stats = SettlementStats::compute(&balances, &transactions);
        assert_eq!(stats.participant_count, 3);
        assert_eq!(stats.transaction_count, 2);
        assert_eq!(stats.total_transferred, Decimal::new(1000, 2));
    }

    #[test]
    fn test_transaction_display() {
        let transaction = Transaction::new("alice", "bob", Decimal::new(75, 1));
        assert_eq!(transaction.to_string(), "bob pays alice 7.50");
    }
}
