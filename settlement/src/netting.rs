//! Debt netting algorithm
//!
//! Turns net balances into a short list of point-to-point payments.
//!
//! # Algorithm
//!
//! 1. Verify the balances form a closed ledger (sum to zero)
//! 2. Queue creditors (largest first) and debtors (most negative first)
//! 3. Repeatedly match the top creditor with the top debtor, paying the
//!    smaller of the two amounts and re-queueing whatever is left over
//! 4. Sort the payments by (payee, payer, amount)
//!
//! # Example
//!
//! ```text
//! Net positions:
//!   A: +$7.50
//!   B: -$3.25
//!   C: -$4.25
//!
//! Matching:
//!   A ($7.50) vs C (-$4.25) → C pays A $4.25, A still owed $3.25
//!   A ($3.25) vs B (-$3.25) → B pays A $3.25, both settled
//!
//! Transactions:
//!   (A, B, $3.25)
//!   (A, C, $4.25)
//! ```

use crate::{types::Transaction, Error, Result};
use ledger_core::{round_cents, BalanceSheet, ParticipantId};
use rust_decimal::Decimal;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Largest amount on top; equal amounts pop in name order
type CreditorEntry = (Decimal, Reverse<ParticipantId>);

/// Most negative amount on top; equal amounts pop in name order
type DebtorEntry = Reverse<(Decimal, ParticipantId)>;

/// Netting engine
#[derive(Debug, Default, Clone, Copy)]
pub struct NettingEngine;

impl NettingEngine {
    /// Create new netting engine
    pub fn new() -> Self {
        Self
    }

    /// Compute the transactions that settle `balances`.
    ///
    /// Fails with [`Error::UnbalancedLedger`] if the balances do not sum to
    /// zero, or with [`Error::Ledger`] if the amounts are too large to add
    /// up. Participants with a zero balance never appear in the output.
    pub fn settle(&self, balances: &BalanceSheet) -> Result<Vec<Transaction>> {
        let sum = balances.total()?;
        if !sum.is_zero() {
            tracing::warn!("Refusing to settle ledger summing to {}", sum);
            return Err(Error::UnbalancedLedger { sum });
        }

        // Every running balance and transfer is bounded by this
        balances.total_owed()?;

        let (mut creditors, mut debtors) = Self::partition(balances);
        let mut transactions = Vec::new();

        while let Some(((debt, Reverse(debtee)), Reverse((payment, debtor)))) =
            Self::next_match(&mut creditors, &mut debtors)
        {
            let unaccounted = round_cents(debt + payment);
            let amount = debt.min(-payment);

            tracing::debug!(
                "{} pays {} {} ({} unaccounted)",
                debtor,
                debtee,
                amount,
                unaccounted
            );

            transactions.push(Transaction::new(debtee.clone(), debtor.clone(), amount));

            if unaccounted > Decimal::ZERO {
                creditors.push((unaccounted, Reverse(debtee)));
            } else if unaccounted < Decimal::ZERO {
                debtors.push(Reverse((unaccounted, debtor)));
            }
        }

        if !creditors.is_empty() || !debtors.is_empty() {
            tracing::error!(
                "Netting left {} creditor(s) and {} debtor(s) unsettled",
                creditors.len(),
                debtors.len()
            );
            return Err(Error::UnsettledResidual {
                creditors: creditors.len(),
                debtors: debtors.len(),
            });
        }

        transactions.sort();

        tracing::info!(
            "Netting complete: {} participants → {} transactions",
            balances.len(),
            transactions.len()
        );

        Ok(transactions)
    }

    /// Split balances into creditor and debtor queues
    fn partition(balances: &BalanceSheet) -> (BinaryHeap<CreditorEntry>, BinaryHeap<DebtorEntry>) {
        let mut creditors = BinaryHeap::new();
        let mut debtors = BinaryHeap::new();

        for (participant, amount) in balances.iter() {
            if amount > Decimal::ZERO {
                creditors.push((amount, Reverse(participant.clone())));
            } else if amount < Decimal::ZERO {
                debtors.push(Reverse((amount, participant.clone())));
            }
        }

        (creditors, debtors)
    }

    /// Pop the top creditor and top debtor, if both queues have one
    fn next_match(
        creditors: &mut BinaryHeap<CreditorEntry>,
        debtors: &mut BinaryHeap<DebtorEntry>,
    ) -> Option<(CreditorEntry, DebtorEntry)> {
        if creditors.is_empty() || debtors.is_empty() {
            return None;
        }
        Some((creditors.pop()?, debtors.pop()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(entries: &[(&str, i64)]) -> BalanceSheet {
        entries
            .iter()
            .map(|(name, cents)| (*name, Decimal::new(*cents, 2)))
            .collect()
    }

    fn tx(payee: &str, payer: &str, cents: i64) -> Transaction {
        Transaction::new(payee, payer, Decimal::new(cents, 2))
    }

    #[test]
    fn test_single_pair() {
        let engine = NettingEngine::new();
        let transactions = engine.settle(&sheet(&[("A", 1000), ("B", -1000)])).unwrap();

        assert_eq!(transactions, vec![tx("A", "B", 1000)]);
    }

    #[test]
    fn test_two_creditors_one_debtor() {
        let engine = NettingEngine::new();
        let transactions = engine
            .settle(&sheet(&[("A", 500), ("B", 500), ("C", -1000)]))
            .unwrap();

        assert_eq!(transactions, vec![tx("A", "C", 500), tx("B", "C", 500)]);
    }

    #[test]
    fn test_partial_settlement() {
        let engine = NettingEngine::new();
        let transactions = engine
            .settle(&sheet(&[("A", 750), ("B", -325), ("C", -425)]))
            .unwrap();

        assert_eq!(transactions, vec![tx("A", "B", 325), tx("A", "C", 425)]);
    }

    #[test]
    fn test_unbalanced_ledger() {
        let engine = NettingEngine::new();
        let result = engine.settle(&sheet(&[("A", 1001), ("B", -1000)]));

        match result {
            Err(Error::UnbalancedLedger { sum }) => assert_eq!(sum, Decimal::new(1, 2)),
            other => panic!("expected unbalanced ledger, got {:?}", other),
        }
    }

    #[test]
    fn test_overflowing_ledger_rejected() {
        let engine = NettingEngine::new();
        let balances: BalanceSheet = [
            ("A", Decimal::MAX),
            ("B", Decimal::MAX),
            ("C", -Decimal::ONE),
        ]
        .into_iter()
        .collect();

        assert!(matches!(
            engine.settle(&balances),
            Err(Error::Ledger(ledger_core::Error::Overflow(_)))
        ));
    }

    #[test]
    fn test_empty_ledger() {
        let engine = NettingEngine::new();
        assert!(engine.settle(&BalanceSheet::new()).unwrap().is_empty());
    }

    #[test]
    fn test_zero_balances_skipped() {
        let engine = NettingEngine::new();

        let all_even = engine.settle(&sheet(&[("A", 0), ("B", 0)])).unwrap();
        assert!(all_even.is_empty());

        let transactions = engine
            .settle(&sheet(&[("A", 1000), ("B", 0), ("C", -1000)]))
            .unwrap();
        assert_eq!(transactions, vec![tx("A", "C", 1000)]);
    }

    #[test]
    fn test_ties_break_by_name() {
        let engine = NettingEngine::new();
        let transactions = engine
            .settle(&sheet(&[("D", -500), ("B", 500), ("C", -500), ("A", 500)]))
            .unwrap();

        assert_eq!(transactions, vec![tx("A", "C", 500), tx("B", "D", 500)]);
    }

    #[test]
    fn test_creditor_spread_over_debtors() {
        let engine = NettingEngine::new();
        let transactions = engine
            .settle(&sheet(&[("A", 1000), ("B", -300), ("C", -300), ("D", -400)]))
            .unwrap();

        assert_eq!(
            transactions,
            vec![tx("A", "B", 300), tx("A", "C", 300), tx("A", "D", 400)]
        );
    }

    #[test]
    fn test_cent_precision_preserved() {
        let engine = NettingEngine::new();
        let balances = sheet(&[("A", 33), ("B", 33), ("C", 34), ("D", -1), ("E", -99)]);
        let transactions = engine.settle(&balances).unwrap();

        let paid: Decimal = transactions.iter().map(|t| t.amount).sum();
        assert_eq!(paid, Decimal::new(100, 2));
        assert!(transactions.len() < balances.len());
    }

    #[test]
    fn test_input_untouched() {
        let engine = NettingEngine::new();
        let balances = sheet(&[("A", 750), ("B", -325), ("C", -425)]);
        let before = balances.clone();

        engine.settle(&balances).unwrap();
        assert_eq!(balances, before);
    }

    #[test]
    fn test_next_match_requires_both_sides() {
        let mut creditors = BinaryHeap::new();
        let mut debtors: BinaryHeap<DebtorEntry> = BinaryHeap::new();
        creditors.push((Decimal::ONE, Reverse(ParticipantId::new("A"))));

        assert!(NettingEngine::next_match(&mut creditors, &mut debtors).is_none());
        assert_eq!(creditors.len(), 1);
    }
}
