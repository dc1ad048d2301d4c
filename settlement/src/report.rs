//! Plain-text settlement report
//!
//! ```text
//! BILLS
//! =============
//! alice: $12.50
//! bob: -$12.50
//!
//! Transactions To Settle
//! ======================
//! alice (@alice) requests $12.50 from bob (@bob)
//! ```

use crate::{config::ReportConfig, types::SettlementReport};
use ledger_core::{round_cents, Contacts, ParticipantId};
use rust_decimal::Decimal;
use std::fmt::Write;

/// The BILLS heading keeps a fixed-width rule
const BILLS_RULE: &str = "=============";

/// Report renderer
#[derive(Debug, Clone)]
pub struct ReportRenderer {
    currency_symbol: String,
    show_games: bool,
    show_proxies: bool,
}

impl Default for ReportRenderer {
    fn default() -> Self {
        Self::new(&ReportConfig::default())
    }
}

impl ReportRenderer {
    /// Create new report renderer
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            currency_symbol: config.currency_symbol.clone(),
            show_games: config.show_games,
            show_proxies: config.show_proxies,
        }
    }

    /// Format an amount as `$12.50` or `-$12.50`
    pub fn format_amount(&self, amount: Decimal) -> String {
        let amount = round_cents(amount);
        if amount < Decimal::ZERO {
            format!("-{}{:.2}", self.currency_symbol, -amount)
        } else {
            format!("{}{:.2}", self.currency_symbol, amount)
        }
    }

    /// Render the full report
    pub fn render(&self, report: &SettlementReport) -> String {
        let mut out = String::new();

        if self.show_games && !report.games.is_empty() {
            section(&mut out, "Games Settled");
            for game in &report.games {
                let _ = writeln!(out, "{}", game);
            }
            out.push('\n');
        }

        let _ = writeln!(out, "BILLS\n{}", BILLS_RULE);
        for (participant, amount) in report.balances.iter() {
            let _ = writeln!(out, "{}: {}", participant, self.format_amount(amount));
        }

        if self.show_proxies && !report.proxies.is_empty() {
            out.push('\n');
            section(&mut out, "Proxies");
            for proxy in &report.proxies {
                let _ = writeln!(
                    out,
                    "{} folded into {} ({})",
                    proxy.source,
                    proxy.target,
                    self.format_amount(proxy.amount)
                );
            }
        }

        out.push('\n');
        section(&mut out, "Transactions To Settle");
        for transaction in &report.transactions {
            let _ = writeln!(
                out,
                "{} requests {} from {}",
                labelled(&report.contacts, &transaction.payee),
                self.format_amount(transaction.amount),
                labelled(&report.contacts, &transaction.payer)
            );
        }

        out
    }
}

/// Heading underlined to its own width
fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", "=".repeat(title.chars().count()));
}

/// `name (@handle)`, or just `name` when no handle is known
fn labelled(contacts: &Contacts, participant: &ParticipantId) -> String {
    match contacts.get(participant.as_str()) {
        Some(handle) => format!("{} ({})", participant, handle),
        None => participant.to_string(),
    }
}
