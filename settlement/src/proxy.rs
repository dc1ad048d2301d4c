//! Proxy consolidation
//!
//! A proxy folds one participant's balance into another's before netting,
//! e.g. when a partner settles on someone's behalf.
//!
//! # Spec format
//!
//! ```text
//! alice,bob;carol,dave
//! ```
//!
//! Groups are separated by `;`, the two names of a group by `,`. The first
//! name is folded away, the second takes over its balance. Groups are applied
//! in order, so a later group sees the effect of earlier ones.

use crate::{
    types::{ProxyGroup, ProxyTransaction},
    Error, Result,
};
use ledger_core::BalanceSheet;
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::str::FromStr;

const GROUP_SEPARATOR: char = ';';
const NAME_SEPARATOR: char = ',';

impl FromStr for ProxyGroup {
    type Err = Error;

    fn from_str(group: &str) -> Result<Self> {
        let names: Vec<&str> = group.split(NAME_SEPARATOR).map(str::trim).collect();

        match names.as_slice() {
            [source, target] if !source.is_empty() && !target.is_empty() => {
                if source == target {
                    return Err(Error::MalformedProxySpec(format!(
                        "'{}' cannot proxy for itself",
                        source
                    )));
                }
                Ok(ProxyGroup::new(*source, *target))
            }
            _ => Err(Error::MalformedProxySpec(format!(
                "expected two names in '{}'",
                group
            ))),
        }
    }
}

/// Parse a proxy spec into its groups.
///
/// An empty spec yields no groups.
pub fn parse_proxy_spec(spec: &str) -> Result<Vec<ProxyGroup>> {
    if spec.trim().is_empty() {
        return Ok(Vec::new());
    }

    spec.split(GROUP_SEPARATOR)
        .map(|group| group.parse::<ProxyGroup>())
        .collect()
}

/// Result of applying proxy groups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Consolidation {
    /// Balances with every proxied participant folded away
    pub balances: BalanceSheet,

    /// One transfer per applied group, in application order
    pub proxies: Vec<ProxyTransaction>,
}

/// Proxy consolidator
#[derive(Debug, Default, Clone, Copy)]
pub struct ProxyConsolidator;

impl ProxyConsolidator {
    /// Create new proxy consolidator
    pub fn new() -> Self {
        Self
    }

    /// Fold each group's source into its target.
    ///
    /// The input sheet is left untouched. Fails without a partial result if
    /// any group is invalid.
    pub fn consolidate(
        &self,
        balances: &BalanceSheet,
        groups: &[ProxyGroup],
    ) -> Result<Consolidation> {
        Self::check_unique_sources(groups)?;

        let mut consolidated = balances.clone();
        let mut proxies = Vec::with_capacity(groups.len());

        for group in groups {
            let source_balance = Self::proxy_balance(&consolidated, group.source.as_str())?;
            Self::proxy_balance(&consolidated, group.target.as_str())?;

            consolidated.credit(group.target.as_str(), source_balance)?;
            consolidated.remove(group.source.as_str());

            tracing::debug!(
                "Folded {} ({}) into {}",
                group.source,
                source_balance,
                group.target
            );

            proxies.push(ProxyTransaction {
                target: group.target.clone(),
                source: group.source.clone(),
                amount: -source_balance,
            });
        }

        if !proxies.is_empty() {
            tracing::info!("Applied {} proxy group(s)", proxies.len());
        }

        Ok(Consolidation {
            balances: consolidated,
            proxies,
        })
    }

    fn check_unique_sources(groups: &[ProxyGroup]) -> Result<()> {
        let mut sources = HashSet::new();
        for group in groups {
            if !sources.insert(&group.source) {
                return Err(Error::DuplicateProxySource(group.source.to_string()));
            }
        }
        Ok(())
    }

    /// Balance of a participant eligible for proxying.
    ///
    /// A participant who broke exactly even cannot take part in a proxy.
    fn proxy_balance(balances: &BalanceSheet, participant: &str) -> Result<Decimal> {
        let balance = balances
            .get(participant)
            .ok_or_else(|| Error::UnknownParticipant(participant.to_string()))?;

        if balance.is_zero() {
            return Err(Error::ZeroBalanceProxy(participant.to_string()));
        }

        Ok(balance)
    }
}
