//! Main settlement engine
//!
//! Orchestrates aggregation, proxy consolidation, netting and reporting.

use crate::{
    config::Config,
    netting::NettingEngine,
    proxy::ProxyConsolidator,
    report::ReportRenderer,
    types::*,
    Result,
};
use chrono::Utc;
use ledger_core::{BalanceSheet, Contacts, GameId, GameResults};
use uuid::Uuid;

/// Settlement engine
#[derive(Debug)]
pub struct SettlementEngine {
    /// Proxy consolidator
    consolidator: ProxyConsolidator,

    /// Netting engine
    netting: NettingEngine,

    /// Proxy groups applied before netting
    proxies: Vec<ProxyGroup>,

    /// Report renderer
    renderer: ReportRenderer,

    /// Configuration
    config: Config,
}

impl SettlementEngine {
    /// Create new settlement engine
    pub fn new(config: Config) -> Result<Self> {
        let proxies = config.proxy_groups()?;
        let renderer = ReportRenderer::new(&config.report);

        Ok(Self {
            consolidator: ProxyConsolidator::new(),
            netting: NettingEngine::new(),
            proxies,
            renderer,
            config,
        })
    }

    /// Configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Proxy groups applied before netting
    pub fn proxies(&self) -> &[ProxyGroup] {
        &self.proxies
    }

    /// Settle the open games of a results document
    pub fn run(&self, results: &GameResults) -> Result<SettlementReport> {
        let aggregated = results.aggregate()?;
        self.settle_ledger(aggregated.balances, aggregated.contacts, aggregated.games)
    }

    /// Settle already-aggregated balances.
    ///
    /// The report carries the balances as given, before any proxy is
    /// applied; the transactions settle the consolidated ledger.
    pub fn settle_ledger(
        &self,
        balances: BalanceSheet,
        contacts: Contacts,
        games: Vec<GameId>,
    ) -> Result<SettlementReport> {
        tracing::info!(
            "Starting settlement: {} participants, {} games",
            balances.len(),
            games.len()
        );

        let consolidation = self.consolidator.consolidate(&balances, &self.proxies)?;
        let transactions = self.netting.settle(&consolidation.balances)?;
        let stats = SettlementStats::compute(&consolidation.balances, &transactions);

        let report = SettlementReport {
            report_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            balances,
            contacts,
            games,
            proxies: consolidation.proxies,
            transactions,
            stats,
        };

        tracing::info!(
            "Settlement complete: report {} with {} transactions totalling {}",
            report.report_id,
            report.stats.transaction_count,
            report.stats.total_transferred
        );

        Ok(report)
    }

    /// Render a report as plain text
    pub fn render(&self, report: &SettlementReport) -> String {
        self.renderer.render(report)
    }

    /// Render a report as pretty-printed JSON
    pub fn render_json(&self, report: &SettlementReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}
