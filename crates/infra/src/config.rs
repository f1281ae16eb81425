//! Reporting configuration.
//!
//! Built once at startup and passed to the components that need it.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::reports::ReportKind;

#[derive(Debug, Clone, PartialEq)]
pub struct ReportingConfig {
    /// Time between scheduled report runs.
    pub interval: Duration,
    /// Reports produced for every account on each run.
    pub report_kinds: Vec<ReportKind>,
    /// `From` address on outgoing reports.
    pub sender: String,
    /// Upper bound on accounts processed in parallel during a run.
    pub max_concurrent: usize,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(24 * 60 * 60),
            report_kinds: ReportKind::ALL.to_vec(),
            sender: "reports@localhost".to_string(),
            max_concurrent: 4,
        }
    }
}

impl ReportingConfig {
    /// Load from `LARDER_*` environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(raw) = lookup("LARDER_REPORT_INTERVAL_SECS") {
            let secs: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("LARDER_REPORT_INTERVAL_SECS is not a number: {raw:?}"))?;
            if secs == 0 {
                return Err(anyhow!("LARDER_REPORT_INTERVAL_SECS must be greater than zero"));
            }
            cfg.interval = Duration::from_secs(secs);
        }

        if let Some(raw) = lookup("LARDER_REPORT_KINDS") {
            let kinds = raw
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.parse::<ReportKind>().map_err(|e| anyhow!(e)))
                .collect::<Result<Vec<_>>>()
                .context("invalid LARDER_REPORT_KINDS")?;
            if kinds.is_empty() {
                return Err(anyhow!("LARDER_REPORT_KINDS must name at least one report"));
            }
            cfg.report_kinds = kinds;
        }

        if let Some(sender) = lookup("LARDER_REPORT_SENDER") {
            cfg.sender = sender;
        }

        if let Some(raw) = lookup("LARDER_REPORT_CONCURRENCY") {
            cfg.max_concurrent = raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("LARDER_REPORT_CONCURRENCY is not a number: {raw:?}"))?
                .max(1);
        }

        Ok(cfg)
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_report_kinds(mut self, kinds: impl Into<Vec<ReportKind>>) -> Self {
        self.report_kinds = kinds.into();
        self
    }

    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = sender.into();
        self
    }

    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.max_concurrent = max.max(1);
        self
    }
}
