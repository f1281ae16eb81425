//! Report worker: loads configuration, wires the collaborators and runs the
//! report scheduler.
//!
//! `--once` runs a single pass and exits; otherwise the scheduler runs until
//! the process is stopped. `LARDER_SEED_FILE` preloads the in-memory store
//! from a JSON fixture.

use std::sync::Arc;

use anyhow::{Context, Result};

use larder_core::SystemClock;
use larder_infra::reports::{InMemoryDeliveryLog, TracingMailer};
use larder_infra::scheduler::AccountRunStatus;
use larder_infra::store::Seed;
use larder_infra::{InMemoryRepository, ReportAssembler, ReportScheduler, ReportSources, ReportingConfig};

fn main() -> Result<()> {
    larder_observability::init();

    let config = ReportingConfig::from_env().context("failed to load reporting config")?;
    let once = std::env::args().skip(1).any(|a| a == "--once");

    let repo = Arc::new(InMemoryRepository::new());
    if let Ok(path) = std::env::var("LARDER_SEED_FILE") {
        let raw = std::fs::read_to_string(&path).with_context(|| format!("failed to read seed file {path}"))?;
        Seed::from_json(&raw)
            .with_context(|| format!("invalid seed file {path}"))?
            .load_into(&repo)
            .context("failed to load seed data")?;
        tracing::info!(path = %path, "seed data loaded");
    } else {
        tracing::warn!("LARDER_SEED_FILE not set; starting with an empty store");
    }

    let assembler = Arc::new(ReportAssembler::new(
        ReportSources::from_shared(repo.clone()),
        Arc::new(TracingMailer),
        Arc::new(InMemoryDeliveryLog::new()),
        Arc::new(SystemClock),
        config.sender.clone(),
    ));
    let scheduler = ReportScheduler::new(assembler, repo, config);

    if once {
        let run = scheduler.run_once();
        for r in &run.runs {
            match &r.status {
                AccountRunStatus::Sent(outcome) => tracing::info!(
                    account = %r.account_id,
                    kind = %r.kind,
                    delivered = outcome.delivered.len(),
                    "report delivered"
                ),
                AccountRunStatus::Failed(e) => {
                    tracing::warn!(account = %r.account_id, kind = %r.kind, error = %e, "report failed")
                }
                AccountRunStatus::Panicked(msg) => {
                    tracing::error!(account = %r.account_id, kind = %r.kind, panic = %msg, "report panicked")
                }
            }
        }
        return Ok(());
    }

    let _handle = scheduler
        .spawn("report-scheduler")
        .context("failed to spawn report scheduler")?;
    tracing::info!("report scheduler running; stop the process to exit");
    loop {
        std::thread::park();
    }
}
