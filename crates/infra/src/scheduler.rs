//! Periodic report scheduler.
//!
//! Every `interval` the scheduler lists all accounts and runs each configured
//! report for each account. Accounts are independent units of work: one
//! account failing (or panicking) is logged and never stops the others.

use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, RecvTimeoutError, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use larder_core::AccountId;
use larder_inventory::Account;

use crate::config::ReportingConfig;
use crate::reports::{ReportAssembler, ReportError, ReportKind, ReportOutcome};
use crate::sources::AccountDirectory;

/// How one account/report pair ended.
#[derive(Debug, Clone, PartialEq)]
pub enum AccountRunStatus {
    Sent(ReportOutcome),
    Failed(ReportError),
    /// The unit of work panicked; the message is the panic payload if it was a string.
    Panicked(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccountRun {
    pub account_id: AccountId,
    pub kind: ReportKind,
    pub status: AccountRunStatus,
}

/// Summary of one scheduler pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerRun {
    pub started_at: DateTime<Utc>,
    /// Ordered by account, then by configured report order.
    pub runs: Vec<AccountRun>,
}

impl SchedulerRun {
    pub fn succeeded(&self) -> usize {
        self.runs
            .iter()
            .filter(|r| matches!(r.status, AccountRunStatus::Sent(_)))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.runs.len() - self.succeeded()
    }
}

pub struct ReportScheduler {
    assembler: Arc<ReportAssembler>,
    accounts: Arc<dyn AccountDirectory>,
    config: ReportingConfig,
}

impl ReportScheduler {
    pub fn new(assembler: Arc<ReportAssembler>, accounts: Arc<dyn AccountDirectory>, config: ReportingConfig) -> Self {
        Self {
            assembler,
            accounts,
            config,
        }
    }

    /// Run every configured report for every account once, synchronously.
    ///
    /// Work is spread over up to `max_concurrent` threads pulling from a shared
    /// queue, so a slow account only occupies one worker.
    pub fn run_once(&self) -> SchedulerRun {
        let started_at = Utc::now();

        let accounts = match self.accounts.accounts() {
            Ok(a) => a,
            Err(e) => {
                warn!(error = %e, "failed to list accounts; skipping report run");
                return SchedulerRun {
                    started_at,
                    runs: Vec::new(),
                };
            }
        };

        let work: VecDeque<(usize, Account, ReportKind)> = accounts
            .into_iter()
            .flat_map(|account| {
                self.config
                    .report_kinds
                    .iter()
                    .map(move |kind| (account.clone(), *kind))
                    .collect::<Vec<_>>()
            })
            .enumerate()
            .map(|(seq, (account, kind))| (seq, account, kind))
            .collect();

        let total = work.len();
        let workers = self.config.max_concurrent.max(1).min(total);
        let queue = Mutex::new(work);
        let (tx, rx) = mpsc::channel::<(usize, AccountRun)>();

        thread::scope(|scope| {
            for _ in 0..workers {
                let tx = tx.clone();
                let queue = &queue;
                scope.spawn(move || {
                    loop {
                        let next = match queue.lock() {
                            Ok(mut q) => q.pop_front(),
                            Err(_) => None,
                        };
                        let Some((seq, account, kind)) = next else {
                            break;
                        };
                        let run = self.run_account(&account, kind);
                        if tx.send((seq, run)).is_err() {
                            break;
                        }
                    }
                });
            }
        });
        drop(tx);

        let mut runs: Vec<(usize, AccountRun)> = rx.into_iter().collect();
        runs.sort_by_key(|(seq, _)| *seq);
        let runs: Vec<AccountRun> = runs.into_iter().map(|(_, r)| r).collect();

        let run = SchedulerRun { started_at, runs };
        info!(
            units = total,
            succeeded = run.succeeded(),
            failed = run.failed(),
            "report run finished"
        );
        run
    }

    fn run_account(&self, account: &Account, kind: ReportKind) -> AccountRun {
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.assembler.assemble_and_send(account, kind)));

        let status = match result {
            Ok(Ok(outcome)) => AccountRunStatus::Sent(outcome),
            Ok(Err(e)) => {
                warn!(account = %account.id, kind = %kind, error = %e, "report generation aborted");
                AccountRunStatus::Failed(e)
            }
            Err(payload) => {
                let msg = panic_message(payload.as_ref());
                error!(account = %account.id, kind = %kind, panic = %msg, "report generation panicked");
                AccountRunStatus::Panicked(msg)
            }
        };

        AccountRun {
            account_id: account.id,
            kind,
            status,
        }
    }

    /// Spawn the scheduler loop on a named background thread.
    ///
    /// Runs once on startup, then every `interval`; `trigger()` requests an
    /// extra run.
    pub fn spawn(self, name: &'static str) -> std::io::Result<ReportSchedulerHandle> {
        let (signals_tx, signals_rx) = mpsc::channel::<Signal>();
        let last_run: Arc<Mutex<Option<SchedulerRun>>> = Arc::new(Mutex::new(None));

        let last = last_run.clone();
        let join = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || scheduler_loop(name, self, signals_rx, last))?;

        Ok(ReportSchedulerHandle {
            signals: signals_tx,
            last_run,
            join: Some(join),
        })
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Signal {
    RunNow,
    Stop,
}

/// Handle for the running scheduler (shutdown + trigger hook).
#[derive(Debug)]
pub struct ReportSchedulerHandle {
    signals: mpsc::Sender<Signal>,
    last_run: Arc<Mutex<Option<SchedulerRun>>>,
    join: Option<thread::JoinHandle<()>>,
}

impl ReportSchedulerHandle {
    /// Request a run as soon as possible.
    ///
    /// Requests that arrive while the scheduler is busy collapse into a
    /// single follow-up pass.
    pub fn trigger(&self) {
        let _ = self.signals.send(Signal::RunNow);
    }

    /// Summary of the most recent completed run.
    pub fn last_run(&self) -> Option<SchedulerRun> {
        self.last_run.lock().ok().and_then(|r| r.clone())
    }

    /// Stop the scheduler thread, waiting for an in-flight run to finish.
    pub fn shutdown(mut self) {
        let _ = self.signals.send(Signal::Stop);
        if let Some(j) = self.join.take() {
            let _ = j.join();
        }
    }
}

fn scheduler_loop(
    name: &'static str,
    scheduler: ReportScheduler,
    signals: mpsc::Receiver<Signal>,
    last_run: Arc<Mutex<Option<SchedulerRun>>>,
) {
    let interval = scheduler.config.interval;
    info!(scheduler = name, interval_secs = interval.as_secs(), "report scheduler started");

    // A deadline in the past makes the first wait time out immediately.
    let mut due = Instant::now();

    loop {
        match signals.recv_timeout(due.saturating_duration_since(Instant::now())) {
            Ok(Signal::Stop) | Err(RecvTimeoutError::Disconnected) => break,
            Ok(Signal::RunNow) => {}
            Err(RecvTimeoutError::Timeout) => due = next_due(due, interval, Instant::now()),
        }

        if drain_signals(&signals) == Drained::Stop {
            break;
        }

        let run = scheduler.run_once();
        if let Ok(mut slot) = last_run.lock() {
            *slot = Some(run);
        }
    }

    info!(scheduler = name, "report scheduler stopped");
}

#[derive(Debug, PartialEq, Eq)]
enum Drained {
    Continue,
    Stop,
}

/// Swallow queued run requests so they share the pass about to start.
fn drain_signals(signals: &mpsc::Receiver<Signal>) -> Drained {
    loop {
        match signals.try_recv() {
            Ok(Signal::RunNow) => continue,
            Ok(Signal::Stop) | Err(TryRecvError::Disconnected) => return Drained::Stop,
            Err(TryRecvError::Empty) => return Drained::Continue,
        }
    }
}

/// Timed passes stay on the original grid; ticks missed during a long run are skipped.
fn next_due(due: Instant, interval: Duration, now: Instant) -> Instant {
    let next = due + interval;
    if next > now { next } else { now + interval }
}
