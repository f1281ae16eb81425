//! Infrastructure layer: collaborator contracts, in-memory stores, report
//! assembly and delivery, scheduling, configuration.

pub mod config;
pub mod reports;
pub mod scheduler;
pub mod sources;
pub mod store;

#[cfg(test)]
mod integration_tests;

pub use config::ReportingConfig;
pub use reports::{ReportAssembler, ReportError, ReportKind, ReportOutcome};
pub use scheduler::{ReportScheduler, ReportSchedulerHandle, SchedulerRun};
pub use sources::ReportSources;
pub use store::{InMemoryRepository, StoreError};
