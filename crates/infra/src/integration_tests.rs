//! Integration tests for the reporting pipeline.
//!
//! Tests: Repository → Assembler → Engine → Renderer → Mailer → Delivery log
//!
//! Verifies:
//! - Reports reach every recipient and are logged per recipient
//! - Per-recipient send failures do not block other recipients
//! - Collaborator failures abort only the affected account
//! - Scheduler runs isolate accounts from each other

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use chrono::{DateTime, TimeZone, Utc};

    use larder_core::{
        AccountId, CategoryId, DeliveryId, FixedClock, InventoryItemId, OrganizationId, SnapshotId, UserId,
    };
    use larder_inventory::{Account, Category, Delivery, InventoryItem, InventorySnapshot, User};

    use crate::config::ReportingConfig;
    use crate::reports::{
        DeliveryLog, DeliveryLogEntry, InMemoryDeliveryLog, InMemoryMailer, ReportAssembler, ReportError,
        ReportKind, SendError,
    };
    use crate::scheduler::{AccountRunStatus, ReportScheduler};
    use crate::sources::{DeliveryLedger, InventoryCatalog, ReportSources};
    use crate::store::{InMemoryRepository, StoreError};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 3, 7, 0, 0).unwrap()
    }

    fn account(id: u64) -> Account {
        Account {
            id: AccountId::new(id),
            organization_id: OrganizationId::new(1),
            name: format!("Location {id}"),
        }
    }

    /// Account with two users, two items (one critical, one normal), a
    /// category and a delivery.
    fn seed(repo: &InMemoryRepository, id: u64) {
        let account_id = AccountId::new(id);
        repo.put_account(account(id)).unwrap();
        repo.put_user(User::new(UserId::new(id * 10 + 1), account_id, "Manager", format!("manager{id}@example.com")).unwrap())
            .unwrap();
        repo.put_user(User::new(UserId::new(id * 10 + 2), account_id, "Owner", format!("owner{id}@example.com")).unwrap())
            .unwrap();
        repo.put_category(Category {
            id: CategoryId::new(id * 100),
            account_id,
            name: "Dairy".to_string(),
        })
        .unwrap();

        let milk = InventoryItemId::new(id * 1000 + 1);
        let sugar = InventoryItemId::new(id * 1000 + 2);
        repo.put_item(
            InventoryItem::new(milk, account_id, "Milk", 1.5)
                .unwrap()
                .with_unit("l")
                .with_category(CategoryId::new(id * 100))
                .with_stock_levels(10.0, 40.0)
                .unwrap(),
        )
        .unwrap();
        repo.put_item(
            InventoryItem::new(sugar, account_id, "Sugar", 2.0)
                .unwrap()
                .with_unit("kg")
                .with_stock_levels(2.0, 10.0)
                .unwrap(),
        )
        .unwrap();

        repo.put_snapshot(
            InventorySnapshot::new(SnapshotId::new(id), account_id, now())
                .with_count(milk, 4.0)
                .unwrap()
                .with_count(sugar, 6.0)
                .unwrap(),
        )
        .unwrap();
        repo.put_delivery(
            Delivery::new(DeliveryId::new(id), account_id, milk, 20.0, now() - chrono::Duration::days(3))
                .unwrap()
                .with_vendor("Valley Dairy"),
        )
        .unwrap();
    }

    fn assembler(
        sources: ReportSources,
        mailer: Arc<InMemoryMailer>,
        log: Arc<dyn DeliveryLog>,
    ) -> ReportAssembler {
        ReportAssembler::new(sources, mailer, log, Arc::new(FixedClock(now())), "reports@example.com")
    }

    #[test]
    fn supply_chain_report_reaches_every_recipient() {
        let repo = Arc::new(InMemoryRepository::new());
        seed(&repo, 1);
        let mailer = Arc::new(InMemoryMailer::new());
        let log = Arc::new(InMemoryDeliveryLog::new());
        let assembler = assembler(ReportSources::from_shared(repo.clone()), mailer.clone(), log.clone());

        let outcome = assembler.assemble_and_send(&account(1), ReportKind::SupplyChain).unwrap();

        assert!(outcome.fully_delivered());
        assert_eq!(outcome.delivered, vec![UserId::new(11), UserId::new(12)]);
        assert_eq!(mailer.sent().len(), 2);

        let payload = &outcome.report.payload;
        assert_eq!(payload["metrics"]["critical_count"], 1);
        assert_eq!(payload["metrics"]["normal_count"], 1);
        assert_eq!(payload["metrics"]["total_value"], 4.0 * 1.5 + 6.0 * 2.0);
        assert_eq!(payload["metrics"]["total_reorder_cost"], 36.0 * 1.5);
        assert_eq!(payload["items"][0]["category"], "Dairy");
        assert_eq!(payload["items"][0]["days_until_stockout"], 2);
        assert!(payload["items"][0]["last_delivery"].is_string());
        assert!(payload["items"][1]["last_delivery"].is_null());

        let entries = log.for_account(AccountId::new(1));
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.kind == ReportKind::SupplyChain && e.sent_at == now()));
    }

    #[test]
    fn account_without_users_fails_before_reading_inventory() {
        struct CountingCatalog {
            inner: Arc<InMemoryRepository>,
            calls: AtomicUsize,
        }
        impl InventoryCatalog for CountingCatalog {
            fn items_by_account(&self, account_id: AccountId) -> Result<Vec<InventoryItem>, StoreError> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                self.inner.items_by_account(account_id)
            }
        }

        let repo = Arc::new(InMemoryRepository::new());
        repo.put_account(account(2)).unwrap();
        let catalog = Arc::new(CountingCatalog {
            inner: repo.clone(),
            calls: AtomicUsize::new(0),
        });
        let mut sources = ReportSources::from_shared(repo.clone());
        sources.catalog = catalog.clone();
        let assembler = assembler(sources, Arc::new(InMemoryMailer::new()), Arc::new(InMemoryDeliveryLog::new()));

        let err = assembler.assemble_and_send(&account(2), ReportKind::Stock).unwrap_err();
        assert_eq!(err, ReportError::NoRecipients { account_id: AccountId::new(2) });
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn rejected_recipient_does_not_block_the_rest() {
        let repo = Arc::new(InMemoryRepository::new());
        seed(&repo, 3);
        let mailer = Arc::new(InMemoryMailer::new().with_rejected("manager3@example.com"));
        let log = Arc::new(InMemoryDeliveryLog::new());
        let assembler = assembler(ReportSources::from_shared(repo), mailer.clone(), log.clone());

        let outcome = assembler.assemble_and_send(&account(3), ReportKind::Stock).unwrap();

        assert_eq!(outcome.delivered, vec![UserId::new(32)]);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].user_id, UserId::new(31));
        assert_eq!(
            outcome.failures[0].error,
            SendError::Rejected("manager3@example.com".to_string())
        );
        assert_eq!(mailer.sent().len(), 1);
        assert_eq!(log.all().len(), 1);
    }

    #[test]
    fn delivery_log_failure_does_not_fail_the_report() {
        struct BrokenLog;
        impl DeliveryLog for BrokenLog {
            fn record(&self, _entry: DeliveryLogEntry) -> Result<(), StoreError> {
                Err(StoreError::unavailable("log table offline"))
            }
        }

        let repo = Arc::new(InMemoryRepository::new());
        seed(&repo, 4);
        let mailer = Arc::new(InMemoryMailer::new());
        let assembler = assembler(ReportSources::from_shared(repo), mailer.clone(), Arc::new(BrokenLog));

        let outcome = assembler.assemble_and_send(&account(4), ReportKind::Stock).unwrap();
        assert!(outcome.fully_delivered());
        assert_eq!(mailer.sent().len(), 2);
    }

    #[test]
    fn missing_snapshot_reports_all_items_out() {
        let repo = Arc::new(InMemoryRepository::new());
        let account_id = AccountId::new(5);
        repo.put_account(account(5)).unwrap();
        repo.put_user(User::new(UserId::new(51), account_id, "Manager", "m5@example.com").unwrap()).unwrap();
        repo.put_item(
            InventoryItem::new(InventoryItemId::new(1), account_id, "Rice", 3.0)
                .unwrap()
                .with_stock_levels(5.0, 20.0)
                .unwrap(),
        )
        .unwrap();
        let assembler = assembler(
            ReportSources::from_shared(repo),
            Arc::new(InMemoryMailer::new()),
            Arc::new(InMemoryDeliveryLog::new()),
        );

        let outcome = assembler.assemble_and_send(&account(5), ReportKind::SupplyChain).unwrap();
        let metrics = &outcome.report.payload["metrics"];
        assert_eq!(metrics["out_of_stock_count"], 1);
        assert_eq!(metrics["total_reorder_cost"], 60.0);
        assert!(outcome.report.body.contains("[OUT] Rice: order 20"));
    }

    struct FlakyCatalog {
        inner: Arc<InMemoryRepository>,
        broken: AccountId,
    }

    impl InventoryCatalog for FlakyCatalog {
        fn items_by_account(&self, account_id: AccountId) -> Result<Vec<InventoryItem>, StoreError> {
            if account_id == self.broken {
                return Err(StoreError::unavailable("catalog replica down"));
            }
            self.inner.items_by_account(account_id)
        }
    }

    #[test]
    fn catalog_failure_is_reported_per_account() {
        let repo = Arc::new(InMemoryRepository::new());
        seed(&repo, 6);
        let mut sources = ReportSources::from_shared(repo.clone());
        sources.catalog = Arc::new(FlakyCatalog {
            inner: repo,
            broken: AccountId::new(6),
        });
        let assembler = assembler(sources, Arc::new(InMemoryMailer::new()), Arc::new(InMemoryDeliveryLog::new()));

        let err = assembler.assemble_and_send(&account(6), ReportKind::Stock).unwrap_err();
        assert_eq!(err.account_id(), AccountId::new(6));
        assert!(matches!(err, ReportError::CatalogUnavailable { .. }));
    }

    #[test]
    fn scheduler_isolates_failing_and_panicking_accounts() {
        struct PanickyLedger {
            inner: Arc<InMemoryRepository>,
            poisoned: AccountId,
        }
        impl DeliveryLedger for PanickyLedger {
            fn deliveries_by_account(&self, account_id: AccountId) -> Result<Vec<Delivery>, StoreError> {
                if account_id == self.poisoned {
                    panic!("ledger corrupted for account {account_id}");
                }
                self.inner.deliveries_by_account(account_id)
            }
        }

        let repo = Arc::new(InMemoryRepository::new());
        for id in [7, 8, 9] {
            seed(&repo, id);
        }
        repo.put_account(account(10)).unwrap(); // no users

        let mut sources = ReportSources::from_shared(repo.clone());
        sources.catalog = Arc::new(FlakyCatalog {
            inner: repo.clone(),
            broken: AccountId::new(7),
        });
        sources.deliveries = Arc::new(PanickyLedger {
            inner: repo.clone(),
            poisoned: AccountId::new(8),
        });

        let mailer = Arc::new(InMemoryMailer::new());
        let log = Arc::new(InMemoryDeliveryLog::new());
        let assembler = Arc::new(assembler(sources, mailer.clone(), log.clone()));
        let config = ReportingConfig::default()
            .with_report_kinds([ReportKind::Stock])
            .with_max_concurrent(2);
        let scheduler = ReportScheduler::new(assembler, repo, config);

        let run = scheduler.run_once();

        let ids: Vec<u64> = run.runs.iter().map(|r| r.account_id.get()).collect();
        assert_eq!(ids, vec![7, 8, 9, 10]);
        assert!(matches!(run.runs[0].status, AccountRunStatus::Failed(ReportError::CatalogUnavailable { .. })));
        assert!(matches!(&run.runs[1].status, AccountRunStatus::Panicked(msg) if msg.contains("ledger corrupted")));
        assert!(matches!(run.runs[2].status, AccountRunStatus::Sent(_)));
        assert!(matches!(run.runs[3].status, AccountRunStatus::Failed(ReportError::NoRecipients { .. })));
        assert_eq!(run.succeeded(), 1);
        assert_eq!(run.failed(), 3);

        assert_eq!(log.for_account(AccountId::new(9)).len(), 2);
        assert!(log.for_account(AccountId::new(7)).is_empty());
    }

    #[test]
    fn spawned_scheduler_runs_on_startup_and_shuts_down() {
        let repo = Arc::new(InMemoryRepository::new());
        seed(&repo, 11);
        let log = Arc::new(InMemoryDeliveryLog::new());
        let assembler = Arc::new(assembler(
            ReportSources::from_shared(repo.clone()),
            Arc::new(InMemoryMailer::new()),
            log.clone(),
        ));
        let config = ReportingConfig::default().with_interval(Duration::from_secs(3600));
        let handle = ReportScheduler::new(assembler, repo, config)
            .spawn("report-scheduler-test")
            .unwrap();

        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while handle.last_run().is_none() && std::time::Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }

        let run = handle.last_run().expect("startup run should complete");
        assert_eq!(run.runs.len(), 2);
        assert_eq!(run.succeeded(), 2);
        handle.shutdown();

        // Two report kinds × two recipients.
        assert_eq!(log.all().len(), 4);
    }

    #[test]
    fn triggered_scheduler_runs_again_before_the_interval() {
        let repo = Arc::new(InMemoryRepository::new());
        seed(&repo, 12);
        let log = Arc::new(InMemoryDeliveryLog::new());
        let assembler = Arc::new(assembler(
            ReportSources::from_shared(repo.clone()),
            Arc::new(InMemoryMailer::new()),
            log.clone(),
        ));
        let config = ReportingConfig::default().with_interval(Duration::from_secs(3600));
        let handle = ReportScheduler::new(assembler, repo, config)
            .spawn("report-scheduler-trigger")
            .unwrap();

        let wait_for = |count: usize| {
            let deadline = std::time::Instant::now() + Duration::from_secs(5);
            while log.all().len() < count && std::time::Instant::now() < deadline {
                std::thread::sleep(Duration::from_millis(10));
            }
        };

        wait_for(4);
        handle.trigger();
        wait_for(8);
        handle.shutdown();

        assert_eq!(log.all().len(), 8);
    }
}
