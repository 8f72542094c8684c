//! Database seeding utilities.

use async_trait::async_trait;
use mongodb::Collection;
use mongodb::bson::Bson;
use tracing::{Instrument, Span, error, info, info_span};

use commissions::{CommissionRecord, StoreError};

use super::report::SeedReport;

/// Destination for seeded commissions.
#[async_trait]
pub trait CommissionSink: Send + Sync {
    /// Inserts one record and returns the identifier the store assigned.
    async fn insert(&self, record: &CommissionRecord) -> Result<Bson, StoreError>;
}

#[async_trait]
impl CommissionSink for Collection<CommissionRecord> {
    async fn insert(&self, record: &CommissionRecord) -> Result<Bson, StoreError> {
        let result = self
            .insert_one(record)
            .await
            .map_err(|e| StoreError::insert(&record.commission_id, e))?;

        Ok(result.inserted_id)
    }
}

/// Inserts commissions one at a time, tolerating per-record failures.
pub struct Seeder<S> {
    sink: S,
    span: Span,
}

impl<S: CommissionSink> Seeder<S> {
    /// Creates a new seeder writing to `sink`.
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            span: info_span!("seed"),
        }
    }

    /// Sets the span insert logs are recorded under.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Inserts `records` in order.
    ///
    /// A failed record is logged and counted, then the run moves on to the
    /// next one. Nothing is retried or rolled back.
    pub async fn insert_all(&self, records: &[CommissionRecord]) -> SeedReport {
        self.insert_each(records)
            .instrument(self.span.clone())
            .await
    }

    async fn insert_each(&self, records: &[CommissionRecord]) -> SeedReport {
        info!("Seeding {} commissions...", records.len());

        let mut report = SeedReport::default();
        for record in records {
            match self.insert_one(record).await {
                Ok(id) => {
                    info!(
                        "Added commission {}: amount {:.2}, status {}",
                        record.commission_id,
                        record.amount,
                        record.status.as_str()
                    );
                    report.record_success(record, id);
                }
                Err(e) => {
                    error!("Failed to insert commission {}: {e}", record.commission_id);
                    report.record_failure(record, e);
                }
            }
        }

        info!(
            "Seeded {}/{} commissions, total {:.2}",
            report.succeeded, report.attempted, report.total_amount
        );
        report
    }

    async fn insert_one(&self, record: &CommissionRecord) -> Result<Bson, StoreError> {
        record.validate()?;
        self.sink.insert(record).await
    }

    /// Returns a reference to the sink for advanced usage.
    pub fn sink(&self) -> &S {
        &self.sink
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use mongodb::bson::oid::ObjectId;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use time::OffsetDateTime;

    use super::*;
    use crate::generators::CommissionGenerator;

    /// In-memory sink that fails on the configured commission ids.
    #[derive(Default)]
    struct MemorySink {
        fail_on: HashSet<String>,
        stored: Mutex<Vec<CommissionRecord>>,
    }

    impl MemorySink {
        fn failing_on(ids: &[&str]) -> Self {
            Self {
                fail_on: ids.iter().map(|id| id.to_string()).collect(),
                ..Self::default()
            }
        }

        fn stored_ids(&self) -> Vec<String> {
            self.stored
                .lock()
                .unwrap()
                .iter()
                .map(|r| r.commission_id.clone())
                .collect()
        }
    }

    #[async_trait]
    impl CommissionSink for MemorySink {
        async fn insert(&self, record: &CommissionRecord) -> Result<Bson, StoreError> {
            if self.fail_on.contains(&record.commission_id) {
                return Err(StoreError::insert(&record.commission_id, "simulated failure"));
            }
            self.stored.lock().unwrap().push(record.clone());
            Ok(Bson::ObjectId(ObjectId::new()))
        }
    }

    fn builtin_records() -> Vec<CommissionRecord> {
        CommissionGenerator::new(OffsetDateTime::from_unix_timestamp(1_760_000_000).unwrap())
            .build_records("user-123")
    }

    #[tokio::test]
    async fn test_builtin_set_all_succeed() {
        let seeder = Seeder::new(MemorySink::default());
        let report = seeder.insert_all(&builtin_records()).await;

        assert_eq!(report.attempted, 3);
        assert_eq!(report.succeeded, 3);
        assert_eq!(report.failed(), 0);
        assert_eq!(report.total_amount, dec!(1.75));
        assert_eq!(report.inserted.len(), 3);
        assert_eq!(
            seeder.sink().stored_ids(),
            vec!["test_commission_1", "test_commission_2", "test_commission_3"]
        );
    }

    #[tokio::test]
    async fn test_failed_insert_does_not_abort_run() {
        let seeder = Seeder::new(MemorySink::failing_on(&["test_commission_2"]));
        let report = seeder.insert_all(&builtin_records()).await;

        assert_eq!(report.attempted, 3);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.total_amount, dec!(1.25));
        assert_eq!(report.failures[0].commission_id, "test_commission_2");
        assert!(matches!(report.failures[0].error, StoreError::Insert { .. }));
        assert_eq!(
            seeder.sink().stored_ids(),
            vec!["test_commission_1", "test_commission_3"]
        );
    }

    #[tokio::test]
    async fn test_counts_hold_for_any_batch() {
        let records = CommissionGenerator::default()
            .with_count(10)
            .build_records("user-123");
        let seeder = Seeder::new(MemorySink::failing_on(&[
            "test_commission_1",
            "test_commission_4",
            "test_commission_10",
        ]));

        let report = seeder.insert_all(&records).await;

        assert_eq!(report.attempted, records.len());
        assert_eq!(report.succeeded + report.failed(), report.attempted);
        assert_eq!(report.succeeded, 7);

        let failing = ["test_commission_1", "test_commission_4", "test_commission_10"];
        let expected: Decimal = records
            .iter()
            .filter(|r| !failing.contains(&r.commission_id.as_str()))
            .map(|r| r.amount)
            .sum();
        assert_eq!(report.total_amount, expected);
    }

    #[tokio::test]
    async fn test_invalid_record_is_not_sent_to_sink() {
        let mut records = builtin_records();
        records[0].amount = dec!(-1.00);

        let seeder = Seeder::new(MemorySink::default());
        let report = seeder.insert_all(&records).await;

        assert_eq!(report.succeeded, 2);
        assert!(matches!(
            report.failures[0].error,
            StoreError::InvalidRecord { .. }
        ));
        assert_eq!(seeder.sink().stored_ids().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let seeder = Seeder::new(MemorySink::default());
        let report = seeder.insert_all(&[]).await;

        assert_eq!(report.attempted, 0);
        assert_eq!(report.total_amount, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_repeated_runs_insert_again() {
        let seeder = Seeder::new(MemorySink::default());
        let records = builtin_records();

        seeder.insert_all(&records).await;
        seeder.insert_all(&records).await;

        assert_eq!(seeder.sink().stored_ids().len(), 2 * records.len());
    }
}
