//! Outcome of a seeding run.

use std::fmt;

use mongodb::bson::Bson;
use rust_decimal::Decimal;

use commissions::{CommissionRecord, StoreError};

/// A record the store accepted.
#[derive(Debug, Clone)]
pub struct InsertedCommission {
    pub commission_id: String,
    /// Identifier assigned by the store.
    pub id: Bson,
}

/// A record that was not inserted.
#[derive(Debug)]
pub struct FailedCommission {
    pub commission_id: String,
    pub error: StoreError,
}

/// Aggregate result of [`Seeder::insert_all`](super::Seeder::insert_all).
///
/// `succeeded + failed() == attempted` always holds, and `total_amount`
/// only counts succeeded records.
#[derive(Debug, Default)]
pub struct SeedReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub total_amount: Decimal,
    pub inserted: Vec<InsertedCommission>,
    pub failures: Vec<FailedCommission>,
}

impl SeedReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub(crate) fn record_success(&mut self, record: &CommissionRecord, id: Bson) {
        self.attempted += 1;
        self.succeeded += 1;
        self.total_amount += record.amount;
        self.inserted.push(InsertedCommission {
            commission_id: record.commission_id.clone(),
            id,
        });
    }

    pub(crate) fn record_failure(&mut self, record: &CommissionRecord, error: StoreError) {
        self.attempted += 1;
        self.failures.push(FailedCommission {
            commission_id: record.commission_id.clone(),
            error,
        });
    }

    /// Plain-text summary block for `subject_id`.
    pub fn summary<'a>(&'a self, subject_id: &'a str) -> SeedSummary<'a> {
        SeedSummary {
            report: self,
            subject_id,
        }
    }
}

pub struct SeedSummary<'a> {
    report: &'a SeedReport,
    subject_id: &'a str,
}

impl fmt::Display for SeedSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.report.total_amount.round_dp(2);

        writeln!(f, "=== Test commissions seeded ===")?;
        writeln!(f, "Subject: {}", self.subject_id)?;
        writeln!(f, "Commissions inserted: {}", self.report.succeeded)?;
        if self.report.failed() > 0 {
            writeln!(f, "Commissions failed: {}", self.report.failed())?;
        }
        writeln!(f, "Total commission amount: {total:.2}")?;
        writeln!(f, "The subject can now withdraw up to {total:.2}.")?;
        writeln!(f)?;
        write!(f, "Retry the 0.01 withdrawal request to verify.")
    }
}
