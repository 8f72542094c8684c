//! Database integration for seeding commissions.
//!
//! The [`Seeder`] inserts records one at a time through a [`CommissionSink`]
//! and aggregates the outcome into a [`SeedReport`].

mod report;
mod seeder;

pub use report::{FailedCommission, InsertedCommission, SeedReport, SeedSummary};
pub use seeder::{CommissionSink, Seeder};
