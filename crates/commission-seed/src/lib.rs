//! Seed data loader for the commissions collection.
//!
//! Builds a deterministic set of commission records for one subject and
//! inserts them one at a time, reporting per-record outcomes.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use commission_seed::prelude::*;
//!
//! let generator = CommissionGenerator::default();
//! let records = generator.build_records("user-123");
//!
//! let report = Seeder::new(collection).insert_all(&records).await;
//! println!("{}", report.summary("user-123"));
//! ```

pub mod config;
pub mod db;
pub mod generators;
pub mod run;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::config::{DEFAULT_SUBJECT_ID, SeedConfig};
    pub use crate::db::{CommissionSink, SeedReport, Seeder};
    pub use crate::generators::{CommissionGenConfig, CommissionGenerator};
    pub use commissions::{
        CommissionKind, CommissionRecord, CommissionStatus, ConnectionManager, StoreConfig,
        StoreError,
    };
}
