//! Commission records and the store connection they are written through.

pub mod config;
pub mod database;
pub mod errors;
pub mod models;

pub use config::StoreConfig;
pub use database::ConnectionManager;
pub use errors::StoreError;
pub use models::{COMMISSIONS_COLLECTION, CommissionKind, CommissionRecord, CommissionStatus};
