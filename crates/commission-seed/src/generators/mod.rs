//! Record generators for seeding.
//!
//! - [`CommissionGenerator`]: the built-in commission set, or seeded random batches

pub mod commission;

pub use commission::{BUILTIN_COUNT, CommissionGenConfig, CommissionGenerator};
