//! Configuration types for commission seeding.

use rand::SeedableRng;
use rand::rngs::StdRng;
use time::OffsetDateTime;

use commissions::{COMMISSIONS_COLLECTION, CommissionRecord};

use crate::generators::{BUILTIN_COUNT, CommissionGenerator};

/// Subject the seed run targets when none is given.
pub const DEFAULT_SUBJECT_ID: &str = "oI0kY7byREWCaGvrN7hgWypKK-CM";

/// Configuration for a seeding run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedConfig {
    /// Beneficiary account the commissions are credited to.
    pub subject_id: String,

    /// Target collection.
    pub collection: String,

    /// Number of records. Defaults to the built-in set.
    pub count: Option<usize>,

    /// When set, records are a random batch drawn from a generator seeded with this value.
    pub seed: Option<u64>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            subject_id: DEFAULT_SUBJECT_ID.to_string(),
            collection: COMMISSIONS_COLLECTION.to_string(),
            count: None,
            seed: None,
        }
    }
}

impl SeedConfig {
    /// Builds the records this configuration describes, dated relative to `reference_time`.
    pub fn build_records(&self, reference_time: OffsetDateTime) -> Vec<CommissionRecord> {
        let count = self.count.unwrap_or(BUILTIN_COUNT);
        let generator = CommissionGenerator::new(reference_time);

        match self.seed {
            Some(seed) => {
                let mut rng = StdRng::seed_from_u64(seed);
                generator.generate_batch(&self.subject_id, count, &mut rng)
            }
            None => generator.with_count(count).build_records(&self.subject_id),
        }
    }
}
