//! Commission record generation.

use fake::{Fake, faker::name::en::Name};
use rand::Rng;
use rust_decimal::Decimal;
use time::{Duration, OffsetDateTime};

use commissions::{CommissionRecord, CommissionStatus};

/// Number of records in the built-in set.
pub const BUILTIN_COUNT: usize = 3;

const REFERRED_SUBJECT_ID: &str = "test_referred_user";
const REFERRED_SUBJECT_NAME: &str = "Test Referred User";

/// One entry of the built-in set.
struct Template {
    amount_cents: i64,
    days_ago: i64,
    referral: bool,
}

const BUILTIN: [Template; BUILTIN_COUNT] = [
    Template {
        amount_cents: 100,
        days_ago: 5,
        referral: false,
    },
    Template {
        amount_cents: 50,
        days_ago: 3,
        referral: true,
    },
    Template {
        amount_cents: 25,
        days_ago: 1,
        referral: false,
    },
];

/// Configuration for random commission generation.
#[derive(Debug, Clone)]
pub struct CommissionGenConfig {
    /// Smallest amount, in cents.
    pub min_amount_cents: i64,
    /// Largest amount, in cents.
    pub max_amount_cents: i64,
    /// How far back a commission may have been earned.
    pub max_age_days: i64,
    /// Probability that a commission is a referral.
    pub referral_probability: f64,
    /// Distribution of statuses (pending, paid, cancelled).
    pub status_distribution: [f64; 3],
}

impl CommissionGenConfig {
    /// Clamps the bounds into ranges the generator can sample from.
    ///
    /// An inverted amount range collapses to its minimum, a negative age to
    /// zero, and the referral probability to `0.0..=1.0` (NaN becomes 0).
    pub fn normalized(mut self) -> Self {
        self.min_amount_cents = self.min_amount_cents.max(0);
        self.max_amount_cents = self.max_amount_cents.max(self.min_amount_cents);
        self.max_age_days = self.max_age_days.max(0);
        self.referral_probability = if self.referral_probability.is_nan() {
            0.0
        } else {
            self.referral_probability.clamp(0.0, 1.0)
        };
        self
    }
}

impl Default for CommissionGenConfig {
    fn default() -> Self {
        Self {
            min_amount_cents: 1,
            max_amount_cents: 10_000,
            max_age_days: 30,
            referral_probability: 0.3,
            status_distribution: [0.2, 0.7, 0.1],
        }
    }
}

/// Generates commission records for a subject.
///
/// All timestamps are offsets from a fixed reference time, so the output
/// depends only on the inputs.
pub struct CommissionGenerator {
    reference_time: OffsetDateTime,
    count: usize,
    config: CommissionGenConfig,
}

impl CommissionGenerator {
    /// Creates a generator producing the built-in set, dated relative to `reference_time`.
    pub fn new(reference_time: OffsetDateTime) -> Self {
        Self {
            reference_time: truncate_to_millis(reference_time),
            count: BUILTIN_COUNT,
            config: CommissionGenConfig::default(),
        }
    }

    /// Sets how many records `build_records` produces. The built-in templates repeat in order.
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Sets the configuration used by `generate_batch`. Out-of-range values are clamped.
    pub fn with_config(mut self, config: CommissionGenConfig) -> Self {
        self.config = config.normalized();
        self
    }

    pub fn reference_time(&self) -> OffsetDateTime {
        self.reference_time
    }

    /// Builds the fixed record set for `subject_id`.
    ///
    /// With the default count this is three paid commissions of 1.00, 0.50
    /// and 0.25 earned 5, 3 and 1 days before the reference time. The
    /// second one is a referral.
    pub fn build_records(&self, subject_id: &str) -> Vec<CommissionRecord> {
        BUILTIN
            .iter()
            .cycle()
            .take(self.count)
            .enumerate()
            .map(|(i, template)| self.from_template(subject_id, i + 1, template))
            .collect()
    }

    fn from_template(
        &self,
        subject_id: &str,
        number: usize,
        template: &Template,
    ) -> CommissionRecord {
        let occurred_at = self.reference_time - Duration::days(template.days_ago);
        let label = if template.referral {
            "referral commission"
        } else {
            "agent sales commission"
        };

        let record = CommissionRecord::new(
            format!("test_commission_{number}"),
            subject_id,
            Decimal::new(template.amount_cents, 2),
            occurred_at,
        )
        .with_status(CommissionStatus::Paid)
        .with_description(format!("Test commission record {number} - {label}"))
        .with_order_reference(order_reference(number));

        if template.referral {
            record.referred(REFERRED_SUBJECT_ID, Some(REFERRED_SUBJECT_NAME.to_string()))
        } else {
            record
        }
    }

    /// Generates a single random commission.
    pub fn generate(
        &self,
        subject_id: &str,
        number: usize,
        rng: &mut impl Rng,
    ) -> CommissionRecord {
        let cents = rng.gen_range(self.config.min_amount_cents..=self.config.max_amount_cents);
        let age = Duration::days(rng.gen_range(0..=self.config.max_age_days))
            + Duration::minutes(rng.gen_range(0..24 * 60));
        let status = self.generate_status(rng);

        let record = CommissionRecord::new(
            format!("test_commission_{number}"),
            subject_id,
            Decimal::new(cents, 2),
            self.reference_time - age,
        )
        .with_status(status)
        .with_order_reference(order_reference(number));

        if rng.gen_bool(self.config.referral_probability) {
            let name: String = Name().fake_with_rng(rng);
            record
                .with_description(format!("Referral commission for {name}"))
                .referred(format!("{REFERRED_SUBJECT_ID}_{number}"), Some(name))
        } else {
            record.with_description(format!(
                "Agent sales commission on {}",
                order_reference(number)
            ))
        }
    }

    /// Generates `count` random commissions for `subject_id`.
    pub fn generate_batch(
        &self,
        subject_id: &str,
        count: usize,
        rng: &mut impl Rng,
    ) -> Vec<CommissionRecord> {
        (1..=count).map(|n| self.generate(subject_id, n, rng)).collect()
    }

    /// Picks a status based on the configured distribution.
    fn generate_status(&self, rng: &mut impl Rng) -> CommissionStatus {
        let roll: f64 = rng.r#gen();
        let mut cumulative = 0.0;

        for (i, &weight) in self.config.status_distribution.iter().enumerate() {
            cumulative += weight;
            if roll < cumulative {
                return match i {
                    0 => CommissionStatus::Pending,
                    1 => CommissionStatus::Paid,
                    _ => CommissionStatus::Cancelled,
                };
            }
        }

        CommissionStatus::Paid
    }
}

impl Default for CommissionGenerator {
    fn default() -> Self {
        Self::new(OffsetDateTime::now_utc())
    }
}

fn order_reference(number: usize) -> String {
    format!("test_order_{number:03}")
}

/// Stored datetimes keep millisecond precision.
fn truncate_to_millis(value: OffsetDateTime) -> OffsetDateTime {
    value
        .replace_nanosecond(value.millisecond() as u32 * 1_000_000)
        .unwrap_or(value)
}
