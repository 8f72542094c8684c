//! Seeds test commissions for one subject.
//!
//! Run with:
//! ```text
//! MONGODB_URL=mongodb://localhost/miniprogram_db \
//!     cargo run -p commission-seed --bin seed -- --subject user-123
//! ```

use anyhow::Context;
use clap::Parser;
use commission_seed::config::{DEFAULT_SUBJECT_ID, SeedConfig};
use commissions::{COMMISSIONS_COLLECTION, StoreConfig};
use tracing_subscriber::EnvFilter;

/// Insert test commission records for a subject
#[derive(Parser, Debug)]
#[command(name = "seed")]
#[command(version, about, long_about = None)]
struct Args {
    /// Subject the commissions are credited to
    #[arg(short, long, env = "SEED_SUBJECT_ID", default_value = DEFAULT_SUBJECT_ID)]
    subject: String,

    /// Target collection
    #[arg(long, default_value = COMMISSIONS_COLLECTION)]
    collection: String,

    /// Number of records to insert (defaults to the built-in set)
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Generate a random batch from this seed instead of the built-in templates
    #[arg(long)]
    seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,
}

impl Args {
    fn into_config(self) -> SeedConfig {
        SeedConfig {
            subject_id: self.subject,
            collection: self.collection,
            count: self.count,
            seed: self.seed,
        }
    }
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_logging(args.log_level.as_deref());

    let store = StoreConfig::from_env().context("Failed to load store configuration")?;
    let config = args.into_config();

    let report = commission_seed::run::seed(&store, &config)
        .await
        .context("Seeding aborted")?;

    if report.failed() > 0 {
        tracing::warn!(
            "{} of {} commissions were not inserted",
            report.failed(),
            report.attempted
        );
    }

    println!();
    println!("{}", report.summary(&config.subject_id));

    Ok(())
}
