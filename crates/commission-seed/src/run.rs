//! A complete seeding run: connect, build, insert, close.

use time::OffsetDateTime;
use tracing::info_span;

use commissions::{CommissionRecord, ConnectionManager, StoreConfig, StoreError};

use crate::config::SeedConfig;
use crate::db::{SeedReport, Seeder};

/// Seeds the records described by `config` into the store described by `store`.
///
/// Connection failures abort the run before anything is inserted. Once
/// connected, the run always completes with a report, and the connection is
/// closed on every path.
pub async fn seed(store: &StoreConfig, config: &SeedConfig) -> Result<SeedReport, StoreError> {
    let mut manager = ConnectionManager::new();
    let result = seed_with(&mut manager, store, config).await;
    manager.close().await;
    result
}

async fn seed_with(
    manager: &mut ConnectionManager,
    store: &StoreConfig,
    config: &SeedConfig,
) -> Result<SeedReport, StoreError> {
    manager.connect(store).await?;
    let collection = manager.collection::<CommissionRecord>(&config.collection)?;

    let records = config.build_records(OffsetDateTime::now_utc());
    let span = info_span!(
        "seed",
        subject = %config.subject_id,
        collection = %config.collection
    );

    Ok(Seeder::new(collection)
        .with_span(span)
        .insert_all(&records)
        .await)
}
