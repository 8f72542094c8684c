use std::future::IntoFuture;

use mongodb::bson::doc;
use mongodb::error::ErrorKind;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use secrecy::ExposeSecret;
use tracing::{debug, info, warn};

use crate::config::{MONGODB_DATABASE_NAME, MONGODB_URL, StoreConfig};
use crate::errors::StoreError;

struct Connection {
    client: Client,
    database: Database,
}

/// Owns the store connection for the lifetime of a run.
///
/// `collection` is only available between a successful `connect` and `close`.
#[derive(Default)]
pub struct ConnectionManager {
    connection: Option<Connection>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a connection and verifies it with a `ping`.
    ///
    /// URI resolution (SRV/TXT lookups for `mongodb+srv://`) and the ping are
    /// each bounded by `config.timeout`. Connecting again replaces the
    /// previous connection.
    pub async fn connect(&mut self, config: &StoreConfig) -> Result<(), StoreError> {
        let redacted = config.redacted_url();
        debug!("Connecting to MongoDB at {redacted}");

        let mut options = parse_options(config).await?;

        let database_name = config
            .database_name
            .clone()
            .or_else(|| options.default_database.clone())
            .ok_or_else(|| {
                StoreError::Config(format!(
                    "no database in {MONGODB_URL} and {MONGODB_DATABASE_NAME} is not set"
                ))
            })?;

        options.server_selection_timeout = Some(config.timeout);
        options.connect_timeout = Some(config.timeout);

        let client = Client::with_options(options).map_err(StoreError::Connection)?;

        let admin = client.database("admin");
        let ping = admin.run_command(doc! { "ping": 1 }).into_future();
        match tokio::time::timeout(config.timeout, ping).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                warn!("MongoDB connection failed: {e}");
                return Err(StoreError::Connection(e));
            }
            Err(_) => {
                warn!("MongoDB connection timed out after {:?}", config.timeout);
                return Err(StoreError::ConnectTimeout(config.timeout));
            }
        }

        info!("Connected to MongoDB at {redacted}, database {database_name}");

        let database = client.database(&database_name);
        if let Some(previous) = self.connection.replace(Connection { client, database }) {
            previous.client.shutdown().await;
        }

        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Name of the connected database.
    pub fn database_name(&self) -> Option<&str> {
        self.connection.as_ref().map(|c| c.database.name())
    }

    /// Returns a typed handle to the named collection.
    pub fn collection<T>(&self, name: &str) -> Result<Collection<T>, StoreError>
    where
        T: Send + Sync,
    {
        self.connection
            .as_ref()
            .map(|c| c.database.collection::<T>(name))
            .ok_or(StoreError::NotInitialized)
    }

    /// Releases the connection. Does nothing when not connected.
    pub async fn close(&mut self) {
        if let Some(connection) = self.connection.take() {
            connection.client.shutdown().await;
            info!("MongoDB connection closed");
        }
    }
}

/// Parses the URI. Only malformed URIs are configuration errors; a failed
/// DNS lookup means the store is unreachable.
async fn parse_options(config: &StoreConfig) -> Result<ClientOptions, StoreError> {
    let parse = ClientOptions::parse(config.url.expose_secret().as_str()).into_future();

    match tokio::time::timeout(config.timeout, parse).await {
        Ok(Ok(options)) => Ok(options),
        Ok(Err(e)) if matches!(*e.kind, ErrorKind::InvalidArgument { .. }) => {
            Err(StoreError::Config(format!("invalid {MONGODB_URL}: {e}")))
        }
        Ok(Err(e)) => {
            warn!("MongoDB address resolution failed: {e}");
            Err(StoreError::Connection(e))
        }
        Err(_) => {
            warn!("MongoDB address resolution timed out after {:?}", config.timeout);
            Err(StoreError::ConnectTimeout(config.timeout))
        }
    }
}
