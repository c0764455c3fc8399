use crate::error::{Result, StoreError, StoreResult, SyncError};
use crate::Endpoint;
use bson::{doc, Document};
use mongodb::options::{ClientOptions, Credential, ServerAddress};
use mongodb::sync::{Client, Collection, Database};
use std::time::Duration;
use tracing::{debug, info};

/// Lazy stream of documents read from one collection.
pub type DocumentStream<'a> = Box<dyn Iterator<Item = StoreResult<Document>> + 'a>;

/// Database operations needed to transfer collections and indexes.
///
/// [MongoStore] is the real implementation, which works against a mongodb server.
pub trait DocumentStore {
    /// name of the underlying database.
    fn database_name(&self) -> &str;

    /// names of all collections in database, reserved collections included.
    fn collection_names(&self) -> StoreResult<Vec<String>>;

    /// drop collection `name`, it's ok if the collection doesn't exist.
    fn drop_collection(&self, name: &str) -> StoreResult<()>;

    /// create an empty collection `name`.
    fn create_collection(&self, name: &str) -> StoreResult<()>;

    /// estimated number of documents in collection `name`.
    fn estimated_count(&self, name: &str) -> StoreResult<u64>;

    /// iterate all documents of collection `name` in the server's natural order.
    fn find_all(&self, name: &str) -> StoreResult<DocumentStream<'_>>;

    /// insert `doc` into collection `name` unmodified.
    fn insert(&self, name: &str, doc: &Document) -> StoreResult<()>;
}

/// Opens a [DocumentStore] for an [Endpoint].
pub trait Connector {
    /// store type returned by this connector.
    type Store: DocumentStore;

    /// connect to `endpoint`, and authenticate when it carries credentials.
    ///
    /// Blocks until the server answers, so a returned store is always usable.
    fn connect(&mut self, endpoint: &Endpoint) -> Result<Self::Store>;
}

/// Connects to real mongodb servers with the blocking driver.
#[derive(Debug, Clone)]
pub struct MongoConnector {
    timeout: Duration,
}

impl MongoConnector {
    /// create a connector which gives up connecting after `timeout`.
    pub fn new(timeout: Duration) -> Self {
        MongoConnector { timeout }
    }

    fn client_options(&self, endpoint: &Endpoint) -> ClientOptions {
        let credential = endpoint.username().map(|username| {
            Credential::builder()
                .username(username.to_string())
                .password(endpoint.password().map(str::to_string))
                .source(endpoint.database().to_string())
                .build()
        });
        ClientOptions::builder()
            .hosts(vec![ServerAddress::Tcp {
                host: endpoint.host().to_string(),
                port: Some(endpoint.port()),
            }])
            .credential(credential)
            .connect_timeout(self.timeout)
            .server_selection_timeout(self.timeout)
            .build()
    }
}

impl Default for MongoConnector {
    fn default() -> Self {
        MongoConnector::new(Duration::from_secs(30))
    }
}

impl Connector for MongoConnector {
    type Store = MongoStore;

    fn connect(&mut self, endpoint: &Endpoint) -> Result<MongoStore> {
        let failed = |e: StoreError| SyncError::ConnectionFailed {
            host: endpoint.host().to_string(),
            port: endpoint.port(),
            source: e,
        };

        debug!(%endpoint, "Connecting to mongodb server. ");
        let client = Client::with_options(self.client_options(endpoint))
            .map_err(|e| failed(e.into()))?;
        let db = client.database(endpoint.database());
        // driver connects lazily, ping forces connection and authentication.
        db.run_command(doc! {"ping": 1}, None)
            .map_err(|e| failed(e.into()))?;
        info!(%endpoint, "Connected to mongodb server. ");

        Ok(MongoStore { _client: client, db })
    }
}

/// A [DocumentStore] backed by one database on a mongodb server.
pub struct MongoStore {
    // keeps the connection pool alive as long as the store.
    _client: Client,
    db: Database,
}

impl MongoStore {
    fn coll(&self, name: &str) -> Collection<Document> {
        self.db.collection(name)
    }
}

impl DocumentStore for MongoStore {
    fn database_name(&self) -> &str {
        self.db.name()
    }

    fn collection_names(&self) -> StoreResult<Vec<String>> {
        Ok(self.db.list_collection_names(None)?)
    }

    fn drop_collection(&self, name: &str) -> StoreResult<()> {
        Ok(self.coll(name).drop(None)?)
    }

    fn create_collection(&self, name: &str) -> StoreResult<()> {
        Ok(self.db.create_collection(name, None)?)
    }

    fn estimated_count(&self, name: &str) -> StoreResult<u64> {
        Ok(self.coll(name).estimated_document_count(None)?)
    }

    fn find_all(&self, name: &str) -> StoreResult<DocumentStream<'_>> {
        let cursor = self.coll(name).find(None, None)?;
        Ok(Box::new(cursor.map(|doc| doc.map_err(StoreError::from))))
    }

    fn insert(&self, name: &str, doc: &Document) -> StoreResult<()> {
        self.coll(name).insert_one(doc, None)?;
        Ok(())
    }
}
