use bson::document::ValueAccessError;
use mongodb::error::Error as MongoError;
use std::result::Result as StdResult;
use thiserror::Error;

/// Errors which make a transfer fail, none of them is retried.
#[derive(Error, Debug)]
pub enum SyncError {
    /// source and destination resolve to the same database.
    #[error("The destination and origin database cannot be the same: {endpoint}")]
    SameEndpoint {
        /// the endpoint both sides point to, without credentials.
        endpoint: String,
    },
    /// `except` and `only` selectors are both given.
    #[error("Only or Except collections can be given, not both")]
    ConflictingSelectors,
    /// none of the recognized config vars holds a mongodb url.
    #[error("Could not find the MONGO_URL for {app}")]
    ConfigurationMissing {
        /// application name.
        app: String,
    },
    /// config file can't be read.
    #[error("Read config file {path:?} failed")]
    ConfigRead {
        /// config file path.
        path: String,
        /// detailed io error.
        source: std::io::Error,
    },
    /// config file is not valid toml.
    #[error("Parse config file {path:?} failed")]
    ConfigFile {
        /// config file path.
        path: String,
        /// detailed toml error.
        source: toml::de::Error,
    },
    /// connection string can't be parsed into an endpoint.
    #[error("Invalid mongo url: {url}, {reason}")]
    InvalidEndpoint {
        /// connection string, credentials redacted.
        url: String,
        /// why it is invalid.
        reason: String,
    },
    /// network connection or authentication failed.
    #[error("Could not connect to the mongo server at {host}:{port}")]
    ConnectionFailed {
        /// attempted host.
        host: String,
        /// attempted port.
        port: u16,
        /// detailed error.
        source: StoreError,
    },
    /// drop, create or insert failed on one collection.
    #[error("Sync collection {collection:?} failed")]
    CopyError {
        /// collection being copied.
        collection: String,
        /// detailed error.
        source: StoreError,
    },
    /// copying index records failed.
    #[error("Sync indexes failed")]
    IndexSyncError {
        /// detailed error.
        source: StoreError,
    },
}

impl SyncError {
    /// get the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SyncError::SameEndpoint { .. }
            | SyncError::ConflictingSelectors
            | SyncError::ConfigurationMissing { .. }
            | SyncError::ConfigRead { .. }
            | SyncError::ConfigFile { .. } => ErrorKind::Configuration,
            SyncError::InvalidEndpoint { .. } => ErrorKind::InvalidEndpoint,
            SyncError::ConnectionFailed { .. } => ErrorKind::ConnectionFailed,
            SyncError::CopyError { .. } => ErrorKind::Copy,
            SyncError::IndexSyncError { .. } => ErrorKind::IndexSync,
        }
    }
}

/// Coarse classification of [SyncError].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// bad selectors, same endpoints, or missing config.
    Configuration,
    /// unparseable connection string.
    InvalidEndpoint,
    /// network or authentication failure.
    ConnectionFailed,
    /// collection copy failure.
    Copy,
    /// index sync failure.
    IndexSync,
}

/// Errors raised by a [DocumentStore](crate::DocumentStore) operation.
#[derive(Error, Debug)]
pub enum StoreError {
    /// error from mongodb driver.
    #[error("Mongodb operation error")]
    MongoError(#[from] MongoError),
    /// document doesn't have the expected field.
    #[error("Bson value access error")]
    BsonError(#[from] ValueAccessError),
    /// the store refused the operation.
    #[error("{0}")]
    Rejected(String),
}

/// Result type of transfer operations.
pub type Result<T> = StdResult<T, SyncError>;
/// Result type of [DocumentStore](crate::DocumentStore) operations.
pub type StoreResult<T> = StdResult<T, StoreError>;
