//! Mongo transfer lib, which copies a whole mongodb database from one server to another.
//!
//! It is built around two named endpoints, a `local` database and a hosted `remote` one, and
//! supports both directions: [Direction::Push] replaces the remote database with the local one,
//! [Direction::Pull] replaces the local database with the remote one.
//!
//! Every selected collection on the destination side is dropped, re-created, and filled with
//! documents streamed from the source.  After that, index records are copied with their
//! namespace rewritten to the destination database.
//!
//! # Transfer example:
//! ```no_run
//! use std::collections::HashMap;
//! use mongo_transfer::{
//!     resolve_local, resolve_remote, CollectionSelector, ConsoleReporter, Direction,
//!     MongoConnector, Transfer, TransferPlan,
//! };
//!
//! let env: HashMap<String, String> = std::env::vars().collect();
//! let mut vars = HashMap::new();
//! vars.insert("MONGO_URL".to_string(), "mongodb://db.example.com:27017/app".to_string());
//!
//! let local = resolve_local("app", &env).unwrap();
//! let remote = resolve_remote("app", &vars).unwrap();
//! let plan = TransferPlan::new(Direction::Pull, local, remote, CollectionSelector::default());
//!
//! let mut transfer = Transfer::new(MongoConnector::default(), ConsoleReporter::default());
//! transfer.run(&plan).unwrap();
//! ```

#![warn(missing_docs)]

#[doc(hidden)]
pub mod blocking;
mod config;
mod endpoint;
mod error;
mod filter;

/// prefix of mongodb reserved collections, they are never transferred.
const SYSTEM_PREFIX: &str = "system.";
/// mongodb reserved collection which saves index records.
const INDEX_COLL: &str = "system.indexes";

/// index record namespace key name.
const NAMESPACE_KEY: &str = "ns";
/// document identity key name.
const ID_KEY: &str = "_id";

/// default mongodb port.
const DEFAULT_PORT: u16 = 27017;
/// host of the local database when no override is given.
const LOCAL_HOST: &str = "localhost";
/// legacy hosting hostname which should be rewritten before parsing.
const LEGACY_HOST_ALIAS: &str = "local.mongohq.com";
/// current form of [LEGACY_HOST_ALIAS].
const CURRENT_HOST_ALIAS: &str = "mongohq.com";

/// environment variable which overrides the local database url.
const LOCAL_URL_ENV: &str = "MONGO_URL";
/// config var keys holding the hosted database url, first match wins.
const REMOTE_URL_KEYS: [&str; 3] = ["MONGO_URL", "MONGOHQ_URL", "MONGOLAB_URI"];

pub use blocking::{
    CollectionCopy, ConsoleReporter, Direction, MongoConnector, MongoStore, Progress, Reporter,
    Transfer, TransferPlan, TransferState, TransferSummary,
};
pub use blocking::{Connector, DocumentStore, DocumentStream};
pub use config::RemoteConfig;
pub use endpoint::{normalize_alias, resolve_local, resolve_remote, Endpoint};
pub use error::{ErrorKind, Result, StoreError, StoreResult, SyncError};
pub use filter::{should_sync, CollectionSelector};
