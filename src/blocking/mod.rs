/// provide mongo transfer blocking apis.
mod connection;
#[doc(hidden)]
pub mod transfer;

pub use connection::{Connector, DocumentStore, DocumentStream, MongoConnector, MongoStore};
pub use transfer::{
    CollectionCopy, ConsoleReporter, Direction, Progress, Reporter, Transfer, TransferPlan,
    TransferState, TransferSummary,
};
