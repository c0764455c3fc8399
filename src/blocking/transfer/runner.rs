use super::full::CollectionCopy;
use super::index::sync_indexes;
use super::progress::Reporter;
use crate::blocking::{Connector, DocumentStore};
use crate::error::{ErrorKind, Result, SyncError};
use crate::{should_sync, CollectionSelector, Endpoint};
use tracing::{debug, error, info};

/// Which way data flows between the local and the remote database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// replace remote database with local database.
    Push,
    /// replace local database with remote database.
    Pull,
}

/// What to transfer: from `source` to `destination`, restricted by `selector`.
#[derive(Debug, Clone)]
pub struct TransferPlan {
    source: Endpoint,
    destination: Endpoint,
    selector: CollectionSelector,
}

impl TransferPlan {
    /// create a plan which moves data in `direction` between `local` and `remote`.
    pub fn new(
        direction: Direction,
        local: Endpoint,
        remote: Endpoint,
        selector: CollectionSelector,
    ) -> TransferPlan {
        let (source, destination) = match direction {
            Direction::Push => (local, remote),
            Direction::Pull => (remote, local),
        };
        TransferPlan {
            source,
            destination,
            selector,
        }
    }

    /// database to read from.
    pub fn source(&self) -> &Endpoint {
        &self.source
    }

    /// database to replace.
    pub fn destination(&self) -> &Endpoint {
        &self.destination
    }

    /// collection selector.
    pub fn selector(&self) -> &CollectionSelector {
        &self.selector
    }

    /// Check the plan before anything is connected.
    pub fn validate(&self) -> Result<()> {
        if self.source.same_target(&self.destination) {
            return Err(SyncError::SameEndpoint {
                endpoint: self.source.to_string(),
            });
        }
        self.selector.validate()
    }
}

/// Where a [Transfer] currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferState {
    /// nothing happened yet.
    Idle,
    /// checking the plan.
    Validating,
    /// connecting to source database.
    ConnectingSource,
    /// connecting to destination database.
    ConnectingDestination,
    /// copying the i-th selected collection.
    CopyingCollections(usize),
    /// copying index records.
    SyncingIndexes,
    /// transfer complete.
    Done,
    /// transfer stopped by an error of given kind.
    Failed(ErrorKind),
}

/// Outcome of a complete transfer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferSummary {
    /// copied collections with their document counts, in copy order.
    pub collections: Vec<(String, u64)>,
    /// number of copied index records.
    pub indexes: usize,
}

/// Drives one transfer: validate, connect both sides, copy collections, then sync indexes.
///
/// Connections are opened by the `connector` for each run and dropped when it ends.
pub struct Transfer<C, R> {
    connector: C,
    reporter: R,
    state: TransferState,
}

impl<C: Connector, R: Reporter> Transfer<C, R> {
    /// create a transfer which connects with `connector` and reports to `reporter`.
    pub fn new(connector: C, reporter: R) -> Self {
        Transfer {
            connector,
            reporter,
            state: TransferState::Idle,
        }
    }

    /// current state.
    pub fn state(&self) -> &TransferState {
        &self.state
    }

    /// get connector.
    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// get reporter.
    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Run `plan` to the end.
    ///
    /// The first error stops the transfer, destination collections copied before it are left as is.
    pub fn run(&mut self, plan: &TransferPlan) -> Result<TransferSummary> {
        match self.run_inner(plan) {
            Ok(summary) => {
                self.enter(TransferState::Done);
                Ok(summary)
            }
            Err(e) => {
                error!(?e, state = ?self.state, "Transfer failed. ");
                self.enter(TransferState::Failed(e.kind()));
                Err(e)
            }
        }
    }

    fn run_inner(&mut self, plan: &TransferPlan) -> Result<TransferSummary> {
        self.enter(TransferState::Validating);
        plan.validate()?;

        self.enter(TransferState::ConnectingSource);
        let source = self.connector.connect(plan.source())?;
        self.enter(TransferState::ConnectingDestination);
        let destination = self.connector.connect(plan.destination())?;

        let coll_names: Vec<String> = source
            .collection_names()
            .map_err(|e| SyncError::CopyError {
                collection: "*".to_string(),
                source: e,
            })?
            .into_iter()
            .filter(|name| should_sync(name, plan.selector()))
            .collect();
        info!(collections = ?coll_names, "Collections to sync. ");

        let mut summary = TransferSummary::default();
        for (i, coll) in coll_names.iter().enumerate() {
            self.enter(TransferState::CopyingCollections(i));
            let copied = self.copy_collection(&source, &destination, coll)?;
            summary.collections.push((coll.clone(), copied));
        }

        self.enter(TransferState::SyncingIndexes);
        self.reporter.indexes_started();
        summary.indexes = sync_indexes(&source, &destination)?;
        self.reporter.indexes_done(summary.indexes);

        info!(?summary, "Transfer complete. ");
        Ok(summary)
    }

    fn copy_collection(
        &mut self,
        source: &dyn DocumentStore,
        destination: &dyn DocumentStore,
        name: &str,
    ) -> Result<u64> {
        let mut copy = CollectionCopy::start(source, destination, name)?;
        for progress in &mut copy {
            let progress = progress?;
            if progress.should_report() {
                self.reporter.progress(&progress);
            }
        }
        let copied = copy.documents_copied();
        self.reporter.collection_done(name, copied);
        info!(collection = name, copied, "Copy collection complete. ");
        Ok(copied)
    }

    fn enter(&mut self, state: TransferState) {
        debug!(from = ?self.state, to = ?state, "Transfer state changed. ");
        self.state = state;
    }
}
