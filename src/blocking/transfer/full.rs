use super::progress::{progress_step, Progress};
use crate::blocking::{DocumentStore, DocumentStream};
use crate::error::{Result, StoreError, SyncError};
use tracing::info;

/// Full copy of one collection, from source store to destination store.
///
/// [CollectionCopy::start] re-creates the destination collection, then the copy is driven
/// as an iterator: every call to `next` moves exactly one document and yields the
/// resulting [Progress].  It stops after the source cursor is exhausted, or after the
/// first error.
///
/// ```no_run
/// # use mongo_transfer::{CollectionCopy, DocumentStore, Result};
/// # fn copy(source: &dyn DocumentStore, destination: &dyn DocumentStore) -> Result<()> {
/// for progress in CollectionCopy::start(source, destination, "users")? {
///     let progress = progress?;
///     if progress.should_report() {
///         println!("{:.2}%", progress.percentage());
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct CollectionCopy<'a> {
    name: String,
    destination: &'a dyn DocumentStore,
    cursor: DocumentStream<'a>,
    copied: u64,
    total: u64,
    step: u64,
    failed: bool,
}

impl<'a> CollectionCopy<'a> {
    /// Drop and re-create collection `name` on `destination`, then open a cursor on `source`.
    pub fn start(
        source: &'a dyn DocumentStore,
        destination: &'a dyn DocumentStore,
        name: &str,
    ) -> Result<CollectionCopy<'a>> {
        let copy_error = |e: StoreError| SyncError::CopyError {
            collection: name.to_string(),
            source: e,
        };

        destination.drop_collection(name).map_err(copy_error)?;
        destination.create_collection(name).map_err(copy_error)?;

        let total = source.estimated_count(name).map_err(copy_error)?;
        let cursor = source.find_all(name).map_err(copy_error)?;
        info!(collection = name, total, "Begin to copy collection. ");

        Ok(CollectionCopy {
            name: name.to_string(),
            destination,
            cursor,
            copied: 0,
            total,
            step: progress_step(total),
            failed: false,
        })
    }

    /// collection being copied.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// documents copied so far.
    pub fn documents_copied(&self) -> u64 {
        self.copied
    }

    fn copy_next(&mut self) -> Option<std::result::Result<Progress, StoreError>> {
        let doc = match self.cursor.next()? {
            Ok(doc) => doc,
            Err(e) => return Some(Err(e)),
        };
        if let Err(e) = self.destination.insert(&self.name, &doc) {
            return Some(Err(e));
        }
        self.copied += 1;
        Some(Ok(Progress::new(
            &self.name,
            self.copied,
            self.total,
            self.step,
        )))
    }
}

impl Iterator for CollectionCopy<'_> {
    type Item = Result<Progress>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.copy_next()? {
            Ok(progress) => Some(Ok(progress)),
            Err(e) => {
                self.failed = true;
                Some(Err(SyncError::CopyError {
                    collection: self.name.clone(),
                    source: e,
                }))
            }
        }
    }
}
