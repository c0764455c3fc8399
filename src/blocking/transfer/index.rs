use crate::blocking::DocumentStore;
use crate::error::{Result, StoreError, StoreResult, SyncError};
use crate::{ID_KEY, INDEX_COLL, NAMESPACE_KEY};
use bson::Bson;
use tracing::{debug, info};

/// Rewrite index namespace `ns` from database `from` to database `to`.
///
/// # Example
/// ```
/// use mongo_transfer::blocking::transfer::rewrite_namespace;
/// assert_eq!(rewrite_namespace("app.users", "app", "app_copy"), "app_copy.users");
/// // only the database part is touched.
/// assert_eq!(rewrite_namespace("app.apps", "app", "prod"), "prod.apps");
/// ```
pub fn rewrite_namespace(ns: &str, from: &str, to: &str) -> String {
    match ns.strip_prefix(from).and_then(|rest| rest.strip_prefix('.')) {
        Some(coll) => format!("{}.{}", to, coll),
        None => ns.replacen(from, to, 1),
    }
}

/// Copy index records from `source` to `destination`, return how many records are copied.
///
/// Records without an identity field are markers emitted by the storage engine, they are skipped.
pub fn sync_indexes(source: &dyn DocumentStore, destination: &dyn DocumentStore) -> Result<usize> {
    copy_index_records(source, destination).map_err(|e| SyncError::IndexSyncError { source: e })
}

fn copy_index_records(
    source: &dyn DocumentStore,
    destination: &dyn DocumentStore,
) -> StoreResult<usize> {
    let (from, to) = (source.database_name(), destination.database_name());
    let mut count = 0;
    for record in source.find_all(INDEX_COLL)? {
        let mut record = record?;
        if !record.contains_key(ID_KEY) {
            debug!(?record, "Skip index record without identity. ");
            continue;
        }
        let ns = record.get_str(NAMESPACE_KEY).map_err(StoreError::from)?;
        let ns = rewrite_namespace(ns, from, to);
        record.insert(NAMESPACE_KEY, Bson::String(ns));
        destination.insert(INDEX_COLL, &record)?;
        count += 1;
    }
    info!(count, from, to, "Index records synced. ");
    Ok(count)
}
