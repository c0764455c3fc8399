//! Decide which collections take part in a transfer.
use crate::{Result, SyncError, SYSTEM_PREFIX};
use std::collections::BTreeSet;

/// Include/exclude filter applied to source collection names.
///
/// At most one of `except` and `only` may be non-empty, see [CollectionSelector::validate].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionSelector {
    except: BTreeSet<String>,
    only: BTreeSet<String>,
}

impl CollectionSelector {
    /// create a selector from `except` and `only` collection names.
    pub fn new<E, O>(except: E, only: O) -> Self
    where
        E: IntoIterator<Item = String>,
        O: IntoIterator<Item = String>,
    {
        CollectionSelector {
            except: except.into_iter().collect(),
            only: only.into_iter().collect(),
        }
    }

    /// collections which should never be synced.
    pub fn except(&self) -> &BTreeSet<String> {
        &self.except
    }

    /// collections which should be synced, empty means all.
    pub fn only(&self) -> &BTreeSet<String> {
        &self.only
    }

    /// Reject selector which gives both `except` and `only` collections.
    pub fn validate(&self) -> Result<()> {
        if !self.except.is_empty() && !self.only.is_empty() {
            return Err(SyncError::ConflictingSelectors);
        }
        Ok(())
    }
}

/// Check if collection `name` should be synced under given `selector`.
///
/// Reserved `system.*` collections are never synced.
///
/// # Example
/// ```
/// use mongo_transfer::{should_sync, CollectionSelector};
///
/// let selector = CollectionSelector::new(vec!["logs".to_string()], vec![]);
/// assert!(should_sync("users", &selector));
/// assert!(!should_sync("logs", &selector));
/// assert!(!should_sync("system.profile", &selector));
/// ```
pub fn should_sync(name: &str, selector: &CollectionSelector) -> bool {
    if name.starts_with(SYSTEM_PREFIX) {
        return false;
    }
    if !selector.except.is_empty() && selector.except.contains(name) {
        return false;
    }
    if !selector.only.is_empty() && !selector.only.contains(name) {
        return false;
    }
    true
}
