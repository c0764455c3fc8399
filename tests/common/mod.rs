//! In-memory stand-ins for mongodb servers, shared by integration tests.
#![allow(dead_code)]

use bson::{Bson, Document};
use mongo_transfer::{
    Connector, DocumentStore, DocumentStream, Endpoint, Progress, Reporter, Result, StoreError,
    StoreResult, SyncError,
};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

/// One in-memory database, clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    name: String,
    colls: Rc<RefCell<BTreeMap<String, Vec<Document>>>>,
}

impl MemoryStore {
    pub fn new(name: &str) -> Self {
        MemoryStore {
            name: name.to_string(),
            colls: Rc::default(),
        }
    }

    /// put `docs` into collection `name` directly, no identity check.
    pub fn seed(&self, name: &str, docs: Vec<Document>) {
        self.colls
            .borrow_mut()
            .entry(name.to_string())
            .or_default()
            .extend(docs);
    }

    pub fn docs(&self, name: &str) -> Vec<Document> {
        self.colls.borrow().get(name).cloned().unwrap_or_default()
    }

    pub fn has_collection(&self, name: &str) -> bool {
        self.colls.borrow().contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.colls.borrow().keys().cloned().collect()
    }
}

impl DocumentStore for MemoryStore {
    fn database_name(&self) -> &str {
        &self.name
    }

    fn collection_names(&self) -> StoreResult<Vec<String>> {
        Ok(self.names())
    }

    fn drop_collection(&self, name: &str) -> StoreResult<()> {
        self.colls.borrow_mut().remove(name);
        Ok(())
    }

    fn create_collection(&self, name: &str) -> StoreResult<()> {
        let mut colls = self.colls.borrow_mut();
        if colls.contains_key(name) {
            return Err(StoreError::Rejected(format!(
                "collection already exists: {}",
                name
            )));
        }
        colls.insert(name.to_string(), vec![]);
        Ok(())
    }

    fn estimated_count(&self, name: &str) -> StoreResult<u64> {
        Ok(self.docs(name).len() as u64)
    }

    fn find_all(&self, name: &str) -> StoreResult<DocumentStream<'_>> {
        Ok(Box::new(
            self.docs(name).into_iter().map(Ok::<Document, StoreError>),
        ))
    }

    fn insert(&self, name: &str, doc: &Document) -> StoreResult<()> {
        let mut colls = self.colls.borrow_mut();
        let coll = colls.entry(name.to_string()).or_default();
        if let Some(id) = doc.get("_id") {
            if coll.iter().any(|d| d.get("_id") == Some(id)) {
                return Err(StoreError::Rejected(format!("duplicate key: {}", id)));
            }
        }
        coll.push(doc.clone());
        Ok(())
    }
}

/// Hands out [MemoryStore]s by endpoint, and remembers every attempt.
#[derive(Default)]
pub struct MemoryConnector {
    stores: HashMap<String, MemoryStore>,
    pub attempts: Vec<String>,
}

impl MemoryConnector {
    pub fn with_store(mut self, endpoint: &Endpoint, store: &MemoryStore) -> Self {
        self.stores.insert(endpoint.to_string(), store.clone());
        self
    }
}

impl Connector for MemoryConnector {
    type Store = MemoryStore;

    fn connect(&mut self, endpoint: &Endpoint) -> Result<MemoryStore> {
        self.attempts.push(endpoint.to_string());
        self.stores
            .get(&endpoint.to_string())
            .cloned()
            .ok_or_else(|| SyncError::ConnectionFailed {
                host: endpoint.host().to_string(),
                port: endpoint.port(),
                source: StoreError::Rejected("connection refused".to_string()),
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Progress(String, u64, u64),
    CollectionDone(String, u64),
    IndexesStarted,
    IndexesDone(usize),
}

/// Keeps every reported event in order.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub events: Vec<Event>,
}

impl Reporter for RecordingReporter {
    fn progress(&mut self, progress: &Progress) {
        self.events.push(Event::Progress(
            progress.collection().to_string(),
            progress.copied(),
            progress.total(),
        ));
    }

    fn collection_done(&mut self, collection: &str, copied: u64) {
        self.events
            .push(Event::CollectionDone(collection.to_string(), copied));
    }

    fn indexes_started(&mut self) {
        self.events.push(Event::IndexesStarted);
    }

    fn indexes_done(&mut self, count: usize) {
        self.events.push(Event::IndexesDone(count));
    }
}

pub fn endpoint(url: &str) -> Endpoint {
    Endpoint::parse(url).unwrap()
}

/// `count` documents with integer ids, in collection order.
pub fn numbered_docs(count: i32) -> Vec<Document> {
    (0..count)
        .map(|i| {
            let mut doc = Document::new();
            doc.insert("_id", Bson::Int32(i));
            doc.insert("n", Bson::Int32(i * 10));
            doc
        })
        .collect()
}
