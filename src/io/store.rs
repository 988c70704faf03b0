use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

use crate::io::lock::LockError;
use crate::io::snapshot;
use crate::model::task::Task;

/// Error type for persistence. Never fatal to the in-memory state.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed snapshot: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("could not encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),
    #[error(transparent)]
    Lock(#[from] LockError),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence adapter: load and save the whole task snapshot.
pub trait Store {
    /// Load the snapshot. A store that has never been written yields an
    /// empty list.
    fn load(&self) -> Result<Vec<Task>, StoreError>;

    /// Replace the snapshot with `tasks`.
    fn save(&self, tasks: &[Task]) -> Result<(), StoreError>;
}

impl<S: Store + ?Sized> Store for Box<S> {
    fn load(&self) -> Result<Vec<Task>, StoreError> {
        (**self).load()
    }

    fn save(&self, tasks: &[Task]) -> Result<(), StoreError> {
        (**self).save(tasks)
    }
}

/// In-memory key-value store. Clones share the same entries, so a test can
/// keep a handle and inspect what the app wrote.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    key: String,
    inner: Rc<RefCell<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    entries: HashMap<String, String>,
    fail_saves: bool,
    saves: usize,
    failed: usize,
}

impl MemoryStore {
    pub fn new(key: &str) -> Self {
        MemoryStore {
            key: key.to_string(),
            inner: Rc::default(),
        }
    }

    /// A store already holding `tasks` under the default key
    pub fn with_tasks(tasks: &[Task]) -> Result<Self, StoreError> {
        let store = MemoryStore::default();
        store.set_raw(&store.key, &snapshot::encode(tasks)?);
        Ok(store)
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.borrow().entries.get(key).cloned()
    }

    pub fn set_raw(&self, key: &str, value: &str) {
        self.inner
            .borrow_mut()
            .entries
            .insert(key.to_string(), value.to_string());
    }

    /// Make every later `save` fail, as a full quota would
    pub fn fail_saves(&self, fail: bool) {
        self.inner.borrow_mut().fail_saves = fail;
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> usize {
        self.inner.borrow().saves
    }

    /// Number of saves refused by `fail_saves`
    pub fn failed_saves(&self) -> usize {
        self.inner.borrow().failed
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        MemoryStore::new("todos")
    }
}

impl Store for MemoryStore {
    fn load(&self) -> Result<Vec<Task>, StoreError> {
        match self.raw(&self.key) {
            Some(text) => snapshot::decode(&text),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, tasks: &[Task]) -> Result<(), StoreError> {
        if self.inner.borrow().fail_saves {
            self.inner.borrow_mut().failed += 1;
            return Err(StoreError::Unavailable("quota exceeded".into()));
        }
        let text = snapshot::encode(tasks)?;
        let mut inner = self.inner.borrow_mut();
        inner.entries.insert(self.key.clone(), text);
        inner.saves += 1;
        Ok(())
    }
}
