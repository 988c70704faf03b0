use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde_json::{Map, Value};

use crate::io::lock::{DEFAULT_LOCK_TIMEOUT, StoreLock};
use crate::io::recovery::{self, RecoveryEntry, atomic_write};
use crate::io::snapshot;
use crate::io::store::{Store, StoreError};
use crate::model::task::Task;

/// A JSON object file of top-level keys, one of which holds the task
/// snapshot. Keys it does not own are carried through saves untouched.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    key: String,
    lock_timeout: Duration,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>, key: &str) -> Self {
        FileStore {
            path: path.into(),
            key: key.to_string(),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn dir(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new("."))
    }

    fn read_text(&self) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// The other keys already in the file. An unreadable or malformed file
    /// contributes nothing.
    fn existing_entries(&self) -> Map<String, Value> {
        self.read_text()
            .ok()
            .flatten()
            .and_then(|text| serde_json::from_str::<Map<String, Value>>(&text).ok())
            .unwrap_or_default()
    }

    /// Lock, merge our key into whatever the file holds now, then replace it.
    /// On failure the error comes back with the content that was not written
    /// (empty if encoding never got that far).
    fn write(&self, tasks: &[Task]) -> Result<String, (StoreError, String)> {
        let _lock = StoreLock::acquire(&self.path, self.lock_timeout)
            .map_err(|e| (StoreError::from(e), String::new()))?;

        let mut entries = self.existing_entries();
        let value = snapshot::to_value(tasks).map_err(|e| (e, String::new()))?;
        entries.insert(self.key.clone(), value);
        let content = serde_json::to_string_pretty(&Value::Object(entries))
            .map_err(|e| (StoreError::Encode(e), String::new()))?;

        match atomic_write(&self.path, content.as_bytes()) {
            Ok(()) => Ok(content),
            Err(source) => Err((
                StoreError::Write {
                    path: self.path.clone(),
                    source,
                },
                content,
            )),
        }
    }
}

impl Store for FileStore {
    fn load(&self) -> Result<Vec<Task>, StoreError> {
        let Some(text) = self.read_text()? else {
            return Ok(Vec::new());
        };
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let decoded = serde_json::from_str::<Map<String, Value>>(&text)
            .map_err(StoreError::Decode)
            .and_then(|entries| match entries.get(&self.key) {
                Some(value) => snapshot::from_value(value),
                None => Ok(Vec::new()),
            });
        if let Err(e) = &decoded {
            recovery::log_recovery(
                self.dir(),
                &RecoveryEntry::new("unreadable store")
                    .field("File", self.path.display())
                    .field("Error", e)
                    .body(text),
            );
        }
        decoded
    }

    fn save(&self, tasks: &[Task]) -> Result<(), StoreError> {
        match self.write(tasks) {
            Ok(content) => {
                tracing::trace!(path = %self.path.display(), bytes = content.len(), "store saved");
                Ok(())
            }
            Err((e, content)) => {
                let body = if content.is_empty() {
                    snapshot::encode(tasks).unwrap_or_default()
                } else {
                    content
                };
                recovery::log_recovery(
                    self.dir(),
                    &RecoveryEntry::new("save failed")
                        .field("File", self.path.display())
                        .field("Key", &self.key)
                        .field("Error", &e)
                        .body(body),
                );
                Err(e)
            }
        }
    }
}
