use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;

/// Written at the top of a new recovery log
const FILE_HEADER: &str = "\
<!-- tasklist recovery log: snapshots that could not be saved normally.
     View with: tl recovery
     Safe to delete once nothing in it is needed. -->

---
";

/// A single entry in the recovery log
#[derive(Debug, Clone)]
pub struct RecoveryEntry {
    pub timestamp: DateTime<Utc>,
    pub description: String,
    pub fields: Vec<(String, String)>,
    pub body: String,
}

impl RecoveryEntry {
    pub fn new(description: &str) -> Self {
        RecoveryEntry {
            timestamp: Utc::now(),
            description: description.to_string(),
            fields: Vec::new(),
            body: String::new(),
        }
    }

    pub fn field(mut self, key: &str, value: impl ToString) -> Self {
        self.fields.push((key.to_string(), value.to_string()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    fn to_markdown(&self) -> String {
        let mut out = format!(
            "## {} {}\n\n",
            self.timestamp
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            self.description,
        );
        for (key, value) in &self.fields {
            out.push_str(&format!("{}: {}\n", key, value));
        }
        if !self.body.is_empty() {
            out.push_str("\n```json\n");
            out.push_str(&self.body);
            if !self.body.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("```\n");
        }
        out.push_str("\n---\n");
        out
    }
}

pub fn recovery_log_path(dir: &Path) -> PathBuf {
    dir.join("recovery.log")
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Append an entry to the recovery log in `dir`. Best effort: a failure is
/// reported as a warning and otherwise ignored.
pub fn log_recovery(dir: &Path, entry: &RecoveryEntry) {
    if let Err(e) = append_entry(dir, entry) {
        tracing::warn!(dir = %dir.display(), error = %e, "could not write to recovery log");
    }
}

fn append_entry(dir: &Path, entry: &RecoveryEntry) -> io::Result<()> {
    let path = recovery_log_path(dir);
    let needs_header = std::fs::metadata(&path).map_or(true, |m| m.len() == 0);
    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    if needs_header {
        file.write_all(FILE_HEADER.as_bytes())?;
    }
    file.write_all(entry.to_markdown().as_bytes())
}

/// Full text of the recovery log, if there is one
pub fn read_recovery_log(dir: &Path) -> Option<String> {
    std::fs::read_to_string(recovery_log_path(dir)).ok()
}

/// Number of entries in the recovery log
pub fn recovery_entry_count(dir: &Path) -> usize {
    read_recovery_log(dir).map_or(0, |text| {
        text.lines().filter(|l| l.starts_with("## ")).count()
    })
}
