//! Legacy unkeyed counter.
//!
//! Persistence is best-effort: the file holds the decimal count and is
//! rewritten through `<path>.tmp` + rename so a crash never leaves a torn
//! value behind. Failures are logged and swallowed; the in-memory value
//! stays authoritative. Writing is blocking and lives on `Persister`, a
//! cloneable handle that can be moved onto a blocking thread.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{HitError, Result};

#[derive(Debug)]
pub struct LegacyCounter {
    count: AtomicU64,
    persister: Option<Persister>,
}

impl LegacyCounter {
    /// In-memory only, starting at `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            count: AtomicU64::new(seed),
            persister: None,
        }
    }

    /// Backed by `path`. A readable file wins over `seed`; a missing file
    /// starts from `seed`; an unreadable or corrupt one is logged and
    /// also starts from `seed`.
    pub fn with_persist_file(seed: u64, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let start = match load_count(&path) {
            Ok(Some(v)) => {
                tracing::info!(count = v, path = %path.display(), "loaded persisted count");
                v
            }
            Ok(None) => seed,
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "could not load persisted count");
                seed
            }
        };

        Self {
            count: AtomicU64::new(start),
            persister: Some(Persister::new(path)),
        }
    }

    /// Add one in memory. Persisting the returned value is the caller's
    /// job (see `persister`), so async callers can keep file I/O off their
    /// executor.
    pub fn increment(&self) -> u64 {
        self.count.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn get(&self) -> u64 {
        self.count.load(Ordering::Acquire)
    }

    pub fn persist_file(&self) -> Option<&Path> {
        self.persister.as_ref().map(Persister::path)
    }

    /// Owned handle for writing this counter's file, if it has one.
    pub fn persister(&self) -> Option<Persister> {
        self.persister.clone()
    }
}

/// Cloneable writer for one persist file. Writes are serialized and never
/// move the file backwards: a value at or below the last one written is
/// skipped, so out-of-order saves from concurrent increments are harmless.
#[derive(Debug, Clone)]
pub struct Persister {
    path: Arc<PathBuf>,
    last_written: Arc<Mutex<Option<u64>>>,
}

impl Persister {
    fn new(path: PathBuf) -> Self {
        Self {
            path: Arc::new(path),
            last_written: Arc::new(Mutex::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Blocking. Failures are logged, never returned.
    pub fn save(&self, value: u64) {
        let mut last = self
            .last_written
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if matches!(*last, Some(prev) if prev >= value) {
            return;
        }
        match save_count(&self.path, value) {
            Ok(()) => *last = Some(value),
            Err(e) => tracing::warn!(error = %e, path = %self.path.display(), "persist failed"),
        }
    }
}

/// Read a persisted count. `Ok(None)` when the file does not exist,
/// `Ok(Some(0))` when it is empty.
pub fn load_count(path: &Path) -> Result<Option<u64>> {
    let s = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(HitError::Persist(format!("read {}: {e}", path.display()))),
    };

    let s = s.trim();
    if s.is_empty() {
        return Ok(Some(0));
    }
    s.parse::<u64>()
        .map(Some)
        .map_err(|e| HitError::Persist(format!("parse persisted count: {e}")))
}

/// Write `value` to `path` via write-to-temp-then-rename.
pub fn save_count(path: &Path, value: u64) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, value.to_string())
        .map_err(|e| HitError::Persist(format!("write {}: {e}", tmp.display())))?;
    fs::rename(&tmp, path)
        .map_err(|e| HitError::Persist(format!("rename {}: {e}", path.display())))
}
