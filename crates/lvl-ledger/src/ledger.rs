use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lvl_types::LevelId;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::entry::LedgerEntry;
use crate::error::{LedgerError, LedgerResult};
use crate::snapshot::{self, Entries};

/// Shared view-count / upload-time ledger.
///
/// Every mutating call runs read-modify-persist under one mutex. If the
/// snapshot cannot be written the in-memory change is rolled back, so memory
/// never runs ahead of what is on disk.
pub struct MetadataLedger {
    /// Snapshot location; `None` for a purely in-memory ledger.
    path: Option<PathBuf>,
    clock: Arc<dyn Clock>,
    entries: Mutex<Entries>,
}

impl MetadataLedger {
    /// Load the ledger stored at `path`.
    ///
    /// A missing file starts an empty ledger and writes an empty snapshot.
    /// An unreadable or corrupt file is logged and also starts empty; the
    /// bad file is left in place until the next mutation replaces it.
    pub fn open(path: impl Into<PathBuf>) -> LedgerResult<Self> {
        Self::open_with_clock(path, Arc::new(SystemClock))
    }

    /// Like [`open`](Self::open) with an explicit time source.
    pub fn open_with_clock(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> LedgerResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let entries = match snapshot::load(&path) {
            Ok(Some(entries)) => entries,
            Ok(None) => {
                let empty = Entries::new();
                snapshot::write(&path, &empty)?;
                empty
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ledger snapshot unreadable; starting empty");
                Entries::new()
            }
        };

        info!(path = %path.display(), entries = entries.len(), "ledger loaded");
        Ok(Self {
            path: Some(path),
            clock,
            entries: Mutex::new(entries),
        })
    }

    /// Load the ledger at `path` without ever writing to it.
    ///
    /// Later mutations stay in memory, so a process that only inspects the
    /// ledger cannot race the server that owns the file. A missing or corrupt
    /// file gives an empty ledger.
    pub fn open_detached(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let entries = match snapshot::load(path) {
            Ok(entries) => entries.unwrap_or_default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ledger snapshot unreadable; starting empty");
                Entries::new()
            }
        };
        Self {
            path: None,
            clock: Arc::new(SystemClock),
            entries: Mutex::new(entries),
        }
    }

    /// A ledger that is never written to disk.
    pub fn in_memory() -> Self {
        Self::in_memory_with_clock(Arc::new(SystemClock))
    }

    pub fn in_memory_with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            path: None,
            clock,
            entries: Mutex::new(Entries::new()),
        }
    }

    /// Snapshot location, if this ledger is persistent.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Return the entry for `id`, creating `(0, now)` if there is none.
    ///
    /// This is the backfill path for levels that predate the ledger: the
    /// synthesized entry is persisted immediately so later calls reuse it.
    pub fn get_or_init(&self, id: &LevelId) -> LedgerResult<LedgerEntry> {
        let mut entries = self.lock();
        if let Some(entry) = entries.get(id) {
            return Ok(*entry);
        }
        let fresh = LedgerEntry::new(self.clock.now());
        debug!(level = %id, created_at = fresh.created_at, "backfilling ledger entry");
        self.commit(&mut entries, id, fresh)
    }

    /// Count one view of `id`.
    ///
    /// The entry must already exist (see [`get_or_init`](Self::get_or_init)).
    pub fn record_view(&self, id: &LevelId) -> LedgerResult<LedgerEntry> {
        let mut entries = self.lock();
        let current = entries
            .get(id)
            .copied()
            .ok_or_else(|| LedgerError::UnknownLevel(id.clone()))?;
        let next = current.viewed();
        debug!(level = %id, views = next.view_count, "view recorded");
        self.commit(&mut entries, id, next)
    }

    /// Start a fresh `(0, now)` entry for a newly uploaded level.
    ///
    /// Replaces any existing entry for `id`.
    pub fn record_upload(&self, id: &LevelId) -> LedgerResult<LedgerEntry> {
        let mut entries = self.lock();
        let fresh = LedgerEntry::new(self.clock.now());
        debug!(level = %id, created_at = fresh.created_at, "upload recorded");
        self.commit(&mut entries, id, fresh)
    }

    pub fn get(&self, id: &LevelId) -> Option<LedgerEntry> {
        self.lock().get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of every entry, ordered by id.
    pub fn snapshot(&self) -> BTreeMap<LevelId, LedgerEntry> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        // Entries are only changed together with a successful flush, so a
        // panic in another holder cannot leave them half-updated.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Install `next` for `id` and flush, undoing the insert if the flush fails.
    fn commit(
        &self,
        entries: &mut Entries,
        id: &LevelId,
        next: LedgerEntry,
    ) -> LedgerResult<LedgerEntry> {
        let previous = entries.insert(id.clone(), next);
        if let Err(e) = self.flush(entries) {
            match previous {
                Some(previous) => entries.insert(id.clone(), previous),
                None => entries.remove(id),
            };
            return Err(e);
        }
        Ok(next)
    }

    fn flush(&self, entries: &Entries) -> LedgerResult<()> {
        match &self.path {
            Some(path) => snapshot::write(path, entries),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for MetadataLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataLedger")
            .field("path", &self.path)
            .field("entries", &self.len())
            .finish()
    }
}
