//! Whole-file snapshot I/O for the ledger.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use lvl_types::LevelId;
use tempfile::NamedTempFile;
use tracing::warn;

use crate::entry::LedgerEntry;
use crate::error::{LedgerError, LedgerResult};

pub(crate) type Entries = BTreeMap<LevelId, LedgerEntry>;

/// Read a snapshot. `Ok(None)` means there is no file yet.
///
/// Keys that are not valid level ids are dropped with a warning rather than
/// failing the whole load.
pub(crate) fn load(path: &Path) -> LedgerResult<Option<Entries>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let raw: BTreeMap<String, LedgerEntry> = serde_json::from_slice(&bytes)?;
    let mut entries = Entries::new();
    for (key, entry) in raw {
        match LevelId::parse(&key) {
            Ok(id) => {
                entries.insert(id, entry);
            }
            Err(e) => warn!(key = %key, error = %e, "dropping ledger entry with invalid id"),
        }
    }
    Ok(Some(entries))
}

/// Replace the snapshot at `path` with `entries`.
///
/// The new content is written and synced to a temp file in the same
/// directory, then renamed over `path`.
pub(crate) fn write(path: &Path, entries: &Entries) -> LedgerResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(dir)?;
    serde_json::to_writer(&mut staged, entries)?;
    staged.as_file().sync_all()?;
    staged
        .persist(path)
        .map_err(|e| LedgerError::Io(e.error))?;
    Ok(())
}
