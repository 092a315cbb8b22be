use std::ffi::OsStr;
use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, SystemTime};

use lvl_types::LevelId;
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::traits::LevelStore;

/// Directory-backed level store: one file per level, named by its id.
///
/// New levels are staged in a temp file inside the storage directory and
/// published with a no-clobber rename, so the final name either does not
/// exist or holds the complete content. Temp files start with `.` and are
/// therefore never mistaken for level ids.
pub struct FileLevelStore {
    root: PathBuf,
}

/// Name prefix of staged uploads.
const STAGING_PREFIX: &str = ".upload-";

/// Staged uploads older than this are left over from a crash.
pub const STALE_STAGING_AGE: Duration = Duration::from_secs(60 * 60);

impl FileLevelStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    ///
    /// Staged uploads older than [`STALE_STAGING_AGE`] are removed.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        let store = Self { root };
        let removed = store.sweep_staging(STALE_STAGING_AGE)?;
        if removed > 0 {
            info!(root = %store.root.display(), removed, "removed stale staged uploads");
        }
        debug!(root = %store.root.display(), "opened level store");
        Ok(store)
    }

    /// Delete staged uploads last modified at least `min_age` ago.
    ///
    /// Returns how many were removed. Younger ones may belong to an upload
    /// still in progress and are kept.
    pub fn sweep_staging(&self, min_age: Duration) -> StoreResult<usize> {
        let now = SystemTime::now();
        let mut removed = 0;
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let is_staged = entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(STAGING_PREFIX));
            if !is_staged || !entry.file_type()?.is_file() {
                continue;
            }
            let modified = entry.metadata()?.modified()?;
            // A timestamp in the future counts as fresh.
            let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
            if age < min_age {
                continue;
            }
            match fs::remove_file(entry.path()) {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(removed)
    }

    /// The storage directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve the file path for `id`.
    ///
    /// The id must form exactly one normal path component that round-trips
    /// unchanged; anything that would name a different directory is refused.
    fn path_for(&self, id: &LevelId) -> StoreResult<PathBuf> {
        let raw = id.as_str();
        let mut components = Path::new(raw).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) if name == OsStr::new(raw) => {
                Ok(self.root.join(name))
            }
            _ => Err(StoreError::UnsafePath(raw.to_string())),
        }
    }
}

impl LevelStore for FileLevelStore {
    fn exists(&self, id: &LevelId) -> StoreResult<bool> {
        let path = self.path_for(id)?;
        match fs::metadata(&path) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn read(&self, id: &LevelId) -> StoreResult<Vec<u8>> {
        let path = self.path_for(id)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StoreError::NotFound(id.clone())),
            Err(e) => Err(e.into()),
        }
    }

    fn create(&self, id: &LevelId, content: &[u8]) -> StoreResult<()> {
        let path = self.path_for(id)?;

        let mut staged = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempfile_in(&self.root)?;
        staged.write_all(content)?;
        staged.as_file().sync_all()?;

        // No-clobber publish: fails with AlreadyExists instead of replacing,
        // which closes the window between an exists() check and the write.
        match staged.persist_noclobber(&path) {
            Ok(_) => {
                debug!(level = %id, bytes = content.len(), "level stored");
                Ok(())
            }
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                Err(StoreError::AlreadyExists(id.clone()))
            }
            Err(e) => Err(StoreError::Io(e.error)),
        }
    }

    fn list(&self) -> StoreResult<Vec<LevelId>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                warn!(file = ?file_name, "skipping non UTF-8 file in level store");
                continue;
            };
            match LevelId::parse(name) {
                Ok(id) => ids.push(id),
                Err(e) => debug!(file = name, error = %e, "skipping non-level file"),
            }
        }
        Ok(ids)
    }
}

impl std::fmt::Debug for FileLevelStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileLevelStore")
            .field("root", &self.root)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::sync::{Arc, Barrier};

    fn id(raw: &str) -> LevelId {
        LevelId::parse(raw).unwrap()
    }

    fn open_temp() -> (tempfile::TempDir, FileLevelStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLevelStore::open(dir.path().join("levels")).unwrap();
        (dir, store)
    }

    #[test]
    fn open_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("levels");
        assert!(!root.exists());
        let store = FileLevelStore::open(&root).unwrap();
        assert!(root.is_dir());
        assert_eq!(store.root(), root.as_path());
    }

    #[test]
    fn create_then_read() {
        let (_dir, store) = open_temp();
        let castle = id("Castle-Bob");
        store.create(&castle, b"hello").unwrap();
        assert!(store.exists(&castle).unwrap());
        assert_eq!(store.read(&castle).unwrap(), b"hello");
    }

    #[test]
    fn file_is_named_by_id() {
        let (_dir, store) = open_temp();
        store.create(&id("My Castle-Bob"), b"x").unwrap();
        let on_disk = fs::read(store.root().join("My Castle-Bob")).unwrap();
        assert_eq!(on_disk, b"x");
    }

    #[test]
    fn create_is_not_an_overwrite() {
        let (_dir, store) = open_temp();
        let castle = id("Castle-Bob");
        store.create(&castle, b"first").unwrap();
        let err = store.create(&castle, b"second").unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists(ref got) if *got == castle));
        assert_eq!(store.read(&castle).unwrap(), b"first");
    }

    #[test]
    fn read_missing_is_not_found() {
        let (_dir, store) = open_temp();
        let err = store.read(&id("Ghost-Nobody")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert!(!store.exists(&id("Ghost-Nobody")).unwrap());
    }

    #[test]
    fn directory_with_level_name_is_not_a_level() {
        let (_dir, store) = open_temp();
        fs::create_dir(store.root().join("Castle-Bob")).unwrap();
        assert!(!store.exists(&id("Castle-Bob")).unwrap());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn list_skips_foreign_files() {
        let (_dir, store) = open_temp();
        store.create(&id("Castle-Bob"), b"a").unwrap();
        store.create(&id("Tower-Alice"), b"b").unwrap();
        fs::write(store.root().join(".tmpAbC123"), b"staged").unwrap();
        fs::write(store.root().join("notes.txt"), b"not a level").unwrap();

        let listed: BTreeSet<String> = store
            .list()
            .unwrap()
            .into_iter()
            .map(LevelId::into_string)
            .collect();
        let expected: BTreeSet<String> = ["Castle-Bob", "Tower-Alice"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(listed, expected);
    }

    #[test]
    fn list_sees_files_placed_directly() {
        let (_dir, store) = open_temp();
        fs::write(store.root().join("Legacy-Carol"), b"old level").unwrap();
        assert_eq!(store.list().unwrap(), vec![id("Legacy-Carol")]);
        assert_eq!(store.read(&id("Legacy-Carol")).unwrap(), b"old level");
    }

    #[test]
    fn no_temp_files_left_behind() {
        let (_dir, store) = open_temp();
        let castle = id("Castle-Bob");
        store.create(&castle, b"first").unwrap();
        let _ = store.create(&castle, b"second");
        let names: Vec<_> = fs::read_dir(store.root())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("Castle-Bob")]);
    }

    #[test]
    fn sweep_removes_abandoned_staging_only() {
        let (_dir, store) = open_temp();
        store.create(&id("Castle-Bob"), b"level").unwrap();
        fs::write(store.root().join(".upload-abc123"), b"half a lev").unwrap();
        fs::write(store.root().join(".hidden"), b"not ours").unwrap();

        assert_eq!(store.sweep_staging(Duration::ZERO).unwrap(), 1);
        assert!(!store.root().join(".upload-abc123").exists());
        assert!(store.root().join(".hidden").exists());
        assert!(store.exists(&id("Castle-Bob")).unwrap());
    }

    #[test]
    fn sweep_keeps_recent_staging() {
        let (_dir, store) = open_temp();
        fs::write(store.root().join(".upload-inflight"), b"partial").unwrap();
        assert_eq!(store.sweep_staging(STALE_STAGING_AGE).unwrap(), 0);
        assert!(store.root().join(".upload-inflight").exists());
    }

    #[test]
    fn open_removes_stale_staging() {
        let (dir, store) = open_temp();
        let leftover = store.root().join(".upload-crashed");
        let file = fs::File::create(&leftover).unwrap();
        file.set_modified(SystemTime::now() - STALE_STAGING_AGE - Duration::from_secs(60))
            .unwrap();
        drop(file);

        let reopened = FileLevelStore::open(dir.path().join("levels")).unwrap();
        assert!(!leftover.exists());
        assert!(reopened.list().unwrap().is_empty());
    }

    #[test]
    fn concurrent_creates_have_one_winner() {
        let (_dir, store) = open_temp();
        let store = Arc::new(store);
        let castle = id("Castle-Bob");
        let writers = 8;
        let barrier = Arc::new(Barrier::new(writers));

        let handles: Vec<_> = (0..writers)
            .map(|i| {
                let store = Arc::clone(&store);
                let barrier = Arc::clone(&barrier);
                let castle = castle.clone();
                std::thread::spawn(move || {
                    barrier.wait();
                    store.create(&castle, format!("payload {i}").as_bytes())
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let wins = results.iter().filter(|r| r.is_ok()).count();
        let losses = results
            .iter()
            .filter(|r| matches!(r, Err(StoreError::AlreadyExists(_))))
            .count();
        assert_eq!(wins, 1);
        assert_eq!(losses, writers - 1);

        let content = String::from_utf8(store.read(&castle).unwrap()).unwrap();
        assert!(content.starts_with("payload "));
    }

    #[test]
    fn path_for_stays_inside_root() {
        let (_dir, store) = open_temp();
        let path = store.path_for(&id("Castle-Bob")).unwrap();
        assert_eq!(path.parent(), Some(store.root()));
    }
}
