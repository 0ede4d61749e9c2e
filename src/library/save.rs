use std::path::{Path, PathBuf};

use super::collection::TrackCollection;
use super::error::WriteError;
use super::tags::TagStore;

/// Result of writing one record.
#[derive(Debug)]
pub struct SaveResult {
    pub path: PathBuf,
    pub result: Result<(), WriteError>,
}

impl SaveResult {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-record results of one save batch, in collection order.
#[derive(Debug, Default)]
pub struct SaveOutcome {
    pub results: Vec<SaveResult>,
}

impl SaveOutcome {
    pub fn saved(&self) -> usize {
        self.results.iter().filter(|r| r.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.saved()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Path, &WriteError)> {
        self.results
            .iter()
            .filter_map(|r| r.result.as_ref().err().map(|e| (r.path.as_path(), e)))
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// One-line status, e.g. `"12 saved, 1 failed: song.mp3: cannot write file: ..."`.
    pub fn summary(&self) -> String {
        if self.is_empty() {
            return "nothing to save".to_string();
        }
        let saved = self.saved();
        match self.failures().next() {
            None => format!("{saved} saved"),
            Some((path, err)) => {
                let name = path
                    .file_name()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                format!("{saved} saved, {} failed: {name}: {err}", self.failed())
            }
        }
    }
}

/// Writes dirty records back to their files, one at a time.
pub struct SaveCoordinator<'s> {
    store: &'s dyn TagStore,
}

impl<'s> SaveCoordinator<'s> {
    pub fn new(store: &'s dyn TagStore) -> Self {
        Self { store }
    }

    /// Save every dirty record.
    pub fn save(&self, collection: &mut TrackCollection) -> SaveOutcome {
        let dirty = collection.dirty_paths();
        self.save_paths(collection, &dirty)
    }

    /// Save the named records that are dirty.
    ///
    /// A failing record keeps its in-memory state and stays dirty; the batch
    /// continues with the next one.
    pub fn save_paths(&self, collection: &mut TrackCollection, paths: &[PathBuf]) -> SaveOutcome {
        let mut outcome = SaveOutcome::default();

        for i in collection.in_order(paths) {
            let record = collection.record_at_mut(i);
            if !record.is_dirty() {
                continue;
            }

            let result = self
                .store
                .write_tags(record.path(), record.fields(), record.art());
            match &result {
                Ok(()) => {
                    log::info!("saved {}", record.path().display());
                    record.mark_saved();
                }
                Err(err) => {
                    log::warn!("failed to save {}: {err}", record.path().display());
                }
            }

            outcome.results.push(SaveResult {
                path: record.path().to_path_buf(),
                result,
            });
        }

        outcome
    }
}
