use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::error::{LoadError, LoadFailure};
use super::model::{TagField, TrackRecord};
use super::tags::TagStore;

/// Records in load order, keyed by path.
///
/// The order never changes after loading; edits and selection only mutate
/// records in place.
#[derive(Debug, Default)]
pub struct TrackCollection {
    records: Vec<TrackRecord>,
    index: HashMap<PathBuf, usize>,
}

impl TrackCollection {
    /// Read every path through `store`.
    ///
    /// Unreadable files and repeated paths are skipped and reported; the
    /// first occurrence of a path wins.
    pub fn load<P>(paths: P, store: &dyn TagStore) -> (Self, Vec<LoadFailure>)
    where
        P: IntoIterator,
        P::Item: Into<PathBuf>,
    {
        let mut collection = Self::default();
        let mut failures = Vec::new();

        for path in paths {
            let path = path.into();
            if collection.index.contains_key(&path) {
                log::warn!("skipping duplicate path {}", path.display());
                failures.push(LoadFailure {
                    path,
                    error: LoadError::Duplicate,
                });
                continue;
            }

            match store.read_tags(&path) {
                Ok(loaded) => {
                    collection.push(TrackRecord::new(path, loaded.fields, loaded.has_embedded_art));
                }
                Err(error) => {
                    log::warn!("cannot load {}: {error}", path.display());
                    failures.push(LoadFailure { path, error });
                }
            }
        }

        log::info!(
            "loaded {} track(s), {} skipped",
            collection.len(),
            failures.len()
        );
        (collection, failures)
    }

    fn push(&mut self, record: TrackRecord) {
        self.index
            .insert(record.path().to_path_buf(), self.records.len());
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackRecord> {
        self.records.iter()
    }

    pub fn get(&self, path: &Path) -> Option<&TrackRecord> {
        self.index.get(path).map(|&i| &self.records[i])
    }

    pub fn get_mut(&mut self, path: &Path) -> Option<&mut TrackRecord> {
        self.index.get(path).map(|&i| &mut self.records[i])
    }

    pub fn by_index(&self, i: usize) -> Option<&TrackRecord> {
        self.records.get(i)
    }

    pub fn position(&self, path: &Path) -> Option<usize> {
        self.index.get(path).copied()
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.records.iter().map(|r| r.path().to_path_buf()).collect()
    }

    pub fn select(&mut self, path: &Path) {
        if let Some(r) = self.get_mut(path) {
            r.set_selected(true);
        }
    }

    pub fn deselect(&mut self, path: &Path) {
        if let Some(r) = self.get_mut(path) {
            r.set_selected(false);
        }
    }

    pub fn toggle_selected(&mut self, path: &Path) {
        if let Some(r) = self.get_mut(path) {
            r.toggle_selected();
        }
    }

    pub fn select_all(&mut self) {
        self.records.iter_mut().for_each(|r| r.set_selected(true));
    }

    pub fn clear_selection(&mut self) {
        self.records.iter_mut().for_each(|r| r.set_selected(false));
    }

    pub fn selected_records(&self) -> impl Iterator<Item = &TrackRecord> {
        self.records.iter().filter(|r| r.is_selected())
    }

    pub fn selected_paths(&self) -> Vec<PathBuf> {
        self.selected_records()
            .map(|r| r.path().to_path_buf())
            .collect()
    }

    pub fn dirty_paths(&self) -> Vec<PathBuf> {
        self.records
            .iter()
            .filter(|r| r.is_dirty())
            .map(|r| r.path().to_path_buf())
            .collect()
    }

    pub fn dirty_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_dirty()).count()
    }

    /// Sort `paths` into collection order, dropping unknown and repeated ones.
    pub fn in_order(&self, paths: &[PathBuf]) -> Vec<usize> {
        let mut positions: Vec<usize> = paths.iter().filter_map(|p| self.position(p)).collect();
        positions.sort_unstable();
        positions.dedup();
        positions
    }

    pub(super) fn record_at_mut(&mut self, i: usize) -> &mut TrackRecord {
        &mut self.records[i]
    }

    /// Assign `value` to `field` of every named record; returns the ones that changed.
    pub fn set_field_bulk(&mut self, paths: &[PathBuf], field: TagField, value: &str) -> Vec<PathBuf> {
        let mut changed = Vec::new();
        for i in self.in_order(paths) {
            let record = &mut self.records[i];
            if record.set_field(field, value) {
                changed.push(record.path().to_path_buf());
            }
        }
        changed
    }
}
