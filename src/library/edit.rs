use std::path::{Path, PathBuf};

use super::collection::TrackCollection;
use super::model::{ArtPayload, TagField};
use super::title_guess::guess_title;

/// One user-initiated edit against the collection.
///
/// Only mutates in-memory records; nothing here touches the disk.
pub struct EditSession<'a> {
    collection: &'a mut TrackCollection,
    changed: Vec<PathBuf>,
}

impl<'a> EditSession<'a> {
    pub fn new(collection: &'a mut TrackCollection) -> Self {
        Self {
            collection,
            changed: Vec::new(),
        }
    }

    fn note(&mut self, paths: &[PathBuf]) {
        for p in paths {
            if !self.changed.contains(p) {
                self.changed.push(p.clone());
            }
        }
    }

    /// Edit one cell. Returns whether the value changed.
    pub fn apply_single(&mut self, path: &Path, field: TagField, value: &str) -> bool {
        let changed = self
            .collection
            .get_mut(path)
            .is_some_and(|r| r.set_field(field, value));
        if changed {
            self.note(&[path.to_path_buf()]);
        }
        changed
    }

    /// Same value into `field` of every named record; returns the changed ones.
    pub fn apply_bulk(&mut self, paths: &[PathBuf], field: TagField, value: &str) -> Vec<PathBuf> {
        let changed = self.collection.set_field_bulk(paths, field, value);
        self.note(&changed);
        changed
    }

    /// Attach `payload` to every named record. Always counts as a change.
    pub fn apply_art(&mut self, paths: &[PathBuf], payload: &ArtPayload) -> Vec<PathBuf> {
        let mut touched = Vec::new();
        for i in self.collection.in_order(paths) {
            let record = self.collection.record_at_mut(i);
            record.set_art(payload.clone());
            touched.push(record.path().to_path_buf());
        }
        self.note(&touched);
        touched
    }

    /// Replace titles with ones guessed from the file names.
    pub fn apply_title_guesses(&mut self, paths: &[PathBuf]) -> Vec<PathBuf> {
        let mut changed = Vec::new();
        for i in self.collection.in_order(paths) {
            let record = self.collection.record_at_mut(i);
            let guess = guess_title(record.path());
            if guess.is_empty() {
                continue;
            }
            if record.set_field(TagField::Title, guess) {
                changed.push(record.path().to_path_buf());
            }
        }
        self.note(&changed);
        changed
    }

    /// Every path changed through this session, in collection order.
    pub fn changed(&self) -> Vec<PathBuf> {
        self.collection
            .in_order(&self.changed)
            .into_iter()
            .filter_map(|i| self.collection.by_index(i))
            .map(|r| r.path().to_path_buf())
            .collect()
    }
}
