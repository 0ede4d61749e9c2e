//! In-memory [`TagStore`] for tests.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;

use image::ImageFormat;

use super::{ArtPayload, LoadError, LoadedTags, TagField, TagFields, TagStore, WriteError};

#[derive(Default)]
struct Inner {
    files: HashMap<PathBuf, LoadedTags>,
    art: HashMap<PathBuf, Vec<u8>>,
    failing_writes: HashSet<PathBuf>,
    writes: Vec<PathBuf>,
}

/// Clones share the same files, so a test can keep a handle after boxing one.
#[derive(Clone, Default)]
pub(crate) struct MemoryTagStore {
    inner: Rc<RefCell<Inner>>,
}

impl MemoryTagStore {
    pub(crate) fn with_file(self, path: &str, fields: &[(TagField, &str)]) -> Self {
        let fields: TagFields = fields.iter().map(|&(f, v)| (f, v.to_string())).collect();
        self.inner.borrow_mut().files.insert(
            PathBuf::from(path),
            LoadedTags {
                fields,
                has_embedded_art: false,
            },
        );
        self
    }

    pub(crate) fn fail_writes_to(&self, path: &str) {
        self.inner
            .borrow_mut()
            .failing_writes
            .insert(PathBuf::from(path));
    }

    pub(crate) fn allow_writes_to(&self, path: &str) {
        self.inner.borrow_mut().failing_writes.remove(Path::new(path));
    }

    pub(crate) fn writes(&self) -> Vec<PathBuf> {
        self.inner.borrow().writes.clone()
    }

    pub(crate) fn stored_field(&self, path: &str, field: TagField) -> Option<String> {
        self.inner
            .borrow()
            .files
            .get(Path::new(path))
            .and_then(|t| t.fields.get(&field).cloned())
    }

    pub(crate) fn stored_art(&self, path: &str) -> Option<Vec<u8>> {
        self.inner.borrow().art.get(Path::new(path)).cloned()
    }
}

impl TagStore for MemoryTagStore {
    fn read_tags(&self, path: &Path) -> Result<LoadedTags, LoadError> {
        self.inner
            .borrow()
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| LoadError::Unsupported(format!("{} is not audio", path.display())))
    }

    fn write_tags(
        &self,
        path: &Path,
        fields: &TagFields,
        art: Option<&ArtPayload>,
    ) -> Result<(), WriteError> {
        let mut inner = self.inner.borrow_mut();
        inner.writes.push(path.to_path_buf());
        if inner.failing_writes.contains(path) {
            return Err(WriteError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "read-only file",
            )));
        }
        if let Some(art) = art {
            inner.art.insert(path.to_path_buf(), art.data.to_vec());
        }
        let entry = inner.files.entry(path.to_path_buf()).or_default();
        entry.fields = fields.clone();
        entry.has_embedded_art |= art.is_some();
        Ok(())
    }

    fn read_art(&self, path: &Path) -> Result<Option<Vec<u8>>, LoadError> {
        Ok(self.inner.borrow().art.get(path).cloned())
    }
}

pub(crate) fn payload(bytes: &[u8]) -> ArtPayload {
    ArtPayload {
        source: PathBuf::from("/art/cover.png"),
        data: Arc::from(bytes.to_vec()),
        format: ImageFormat::Png,
        width: 1,
        height: 1,
    }
}

pub(crate) fn paths(items: &[&str]) -> Vec<PathBuf> {
    items.iter().map(PathBuf::from).collect()
}
