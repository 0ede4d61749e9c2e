use std::path::{Path, PathBuf};

use crate::config::LibrarySettings;
use crate::library::{LoadFailure, TagStore, TrackCollection, expand_inputs};

/// Tracks loaded from the command line, plus what could not be used.
pub struct Startup {
    pub collection: TrackCollection,
    pub missing: Vec<PathBuf>,
    pub failures: Vec<LoadFailure>,
}

impl Startup {
    /// Initial status line text, when something was skipped.
    pub fn status(&self) -> Option<String> {
        let skipped = self.missing.len() + self.failures.len();
        if skipped == 0 {
            return None;
        }
        let first = self
            .missing
            .first()
            .map(|p| format!("{}: not found", p.display()))
            .or_else(|| {
                self.failures
                    .first()
                    .map(|f| format!("{}: {}", f.path.display(), f.error))
            })
            .unwrap_or_default();
        Some(format!("{skipped} input(s) skipped, first: {first}"))
    }
}

pub fn load_inputs<I, P>(args: I, settings: &LibrarySettings, store: &dyn TagStore) -> Startup
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let inputs = expand_inputs(args, settings);
    let (collection, failures) = TrackCollection::load(inputs.paths, store);
    Startup {
        collection,
        missing: inputs.missing,
        failures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::LoftyTagStore;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn unreadable_and_missing_inputs_are_reported() {
        let dir = tempdir().unwrap();
        let fake = dir.path().join("fake.txt");
        fs::write(&fake, b"not really audio").unwrap();
        let missing = dir.path().join("nope.flac");

        let startup = load_inputs(
            [fake.clone(), missing.clone()],
            &LibrarySettings::default(),
            &LoftyTagStore,
        );

        assert!(startup.collection.is_empty());
        assert_eq!(startup.missing, vec![missing]);
        assert_eq!(startup.failures.len(), 1);
        assert_eq!(startup.failures[0].path, fake);
        let status = startup.status().unwrap();
        assert!(status.starts_with("2 input(s) skipped, first: "), "{status}");
        assert!(status.contains("nope.flac: not found"));
    }

    #[test]
    fn nothing_skipped_means_no_status() {
        let startup = load_inputs(
            Vec::<PathBuf>::new(),
            &LibrarySettings::default(),
            &LoftyTagStore,
        );
        assert!(startup.collection.is_empty());
        assert!(startup.status().is_none());
    }
}
