use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::LibrarySettings;

/// Paths produced from the command line arguments.
#[derive(Debug, Default)]
pub struct ExpandedInputs {
    /// Absolute file paths, argument order first, directory contents sorted.
    pub paths: Vec<PathBuf>,
    /// Arguments that do not exist.
    pub missing: Vec<PathBuf>,
}

pub(crate) fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            extensions
                .iter()
                .map(|e| e.trim().trim_start_matches('.'))
                .filter(|e| !e.is_empty())
                .any(|e| e.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

pub(crate) fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Audio files below `dir`, sorted by path.
pub fn scan_dir(dir: &Path, settings: &LibrarySettings) -> Vec<PathBuf> {
    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    let mut files: Vec<PathBuf> = walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| has_extension(p, &settings.extensions))
        .map(|p| absolute(&p))
        .collect();

    files.sort();
    files
}

/// Turn startup arguments into file paths: files are taken as given,
/// directories are scanned for audio files.
pub fn expand_inputs<I, P>(args: I, settings: &LibrarySettings) -> ExpandedInputs
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut out = ExpandedInputs::default();

    for arg in args {
        let arg = arg.as_ref();
        if arg.is_dir() {
            let found = scan_dir(arg, settings);
            log::debug!("{}: {} audio file(s)", arg.display(), found.len());
            out.paths.extend(found);
        } else if arg.is_file() {
            out.paths.push(absolute(arg));
        } else {
            log::warn!("file not found: {}", arg.display());
            out.missing.push(arg.to_path_buf());
        }
    }

    out
}
