//! Directory browser used by the cover art picker.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::library::{has_extension, is_hidden};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EntryKind {
    Parent,
    Dir,
    File,
}

#[derive(Debug, Clone)]
pub struct BrowserEntry {
    pub name: String,
    pub path: PathBuf,
    pub kind: EntryKind,
}

/// One directory listing: `..`, sub-directories, then matching files.
#[derive(Debug)]
pub struct FileBrowser {
    dir: PathBuf,
    entries: Vec<BrowserEntry>,
    cursor: usize,
    extensions: Vec<String>,
    include_hidden: bool,
}

impl FileBrowser {
    pub fn new(dir: PathBuf, extensions: Vec<String>) -> Self {
        let dir = std::path::absolute(&dir).unwrap_or(dir);
        let mut browser = Self {
            dir,
            entries: Vec::new(),
            cursor: 0,
            extensions,
            include_hidden: false,
        };
        browser.refresh();
        browser
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn entries(&self) -> &[BrowserEntry] {
        &self.entries
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn include_hidden(&self) -> bool {
        self.include_hidden
    }

    pub fn selected(&self) -> Option<&BrowserEntry> {
        self.entries.get(self.cursor)
    }

    pub fn next(&mut self) {
        if self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
        }
    }

    pub fn prev(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Re-read the current directory.
    pub fn refresh(&mut self) {
        let mut dirs = Vec::new();
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    log::debug!("browser: {err}");
                    continue;
                }
            };
            let path = entry.path();
            if !self.include_hidden && is_hidden(path) {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if entry.file_type().is_dir() {
                dirs.push(BrowserEntry {
                    name,
                    path: path.to_path_buf(),
                    kind: EntryKind::Dir,
                });
            } else if has_extension(path, &self.extensions) {
                files.push(BrowserEntry {
                    name,
                    path: path.to_path_buf(),
                    kind: EntryKind::File,
                });
            }
        }

        self.entries.clear();
        if let Some(parent) = self.dir.parent() {
            self.entries.push(BrowserEntry {
                name: "..".to_string(),
                path: parent.to_path_buf(),
                kind: EntryKind::Parent,
            });
        }
        self.entries.extend(dirs);
        self.entries.extend(files);
        self.cursor = self.cursor.min(self.entries.len().saturating_sub(1));
    }

    /// Descend into the selected directory, or return the selected file.
    pub fn enter(&mut self) -> Option<PathBuf> {
        let entry = self.selected()?.clone();
        match entry.kind {
            EntryKind::Parent => {
                self.up();
                None
            }
            EntryKind::Dir => {
                self.dir = entry.path;
                self.cursor = 0;
                self.refresh();
                None
            }
            EntryKind::File => Some(entry.path),
        }
    }

    /// Go to the parent directory, keeping the cursor on the one we left.
    pub fn up(&mut self) {
        let Some(parent) = self.dir.parent().map(Path::to_path_buf) else {
            return;
        };
        let left = std::mem::replace(&mut self.dir, parent);
        self.cursor = 0;
        self.refresh();
        if let Some(pos) = self.entries.iter().position(|e| e.path == left) {
            self.cursor = pos;
        }
    }

    pub fn toggle_hidden(&mut self) {
        self.include_hidden = !self.include_hidden;
        self.refresh();
    }
}
