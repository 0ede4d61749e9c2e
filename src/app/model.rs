//! Application model: the `App` editing session used by the TUI and runtime.
//!
//! `App` owns the loaded tracks, the tag store used to save them, the table
//! cursor and the current input mode. It never touches the terminal.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::audio::PlaybackHandle;
use crate::config::{ArtSettings, Settings};
use crate::library::art::{self, Thumbnail};
use crate::library::title_guess::common_artist_prefix;
use crate::library::{
    ArtPayload, EditSession, SaveCoordinator, TagField, TagStore, TrackCollection, TrackRecord,
};

use super::browser::FileBrowser;

/// What the keyboard currently drives.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    /// Typing a new value for the cell under the cursor.
    EditCell,
    /// Typing one value for `field` of every target.
    BulkEdit(TagField),
    /// Picking an image for the targets.
    BrowseArt,
    /// Track details popup.
    Preview,
}

/// Snapshot shown in the preview popup.
#[derive(Debug, Clone)]
pub struct PreviewState {
    pub path: PathBuf,
    /// Where the shown art comes from: "pending", "embedded" or "none".
    pub art_source: &'static str,
    pub thumbnail: Option<Thumbnail>,
}

/// The main application model.
pub struct App {
    collection: TrackCollection,
    store: Box<dyn TagStore>,
    columns: Vec<TagField>,
    pub(crate) art_settings: ArtSettings,

    pub row: usize,
    pub column: usize,
    pub mode: Mode,
    pub input: String,
    pub status: Option<String>,
    quit_pending: bool,

    pub browser: Option<FileBrowser>,
    pub preview: Option<PreviewState>,
    pub playback_handle: Option<PlaybackHandle>,
}

impl App {
    /// Create a new `App` editing `collection`, saving through `store`.
    pub fn new(collection: TrackCollection, store: Box<dyn TagStore>, settings: &Settings) -> Self {
        let columns = if settings.ui.columns.is_empty() {
            vec![TagField::Title]
        } else {
            settings.ui.columns.clone()
        };

        Self {
            collection,
            store,
            columns,
            art_settings: settings.art.clone(),
            row: 0,
            column: 0,
            mode: Mode::Normal,
            input: String::new(),
            status: None,
            quit_pending: false,
            browser: None,
            preview: None,
            playback_handle: None,
        }
    }

    pub fn collection(&self) -> &TrackCollection {
        &self.collection
    }

    pub fn columns(&self) -> &[TagField] {
        &self.columns
    }

    pub fn current_field(&self) -> TagField {
        self.columns[self.column.min(self.columns.len() - 1)]
    }

    pub fn current_record(&self) -> Option<&TrackRecord> {
        self.collection.by_index(self.row)
    }

    pub fn current_path(&self) -> Option<PathBuf> {
        self.current_record().map(|r| r.path().to_path_buf())
    }

    pub fn dirty_count(&self) -> usize {
        self.collection.dirty_count()
    }

    pub fn selected_count(&self) -> usize {
        self.collection.selected_records().count()
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some(msg.into());
    }

    /// Attach a `PlaybackHandle` used to observe preview playback.
    pub fn set_playback_handle(&mut self, h: PlaybackHandle) {
        self.playback_handle = Some(h);
    }

    // Cursor movement clamps at the edges.

    pub fn next_row(&mut self) {
        if self.row + 1 < self.collection.len() {
            self.row += 1;
        }
    }

    pub fn prev_row(&mut self) {
        self.row = self.row.saturating_sub(1);
    }

    pub fn first_row(&mut self) {
        self.row = 0;
    }

    pub fn last_row(&mut self) {
        self.row = self.collection.len().saturating_sub(1);
    }

    pub fn next_column(&mut self) {
        if self.column + 1 < self.columns.len() {
            self.column += 1;
        }
    }

    pub fn prev_column(&mut self) {
        self.column = self.column.saturating_sub(1);
    }

    /// Paths bulk operations apply to: the selection, or every track when
    /// nothing is selected.
    pub fn targets(&self) -> Vec<PathBuf> {
        let selected = self.collection.selected_paths();
        if selected.is_empty() {
            self.collection.paths()
        } else {
            selected
        }
    }

    pub fn toggle_selection_at_cursor(&mut self) {
        if let Some(path) = self.current_path() {
            self.collection.toggle_selected(&path);
        }
    }

    pub fn select_all(&mut self) {
        self.collection.select_all();
    }

    pub fn clear_selection(&mut self) {
        self.collection.clear_selection();
    }

    pub fn begin_cell_edit(&mut self) {
        let field = self.current_field();
        let Some(value) = self.current_record().map(|r| r.field(field).to_string()) else {
            return;
        };
        self.input = value;
        self.mode = Mode::EditCell;
    }

    pub fn begin_bulk_edit(&mut self, field: TagField) {
        if self.collection.is_empty() {
            return;
        }
        let (_, default) = self.bulk_candidates(field);
        self.input = default;
        self.mode = Mode::BulkEdit(field);
    }

    pub fn push_input(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_input(&mut self) {
        self.input.pop();
    }

    /// Apply the input buffer according to the current mode.
    pub fn submit_input(&mut self) {
        let value = self.input.clone();
        match self.mode {
            Mode::EditCell => {
                let field = self.current_field();
                if let Some(path) = self.current_path() {
                    let changed =
                        EditSession::new(&mut self.collection).apply_single(&path, field, &value);
                    self.status = Some(if changed {
                        format!("{field} updated")
                    } else {
                        format!("{field} unchanged")
                    });
                }
            }
            Mode::BulkEdit(field) => {
                let targets = self.targets();
                let changed =
                    EditSession::new(&mut self.collection).apply_bulk(&targets, field, &value);
                self.status = Some(format!(
                    "{field} set on {} of {} track(s)",
                    changed.len(),
                    targets.len()
                ));
            }
            _ => return,
        }
        self.input.clear();
        self.mode = Mode::Normal;
    }

    pub fn cancel_input(&mut self) {
        self.input.clear();
        self.mode = Mode::Normal;
    }

    /// Distinct current values of `field` among the targets, sorted, and the
    /// value to pre-fill the bulk editor with.
    pub fn bulk_candidates(&self, field: TagField) -> (Vec<String>, String) {
        let targets = self.targets();
        let records: Vec<&TrackRecord> = targets
            .iter()
            .filter_map(|p| self.collection.get(p))
            .collect();

        let values: BTreeSet<&str> = records.iter().map(|r| r.field(field)).collect();
        let default = records
            .iter()
            .map(|r| r.field(field))
            .find(|v| !v.is_empty())
            .map(str::to_string)
            .or_else(|| match field {
                TagField::Artist | TagField::AlbumArtist => common_artist_prefix(&targets),
                _ => None,
            })
            .unwrap_or_default();

        (values.into_iter().map(str::to_string).collect(), default)
    }

    pub fn guess_title_at_cursor(&mut self) {
        let Some(path) = self.current_path() else {
            return;
        };
        let changed = EditSession::new(&mut self.collection).apply_title_guesses(&[path]);
        self.status = Some(if changed.is_empty() {
            "title unchanged".to_string()
        } else {
            "title guessed from file name".to_string()
        });
    }

    pub fn guess_titles_for_targets(&mut self) {
        let targets = self.targets();
        let changed = EditSession::new(&mut self.collection).apply_title_guesses(&targets);
        self.status = Some(format!(
            "guessed {} title(s) from file names",
            changed.len()
        ));
    }

    /// Stage `payload` as cover art of every target.
    pub fn assign_art(&mut self, payload: ArtPayload) -> Vec<PathBuf> {
        let targets = self.targets();
        let touched = EditSession::new(&mut self.collection).apply_art(&targets, &payload);
        self.status = Some(format!(
            "cover {} staged for {} track(s)",
            payload
                .source
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            touched.len()
        ));
        touched
    }

    /// Open the cover art picker in the configured directory, or next to the
    /// track under the cursor.
    pub fn open_art_browser(&mut self) {
        let start = self
            .art_settings
            .start_dir
            .clone()
            .filter(|d| d.is_dir())
            .or_else(|| {
                self.current_record()
                    .and_then(|r| r.path().parent().map(Path::to_path_buf))
                    .filter(|d| d.is_dir())
            })
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));

        self.browser = Some(FileBrowser::new(start, self.art_settings.extensions.clone()));
        self.mode = Mode::BrowseArt;
    }

    /// Enter on the browser: a directory is opened, an image is loaded and
    /// staged on the targets.
    pub fn browser_enter(&mut self) {
        let Some(browser) = self.browser.as_mut() else {
            return;
        };
        let Some(file) = browser.enter() else {
            return;
        };

        match art::load_image(&file) {
            Ok(payload) => {
                self.assign_art(payload);
                self.close_browser();
            }
            Err(err) => {
                log::warn!("cannot use {} as cover: {err}", file.display());
                self.status = Some(format!("not a usable image: {err}"));
            }
        }
    }

    pub fn close_browser(&mut self) {
        self.browser = None;
        self.mode = Mode::Normal;
    }

    /// Show details and art of the track under the cursor.
    pub fn open_preview(&mut self) {
        let Some(record) = self.current_record() else {
            return;
        };
        let path = record.path().to_path_buf();

        let (art_source, bytes) = if let Some(pending) = record.art() {
            ("pending", Some(pending.data.to_vec()))
        } else if record.has_embedded_art() {
            match self.store.read_art(&path) {
                Ok(bytes) => ("embedded", bytes),
                Err(err) => {
                    log::warn!("cannot read cover of {}: {err}", path.display());
                    ("embedded", None)
                }
            }
        } else {
            ("none", None)
        };

        let thumbnail = bytes.and_then(|b| match art::decode(&b) {
            Ok(img) => Some(art::thumbnail(
                &img,
                self.art_settings.preview_cols,
                self.art_settings.preview_rows,
            )),
            Err(err) => {
                log::debug!("cover of {} does not decode: {err}", path.display());
                None
            }
        });

        self.preview = Some(PreviewState {
            path,
            art_source,
            thumbnail,
        });
        self.mode = Mode::Preview;
    }

    pub fn close_preview(&mut self) {
        self.preview = None;
        self.mode = Mode::Normal;
    }

    /// Write every dirty record and report the outcome in the status line.
    pub fn save(&mut self) -> String {
        let outcome = SaveCoordinator::new(self.store.as_ref()).save(&mut self.collection);
        let summary = outcome.summary();
        self.quit_pending = false;
        self.status = Some(summary.clone());
        summary
    }

    /// Whether the app may quit now. With unsaved changes the first request
    /// only warns; a second one in a row confirms.
    pub fn request_quit(&mut self) -> bool {
        let dirty = self.dirty_count();
        if dirty == 0 || self.quit_pending {
            return true;
        }
        self.quit_pending = true;
        self.status = Some(format!(
            "{dirty} unsaved track(s): press q again to quit, s to save"
        ));
        false
    }

    /// Any key other than a second quit cancels a pending quit.
    pub fn cancel_quit(&mut self) {
        self.quit_pending = false;
    }
}
