use std::path::PathBuf;

use serde::Deserialize;

use crate::library::TagField;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/beetsheet/config.toml` or `~/.config/beetsheet/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `BEETSHEET__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub ui: UiSettings,
    pub library: LibrarySettings,
    pub art: ArtSettings,
    pub audio: AudioSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,

    /// Tag columns shown after the file name, in order.
    ///
    /// Example: ["artist", "album", "title"]
    pub columns: Vec<TagField>,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " beetsheet ".to_string(),
            columns: vec![TagField::Artist, TagField::Album, TagField::Title],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: ["mp3", "flac", "ogg", "opus", "m4a", "wav", "aiff", "wv"]
                .into_iter()
                .map(String::from)
                .collect(),
            follow_links: true,
            include_hidden: true,
            recursive: true,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArtSettings {
    /// Image extensions offered by the cover art picker.
    pub extensions: Vec<String>,
    /// Directory the picker opens in. Defaults to the current track's folder.
    pub start_dir: Option<PathBuf>,
    /// Thumbnail size in the preview popup, in terminal cells.
    pub preview_cols: u16,
    pub preview_rows: u16,
}

impl Default for ArtSettings {
    fn default() -> Self {
        Self {
            extensions: ["jpg", "jpeg", "png", "gif", "bmp", "webp"]
                .into_iter()
                .map(String::from)
                .collect(),
            start_dir: None,
            preview_cols: 32,
            preview_rows: 16,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Preview volume, 0.0 to 1.0.
    pub volume: f32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self { volume: 0.8 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter when `RUST_LOG` is unset, e.g. "info" or "beetsheet=debug".
    pub level: String,
    /// Log file. Defaults to `$XDG_STATE_HOME/beetsheet/beetsheet.log`.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
