use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::ImageFormat;
use serde::Deserialize;

/// Editable tag fields shown as table columns.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TagField {
    Title,
    Artist,
    Album,
    #[serde(alias = "album_artist", alias = "albumartist")]
    AlbumArtist,
    Genre,
}

impl TagField {
    pub const ALL: [TagField; 5] = [
        TagField::Title,
        TagField::Artist,
        TagField::Album,
        TagField::AlbumArtist,
        TagField::Genre,
    ];

    /// Column header label.
    pub fn label(self) -> &'static str {
        match self {
            TagField::Title => "Title",
            TagField::Artist => "Artist",
            TagField::Album => "Album",
            TagField::AlbumArtist => "Album Artist",
            TagField::Genre => "Genre",
        }
    }
}

impl fmt::Display for TagField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label().to_ascii_lowercase())
    }
}

pub type TagFields = BTreeMap<TagField, String>;

/// Decoded-and-validated image waiting to be embedded as front cover.
#[derive(Clone)]
pub struct ArtPayload {
    pub source: PathBuf,
    pub data: Arc<[u8]>,
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

impl fmt::Debug for ArtPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtPayload")
            .field("source", &self.source)
            .field("bytes", &self.data.len())
            .field("format", &self.format)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// In-memory editable state of one audio file.
///
/// `dirty` starts out false (the fields mirror what is on disk) and is only
/// cleared again by [`TrackRecord::mark_saved`].
#[derive(Debug, Clone)]
pub struct TrackRecord {
    path: PathBuf,
    fields: TagFields,
    art: Option<ArtPayload>,
    has_embedded_art: bool,
    dirty: bool,
    selected: bool,
}

impl TrackRecord {
    pub fn new(path: PathBuf, fields: TagFields, has_embedded_art: bool) -> Self {
        Self {
            path,
            fields,
            art: None,
            has_embedded_art,
            dirty: false,
            selected: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Current value of `field`; absent fields read as empty.
    pub fn field(&self, field: TagField) -> &str {
        self.fields.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn fields(&self) -> &TagFields {
        &self.fields
    }

    pub fn art(&self) -> Option<&ArtPayload> {
        self.art.as_ref()
    }

    pub fn has_embedded_art(&self) -> bool {
        self.has_embedded_art
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Set `field` to `value`. Returns whether the value changed.
    pub fn set_field(&mut self, field: TagField, value: impl Into<String>) -> bool {
        let value = value.into();
        if self.field(field) == value {
            return false;
        }
        self.fields.insert(field, value);
        self.dirty = true;
        true
    }

    /// Attach cover art. Payloads are never compared, so this always dirties.
    pub fn set_art(&mut self, payload: ArtPayload) {
        self.art = Some(payload);
        self.dirty = true;
    }

    /// Called after a confirmed write of this record.
    pub fn mark_saved(&mut self) {
        if self.art.take().is_some() {
            self.has_embedded_art = true;
        }
        self.dirty = false;
    }

    pub fn toggle_selected(&mut self) {
        self.selected = !self.selected;
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }
}
