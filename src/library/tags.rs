//! Boundary to the tagging library.
//!
//! Everything that touches an audio file's tags on disk goes through the
//! [`TagStore`] trait so the edit model stays free of I/O.

use std::path::Path;

use lofty::config::{ParseOptions, ParsingMode, WriteOptions};
use lofty::file::TaggedFileExt;
use lofty::picture::{MimeType, Picture, PictureType};
use lofty::probe::Probe;
use lofty::tag::{ItemKey, Tag, TagExt};

use super::art::mime_type;
use super::error::{LoadError, WriteError};
use super::model::{ArtPayload, TagField, TagFields};

/// Tags read from one file.
#[derive(Debug, Clone, Default)]
pub struct LoadedTags {
    pub fields: TagFields,
    pub has_embedded_art: bool,
}

pub trait TagStore {
    /// Read the editable fields of `path`.
    fn read_tags(&self, path: &Path) -> Result<LoadedTags, LoadError>;

    /// Persist `fields` (and `art` as front cover, if any) into `path`.
    fn write_tags(
        &self,
        path: &Path,
        fields: &TagFields,
        art: Option<&ArtPayload>,
    ) -> Result<(), WriteError>;

    /// Front cover (or first picture) bytes of `path`, if it has any.
    fn read_art(&self, path: &Path) -> Result<Option<Vec<u8>>, LoadError>;
}

/// [`TagStore`] backed by `lofty`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyTagStore;

fn item_key(field: TagField) -> ItemKey {
    match field {
        TagField::Title => ItemKey::TrackTitle,
        TagField::Artist => ItemKey::TrackArtist,
        TagField::Album => ItemKey::AlbumTitle,
        TagField::AlbumArtist => ItemKey::AlbumArtist,
        TagField::Genre => ItemKey::Genre,
    }
}

fn parse_options(read_cover_art: bool) -> ParseOptions {
    ParseOptions::new()
        .read_cover_art(read_cover_art)
        .parsing_mode(ParsingMode::BestAttempt)
}

fn fields_from_tag(tag: &Tag) -> TagFields {
    let mut fields = TagFields::new();
    for field in TagField::ALL {
        if let Some(v) = tag.get_string(item_key(field)) {
            fields.insert(field, v.to_string());
        }
    }
    fields
}

fn cover_picture(tag: &Tag) -> Option<&Picture> {
    tag.pictures()
        .iter()
        .find(|p| p.pic_type() == PictureType::CoverFront)
        .or_else(|| tag.pictures().first())
}

fn front_cover(art: &ArtPayload) -> Result<Picture, WriteError> {
    if art.data.is_empty() {
        return Err(WriteError::Art(format!("{} is empty", art.source.display())));
    }
    Ok(Picture::unchecked(art.data.to_vec())
        .pic_type(PictureType::CoverFront)
        .mime_type(MimeType::from_str(mime_type(art.format)))
        .build())
}

impl TagStore for LoftyTagStore {
    fn read_tags(&self, path: &Path) -> Result<LoadedTags, LoadError> {
        if !path.is_file() {
            return Err(LoadError::Unsupported(format!(
                "{} is not a regular file",
                path.display()
            )));
        }

        let tagged = Probe::open(path)?.options(parse_options(true)).read()?;

        let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) else {
            log::debug!("{} has no tags yet", path.display());
            return Ok(LoadedTags::default());
        };

        Ok(LoadedTags {
            fields: fields_from_tag(tag),
            has_embedded_art: !tag.pictures().is_empty(),
        })
    }

    fn write_tags(
        &self,
        path: &Path,
        fields: &TagFields,
        art: Option<&ArtPayload>,
    ) -> Result<(), WriteError> {
        let picture = art.map(front_cover).transpose()?;

        // Cover art must be read so existing pictures survive the rewrite.
        let mut tagged = Probe::open(path)?.options(parse_options(true)).read()?;

        let tag_type = tagged.primary_tag_type();
        if tagged.tag_mut(tag_type).is_none() {
            tagged.insert_tag(Tag::new(tag_type));
        }
        let tag = tagged.tag_mut(tag_type).ok_or(WriteError::UnsupportedTag)?;

        for field in TagField::ALL {
            let key = item_key(field);
            match fields.get(&field) {
                Some(v) if !v.is_empty() => {
                    if !tag.insert_text(key, v.clone()) {
                        log::warn!(
                            "{} cannot hold {field} in a {tag_type:?} tag",
                            path.display()
                        );
                    }
                }
                _ => {
                    tag.remove_key(key);
                }
            }
        }

        if let Some(picture) = picture {
            tag.remove_picture_type(PictureType::CoverFront);
            tag.push_picture(picture);
        }

        tag.save_to_path(path, WriteOptions::default())?;
        Ok(())
    }

    fn read_art(&self, path: &Path) -> Result<Option<Vec<u8>>, LoadError> {
        let tagged = Probe::open(path)?.options(parse_options(true)).read()?;
        let picture = tagged
            .primary_tag()
            .and_then(cover_picture)
            .or_else(|| tagged.tags().iter().find_map(cover_picture));
        Ok(picture.map(|p| p.data().to_vec()))
    }
}
