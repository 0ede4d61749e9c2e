use std::io;
use std::path::PathBuf;

use image::ImageError;
use lofty::error::LoftyError;
use thiserror::Error;

/// A path could not be turned into a track record or an art payload.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read file: {0}")]
    Io(#[from] io::Error),

    #[error("unsupported file: {0}")]
    Unsupported(String),

    #[error("cannot read tags: {0}")]
    Metadata(#[from] LoftyError),

    #[error("cannot decode image: {0}")]
    Image(#[from] ImageError),

    #[error("already loaded")]
    Duplicate,
}

/// A record could not be persisted. The record stays dirty.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("cannot write file: {0}")]
    Io(#[from] io::Error),

    #[error("cannot write tags: {0}")]
    Metadata(#[from] LoftyError),

    #[error("file has no writable tag")]
    UnsupportedTag,

    #[error("cannot embed cover art: {0}")]
    Art(String),
}

/// One skipped path of a load.
#[derive(Debug)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub error: LoadError,
}
