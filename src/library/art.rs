//! Cover art loading and terminal thumbnails.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};

use super::error::LoadError;
use super::model::ArtPayload;

/// Read and decode an image file so only valid pictures get embedded.
pub fn load_image(path: &Path) -> Result<ArtPayload, LoadError> {
    let data = fs::read(path)?;
    let format = image::guess_format(&data)?;
    let decoded = image::load_from_memory_with_format(&data, format)?;
    let (width, height) = decoded.dimensions();

    log::debug!(
        "loaded cover art {} ({format:?}, {width}x{height}, {} bytes)",
        path.display(),
        data.len()
    );

    Ok(ArtPayload {
        source: path.to_path_buf(),
        data: Arc::from(data),
        format,
        width,
        height,
    })
}

pub fn decode(data: &[u8]) -> Result<DynamicImage, LoadError> {
    Ok(image::load_from_memory(data)?)
}

pub fn mime_type(format: ImageFormat) -> &'static str {
    format.to_mime_type()
}

/// RGB cells for half-block rendering: each terminal row covers two pixel rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub cols: u16,
    pub rows: u16,
    /// `(top, bottom)` colour per cell, row-major.
    pub cells: Vec<([u8; 3], [u8; 3])>,
}

impl Thumbnail {
    pub fn cell(&self, col: u16, row: u16) -> Option<([u8; 3], [u8; 3])> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells
            .get(row as usize * self.cols as usize + col as usize)
            .copied()
    }
}

/// Downscale `image` to fit `max_cols` x `max_rows` terminal cells,
/// preserving aspect ratio.
pub fn thumbnail(image: &DynamicImage, max_cols: u16, max_rows: u16) -> Thumbnail {
    let max_cols = u32::from(max_cols.max(1));
    let max_px_rows = u32::from(max_rows.max(1)) * 2;

    let scaled = image.resize(max_cols, max_px_rows, FilterType::Triangle).to_rgb8();
    let (w, h) = scaled.dimensions();
    let rows = h.div_ceil(2);

    let mut cells = Vec::with_capacity((w * rows) as usize);
    for row in 0..rows {
        for col in 0..w {
            let top = scaled.get_pixel(col, row * 2).0;
            let bottom = if row * 2 + 1 < h {
                scaled.get_pixel(col, row * 2 + 1).0
            } else {
                [0, 0, 0]
            };
            cells.push((top, bottom));
        }
    }

    Thumbnail {
        cols: w as u16,
        rows: rows as u16,
        cells,
    }
}
